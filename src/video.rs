// src/video.rs - Frame handed from playback to the analyzer
use image::{DynamicImage, GenericImageView};

/// One decoded video frame at a point of playback.
///
/// The raster is optional so that recorded pose scripts can be replayed
/// without decoding video; detectors that need pixels should reject frames
/// without one.
#[derive(Debug, Clone)]
pub struct Frame {
    pub raster: Option<DynamicImage>,
    pub width: u32,
    pub height: u32,
    /// Index of the frame within the video.
    pub sequence: u64,
    /// Playback time in seconds.
    pub timestamp: f64,
}

impl Frame {
    pub fn from_image(image: DynamicImage, sequence: u64, timestamp: f64) -> Self {
        let (width, height) = image.dimensions();
        Self {
            raster: Some(image),
            width,
            height,
            sequence,
            timestamp,
        }
    }

    pub fn without_raster(width: u32, height: u32, sequence: u64, timestamp: f64) -> Self {
        Self {
            raster: None,
            width,
            height,
            sequence,
            timestamp,
        }
    }

    pub fn width_px(&self) -> f64 {
        self.width as f64
    }

    pub fn height_px(&self) -> f64 {
        self.height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_from_image() {
        let frame = Frame::from_image(DynamicImage::new_rgb8(64, 48), 3, 0.1);
        assert_eq!((frame.width, frame.height), (64, 48));
        assert!(frame.raster.is_some());
        assert_eq!(frame.sequence, 3);
    }

    #[test]
    fn test_frame_without_raster() {
        let frame = Frame::without_raster(1920, 1080, 0, 0.0);
        assert!(frame.raster.is_none());
        assert_eq!(frame.width_px(), 1920.0);
    }
}
