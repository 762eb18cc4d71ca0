// src/buffer.rs - Round-robin pose cache, one slot per roster position
use tracing::debug;

use crate::pose::Pose;

/// Fixed ring of roster slots holding the last pose written to each.
///
/// Detections are assigned to slots by rotation, not by appearance: the
/// n-th accepted detection lands in slot `n mod roster_size`. No player is
/// re-identified, and a slot keeps its pose until the ring wraps around to it.
pub struct PoseBuffer {
    slots: Vec<Option<Pose>>,
    cursor: usize,
    frame_counter: u64,
    sample_interval: u64,
}

impl PoseBuffer {
    pub fn new(roster_size: usize, sample_interval: u64) -> Self {
        Self {
            slots: vec![None; roster_size],
            cursor: 0,
            frame_counter: 0,
            sample_interval: sample_interval.max(1),
        }
    }

    /// Whether the current frame should get a real detection call.
    pub fn is_sampling_frame(&self) -> bool {
        self.frame_counter % self.sample_interval == 0
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn roster_size(&self) -> usize {
        self.slots.len()
    }

    /// Called once per analyzed frame, whatever happened during it.
    pub fn advance_frame(&mut self) {
        self.frame_counter += 1;
    }

    /// Stores a detection in the current slot and rotates the cursor.
    /// Returns the slot that was written.
    pub fn assign(&mut self, pose: Pose) -> usize {
        let slot = self.cursor;
        self.slots[slot] = Some(pose);
        self.cursor = (self.cursor + 1) % self.slots.len();
        debug!("Pose assigned to slot {} (frame {})", slot, self.frame_counter);
        slot
    }

    /// Cached poses in slot order, however stale.
    pub fn poses(&self) -> impl Iterator<Item = (usize, &Pose)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, pose)| pose.as_ref().map(|p| (slot, p)))
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    fn pose_at(x: f64) -> Pose {
        Pose::new(vec![Keypoint::new("nose", x, 10.0, Some(0.9))])
    }

    /// Drives the buffer the way the analyzer does for a run of frames that
    /// all contain a detection.
    fn feed(buffer: &mut PoseBuffer, frames: usize) -> usize {
        let mut writes = 0;
        for i in 0..frames {
            if buffer.is_sampling_frame() {
                buffer.assign(pose_at(i as f64));
                writes += 1;
            }
            buffer.advance_frame();
        }
        writes
    }

    #[test]
    fn test_sampling_cadence_thirty_frames() {
        let mut buffer = PoseBuffer::new(22, 10);
        assert_eq!(feed(&mut buffer, 30), 3);
        assert_eq!(buffer.frame_counter(), 30);
        assert_eq!(buffer.occupied(), 3);

        let xs: Vec<f64> = buffer.poses().map(|(_, p)| p.keypoints[0].x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_cursor_wraps_around_roster() {
        let mut buffer = PoseBuffer::new(3, 1);
        for i in 0..4 {
            buffer.assign(pose_at(i as f64));
        }
        assert_eq!(buffer.cursor(), 1);
        assert_eq!(buffer.occupied(), 3);

        let slots: Vec<(usize, f64)> = buffer
            .poses()
            .map(|(slot, p)| (slot, p.keypoints[0].x))
            .collect();
        assert_eq!(slots, vec![(0, 3.0), (1, 1.0), (2, 2.0)]);
    }

    #[test]
    fn test_stale_poses_are_kept() {
        let mut buffer = PoseBuffer::new(22, 10);
        buffer.assign(pose_at(5.0));
        for _ in 0..100 {
            buffer.advance_frame();
        }
        assert_eq!(buffer.poses().count(), 1);
    }

    #[test]
    fn test_empty_buffer_yields_nothing() {
        let buffer = PoseBuffer::new(22, 10);
        assert!(buffer.is_sampling_frame());
        assert_eq!(buffer.poses().count(), 0);
    }
}
