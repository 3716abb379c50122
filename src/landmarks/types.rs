use anyhow::Result;
use image::RgbImage;

/// Hand landmark indices (MediaPipe hand landmark convention)
#[allow(dead_code)]
pub mod ids {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;

    /// All five fingertips, thumb first
    pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
}

/// Number of keypoints produced per hand by the landmark model
pub const HAND_KEYPOINTS: usize = 21;

/// A single anatomical landmark in frame pixel coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Keypoint {
    pub id: usize,
    pub x: f32,
    pub y: f32,
}

impl Keypoint {
    /// Euclidean pixel distance to another keypoint
    pub fn distance_to(&self, other: &Keypoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// One detected hand: keypoints ordered by id
#[derive(Clone, Debug, Default)]
pub struct Hand {
    pub keypoints: Vec<Keypoint>,
}

impl Hand {
    /// Build a hand from pixel positions, assigning ids in order
    pub fn from_positions(positions: &[(f32, f32)]) -> Self {
        let keypoints = positions
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| Keypoint { id, x, y })
            .collect();
        Self { keypoints }
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn get(&self, id: usize) -> Option<&Keypoint> {
        self.keypoints.get(id)
    }
}

/// Trait for hand landmark detectors
/// Treated as a pure function of the frame by the control loop
pub trait LandmarkSource {
    /// Detect hands in a frame
    ///
    /// # Returns
    /// * Zero or more hands, keypoints in frame pixel coordinates
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Hand>>;
}

/// Hand whose thumb/index tips are `control` px apart and index/middle tips `exit` px apart
#[cfg(test)]
pub(crate) fn synthetic_hand(control: f32, exit: f32) -> Hand {
    let mut positions = vec![(0.0, 0.0); HAND_KEYPOINTS];
    positions[ids::THUMB_TIP] = (100.0, 100.0);
    positions[ids::INDEX_TIP] = (100.0 + control, 100.0);
    positions[ids::MIDDLE_TIP] = (100.0 + control, 100.0 + exit);
    Hand::from_positions(&positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_position_order() {
        let hand = Hand::from_positions(&[(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)]);
        assert_eq!(hand.len(), 3);
        assert_eq!(hand.get(2), Some(&Keypoint { id: 2, x: 5.0, y: 6.0 }));
        assert!(hand.get(3).is_none());
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Keypoint { id: 0, x: 0.0, y: 0.0 };
        let b = Keypoint { id: 1, x: 3.0, y: 4.0 };
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&b), 0.0);
    }
}
