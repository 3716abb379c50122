use crate::landmarks::{ids, Hand, Keypoint};

/// Fewest keypoints a hand must carry before it is used (middle tip is id 12)
pub const MIN_KEYPOINTS: usize = ids::MIDDLE_TIP + 1;

/// Distances derived from one hand in a single frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandGeometry {
    pub thumb_tip: Keypoint,
    pub index_tip: Keypoint,
    pub middle_tip: Keypoint,
    /// Thumb tip to index tip, drives the servo angle
    pub control_distance: f32,
    /// Index tip to middle tip, drives the exit gesture
    pub exit_distance: f32,
}

impl HandGeometry {
    /// Extract control and exit distances from a hand
    ///
    /// Returns `None` when the hand has fewer than [`MIN_KEYPOINTS`] keypoints.
    pub fn extract(hand: &Hand) -> Option<Self> {
        if hand.len() < MIN_KEYPOINTS {
            return None;
        }

        let thumb_tip = *hand.get(ids::THUMB_TIP)?;
        let index_tip = *hand.get(ids::INDEX_TIP)?;
        let middle_tip = *hand.get(ids::MIDDLE_TIP)?;

        Some(Self {
            thumb_tip,
            index_tip,
            middle_tip,
            control_distance: thumb_tip.distance_to(&index_tip),
            exit_distance: index_tip.distance_to(&middle_tip),
        })
    }
}

/// Geometry of the primary hand: the first detected hand with enough keypoints
pub fn primary_geometry(hands: &[Hand]) -> Option<HandGeometry> {
    hands.iter().find_map(HandGeometry::extract)
}
