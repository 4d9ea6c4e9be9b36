//! Planar geometry over keypoints.

use glam::Vec2;

use super::types::Keypoint;

/// Interior angle at `vertex` formed by `a` and `b`, in degrees (0 - 180).
///
/// `None` when either limb has zero length, i.e. two landmarks collapsed
/// onto the same point and the angle is undefined.
pub fn joint_angle(a: &Keypoint, vertex: &Keypoint, b: &Keypoint) -> Option<f32> {
    let to_a = a.position() - vertex.position();
    let to_b = b.position() - vertex.position();
    if to_a.length_squared() == 0.0 || to_b.length_squared() == 0.0 {
        return None;
    }
    Some(to_a.angle_between(to_b).abs().to_degrees().min(180.0))
}

/// Euclidean distance between two keypoints.
pub fn distance(a: &Keypoint, b: &Keypoint) -> f32 {
    a.position().distance(b.position())
}

/// Absolute vertical separation between two keypoints.
pub fn vertical_gap(a: &Keypoint, b: &Keypoint) -> f32 {
    (a.y - b.y).abs()
}

/// Midpoint between two keypoints.
pub fn midpoint(a: &Keypoint, b: &Keypoint) -> Vec2 {
    (a.position() + b.position()) * 0.5
}
