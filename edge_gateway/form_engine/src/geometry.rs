use crate::landmarks::Landmark;

/// Default minimum visibility for a landmark to be trusted.
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.5;

/// Interior angle in degrees at vertex `b` formed by rays `b->a` and `b->c`.
///
/// Always in [0, 180]. NaN coordinates propagate.
pub fn angle_between(a: &Landmark, b: &Landmark, c: &Landmark) -> f32 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut angle = radians.to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle
}

/// Euclidean distance on the image plane; `z` is ignored.
pub fn distance(a: &Landmark, b: &Landmark) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

pub fn is_visible(landmark: Option<&Landmark>, threshold: f32) -> bool {
    match landmark {
        Some(lm) => lm.visibility >= threshold,
        None => false,
    }
}
