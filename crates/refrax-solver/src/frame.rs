//! Optical frame transform.
//!
//! Places corresponded 2D image-plane positions into the 3D optical frame:
//! lift to z = 0, rotate about x then y then z, translate, then move the
//! plane a focal length down the optical axis (−z).

use serde::{Deserialize, Serialize};
use refrax_math::{DMat3, DVec2, DVec3};
use refrax_types::constants::DEFAULT_FOCAL_LENGTH;
use refrax_types::{RefraxError, RefraxResult};

/// Rigid placement of the target image plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameTransform {
    /// Rotation about the x, y and z axes, in degrees, applied in that order.
    pub rotation_deg: [f64; 3],
    /// Translation applied after rotation.
    pub translation: [f64; 3],
    /// Distance from the surface to the target plane along −z.
    pub focal_length: f64,
}

impl Default for FrameTransform {
    fn default() -> Self {
        Self {
            rotation_deg: [0.0; 3],
            translation: [0.0; 3],
            focal_length: DEFAULT_FOCAL_LENGTH,
        }
    }
}

impl FrameTransform {
    /// A transform that only applies the focal offset.
    pub fn with_focal_length(focal_length: f64) -> Self {
        Self {
            focal_length,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> RefraxResult<()> {
        if !(self.focal_length > 0.0 && self.focal_length.is_finite()) {
            return Err(RefraxError::InvalidConfig(format!(
                "focal_length must be positive, got {}",
                self.focal_length
            )));
        }
        if self
            .rotation_deg
            .iter()
            .chain(&self.translation)
            .any(|c| !c.is_finite())
        {
            return Err(RefraxError::InvalidConfig(
                "Frame rotation and translation must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Combined rotation `Rz · Ry · Rx`.
    pub fn rotation(&self) -> DMat3 {
        let [rx, ry, rz] = self.rotation_deg.map(f64::to_radians);
        DMat3::from_rotation_z(rz) * DMat3::from_rotation_y(ry) * DMat3::from_rotation_x(rx)
    }

    /// Rotates then translates `p`, without the focal offset.
    pub fn rigid(&self, p: DVec3) -> DVec3 {
        self.rotation() * p + DVec3::from_array(self.translation)
    }

    /// Places every 2D point into the optical frame.
    pub fn place(&self, points: &[DVec2]) -> Vec<DVec3> {
        let rotation = self.rotation();
        let offset = DVec3::from_array(self.translation) - DVec3::Z * self.focal_length;
        points
            .iter()
            .map(|p| rotation * p.extend(0.0) + offset)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_only_offsets_focal_length() {
        let frame = FrameTransform::default();
        let placed = frame.place(&[DVec2::new(0.25, 0.75)]);
        assert_eq!(placed[0], DVec3::new(0.25, 0.75, -DEFAULT_FOCAL_LENGTH));
    }

    #[test]
    fn rejects_non_positive_focal_length() {
        assert!(FrameTransform::with_focal_length(0.0).validate().is_err());
        assert!(FrameTransform::with_focal_length(-1.0).validate().is_err());
        assert!(FrameTransform::with_focal_length(2.0).validate().is_ok());
    }
}
