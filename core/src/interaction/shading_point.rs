//! Shading Point

use crate::geometry::*;
use std::fmt;

/// Geometry of a surface point that scattering functions need: the shading
/// frame, the geometric normal and the screen-space derivatives of the
/// shading normal used for ray differentials.
#[derive(Copy, Clone, Debug)]
pub struct ShadingPoint {
    /// Orthonormal shading frame.
    shading_basis: Basis3f,

    /// Geometric surface normal.
    geometric_normal: Vector3f,

    /// Change in shading normal per pixel in screen x.
    dndx: Vector3f,

    /// Change in shading normal per pixel in screen y.
    dndy: Vector3f,
}

impl ShadingPoint {
    /// Create a new `ShadingPoint` without normal derivatives.
    ///
    /// * `shading_basis`    - Orthonormal shading frame.
    /// * `geometric_normal` - Geometric surface normal.
    pub fn new(shading_basis: Basis3f, geometric_normal: Vector3f) -> Self {
        Self {
            shading_basis,
            geometric_normal,
            dndx: Vector3f::ZERO,
            dndy: Vector3f::ZERO,
        }
    }

    /// Create a new `ShadingPoint` whose shading and geometric normals agree.
    ///
    /// * `n` - Unit surface normal.
    pub fn from_normal(n: &Vector3f) -> Self {
        Self::new(Basis3f::from_normal(n), *n)
    }

    /// Returns the point with the given normal derivatives.
    ///
    /// * `dndx` - Change in shading normal per pixel in screen x.
    /// * `dndy` - Change in shading normal per pixel in screen y.
    pub fn with_normal_derivatives(mut self, dndx: Vector3f, dndy: Vector3f) -> Self {
        self.dndx = dndx;
        self.dndy = dndy;
        self
    }

    /// Returns the shading frame.
    pub fn get_shading_basis(&self) -> &Basis3f {
        &self.shading_basis
    }

    /// Returns the shading normal.
    pub fn get_shading_normal(&self) -> Vector3f {
        self.shading_basis.get_normal()
    }

    /// Returns the geometric normal.
    pub fn get_geometric_normal(&self) -> Vector3f {
        self.geometric_normal
    }

    /// Returns the change in shading normal per pixel in screen x.
    pub fn get_dndx(&self) -> Vector3f {
        self.dndx
    }

    /// Returns the change in shading normal per pixel in screen y.
    pub fn get_dndy(&self) -> Vector3f {
        self.dndy
    }
}

impl Default for ShadingPoint {
    fn default() -> Self {
        Self::new(Basis3f::default(), Vector3f::Y_AXIS)
    }
}

impl fmt::Display for ShadingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ShadingPoint {{ n: {}, ng: {}, dndx: {}, dndy: {} }}",
            self.get_shading_normal(),
            self.geometric_normal,
            self.dndx,
            self.dndy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_y_up() {
        let sp = ShadingPoint::default();
        assert_eq!(sp.get_shading_normal(), Vector3f::Y_AXIS);
        assert_eq!(sp.get_geometric_normal(), Vector3f::Y_AXIS);
        assert_eq!(sp.get_dndx(), Vector3f::ZERO);
    }

    #[test]
    fn from_normal_uses_normal_for_both_frames() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let sp = ShadingPoint::from_normal(&n).with_normal_derivatives(
            Vector3f::new(0.1, 0.0, 0.0),
            Vector3f::new(0.0, 0.2, 0.0),
        );
        assert_eq!(sp.get_shading_normal(), n);
        assert_eq!(sp.get_geometric_normal(), n);
        assert_eq!(sp.get_dndy(), Vector3f::new(0.0, 0.2, 0.0));
    }
}
