//! Orthonormal Basis

use super::Vector3f;
use crate::pbrt::*;

/// An orthonormal basis used as a local shading frame.
///
/// The local frame is y-up: the normal maps to the y-axis, the tangent `u` to
/// the x-axis and the bitangent `v` to the z-axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Basis3f {
    /// Tangent (local x-axis).
    u: Vector3f,

    /// Normal (local y-axis).
    n: Vector3f,

    /// Bitangent (local z-axis).
    v: Vector3f,
}

impl Default for Basis3f {
    /// Returns the identity basis.
    fn default() -> Self {
        Self {
            u: Vector3f::new(1.0, 0.0, 0.0),
            n: Vector3f::new(0.0, 1.0, 0.0),
            v: Vector3f::new(0.0, 0.0, 1.0),
        }
    }
}

impl Basis3f {
    /// Create a new basis from a unit normal; the tangent is chosen
    /// arbitrarily (but continuously) around it.
    ///
    /// * `n` - Unit normal.
    pub fn from_normal(n: &Vector3f) -> Self {
        debug_assert!(n.is_normalized(1e-3));

        // Duff et al. branchless construction.
        let sign = if n.z >= 0.0 { 1.0 } else { -1.0 };
        let a = -1.0 / (sign + n.z);
        let b = n.x * n.y * a;
        let u = Vector3f::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);

        Self { u, n: *n, v: u.cross(n) }
    }

    /// Create a new basis from a unit normal and an approximate tangent. The
    /// tangent is projected onto the plane perpendicular to `n`.
    ///
    /// * `n` - Unit normal.
    /// * `u` - Approximate tangent; must not be parallel to `n`.
    pub fn new(n: &Vector3f, u: &Vector3f) -> Self {
        debug_assert!(n.is_normalized(1e-3));

        let u = (*u - n.dot(u) * *n).normalize();
        Self { u, n: *n, v: u.cross(n) }
    }

    /// Returns the normal.
    pub fn get_normal(&self) -> Vector3f {
        self.n
    }

    /// Returns the tangent.
    pub fn get_tangent_u(&self) -> Vector3f {
        self.u
    }

    /// Returns the bitangent.
    pub fn get_tangent_v(&self) -> Vector3f {
        self.v
    }

    /// Transforms a vector from the parent (world) frame to the local frame.
    ///
    /// * `w` - The vector to transform.
    pub fn transform_to_local(&self, w: &Vector3f) -> Vector3f {
        Vector3f::new(w.dot(&self.u), w.dot(&self.n), w.dot(&self.v))
    }

    /// Transforms a vector from the local frame to the parent (world) frame.
    ///
    /// * `l` - The vector to transform.
    pub fn transform_to_parent(&self, l: &Vector3f) -> Vector3f {
        l.x * self.u + l.y * self.n + l.z * self.v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::*;
    use float_cmp::*;
    use proptest::prelude::*;

    crate::prop_unit_vector3!(unit_vector3);

    #[test]
    fn default_basis_is_identity() {
        let basis = Basis3f::default();
        let w = Vector3f::new(0.3, -0.2, 0.9);
        assert_eq!(basis.transform_to_local(&w), w);
        assert_eq!(basis.transform_to_parent(&w), w);
    }

    #[test]
    fn normal_maps_to_y_axis() {
        let n = Vector3f::new(1.0, 1.0, 0.0).normalize();
        let basis = Basis3f::from_normal(&n);
        let local = basis.transform_to_local(&n);
        assert!(approx_eq!(Float, local.y, 1.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, local.x, 0.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, local.z, 0.0, epsilon = 1e-5));
    }

    #[test]
    fn new_projects_tangent() {
        let n = Vector3f::new(0.0, 1.0, 0.0);
        let basis = Basis3f::new(&n, &Vector3f::new(1.0, 0.5, 0.0));
        assert_eq!(basis.get_tangent_u(), Vector3f::new(1.0, 0.0, 0.0));
        assert_eq!(basis.get_tangent_v(), Vector3f::new(0.0, 0.0, 1.0));
    }

    proptest! {
        #[test]
        fn basis_is_orthonormal(n in unit_vector3()) {
            let basis = Basis3f::from_normal(&n);
            let (u, v) = (basis.get_tangent_u(), basis.get_tangent_v());
            prop_assert!(u.is_normalized(1e-3));
            prop_assert!(v.is_normalized(1e-3));
            prop_assert!(abs(u.dot(&n)) < 1e-4);
            prop_assert!(abs(v.dot(&n)) < 1e-4);
            prop_assert!(abs(u.dot(&v)) < 1e-4);
        }

        #[test]
        fn round_trip_through_local_frame(n in unit_vector3(), w in unit_vector3()) {
            let basis = Basis3f::from_normal(&n);
            let back = basis.transform_to_parent(&basis.transform_to_local(&w));
            prop_assert!(approx_eq!(Float, back.x, w.x, epsilon = 1e-4));
            prop_assert!(approx_eq!(Float, back.y, w.y, epsilon = 1e-4));
            prop_assert!(approx_eq!(Float, back.z, w.z, epsilon = 1e-4));
        }
    }
}
