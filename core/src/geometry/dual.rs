//! Directions with screen-space derivatives

use super::Vector3f;

/// A direction with optional partial derivatives with respect to screen
/// space x and y, used to track ray footprints through scattering events.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Dual3f {
    /// The value.
    value: Vector3f,

    /// Derivative with respect to screen-space x.
    dx: Vector3f,

    /// Derivative with respect to screen-space y.
    dy: Vector3f,

    /// Whether `dx` and `dy` hold meaningful values.
    has_derivatives: bool,
}

impl Dual3f {
    /// Create a new `Dual3f` without derivatives.
    ///
    /// * `value` - The value.
    pub fn new(value: Vector3f) -> Self {
        Self {
            value,
            dx: Vector3f::ZERO,
            dy: Vector3f::ZERO,
            has_derivatives: false,
        }
    }

    /// Create a new `Dual3f` with derivatives.
    ///
    /// * `value` - The value.
    /// * `dx`    - Derivative with respect to screen-space x.
    /// * `dy`    - Derivative with respect to screen-space y.
    pub fn with_derivatives(value: Vector3f, dx: Vector3f, dy: Vector3f) -> Self {
        Self {
            value,
            dx,
            dy,
            has_derivatives: true,
        }
    }

    /// Returns the value.
    pub fn get_value(&self) -> Vector3f {
        self.value
    }

    /// Returns the derivative with respect to screen-space x.
    pub fn get_dx(&self) -> Vector3f {
        self.dx
    }

    /// Returns the derivative with respect to screen-space y.
    pub fn get_dy(&self) -> Vector3f {
        self.dy
    }

    /// Returns true if derivatives are present.
    pub fn has_derivatives(&self) -> bool {
        self.has_derivatives
    }
}

impl From<Vector3f> for Dual3f {
    fn from(value: Vector3f) -> Self {
        Self::new(value)
    }
}
