//! BSDF Sample

use super::*;
use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::spectrum::*;

/// Input and output record of a single scattering-function sampling call.
#[derive(Copy, Clone, Debug)]
pub struct BSDFSample {
    /// Shading frame at the scattering point.
    shading_basis: Basis3f,

    /// Geometric normal at the scattering point.
    geometric_normal: Vector3f,

    /// Change in shading normal per pixel in screen x.
    dndx: Vector3f,

    /// Change in shading normal per pixel in screen y.
    dndy: Vector3f,

    /// World space outgoing direction with optional derivatives.
    pub outgoing: Dual3f,

    /// World space sampled incoming direction with optional derivatives.
    pub incoming: Dual3f,

    /// The sampled value.
    pub value: Spectrum,

    /// The value of the PDF (solid angle measure).
    pub probability: Float,

    /// What happened.
    event: ScatteringEvent,
}

impl BSDFSample {
    /// Create a new `BSDFSample` initialized to absorption.
    ///
    /// * `shading_point` - The scattering point.
    /// * `outgoing`      - World space outgoing direction.
    pub fn new(shading_point: &ShadingPoint, outgoing: Dual3f) -> Self {
        Self {
            shading_basis: *shading_point.get_shading_basis(),
            geometric_normal: shading_point.get_geometric_normal(),
            dndx: shading_point.get_dndx(),
            dndy: shading_point.get_dndy(),
            outgoing,
            incoming: Dual3f::default(),
            value: Spectrum::ZERO,
            probability: 0.0,
            event: ScatteringEvent::Absorption,
        }
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

    /// Returns the event the sample represents.
    pub fn get_event(&self) -> ScatteringEvent {
        self.event
    }

    /// Returns true if no direction was produced.
    pub fn is_absorption(&self) -> bool {
        self.event == ScatteringEvent::Absorption
    }

    /// Marks the sample as a scattering event with the given density.
    ///
    /// * `event`       - The kind of scattering.
    /// * `probability` - The value of the PDF.
    pub fn set_to_scattering(&mut self, event: ScatteringEvent, probability: Float) {
        debug_assert!(event != ScatteringEvent::Absorption);
        self.event = event;
        self.probability = probability;
    }

    /// Marks the sample as absorbed. No incoming direction is produced.
    pub fn set_to_absorption(&mut self) {
        self.event = ScatteringEvent::Absorption;
        self.probability = 0.0;
    }

    /// Derives the incoming direction derivatives from the outgoing ones by
    /// mirror reflection about the shading normal.
    pub fn compute_reflected_differentials(&mut self) {
        if !self.outgoing.has_derivatives() {
            self.incoming = Dual3f::new(self.incoming.get_value());
            return;
        }

        let n = self.shading_basis.get_normal();
        let wo = self.outgoing.get_value();
        let c = wo.dot(&n);

        let reflect_derivative = |dwo: Vector3f, dn: Vector3f| -> Vector3f {
            let dc = dwo.dot(&n) + wo.dot(&dn);
            -dwo + 2.0 * (dc * n + c * dn)
        };

        let dx = reflect_derivative(self.outgoing.get_dx(), self.dndx);
        let dy = reflect_derivative(self.outgoing.get_dy(), self.dndy);
        self.incoming = Dual3f::with_derivatives(self.incoming.get_value(), dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn new_sample_is_absorption() {
        let s = BSDFSample::new(&ShadingPoint::default(), Dual3f::new(Vector3f::Y_AXIS));
        assert!(s.is_absorption());
        assert_eq!(s.probability, 0.0);
        assert!(s.value.is_black());
    }

    #[test]
    fn scattering_then_absorption() {
        let mut s = BSDFSample::new(&ShadingPoint::default(), Dual3f::new(Vector3f::Y_AXIS));
        s.set_to_scattering(ScatteringEvent::Glossy, 0.5);
        assert_eq!(s.get_event(), ScatteringEvent::Glossy);
        s.set_to_absorption();
        assert!(s.is_absorption());
        assert_eq!(s.probability, 0.0);
    }

    #[test]
    fn reflected_differentials_flat_surface() {
        let wo = Vector3f::new(0.6, 0.8, 0.0);
        let outgoing = Dual3f::with_derivatives(
            wo,
            Vector3f::new(0.1, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 0.2),
        );
        let mut s = BSDFSample::new(&ShadingPoint::default(), outgoing);
        s.incoming = Dual3f::new(Vector3f::new(-0.6, 0.8, 0.0));
        s.compute_reflected_differentials();

        assert!(s.incoming.has_derivatives());
        assert_eq!(s.incoming.get_value(), Vector3f::new(-0.6, 0.8, 0.0));
        assert_eq!(s.incoming.get_dx(), Vector3f::new(-0.1, 0.0, 0.0));
        assert_eq!(s.incoming.get_dy(), Vector3f::new(0.0, 0.0, -0.2));
    }

    #[test]
    fn reflected_differentials_curved_surface() {
        let wo = Vector3f::new(0.0, 1.0, 0.0);
        let outgoing = Dual3f::with_derivatives(wo, Vector3f::ZERO, Vector3f::ZERO);
        let sp = ShadingPoint::default()
            .with_normal_derivatives(Vector3f::new(0.1, 0.0, 0.0), Vector3f::ZERO);
        let mut s = BSDFSample::new(&sp, outgoing);
        s.incoming = Dual3f::new(wo);
        s.compute_reflected_differentials();

        // dc = 0 and c = 1 so dwi = 2 dn.
        let dx = s.incoming.get_dx();
        assert!(approx_eq!(Float, dx.x, 0.2, epsilon = 1e-6));
        assert_eq!(dx.y, 0.0);
        assert_eq!(s.incoming.get_dy(), Vector3f::ZERO);
    }

    #[test]
    fn no_outgoing_derivatives_means_none_incoming() {
        let mut s = BSDFSample::new(&ShadingPoint::default(), Dual3f::new(Vector3f::Y_AXIS));
        s.incoming = Dual3f::new(Vector3f::Y_AXIS);
        s.compute_reflected_differentials();
        assert!(!s.incoming.has_derivatives());
    }
}
