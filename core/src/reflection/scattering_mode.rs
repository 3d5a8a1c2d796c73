//! Scattering Modes

use bitflags::bitflags;

bitflags! {
    /// Stores combination of flags for the scattering modes a scattering
    /// function may be evaluated or sampled for.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ScatteringMode: u8 {
        const DIFFUSE = 1;
        const GLOSSY = 2;
        const SPECULAR = 4;
        const ALL = Self::DIFFUSE.bits() | Self::GLOSSY.bits() | Self::SPECULAR.bits();
    }
}

impl Default for ScatteringMode {
    fn default() -> Self {
        Self::ALL
    }
}

impl ScatteringMode {
    /// Returns true if the DIFFUSE flag is set.
    pub fn has_diffuse(&self) -> bool {
        self.contains(Self::DIFFUSE)
    }

    /// Returns true if the GLOSSY flag is set.
    pub fn has_glossy(&self) -> bool {
        self.contains(Self::GLOSSY)
    }

    /// Returns true if the SPECULAR flag is set.
    pub fn has_specular(&self) -> bool {
        self.contains(Self::SPECULAR)
    }
}

bitflags! {
    /// Stores combination of flags for the hemispheres a scattering function
    /// distributes light into.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct BSDFType: u8 {
        const REFLECTIVE = 1;
        const TRANSMISSIVE = 2;
        const ALL = Self::REFLECTIVE.bits() | Self::TRANSMISSIVE.bits();
    }
}

/// The kind of event produced by sampling a scattering function.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ScatteringEvent {
    /// No direction was produced; the path terminates.
    #[default]
    Absorption,

    /// Diffuse reflection.
    Diffuse,

    /// Glossy reflection.
    Glossy,

    /// Perfect specular reflection.
    Specular,
}

impl ScatteringEvent {
    /// Returns the scattering mode matching the event.
    pub fn mode(&self) -> ScatteringMode {
        match self {
            Self::Absorption => ScatteringMode::empty(),
            Self::Diffuse => ScatteringMode::DIFFUSE,
            Self::Glossy => ScatteringMode::GLOSSY,
            Self::Specular => ScatteringMode::SPECULAR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_each_mode() {
        let all = ScatteringMode::ALL;
        assert!(all.has_diffuse() && all.has_glossy() && all.has_specular());
        assert_eq!(ScatteringMode::default(), all);
    }

    #[test]
    fn masking_removes_glossy() {
        let m = ScatteringMode::ALL - ScatteringMode::GLOSSY;
        assert!(!m.has_glossy());
        assert!(m.has_diffuse());
    }

    #[test]
    fn event_modes() {
        assert!(ScatteringEvent::default().mode().is_empty());
        assert_eq!(ScatteringEvent::Glossy.mode(), ScatteringMode::GLOSSY);
        assert_eq!(ScatteringEvent::Diffuse.mode(), ScatteringMode::DIFFUSE);
    }

    #[test]
    fn bsdf_type_all() {
        assert!(BSDFType::ALL.contains(BSDFType::REFLECTIVE | BSDFType::TRANSMISSIVE));
    }
}
