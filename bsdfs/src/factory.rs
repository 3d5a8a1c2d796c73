//! BSDF Factories

use crate::al_surface_layer::*;
use crate::lambertian::*;
use crate::model::*;
use layered_core::paramset::*;
use layered_core::reflection::*;

/// Exposes the identity and metadata of a scattering model and constructs
/// instances of it.
pub trait BSDFFactory: Send + Sync {
    /// Returns the model identifier.
    fn get_model(&self) -> &'static str;

    /// Returns the model metadata.
    fn get_model_metadata(&self) -> Dictionary;

    /// Returns metadata for the model inputs.
    fn get_input_metadata(&self) -> DictionaryArray;

    /// Create a new instance of the model.
    ///
    /// * `name`   - Name of the instance.
    /// * `params` - Instance parameters.
    fn create(&self, name: &str, params: &ParamArray) -> BSDFModel;
}

/// Factory for `AlSurfaceLayerBRDF`.
#[derive(Copy, Clone, Debug, Default)]
pub struct AlSurfaceLayerBRDFFactory;

impl AlSurfaceLayerBRDFFactory {
    /// Create a new instance without going through a factory object.
    ///
    /// * `name`   - Name of the instance.
    /// * `_params` - Instance parameters (the layer reads its parameters per
    ///               closure).
    pub fn static_create(name: &str, _params: &ParamArray) -> BSDFModel {
        debug!("Creating {} '{}'.", AL_SURFACE_LAYER_BRDF_MODEL, name);
        BSDFModel::AlSurfaceLayer(BSDFWrapper::new(name, AlSurfaceLayerBRDF))
    }
}

impl BSDFFactory for AlSurfaceLayerBRDFFactory {
    fn get_model(&self) -> &'static str {
        AL_SURFACE_LAYER_BRDF_MODEL
    }

    fn get_model_metadata(&self) -> Dictionary {
        Dictionary::new()
            .insert("name", AL_SURFACE_LAYER_BRDF_MODEL)
            .insert("label", "AlSurface Layer BRDF")
    }

    fn get_input_metadata(&self) -> DictionaryArray {
        DictionaryArray::new()
    }

    fn create(&self, name: &str, params: &ParamArray) -> BSDFModel {
        Self::static_create(name, params)
    }
}

/// Factory for `LambertianBRDF`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LambertianBRDFFactory;

impl LambertianBRDFFactory {
    /// Create a new instance without going through a factory object.
    ///
    /// * `name`    - Name of the instance.
    /// * `_params` - Instance parameters (unused).
    pub fn static_create(name: &str, _params: &ParamArray) -> BSDFModel {
        debug!("Creating {} '{}'.", LAMBERTIAN_BRDF_MODEL, name);
        BSDFModel::Lambertian(BSDFWrapper::new(name, LambertianBRDF))
    }
}

impl BSDFFactory for LambertianBRDFFactory {
    fn get_model(&self) -> &'static str {
        LAMBERTIAN_BRDF_MODEL
    }

    fn get_model_metadata(&self) -> Dictionary {
        Dictionary::new()
            .insert("name", LAMBERTIAN_BRDF_MODEL)
            .insert("label", "Lambertian BRDF")
    }

    fn get_input_metadata(&self) -> DictionaryArray {
        vec![
            Dictionary::new()
                .insert("name", "reflectance")
                .insert("label", "Reflectance")
                .insert("type", "colormap")
                .insert("default", "0.5"),
            Dictionary::new()
                .insert("name", "reflectance_multiplier")
                .insert("label", "Reflectance Multiplier")
                .insert("type", "colormap")
                .insert("default", "1.0"),
        ]
    }

    fn create(&self, name: &str, params: &ParamArray) -> BSDFModel {
        Self::static_create(name, params)
    }
}

lazy_static! {
    /// Factories of all known models.
    static ref BSDF_FACTORIES: Vec<&'static dyn BSDFFactory> = {
        let factories: Vec<&'static dyn BSDFFactory> =
            vec![&LambertianBRDFFactory, &AlSurfaceLayerBRDFFactory];
        for factory in factories.iter() {
            info!("Registered BSDF model '{}'.", factory.get_model());
        }
        factories
    };
}

/// Returns the factory for a model.
///
/// * `model` - The model identifier.
pub fn lookup(model: &str) -> Option<&'static dyn BSDFFactory> {
    let factory = BSDF_FACTORIES.iter().find(|f| f.get_model() == model).copied();
    if factory.is_none() {
        debug!("Unknown BSDF model '{}'.", model);
    }
    factory
}

/// Returns the factories of all known models.
pub fn get_factories() -> &'static [&'static dyn BSDFFactory] {
    &BSDF_FACTORIES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_factory_metadata() {
        let factory = AlSurfaceLayerBRDFFactory;
        assert_eq!(factory.get_model(), "al_surface_layer_brdf");

        let metadata = factory.get_model_metadata();
        assert_eq!(metadata.get("name"), Some("al_surface_layer_brdf"));
        assert_eq!(metadata.get("label"), Some("AlSurface Layer BRDF"));
        assert_eq!(metadata.len(), 2);
        assert!(factory.get_input_metadata().is_empty());
    }

    #[test]
    fn layer_instances_advertise_everything() {
        let params = ParamArray::new();
        let created = AlSurfaceLayerBRDFFactory.create("coat", &params);
        let static_created = AlSurfaceLayerBRDFFactory::static_create("coat", &params);

        for model in [created, static_created] {
            assert_eq!(model.get_name(), "coat");
            assert_eq!(model.get_model(), AL_SURFACE_LAYER_BRDF_MODEL);
            assert_eq!(model.get_type(), BSDFType::ALL);
            assert_eq!(model.get_modes(), ScatteringMode::ALL);
        }
    }

    #[test]
    fn lambertian_factory_inputs() {
        let inputs = LambertianBRDFFactory.get_input_metadata();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].get("name"), Some("reflectance"));
        assert_eq!(inputs[1].get("name"), Some("reflectance_multiplier"));

        let model = LambertianBRDFFactory.create("matte", &ParamArray::new());
        assert_eq!(model.get_modes(), ScatteringMode::DIFFUSE);
        assert_eq!(model.get_type(), BSDFType::REFLECTIVE);
    }

    #[test]
    fn registrar_lookup() {
        let layer = lookup("al_surface_layer_brdf");
        assert!(layer.is_some());
        assert_eq!(layer.map(|f| f.get_model()), Some(AL_SURFACE_LAYER_BRDF_MODEL));
        assert!(lookup(LAMBERTIAN_BRDF_MODEL).is_some());
        assert!(lookup("no_such_brdf").is_none());
        assert_eq!(get_factories().len(), 2);
    }
}
