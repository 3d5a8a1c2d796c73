//! Parameter Sets
//!
//! String keyed dictionaries used for model metadata and for the parameters a
//! model is created with.

use crate::pbrt::*;
use crate::spectrum::*;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// String dictionary describing a model or one of its inputs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dictionary {
    strings: HashMap<String, String>,
}

impl Dictionary {
    /// Create an empty `Dictionary`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dictionary with a key set.
    ///
    /// * `key`   - The key.
    /// * `value` - The value.
    pub fn insert<V: ToString>(mut self, key: &str, value: V) -> Self {
        self.strings.insert(key.to_string(), value.to_string());
        self
    }

    /// Returns the value for a key.
    ///
    /// * `key` - The key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(|s| s.as_str())
    }

    /// Returns true if the key is present.
    ///
    /// * `key` - The key.
    pub fn contains(&self, key: &str) -> bool {
        self.strings.contains_key(key)
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.strings.keys().collect();
        keys.sort();
        write!(f, "{{")?;
        for (i, k) in keys.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: \"{}\"", k, self.strings[*k])?;
        }
        write!(f, "}}")
    }
}

/// Ordered list of dictionaries, one per model input.
pub type DictionaryArray = Vec<Dictionary>;

/// Parameters a model instance is created with. Values are stored as strings
/// and parsed on lookup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamArray {
    params: HashMap<String, String>,
}

impl ParamArray {
    /// Create an empty `ParamArray`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the array with a parameter set.
    ///
    /// * `name`  - Parameter name.
    /// * `value` - Parameter value.
    pub fn insert<V: ToString>(mut self, name: &str, value: V) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    /// Returns true if the parameter is present.
    ///
    /// * `name` - Parameter name.
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Returns the raw string value of a parameter.
    ///
    /// * `name` - Parameter name.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Returns a parameter parsed as `T`, or `default` if it is missing or
    /// cannot be parsed.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn get_optional<T>(&self, name: &str, default: T) -> T
    where
        T: FromStr,
    {
        match self.params.get(name) {
            Some(s) => match s.trim().parse::<T>() {
                Ok(v) => v,
                Err(_) => {
                    warn!("Invalid value '{}' for parameter '{}'; using default.", s, name);
                    default
                }
            },
            None => default,
        }
    }

    /// Returns a parameter parsed as a spectrum. Accepts either a single value
    /// or three whitespace separated RGB values.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn get_spectrum(&self, name: &str, default: Spectrum) -> Spectrum {
        match self.params.get(name) {
            Some(s) => match parse_spectrum(s) {
                Some(v) => v,
                None => {
                    warn!("Invalid spectrum '{}' for parameter '{}'; using default.", s, name);
                    default
                }
            },
            None => default,
        }
    }
}

/// Parses "v" or "r g b" into a spectrum.
///
/// * `s` - The string.
fn parse_spectrum(s: &str) -> Option<Spectrum> {
    let values: Vec<Float> = s
        .split_whitespace()
        .map(|t| t.parse::<Float>())
        .collect::<Result<Vec<Float>, _>>()
        .ok()?;

    match values.as_slice() {
        [v] => Some(Spectrum::new(*v)),
        [r, g, b] => Some(Spectrum::from_rgb(*r, *g, *b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_insert_and_get() {
        let d = Dictionary::new().insert("name", "model").insert("label", "Model");
        assert_eq!(d.get("name"), Some("model"));
        assert_eq!(d.get("label"), Some("Model"));
        assert_eq!(d.get("missing"), None);
        assert_eq!(d.len(), 2);
        assert_eq!(d.to_string(), "{label: \"Model\", name: \"model\"}");
    }

    #[test]
    fn param_array_parses_values() {
        let p = ParamArray::new().insert("roughness", 0.25).insert("mode", "ggx");
        assert_eq!(p.get_optional::<Float>("roughness", 0.1), 0.25);
        assert_eq!(p.get_optional::<Float>("missing", 0.1), 0.1);
        assert_eq!(p.get_string("mode"), Some("ggx"));
    }

    #[test]
    fn param_array_falls_back_on_bad_value() {
        let p = ParamArray::new().insert("roughness", "rough");
        assert_eq!(p.get_optional::<Float>("roughness", 0.1), 0.1);
    }

    #[test]
    fn param_array_spectra() {
        let p = ParamArray::new()
            .insert("grey", "0.5")
            .insert("rgb", "0.1 0.2 0.3")
            .insert("bad", "0.1 0.2");
        assert_eq!(p.get_spectrum("grey", Spectrum::ONE), Spectrum::new(0.5));
        assert_eq!(p.get_spectrum("rgb", Spectrum::ONE), Spectrum::from_rgb(0.1, 0.2, 0.3));
        assert_eq!(p.get_spectrum("bad", Spectrum::ONE), Spectrum::ONE);
    }
}
