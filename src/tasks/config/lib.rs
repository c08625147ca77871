#![allow(non_snake_case)]

// Crate where the serde_yaml code for the configuration is monomorphized.
//
// The functions here also make use of serde_ignored to catch typos in the config.

// NOTE: Please make sure to use the YamlRead trait!
//       DO NOT USE serde_yaml::from_{reader,value,etc.} OUTSIDE THIS CRATE.

#[macro_use] extern crate log;

use std::io::Read;
use serde::{Serialize, Deserialize};

pub use linfit_regression::ChiSquareKind;

mod validation;
pub use crate::validation::ValidatedSettings;

/// Provides an alternative to serde_yaml::from_reader which reports
/// unrecognized keys.
pub trait YamlRead: for <'de> Deserialize<'de> {
    fn from_reader(mut r: impl Read) -> Result<Self, serde_yaml::Error>
    { YamlRead::from_dyn_reader(&mut r) }

    fn from_dyn_reader(r: &mut dyn Read) -> Result<Self, serde_yaml::Error> {
        // serde_ignored needs a Deserializer, which serde_yaml::Value is.
        Self::from_value(value_from_dyn_reader(r)?)
    }

    fn from_value(value: serde_yaml::Value) -> Result<Self, serde_yaml::Error>;
}

macro_rules! derive_yaml_read {
    ($Type:ty) => {
        impl YamlRead for $Type {
            fn from_value(value: serde_yaml::Value) -> Result<$Type, serde_yaml::Error> {
                serde_ignored::deserialize(
                    value,
                    |path| warn!("Unused config item (possible typo?): {}", path),
                )
            }
        }
    };
}

derive_yaml_read!{serde_yaml::Value}

fn value_from_dyn_reader(r: &mut dyn Read) -> Result<serde_yaml::Value, serde_yaml::Error>
{ serde_yaml::from_reader(r) }

/// camelCase spellings accepted for `Settings` keys, with their kebab-case names.
const CAMEL_CASE_KEYS: &[(&str, &str)] = &[
    ("trueIntercept", "true-intercept"),
    ("trueSlope", "true-slope"),
    ("noiseScales", "noise-scales"),
    ("replicateCount", "replicate-count"),
    ("chiSquare", "chi-square"),
];

/// Respell camelCase top-level keys in kebab-case, so that documents that
/// spell a setting differently can still be merged key by key.
///
/// A camelCase key is left alone if its kebab-case spelling is also present,
/// so that deserialization still reports the duplicate.
pub fn canonicalize_keys(value: &mut serde_yaml::Value) {
    use serde_yaml::Value;

    if let Value::Mapping(mapping) = value {
        for &(camel, kebab) in CAMEL_CASE_KEYS {
            let camel = Value::String(camel.to_owned());
            let kebab = Value::String(kebab.to_owned());
            if mapping.contains_key(&kebab) {
                continue;
            }
            if let Some(item) = mapping.remove(&camel) {
                mapping.insert(kebab, item);
            }
        }
    }
}

/// Every field may be omitted, in which case the eight-point reference
/// scenario is used.  The camelCase spellings are accepted as aliases.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Intercept of the line that data is generated from.
    #[serde(default = "_settings__true_intercept", alias = "trueIntercept")]
    pub true_intercept: f64,

    /// Slope of the line that data is generated from.
    #[serde(default = "_settings__true_slope", alias = "trueSlope")]
    pub true_slope: f64,

    /// The x values.
    #[serde(default = "_settings__grid")]
    pub grid: Vec<f64>,

    /// Standard deviation of the generated noise, one per grid point.
    #[serde(default = "_settings__noise_scales", alias = "noiseScales")]
    pub noise_scales: Vec<f64>,

    /// Number of measurements simulated at each grid point.
    #[serde(default = "_settings__replicate_count", alias = "replicateCount")]
    pub replicate_count: usize,

    /// `None` draws a seed from system entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default, alias = "chiSquare")]
    pub chi_square: ChiSquareKind,
}
derive_yaml_read!{Settings}

fn _settings__true_intercept() -> f64 { 1.0 }
fn _settings__true_slope() -> f64 { 2.0 }
fn _settings__grid() -> Vec<f64> { (1..=8).map(f64::from).collect() }
fn _settings__noise_scales() -> Vec<f64> { vec![1.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0] }
fn _settings__replicate_count() -> usize { 10 }

impl Default for Settings {
    fn default() -> Self { from_empty_mapping().unwrap() }
}

fn from_empty_mapping<T: for<'de> Deserialize<'de>>() -> serde_yaml::Result<T> {
    use serde_yaml::{from_value, Value, Mapping};
    from_value(Value::Mapping(Mapping::new()))
}
