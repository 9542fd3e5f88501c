use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use cadence_core::Duration;

/// Arbitrary property/value pairs carried by a keyframe step.
pub type PropertyMap = BTreeMap<String, Value>;

/// A value snapshot at a normalized offset in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeStep {
    pub offset: f64,
    #[serde(flatten)]
    pub properties: PropertyMap,
}

impl KeyframeStep {
    pub fn new(offset: f64, properties: PropertyMap) -> Self {
        Self { offset, properties }
    }
}

/// How an effect holds its values outside its active interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    None,
    #[default]
    Forwards,
    Backwards,
    Both,
}

/// Options handed to the animation engine alongside the compiled steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionOptions {
    /// Derived from the largest time key; never set by callers.
    pub duration: Duration,
    pub pseudo_element: Option<String>,
    /// Always `Forwards` so the end state persists.
    pub fill: Fill,
    /// Caller-supplied keys that are not time markers (easing, composite, ...).
    #[serde(flatten)]
    pub extra: PropertyMap,
}

impl CompositionOptions {
    pub fn new(pseudo_element: Option<String>) -> Self {
        Self {
            duration: Duration::zero(),
            pseudo_element,
            fill: Fill::Forwards,
            extra: PropertyMap::new(),
        }
    }

    /// Merge one non-time entry from a keyed description.
    pub(crate) fn merge_option(&mut self, key: &str, value: &Value) {
        match key {
            "pseudoElement" => {
                self.pseudo_element = value.as_str().map(str::to_string);
            }
            "duration" | "fill" => {
                tracing::debug!("ignoring caller-supplied '{}' option; it is derived", key);
            }
            _ => {
                self.extra.insert(key.to_string(), value.clone());
            }
        }
    }
}

/// A declarative keyed description: numeric keys are times in milliseconds whose
/// values are property maps, every other key is an option.
///
/// ```json
/// { "0": { "opacity": 0 }, "400": { "opacity": 1 }, "easing": "ease-out" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyedDescription(BTreeMap<String, Value>);

impl KeyedDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a description from a JSON object.
    pub fn from_json(source: &str) -> cadence_core::CadenceResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for KeyedDescription {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Parse a description key as a time marker. Non-finite numbers are not times.
pub(crate) fn parse_time_key(key: &str) -> Option<f64> {
    key.trim().parse::<f64>().ok().filter(|t| t.is_finite())
}

/// Typed builder for a [`KeyedDescription`].
#[derive(Debug, Clone, Default)]
pub struct Keyframes {
    description: KeyedDescription,
}

impl Keyframes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step at `time_ms`.
    pub fn at<I, K, V>(mut self, time_ms: f64, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let map: serde_json::Map<String, Value> = properties
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.description
            .insert(format!("{}", time_ms), Value::Object(map));
        self
    }

    /// Add a passthrough option such as `easing`.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.description.insert(key, value.into());
        self
    }

    /// Select a sub-part of the target, overriding the compile argument.
    pub fn pseudo(self, selector: impl Into<String>) -> Self {
        self.option("pseudoElement", Value::String(selector.into()))
    }

    pub fn build(self) -> KeyedDescription {
        self.description
    }
}

impl From<Keyframes> for KeyedDescription {
    fn from(builder: Keyframes) -> Self {
        builder.build()
    }
}
