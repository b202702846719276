//! Flat named-parameter bag consumed by simulator constructors.
//!
//! Values are kept as JSON so that any driver able to produce a JSON object
//! (a config file, command-line overrides, a host runtime) can hand options
//! over without a schema. Typed accessors do the conversion and report
//! problems as [`SimulationError`]s naming the offending option.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SimulationError, SimulationResult};

/// Named scalar options for one simulator instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamBag {
    values: HashMap<String, Value>,
}

impl ParamBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option (builder pattern).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set an option, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Raw value of an option.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether an option is set.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of options set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no option is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy every option of `other` into this bag, overriding duplicates.
    pub fn merge(&mut self, other: ParamBag) {
        self.values.extend(other.values);
    }

    /// Required integer option.
    pub fn get_i64(&self, name: &str) -> SimulationResult<i64> {
        to_i64(name, self.require(name)?)
    }

    /// Optional integer option.
    pub fn get_i64_or(&self, name: &str, default: i64) -> SimulationResult<i64> {
        self.get(name).map_or(Ok(default), |v| to_i64(name, v))
    }

    /// Required non-negative integer option.
    pub fn get_usize(&self, name: &str) -> SimulationResult<usize> {
        to_usize(name, self.get_i64(name)?)
    }

    /// Required real option. Integers are accepted.
    pub fn get_f64(&self, name: &str) -> SimulationResult<f64> {
        to_f64(name, self.require(name)?)
    }

    /// Optional real option.
    pub fn get_f64_or(&self, name: &str, default: f64) -> SimulationResult<f64> {
        self.get(name).map_or(Ok(default), |v| to_f64(name, v))
    }

    /// Optional flag. Accepts `true`/`false` or an integer (nonzero = true).
    pub fn get_bool_or(&self, name: &str, default: bool) -> SimulationResult<bool> {
        match self.get(name) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(v) => to_i64(name, v).map(|i| i != 0),
        }
    }

    fn require(&self, name: &str) -> SimulationResult<&Value> {
        self.get(name).ok_or_else(|| SimulationError::MissingParameter {
            name: name.to_string(),
        })
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParamBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn invalid(name: &str, message: impl Into<String>) -> SimulationError {
    SimulationError::InvalidParameter {
        name: name.to_string(),
        message: message.into(),
    }
}

fn to_i64(name: &str, value: &Value) -> SimulationResult<i64> {
    if let Some(i) = value.as_i64() {
        return Ok(i);
    }
    // Integral floats such as `4.0` are common in generated configs.
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(invalid(name, format!("expected an integer, got {value}"))),
    }
}

fn to_usize(name: &str, value: i64) -> SimulationResult<usize> {
    usize::try_from(value)
        .map_err(|_| invalid(name, format!("expected a non-negative integer, got {value}")))
}

fn to_f64(name: &str, value: &Value) -> SimulationResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| invalid(name, format!("expected a number, got {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_accessors() {
        let bag = ParamBag::new()
            .with("system_size", 16)
            .with("eta", 0.25)
            .with("obc", 1)
            .with("alpha", 3);

        assert_eq!(bag.get_usize("system_size").unwrap(), 16);
        assert_eq!(bag.get_f64("eta").unwrap(), 0.25);
        assert!(bag.get_bool_or("obc", false).unwrap());
        assert_eq!(bag.get_f64_or("alpha", 2.0).unwrap(), 3.0);
        assert_eq!(bag.get_f64_or("missing", 2.0).unwrap(), 2.0);
    }

    #[test]
    fn test_missing_required() {
        let bag = ParamBag::new();
        let err = bag.get_f64("eta").unwrap_err();
        assert!(matches!(err, SimulationError::MissingParameter { ref name } if name == "eta"));
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let bag = ParamBag::new().with("k", "five").with("n", -3);
        assert!(matches!(
            bag.get_usize("k"),
            Err(SimulationError::InvalidParameter { .. })
        ));
        assert!(matches!(
            bag.get_usize("n"),
            Err(SimulationError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_integral_float_accepted() {
        let bag = ParamBag::new().with("dim", 2.0).with("k", 2.5);
        assert_eq!(bag.get_i64("dim").unwrap(), 2);
        assert!(bag.get_i64("k").is_err());
    }

    #[test]
    fn test_bool_forms() {
        let bag = ParamBag::new().with("a", true).with("b", 0);
        assert!(bag.get_bool_or("a", false).unwrap());
        assert!(!bag.get_bool_or("b", true).unwrap());
        assert!(bag.get_bool_or("c", true).unwrap());
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let bag: ParamBag =
            serde_json::from_value(json!({"system_size": 8, "eta": 0.1})).unwrap();
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.get_usize("system_size").unwrap(), 8);
    }

    #[test]
    fn test_merge_overrides() {
        let mut base: ParamBag = [("eta", json!(0.1)), ("p", json!(0.5))].into_iter().collect();
        base.merge(ParamBag::new().with("eta", 0.3));
        assert_eq!(base.get_f64("eta").unwrap(), 0.3);
        assert_eq!(base.get_f64("p").unwrap(), 0.5);
    }
}
