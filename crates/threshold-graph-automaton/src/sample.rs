//! Named measurement values handed to whoever drives a simulator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::network::BooleanNetwork;

/// Signed mean node value.
pub const ORDER: &str = "order";
/// Absolute mean node value.
pub const ORDER_ABS: &str = "order_abs";
/// Full per-node value vector.
pub const SPINS: &str = "spins";

/// One emitted value: a scalar or an ordered array of reals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    Scalar(f64),
    Array(Vec<f64>),
}

impl SampleValue {
    /// Scalar content, if any.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            SampleValue::Scalar(x) => Some(*x),
            SampleValue::Array(_) => None,
        }
    }

    /// Array content, if any.
    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            SampleValue::Scalar(_) => None,
            SampleValue::Array(xs) => Some(xs),
        }
    }
}

/// Named values from one measurement, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Samples {
    values: BTreeMap<String, SampleValue>,
}

impl Samples {
    /// Empty sample set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `name`, replacing any previous one.
    pub fn emplace(&mut self, name: impl Into<String>, value: SampleValue) {
        self.values.insert(name.into(), value);
    }

    /// Value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&SampleValue> {
        self.values.get(name)
    }

    /// Scalar stored under `name`.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(SampleValue::as_scalar)
    }

    /// Array stored under `name`.
    pub fn array(&self, name: &str) -> Option<&[f64]> {
        self.get(name).and_then(SampleValue::as_array)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SampleValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Which forms of the order parameter a topology reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderForm {
    /// `order` (signed) and `order_abs`.
    SignedAndAbsolute,
    /// `order_abs` only.
    AbsoluteOnly,
}

/// Add the order parameter in the requested form.
pub fn add_order_sample(samples: &mut Samples, network: &BooleanNetwork, form: OrderForm) {
    let s = network.order();
    if form == OrderForm::SignedAndAbsolute {
        samples.emplace(ORDER, SampleValue::Scalar(s));
    }
    samples.emplace(ORDER_ABS, SampleValue::Scalar(s.abs()));
}

/// Add every node value, in index order.
pub fn add_configuration_samples(samples: &mut Samples, network: &BooleanNetwork) {
    let spins = network
        .connections
        .values()
        .iter()
        .map(|&v| f64::from(v))
        .collect();
    samples.emplace(SPINS, SampleValue::Array(spins));
}

/// Full sample set for a network.
pub fn take_samples(network: &BooleanNetwork, form: OrderForm, configurations: bool) -> Samples {
    let mut samples = Samples::new();
    add_order_sample(&mut samples, network, form);
    if configurations {
        add_configuration_samples(&mut samples, network);
    }
    samples
}
