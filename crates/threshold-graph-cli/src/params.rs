//! Parameter bag assembly from a JSON file and `key=value` overrides.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use threshold_graph_automaton::ParamBag;

/// Parse one `key=value` override.
///
/// The value is read as JSON (`0.1`, `true`, `3`) and falls back to a plain
/// string when that fails.
pub fn parse_override(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("expected KEY=VALUE, got `{raw}`");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("empty parameter name in `{raw}`");
    }
    let value = value.trim();
    let parsed = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), parsed))
}

/// Build the bag: file contents first, then overrides in order.
pub fn load_params(file: Option<&Path>, overrides: &[String]) -> Result<ParamBag> {
    let mut bag = match file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<ParamBag>(&text)
                .with_context(|| format!("{} is not a JSON object of parameters", path.display()))?
        }
        None => ParamBag::new(),
    };

    for raw in overrides {
        let (key, value) = parse_override(raw)?;
        bag.insert(key, value);
    }

    Ok(bag)
}
