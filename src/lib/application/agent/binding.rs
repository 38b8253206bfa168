//! Positional binding of raw directive tokens onto a tool's parameter list.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::literal::parse_literal;
use crate::domain::{ArgValue, BoundArguments, ParamType, ParameterSpec};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot convert '{value}' for parameter '{parameter}' to {expected}: {reason}")]
pub struct CoercionError {
    pub parameter: String,
    pub expected: String,
    pub value: String,
    pub reason: String,
}

/// Pairs the i-th raw argument with the i-th declared parameter.
///
/// Parameters past the end of `raw_args` stay unbound; surplus raw
/// arguments are dropped.
pub fn bind_arguments(
    parameters: &[ParameterSpec],
    raw_args: &[String],
) -> Result<BoundArguments, CoercionError> {
    let mut bound = BoundArguments::new();
    let mut remaining = raw_args.iter();

    for param in parameters {
        let Some(raw) = remaining.next() else {
            break;
        };
        bound.insert(param.name.clone(), coerce(param, raw)?);
    }

    let surplus = remaining.count();
    if surplus > 0 {
        debug!(surplus, "Dropping raw arguments beyond the declared parameters");
    }
    for param in parameters.iter().filter(|param| param.required) {
        if !bound.contains(&param.name) {
            warn!(parameter = %param.name, "Required parameter left unbound");
        }
    }
    Ok(bound)
}

pub fn coerce(param: &ParameterSpec, raw: &str) -> Result<ArgValue, CoercionError> {
    let fail = |reason: String| CoercionError {
        parameter: param.name.clone(),
        expected: param.declared_type.to_string(),
        value: raw.to_string(),
        reason,
    };

    match &param.declared_type {
        ParamType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(ArgValue::Integer)
            .map_err(|err| fail(err.to_string())),
        ParamType::Number => raw
            .trim()
            .parse::<f64>()
            .map(ArgValue::Float)
            .map_err(|err| fail(err.to_string())),
        ParamType::Array => decode_array(raw).map(ArgValue::Array).map_err(fail),
        ParamType::String
        | ParamType::Boolean
        | ParamType::Unknown
        | ParamType::Other(_) => Ok(ArgValue::Text(raw.to_string())),
    }
}

fn decode_array(raw: &str) -> Result<Vec<Value>, String> {
    let decoded = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(json_err) => parse_literal(raw)
            .map_err(|literal_err| format!("not JSON ({json_err}) nor a literal ({literal_err})"))?,
    };
    match decoded {
        Value::Array(items) => Ok(items),
        other => Err(format!("expected a sequence, found {other}")),
    }
}
