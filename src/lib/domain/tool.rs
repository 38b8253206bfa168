//! Tool descriptors as advertised by the tool host.
//!
//! A descriptor is read once from a `tools/list` entry and never mutated
//! afterwards. Parameter order follows the order of the `properties` object
//! in the host's input schema, which is what positional binding relies on.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Description used when the host omits one.
pub const MISSING_DESCRIPTION: &str = "No description available";

/// Declared JSON-schema type of a tool parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Array,
    Boolean,
    /// Type key absent from the property schema.
    Unknown,
    /// Any type name this client does not coerce specially.
    Other(String),
}

impl ParamType {
    pub fn from_schema(declared: Option<&str>) -> Self {
        match declared {
            None => ParamType::Unknown,
            Some("string") => ParamType::String,
            Some("integer") => ParamType::Integer,
            Some("number") => ParamType::Number,
            Some("array") => ParamType::Array,
            Some("boolean") => ParamType::Boolean,
            Some(other) => ParamType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Array => "array",
            ParamType::Boolean => "boolean",
            ParamType::Unknown => "unknown",
            ParamType::Other(name) => name.as_str(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub declared_type: ParamType,
    pub required: bool,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, declared_type: ParamType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
    /// Whether the input schema carried a `properties` object, even an empty one.
    pub declares_properties: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("tool entry is not a JSON object")]
    NotAnObject,
    #[error("tool entry has no name")]
    MissingName,
    #[error("tool '{tool}' has an invalid input schema: {reason}")]
    InvalidSchema { tool: String, reason: String },
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ParameterSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            declares_properties: !parameters.is_empty(),
            parameters,
        }
    }

    /// Builds a descriptor from one element of a `tools/list` result.
    pub fn from_listing(entry: &Value) -> Result<Self, DescriptorError> {
        let object = entry.as_object().ok_or(DescriptorError::NotAnObject)?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(DescriptorError::MissingName)?
            .to_string();
        let description = object
            .get("description")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(MISSING_DESCRIPTION)
            .to_string();

        let parameters = match object.get("inputSchema") {
            None | Some(Value::Null) => None,
            Some(schema) => parse_parameters(&name, schema)?,
        };

        Ok(Self {
            name,
            description,
            declares_properties: parameters.is_some(),
            parameters: parameters.unwrap_or_default(),
        })
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|param| param.name == name)
    }

    /// `name(param: type, ...)` as shown in the prompt catalog. A schema
    /// with an empty `properties` object renders as `name()`.
    pub fn signature(&self) -> String {
        if !self.declares_properties {
            return format!("{}(no parameters)", self.name);
        }
        let params = self
            .parameters
            .iter()
            .map(|param| format!("{}: {}", param.name, param.declared_type))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name, params)
    }
}

/// `None` when the schema declares no `properties` at all.
fn parse_parameters(
    tool: &str,
    schema: &Value,
) -> Result<Option<Vec<ParameterSpec>>, DescriptorError> {
    let invalid = |reason: &str| DescriptorError::InvalidSchema {
        tool: tool.to_string(),
        reason: reason.to_string(),
    };

    let schema = schema
        .as_object()
        .ok_or_else(|| invalid("inputSchema is not an object"))?;
    let properties = match schema.get("properties") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(invalid("properties is not an object")),
    };

    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut parameters = Vec::with_capacity(properties.len());
    for (name, info) in properties {
        let info = info
            .as_object()
            .ok_or_else(|| invalid(&format!("property '{name}' is not an object")))?;
        let declared_type = ParamType::from_schema(info.get("type").and_then(Value::as_str));
        parameters.push(ParameterSpec {
            name: name.clone(),
            declared_type,
            required: required.contains(&name.as_str()),
        });
    }
    Ok(Some(parameters))
}

/// One position of the discovered tool list. Unreadable entries keep their
/// slot so catalog numbering matches the host's ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Tool(ToolDescriptor),
    Unreadable { reason: String },
}

impl CatalogEntry {
    pub fn from_listing(entry: &Value) -> Self {
        match ToolDescriptor::from_listing(entry) {
            Ok(descriptor) => CatalogEntry::Tool(descriptor),
            Err(err) => CatalogEntry::Unreadable {
                reason: err.to_string(),
            },
        }
    }

    pub fn descriptor(&self) -> Option<&ToolDescriptor> {
        match self {
            CatalogEntry::Tool(descriptor) => Some(descriptor),
            CatalogEntry::Unreadable { .. } => None,
        }
    }
}
