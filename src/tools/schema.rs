//! Tool input schemas: declared parameters, argument validation, JSON Schema rendering.

use crate::types::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};

// =============================================================================
// Parameter types
// =============================================================================

/// Primitive type of a tool parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Enum(Vec<String>),
    Optional(Box<ParamType>),
}

impl ParamType {
    /// Check a JSON value against this type.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        let matches = match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Enum(variants) => {
                let Some(s) = value.as_str() else {
                    return Err(format!("expected string for enum, got {}", value_type_name(value)));
                };
                if variants.iter().any(|v| v == s) {
                    return Ok(());
                }
                return Err(format!(
                    "invalid enum value '{}', expected one of: {}",
                    s,
                    variants.join(", ")
                ));
            }
            ParamType::Optional(inner) => return if value.is_null() { Ok(()) } else { inner.check(value) },
        };

        if matches {
            Ok(())
        } else {
            Err(format!("expected {}, got {}", self.type_name(), value_type_name(value)))
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            ParamType::String | ParamType::Enum(_) => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Optional(inner) => inner.type_name(),
        }
    }

    /// JSON Schema fragment for this type.
    pub fn json_schema(&self) -> Value {
        match self {
            ParamType::Enum(variants) => json!({ "type": "string", "enum": variants }),
            ParamType::Optional(inner) => inner.json_schema(),
            other => json!({ "type": other.type_name() }),
        }
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single named parameter of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none() && !matches!(self.param_type, ParamType::Optional(_))
    }
}

// =============================================================================
// Tool schema
// =============================================================================

/// Ordered parameter list of a tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSchema {
    pub params: Vec<ParamDef>,
}

impl ToolSchema {
    pub fn new(params: Vec<ParamDef>) -> Self {
        Self { params }
    }

    /// Validate raw arguments, returning every issue found.
    ///
    /// Declared parameters that are absent get their default. Undeclared
    /// keys are dropped from the validated arguments.
    pub fn validate(&self, arguments: &Value) -> Result<Map<String, Value>, Vec<String>> {
        let Some(provided) = arguments.as_object() else {
            return Err(vec![format!(
                "Arguments must be a JSON object, got {}",
                value_type_name(arguments)
            )]);
        };

        let mut issues = Vec::new();
        let mut validated = Map::new();

        for param in &self.params {
            match provided.get(&param.name) {
                Some(value) => match param.param_type.check(value) {
                    Ok(()) => {
                        validated.insert(param.name.clone(), value.clone());
                    }
                    Err(e) => issues.push(format!("Parameter '{}': {}", param.name, e)),
                },
                None => {
                    if let Some(default) = &param.default {
                        validated.insert(param.name.clone(), default.clone());
                    } else if param.is_required() {
                        issues.push(format!("Missing required parameter: {}", param.name));
                    }
                }
            }
        }

        if issues.is_empty() {
            Ok(validated)
        } else {
            Err(issues)
        }
    }

    /// JSON Schema object describing the parameters, for binding to a model.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.params {
            let mut prop = param.param_type.json_schema();
            if let Some(obj) = prop.as_object_mut() {
                if !param.description.is_empty() {
                    obj.insert("description".to_string(), Value::String(param.description.clone()));
                }
                if let Some(default) = &param.default {
                    obj.insert("default".to_string(), default.clone());
                }
            }
            properties.insert(param.name.clone(), prop);
        }

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.is_required())
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

// =============================================================================
// Validated arguments
// =============================================================================

/// Arguments that passed schema validation, handed to a tool callback.
#[derive(Debug, Clone)]
pub struct ToolArgs {
    tool: String,
    values: Map<String, Value>,
}

impl ToolArgs {
    pub fn new(tool: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            tool: tool.into(),
            values,
        }
    }

    pub fn number(&self, name: &str) -> Result<&Number, ToolError> {
        match self.values.get(name) {
            Some(Value::Number(n)) => Ok(n),
            _ => Err(ToolError::argument(&self.tool, format!("Parameter '{}' must be a number", name))),
        }
    }

    pub fn string(&self, name: &str) -> Result<&str, ToolError> {
        self.values
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::argument(&self.tool, format!("Parameter '{}' must be a string", name)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_schema() -> ToolSchema {
        ToolSchema::new(vec![
            ParamDef::new("a", ParamType::Number, ""),
            ParamDef::new("b", ParamType::Number, ""),
        ])
    }

    #[test]
    fn test_validate_valid() {
        let args = pair_schema().validate(&json!({"a": 7, "b": 50})).unwrap();
        assert_eq!(args.get("a"), Some(&json!(7)));
        assert_eq!(args.get("b"), Some(&json!(50)));
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let issues = pair_schema().validate(&json!({"b": "fifty"})).unwrap_err();
        assert_eq!(issues.len(), 2);
        assert!(issues.contains(&"Missing required parameter: a".to_string()));
        assert!(issues.contains(&"Parameter 'b': expected number, got string".to_string()));
    }

    #[test]
    fn test_validate_rejects_non_object() {
        let issues = pair_schema().validate(&json!([7, 50])).unwrap_err();
        assert_eq!(issues, vec!["Arguments must be a JSON object, got array".to_string()]);
    }

    #[test]
    fn test_validate_strips_undeclared_keys() {
        let args = pair_schema()
            .validate(&json!({"a": 1, "b": 2, "c": 3}))
            .unwrap();
        assert_eq!(args.len(), 2);
        assert!(!args.contains_key("c"));
    }

    #[test]
    fn test_validate_fills_defaults_without_overwrite() {
        let schema = ToolSchema::new(vec![
            ParamDef::new("query", ParamType::String, "Search query"),
            ParamDef::new("limit", ParamType::Integer, "Max results").with_default(json!(10)),
        ]);

        let filled = schema.validate(&json!({"query": "rust"})).unwrap();
        assert_eq!(filled["limit"], 10);

        let kept = schema.validate(&json!({"query": "rust", "limit": 3})).unwrap();
        assert_eq!(kept["limit"], 3);
    }

    #[test]
    fn test_integer_rejects_float() {
        assert!(ParamType::Integer.check(&json!(3)).is_ok());
        assert_eq!(
            ParamType::Integer.check(&json!(3.5)).unwrap_err(),
            "expected integer, got number"
        );
        assert!(ParamType::Number.check(&json!(3.5)).is_ok());
    }

    #[test]
    fn test_enum_and_optional() {
        let pt = ParamType::Enum(vec!["asc".to_string(), "desc".to_string()]);
        assert!(pt.check(&json!("asc")).is_ok());
        assert!(pt.check(&json!("bad")).is_err());
        assert!(pt.check(&json!(42)).is_err());

        let opt = ParamType::Optional(Box::new(ParamType::Boolean));
        assert!(opt.check(&Value::Null).is_ok());
        assert!(opt.check(&json!(true)).is_ok());
        assert!(opt.check(&json!("yes")).is_err());
    }

    #[test]
    fn test_json_schema_rendering() {
        let schema = ToolSchema::new(vec![
            ParamDef::new("from", ParamType::String, "Source currency"),
            ParamDef::new("round", ParamType::Optional(Box::new(ParamType::Boolean)), ""),
        ]);
        assert_eq!(
            schema.to_json_schema(),
            json!({
                "type": "object",
                "properties": {
                    "from": {"type": "string", "description": "Source currency"},
                    "round": {"type": "boolean"}
                },
                "required": ["from"]
            })
        );
    }

    #[test]
    fn test_tool_args_accessors() {
        let values = pair_schema().validate(&json!({"a": 2, "b": 3})).unwrap();
        let args = ToolArgs::new("multiply", values);
        assert_eq!(args.number("a").unwrap().as_i64(), Some(2));
        let err = args.string("a").unwrap_err();
        assert_eq!(err.kind(), crate::types::FailureKind::ArgumentValidation);
    }
}
