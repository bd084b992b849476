//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] that produces provider-neutral
//! JSON Schema for a Native Tool Use API.

use dealdesk_application::ports::tool_schema::ToolSchemaPort;
use dealdesk_domain::tool::entities::{ParamType, ToolDefinition, ToolSpec};
use serde_json::{Value, json};

/// Default implementation producing provider-neutral JSON Schema.
///
/// Handles param_type → JSON Schema mapping:
/// - `String` → `"string"`
/// - `DateTime` → `"string"` with `format: "date-time"`
/// - `Number`, `Integer`, `Boolean` → the same JSON Schema type
/// - `StringArray` → `"array"` of `"string"` items
///
/// Every schema sets `additionalProperties: false`; the validator rejects
/// unknown parameters too.
pub struct JsonSchemaToolConverter;

fn param_schema(param_type: ParamType, description: &str) -> Value {
    match param_type {
        ParamType::String => json!({ "type": "string", "description": description }),
        ParamType::DateTime => json!({
            "type": "string",
            "format": "date-time",
            "description": description,
        }),
        ParamType::Number => json!({ "type": "number", "description": description }),
        ParamType::Integer => json!({ "type": "integer", "description": description }),
        ParamType::Boolean => json!({ "type": "boolean", "description": description }),
        ParamType::StringArray => json!({
            "type": "array",
            "items": { "type": "string" },
            "description": description,
        }),
    }
}

fn sorted_schemas<'a>(
    converter: &JsonSchemaToolConverter,
    tools: impl Iterator<Item = &'a ToolDefinition>,
) -> Vec<Value> {
    let mut tools: Vec<&ToolDefinition> = tools.collect();
    tools.sort_by_key(|t| &t.name);
    tools.into_iter().map(|t| converter.tool_to_schema(t)).collect()
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            properties.insert(
                param.name.clone(),
                param_schema(param.param_type, &param.description),
            );
            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            }
        })
    }

    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<Value> {
        sorted_schemas(self, spec.all())
    }

    fn read_only_tools_schema(&self, spec: &ToolSpec) -> Vec<Value> {
        sorted_schemas(self, spec.read_only_tools())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealdesk_domain::crm_tool_spec;
    use dealdesk_domain::tool::entities::{RiskLevel, ToolParameter};

    #[test]
    fn test_tool_to_schema() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("moveDealsBulk", "Move deals", RiskLevel::High)
            .with_parameter(
                ToolParameter::new("dealIds", "Deals to move", true)
                    .with_type(ParamType::StringArray),
            )
            .with_parameter(ToolParameter::new("stageName", "Target stage", true))
            .with_parameter(
                ToolParameter::new("maxDeals", "Cap", false).with_type(ParamType::Integer),
            );

        let schema = converter.tool_to_schema(&tool);

        assert_eq!(schema["name"], "moveDealsBulk");
        assert_eq!(schema["input_schema"]["type"], "object");
        assert_eq!(schema["input_schema"]["additionalProperties"], false);

        let ids = &schema["input_schema"]["properties"]["dealIds"];
        assert_eq!(ids["type"], "array");
        assert_eq!(ids["items"]["type"], "string");
        assert_eq!(
            schema["input_schema"]["properties"]["maxDeals"]["type"],
            "integer"
        );

        let required = schema["input_schema"]["required"].as_array().unwrap();
        assert_eq!(required, &vec![json!("dealIds"), json!("stageName")]);
    }

    #[test]
    fn test_datetime_is_string() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("rescheduleActivity", "Reschedule", RiskLevel::High)
            .with_parameter(
                ToolParameter::new("newDate", "New date", true).with_type(ParamType::DateTime),
            );
        let prop = &converter.tool_to_schema(&tool)["input_schema"]["properties"]["newDate"];
        assert_eq!(prop["type"], "string");
        assert_eq!(prop["format"], "date-time");
    }

    #[test]
    fn test_catalog_schemas_sorted_and_split() {
        let converter = JsonSchemaToolConverter;
        let spec = crm_tool_spec();

        let all = converter.all_tools_schema(&spec);
        assert_eq!(all.len(), 29);
        let names: Vec<&str> = all.iter().map(|t| t["name"].as_str().unwrap()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let read_only = converter.read_only_tools_schema(&spec);
        assert!(!read_only.is_empty() && read_only.len() < all.len());
        let read_names: Vec<&str> = read_only
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert!(read_names.contains(&"searchDeals"));
        assert!(!read_names.contains(&"moveDeal"));
    }
}
