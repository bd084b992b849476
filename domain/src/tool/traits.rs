//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async ToolExecutorPort is defined in the application layer (ports).

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolError;

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError>;
}

/// Default implementation of ToolValidator
///
/// `null` arguments are treated as absent: they do not satisfy a required
/// parameter and are never type-checked.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError> {
        for param in &definition.parameters {
            match call.arguments.get(&param.name) {
                None | Some(serde_json::Value::Null) if param.required => {
                    return Err(ToolError::validation(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    )));
                }
                Some(value) if !value.is_null() && !param.param_type.accepts(value) => {
                    return Err(ToolError::validation(format!(
                        "Parameter '{}' for tool '{}' must be of type {}",
                        param.name,
                        definition.name,
                        param.param_type.as_str()
                    )));
                }
                _ => {}
            }
        }

        // Sorted so the reported name is deterministic
        let mut unknown: Vec<&str> = call
            .arguments
            .keys()
            .map(|k| k.as_str())
            .filter(|k| definition.parameter(k).is_none())
            .collect();
        unknown.sort_unstable();

        if let Some(arg_name) = unknown.first() {
            return Err(ToolError::validation(format!(
                "Unknown parameter '{}' for tool '{}'",
                arg_name, definition.name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ParamType, RiskLevel, ToolParameter};
    use crate::tool::value_objects::ErrorCode;
    use serde_json::Value;

    fn move_deal() -> ToolDefinition {
        ToolDefinition::new("moveDeal", "Move a deal", RiskLevel::High)
            .with_parameter(ToolParameter::new("dealId", "Deal id", false))
            .with_parameter(ToolParameter::new("stageName", "Target stage", true))
    }

    #[test]
    fn test_validator_missing_required() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("moveDeal").with_arg("dealId", "d1");
        let err = validator.validate(&call, &move_deal()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("Missing required parameter 'stageName'"));
    }

    #[test]
    fn test_validator_null_counts_as_missing() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("moveDeal").with_arg("stageName", Value::Null);
        assert!(validator.validate(&call, &move_deal()).is_err());

        let call = ToolCall::new("moveDeal")
            .with_arg("stageName", "Proposta")
            .with_arg("dealId", Value::Null);
        assert!(validator.validate(&call, &move_deal()).is_ok());
    }

    #[test]
    fn test_validator_unknown_param() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("moveDeal")
            .with_arg("stageName", "Proposta")
            .with_arg("organizationId", "other-org");
        let err = validator.validate(&call, &move_deal()).unwrap_err();
        assert!(err.message.contains("Unknown parameter 'organizationId'"));
    }

    #[test]
    fn test_validator_wrong_type() {
        let validator = DefaultToolValidator;
        let definition = ToolDefinition::new("moveDealsBulk", "Bulk move", RiskLevel::High)
            .with_parameter(
                ToolParameter::new("dealIds", "Ids", true).with_type(ParamType::StringArray),
            );
        let call = ToolCall::new("moveDealsBulk").with_arg("dealIds", "d1");
        let err = validator.validate(&call, &definition).unwrap_err();
        assert!(err.message.contains("string[]"));
    }

    #[test]
    fn test_validator_valid_call() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("moveDeal")
            .with_arg("dealId", "d1")
            .with_arg("stageName", "Proposta");
        assert!(validator.validate(&call, &move_deal()).is_ok());
    }
}
