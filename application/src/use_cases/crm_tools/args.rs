//! Typed tool inputs.
//!
//! Field names mirror the catalog's camelCase parameters. Presence and JSON
//! types are already checked by the validator; these structs add the parse
//! step into domain types.

use chrono::{DateTime, NaiveDate, Utc};
use dealdesk_domain::{ActivityType, Priority, ToolError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BoardInput {
    pub board_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchInput {
    pub query: String,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListDealsByStageInput {
    pub board_id: Option<String>,
    pub stage_name: String,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListStagnantDealsInput {
    pub board_id: Option<String>,
    pub days_stagnant: Option<i64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BoardListInput {
    pub board_id: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DealInput {
    pub deal_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoveDealInput {
    pub deal_id: Option<String>,
    pub stage_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateDealInput {
    pub title: String,
    pub value: Option<f64>,
    pub board_id: Option<String>,
    pub contact_name: Option<String>,
    pub contact_id: Option<String>,
    pub stage_name: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateDealInput {
    pub deal_id: Option<String>,
    pub title: Option<String>,
    pub value: Option<f64>,
    pub priority: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MarkWonInput {
    pub deal_id: Option<String>,
    pub won_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MarkLostInput {
    pub deal_id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssignDealInput {
    pub deal_id: Option<String>,
    pub new_owner_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTaskInput {
    pub title: String,
    pub due_date: String,
    pub deal_id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoveDealsBulkInput {
    pub deal_ids: Vec<String>,
    pub board_id: Option<String>,
    pub stage_name: String,
    #[serde(default)]
    pub allow_partial: bool,
    pub max_deals: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListActivitiesInput {
    pub board_id: Option<String>,
    pub deal_id: Option<String>,
    pub completed: Option<bool>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActivityInput {
    pub activity_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RescheduleActivityInput {
    pub activity_id: String,
    pub new_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogActivityInput {
    pub title: String,
    pub deal_id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddDealNoteInput {
    pub deal_id: Option<String>,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListDealNotesInput {
    pub deal_id: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateContactInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateContactInput {
    pub contact_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContactInput {
    pub contact_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LinkDealToContactInput {
    pub deal_id: Option<String>,
    pub contact_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateStageInput {
    pub stage_id: String,
    pub label: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReorderStagesInput {
    pub board_id: Option<String>,
    pub ordered_stage_ids: Vec<String>,
}

// ==================== Parsers ====================

pub(crate) fn parse_priority(raw: Option<&str>) -> Result<Option<Priority>, ToolError> {
    raw.map(|p| p.parse::<Priority>().map_err(ToolError::validation))
        .transpose()
}

pub(crate) fn parse_activity_type(
    raw: Option<&str>,
    default: ActivityType,
) -> Result<ActivityType, ToolError> {
    match raw {
        Some(t) if !t.trim().is_empty() => t.parse().map_err(ToolError::validation),
        _ => Ok(default),
    }
}

/// RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as midnight UTC.
pub(crate) fn parse_date(field: &str, raw: &str) -> Result<DateTime<Utc>, ToolError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            ToolError::validation(format!(
                "{} must be an ISO 8601 date (YYYY-MM-DD or RFC 3339), got '{}'",
                field, raw
            ))
        })
}

/// Non-negative, finite monetary value
pub(crate) fn parse_value(field: &str, value: f64) -> Result<f64, ToolError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ToolError::validation(format!("{} must be a non-negative number", field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date_accepts_both_shapes() {
        assert_eq!(
            parse_date("dueDate", "2025-06-10").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date("dueDate", "2025-06-10T15:30:00-03:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 10, 18, 30, 0).unwrap()
        );
        let err = parse_date("newDate", "amanhã").unwrap_err();
        assert!(err.message.starts_with("newDate must be"));
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority(Some("ALTA")).unwrap(), Some(Priority::High));
        assert_eq!(parse_priority(None).unwrap(), None);
        assert!(parse_priority(Some("urgent")).is_err());
    }

    #[test]
    fn test_parse_activity_type_default() {
        assert_eq!(
            parse_activity_type(None, ActivityType::Call).unwrap(),
            ActivityType::Call
        );
        assert_eq!(
            parse_activity_type(Some("meeting"), ActivityType::Call).unwrap(),
            ActivityType::Meeting
        );
        assert!(parse_activity_type(Some("lunch"), ActivityType::Task).is_err());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("value", 10.5).unwrap(), 10.5);
        assert!(parse_value("value", -1.0).is_err());
    }
}
