//! The CRM tool catalog: one [`ToolDefinition`] per [`ToolKind`].
//!
//! Parameter names are camelCase because they are what the model sees and
//! sends back. Optional `boardId` / `dealId` parameters fall back to the
//! calling context when omitted.

use super::entities::{ParamType, ToolDefinition, ToolParameter, ToolSpec};
use super::kind::ToolKind;

/// Names models commonly use for catalog tools
pub const TOOL_ALIASES: &[(&str, &str)] = &[
    ("getDeal", "getDealDetails"),
    ("getDealById", "getDealDetails"),
    ("getContact", "getContactDetails"),
    ("findContacts", "searchContacts"),
    ("findDeals", "searchDeals"),
    ("addNote", "addDealNote"),
    ("listNotes", "listDealNotes"),
    ("winDeal", "markDealAsWon"),
    ("loseDeal", "markDealAsLost"),
];

fn param(name: &str, description: &str, required: bool, param_type: ParamType) -> ToolParameter {
    ToolParameter::new(name, description, required).with_type(param_type)
}

fn board_param() -> ToolParameter {
    param(
        "boardId",
        "Board id or key (defaults to the current board)",
        false,
        ParamType::String,
    )
}

fn deal_param(required: bool) -> ToolParameter {
    let description = if required {
        "Deal id"
    } else {
        "Deal id (defaults to the current deal)"
    };
    param("dealId", description, required, ParamType::String)
}

fn limit_param() -> ToolParameter {
    param("limit", "Maximum number of results", false, ParamType::Integer)
}

impl ToolKind {
    /// Declared input schema and description of this tool
    pub fn definition(&self) -> ToolDefinition {
        let def = ToolDefinition::new(self.name(), self.description(), self.risk_level());
        let params: Vec<ToolParameter> = match self {
            ToolKind::AnalyzePipeline | ToolKind::GetBoardMetrics | ToolKind::ListStages => {
                vec![board_param()]
            }
            ToolKind::SearchDeals => vec![
                param("query", "Text to search in deal titles", true, ParamType::String),
                limit_param(),
            ],
            ToolKind::SearchContacts => vec![
                param("query", "Name, email or phone to search", true, ParamType::String),
                limit_param(),
            ],
            ToolKind::ListDealsByStage => vec![
                board_param(),
                param("stageName", "Stage label or id", true, ParamType::String),
                limit_param(),
            ],
            ToolKind::ListStagnantDeals => vec![
                board_param(),
                param(
                    "daysStagnant",
                    "Minimum days without a stage change",
                    false,
                    ParamType::Integer,
                ),
                limit_param(),
            ],
            ToolKind::ListOverdueDeals => vec![board_param(), limit_param()],
            ToolKind::GetDealDetails => vec![deal_param(false)],
            ToolKind::MoveDeal => vec![
                deal_param(false),
                param("stageName", "Target stage label or id", true, ParamType::String),
            ],
            ToolKind::CreateDeal => vec![
                param("title", "Deal title", true, ParamType::String),
                param("value", "Deal value", false, ParamType::Number),
                board_param(),
                param(
                    "contactName",
                    "Contact name (matched or created)",
                    false,
                    ParamType::String,
                ),
                param("contactId", "Existing contact id", false, ParamType::String),
                param(
                    "stageName",
                    "Initial stage (defaults to the first stage)",
                    false,
                    ParamType::String,
                ),
                param("priority", "low, medium or high", false, ParamType::String),
            ],
            ToolKind::UpdateDeal => vec![
                deal_param(false),
                param("title", "New title", false, ParamType::String),
                param("value", "New value", false, ParamType::Number),
                param("priority", "low, medium or high", false, ParamType::String),
                param("description", "New description", false, ParamType::String),
            ],
            ToolKind::MarkDealAsWon => vec![
                deal_param(false),
                param("wonValue", "Final closed value", false, ParamType::Number),
            ],
            ToolKind::MarkDealAsLost => vec![
                deal_param(false),
                param("reason", "Why the deal was lost", true, ParamType::String),
            ],
            ToolKind::AssignDeal => vec![
                deal_param(false),
                param(
                    "newOwnerId",
                    "User id of the new owner (same organization)",
                    true,
                    ParamType::String,
                ),
            ],
            ToolKind::CreateTask => vec![
                param("title", "Task title", true, ParamType::String),
                param("dueDate", "Due date (ISO 8601)", true, ParamType::DateTime),
                deal_param(false),
                param(
                    "type",
                    "CALL, MEETING, EMAIL, TASK or NOTE (default TASK)",
                    false,
                    ParamType::String,
                ),
                param("description", "Task details", false, ParamType::String),
            ],
            ToolKind::MoveDealsBulk => vec![
                param("dealIds", "Ids of the deals to move", true, ParamType::StringArray),
                board_param(),
                param("stageName", "Target stage label or id", true, ParamType::String),
                param(
                    "allowPartial",
                    "Move the valid deals even if some fail (default false)",
                    false,
                    ParamType::Boolean,
                ),
                param(
                    "maxDeals",
                    "Refuse batches larger than this",
                    false,
                    ParamType::Integer,
                ),
            ],
            ToolKind::ListActivities => vec![
                board_param(),
                deal_param(false),
                param("completed", "Filter by completion", false, ParamType::Boolean),
                limit_param(),
            ],
            ToolKind::CompleteActivity => vec![param(
                "activityId",
                "Activity id",
                true,
                ParamType::String,
            )],
            ToolKind::RescheduleActivity => vec![
                param("activityId", "Activity id", true, ParamType::String),
                param("newDate", "New date (ISO 8601)", true, ParamType::DateTime),
            ],
            ToolKind::LogActivity => vec![
                param("title", "What happened", true, ParamType::String),
                deal_param(false),
                param(
                    "type",
                    "CALL, MEETING, EMAIL, TASK or NOTE (default CALL)",
                    false,
                    ParamType::String,
                ),
                param("description", "Details", false, ParamType::String),
            ],
            ToolKind::AddDealNote => vec![
                deal_param(false),
                param("content", "Note text", true, ParamType::String),
            ],
            ToolKind::ListDealNotes => vec![deal_param(false), limit_param()],
            ToolKind::CreateContact => vec![
                param("name", "Full name", true, ParamType::String),
                param("email", "Email address", false, ParamType::String),
                param("phone", "Phone number", false, ParamType::String),
                param("companyName", "Company name", false, ParamType::String),
                param("notes", "Free-form notes", false, ParamType::String),
            ],
            ToolKind::UpdateContact => vec![
                param("contactId", "Contact id", true, ParamType::String),
                param("name", "Full name", false, ParamType::String),
                param("email", "Email address", false, ParamType::String),
                param("phone", "Phone number", false, ParamType::String),
                param("companyName", "Company name", false, ParamType::String),
                param("notes", "Free-form notes", false, ParamType::String),
            ],
            ToolKind::GetContactDetails => vec![param(
                "contactId",
                "Contact id, email or phone",
                true,
                ParamType::String,
            )],
            ToolKind::LinkDealToContact => vec![
                deal_param(false),
                param("contactId", "Contact id", true, ParamType::String),
            ],
            ToolKind::UpdateStage => vec![
                param("stageId", "Stage id", true, ParamType::String),
                param("label", "New label", false, ParamType::String),
                param("color", "New color (e.g. #22c55e)", false, ParamType::String),
            ],
            ToolKind::ReorderStages => vec![
                board_param(),
                param(
                    "orderedStageIds",
                    "Every stage id of the board, in the new order",
                    true,
                    ParamType::StringArray,
                ),
            ],
        };
        params.into_iter().fold(def, |d, p| d.with_parameter(p))
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::AnalyzePipeline => {
                "Analyze a board's pipeline: open deals and value per stage, won/lost totals and win rate"
            }
            ToolKind::GetBoardMetrics => {
                "Key metrics of a board: deal counts, pipeline value, win rate, stagnant and overdue deals"
            }
            ToolKind::SearchDeals => "Search deals by title",
            ToolKind::SearchContacts => "Search contacts by name, email or phone",
            ToolKind::ListDealsByStage => "List open deals currently in a stage",
            ToolKind::ListStagnantDeals => {
                "List open deals that have not changed stage for a number of days"
            }
            ToolKind::ListOverdueDeals => {
                "List open deals with activities past their date and not completed"
            }
            ToolKind::GetDealDetails => "Get a deal with its stage, contact and activity summary",
            ToolKind::MoveDeal => "Move a deal to another stage of its board",
            ToolKind::CreateDeal => {
                "Create a deal on a board, matching or creating the contact by name"
            }
            ToolKind::UpdateDeal => "Update a deal's title, value, priority or description",
            ToolKind::MarkDealAsWon => "Mark a deal as won, optionally setting the final value",
            ToolKind::MarkDealAsLost => "Mark a deal as lost with a reason",
            ToolKind::AssignDeal => "Reassign a deal to another member of the organization",
            ToolKind::CreateTask => "Create a pending task or scheduled activity",
            ToolKind::MoveDealsBulk => {
                "Move several deals of one board to a stage; all-or-nothing unless allowPartial is true"
            }
            ToolKind::ListActivities => "List activities of a deal, a board or the organization",
            ToolKind::CompleteActivity => "Mark an activity as completed",
            ToolKind::RescheduleActivity => "Change the date of a pending activity",
            ToolKind::LogActivity => "Record an interaction that already happened",
            ToolKind::AddDealNote => "Add a note to a deal",
            ToolKind::ListDealNotes => "List the most recent notes of a deal",
            ToolKind::CreateContact => "Create a contact",
            ToolKind::UpdateContact => "Update a contact",
            ToolKind::GetContactDetails => "Get a contact with its company and deals",
            ToolKind::LinkDealToContact => "Set the contact of a deal",
            ToolKind::ListStages => "List the stages of a board in order",
            ToolKind::UpdateStage => "Rename or recolor a stage",
            ToolKind::ReorderStages => "Reorder all stages of a board",
        }
    }
}

/// The full CRM tool specification, aliases included
pub fn crm_tool_spec() -> ToolSpec {
    ToolKind::ALL
        .iter()
        .fold(ToolSpec::new(), |spec, kind| spec.register(kind.definition()))
        .register_aliases(TOOL_ALIASES.iter().copied())
}

/// Read-only subset of the catalog
pub fn read_only_tool_spec() -> ToolSpec {
    ToolKind::ALL
        .iter()
        .filter(|kind| !kind.risk_level().is_mutating())
        .fold(ToolSpec::new(), |spec, kind| spec.register(kind.definition()))
}
