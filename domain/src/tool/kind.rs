//! Typed tool identifiers.
//!
//! The agent loop addresses tools by string name; [`ToolKind`] is the closed
//! set those names resolve to. Dispatch matches on the enum, so an unknown
//! name is rejected at the boundary instead of falling through a lookup.

use std::str::FromStr;

use super::entities::RiskLevel;

macro_rules! tool_kinds {
    ($( $variant:ident => $name:literal, $risk:ident; )+) => {
        /// Every tool in the catalog
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ToolKind {
            $( $variant, )+
        }

        impl ToolKind {
            pub const ALL: &'static [ToolKind] = &[ $( ToolKind::$variant, )+ ];

            /// Canonical (camelCase) tool name
            pub fn name(&self) -> &'static str {
                match self {
                    $( ToolKind::$variant => $name, )+
                }
            }

            pub fn risk_level(&self) -> RiskLevel {
                match self {
                    $( ToolKind::$variant => RiskLevel::$risk, )+
                }
            }

            pub fn from_name(name: &str) -> Option<ToolKind> {
                match name {
                    $( $name => Some(ToolKind::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

tool_kinds! {
    AnalyzePipeline => "analyzePipeline", Low;
    GetBoardMetrics => "getBoardMetrics", Low;
    SearchDeals => "searchDeals", Low;
    SearchContacts => "searchContacts", Low;
    ListDealsByStage => "listDealsByStage", Low;
    ListStagnantDeals => "listStagnantDeals", Low;
    ListOverdueDeals => "listOverdueDeals", Low;
    GetDealDetails => "getDealDetails", Low;
    MoveDeal => "moveDeal", High;
    CreateDeal => "createDeal", High;
    UpdateDeal => "updateDeal", High;
    MarkDealAsWon => "markDealAsWon", High;
    MarkDealAsLost => "markDealAsLost", High;
    AssignDeal => "assignDeal", High;
    CreateTask => "createTask", High;
    MoveDealsBulk => "moveDealsBulk", High;
    ListActivities => "listActivities", Low;
    CompleteActivity => "completeActivity", High;
    RescheduleActivity => "rescheduleActivity", High;
    LogActivity => "logActivity", High;
    AddDealNote => "addDealNote", High;
    ListDealNotes => "listDealNotes", Low;
    CreateContact => "createContact", High;
    UpdateContact => "updateContact", High;
    GetContactDetails => "getContactDetails", Low;
    LinkDealToContact => "linkDealToContact", High;
    ListStages => "listStages", Low;
    UpdateStage => "updateStage", High;
    ReorderStages => "reorderStages", High;
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::from_name(s).ok_or_else(|| format!("Unknown tool: {}", s))
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
