//! Context-bound tool registry.
//!
//! # Dispatch
//!
//! ```text
//! CrmToolset::execute(call)
//!   ├─ resolve alias → ToolKind        (unknown → UNKNOWN_TOOL, no store access)
//!   ├─ validate against ToolDefinition (→ VALIDATION_ERROR)
//!   ├─ parse typed input               (→ VALIDATION_ERROR)
//!   ├─ handler(scope, input)           (guarded reads, store writes)
//!   └─ ToolResult + duration → audit event
//! ```

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use dealdesk_domain::{
    DefaultToolValidator, ToolCall, ToolError, ToolKind, ToolResult, ToolSpec, ToolValidator,
};
use serde_json::Value;
use tracing::{debug, info};

use super::scope::TenantScope;
use super::{activities, analyzers, bulk, contacts, deals, notes, stages};
use crate::ports::tool_audit::{ToolAuditEvent, ToolAuditLogger};
use crate::ports::tool_executor::ToolExecutorPort;

/// The 29 CRM tools bound to one calling context.
///
/// Built by [`ToolFactory`](super::ToolFactory). Holds no mutable state; two
/// toolsets for different organizations can run side by side against the
/// same store.
pub struct CrmToolset {
    scope: TenantScope,
    spec: ToolSpec,
    validator: DefaultToolValidator,
    audit: Arc<dyn ToolAuditLogger>,
}

impl CrmToolset {
    pub(crate) fn new(scope: TenantScope, spec: ToolSpec, audit: Arc<dyn ToolAuditLogger>) -> Self {
        Self {
            scope,
            spec,
            validator: DefaultToolValidator,
            audit,
        }
    }

    pub(crate) fn scope(&self) -> &TenantScope {
        &self.scope
    }

    /// Organization this toolset acts for
    pub fn organization_id(&self) -> &str {
        self.scope.org()
    }

    /// Execute a tool by name with a raw JSON argument object.
    pub async fn execute_json(&self, name: &str, input: Value) -> ToolResult {
        match ToolCall::from_json(name, input) {
            Ok(call) => self.execute(&call).await,
            Err(err) => ToolResult::failure(name, err),
        }
    }

    fn resolve(&self, name: &str) -> Result<ToolKind, ToolError> {
        self.spec
            .resolve(name)
            .and_then(ToolKind::from_name)
            .ok_or_else(|| ToolError::unknown_tool(name))
    }

    async fn dispatch(&self, kind: ToolKind, call: &ToolCall) -> Result<Value, ToolError> {
        let definition = self
            .spec
            .get(kind.name())
            .ok_or_else(|| ToolError::unknown_tool(&call.tool_name))?;
        self.validator.validate(call, definition)?;

        let scope = &self.scope;
        match kind {
            ToolKind::AnalyzePipeline => analyzers::analyze_pipeline(scope, call.parse_input()?).await,
            ToolKind::GetBoardMetrics => analyzers::get_board_metrics(scope, call.parse_input()?).await,
            ToolKind::ListStagnantDeals => analyzers::list_stagnant_deals(scope, call.parse_input()?).await,
            ToolKind::ListOverdueDeals => analyzers::list_overdue_deals(scope, call.parse_input()?).await,
            ToolKind::SearchDeals => deals::search_deals(scope, call.parse_input()?).await,
            ToolKind::GetDealDetails => deals::get_deal_details(scope, call.parse_input()?).await,
            ToolKind::ListDealsByStage => deals::list_deals_by_stage(scope, call.parse_input()?).await,
            ToolKind::MoveDeal => deals::move_deal(scope, call.parse_input()?).await,
            ToolKind::CreateDeal => deals::create_deal(scope, call.parse_input()?).await,
            ToolKind::UpdateDeal => deals::update_deal(scope, call.parse_input()?).await,
            ToolKind::MarkDealAsWon => deals::mark_deal_as_won(scope, call.parse_input()?).await,
            ToolKind::MarkDealAsLost => deals::mark_deal_as_lost(scope, call.parse_input()?).await,
            ToolKind::AssignDeal => deals::assign_deal(scope, call.parse_input()?).await,
            ToolKind::MoveDealsBulk => bulk::move_deals_bulk(scope, call.parse_input()?).await,
            ToolKind::CreateTask => activities::create_task(scope, call.parse_input()?).await,
            ToolKind::LogActivity => activities::log_activity(scope, call.parse_input()?).await,
            ToolKind::ListActivities => activities::list_activities(scope, call.parse_input()?).await,
            ToolKind::CompleteActivity => activities::complete_activity(scope, call.parse_input()?).await,
            ToolKind::RescheduleActivity => {
                activities::reschedule_activity(scope, call.parse_input()?).await
            }
            ToolKind::AddDealNote => notes::add_deal_note(scope, call.parse_input()?).await,
            ToolKind::ListDealNotes => notes::list_deal_notes(scope, call.parse_input()?).await,
            ToolKind::SearchContacts => contacts::search_contacts(scope, call.parse_input()?).await,
            ToolKind::CreateContact => contacts::create_contact(scope, call.parse_input()?).await,
            ToolKind::UpdateContact => contacts::update_contact(scope, call.parse_input()?).await,
            ToolKind::GetContactDetails => contacts::get_contact_details(scope, call.parse_input()?).await,
            ToolKind::LinkDealToContact => {
                contacts::link_deal_to_contact(scope, call.parse_input()?).await
            }
            ToolKind::ListStages => stages::list_stages(scope, call.parse_input()?).await,
            ToolKind::UpdateStage => stages::update_stage(scope, call.parse_input()?).await,
            ToolKind::ReorderStages => stages::reorder_stages(scope, call.parse_input()?).await,
        }
    }

    fn audit(&self, result: &ToolResult, mutating: bool) {
        self.audit.log(ToolAuditEvent {
            tool: result.tool_name.clone(),
            organization_id: self.scope.org().to_string(),
            acting_user_id: self.scope.acting_user_id.clone(),
            ok: result.ok,
            code: result.code,
            duration_ms: result.metadata.duration_ms.unwrap_or_default(),
            mutating,
        });
    }
}

#[async_trait]
impl ToolExecutorPort for CrmToolset {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();
        let kind = match self.resolve(&call.tool_name) {
            Ok(kind) => kind,
            Err(err) => {
                debug!(tool = %call.tool_name, "Rejected unknown tool");
                let result = ToolResult::failure(&call.tool_name, err)
                    .with_duration(start.elapsed().as_millis() as u64);
                self.audit(&result, false);
                return result;
            }
        };

        let outcome = self.dispatch(kind, call).await;
        let result = ToolResult::from_outcome(kind.name(), outcome)
            .with_duration(start.elapsed().as_millis() as u64);

        info!(
            tool = kind.name(),
            org = %self.scope.org(),
            ok = result.ok,
            code = result.code.map(|c| c.as_str()),
            duration_ms = result.metadata.duration_ms,
            "Tool call finished"
        );
        self.audit(&result, kind.risk_level().is_mutating());
        result
    }

    fn execute_sync(&self, call: &ToolCall) -> ToolResult {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => tokio::task::block_in_place(|| handle.block_on(self.execute(call))),
            Err(_) => ToolResult::failure(
                &call.tool_name,
                ToolError::api("Tool execution requires an async runtime"),
            ),
        }
    }
}
