//! Tool factory: binds the catalog to one calling context.

use std::sync::Arc;

use dealdesk_domain::{CallingContext, DomainError, crm_tool_spec};
use thiserror::Error;
use tracing::debug;

use super::gateway::StoreGateway;
use super::scope::TenantScope;
use super::toolset::CrmToolset;
use crate::config::ToolsConfig;
use crate::ports::clock::{Clock, SystemClock};
use crate::ports::entity_store::EntityStore;
use crate::ports::tool_audit::{NoToolAuditLogger, ToolAuditLogger};

/// Errors raised while building a toolset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("Acting user id is empty")]
    MissingActingUser,
}

/// Builds [`CrmToolset`]s over a shared store.
///
/// The factory itself holds no tenant data; every call to
/// [`create_tools`](Self::create_tools) validates a context and returns a
/// fresh toolset bound to it.
///
/// ```ignore
/// let tools = ToolFactory::new(store)
///     .with_config(config)
///     .create_tools(CallingContext::new("org-1", "user-1").with_board("board-1"), "user-1")?;
/// let result = tools.execute_json("listStages", json!({})).await;
/// ```
pub struct ToolFactory {
    store: Arc<dyn EntityStore>,
    clock: Arc<dyn Clock>,
    audit: Arc<dyn ToolAuditLogger>,
    config: ToolsConfig,
}

impl ToolFactory {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            audit: Arc::new(NoToolAuditLogger),
            config: ToolsConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn ToolAuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_config(mut self, config: ToolsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ToolsConfig {
        &self.config
    }

    /// Validate `context` once and bind the full catalog to it.
    pub fn create_tools(
        &self,
        context: CallingContext,
        acting_user_id: impl Into<String>,
    ) -> Result<CrmToolset, ContextError> {
        let ctx = context.validated()?;
        let acting_user_id = acting_user_id.into().trim().to_string();
        if acting_user_id.is_empty() {
            return Err(ContextError::MissingActingUser);
        }
        debug!(org = %ctx.organization_id, board = ?ctx.board_id, "Creating CRM toolset");

        let scope = TenantScope {
            store: StoreGateway::new(self.store.clone(), &self.config),
            clock: self.clock.clone(),
            config: self.config.clone(),
            acting_user_id,
            ctx,
        };
        Ok(CrmToolset::new(scope, crm_tool_spec(), self.audit.clone()))
    }
}
