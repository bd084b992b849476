//! CRM entities
//!
//! Rows of the shared multi-tenant store, deserialized from the store's
//! column names (snake_case). Summaries handed back to the agent loop are
//! camelCase JSON objects built by the `summary()` helpers; raw rows never
//! cross the tool boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::table::{OwnedEntity, Table};
use super::value_objects::{ActivityType, DealStatus, Priority, StageLifecycle};
use crate::core::error::DomainError;

/// Tenant boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// A user profile belonging to one organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub organization_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "user".to_string()
}

impl Member {
    pub fn summary(&self) -> Value {
        json!({
            "id": self.id,
            "firstName": self.first_name,
            "role": self.role,
        })
    }
}

/// Named pipeline container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    /// Human key (e.g. "sales") accepted wherever a board id is
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Board {
    pub fn summary(&self) -> Value {
        json!({ "id": self.id, "name": self.name, "key": self.key })
    }
}

/// Pipeline column of a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub organization_id: String,
    pub board_id: String,
    pub label: String,
    pub order: i64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub linked_lifecycle: Option<StageLifecycle>,
}

impl Stage {
    /// Lifecycle tag of this stage; an explicit link wins, otherwise the
    /// configured won-stage label marks the stage as `won`.
    pub fn lifecycle(&self, won_stage_label: Option<&str>) -> Option<StageLifecycle> {
        self.linked_lifecycle.or_else(|| {
            won_stage_label
                .filter(|label| {
                    crate::core::string::normalize_label(label)
                        == crate::core::string::normalize_label(&self.label)
                })
                .map(|_| StageLifecycle::Won)
        })
    }

    pub fn summary(&self, won_stage_label: Option<&str>) -> Value {
        json!({
            "id": self.id,
            "label": self.label,
            "order": self.order,
            "color": self.color,
            "lifecycle": self.lifecycle(won_stage_label).map(|l| l.as_str()),
        })
    }
}

/// Sales opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub organization_id: String,
    pub board_id: String,
    pub stage_id: String,
    pub title: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub contact_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_won: bool,
    #[serde(default)]
    pub is_lost: bool,
    #[serde(default)]
    pub loss_reason: Option<String>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_stage_change_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Deal {
    pub fn status(&self) -> DealStatus {
        if self.is_won {
            DealStatus::Won
        } else if self.is_lost {
            DealStatus::Lost
        } else {
            DealStatus::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.status() == DealStatus::Open
    }

    /// Stage moves are only allowed on open deals.
    pub fn ensure_open(&self) -> Result<(), DomainError> {
        match self.status() {
            DealStatus::Open => Ok(()),
            closed => Err(DomainError::DealClosed(closed.as_str())),
        }
    }

    /// A lost deal cannot be marked as won (no reopen path exists).
    pub fn ensure_can_win(&self) -> Result<(), DomainError> {
        if self.is_lost {
            return Err(DomainError::DealClosed(DealStatus::Lost.as_str()));
        }
        Ok(())
    }

    /// A won deal cannot be marked as lost.
    pub fn ensure_can_lose(&self) -> Result<(), DomainError> {
        if self.is_won {
            return Err(DomainError::DealClosed(DealStatus::Won.as_str()));
        }
        Ok(())
    }

    /// When the deal last changed stage, falling back to the row timestamps
    /// for rows written before the column existed.
    pub fn stage_changed_at(&self) -> Option<DateTime<Utc>> {
        self.last_stage_change_date
            .or(self.updated_at)
            .or(self.created_at)
    }

    /// Open deal whose stage has not changed since `cutoff`
    pub fn is_stagnant_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.is_open()
            && self
                .stage_changed_at()
                .is_some_and(|changed| changed < cutoff)
    }

    pub fn summary(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "value": self.value,
            "priority": self.priority.as_str(),
            "status": self.status().as_str(),
            "boardId": self.board_id,
            "stageId": self.stage_id,
            "ownerId": self.owner_id,
            "contactId": self.contact_id,
            "lastStageChangeDate": self.stage_changed_at(),
        })
    }
}

/// Company a contact may work for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub organization_id: String,
    pub name: String,
}

/// Person the organization sells to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Contact {
    pub fn summary(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
            "companyId": self.company_id,
        })
    }
}

/// Call, meeting, task... optionally attached to a deal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub organization_id: String,
    #[serde(default)]
    pub deal_id: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Activity {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.date < now
    }

    pub fn summary(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "type": self.activity_type.as_str(),
            "date": self.date,
            "completed": self.completed,
            "dealId": self.deal_id,
        })
    }
}

/// Append-only note on a deal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub organization_id: String,
    pub deal_id: String,
    pub content: String,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Note {
    pub fn summary(&self) -> Value {
        json!({
            "id": self.id,
            "content": self.content,
            "createdBy": self.created_by,
            "createdAt": self.created_at,
        })
    }
}

macro_rules! owned_entity {
    ($ty:ty, $table:expr, $kind:literal) => {
        impl OwnedEntity for $ty {
            const TABLE: Table = $table;
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn organization_id(&self) -> &str {
                &self.organization_id
            }
        }
    };
}

owned_entity!(Member, Table::Profiles, "User");
owned_entity!(Board, Table::Boards, "Board");
owned_entity!(Stage, Table::BoardStages, "Stage");
owned_entity!(Deal, Table::Deals, "Deal");
owned_entity!(Company, Table::Companies, "Company");
owned_entity!(Contact, Table::Contacts, "Contact");
owned_entity!(Activity, Table::Activities, "Activity");
owned_entity!(Note, Table::DealNotes, "Note");
