//! Store tables and the [`OwnedEntity`] contract.
//!
//! Every table except `organizations` carries an `organization_id` column;
//! the tenant guard in the application layer relies on that.

use serde::de::DeserializeOwned;

/// Tables of the multi-tenant relational store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Organizations,
    Profiles,
    Boards,
    BoardStages,
    Deals,
    Companies,
    Contacts,
    Activities,
    DealNotes,
}

impl Table {
    pub const ALL: [Table; 9] = [
        Table::Organizations,
        Table::Profiles,
        Table::Boards,
        Table::BoardStages,
        Table::Deals,
        Table::Companies,
        Table::Contacts,
        Table::Activities,
        Table::DealNotes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Organizations => "organizations",
            Table::Profiles => "profiles",
            Table::Boards => "boards",
            Table::BoardStages => "board_stages",
            Table::Deals => "deals",
            Table::Companies => "companies",
            Table::Contacts => "contacts",
            Table::Activities => "activities",
            Table::DealNotes => "deal_notes",
        }
    }

    pub fn from_name(name: &str) -> Option<Table> {
        Table::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Whether rows of this table are scoped by `organization_id`
    pub fn is_tenant_scoped(&self) -> bool {
        !matches!(self, Table::Organizations)
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A row type that belongs to exactly one organization.
///
/// `KIND` is the user-facing noun used in error messages ("Deal not found").
pub trait OwnedEntity: DeserializeOwned + Send {
    const TABLE: Table;
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn organization_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_round_trip() {
        for table in Table::ALL {
            assert_eq!(Table::from_name(table.as_str()), Some(table));
        }
        assert_eq!(Table::from_name("users"), None);
    }

    #[test]
    fn test_tenant_scoped() {
        assert!(!Table::Organizations.is_tenant_scoped());
        assert!(Table::Deals.is_tenant_scoped());
        assert!(Table::DealNotes.is_tenant_scoped());
    }
}
