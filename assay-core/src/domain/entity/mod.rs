// assay-core/src/domain/entity/mod.rs

pub mod schema;

pub use schema::{EntitySchema, FieldKind, FieldSpec, INGESTED_AT};

use serde::{Deserialize, Serialize};
use std::fmt;

// Declaration order is the processing and publication order: events come
// last because they are pruned against the clean transactions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Customer,
    Merchant,
    Transaction,
    Event,
}

impl Entity {
    pub const ALL: [Entity; 4] = [
        Entity::Customer,
        Entity::Merchant,
        Entity::Transaction,
        Entity::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Merchant => "merchant",
            Self::Transaction => "transaction",
            Self::Event => "event",
        }
    }

    /// Name of the raw collection and of the published tables.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Customer => "customers",
            Self::Merchant => "merchants",
            Self::Transaction => "transactions",
            Self::Event => "transaction_events",
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        match self {
            Self::Customer => &schema::CUSTOMER,
            Self::Merchant => &schema::MERCHANT,
            Self::Transaction => &schema::TRANSACTION,
            Self::Event => &schema::EVENT,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == wanted || e.table() == wanted)
            .ok_or_else(|| format!("Unknown entity: {}", s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_accepts_entity_and_table_names() -> anyhow::Result<()> {
        assert_eq!(
            Entity::from_str("customer").map_err(|e| anyhow::anyhow!(e))?,
            Entity::Customer
        );
        assert_eq!(
            Entity::from_str("TRANSACTION_EVENTS").map_err(|e| anyhow::anyhow!(e))?,
            Entity::Event
        );
        assert!(Entity::from_str("invoices").is_err());
        Ok(())
    }

    #[test]
    fn test_events_are_processed_after_transactions() {
        assert!(Entity::Transaction < Entity::Event);
        assert_eq!(Entity::ALL.last(), Some(&Entity::Event));
    }

    #[test]
    fn test_schema_matches_entity() {
        for entity in Entity::ALL {
            assert_eq!(entity.schema().entity, entity);
        }
    }
}
