// assay-core/src/domain/entity/schema.rs

use super::Entity;

/// Raw column carrying the ingestion timestamp, shared by every entity.
pub const INGESTED_AT: &str = "ingested_at";

/// Canonical transform applied to a raw field by the standardizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed, case preserved.
    Identifier,
    /// Trimmed and uppercased.
    Categorical,
    /// Trimmed, uppercased, internal whitespace collapsed.
    FreeText,
    /// Best-effort number; failure is `NotANumber`.
    Numeric,
    Date,
    Timestamp,
    /// Resolved against the named enumeration domain.
    Enumeration(&'static str),
    /// Non-letters stripped, then resolved against the named domain.
    CurrencyCode(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// Documented raw schema of one entity.
#[derive(Debug)]
pub struct EntitySchema {
    pub entity: Entity,
    pub key_field: &'static str,
    /// Payload fields, natural key included, in publication order.
    pub fields: &'static [FieldSpec],
    /// Occurrence timestamp ranked ahead of the ingestion timestamp.
    pub occurrence_field: Option<&'static str>,
    /// Foreign key checked by the referential pruner.
    pub parent_field: Option<&'static str>,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        name == INGESTED_AT || self.field(name).is_some()
    }
}

pub(crate) static CUSTOMER: EntitySchema = EntitySchema {
    entity: Entity::Customer,
    key_field: "customer_id",
    fields: &[
        field("customer_id", FieldKind::Identifier),
        field("customer_name", FieldKind::FreeText),
        field("customer_country", FieldKind::Categorical),
        field("customer_age", FieldKind::Numeric),
        field("risk_score", FieldKind::Numeric),
        field(
            "account_status",
            FieldKind::Enumeration("customer.account_status"),
        ),
        field(
            "preferred_payment_method",
            FieldKind::Enumeration("customer.payment_method"),
        ),
        field("signup_date", FieldKind::Date),
    ],
    occurrence_field: None,
    parent_field: None,
};

pub(crate) static MERCHANT: EntitySchema = EntitySchema {
    entity: Entity::Merchant,
    key_field: "merchant_id",
    fields: &[
        field("merchant_id", FieldKind::Identifier),
        field("merchant_name", FieldKind::FreeText),
        field("merchant_country", FieldKind::Categorical),
        field("merchant_category_code", FieldKind::Numeric),
        field(
            "processing_tier",
            FieldKind::Enumeration("merchant.processing_tier"),
        ),
        field(
            "account_status",
            FieldKind::Enumeration("merchant.account_status"),
        ),
        field("risk_level", FieldKind::Enumeration("merchant.risk_level")),
        field("onboarded_date", FieldKind::Date),
    ],
    occurrence_field: None,
    parent_field: None,
};

pub(crate) static TRANSACTION: EntitySchema = EntitySchema {
    entity: Entity::Transaction,
    key_field: "transaction_id",
    fields: &[
        field("transaction_id", FieldKind::Identifier),
        field("merchant_id", FieldKind::Identifier),
        field("customer_id", FieldKind::Identifier),
        field("amount", FieldKind::Numeric),
        field("currency", FieldKind::CurrencyCode("transaction.currency")),
        field(
            "transaction_status",
            FieldKind::Enumeration("transaction.status"),
        ),
        field("payment_method", FieldKind::Categorical),
        field("transaction_date", FieldKind::Timestamp),
    ],
    occurrence_field: None,
    parent_field: None,
};

pub(crate) static EVENT: EntitySchema = EntitySchema {
    entity: Entity::Event,
    key_field: "log_id",
    fields: &[
        field("log_id", FieldKind::Identifier),
        field("transaction_id", FieldKind::Identifier),
        field("event_type", FieldKind::Categorical),
        field("event_timestamp", FieldKind::Timestamp),
        field("error_code", FieldKind::Categorical),
    ],
    occurrence_field: Some("event_timestamp"),
    parent_field: Some("transaction_id"),
};
