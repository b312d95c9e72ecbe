// assay-core/src/domain/quality/rules/catalog.rs
//
// Rule lists per entity, in priority order.

use super::{Predicate, Rule, RuleSet};
use crate::domain::entity::{Entity, FieldKind};
use crate::domain::error::DomainError;
use crate::domain::quality::standardize::EnumerationCatalog;
use crate::domain::record::ViolationKind;

fn present(name: &'static str, field: &'static str, reason: &'static str) -> Rule {
    Rule {
        name,
        reason,
        kind: ViolationKind::MissingRequiredField,
        field,
        predicate: Predicate::Present,
        passes_when_absent: false,
    }
}

fn numeric(name: &'static str, field: &'static str, reason: &'static str) -> Rule {
    Rule {
        name,
        reason,
        kind: ViolationKind::NotNumeric,
        field,
        predicate: Predicate::Numeric,
        passes_when_absent: false,
    }
}

fn between(
    name: &'static str,
    field: &'static str,
    reason: &'static str,
    min: f64,
    max: f64,
) -> Rule {
    Rule {
        name,
        reason,
        kind: ViolationKind::OutOfRange,
        field,
        predicate: Predicate::Between { min, max },
        passes_when_absent: false,
    }
}

/// Membership in the canonical set of the domain the standardizer resolves
/// `field` against, so overriding a domain moves both together.
fn in_domain(
    entity: Entity,
    domains: &EnumerationCatalog,
    name: &'static str,
    field: &'static str,
    reason: &'static str,
) -> Result<Rule, DomainError> {
    let invalid = |reason: String| DomainError::InvalidDefinition {
        entity: entity.table().to_string(),
        reason,
    };
    let domain = match entity.schema().field(field).map(|spec| spec.kind) {
        Some(FieldKind::Enumeration(domain) | FieldKind::CurrencyCode(domain)) => domain,
        _ => {
            return Err(invalid(format!(
                "rule '{}' reads non-enumerated field '{}'",
                name, field
            )));
        }
    };
    let allowed = domains
        .get(domain)
        .ok_or_else(|| invalid(format!("unknown enumeration domain '{}'", domain)))?
        .canonical
        .clone();

    Ok(Rule {
        name,
        reason,
        kind: ViolationKind::InvalidEnumeration,
        field,
        predicate: Predicate::OneOf(allowed),
        passes_when_absent: false,
    })
}

/// Ordered rules of `entity`. Enumeration rules accept the canonical values
/// of `domains`.
pub fn rules_for(
    entity: Entity,
    domains: &EnumerationCatalog,
) -> Result<RuleSet, DomainError> {
    let rules = match entity {
        Entity::Customer => vec![
            present("customer_id_present", "customer_id", "MISSING_CUSTOMER_ID"),
            present(
                "customer_country_present",
                "customer_country",
                "MISSING_COUNTRY",
            ),
            numeric("customer_age_numeric", "customer_age", "AGE_NOT_NUMERIC"),
            between(
                "customer_age_in_range",
                "customer_age",
                "AGE_OUT_OF_RANGE",
                18.0,
                100.0,
            ),
            numeric("risk_score_numeric", "risk_score", "RISK_SCORE_NOT_NUMERIC"),
            between(
                "risk_score_in_range",
                "risk_score",
                "RISK_SCORE_OUT_OF_RANGE",
                100.0,
                850.0,
            ),
        ],
        Entity::Merchant => vec![
            present("merchant_id_present", "merchant_id", "MISSING_MERCHANT_ID"),
            present(
                "merchant_country_present",
                "merchant_country",
                "MISSING_COUNTRY",
            ),
            // Numeric and in range in one rule: NotANumber fails the interval.
            between(
                "category_code_valid",
                "merchant_category_code",
                "INVALID_CATEGORY_CODE",
                5000.0,
                5999.0,
            ),
            // The tier falls back to a default, so this never fires.
            present(
                "processing_tier_resolved",
                "processing_tier",
                "UNRESOLVED_PROCESSING_TIER",
            ),
            in_domain(
                entity,
                domains,
                "account_status_valid",
                "account_status",
                "INVALID_ACCOUNT_STATUS",
            )?,
            in_domain(
                entity,
                domains,
                "risk_level_valid",
                "risk_level",
                "INVALID_RISK_LEVEL",
            )?,
        ],
        Entity::Transaction => vec![
            present(
                "transaction_id_present",
                "transaction_id",
                "MISSING_TRANSACTION_ID",
            ),
            present("merchant_key_present", "merchant_id", "MISSING_MERCHANT_ID"),
            present("customer_key_present", "customer_id", "MISSING_CUSTOMER_ID"),
            present("amount_present", "amount", "MISSING_AMOUNT"),
            Rule {
                name: "amount_positive",
                reason: "NON_POSITIVE_AMOUNT",
                kind: ViolationKind::OutOfRange,
                field: "amount",
                predicate: Predicate::GreaterThan(0.0),
                passes_when_absent: false,
            },
            in_domain(
                entity,
                domains,
                "currency_valid",
                "currency",
                "INVALID_CURRENCY",
            )?,
            in_domain(
                entity,
                domains,
                "status_valid",
                "transaction_status",
                "INVALID_STATUS",
            )?,
        ],
        // Parent existence is enforced by the referential pruner.
        Entity::Event => vec![
            present("log_id_present", "log_id", "MISSING_LOG_ID"),
            present(
                "parent_transaction_present",
                "transaction_id",
                "MISSING_TRANSACTION_ID",
            ),
        ],
    };

    RuleSet::new(entity, rules)
}
