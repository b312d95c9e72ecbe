// assay-core/src/domain/quality/standardize/enumeration.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::domain::error::DomainError;
use crate::domain::record::Value;

/// What an enumeration field becomes when its value is empty or unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Empty or unrecognized -> absent.
    #[default]
    Absent,
    /// Non-empty unrecognized -> `value`; empty stays absent.
    CatchAll { value: String },
    /// Empty or unrecognized -> `value`. The field always resolves.
    Default { value: String },
}

/// Canonical set + synonym table + fallback policy for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EnumerationDomain {
    #[validate(length(min = 1, message = "canonical set cannot be empty"))]
    pub canonical: Vec<String>,
    #[serde(default)]
    pub synonyms: BTreeMap<String, String>,
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

impl EnumerationDomain {
    pub fn new(canonical: &[&str], synonyms: &[(&str, &str)], fallback: FallbackPolicy) -> Self {
        Self {
            canonical: canonical.iter().map(|s| s.to_string()).collect(),
            synonyms: synonyms
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            fallback,
        }
    }

    /// Resolves a trimmed, uppercased input to its canonical form.
    pub fn resolve(&self, input: Option<&str>) -> Value {
        let Some(input) = input.filter(|s| !s.is_empty()) else {
            return match &self.fallback {
                FallbackPolicy::Default { value } => Value::Text(value.clone()),
                FallbackPolicy::Absent | FallbackPolicy::CatchAll { .. } => Value::Absent,
            };
        };

        if self.canonical.iter().any(|c| c == input) {
            return Value::Text(input.to_string());
        }
        if let Some(target) = self.synonyms.get(input) {
            return Value::Text(target.clone());
        }

        match &self.fallback {
            FallbackPolicy::Absent => Value::Absent,
            FallbackPolicy::CatchAll { value } | FallbackPolicy::Default { value } => {
                Value::Text(value.clone())
            }
        }
    }

    /// Uppercases every entry and checks that synonyms land in the canonical set.
    fn normalized(self, name: &str) -> Result<Self, DomainError> {
        self.validate()
            .map_err(|e| invalid_domain(name, &e.to_string()))?;

        let canonical: Vec<String> = self
            .canonical
            .iter()
            .map(|c| c.trim().to_uppercase())
            .collect();
        let mut synonyms = BTreeMap::new();
        for (from, to) in self.synonyms {
            let to = to.trim().to_uppercase();
            if !canonical.contains(&to) {
                return Err(invalid_domain(
                    name,
                    &format!("synonym target '{}' is not a canonical value", to),
                ));
            }
            synonyms.insert(from.trim().to_uppercase(), to);
        }
        Ok(Self {
            canonical,
            synonyms,
            fallback: self.fallback,
        })
    }
}

fn invalid_domain(name: &str, reason: &str) -> DomainError {
    DomainError::InvalidDefinition {
        entity: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Every enumeration domain known to the standardizer, keyed by
/// `<entity>.<field>` name.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationCatalog {
    domains: BTreeMap<String, EnumerationDomain>,
}

impl Default for EnumerationCatalog {
    fn default() -> Self {
        use FallbackPolicy::{Absent, CatchAll, Default as Always};

        let domains = [
            (
                "customer.account_status",
                EnumerationDomain::new(
                    &["ACTIVE", "SUSPENDED", "CLOSED"],
                    &[],
                    Always {
                        value: "UNKNOWN".into(),
                    },
                ),
            ),
            (
                "customer.payment_method",
                EnumerationDomain::new(
                    &["CARD", "BANK_TRANSFER", "WALLET"],
                    &[("CREDIT_CARD", "CARD"), ("DEBIT_CARD", "CARD")],
                    CatchAll {
                        value: "OTHER".into(),
                    },
                ),
            ),
            (
                "merchant.processing_tier",
                EnumerationDomain::new(
                    &["STANDARD", "PREMIUM", "ENTERPRISE"],
                    &[("GOLD", "STANDARD"), ("STANDRD", "STANDARD")],
                    Always {
                        value: "STANDARD".into(),
                    },
                ),
            ),
            (
                "merchant.account_status",
                EnumerationDomain::new(&["ACTIVE", "SUSPENDED", "PENDING"], &[], Absent),
            ),
            (
                "merchant.risk_level",
                EnumerationDomain::new(&["LOW", "MEDIUM", "HIGH"], &[], Absent),
            ),
            (
                "transaction.currency",
                EnumerationDomain::new(&["USD", "EUR", "GBP", "JPY", "CAD", "AUD"], &[], Absent),
            ),
            (
                "transaction.status",
                EnumerationDomain::new(
                    &["APPROVED", "DECLINED", "TIMED_OUT", "FRAUD_DETECTED", "ERROR"],
                    &[("TIMEOUT", "TIMED_OUT")],
                    Absent,
                ),
            ),
        ];

        Self {
            domains: domains
                .into_iter()
                .map(|(name, domain)| (name.to_string(), domain))
                .collect(),
        }
    }
}

impl EnumerationCatalog {
    /// Replaces built-in domains with project overrides. Overriding a
    /// domain that does not exist is an error.
    pub fn with_overrides(
        mut self,
        overrides: &BTreeMap<String, EnumerationDomain>,
    ) -> Result<Self, DomainError> {
        for (name, domain) in overrides {
            if !self.domains.contains_key(name) {
                return Err(invalid_domain(name, "unknown enumeration domain"));
            }
            let normalized = domain.clone().normalized(name)?;
            self.domains.insert(name.clone(), normalized);
        }
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&EnumerationDomain> {
        self.domains.get(name)
    }
}
