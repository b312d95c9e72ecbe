// assay-core/src/domain/quality/rules/mod.rs

pub mod catalog;

pub use catalog::rules_for;

use std::collections::BTreeSet;

use crate::domain::entity::Entity;
use crate::domain::error::DomainError;
use crate::domain::record::{StandardizedRecord, Value, ViolationKind};

/// Reason recorded when a failure is not explained by a listed rule.
pub const UNCLASSIFIED_REASON: &str = "OTHER";

/// Condition checked on a present (non-absent) value.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Present,
    Numeric,
    /// Closed interval, numeric values only.
    Between { min: f64, max: f64 },
    GreaterThan(f64),
    /// Text value in the given canonical set.
    OneOf(Vec<String>),
}

impl Predicate {
    fn holds(&self, value: &Value) -> bool {
        match self {
            Self::Present => true,
            Self::Numeric => value.as_number().is_some(),
            Self::Between { min, max } => value
                .as_number()
                .is_some_and(|n| *min <= n && n <= *max),
            Self::GreaterThan(bound) => value.as_number().is_some_and(|n| n > *bound),
            Self::OneOf(allowed) => value
                .as_text()
                .is_some_and(|t| allowed.iter().any(|a| a == t)),
        }
    }
}

/// One named rule: `(name, predicate, verdict when the field is absent)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: &'static str,
    pub reason: &'static str,
    pub kind: ViolationKind,
    pub field: &'static str,
    pub predicate: Predicate,
    pub passes_when_absent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Pass,
    Fail,
    /// The record does not carry the field the rule reads.
    Unclassified,
}

impl Rule {
    pub fn check(&self, record: &StandardizedRecord) -> Check {
        match record.get(self.field) {
            None => Check::Unclassified,
            Some(Value::Absent) if self.passes_when_absent => Check::Pass,
            Some(Value::Absent) => Check::Fail,
            Some(value) if self.predicate.holds(value) => Check::Pass,
            Some(_) => Check::Fail,
        }
    }
}

/// The single failure kept for a rejected record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: &'static str,
    pub reason: &'static str,
    pub kind: ViolationKind,
}

/// Ordered rules of one entity. Order is priority.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    entity: Entity,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(entity: Entity, rules: Vec<Rule>) -> Result<Self, DomainError> {
        let mut seen = BTreeSet::new();
        for rule in &rules {
            if !seen.insert(rule.name) {
                return Err(DomainError::InvalidDefinition {
                    entity: entity.table().to_string(),
                    reason: format!("duplicate rule name '{}'", rule.name),
                });
            }
            if entity.schema().field(rule.field).is_none() {
                return Err(DomainError::InvalidDefinition {
                    entity: entity.table().to_string(),
                    reason: format!("rule '{}' reads unknown field '{}'", rule.name, rule.field),
                });
            }
        }
        Ok(Self { entity, rules })
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First failing rule in priority order, `None` when the record is clean.
    pub fn first_violation(&self, record: &StandardizedRecord) -> Option<Violation> {
        self.rules.iter().find_map(|rule| match rule.check(record) {
            Check::Pass => None,
            Check::Fail => Some(Violation {
                rule: rule.name,
                reason: rule.reason,
                kind: rule.kind,
            }),
            Check::Unclassified => Some(Violation {
                rule: rule.name,
                reason: UNCLASSIFIED_REASON,
                kind: ViolationKind::Unclassified,
            }),
        })
    }

    /// Names of every rule the record fails, ignoring priority.
    pub fn failing_rules(&self, record: &StandardizedRecord) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| rule.check(record) != Check::Pass)
            .map(|rule| rule.name)
            .collect()
    }
}
