// assay-core/src/domain/quality/standardize/mod.rs

pub mod enumeration;
pub mod transforms;

pub use enumeration::{EnumerationCatalog, EnumerationDomain, FallbackPolicy};

use std::collections::BTreeMap;

use crate::domain::entity::{Entity, EntitySchema, FieldKind, FieldSpec};
use crate::domain::error::DomainError;
use crate::domain::record::{RawRecord, RawValue, StandardizedRecord, Value};
use transforms::TextPatterns;

/// Canonicalizes the fields of one entity. Never fails per record.
#[derive(Debug, Clone)]
pub struct Standardizer {
    schema: &'static EntitySchema,
    domains: BTreeMap<&'static str, EnumerationDomain>,
    patterns: TextPatterns,
}

impl Standardizer {
    /// Binds the entity schema to its enumeration domains. Fails when the
    /// schema references a domain the catalog does not define.
    pub fn new(entity: Entity, catalog: &EnumerationCatalog) -> Result<Self, DomainError> {
        let schema = entity.schema();
        let mut domains = BTreeMap::new();
        for spec in schema.fields {
            if let FieldKind::Enumeration(name) | FieldKind::CurrencyCode(name) = spec.kind {
                let domain = catalog.get(name).ok_or_else(|| DomainError::InvalidDefinition {
                    entity: entity.table().to_string(),
                    reason: format!("field '{}' uses unknown domain '{}'", spec.name, name),
                })?;
                domains.insert(name, domain.clone());
            }
        }

        let patterns = TextPatterns::new().map_err(|e| DomainError::InvalidDefinition {
            entity: entity.table().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            schema,
            domains,
            patterns,
        })
    }

    pub fn standardize(&self, record: RawRecord) -> StandardizedRecord {
        let fields = self
            .schema
            .fields
            .iter()
            .map(|spec| {
                (
                    spec.name.to_string(),
                    self.standardize_field(spec, record.field(spec.name)),
                )
            })
            .collect();

        StandardizedRecord {
            key: record.key.clone(),
            fields,
            ingested_at: record.ingested_at,
            raw: record,
        }
    }

    pub fn standardize_field(&self, spec: &FieldSpec, raw: &RawValue) -> Value {
        match spec.kind {
            FieldKind::Identifier => transforms::identifier(raw),
            FieldKind::Categorical => transforms::categorical(raw),
            FieldKind::FreeText => self.patterns.free_text(raw),
            FieldKind::Numeric => transforms::numeric(raw),
            FieldKind::Date => transforms::date(raw),
            FieldKind::Timestamp => transforms::timestamp(raw),
            FieldKind::Enumeration(name) => {
                let input = transforms::enumeration_input(raw);
                self.resolve(name, input.as_deref())
            }
            FieldKind::CurrencyCode(name) => {
                let input = self.patterns.letters_only(raw);
                self.resolve(name, input.as_deref())
            }
        }
    }

    fn resolve(&self, domain: &str, input: Option<&str>) -> Value {
        // Domains are bound in `new`, a miss cannot happen for schema fields.
        self.domains
            .get(domain)
            .map(|d| d.resolve(input))
            .unwrap_or(Value::Absent)
    }
}
