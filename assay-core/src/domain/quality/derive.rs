// assay-core/src/domain/quality/derive.rs

use serde::Serialize;

use crate::domain::record::CleanRecord;

/// Static conversion rates applied to clean transaction amounts.
pub const FX_RATES: [(&str, f64); 6] = [
    ("USD", 1.53),
    ("EUR", 1.65),
    ("GBP", 1.90),
    ("JPY", 0.013),
    ("CAD", 1.12),
    ("AUD", 1.00),
];

pub fn fx_rate(currency: &str) -> Option<f64> {
    FX_RATES
        .iter()
        .find(|(code, _)| *code == currency)
        .map(|(_, rate)| *rate)
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCategory {
    Fraud,
    Timeout,
    SystemError,
    Declined,
    None,
    Other,
}

impl FailureCategory {
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            Some("FRAUD_DETECTED") => Self::Fraud,
            Some("TIMED_OUT") => Self::Timeout,
            Some("ERROR") => Self::SystemError,
            Some("DECLINED") => Self::Declined,
            Some("APPROVED") => Self::None,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fraud => "FRAUD",
            Self::Timeout => "TIMEOUT",
            Self::SystemError => "SYSTEM_ERROR",
            Self::Declined => "DECLINED",
            Self::None => "NONE",
            Self::Other => "OTHER",
        }
    }
}

/// A clean transaction with its downstream-facing fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedTransaction {
    #[serde(flatten)]
    pub record: CleanRecord,
    pub amount_converted: Option<f64>,
    pub is_fraud: bool,
    pub failure_category: FailureCategory,
}

pub struct Deriver;

impl Deriver {
    pub fn derive(record: CleanRecord) -> DerivedTransaction {
        let status = record.get("transaction_status").as_text();
        let amount_converted = record.get("amount").as_number().zip(
            record
                .get("currency")
                .as_text()
                .and_then(fx_rate),
        );

        DerivedTransaction {
            amount_converted: amount_converted.map(|(amount, rate)| round2(amount * rate)),
            is_fraud: status == Some("FRAUD_DETECTED"),
            failure_category: FailureCategory::from_status(status),
            record,
        }
    }

    pub fn derive_all(records: Vec<CleanRecord>) -> Vec<DerivedTransaction> {
        records.into_iter().map(Self::derive).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::record::Value;
    use std::collections::BTreeMap;

    fn transaction(amount: f64, currency: &str, status: &str) -> CleanRecord {
        let mut fields = BTreeMap::new();
        fields.insert("transaction_id".to_string(), Value::Text("T1".into()));
        fields.insert("amount".to_string(), Value::Number(amount));
        fields.insert("currency".to_string(), Value::Text(currency.into()));
        fields.insert(
            "transaction_status".to_string(),
            Value::Text(status.into()),
        );
        CleanRecord {
            key: "T1".into(),
            fields,
            ingested_at: None,
        }
    }

    #[test]
    fn test_fraud_detected_is_flagged() {
        let derived = Deriver::derive(transaction(10.0, "AUD", "FRAUD_DETECTED"));
        assert!(derived.is_fraud);
        assert_eq!(derived.failure_category, FailureCategory::Fraud);
        assert_eq!(derived.failure_category.as_str(), "FRAUD");
    }

    #[test]
    fn test_failure_categories() {
        let cases = [
            ("TIMED_OUT", "TIMEOUT"),
            ("ERROR", "SYSTEM_ERROR"),
            ("DECLINED", "DECLINED"),
            ("APPROVED", "NONE"),
            ("SOMETHING_ELSE", "OTHER"),
        ];
        for (status, expected) in cases {
            let derived = Deriver::derive(transaction(1.0, "USD", status));
            assert_eq!(derived.failure_category.as_str(), expected);
            assert!(!derived.is_fraud);
        }
    }

    #[test]
    fn test_amount_converted_uses_fixed_rates() {
        for (currency, amount) in [("USD", 19.99), ("EUR", 250.0), ("JPY", 12345.0), ("GBP", 0.01)] {
            let derived = Deriver::derive(transaction(amount, currency, "APPROVED"));
            let expected = ((amount * fx_rate(currency).unwrap()) * 100.0).round() / 100.0;
            assert_eq!(derived.amount_converted, Some(expected));
        }
        assert_eq!(
            Deriver::derive(transaction(100.0, "USD", "APPROVED")).amount_converted,
            Some(153.0)
        );
        assert_eq!(
            Deriver::derive(transaction(1000.0, "JPY", "APPROVED")).amount_converted,
            Some(13.0)
        );
    }

    #[test]
    fn test_serialized_shape() -> anyhow::Result<()> {
        let derived = Deriver::derive(transaction(100.0, "USD", "DECLINED"));
        let json = serde_json::to_value(&derived)?;
        assert_eq!(json["amount_converted"], serde_json::json!(153.0));
        assert_eq!(json["failure_category"], "DECLINED");
        assert_eq!(json["is_fraud"], false);
        assert_eq!(json["currency"], "USD");
        assert!(json.get("key").is_none());
        Ok(())
    }
}
