//! Report DTOs for the remote pipeline API
//!
//! The report endpoint returns the research results gathered for a firm:
//! one record per portfolio company with its Schedule A insurance filings
//! and Form 5500 participant counts, both keyed by filing year.
//!
//! Filing data comes from scraped government forms, so numeric fields may
//! arrive as numbers, numeric strings, empty strings or `null`. Empty and
//! missing values read as zero.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Body returned by the report endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchResults {
    #[serde(default)]
    pub firm_name: Option<String>,
    /// When the research run finished, as reported by the server
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub companies: Vec<CompanyRecord>,
}

/// Raw research data for one company
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub schedule_a: ScheduleA,
    #[serde(default)]
    pub form5500: Form5500,
}

/// Schedule A insurance filings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleA {
    /// Plans keyed by filing year ("2023")
    #[serde(default)]
    pub details: BTreeMap<String, Vec<ScheduleAPlan>>,
}

/// One insurance contract reported on Schedule A
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAPlan {
    #[serde(default)]
    pub benefit_type: String,
    #[serde(default)]
    pub carrier_name: String,
    /// Premiums paid to the carrier
    #[serde(default, deserialize_with = "lenient")]
    pub total_charges: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub broker_commission: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub persons_covered: u64,
}

/// Form 5500 filings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Form5500 {
    /// Years with a filing on record, even when no record was parsed
    #[serde(default, deserialize_with = "lenient_list")]
    pub years: Vec<i32>,
    /// Filing records keyed by year
    #[serde(default)]
    pub records: BTreeMap<String, Vec<Form5500Record>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Form5500Record {
    #[serde(default, deserialize_with = "lenient")]
    pub active_participants: u64,
}

/// Reads a number given as a JSON number or a numeric string
fn number_from_value<T>(value: Value) -> Result<T, String>
where
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    let raw = match value {
        Value::Null => return Ok(T::default()),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        other => return Err(format!("expected a number, got {}", other)),
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(T::default());
    }
    raw.parse()
        .map_err(|e| format!("invalid number '{}': {}", raw, e))
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    let value = Value::deserialize(deserializer)?;
    number_from_value(value).map_err(de::Error::custom)
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    values
        .into_iter()
        .map(|value| number_from_value(value).map_err(de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_amounts_accept_strings_numbers_and_blanks() {
        let plans: Vec<ScheduleAPlan> = serde_json::from_value(json!([
            {
                "benefitType": "Medical",
                "carrierName": "Aetna",
                "totalCharges": "125000.50",
                "brokerCommission": "",
                "personsCovered": "310"
            },
            {
                "benefitType": "Dental",
                "carrierName": "Delta",
                "totalCharges": 8000,
                "brokerCommission": null,
                "personsCovered": 42
            },
            { "benefitType": "Life" }
        ]))
        .unwrap();

        assert_eq!(plans[0].total_charges, 125_000.50);
        assert_eq!(plans[0].broker_commission, 0.0);
        assert_eq!(plans[0].persons_covered, 310);
        assert_eq!(plans[1].total_charges, 8_000.0);
        assert_eq!(plans[1].broker_commission, 0.0);
        assert_eq!(plans[1].persons_covered, 42);
        assert_eq!(plans[2].carrier_name, "");
        assert_eq!(plans[2].total_charges, 0.0);
    }

    #[test]
    fn test_rejects_garbage_amount() {
        let result: Result<ScheduleAPlan, _> =
            serde_json::from_value(json!({ "totalCharges": "n/a" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_company_record_wire_names() {
        let record: CompanyRecord = serde_json::from_value(json!({
            "companyName": "Globex",
            "scheduleA": { "details": { "2022": [] } },
            "form5500": {
                "years": ["2021", 2022],
                "records": { "2022": [{ "active_participants": 120 }] }
            }
        }))
        .unwrap();

        assert_eq!(record.company_name.as_deref(), Some("Globex"));
        assert!(record.schedule_a.details.contains_key("2022"));
        assert_eq!(record.form5500.years, vec![2021, 2022]);
        assert_eq!(record.form5500.records["2022"][0].active_participants, 120);
    }

    #[test]
    fn test_empty_results() {
        let results: ResearchResults = serde_json::from_value(json!({})).unwrap();
        assert!(results.companies.is_empty());
        assert!(results.firm_name.is_none());
    }
}
