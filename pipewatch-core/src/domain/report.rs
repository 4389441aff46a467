//! Firm report model
//!
//! Condenses raw research results into per-company insurance costs. Each
//! company is reported for a single filing year picked by
//! [`preferred_year`]; Schedule A plans of that year are summed into
//! premiums, brokerage fees and people covered.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::dto::report::{CompanyRecord, Form5500Record, ResearchResults, ScheduleAPlan};

/// Filing year
pub type Year = i32;

/// Years picked before any other, best first
pub const PREFERRED_YEARS: [Year; 2] = [2023, 2022];

/// Year whose filings are still incomplete; picked only when nothing else
/// is on file
pub const INCOMPLETE_YEAR: Year = 2024;

/// Headline year of a report in which no company has a dated filing
pub const DEFAULT_REPORT_YEAR: Year = 2023;

/// Name used for a company record without one
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// Picks the filing year to report
///
/// 2023 beats 2022, which beats any other year. Among other years the most
/// recent wins, except that [`INCOMPLETE_YEAR`] is used only when it is the
/// only year available.
pub fn preferred_year(years: &[Year]) -> Option<Year> {
    if let Some(year) = PREFERRED_YEARS.iter().find(|year| years.contains(year)) {
        return Some(*year);
    }

    years
        .iter()
        .copied()
        .filter(|year| *year != INCOMPLETE_YEAR)
        .max()
        .or_else(|| years.iter().copied().max())
}

/// Picks the headline year of a whole report from the companies' years
pub fn report_year(years: &[Year]) -> Year {
    PREFERRED_YEARS
        .iter()
        .find(|year| years.contains(year))
        .copied()
        .or_else(|| years.iter().copied().max())
        .unwrap_or(DEFAULT_REPORT_YEAR)
}

/// Costs of one insurance plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanCosts {
    pub benefit_type: String,
    pub carrier_name: String,
    pub premiums: f64,
    pub brokerage_fees: f64,
    pub people_covered: u64,
}

impl From<&ScheduleAPlan> for PlanCosts {
    fn from(plan: &ScheduleAPlan) -> Self {
        Self {
            benefit_type: plan.benefit_type.clone(),
            carrier_name: plan.carrier_name.clone(),
            premiums: plan.total_charges,
            brokerage_fees: plan.broker_commission,
            people_covered: plan.persons_covered,
        }
    }
}

/// Schedule A plans of one year and their sums
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleATotals {
    pub total_premiums: f64,
    pub total_brokerage_fees: f64,
    pub total_people_covered: u64,
    pub plans: Vec<PlanCosts>,
}

/// Sums the Schedule A plans filed for `year`
///
/// A year without filings yields zero totals and no plans.
pub fn aggregate_schedule_a(
    details: &BTreeMap<String, Vec<ScheduleAPlan>>,
    year: Year,
) -> ScheduleATotals {
    let mut totals = ScheduleATotals::default();

    for plan in filed_in(details, year) {
        totals.total_premiums += plan.total_charges;
        totals.total_brokerage_fees += plan.broker_commission;
        totals.total_people_covered += plan.persons_covered;
        totals.plans.push(PlanCosts::from(plan));
    }

    totals
}

/// Active participants over every Form 5500 record filed for `year`
pub fn total_participants(records: &BTreeMap<String, Vec<Form5500Record>>, year: Year) -> u64 {
    filed_in(records, year)
        .iter()
        .map(|record| record.active_participants)
        .sum()
}

/// Entries of a year-keyed map for `year`
///
/// Keys are compared as numbers, so " 2023" and "2023" match.
fn filed_in<T>(by_year: &BTreeMap<String, Vec<T>>, year: Year) -> &[T] {
    by_year
        .iter()
        .find(|(key, _)| key.trim().parse::<Year>() == Ok(year))
        .map(|(_, entries)| entries.as_slice())
        .unwrap_or(&[])
}

/// Numeric years among the keys of a year-keyed map
fn years_of<T>(by_year: &BTreeMap<String, Vec<T>>) -> Vec<Year> {
    by_year
        .keys()
        .filter_map(|key| match key.trim().parse::<Year>() {
            Ok(year) => Some(year),
            Err(_) => {
                warn!("Ignoring filing year '{}': not a number", key);
                None
            }
        })
        .collect()
}

/// Report line for one company
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyCosts {
    pub company_name: String,
    /// Year the figures are taken from. May be set without cost data when
    /// only Form 5500 filings exist.
    pub data_year: Option<Year>,
    /// True when Schedule A filings exist for `data_year`
    pub has_data: bool,
    pub total_premiums: f64,
    pub total_brokerage_fees: f64,
    pub total_people_covered: u64,
    pub total_participants: u64,
    pub plans: Vec<PlanCosts>,
}

impl CompanyCosts {
    /// Builds a company's report line from its raw research record
    ///
    /// The year comes from the Schedule A filings, falling back to the
    /// Form 5500 years when there are none.
    pub fn from_record(record: &CompanyRecord) -> Self {
        let details = &record.schedule_a.details;
        let schedule_year = preferred_year(&years_of(details));
        let data_year = schedule_year.or_else(|| preferred_year(&record.form5500.years));

        let totals = schedule_year
            .map(|year| aggregate_schedule_a(details, year))
            .unwrap_or_default();

        Self {
            company_name: record
                .company_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            data_year,
            has_data: schedule_year.is_some(),
            total_premiums: totals.total_premiums,
            total_brokerage_fees: totals.total_brokerage_fees,
            total_people_covered: totals.total_people_covered,
            total_participants: data_year
                .map(|year| total_participants(&record.form5500.records, year))
                .unwrap_or(0),
            plans: totals.plans,
        }
    }
}

/// Headline numbers of a firm report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_companies: usize,
    pub companies_with_data: usize,
    pub most_recent_year: Year,
}

/// Insurance costs across a firm's portfolio companies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirmReport {
    pub firm_name: String,
    pub timestamp: Option<String>,
    pub summary: ReportSummary,
    pub companies: Vec<CompanyCosts>,
}

impl FirmReport {
    /// Builds the report from raw research results
    pub fn from_results(firm_name: impl Into<String>, results: &ResearchResults) -> Self {
        let companies: Vec<CompanyCosts> = results
            .companies
            .iter()
            .map(CompanyCosts::from_record)
            .collect();

        let years: Vec<Year> = companies.iter().filter_map(|c| c.data_year).collect();

        Self {
            firm_name: firm_name.into(),
            timestamp: results.timestamp.clone(),
            summary: ReportSummary {
                total_companies: companies.len(),
                companies_with_data: companies.iter().filter(|c| c.has_data).count(),
                most_recent_year: report_year(&years),
            },
            companies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn company(value: serde_json::Value) -> CompanyRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_preferred_year_priority() {
        assert_eq!(preferred_year(&[2021, 2022, 2023, 2024]), Some(2023));
        assert_eq!(preferred_year(&[2024, 2022, 2021]), Some(2022));
        assert_eq!(preferred_year(&[2019, 2024, 2021]), Some(2021));
    }

    #[test]
    fn test_incomplete_year_only_when_alone() {
        assert_eq!(preferred_year(&[2024]), Some(2024));
        assert_eq!(preferred_year(&[2024, 2018]), Some(2018));
        assert_eq!(preferred_year(&[2024, 2024]), Some(2024));
    }

    #[test]
    fn test_preferred_year_edge_cases() {
        assert_eq!(preferred_year(&[]), None);
        // Later years are plain "other" years
        assert_eq!(preferred_year(&[2025, 2024]), Some(2025));
        assert_eq!(preferred_year(&[2025, 2022]), Some(2022));
    }

    #[test]
    fn test_report_year() {
        assert_eq!(report_year(&[]), DEFAULT_REPORT_YEAR);
        assert_eq!(report_year(&[2021, 2022, 2024]), 2022);
        assert_eq!(report_year(&[2023, 2020]), 2023);
        assert_eq!(report_year(&[2019, 2024]), 2024);
    }

    #[test]
    fn test_aggregate_schedule_a() {
        let record = company(json!({
            "scheduleA": { "details": {
                "2022": [{ "totalCharges": "999" }],
                "2023": [
                    {
                        "benefitType": "Medical",
                        "carrierName": "Aetna",
                        "totalCharges": "100000",
                        "brokerCommission": "4500.50",
                        "personsCovered": "250"
                    },
                    {
                        "benefitType": "Dental",
                        "carrierName": "Delta",
                        "totalCharges": "12000",
                        "brokerCommission": "",
                        "personsCovered": ""
                    }
                ]
            }}
        }));

        let totals = aggregate_schedule_a(&record.schedule_a.details, 2023);
        assert_eq!(totals.total_premiums, 112_000.0);
        assert_eq!(totals.total_brokerage_fees, 4_500.50);
        assert_eq!(totals.total_people_covered, 250);
        assert_eq!(totals.plans.len(), 2);
        assert_eq!(totals.plans[1].carrier_name, "Delta");

        let missing = aggregate_schedule_a(&record.schedule_a.details, 2019);
        assert_eq!(missing, ScheduleATotals::default());
    }

    #[test]
    fn test_total_participants() {
        let record = company(json!({
            "form5500": { "records": {
                "2023": [
                    { "active_participants": 80 },
                    { "active_participants": null },
                    { "active_participants": "20" }
                ]
            }}
        }));

        assert_eq!(total_participants(&record.form5500.records, 2023), 100);
        assert_eq!(total_participants(&record.form5500.records, 2022), 0);
    }

    #[test]
    fn test_company_costs_use_preferred_year() {
        let record = company(json!({
            "companyName": "Initech",
            "scheduleA": { "details": {
                "2024": [{ "totalCharges": "500000", "personsCovered": "900" }],
                "2021": [{ "totalCharges": "300000", "personsCovered": "700" }]
            }},
            "form5500": { "records": {
                "2021": [{ "active_participants": 650 }],
                "2024": [{ "active_participants": 880 }]
            }}
        }));

        let costs = CompanyCosts::from_record(&record);
        assert_eq!(costs.company_name, "Initech");
        assert_eq!(costs.data_year, Some(2021));
        assert!(costs.has_data);
        assert_eq!(costs.total_premiums, 300_000.0);
        assert_eq!(costs.total_people_covered, 700);
        assert_eq!(costs.total_participants, 650);
    }

    #[test]
    fn test_company_without_schedule_a_falls_back_to_form5500_year() {
        let record = company(json!({
            "form5500": {
                "years": [2022, 2023],
                "records": { "2023": [{ "active_participants": 40 }] }
            }
        }));

        let costs = CompanyCosts::from_record(&record);
        assert_eq!(costs.company_name, UNKNOWN_COMPANY);
        assert_eq!(costs.data_year, Some(2023));
        assert!(!costs.has_data);
        assert_eq!(costs.total_premiums, 0.0);
        assert!(costs.plans.is_empty());
        assert_eq!(costs.total_participants, 40);
    }

    #[test]
    fn test_firm_report_summary() {
        let results: ResearchResults = serde_json::from_value(json!({
            "timestamp": "2025-01-31T10:00:00",
            "companies": [
                { "companyName": "A", "scheduleA": { "details": { "2022": [] } } },
                { "companyName": "B", "scheduleA": { "details": { "2020": [] } } },
                { "companyName": "C" }
            ]
        }))
        .unwrap();

        let report = FirmReport::from_results("Acme Capital", &results);
        assert_eq!(report.firm_name, "Acme Capital");
        assert_eq!(report.timestamp.as_deref(), Some("2025-01-31T10:00:00"));
        assert_eq!(
            report.summary,
            ReportSummary {
                total_companies: 3,
                companies_with_data: 2,
                most_recent_year: 2022,
            }
        );
        assert_eq!(report.companies[2].data_year, None);
    }

    #[test]
    fn test_empty_firm_report() {
        let report = FirmReport::from_results("Nobody", &ResearchResults::default());
        assert_eq!(report.summary.total_companies, 0);
        assert_eq!(report.summary.companies_with_data, 0);
        assert_eq!(report.summary.most_recent_year, DEFAULT_REPORT_YEAR);
    }
}
