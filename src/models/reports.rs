//! Report types for the Xero reporting endpoints.
//!
//! Report rows stay loosely typed: the row tree varies per report and the
//! caller gets it as raw JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::XeroError;

/// The reports this client can fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    BalanceSheet,
    ProfitAndLoss,
    TrialBalance,
}

impl ReportKind {
    /// API path under the accounting base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ReportKind::BalanceSheet => "Reports/BalanceSheet",
            ReportKind::ProfitAndLoss => "Reports/ProfitAndLoss",
            ReportKind::TrialBalance => "Reports/TrialBalance",
        }
    }

    /// Stable identifier used in CLI arguments and cache keys.
    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::BalanceSheet => "balance-sheet",
            ReportKind::ProfitAndLoss => "profit-and-loss",
            ReportKind::TrialBalance => "trial-balance",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ReportKind {
    type Err = XeroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance-sheet" => Ok(ReportKind::BalanceSheet),
            "profit-and-loss" => Ok(ReportKind::ProfitAndLoss),
            "trial-balance" => Ok(ReportKind::TrialBalance),
            other => Err(XeroError::InvalidArgument(format!(
                "unknown report '{}', expected balance-sheet, profit-and-loss, or trial-balance",
                other
            ))),
        }
    }
}

/// A report with its row tree left as raw JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Report {
    #[serde(rename = "ReportID", skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub rows: Value,
}

/// Envelope for report responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsResponse {
    #[serde(rename = "Reports", default)]
    pub reports: Vec<Report>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_kind_round_trip() {
        for kind in [
            ReportKind::BalanceSheet,
            ReportKind::ProfitAndLoss,
            ReportKind::TrialBalance,
        ] {
            assert_eq!(kind.slug().parse::<ReportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_report_kind_unknown() {
        let result = "cashflow".parse::<ReportKind>();
        assert!(matches!(result, Err(XeroError::InvalidArgument(_))));
    }

    #[test]
    fn test_report_deserialize() {
        let json = r#"{
            "Reports": [{
                "ReportID": "BalanceSheet",
                "ReportName": "Balance Sheet",
                "ReportDate": "06 August 2026",
                "Rows": [{"RowType": "Header", "Cells": [{"Value": ""}]}]
            }]
        }"#;
        let resp: ReportsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.reports.len(), 1);
        assert_eq!(
            resp.reports[0].report_name.as_deref(),
            Some("Balance Sheet")
        );
        assert!(resp.reports[0].rows.is_array());
    }
}
