//! Calculation request models for CSV parsing and internal representation.

use crate::projection::{GoalInput, ProjectionInput};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Raw calculation request as read from CSV.
///
/// Numeric fields are read as strings so that blank optional columns and
/// stray whitespace are tolerated.
#[derive(Debug, Deserialize)]
pub struct RequestRecord {
    /// Calculator: sip, lumpsum, goal
    pub calculator: String,

    /// Request ID (unique per file, u32)
    pub id: u32,

    /// Monthly contribution, lump-sum principal or goal target
    pub amount: Option<String>,

    /// Expected annual return in percent
    pub rate: Option<String>,

    /// Tenure in whole years
    pub years: Option<String>,

    /// Yearly step-up in percent (sip only)
    #[serde(default)]
    pub step_up: Option<String>,

    /// One-time investment (sip) or existing savings (goal)
    #[serde(default)]
    pub lump_sum: Option<String>,
}

impl RequestRecord {
    /// Parses the raw CSV record into a typed request.
    ///
    /// Returns `None` if the record is malformed (unknown calculator, missing
    /// required field, unparsable number). Range checks are left to the
    /// calculators.
    pub fn parse(&self) -> Option<ParsedRequest> {
        let calculator = self.calculator.trim().to_lowercase();
        let amount = parse_decimal(&self.amount)?;
        let rate = parse_decimal(&self.rate)?;
        let years = self.years.as_deref()?.trim().parse::<u32>().ok()?;

        // Optional columns are only read by the calculators that use them.
        let kind = match calculator.as_str() {
            "sip" => {
                let step_up = parse_optional_decimal(&self.step_up)?;
                let lump_sum = parse_optional_decimal(&self.lump_sum)?;
                RequestKind::Sip(
                    ProjectionInput::sip(amount, rate, years)
                        .with_step_up(step_up)
                        .with_lump_sum(lump_sum),
                )
            }
            "lumpsum" | "lump_sum" | "lump-sum" => RequestKind::LumpSum {
                principal: amount,
                annual_rate_percent: rate,
                years,
            },
            "goal" => {
                let existing_savings = parse_optional_decimal(&self.lump_sum)?;
                RequestKind::Goal(
                    GoalInput::new(amount, rate, years).with_existing_savings(existing_savings),
                )
            }
            _ => return None,
        };

        Some(ParsedRequest { id: self.id, kind })
    }
}

/// Parses a required decimal column.
fn parse_decimal(field: &Option<String>) -> Option<Decimal> {
    let trimmed = field.as_ref()?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Parses an optional decimal column, treating absent or blank as zero.
///
/// Returns `None` only when a value is present but not a number.
fn parse_optional_decimal(field: &Option<String>) -> Option<Decimal> {
    match field.as_deref().map(str::trim) {
        None | Some("") => Some(Decimal::ZERO),
        Some(value) => Decimal::from_str(value).ok(),
    }
}

/// A parsed request ready for computation.
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    /// Request ID
    pub id: u32,

    /// Calculator with its inputs
    pub kind: RequestKind,
}

/// Calculator variants with associated inputs.
#[derive(Debug, Clone)]
pub enum RequestKind {
    /// Monthly SIP, optionally stepped up and topped with a lump sum.
    Sip(ProjectionInput),

    /// One-time investment.
    LumpSum {
        principal: Decimal,
        annual_rate_percent: Decimal,
        years: u32,
    },

    /// Monthly contribution required to reach a target.
    Goal(GoalInput),
}

impl RequestKind {
    /// Canonical calculator name used in output.
    pub fn name(&self) -> &'static str {
        match self {
            RequestKind::Sip(_) => "sip",
            RequestKind::LumpSum { .. } => "lumpsum",
            RequestKind::Goal(_) => "goal",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
