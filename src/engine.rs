//! Batch projection engine.
//!
//! Streams calculation requests from CSV, runs each through its calculator
//! and keeps the outcomes for output. Rows that cannot be parsed or that a
//! calculator rejects are logged and skipped.

use crate::decimal::Money;
use crate::error::Result;
use crate::projection::{
    compute_lump_sum, compute_required_contribution, compute_sip, YearlyProjection,
};
use crate::request::{ParsedRequest, RequestKind, RequestRecord};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Computed figures for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationOutcome {
    pub calculator: &'static str,
    pub invested: Money,
    pub returns: Money,
    pub maturity: Money,

    /// Only set for goal requests.
    pub required_monthly: Option<Money>,
}

/// The batch engine.
///
/// Outcomes are keyed by request ID, so output is always in ascending ID
/// order regardless of input order.
pub struct ProjectionEngine {
    outcomes: BTreeMap<u32, CalculationOutcome>,
}

impl ProjectionEngine {
    /// Creates a new empty engine.
    pub fn new() -> Self {
        ProjectionEngine {
            outcomes: BTreeMap::new(),
        }
    }

    /// Processes requests from a CSV reader in streaming fashion.
    ///
    /// Invalid records are logged at warn level and skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<RequestRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    if let Some(request) = record.parse() {
                        self.process_request(request, row_num);
                    } else {
                        warn!("Row {}: Failed to parse calculation request", row_num);
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(())
    }

    /// Computes a single parsed request and records its outcome.
    fn process_request(&mut self, request: ParsedRequest, row: usize) {
        if self.outcomes.contains_key(&request.id) {
            warn!(
                "Row {}: Duplicate request ID {}, ignoring",
                row, request.id
            );
            return;
        }

        match Self::compute(&request.kind) {
            Ok(outcome) => {
                debug!(
                    "Row {}: {} request {} matures at {}",
                    row, request.kind, request.id, outcome.maturity
                );
                self.outcomes.insert(request.id, outcome);
            }
            Err(e) => {
                warn!(
                    "Row {}: {} request {} rejected: {}",
                    row, request.kind, request.id, e
                );
            }
        }
    }

    fn compute(kind: &RequestKind) -> Result<CalculationOutcome> {
        let calculator = kind.name();
        match kind {
            RequestKind::Sip(input) => {
                let result = compute_sip(input)?;
                Ok(CalculationOutcome {
                    calculator,
                    invested: result.invested_amount,
                    returns: result.estimated_returns,
                    maturity: result.maturity_value,
                    required_monthly: None,
                })
            }
            RequestKind::LumpSum {
                principal,
                annual_rate_percent,
                years,
            } => {
                let result = compute_lump_sum(*principal, *annual_rate_percent, *years)?;
                Ok(CalculationOutcome {
                    calculator,
                    invested: result.invested_amount,
                    returns: result.estimated_returns,
                    maturity: result.maturity_value,
                    required_monthly: None,
                })
            }
            RequestKind::Goal(goal) => {
                let result = compute_required_contribution(goal)?;
                Ok(CalculationOutcome {
                    calculator,
                    invested: result.invested_amount,
                    returns: result.estimated_returns,
                    maturity: result.target_amount,
                    required_monthly: Some(result.required_monthly_contribution),
                })
            }
        }
    }

    /// Writes outcomes to CSV, sorted by request ID.
    ///
    /// All monetary values are formatted with exactly 2 decimal places.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "calculator",
            "invested",
            "returns",
            "maturity",
            "required_monthly",
        ])?;

        for (id, outcome) in &self.outcomes {
            csv_writer.write_record([
                id.to_string(),
                outcome.calculator.to_string(),
                outcome.invested.to_string(),
                outcome.returns.to_string(),
                outcome.maturity.to_string(),
                outcome
                    .required_monthly
                    .map(|m| m.to_string())
                    .unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Returns the outcome for a request, if it was computed.
    pub fn outcome(&self, id: u32) -> Option<&CalculationOutcome> {
        self.outcomes.get(&id)
    }

    /// Number of successfully computed requests.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` if no request was computed.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Writes a year-by-year growth table as CSV.
///
/// The header is derived from the [`YearlyProjection`] field names.
pub fn write_schedule<W: Write>(rows: &[YearlyProjection], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for row in rows {
        csv_writer.serialize(row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new()
    }
}
