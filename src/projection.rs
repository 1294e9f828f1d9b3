//! SIP, step-up SIP, lump-sum and goal formulas.
//!
//! Contributions follow the annuity-due convention: each monthly payment is
//! invested at the start of its month. Rates are nominal annual percentages
//! compounded monthly (`r = rate / 1200`).

use crate::decimal::{
    annuity_due_factor, checked_add, checked_div, checked_mul, fraction, growth, monthly_rate,
    Money,
};
use crate::error::{EngineError, Result};
use rust_decimal::Decimal;
use serde::Serialize;

const MONTHS_PER_YEAR: u32 = 12;

/// Inputs for a SIP / lump-sum projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInput {
    /// Amount invested at the start of every month during the first year.
    pub monthly_contribution: Decimal,

    /// Expected annual return in percent, e.g. `12` for 12%.
    pub annual_rate_percent: Decimal,

    /// Investment tenure in whole years.
    pub years: u32,

    /// Yearly increase of the monthly contribution in percent.
    pub step_up_percent: Decimal,

    /// One-time amount invested at the start of the tenure.
    pub lump_sum: Decimal,
}

impl ProjectionInput {
    /// A plain SIP with no step-up and no lump sum.
    pub fn sip(monthly_contribution: Decimal, annual_rate_percent: Decimal, years: u32) -> Self {
        ProjectionInput {
            monthly_contribution,
            annual_rate_percent,
            years,
            step_up_percent: Decimal::ZERO,
            lump_sum: Decimal::ZERO,
        }
    }

    /// Raises the monthly contribution by `step_up_percent` every year.
    pub fn with_step_up(mut self, step_up_percent: Decimal) -> Self {
        self.step_up_percent = step_up_percent;
        self
    }

    /// Adds a one-time investment made at the start of the tenure.
    pub fn with_lump_sum(mut self, lump_sum: Decimal) -> Self {
        self.lump_sum = lump_sum;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.monthly_contribution < Decimal::ZERO {
            return Err(EngineError::invalid("monthly_contribution", "must not be negative"));
        }
        validate_rate_and_years(self.annual_rate_percent, self.years)?;
        if self.step_up_percent < Decimal::ZERO {
            return Err(EngineError::invalid("step_up_percent", "must not be negative"));
        }
        if self.lump_sum < Decimal::ZERO {
            return Err(EngineError::invalid("lump_sum", "must not be negative"));
        }
        if self.monthly_contribution.is_zero() && self.lump_sum.is_zero() {
            return Err(EngineError::invalid(
                "monthly_contribution",
                "either a monthly contribution or a lump sum is required",
            ));
        }
        Ok(())
    }

    /// Raw `(invested, value)` at the end of the tenure.
    ///
    /// A plain SIP uses the closed form; a stepped-up one is rolled forward
    /// year by year.
    fn project(&self) -> Result<(Decimal, Decimal)> {
        if !self.step_up_percent.is_zero() {
            let end = self.roll_forward(|_| {})?;
            return Ok((end.invested, end.value));
        }

        let r = monthly_rate(self.annual_rate_percent);
        let months = months_in(self.years)?;
        let lump_value = checked_mul(
            self.lump_sum,
            growth(r, months, "lump sum value")?,
            "lump sum value",
        )?;
        let series = checked_mul(
            self.monthly_contribution,
            annuity_due_factor(r, months)?,
            "SIP value",
        )?;
        let invested = checked_add(
            checked_mul(self.monthly_contribution, Decimal::from(months), "invested amount")?,
            self.lump_sum,
            "invested amount",
        )?;
        Ok((invested, checked_add(series, lump_value, "maturity value")?))
    }

    /// Carries the raw figures forward one year at a time, handing every
    /// year-end to `visit`. Each year the running value grows by `(1+r)^12`
    /// and gains that year's 12-month annuity-due block.
    fn roll_forward(&self, mut visit: impl FnMut(&YearEnd)) -> Result<YearEnd> {
        months_in(self.years)?;
        let r = monthly_rate(self.annual_rate_percent);
        let year_growth = growth(r, MONTHS_PER_YEAR, "yearly growth")?;
        let block_factor = annuity_due_factor(r, MONTHS_PER_YEAR)?;
        let step = Decimal::ONE + fraction(self.step_up_percent);

        let mut end = YearEnd {
            year: 0,
            contribution: self.monthly_contribution,
            invested: self.lump_sum,
            value: self.lump_sum,
        };
        for year in 1..=self.years {
            if year > 1 {
                end.contribution = checked_mul(end.contribution, step, "step-up contribution")?;
            }
            end.value = checked_add(
                checked_mul(end.value, year_growth, "maturity value")?,
                checked_mul(end.contribution, block_factor, "SIP value")?,
                "maturity value",
            )?;
            end.invested = checked_add(
                end.invested,
                checked_mul(end.contribution, Decimal::from(MONTHS_PER_YEAR), "invested amount")?,
                "invested amount",
            )?;
            end.year = year;
            visit(&end);
        }
        Ok(end)
    }
}

/// Unrounded running figures at the end of one year.
#[derive(Debug, Clone, Copy)]
struct YearEnd {
    year: u32,
    contribution: Decimal,
    invested: Decimal,
    value: Decimal,
}

/// Outcome of a projection, rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectionResult {
    /// Sum of all contributions actually made, including any lump sum.
    pub invested_amount: Money,

    /// Growth over the invested amount; never negative.
    pub estimated_returns: Money,

    /// Projected value at the end of the tenure.
    pub maturity_value: Money,
}

impl ProjectionResult {
    fn from_raw(invested: Decimal, value: Decimal) -> Self {
        let invested_amount = Money::new(invested);
        let maturity_value = Money::new(value);
        ProjectionResult {
            invested_amount,
            estimated_returns: maturity_value.saturating_sub(invested_amount),
            maturity_value,
        }
    }
}

/// One row of a year-by-year growth table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearlyProjection {
    /// One-based year of the tenure.
    pub year: u32,

    /// Monthly contribution paid during this year.
    pub monthly_contribution: Money,

    /// Total contributed by the end of this year.
    pub invested_to_date: Money,

    /// Projected value at the end of this year.
    pub value_at_year_end: Money,
}

/// Inputs for solving the monthly contribution that reaches a target.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalInput {
    /// Corpus to reach at the end of the tenure.
    pub target_amount: Decimal,

    /// Expected annual return in percent.
    pub annual_rate_percent: Decimal,

    /// Tenure in whole years.
    pub years: u32,

    /// Savings already invested today, grown alongside the SIP.
    pub existing_savings: Decimal,
}

impl GoalInput {
    /// A goal with no existing savings.
    pub fn new(target_amount: Decimal, annual_rate_percent: Decimal, years: u32) -> Self {
        GoalInput {
            target_amount,
            annual_rate_percent,
            years,
            existing_savings: Decimal::ZERO,
        }
    }

    /// Counts savings already invested today towards the goal.
    pub fn with_existing_savings(mut self, existing_savings: Decimal) -> Self {
        self.existing_savings = existing_savings;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.target_amount <= Decimal::ZERO {
            return Err(EngineError::invalid("target_amount", "must be greater than zero"));
        }
        validate_rate_and_years(self.annual_rate_percent, self.years)?;
        if self.existing_savings < Decimal::ZERO {
            return Err(EngineError::invalid("existing_savings", "must not be negative"));
        }
        Ok(())
    }
}

/// Monthly contribution required to reach a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalResult {
    /// Monthly SIP needed; zero when existing savings already cover the goal.
    pub required_monthly_contribution: Money,

    /// Required contribution over the whole tenure plus existing savings.
    pub invested_amount: Money,

    /// Growth needed on top of the invested amount; never negative.
    pub estimated_returns: Money,

    /// The goal being solved for.
    pub target_amount: Money,
}

pub(crate) fn months_in(years: u32) -> Result<u32> {
    years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or(EngineError::Overflow { operation: "tenure in months" })
}

fn validate_rate_and_years(annual_rate_percent: Decimal, years: u32) -> Result<()> {
    if annual_rate_percent < Decimal::ZERO {
        return Err(EngineError::invalid("annual_rate_percent", "must not be negative"));
    }
    if years == 0 {
        return Err(EngineError::invalid("years", "must be at least one year"));
    }
    Ok(())
}

/// Projects a SIP with optional yearly step-up and lump sum.
///
/// Without step-up the maturity value is
/// `P × ((1+r)^n − 1) / r × (1+r)`, or `P × n` at a zero rate. With step-up
/// every 12-month block uses that formula with its own contribution and is
/// compounded forward to the end of the tenure. A lump sum adds
/// `L × (1+r)^n`.
pub fn compute_sip(input: &ProjectionInput) -> Result<ProjectionResult> {
    input.validate()?;
    let (invested, value) = input.project()?;
    Ok(ProjectionResult::from_raw(invested, value))
}

/// Projects a one-time investment held for `years`.
pub fn compute_lump_sum(
    principal: Decimal,
    annual_rate_percent: Decimal,
    years: u32,
) -> Result<ProjectionResult> {
    if principal <= Decimal::ZERO {
        return Err(EngineError::invalid("lump_sum", "must be greater than zero"));
    }
    let input =
        ProjectionInput::sip(Decimal::ZERO, annual_rate_percent, years).with_lump_sum(principal);
    compute_sip(&input)
}

/// Year-by-year breakdown of [`compute_sip`].
///
/// Built in a single pass over the tenure. The last row's value always
/// equals the projection's maturity value.
pub fn yearly_schedule(input: &ProjectionInput) -> Result<Vec<YearlyProjection>> {
    input.validate()?;
    let mut rows = Vec::new();
    input.roll_forward(|end| {
        rows.push(YearlyProjection {
            year: end.year,
            monthly_contribution: Money::new(end.contribution),
            invested_to_date: Money::new(end.invested),
            value_at_year_end: Money::new(end.value),
        })
    })?;
    Ok(rows)
}

/// Solves the no-step-up SIP formula for the monthly contribution.
pub fn compute_required_contribution(input: &GoalInput) -> Result<GoalResult> {
    input.validate()?;

    let r = monthly_rate(input.annual_rate_percent);
    let months = months_in(input.years)?;

    let savings_value = checked_mul(
        input.existing_savings,
        growth(r, months, "existing savings value")?,
        "existing savings value",
    )?;
    let gap = (input.target_amount - savings_value).max(Decimal::ZERO);
    let required = checked_div(gap, annuity_due_factor(r, months)?, "required contribution")?;

    let required_monthly_contribution = Money::new(required);
    let invested_amount = Money::new(checked_add(
        checked_mul(
            required_monthly_contribution.value(),
            Decimal::from(months),
            "invested amount",
        )?,
        input.existing_savings,
        "invested amount",
    )?);
    let target_amount = Money::new(input.target_amount);

    Ok(GoalResult {
        required_monthly_contribution,
        invested_amount,
        estimated_returns: target_amount.saturating_sub(invested_amount),
        target_amount,
    })
}
