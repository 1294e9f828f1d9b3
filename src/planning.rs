//! Retirement, insurance and emergency-fund planners.

use crate::decimal::{checked_add, checked_div, checked_mul, fraction, growth, monthly_rate, Money};
use crate::error::{EngineError, Result};
use crate::projection::{compute_required_contribution, months_in, GoalInput};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Months of expenses an emergency fund should cover unless told otherwise.
pub const DEFAULT_EMERGENCY_MONTHS: u32 = 6;

fn require_non_negative(value: Decimal, field: &'static str) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::invalid(field, "must not be negative"));
    }
    Ok(())
}

fn require_positive(value: Decimal, field: &'static str) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(EngineError::invalid(field, "must be greater than zero"));
    }
    Ok(())
}

/// Retirement planning inputs. Ages are in whole years.
#[derive(Debug, Clone, PartialEq)]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,

    /// Monthly household expenses in today's money.
    pub current_monthly_expenses: Decimal,

    pub inflation_percent: Decimal,
    pub pre_retirement_return_percent: Decimal,
    pub post_retirement_return_percent: Decimal,

    /// Savings already earmarked for retirement.
    pub existing_savings: Decimal,
}

impl RetirementInput {
    fn validate(&self) -> Result<()> {
        if self.retirement_age <= self.current_age {
            return Err(EngineError::invalid(
                "retirement_age",
                "must be later than the current age",
            ));
        }
        if self.life_expectancy <= self.retirement_age {
            return Err(EngineError::invalid(
                "life_expectancy",
                "must be later than the retirement age",
            ));
        }
        require_positive(self.current_monthly_expenses, "current_monthly_expenses")?;
        require_non_negative(self.inflation_percent, "inflation_percent")?;
        require_non_negative(
            self.pre_retirement_return_percent,
            "pre_retirement_return_percent",
        )?;
        require_non_negative(
            self.post_retirement_return_percent,
            "post_retirement_return_percent",
        )?;
        require_non_negative(self.existing_savings, "existing_savings")
    }
}

/// Retirement corpus and the SIP needed to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetirementResult {
    /// First month's expenses after retiring, inflated from today.
    pub monthly_expenses_at_retirement: Money,

    /// Pot needed on the retirement date to fund expenses to life expectancy.
    pub corpus_required: Money,

    /// Existing savings grown to the retirement date.
    pub projected_savings: Money,

    /// Corpus not covered by projected savings, floored at zero.
    pub shortfall: Money,

    /// Monthly SIP that closes the shortfall by the retirement date.
    pub required_monthly_contribution: Money,
}

/// Sizes the retirement corpus and the SIP needed to build it.
///
/// Expenses inflate yearly until retirement. After retiring they are drawn
/// at the start of each month, rising with monthly inflation while the
/// corpus earns the post-retirement return.
pub fn compute_retirement_corpus(input: &RetirementInput) -> Result<RetirementResult> {
    input.validate()?;

    let years_to_retirement = input.retirement_age - input.current_age;
    let retirement_months = months_in(input.life_expectancy - input.retirement_age)?;

    let expenses = checked_mul(
        input.current_monthly_expenses,
        growth(
            fraction(input.inflation_percent),
            years_to_retirement,
            "inflated expenses",
        )?,
        "inflated expenses",
    )?;

    let g = monthly_rate(input.inflation_percent);
    let r = monthly_rate(input.post_retirement_return_percent);
    let corpus = if g == r {
        checked_mul(expenses, Decimal::from(retirement_months), "retirement corpus")?
    } else {
        // Growing annuity-due: E × (1 − q^m) / (1 − q), q = (1+g)/(1+r).
        let q = checked_div(Decimal::ONE + g, Decimal::ONE + r, "retirement corpus")?;
        let q_m = growth(q - Decimal::ONE, retirement_months, "retirement corpus")?;
        let ratio = checked_div(Decimal::ONE - q_m, Decimal::ONE - q, "retirement corpus")?;
        checked_mul(expenses, ratio, "retirement corpus")?
    };

    let projected = checked_mul(
        input.existing_savings,
        growth(
            monthly_rate(input.pre_retirement_return_percent),
            months_in(years_to_retirement)?,
            "projected savings",
        )?,
        "projected savings",
    )?;

    let shortfall = (corpus - projected).max(Decimal::ZERO);
    let required_monthly_contribution = if shortfall.is_zero() {
        Money::ZERO
    } else {
        let goal = GoalInput::new(
            shortfall,
            input.pre_retirement_return_percent,
            years_to_retirement,
        );
        compute_required_contribution(&goal)?.required_monthly_contribution
    };

    Ok(RetirementResult {
        monthly_expenses_at_retirement: Money::new(expenses),
        corpus_required: Money::new(corpus),
        projected_savings: Money::new(projected),
        shortfall: Money::new(shortfall),
        required_monthly_contribution,
    })
}

/// Needs-based life cover inputs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InsuranceInput {
    /// Yearly expenses the family must be able to meet.
    pub annual_expenses: Decimal,
    pub years_to_support: u32,
    pub outstanding_liabilities: Decimal,

    /// Earmarked future costs such as education or a wedding.
    pub future_goals: Decimal,
    pub existing_cover: Decimal,
    pub liquid_assets: Decimal,
}

/// Recommended life cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsuranceResult {
    /// Expenses over the support period plus liabilities and goals.
    pub gross_need: Money,

    /// Existing cover plus liquid assets.
    pub existing_provisions: Money,

    /// Gross need less existing provisions, floored at zero.
    pub recommended_cover: Money,
}

/// Sizes life cover with the needs-based method.
pub fn compute_insurance_cover(input: &InsuranceInput) -> Result<InsuranceResult> {
    require_positive(input.annual_expenses, "annual_expenses")?;
    if input.years_to_support == 0 {
        return Err(EngineError::invalid(
            "years_to_support",
            "must be at least one year",
        ));
    }
    require_non_negative(input.outstanding_liabilities, "outstanding_liabilities")?;
    require_non_negative(input.future_goals, "future_goals")?;
    require_non_negative(input.existing_cover, "existing_cover")?;
    require_non_negative(input.liquid_assets, "liquid_assets")?;

    let income_need = checked_mul(
        input.annual_expenses,
        Decimal::from(input.years_to_support),
        "insurance need",
    )?;
    let gross_need = checked_add(
        checked_add(income_need, input.outstanding_liabilities, "insurance need")?,
        input.future_goals,
        "insurance need",
    )?;
    let provisions = checked_add(input.existing_cover, input.liquid_assets, "provisions")?;

    let gross_need = Money::new(gross_need);
    let existing_provisions = Money::new(provisions);
    Ok(InsuranceResult {
        gross_need,
        existing_provisions,
        recommended_cover: gross_need.saturating_sub(existing_provisions),
    })
}

/// Emergency fund inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct EmergencyFundInput {
    pub monthly_expenses: Decimal,
    pub months_of_cover: u32,
    pub current_savings: Decimal,

    /// Amount set aside each month towards the fund; zero if unknown.
    pub monthly_saving: Decimal,
}

impl EmergencyFundInput {
    /// A fund covering [`DEFAULT_EMERGENCY_MONTHS`] months, starting from nothing.
    pub fn new(monthly_expenses: Decimal) -> Self {
        EmergencyFundInput {
            monthly_expenses,
            months_of_cover: DEFAULT_EMERGENCY_MONTHS,
            current_savings: Decimal::ZERO,
            monthly_saving: Decimal::ZERO,
        }
    }
}

/// Emergency fund target and progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmergencyFundResult {
    /// Monthly expenses times months of cover.
    pub target_fund: Money,

    /// Target less current savings, floored at zero.
    pub shortfall: Money,

    /// Whole months of saving needed; `None` when no monthly saving is given
    /// and there is a shortfall.
    pub months_to_target: Option<u32>,
}

/// Sizes an emergency fund and the months needed to build it.
pub fn compute_emergency_fund(input: &EmergencyFundInput) -> Result<EmergencyFundResult> {
    require_positive(input.monthly_expenses, "monthly_expenses")?;
    if input.months_of_cover == 0 {
        return Err(EngineError::invalid(
            "months_of_cover",
            "must be at least one month",
        ));
    }
    require_non_negative(input.current_savings, "current_savings")?;
    require_non_negative(input.monthly_saving, "monthly_saving")?;

    let target = checked_mul(
        input.monthly_expenses,
        Decimal::from(input.months_of_cover),
        "emergency fund",
    )?;
    let shortfall = (target - input.current_savings).max(Decimal::ZERO);

    let months_to_target = if shortfall.is_zero() {
        Some(0)
    } else if input.monthly_saving.is_zero() {
        None
    } else {
        let months = checked_div(shortfall, input.monthly_saving, "months to target")?.ceil();
        Some(months.to_u32().ok_or(EngineError::Overflow {
            operation: "months to target",
        })?)
    };

    Ok(EmergencyFundResult {
        target_fund: Money::new(target),
        shortfall: Money::new(shortfall),
        months_to_target,
    })
}
