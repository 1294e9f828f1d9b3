//! Edge case and property tests for the calculators, driven through the
//! public library API.

use projection_engine::{
    compute_emergency_fund, compute_insurance_cover, compute_lump_sum,
    compute_required_contribution, compute_retirement_corpus, compute_sip, yearly_schedule,
    EmergencyFundInput, EngineError, GoalInput, InsuranceInput, Money, ProjectionEngine,
    ProjectionInput, RetirementInput,
};
use rust_decimal::Decimal;
use std::io::Cursor;
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn run_csv(csv: &str) -> String {
    let mut engine = ProjectionEngine::new();
    engine.process_csv(Cursor::new(csv)).unwrap();

    let mut output = Vec::new();
    engine.write_output(&mut output).unwrap();
    String::from_utf8(output).unwrap()
}

fn get_result_line(output: &str, id: u32) -> Option<String> {
    output
        .lines()
        .skip(1) // Skip header
        .find(|line| line.starts_with(&format!("{},", id)))
        .map(|s| s.to_string())
}

/// A spread of realistic calculator inputs.
fn sample_inputs() -> Vec<ProjectionInput> {
    let mut inputs = Vec::new();
    for monthly in ["500", "5000", "123456.78"] {
        for rate in ["0", "4.5", "12", "18"] {
            for years in [1, 7, 30] {
                inputs.push(ProjectionInput::sip(d(monthly), d(rate), years));
                inputs.push(ProjectionInput::sip(d(monthly), d(rate), years).with_step_up(d("7.5")));
                inputs.push(
                    ProjectionInput::sip(d(monthly), d(rate), years).with_lump_sum(d("250000")),
                );
            }
        }
    }
    inputs
}

// ==================== PROJECTION PROPERTIES ====================

#[test]
fn test_maturity_never_below_invested() {
    for input in sample_inputs() {
        let result = compute_sip(&input).unwrap();
        assert!(
            result.maturity_value >= result.invested_amount,
            "{:?} gave {:?}",
            input,
            result
        );
        assert!(result.estimated_returns >= Money::ZERO);
    }
}

#[test]
fn test_maturity_is_invested_plus_returns() {
    for input in sample_inputs() {
        let result = compute_sip(&input).unwrap();
        assert_eq!(
            result.invested_amount + result.estimated_returns,
            result.maturity_value,
            "{:?}",
            input
        );
    }
}

#[test]
fn test_zero_rate_reduces_to_simple_sum() {
    for years in [1u32, 5, 40] {
        let input = ProjectionInput::sip(d("3333.33"), Decimal::ZERO, years).with_lump_sum(d("1000"));
        let result = compute_sip(&input).unwrap();
        let expected = d("3333.33") * Decimal::from(years * 12) + d("1000");

        assert_eq!(result.maturity_value, Money::new(expected));
        assert_eq!(result.estimated_returns, Money::ZERO);
    }
}

#[test]
fn test_higher_rate_gives_higher_maturity() {
    let low = compute_sip(&ProjectionInput::sip(d("5000"), d("8"), 15)).unwrap();
    let high = compute_sip(&ProjectionInput::sip(d("5000"), d("12"), 15)).unwrap();

    assert_eq!(low.invested_amount, high.invested_amount);
    assert!(high.maturity_value > low.maturity_value);
}

#[test]
fn test_step_up_increases_invested_and_maturity() {
    let flat = compute_sip(&ProjectionInput::sip(d("5000"), d("12"), 10)).unwrap();
    let stepped =
        compute_sip(&ProjectionInput::sip(d("5000"), d("12"), 10).with_step_up(d("10"))).unwrap();

    assert!(stepped.invested_amount > flat.invested_amount);
    assert!(stepped.maturity_value > flat.maturity_value);
}

#[test]
fn test_step_up_in_first_year_has_no_effect() {
    let flat = compute_sip(&ProjectionInput::sip(d("5000"), d("12"), 1)).unwrap();
    let stepped =
        compute_sip(&ProjectionInput::sip(d("5000"), d("12"), 1).with_step_up(d("25"))).unwrap();

    assert_eq!(flat, stepped);
}

#[test]
fn test_lump_sum_boundary_one_year() {
    let input = ProjectionInput::sip(Decimal::ZERO, d("10"), 1).with_lump_sum(d("100000"));
    let result = compute_sip(&input).unwrap();

    assert_eq!(result.invested_amount.to_string(), "100000.00");
    assert_eq!(result.maturity_value.to_string(), "110471.31");
    assert_eq!(compute_lump_sum(d("100000"), d("10"), 1).unwrap(), result);
}

#[test]
fn test_standard_sip_scenario() {
    let result = compute_sip(&ProjectionInput::sip(d("5000"), d("12"), 10)).unwrap();

    assert_eq!(result.invested_amount.to_string(), "600000.00");
    assert_eq!(result.maturity_value.to_string(), "1161695.38");
    assert_eq!(result.estimated_returns.to_string(), "561695.38");
}

#[test]
fn test_computation_is_deterministic() {
    let input = ProjectionInput::sip(d("2500"), d("9.75"), 25)
        .with_step_up(d("4"))
        .with_lump_sum(d("75000"));

    assert_eq!(compute_sip(&input).unwrap(), compute_sip(&input).unwrap());
}

#[test]
fn test_tiny_contribution() {
    let result = compute_sip(&ProjectionInput::sip(d("0.01"), d("12"), 1)).unwrap();
    assert_eq!(result.invested_amount.to_string(), "0.12");
    assert_eq!(result.maturity_value.to_string(), "0.13");
}

#[test]
fn test_long_tenure_high_rate_stays_representable() {
    let result = compute_sip(&ProjectionInput::sip(d("100000"), d("30"), 60)).unwrap();
    assert!(result.maturity_value > result.invested_amount);
}

#[test]
fn test_invalid_inputs() {
    let zero_years = ProjectionInput::sip(d("5000"), d("12"), 0);
    assert!(matches!(
        compute_sip(&zero_years).unwrap_err(),
        EngineError::InvalidInput { field: "years", .. }
    ));

    let negative = ProjectionInput::sip(d("-5000"), d("12"), 10);
    assert!(compute_sip(&negative).unwrap_err().is_invalid_input());

    let err = compute_sip(&negative).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid input for monthly_contribution: must not be negative"
    );
}

// ==================== SCHEDULE ====================

#[test]
fn test_schedule_matches_projection_for_every_sample() {
    for input in sample_inputs() {
        let schedule = yearly_schedule(&input).unwrap();
        let result = compute_sip(&input).unwrap();
        let last = schedule.last().unwrap();

        assert_eq!(schedule.len() as u32, input.years);
        assert_eq!(last.value_at_year_end, result.maturity_value);
        assert_eq!(last.invested_to_date, result.invested_amount);
    }
}

#[test]
fn test_schedule_rejects_invalid_input() {
    let err = yearly_schedule(&ProjectionInput::sip(d("100"), d("12"), 0)).unwrap_err();
    assert!(err.is_invalid_input());
}

// ==================== GOAL ====================

#[test]
fn test_goal_round_trip() {
    for input in sample_inputs()
        .into_iter()
        .filter(|i| i.lump_sum.is_zero() && i.step_up_percent.is_zero())
    {
        let projected = compute_sip(&input).unwrap();
        let goal = GoalInput::new(
            projected.maturity_value.value(),
            input.annual_rate_percent,
            input.years,
        );
        let solved = compute_required_contribution(&goal).unwrap();

        let diff = (solved.required_monthly_contribution.value() - input.monthly_contribution).abs();
        assert!(diff <= d("0.01"), "{:?} solved to {}", input, solved.required_monthly_contribution);
    }
}

#[test]
fn test_goal_with_savings_matches_sip_with_lump_sum() {
    let projected = compute_sip(
        &ProjectionInput::sip(d("5000"), d("12"), 10).with_lump_sum(d("200000")),
    )
    .unwrap();
    let goal = GoalInput::new(projected.maturity_value.value(), d("12"), 10)
        .with_existing_savings(d("200000"));
    let solved = compute_required_contribution(&goal).unwrap();

    assert_eq!(solved.required_monthly_contribution.to_string(), "5000.00");
    assert_eq!(solved.invested_amount, projected.invested_amount);
}

#[test]
fn test_goal_rejects_zero_target() {
    let err = compute_required_contribution(&GoalInput::new(Decimal::ZERO, d("12"), 10))
        .unwrap_err();
    assert!(err.is_invalid_input());
}

// ==================== PLANNERS ====================

#[test]
fn test_retirement_required_sip_builds_shortfall() {
    let input = RetirementInput {
        current_age: 35,
        retirement_age: 60,
        life_expectancy: 85,
        current_monthly_expenses: d("60000"),
        inflation_percent: d("6"),
        pre_retirement_return_percent: d("11"),
        post_retirement_return_percent: d("7"),
        existing_savings: d("1000000"),
    };
    let plan = compute_retirement_corpus(&input).unwrap();
    assert!(plan.shortfall > Money::ZERO);

    // Investing the suggested SIP alongside existing savings reaches the corpus.
    let check = compute_sip(
        &ProjectionInput::sip(plan.required_monthly_contribution.value(), d("11"), 25)
            .with_lump_sum(d("1000000")),
    )
    .unwrap();
    let diff = (check.maturity_value.value() - plan.corpus_required.value()).abs();
    assert!(diff <= d("100"), "off by {}", diff);
}

#[test]
fn test_insurance_and_emergency_fund() {
    let cover = compute_insurance_cover(&InsuranceInput {
        annual_expenses: d("480000"),
        years_to_support: 15,
        outstanding_liabilities: d("1800000"),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(cover.recommended_cover.to_string(), "9000000.00");

    let fund = compute_emergency_fund(&EmergencyFundInput::new(d("40000"))).unwrap();
    assert_eq!(fund.target_fund.to_string(), "240000.00");
}

// ==================== BATCH EDGE CASES ====================

#[test]
fn test_batch_goal_row() {
    let csv = r#"calculator,id,amount,rate,years,step_up,lump_sum
goal,1,1000000,12,10,,"#;

    let output = run_csv(csv);
    let line = get_result_line(&output, 1).unwrap();
    assert_eq!(line, "1,goal,516486.00,483514.00,1000000.00,4304.05");
}

#[test]
fn test_batch_unknown_calculator_skipped() {
    let csv = r#"calculator,id,amount,rate,years,step_up,lump_sum
annuity,1,1000,5,5,,
sip,2,1000,12,1,,"#;

    let output = run_csv(csv);
    assert!(get_result_line(&output, 1).is_none());
    assert!(get_result_line(&output, 2).is_some());
}

#[test]
fn test_batch_malformed_id_skipped() {
    let csv = r#"calculator,id,amount,rate,years,step_up,lump_sum
sip,abc,1000,12,1,,
sip,2,1000,12,1,,"#;

    let output = run_csv(csv);
    assert_eq!(output.lines().count(), 2);
    assert!(get_result_line(&output, 2).is_some());
}

#[test]
fn test_batch_overflow_row_skipped() {
    let csv = r#"calculator,id,amount,rate,years,step_up,lump_sum
sip,1,1000000000,100000,500,,
sip,2,1000,12,1,,"#;

    let output = run_csv(csv);
    assert!(get_result_line(&output, 1).is_none());
    assert_eq!(
        get_result_line(&output, 2).unwrap(),
        "2,sip,12000.00,809.33,12809.33,"
    );
}

#[test]
fn test_batch_empty_input() {
    let output = run_csv("calculator,id,amount,rate,years,step_up,lump_sum\n");
    assert_eq!(
        output.trim(),
        "id,calculator,invested,returns,maturity,required_monthly"
    );
}
