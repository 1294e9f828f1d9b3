//! # Projection Engine
//!
//! Financial-calculator formulas for an advisory website: SIP, step-up SIP,
//! lump sum, goal-based SIP, retirement corpus, insurance cover and
//! emergency fund, plus a streaming CSV batch runner on top of them.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: Uses `rust_decimal`; results are rounded to
//!   2 decimal places
//! - **Pure calculators**: no I/O, no shared state, deterministic
//! - **Strict invariants**: `maturity == invested + returns`, returns never
//!   negative
//! - **Deterministic output**: Batch results sorted by request ID
//!
//! ## Example
//!
//! ```
//! use projection_engine::{compute_sip, ProjectionInput};
//! use rust_decimal::Decimal;
//!
//! let input = ProjectionInput::sip(Decimal::from(5000), Decimal::from(12), 10);
//! let result = compute_sip(&input).unwrap();
//! assert_eq!(result.maturity_value.to_string(), "1161695.38");
//! ```

pub mod decimal;
pub mod engine;
pub mod error;
pub mod planning;
pub mod projection;
pub mod request;

pub use decimal::Money;
pub use engine::{CalculationOutcome, ProjectionEngine};
pub use error::{EngineError, Result};
pub use planning::{
    compute_emergency_fund, compute_insurance_cover, compute_retirement_corpus,
    EmergencyFundInput, EmergencyFundResult, InsuranceInput, InsuranceResult, RetirementInput,
    RetirementResult,
};
pub use projection::{
    compute_lump_sum, compute_required_contribution, compute_sip, yearly_schedule, GoalInput,
    GoalResult, ProjectionInput, ProjectionResult, YearlyProjection,
};
pub use request::{ParsedRequest, RequestKind, RequestRecord};
