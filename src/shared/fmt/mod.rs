//! Display formatting for money, percentages and multipliers.
//!
//! Rounding lives here, never in the estimator: estimates are carried at full
//! precision and only rounded when rendered.

pub mod money;
pub mod num;
