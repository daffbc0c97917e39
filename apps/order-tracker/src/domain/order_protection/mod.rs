//! Order Protection Bounded Context
//!
//! Guards against accidental mispricing before an order is submitted.

mod proposal;
mod validator;

pub use proposal::OrderProposal;
pub use validator::{
    OrderProtectionValidator, SubmissionDecision, ValidationResult, decide_submission,
};
