// SPDX-License-Identifier: MIT

//! Behavior conditions evaluated per conversation turn
//!
//! The input matcher checks whether expected expressions were understood at
//! a given point of the conversation (current, last, any or no step).

mod extension;
pub mod input_matcher;
pub mod loader;
mod occurrence;
mod report;

pub use extension::{BehaviorExtension, ExecutionState};
pub use input_matcher::{contains_all, InputMatcher, InputMatcherConfig};
pub use loader::{ConditionDefinition, ConditionFile, ConditionLoader};
pub use occurrence::Occurrence;
pub use report::{evaluate_all, ConditionOutcome, EvaluationReport, NamedCondition};
