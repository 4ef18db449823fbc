// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BehaviorError;
use crate::memory::ConversationHistory;

/// Outcome of evaluating a behavior extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    Success,
    Fail,
    #[default]
    NotExecuted,
    /// Evaluation aborted, e.g. on undecodable step data
    Error,
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionState::Success => write!(f, "SUCCESS"),
            ExecutionState::Fail => write!(f, "FAIL"),
            ExecutionState::NotExecuted => write!(f, "NOT_EXECUTED"),
            ExecutionState::Error => write!(f, "ERROR"),
        }
    }
}

impl From<bool> for ExecutionState {
    fn from(success: bool) -> Self {
        if success {
            ExecutionState::Success
        } else {
            ExecutionState::Fail
        }
    }
}

/// A condition evaluated once per conversation turn.
///
/// Implementations hold only their configuration; every call returns a fresh
/// state so one instance can serve many conversations at once.
pub trait BehaviorExtension: Send + Sync {
    /// Extension type identifier
    fn id(&self) -> &str;

    /// Evaluate against a conversation's history
    fn execute(&self, history: &dyn ConversationHistory) -> Result<ExecutionState, BehaviorError>;
}
