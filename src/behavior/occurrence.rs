// SPDX-License-Identifier: MIT

//! Temporal scope of a condition: which conversation steps are inspected and
//! whether a match must be present or absent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::input_matcher::KEY_OCCURRENCE;
use crate::error::BehaviorError;
use crate::memory::{ConversationHistory, ConversationStep};

/// Which steps of the conversation a condition looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum Occurrence {
    /// The step being processed right now
    #[default]
    CurrentStep,
    /// The step immediately before the current one
    LastStep,
    /// Any step so far, current included
    AnyStep,
    /// No step so far, current included
    Never,
}

impl Occurrence {
    /// Every occurrence, in declaration order
    pub const ALL: [Occurrence; 4] = [
        Occurrence::CurrentStep,
        Occurrence::LastStep,
        Occurrence::AnyStep,
        Occurrence::Never,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Occurrence::CurrentStep => "currentStep",
            Occurrence::LastStep => "lastStep",
            Occurrence::AnyStep => "anyStep",
            Occurrence::Never => "never",
        }
    }

    /// Steps to inspect for this occurrence
    pub fn candidate_steps<'a>(
        &self,
        history: &'a dyn ConversationHistory,
    ) -> Vec<&'a ConversationStep> {
        match self {
            Occurrence::CurrentStep => vec![history.current_step()],
            Occurrence::LastStep => history.previous_steps().peek().into_iter().collect(),
            Occurrence::AnyStep | Occurrence::Never => history.all_steps().into_iter().collect(),
        }
    }

    /// Decide the outcome given a per-step match test.
    ///
    /// `step_matches` is called for candidate steps until the outcome is
    /// known; its first error aborts the evaluation.
    pub fn evaluate<F, E>(
        &self,
        history: &dyn ConversationHistory,
        mut step_matches: F,
    ) -> Result<bool, E>
    where
        F: FnMut(&ConversationStep) -> Result<bool, E>,
    {
        let candidates = self.candidate_steps(history);
        log::debug!("Occurrence {}: {} candidate step(s)", self, candidates.len());

        let mut any_match = false;
        for step in candidates {
            if step_matches(step)? {
                any_match = true;
                break;
            }
        }

        Ok(match self {
            Occurrence::Never => !any_match,
            _ => any_match,
        })
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Occurrence {
    type Err = BehaviorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Occurrence::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| {
                let accepted: Vec<&str> = Occurrence::ALL.iter().map(|o| o.as_str()).collect();
                BehaviorError::config(
                    KEY_OCCURRENCE,
                    format!(
                        "Needs to have one of the following values: [{}], actual value: {}",
                        accepted.join(", "),
                        s
                    ),
                )
            })
    }
}

impl TryFrom<String> for Occurrence {
    type Error = BehaviorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
