// SPDX-License-Identifier: MIT

//! Per-turn evaluation of a set of named conditions

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::extension::{BehaviorExtension, ExecutionState};
use crate::memory::ConversationHistory;

/// A behavior extension registered under a name
#[derive(Clone)]
pub struct NamedCondition {
    pub name: String,
    pub extension: Arc<dyn BehaviorExtension>,
}

impl NamedCondition {
    pub fn new(name: impl Into<String>, extension: Arc<dyn BehaviorExtension>) -> Self {
        Self {
            name: name.into(),
            extension,
        }
    }
}

impl fmt::Debug for NamedCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedCondition")
            .field("name", &self.name)
            .field("extension", &self.extension.id())
            .finish()
    }
}

/// Result of one condition for one turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionOutcome {
    pub name: String,
    pub state: ExecutionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcomes of all conditions evaluated for a turn, owned by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub outcomes: Vec<ConditionOutcome>,
}

impl EvaluationReport {
    /// State recorded for the named condition
    pub fn state_of(&self, name: &str) -> Option<ExecutionState> {
        self.outcomes
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.state)
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| o.state == ExecutionState::Success)
    }

    pub fn has_errors(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| o.state == ExecutionState::Error)
    }
}

/// Evaluate every condition against the same history.
///
/// A condition that errors is recorded as `Error` and does not stop the others.
pub fn evaluate_all(
    conditions: &[NamedCondition],
    history: &dyn ConversationHistory,
) -> EvaluationReport {
    let outcomes = conditions
        .iter()
        .map(|condition| match condition.extension.execute(history) {
            Ok(state) => ConditionOutcome {
                name: condition.name.clone(),
                state,
                error: None,
            },
            Err(e) => {
                log::warn!("Condition '{}' failed to evaluate: {}", condition.name, e);
                ConditionOutcome {
                    name: condition.name.clone(),
                    state: ExecutionState::Error,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    EvaluationReport { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BehaviorError, ParseError};
    use crate::memory::ConversationMemory;

    /// Extension returning a fixed result
    struct FixedExtension(Result<ExecutionState, ()>);

    impl BehaviorExtension for FixedExtension {
        fn id(&self) -> &str {
            "fixed"
        }

        fn execute(
            &self,
            _history: &dyn ConversationHistory,
        ) -> Result<ExecutionState, BehaviorError> {
            self.0
                .map_err(|_| BehaviorError::Decode(ParseError::new(0, "broken")))
        }
    }

    fn condition(name: &str, result: Result<ExecutionState, ()>) -> NamedCondition {
        NamedCondition::new(name, Arc::new(FixedExtension(result)))
    }

    #[test]
    fn test_evaluate_all() {
        let conditions = vec![
            condition("ok", Ok(ExecutionState::Success)),
            condition("nope", Ok(ExecutionState::Fail)),
            condition("broken", Err(())),
        ];
        let report = evaluate_all(&conditions, &ConversationMemory::new("c"));

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.state_of("ok"), Some(ExecutionState::Success));
        assert_eq!(report.state_of("nope"), Some(ExecutionState::Fail));
        assert_eq!(report.state_of("broken"), Some(ExecutionState::Error));
        assert_eq!(report.state_of("missing"), None);
        assert!(report.outcomes[2].error.as_ref().unwrap().contains("broken"));
        assert!(!report.all_succeeded());
        assert!(report.has_errors());
    }

    #[test]
    fn test_named_condition_debug() {
        let named = condition("ok", Ok(ExecutionState::Success));
        assert_eq!(
            format!("{:?}", named),
            r#"NamedCondition { name: "ok", extension: "fixed" }"#
        );
    }

    #[test]
    fn test_empty_report() {
        let report = evaluate_all(&[], &ConversationMemory::new("c"));
        assert!(report.all_succeeded());
        assert!(!report.has_errors());
    }

    #[test]
    fn test_report_json() {
        let report = evaluate_all(
            &[condition("ok", Ok(ExecutionState::Success))],
            &ConversationMemory::new("c"),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"outcomes": [{"name": "ok", "state": "SUCCESS"}]})
        );
    }
}
