// SPDX-License-Identifier: MIT

//! Input matcher condition
//!
//! Succeeds when a configured set of expressions was understood at the
//! configured point of the conversation:
//! - `currentStep` - in this turn
//! - `lastStep` - in the previous turn
//! - `anyStep` - in any turn so far
//! - `never` - in no turn so far

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::extension::{BehaviorExtension, ExecutionState};
use super::occurrence::Occurrence;
use crate::error::BehaviorError;
use crate::expressions::{Expression, ExpressionProvider};
use crate::memory::{ConversationHistory, ConversationStep, KEY_EXPRESSIONS};

/// Extension type identifier
pub const ID: &str = "inputmatcher";

/// Config key holding the target expression list
pub const KEY_EXPRESSIONS_PARAM: &str = "expressions";
/// Config key holding the occurrence
pub const KEY_OCCURRENCE: &str = "occurrence";

/// Input matcher configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InputMatcherConfig {
    /// Serialized target expressions, e.g. `greeting(hello),name(anna)`
    pub expressions: String,
    /// Defaults to `currentStep`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<Occurrence>,
}

impl InputMatcherConfig {
    pub fn new(expressions: impl Into<String>) -> Self {
        Self {
            expressions: expressions.into(),
            occurrence: None,
        }
    }

    pub fn with_occurrence(mut self, occurrence: Occurrence) -> Self {
        self.occurrence = Some(occurrence);
        self
    }

    /// Read the config from string key/value pairs. Unknown keys are ignored.
    pub fn from_values(values: &HashMap<String, String>) -> Result<Self, BehaviorError> {
        let expressions = values.get(KEY_EXPRESSIONS_PARAM).ok_or_else(|| {
            BehaviorError::config(KEY_EXPRESSIONS_PARAM, "Needs to be set")
        })?;
        let occurrence = values
            .get(KEY_OCCURRENCE)
            .map(|value| value.parse::<Occurrence>())
            .transpose()?;

        Ok(Self {
            expressions: expressions.clone(),
            occurrence,
        })
    }
}

/// Condition matching expected expressions against conversation history
pub struct InputMatcher {
    expressions: Vec<Expression>,
    occurrence: Occurrence,
    provider: Arc<dyn ExpressionProvider>,
}

impl InputMatcher {
    /// Build a matcher, decoding the target expressions once
    pub fn new(
        provider: Arc<dyn ExpressionProvider>,
        config: InputMatcherConfig,
    ) -> Result<Self, BehaviorError> {
        if config.expressions.trim().is_empty() {
            return Err(BehaviorError::config(
                KEY_EXPRESSIONS_PARAM,
                format!(
                    "Needs to be a non-empty expression list, actual value: {}",
                    config.expressions
                ),
            ));
        }

        let expressions = provider
            .parse_expressions(&config.expressions)
            .map_err(|e| {
                BehaviorError::config(
                    KEY_EXPRESSIONS_PARAM,
                    format!("Could not be decoded ({}), actual value: {}", e, config.expressions),
                )
            })?;
        if expressions.is_empty() {
            return Err(BehaviorError::config(
                KEY_EXPRESSIONS_PARAM,
                format!(
                    "Needs to be a non-empty expression list, actual value: {}",
                    config.expressions
                ),
            ));
        }

        Ok(Self {
            expressions,
            occurrence: config.occurrence.unwrap_or_default(),
            provider,
        })
    }

    /// Build a matcher from string key/value pairs
    pub fn from_values(
        provider: Arc<dyn ExpressionProvider>,
        values: &HashMap<String, String>,
    ) -> Result<Self, BehaviorError> {
        Self::new(provider, InputMatcherConfig::from_values(values)?)
    }

    /// Decoded target expressions
    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn occurrence(&self) -> Occurrence {
        self.occurrence
    }

    /// Expressions understood at `step`; empty when nothing was stored
    fn step_expressions(&self, step: &ConversationStep) -> Result<Vec<Expression>, BehaviorError> {
        match step.latest_data(KEY_EXPRESSIONS) {
            Some(data) => Ok(self.provider.parse_expressions(&data.result)?),
            None => Ok(Vec::new()),
        }
    }

    fn step_matches(&self, step: &ConversationStep) -> Result<bool, BehaviorError> {
        let actual = self.step_expressions(step)?;
        let matched = contains_all(&self.expressions, &actual);
        log::debug!(
            "Input matcher: {} expression(s) at step, contains all targets: {}",
            actual.len(),
            matched
        );
        Ok(matched)
    }
}

impl BehaviorExtension for InputMatcher {
    fn id(&self) -> &str {
        ID
    }

    fn execute(&self, history: &dyn ConversationHistory) -> Result<ExecutionState, BehaviorError> {
        let matched = self
            .occurrence
            .evaluate(history, |step| self.step_matches(step))
            .map_err(|e| {
                log::error!("Input matcher aborted: {}", e);
                e
            })?;
        Ok(ExecutionState::from(matched))
    }
}

impl std::fmt::Debug for InputMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputMatcher")
            .field("expressions", &self.expressions)
            .field("occurrence", &self.occurrence)
            .finish()
    }
}

/// True if every target has an equal expression somewhere in `actual`.
/// Order, duplicates and extra expressions in `actual` do not matter.
pub fn contains_all(targets: &[Expression], actual: &[Expression]) -> bool {
    let actual: HashSet<&Expression> = actual.iter().collect();
    targets.iter().all(|target| actual.contains(target))
}
