//! Condition loader - YAML file loading and parsing
//!
//! This module loads named input matcher definitions:
//!
//! ```yaml
//! conditions:
//!   - name: greeted
//!     expressions: "greeting(hello)"
//!     occurrence: anyStep
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::input_matcher::{InputMatcher, InputMatcherConfig};
use super::occurrence::Occurrence;
use super::report::NamedCondition;
use crate::error::{BehaviorError, MatcherError};
use crate::expressions::{ExpressionProvider, TextExpressionProvider};

/// Top-level condition file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConditionFile {
    #[serde(default)]
    pub conditions: Vec<ConditionDefinition>,
}

/// A single named input matcher. Values are kept raw so that validation
/// errors can name the condition they belong to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConditionDefinition {
    pub name: String,
    pub expressions: String,
    pub occurrence: Option<String>,
}

impl ConditionDefinition {
    pub fn to_config(&self) -> Result<InputMatcherConfig, BehaviorError> {
        let occurrence = self
            .occurrence
            .as_deref()
            .map(str::parse::<Occurrence>)
            .transpose()?;
        Ok(InputMatcherConfig {
            expressions: self.expressions.clone(),
            occurrence,
        })
    }
}

/// Loads condition definitions and builds matchers from them
pub struct ConditionLoader {
    provider: Arc<dyn ExpressionProvider>,
}

impl ConditionLoader {
    pub fn new(provider: Arc<dyn ExpressionProvider>) -> Self {
        Self { provider }
    }

    /// Load and build all conditions from a YAML file
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<NamedCondition>, MatcherError> {
        let content = fs::read_to_string(path)?;
        let file = Self::parse_yaml(&content)?;
        self.build(&file)
    }

    /// Parse a condition file from a YAML string
    pub fn parse_yaml(content: &str) -> Result<ConditionFile, MatcherError> {
        let file: ConditionFile = serde_yaml::from_str(content)?;
        Ok(file)
    }

    /// Build one input matcher per definition
    pub fn build(&self, file: &ConditionFile) -> Result<Vec<NamedCondition>, MatcherError> {
        file.conditions
            .iter()
            .map(|def| -> Result<NamedCondition, MatcherError> {
                let matcher = def
                    .to_config()
                    .and_then(|config| InputMatcher::new(self.provider.clone(), config))
                    .map_err(|source| MatcherError::Condition {
                        name: def.name.clone(),
                        source,
                    })?;
                log::debug!("Loaded condition '{}': {:?}", def.name, matcher);
                Ok(NamedCondition::new(def.name.clone(), Arc::new(matcher)))
            })
            .collect()
    }
}

impl Default for ConditionLoader {
    fn default() -> Self {
        Self::new(Arc::new(TextExpressionProvider::new()))
    }
}
