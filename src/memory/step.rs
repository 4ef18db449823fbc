// SPDX-License-Identifier: MIT

//! Conversation steps and the data written into them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key under which understood user input is stored as an expression string
pub const KEY_EXPRESSIONS: &str = "expressions";

/// A single piece of data written during a conversation step
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Data {
    /// Data slot, e.g. `expressions`
    pub key: String,
    /// Serialized payload
    pub result: String,
    #[serde(default = "now")]
    pub timestamp: DateTime<Utc>,
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

impl Data {
    pub fn new(key: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            result: result.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One turn of a conversation. Writes append; the latest write per key wins.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConversationStep {
    #[serde(default)]
    data: Vec<Data>,
}

impl ConversationStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append data to this step
    pub fn store_data(&mut self, data: Data) {
        self.data.push(data);
    }

    /// Most recently written data for `key`
    pub fn latest_data(&self, key: &str) -> Option<&Data> {
        self.data.iter().rev().find(|d| d.key == key)
    }

    /// All data written for `key`, oldest first
    pub fn all_data<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Data> + 'a {
        self.data.iter().filter(move |d| d.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Ordered view over conversation steps; the top is the first element
#[derive(Debug, Clone, Default)]
pub struct ConversationStepStack<'a> {
    steps: Vec<&'a ConversationStep>,
}

impl<'a> ConversationStepStack<'a> {
    pub fn new(steps: Vec<&'a ConversationStep>) -> Self {
        Self { steps }
    }

    /// Top of the stack, if any
    pub fn peek(&self) -> Option<&'a ConversationStep> {
        self.steps.first().copied()
    }

    pub fn get(&self, index: usize) -> Option<&'a ConversationStep> {
        self.steps.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ConversationStep> + '_ {
        self.steps.iter().copied()
    }
}

impl<'a> IntoIterator for ConversationStepStack<'a> {
    type Item = &'a ConversationStep;
    type IntoIter = std::vec::IntoIter<&'a ConversationStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_step() {
        let step = ConversationStep::new();
        assert!(step.is_empty());
        assert!(step.latest_data(KEY_EXPRESSIONS).is_none());
    }

    #[test]
    fn test_latest_data_wins() {
        let mut step = ConversationStep::new();
        step.store_data(Data::new(KEY_EXPRESSIONS, "greeting(hello)"));
        step.store_data(Data::new("output", "Hi there"));
        step.store_data(Data::new(KEY_EXPRESSIONS, "greeting(hi)"));

        assert_eq!(step.latest_data(KEY_EXPRESSIONS).unwrap().result, "greeting(hi)");
        assert_eq!(step.latest_data("output").unwrap().result, "Hi there");
        assert_eq!(step.all_data(KEY_EXPRESSIONS).count(), 2);
    }

    #[test]
    fn test_data_deserialize_without_timestamp() {
        let data: Data =
            serde_json::from_str(r#"{"key": "expressions", "result": "a(b)"}"#).unwrap();
        assert_eq!(data.key, "expressions");
        assert_eq!(data.result, "a(b)");
    }

    #[test]
    fn test_stack_peek() {
        let first = ConversationStep::new();
        let mut second = ConversationStep::new();
        second.store_data(Data::new("k", "v"));

        let stack = ConversationStepStack::new(vec![&second, &first]);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek(), Some(&second));
        assert_eq!(stack.get(1), Some(&first));

        let empty = ConversationStepStack::default();
        assert!(empty.is_empty());
        assert!(empty.peek().is_none());
    }
}
