// SPDX-License-Identifier: MIT

//! Conversation history: an append-only sequence of steps

use super::step::{ConversationStep, ConversationStepStack};
use super::store::{ConversationMemorySnapshot, ConversationState};

/// Read-only access to a conversation's steps
pub trait ConversationHistory: Send + Sync {
    /// The step currently being written
    fn current_step(&self) -> &ConversationStep;

    /// All steps before the current one, most recent first
    fn previous_steps(&self) -> ConversationStepStack<'_>;

    /// The current step followed by all previous steps, most recent first
    fn all_steps(&self) -> ConversationStepStack<'_>;
}

/// In-process conversation memory
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    conversation_id: String,
    /// Chronological; never empty, the last entry is the current step
    steps: Vec<ConversationStep>,
}

impl ConversationMemory {
    /// Create a conversation with a single empty current step
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            steps: vec![ConversationStep::new()],
        }
    }

    /// Create a conversation with a random id
    pub fn with_generated_id() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Mutable access to the current step for the turn pipeline
    pub fn current_step_mut(&mut self) -> &mut ConversationStep {
        let last = self.steps.len() - 1;
        &mut self.steps[last]
    }

    /// Finalize the current step and open a new, empty one
    pub fn start_next_step(&mut self) {
        log::debug!(
            "Conversation {}: starting step {}",
            self.conversation_id,
            self.steps.len() + 1
        );
        self.steps.push(ConversationStep::new());
    }

    /// Number of steps including the current one
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Rebuild memory from a stored snapshot
    pub fn from_snapshot(snapshot: ConversationMemorySnapshot) -> Self {
        let mut steps = snapshot.steps;
        if steps.is_empty() {
            steps.push(ConversationStep::new());
        }
        Self {
            conversation_id: snapshot.conversation_id,
            steps,
        }
    }

    /// Capture the memory for persistence
    pub fn to_snapshot(&self, conversation_state: ConversationState) -> ConversationMemorySnapshot {
        ConversationMemorySnapshot {
            conversation_id: self.conversation_id.clone(),
            conversation_state,
            steps: self.steps.clone(),
        }
    }
}

impl ConversationHistory for ConversationMemory {
    fn current_step(&self) -> &ConversationStep {
        // `steps` is never empty
        &self.steps[self.steps.len() - 1]
    }

    fn previous_steps(&self) -> ConversationStepStack<'_> {
        let previous = &self.steps[..self.steps.len() - 1];
        ConversationStepStack::new(previous.iter().rev().collect())
    }

    fn all_steps(&self) -> ConversationStepStack<'_> {
        ConversationStepStack::new(self.steps.iter().rev().collect())
    }
}
