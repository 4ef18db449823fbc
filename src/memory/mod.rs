// SPDX-License-Identifier: MIT

//! Conversation memory
//!
//! This module provides:
//! - `ConversationStep` - data written during one turn
//! - `ConversationHistory` - read-only view consumed by conditions
//! - `ConversationMemory` - the in-process, append-only history
//! - `ConversationMemoryStore` - snapshot persistence by conversation id

mod conversation;
mod step;
mod store;

pub use conversation::{ConversationHistory, ConversationMemory};
pub use step::{ConversationStep, ConversationStepStack, Data, KEY_EXPRESSIONS};
pub use store::{
    ConversationMemorySnapshot, ConversationMemoryStore, ConversationState,
    FileConversationMemoryStore, InMemoryConversationMemoryStore,
};
