// SPDX-License-Identifier: MIT

//! Conversation-aware input conditions for dialog engines
//!
//! Conditions check whether expected expressions were understood during a
//! conversation, scoped to the current turn, the previous turn, any turn, or
//! no turn at all.

pub mod behavior;
pub mod error;
pub mod expressions;
pub mod memory;

pub use error::{BehaviorError, MatcherError, ParseError, StoreError};
