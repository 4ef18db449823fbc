// SPDX-License-Identifier: MIT

//! Expressions: the structured facts recorded for each conversation step
//!
//! This module provides the expression tree, the text grammar used to
//! serialize expression lists, and the `ExpressionProvider` seam through
//! which conditions decode them.

mod ast;
mod parser;
mod provider;

pub use ast::{Compound, Expression, Value};
pub use parser::parse;
pub use provider::{ExpressionProvider, TextExpressionProvider};
