// SPDX-License-Identifier: MIT

use super::ast::Expression;
use super::parser;
use crate::error::ParseError;

/// Decodes serialized expression strings into expression lists.
///
/// Conditions hold one of these behind an `Arc` so the grammar can be swapped
/// (or mocked in tests) without touching the matching logic.
pub trait ExpressionProvider: Send + Sync {
    /// Decode a comma-separated expression list
    fn parse_expressions(&self, input: &str) -> Result<Vec<Expression>, ParseError>;
}

/// Provider backed by the built-in text grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExpressionProvider;

impl TextExpressionProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionProvider for TextExpressionProvider {
    fn parse_expressions(&self, input: &str) -> Result<Vec<Expression>, ParseError> {
        parser::parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_text_provider_as_trait_object() {
        let provider: Arc<dyn ExpressionProvider> = Arc::new(TextExpressionProvider::new());
        let exprs = provider.parse_expressions("a(1),b").unwrap();
        assert_eq!(exprs.len(), 2);
        assert!(provider.parse_expressions("a(").is_err());
    }
}
