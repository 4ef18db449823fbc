//! Expression list parser
//!
//! Parses serialized expression lists like:
//! - `greeting(hello)`
//! - `someExpression(someValue),someOtherExpression(someOtherValue)`
//! - `amount(currency(eur),10.5),confirmation`
//!
//! A bare name at the top level is a compound without children; a bare token
//! inside parentheses is a value.

use super::ast::Expression;
use crate::error::ParseError;

/// Parse a comma-separated expression list
pub fn parse(input: &str) -> Result<Vec<Expression>, ParseError> {
    let mut cursor = Cursor::new(input);
    let mut expressions = Vec::new();

    cursor.skip_whitespace();
    if cursor.at_end() {
        return Ok(expressions);
    }

    loop {
        expressions.push(parse_expression(&mut cursor, true)?);
        cursor.skip_whitespace();
        match cursor.advance() {
            None => break,
            Some((_, ',')) => continue,
            Some((pos, c)) => {
                return Err(ParseError::new(
                    pos,
                    format!("expected ',' or end of input, found '{}'", c),
                ))
            }
        }
    }

    Ok(expressions)
}

fn parse_expression(cursor: &mut Cursor<'_>, top_level: bool) -> Result<Expression, ParseError> {
    cursor.skip_whitespace();
    let name = cursor.token()?;
    cursor.skip_whitespace();

    if cursor.peek() != Some('(') {
        return Ok(if top_level {
            Expression::named(name)
        } else {
            Expression::value(name)
        });
    }
    cursor.advance();

    let mut children = Vec::new();
    cursor.skip_whitespace();
    if cursor.peek() == Some(')') {
        cursor.advance();
        return Ok(Expression::compound(name, children));
    }

    loop {
        children.push(parse_expression(cursor, false)?);
        cursor.skip_whitespace();
        match cursor.advance() {
            Some((_, ',')) => continue,
            Some((_, ')')) => break,
            Some((pos, c)) => {
                return Err(ParseError::new(
                    pos,
                    format!("expected ',' or ')', found '{}'", c),
                ))
            }
            None => {
                return Err(ParseError::new(
                    cursor.position(),
                    format!("unclosed '(' after '{}'", name),
                ))
            }
        }
    }

    Ok(Expression::compound(name, children))
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let c = self.peek()?;
        let start = self.pos;
        self.pos += c.len_utf8();
        Some((start, c))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    /// Read a name or literal token
    fn token(&mut self) -> Result<&'a str, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if !is_delimiter(c)) {
            self.advance();
        }
        if start == self.pos {
            return Err(match self.peek() {
                Some(c) => ParseError::new(start, format!("expected expression, found '{}'", c)),
                None => ParseError::new(start, "expected expression, found end of input"),
            });
        }
        let input = self.input;
        Ok(&input[start..self.pos])
    }
}

fn is_delimiter(c: char) -> bool {
    c == '(' || c == ')' || c == ',' || c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_expression() {
        let exprs = parse("greeting(hello)").unwrap();
        assert_eq!(
            exprs,
            vec![Expression::compound(
                "greeting",
                vec![Expression::value("hello")]
            )]
        );
    }

    #[test]
    fn test_parse_list() {
        let exprs =
            parse("someExpression(someValue),someOtherExpression(someOtherValue)").unwrap();
        assert_eq!(exprs.len(), 2);
        assert_eq!(exprs[0].name(), "someExpression");
        assert_eq!(exprs[1].sub_expressions(), &[Expression::value("someOtherValue")]);
    }

    #[test]
    fn test_parse_bare_name_is_compound() {
        let exprs = parse("someNonMatchingExpression").unwrap();
        assert_eq!(exprs, vec![Expression::named("someNonMatchingExpression")]);
        assert!(exprs[0].as_value().is_none());
    }

    #[test]
    fn test_parse_nested() {
        let exprs = parse("amount(currency(eur), 10.5)").unwrap();
        assert_eq!(
            exprs,
            vec![Expression::compound(
                "amount",
                vec![
                    Expression::compound("currency", vec![Expression::value("eur")]),
                    Expression::value("10.5"),
                ]
            )]
        );
    }

    #[test]
    fn test_parse_numeric_argument() {
        let exprs = parse("quantity(5)").unwrap();
        assert_eq!(exprs, parse("quantity(5.0)").unwrap());
    }

    #[test]
    fn test_parse_empty_parens() {
        let exprs = parse("confirmation()").unwrap();
        assert_eq!(exprs, vec![Expression::named("confirmation")]);
    }

    #[test]
    fn test_parse_whitespace() {
        let exprs = parse("  a ( x ) ,  b  ").unwrap();
        assert_eq!(
            exprs,
            vec![
                Expression::compound("a", vec![Expression::value("x")]),
                Expression::named("b"),
            ]
        );
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_display_round_trip() {
        for input in ["a(b(1),c),d", "a(b())", "x(y(z()),5.0),w"] {
            let exprs = parse(input).unwrap();
            let rendered: Vec<String> = exprs.iter().map(|e| e.to_string()).collect();
            let rendered = rendered.join(",");
            assert_eq!(rendered, input);
            assert_eq!(parse(&rendered).unwrap(), exprs);
        }
    }

    #[test]
    fn test_parse_unclosed_paren() {
        let err = parse("greeting(hello").unwrap_err();
        assert_eq!(err.position, 14);
        assert!(err.message.contains("unclosed"));
    }

    #[test]
    fn test_parse_trailing_comma() {
        let err = parse("a,").unwrap_err();
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_parse_garbage_after_expression() {
        assert!(parse("a(b)c").is_err());
        assert!(parse("a(b c)").is_err());
        assert!(parse("a)").is_err());
        assert!(parse("(a)").is_err());
    }
}
