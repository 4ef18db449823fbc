// SPDX-License-Identifier: MIT

//! Expression tree produced by natural-language understanding
//!
//! An expression is either a compound fact (`name` plus ordered children) or a
//! terminal value whose name is its literal token. Values compare numerically
//! when both sides are numbers, so `5` and `5.0` are the same value.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A node in an expression tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    /// Named fact with ordered sub-expressions
    Compound(Compound),
    /// Terminal literal token
    Value(Value),
}

/// Compound expression: `name(child, child, ...)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Compound {
    name: String,
    children: Vec<Expression>,
}

/// Terminal expression carrying a single scalar token
#[derive(Debug, Clone)]
pub struct Value {
    token: String,
}

impl Expression {
    /// Create a compound expression. `name` must be non-empty.
    pub fn compound(name: impl Into<String>, children: Vec<Expression>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "expression name must be non-empty");
        Expression::Compound(Compound { name, children })
    }

    /// Create a compound expression without children
    pub fn named(name: impl Into<String>) -> Self {
        Self::compound(name, Vec::new())
    }

    /// Create a value expression. `token` must be non-empty.
    pub fn value(token: impl Into<String>) -> Self {
        Expression::Value(Value::new(token))
    }

    /// Name of the expression (the literal token for values)
    pub fn name(&self) -> &str {
        match self {
            Expression::Compound(c) => &c.name,
            Expression::Value(v) => &v.token,
        }
    }

    /// Ordered sub-expressions; always empty for values
    pub fn sub_expressions(&self) -> &[Expression] {
        match self {
            Expression::Compound(c) => &c.children,
            Expression::Value(_) => &[],
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Expression::Value(v) => Some(v),
            Expression::Compound(_) => None,
        }
    }

    /// Replace the sub-expressions. Values never take children.
    pub fn set_sub_expressions(&mut self, children: Vec<Expression>) {
        match self {
            Expression::Compound(c) => c.children = children,
            Expression::Value(v) => {
                log::warn!(
                    "Tried to set sub-expressions on value expression '{}', ignoring",
                    v.token
                );
            }
        }
    }

    /// Append sub-expressions. Values never take children.
    pub fn add_sub_expressions<I>(&mut self, children: I)
    where
        I: IntoIterator<Item = Expression>,
    {
        match self {
            Expression::Compound(c) => c.children.extend(children),
            Expression::Value(v) => {
                log::warn!(
                    "Tried to add sub-expressions to value expression '{}', ignoring",
                    v.token
                );
            }
        }
    }
}

impl Compound {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Expression] {
        &self.children
    }
}

impl Value {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        debug_assert!(!token.is_empty(), "value token must be non-empty");
        Self { token }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// True if the token is a plain decimal number: optional sign, digits and
    /// at most one decimal point. No exponents or group separators.
    pub fn is_numeric(&self) -> bool {
        is_number(&self.token)
    }

    /// Parsed numeric value, or NaN if the token is not numeric
    pub fn to_number(&self) -> f64 {
        if !self.is_numeric() {
            return f64::NAN;
        }
        self.token.parse::<f64>().unwrap_or(f64::NAN)
    }
}

fn is_number(token: &str) -> bool {
    let unsigned = token
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(token);

    let mut seen_digit = false;
    let mut seen_point = false;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    seen_digit
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.is_numeric() && other.is_numeric() {
            return self.to_number() == other.to_number();
        }
        self.token == other.token
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_numeric() {
            // -0.0 == 0.0, so both must land on the same bits
            let n = self.to_number();
            let n = if n == 0.0 { 0.0 } else { n };
            n.to_bits().hash(state);
        } else {
            self.token.hash(state);
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Compound(c) => write!(f, "{}", c),
            Expression::Value(v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.children.is_empty() {
            write!(f, "(")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                match child {
                    // a bare token inside parentheses reads back as a value
                    Expression::Compound(c) if c.children.is_empty() => {
                        write!(f, "{}()", c.name)?
                    }
                    _ => write!(f, "{}", child)?,
                }
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token)
    }
}
