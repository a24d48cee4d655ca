//! Search-path compiler.
//!
//! A search path is an s-expression of steps describing where a value lives
//! inside a nested document:
//!
//! - `()`: the top-level value itself
//! - `foo`: struct field `foo`
//! - `2`: the third child of a list or s-expression
//! - `*`: any child
//! - `'a field'` / `"a field"`: quoted field name (needed for spaces,
//!   parentheses or a literal `*`)
//! - `A::B::(...)`: the top-level value must carry exactly these annotations
//!
//! For example `(items * price)` addresses the `price` field of every
//! element of the `items` list.

use std::fmt;

use crate::error::{PathError, PathResult};

/// A single step in a compiled search path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Struct field access by name.
    Field(String),
    /// Container child by ordinal position.
    Index(usize),
    /// Any child.
    Wildcard,
}

impl PathStep {
    fn accepts(&self, location: &Location<'_>, case_sensitive: bool) -> bool {
        match (self, location) {
            (Self::Wildcard, _) => true,
            (Self::Field(name), Location::Field(field)) => {
                if case_sensitive {
                    name == field
                } else {
                    name.eq_ignore_ascii_case(field)
                }
            }
            (Self::Index(i), Location::Index(j)) => i == j,
            _ => false,
        }
    }
}

/// One step of a concrete position inside a document, as reported by a
/// reader walking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location<'a> {
    /// The value sits under this field name of its parent struct.
    Field(&'a str),
    /// The value is this child of its parent list or s-expression.
    Index(usize),
}

/// A compiled search path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchPath {
    annotations: Vec<String>,
    steps: Vec<PathStep>,
}

impl SearchPath {
    /// Compiles a search-path expression.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] for blank input and
    /// [`PathError::Syntax`] when the expression is malformed.
    pub fn compile(expression: &str) -> PathResult<Self> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }

        let chars: Vec<char> = trimmed.chars().collect();
        let mut pos = 0;
        let mut annotations = Vec::new();

        // Annotation prefix
        loop {
            pos = skip_whitespace(&chars, pos);
            if pos >= chars.len() {
                return Err(PathError::syntax(trimmed, pos, "expected '('"));
            }
            if chars[pos] == '(' {
                break;
            }
            let (token, next) = read_token(trimmed, &chars, pos)?;
            pos = skip_whitespace(&chars, next);
            if chars.get(pos) != Some(&':') || chars.get(pos + 1) != Some(&':') {
                return Err(PathError::syntax(
                    trimmed,
                    pos,
                    "expected '::' after annotation",
                ));
            }
            annotations.push(token.into_name());
            pos += 2;
        }
        pos += 1;

        let mut steps = Vec::new();
        loop {
            pos = skip_whitespace(&chars, pos);
            if pos >= chars.len() {
                return Err(PathError::syntax(trimmed, pos, "unclosed '('"));
            }
            if chars[pos] == ')' {
                pos += 1;
                break;
            }
            let start = pos;
            let (token, next) = read_token(trimmed, &chars, pos)?;
            steps.push(token.into_step(trimmed, start)?);
            pos = next;
        }

        pos = skip_whitespace(&chars, pos);
        if pos < chars.len() {
            return Err(PathError::syntax(
                trimmed,
                pos,
                format!("unexpected trailing input '{}'", chars[pos]),
            ));
        }

        Ok(Self { annotations, steps })
    }

    /// Builds a path that matches a single top-level field.
    #[must_use]
    pub fn top_level_field(name: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            steps: vec![PathStep::Field(name.into())],
        }
    }

    /// The compiled steps, outermost first.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Annotations required on the top-level value (empty = any).
    #[must_use]
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    /// Number of steps below the top-level value.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if `location` is exactly the position this path
    /// describes.
    ///
    /// Annotations are compared exactly; `case_sensitive` only affects
    /// field names.
    #[must_use]
    pub fn matches(
        &self,
        location: &[Location<'_>],
        annotations: &[&str],
        case_sensitive: bool,
    ) -> bool {
        location.len() == self.steps.len()
            && self.annotations_match(annotations)
            && self.prefix_matches(location, case_sensitive)
    }

    /// Returns `true` if `location` lies on the way to a match, i.e. a
    /// reader should keep descending.
    #[must_use]
    pub fn leads_to(
        &self,
        location: &[Location<'_>],
        annotations: &[&str],
        case_sensitive: bool,
    ) -> bool {
        location.len() < self.steps.len()
            && self.annotations_match(annotations)
            && self.prefix_matches(location, case_sensitive)
    }

    fn annotations_match(&self, annotations: &[&str]) -> bool {
        self.annotations.is_empty()
            || self
                .annotations
                .iter()
                .map(String::as_str)
                .eq(annotations.iter().copied())
    }

    fn prefix_matches(&self, location: &[Location<'_>], case_sensitive: bool) -> bool {
        self.steps
            .iter()
            .zip(location)
            .all(|(step, loc)| step.accepts(loc, case_sensitive))
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write_symbol(f, annotation)?;
            f.write_str("::")?;
        }
        f.write_str("(")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match step {
                PathStep::Field(name) => write_symbol(f, name)?,
                PathStep::Index(index) => write!(f, "{index}")?,
                PathStep::Wildcard => f.write_str("*")?,
            }
        }
        f.write_str(")")
    }
}

fn write_symbol(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let bare = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit() || c == '-')
        && name != "*"
        && !name.chars().any(is_delimiter);
    if bare {
        f.write_str(name)
    } else {
        f.write_str("'")?;
        for c in name.chars() {
            if c == '\'' || c == '\\' {
                f.write_str("\\")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("'")
    }
}

// ── Tokenizer ──────────────────────────────────────────────────────

enum Token {
    Bare(String),
    Quoted(String),
}

impl Token {
    fn into_name(self) -> String {
        match self {
            Self::Bare(s) | Self::Quoted(s) => s,
        }
    }

    fn into_step(self, expression: &str, position: usize) -> PathResult<PathStep> {
        match self {
            Self::Quoted(name) => Ok(PathStep::Field(name)),
            Self::Bare(s) if s == "*" => Ok(PathStep::Wildcard),
            Self::Bare(s) if s.chars().all(|c| c.is_ascii_digit()) => {
                s.parse().map(PathStep::Index).map_err(|_| {
                    PathError::syntax(expression, position, format!("index '{s}' out of range"))
                })
            }
            Self::Bare(s) if s.starts_with(|c: char| c.is_ascii_digit() || c == '-') => Err(
                PathError::syntax(expression, position, format!("invalid index '{s}'")),
            ),
            Self::Bare(s) => Ok(PathStep::Field(s)),
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | ':' | '\'' | '"')
}

fn skip_whitespace(chars: &[char], mut pos: usize) -> usize {
    while pos < chars.len() && chars[pos].is_whitespace() {
        pos += 1;
    }
    pos
}

fn read_token(expression: &str, chars: &[char], pos: usize) -> PathResult<(Token, usize)> {
    let first = chars[pos];
    if first == '\'' || first == '"' {
        let mut name = String::new();
        let mut i = pos + 1;
        while i < chars.len() {
            match chars[i] {
                '\\' if i + 1 < chars.len() => {
                    name.push(chars[i + 1]);
                    i += 2;
                }
                c if c == first => return Ok((Token::Quoted(name), i + 1)),
                c => {
                    name.push(c);
                    i += 1;
                }
            }
        }
        return Err(PathError::syntax(expression, pos, "unclosed quoted field"));
    }

    let mut end = pos;
    while end < chars.len() && !is_delimiter(chars[end]) {
        end += 1;
    }
    if end == pos {
        return Err(PathError::syntax(
            expression,
            pos,
            format!("unexpected '{first}'"),
        ));
    }
    Ok((Token::Bare(chars[pos..end].iter().collect()), end))
}
