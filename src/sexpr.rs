use std::fmt::{Display, Write};

use crate::error::ParseError;

mod lexer;
mod parser;

/// An owned S-expression. Netlist records are edited in place, so nothing
/// borrows from the input.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SExpr {
    SExpr(String, Vec<SExpr>),
    String(String),
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\\'))
}

fn write_atom(f: &mut impl Write, s: &str) -> std::fmt::Result {
    if !needs_quotes(s) {
        return f.write_str(s);
    }
    f.write_char('"')?;
    for c in s.chars() {
        if matches!(c, '"' | '\\') {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('"')
}

impl Display for SExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SExpr::SExpr(label, children) => {
                write!(f, "({}", label)?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
            SExpr::String(s) => write_atom(f, s),
        }
    }
}

impl SExpr {
    pub fn list(label: &str, children: Vec<SExpr>) -> Self {
        SExpr::SExpr(label.to_owned(), children)
    }

    pub fn atom(value: &str) -> Self {
        SExpr::String(value.to_owned())
    }

    /// `(label "value")`
    pub fn pair(label: &str, value: &str) -> Self {
        SExpr::list(label, vec![SExpr::atom(value)])
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            SExpr::SExpr(label, _) => Some(label),
            SExpr::String(_) => None,
        }
    }

    /// The children of a list, nothing for an atom
    pub fn items(&self) -> &[SExpr] {
        match self {
            SExpr::SExpr(_, children) => children,
            SExpr::String(_) => &[],
        }
    }

    pub fn value(&self, label: &str) -> Result<&str, ParseError> {
        let child = self.child(label)?;
        if let SExpr::SExpr(_, children) = child {
            if let Some(SExpr::String(s)) = children.first() {
                return Ok(s);
            }
        }
        Err(ParseError::MissingValue(label.to_owned()))
    }

    pub fn children<'b, 'c>(&'b self, label: &'c str) -> LabeledChildIterator<'b, 'c> {
        LabeledChildIterator {
            iter: self.items().iter(),
            label,
        }
    }

    pub fn child<'b>(&self, label: &'b str) -> Result<&SExpr, ParseError> {
        self.children(label)
            .next()
            .ok_or_else(|| ParseError::MissingChild(label.to_owned()))
    }

    /// A list whose children are all atoms
    fn is_leaf(&self) -> bool {
        match self {
            SExpr::SExpr(_, children) => children.iter().all(|c| matches!(c, SExpr::String(_))),
            SExpr::String(_) => true,
        }
    }

    /// Render in the KiCad layout: leaf lists stay on the line of their
    /// parent until the first nested list, which starts a new indented line.
    pub fn to_pretty(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out.push('\n');
        out
    }

    fn write_pretty(&self, out: &mut String, depth: usize) {
        let SExpr::SExpr(label, children) = self else {
            out.push_str(&self.to_string());
            return;
        };
        out.push('(');
        out.push_str(label);
        let mut broken = false;
        for child in children {
            broken |= !child.is_leaf();
            if broken && matches!(child, SExpr::SExpr(..)) {
                out.push('\n');
                out.push_str(&"  ".repeat(depth + 1));
            } else {
                out.push(' ');
            }
            child.write_pretty(out, depth + 1);
        }
        out.push(')');
    }
}

#[derive(Debug)]
pub struct LabeledChildIterator<'b, 'c> {
    iter: std::slice::Iter<'b, SExpr>,
    label: &'c str,
}

impl<'b, 'c> Iterator for LabeledChildIterator<'b, 'c> {
    type Item = &'b SExpr;

    fn next(&mut self) -> Option<Self::Item> {
        let label = self.label;
        self.iter.find(|child| child.label() == Some(label))
    }
}

impl TryFrom<&String> for SExpr {
    type Error = ParseError;

    fn try_from(input: &String) -> Result<Self, Self::Error> {
        SExpr::try_from(input.as_str())
    }
}
