//! Expansion of plural names.
//!
//! Component references, pin names and net labels may use these operators:
//!
//! * `A,B,C` lists: `A`, `B`, `C`
//! * `1:3`, `0:10:5`, `A:D` inclusive ranges, counting down when the stop is
//!   below the start. Letters count `A`..`Y` then `AA`, skipping `IOQSXZ`.
//! * `A,B|1:3` pairs every item on the left with every item on the right.
//!   `/` means the same.
//! * `A[1,2].B[3,4]` replicates the surrounding text for each item within.
//! * `A{1,2,3}B` replicates like `[]` but drops the items: `AB`, `AB`, `AB`.
//! * `$1`..`$9` recall the text of the Nth group, including discarded ones.
//! * `` ` `` ends the name, so that `U[1:4]`1` passes KiCad's annotation check.

use std::mem;

use crate::error::ExpandError;

mod range;
mod render;
mod token;

pub use range::{expand_range, letter_count, parse_letter_count, LETTERS};
pub use render::{outer_join, Concat};
pub use token::{has_operators, strip_annotation, tokenize, Token};

use render::{has_backreferences, Expansion, GroupKind};

#[derive(Debug)]
enum Item {
    Open(GroupKind),
    Names(Vec<Expansion>),
    Close(GroupKind),
    Pipe,
}

/// State saved when a group opens
#[derive(Debug)]
struct Frame {
    /// Names before the group; the last one prefixes everything inside
    outer: Vec<Expansion>,
    items: Vec<Item>,
}

impl Frame {
    fn new(outer: Vec<Expansion>, kind: GroupKind) -> Self {
        Self {
            outer,
            items: vec![Item::Open(kind)],
        }
    }

    /// A `|` outside any group behaves as if the whole name were bracketed
    fn implicit() -> Self {
        Self {
            outer: vec![Expansion::default()],
            items: vec![],
        }
    }

    /// Multiply out the collected groups onto the enclosing name list
    fn fold(self, name: &str) -> Result<Vec<Expansion>, ExpandError> {
        let Frame { mut outer, items } = self;
        let prefix = outer.pop().unwrap_or_default();
        let mut lists = Vec::with_capacity(items.len());
        let mut opener = None;

        for item in items {
            match item {
                Item::Open(kind) => {
                    opener = Some(kind);
                    lists.push(vec![Expansion::open(kind)]);
                }
                Item::Close(kind) => {
                    match opener {
                        Some(open) if open == kind => {}
                        Some(open) => {
                            return Err(ExpandError::BraceMismatch {
                                opener: open.opener(),
                                closer: kind.closer(),
                                name: name.to_owned(),
                            })
                        }
                        None => {
                            return Err(ExpandError::UnmatchedCloser {
                                closer: kind.closer(),
                                name: name.to_owned(),
                            })
                        }
                    }
                    opener = None;
                    lists.push(vec![Expansion::close()]);
                }
                Item::Names(names) => lists.push(names),
                Item::Pipe => {}
            }
        }

        let empty = Expansion::default();
        outer.extend(outer_join(&lists, &empty, &prefix, &empty));
        Ok(outer)
    }
}

struct Cursor<'a> {
    tokens: std::iter::Peekable<std::vec::IntoIter<Token<'a>>>,
}

impl<'a> Cursor<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            tokens: tokenize(name).into_iter().peekable(),
        }
    }

    /// The literal at the cursor, or "" when an operator follows directly
    fn literal(&mut self) -> &'a str {
        match self.tokens.peek() {
            Some(Token::Literal(s)) => {
                let s = *s;
                self.tokens.next();
                s
            }
            _ => "",
        }
    }

    fn next_if(&mut self, f: impl FnOnce(&Token<'a>) -> bool) -> Option<Token<'a>> {
        self.tokens.next_if(f)
    }

    /// Consume a group opener if one is next
    fn opener(&mut self) -> Option<GroupKind> {
        let kind = match self.tokens.peek()? {
            Token::BracketOpen => GroupKind::Keep,
            Token::BraceOpen => GroupKind::Discard,
            _ => return None,
        };
        self.tokens.next();
        Some(kind)
    }

    fn token(&mut self) -> Option<Token<'a>> {
        self.tokens.next()
    }
}

fn expand_structure(name: &str) -> Result<Vec<Expansion>, ExpandError> {
    let mut cursor = Cursor::new(name);
    let mut names = vec![Expansion::text(cursor.literal())];
    let mut stack: Vec<Frame> = Vec::new();

    while let Some(token) = cursor.token() {
        match token {
            Token::BracketOpen | Token::BraceOpen => {
                let kind = if token == Token::BracketOpen {
                    GroupKind::Keep
                } else {
                    GroupKind::Discard
                };
                stack.push(Frame::new(mem::take(&mut names), kind));
                names = vec![Expansion::text(cursor.literal())];
            }
            Token::Comma => names.push(Expansion::text(cursor.literal())),
            Token::Colon => {
                let start = names.pop().unwrap_or_default().plain();
                let stop = cursor.literal();
                let step = cursor
                    .next_if(|t| *t == Token::Colon)
                    .map(|_| cursor.literal());
                let range =
                    expand_range(&start, stop, step).map_err(|source| ExpandError::Range {
                        name: name.to_owned(),
                        source,
                    })?;
                names.extend(range.iter().map(|s| Expansion::text(s)));
            }
            Token::Pipe | Token::Slash => {
                if stack.is_empty() {
                    stack.push(Frame::implicit());
                }
                if let Some(top) = stack.last_mut() {
                    top.items.push(Item::Names(mem::take(&mut names)));
                    top.items.push(Item::Pipe);
                }
                names = vec![Expansion::text(cursor.literal())];
            }
            Token::BracketClose | Token::BraceClose => {
                let kind = if token == Token::BracketClose {
                    GroupKind::Keep
                } else {
                    GroupKind::Discard
                };
                let Some(mut top) = stack.pop() else {
                    return Err(ExpandError::UnmatchedCloser {
                        closer: kind.closer(),
                        name: name.to_owned(),
                    });
                };
                top.items.push(Item::Names(mem::take(&mut names)));
                top.items.push(Item::Close(kind));
                top.items
                    .push(Item::Names(vec![Expansion::text(cursor.literal())]));

                // `A[1,2].B[3,4]` keeps multiplying within the same frame
                if let Some(kind) = cursor.opener() {
                    top.items.push(Item::Open(kind));
                    stack.push(top);
                    names = vec![Expansion::text(cursor.literal())];
                } else {
                    names = top.fold(name)?;
                }
            }
            Token::Backtick => break,
            Token::Literal(s) => {
                return Err(ExpandError::UnknownOperator {
                    op: s.to_owned(),
                    name: name.to_owned(),
                })
            }
        }
    }

    // Unterminated groups close as if the name ended in `]`
    while let Some(mut top) = stack.pop() {
        top.items.push(Item::Names(mem::take(&mut names)));
        names = top.fold(name)?;
    }
    Ok(names)
}

/// Expand a plural name into its singular names, in order.
///
/// A name without operators comes back as the only element.
pub fn expand_name(name: &str) -> Result<Vec<String>, ExpandError> {
    let name = strip_annotation(name);
    if !has_operators(&name) {
        return Ok(vec![name.into_owned()]);
    }
    let substitute = has_backreferences(&name);
    expand_structure(&name)?
        .iter()
        .map(|e| e.render(substitute, &name))
        .collect()
}

/// `true` if `name` is plural syntax, regardless of how many names it gives
pub fn is_plural(name: &str) -> bool {
    has_operators(&strip_annotation(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("R1", &["R1"])]
    #[case("Net-(R1-Pad1)", &["Net-(R1-Pad1)"])]
    #[case("A,B,C", &["A", "B", "C"])]
    #[case("1:3", &["1", "2", "3"])]
    #[case("1,5:7", &["1", "5", "6", "7"])]
    #[case("A,B|1:3", &["A1", "A2", "A3", "B1", "B2", "B3"])]
    #[case("A,B/1,2", &["A1", "A2", "B1", "B2"])]
    #[case("A[1,2,3]B", &["A1B", "A2B", "A3B"])]
    #[case("A[1,2].B[3,4]", &["A1.B3", "A1.B4", "A2.B3", "A2.B4"])]
    #[case("A{1,2,3}B", &["AB", "AB", "AB"])]
    #[case("A[1:5]`1", &["A1", "A2", "A3", "A4", "A5"])]
    #[case("R1`2", &["R1"])]
    #[case("Net-(U[1:2]`1-Pad3)", &["Net-(U1-Pad3)", "Net-(U2-Pad3)"])]
    #[case("X,A[1,2]", &["X", "A1", "A2"])]
    #[case("A[1,2]B,C", &["A1B", "A2B", "C"])]
    #[case("A[B[1,2]C,D]E", &["AB1CE", "AB2CE", "ADE"])]
    #[case("X[A,B|1,2]Y", &["XA1Y", "XA2Y", "XB1Y", "XB2Y"])]
    #[case("D[2:1][A:B]", &["D2A", "D2B", "D1A", "D1B"])]
    #[case("U[1:3", &["U1", "U2", "U3"])]
    #[case("A[B{1,2", &["AB", "AB"])]
    #[case("P[0:10:5]", &["P0", "P5", "P10"])]
    #[case("Q[A:D:2]", &["QA", "QC"])]
    fn expands_names(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(expand_name(input).unwrap(), expected);
    }

    #[test]
    fn discard_groups_keep_cardinality() {
        // LED matrix: anodes on P[1:5], cathodes on N[A:F]
        let anodes = expand_name("P[1:5]{A:F}").unwrap();
        let cathodes = expand_name("N{1:5}[A:F]").unwrap();
        let diodes = expand_name("D[1:5][A:F]").unwrap();
        assert_eq!(anodes.len(), 30);
        assert_eq!(cathodes.len(), 30);
        assert_eq!(diodes.len(), 30);
        let i = diodes.iter().position(|d| d == "D3C").unwrap();
        assert_eq!(anodes[i], "P3");
        assert_eq!(cathodes[i], "NC");
    }

    #[rstest]
    #[case("A[1,2]{x,y}_$2", &["A1_x", "A1_y", "A2_x", "A2_y"])]
    #[case("N{1:3}$1", &["N1", "N2", "N3"])]
    #[case("$1_{a,b}[1,2]", &["a_1", "a_2", "b_1", "b_2"])]
    #[case("S[x]{y}$1$2$1", &["Sxxyx"])]
    fn substitutes_backreferences(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(expand_name(input).unwrap(), expected);
    }

    #[test]
    fn singular_names_are_unchanged() {
        for name in ["R1", "GND", "+3V3", "Net-(U1-Pad4)", "~RESET"] {
            assert_eq!(expand_name(name).unwrap(), vec![name.to_owned()]);
        }
    }

    #[test]
    fn rejects_mismatched_braces() {
        assert_eq!(
            expand_name("A{1,2]").unwrap_err(),
            ExpandError::BraceMismatch {
                opener: '{',
                closer: ']',
                name: "A{1,2]".into()
            }
        );
        assert!(matches!(
            expand_name("A[1}").unwrap_err(),
            ExpandError::BraceMismatch {
                opener: '[',
                closer: '}',
                ..
            }
        ));
    }

    #[rstest]
    #[case("A]")]
    #[case("A[1]B]")]
    #[case("A|B]")]
    fn rejects_unmatched_closers(#[case] input: &str) {
        assert!(matches!(
            expand_name(input).unwrap_err(),
            ExpandError::UnmatchedCloser { closer: ']', .. }
        ));
    }

    #[rstest]
    #[case("U[1:0:0]")]
    #[case("U[1:x]")]
    #[case("U[A:3]")]
    #[case("U[1:]")]
    fn rejects_bad_ranges(#[case] input: &str) {
        assert!(matches!(
            expand_name(input).unwrap_err(),
            ExpandError::Range { .. }
        ));
    }

    #[test]
    fn rejects_unknown_group() {
        assert!(matches!(
            expand_name("A[1,2]$3").unwrap_err(),
            ExpandError::UnknownGroup {
                index: 3,
                groups: 1,
                ..
            }
        ));
    }

    #[test]
    fn is_plural_ignores_annotation() {
        assert!(is_plural("U[1:4]`1"));
        assert!(!is_plural("U1`2"));
        assert!(is_plural("Net-(U[1:2]`1-Pad3)"));
    }
}
