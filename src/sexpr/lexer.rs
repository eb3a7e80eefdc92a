use logos::{Lexer, Logos};

use crate::error::{ParseError, Span};

/// Drop the quotes and resolve `\"` and `\\`. Other escapes are kept as
/// written, KiCad does not produce them.
fn unquote<'a>(lex: &mut Lexer<'a, Lexeme<'a>>) -> String {
    let inner = &lex.slice()[1..lex.slice().len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(e @ ('"' | '\\')) => out.push(e),
            Some(e) => {
                out.push('\\');
                out.push(e);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[derive(Logos, Clone, Debug, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f\n]+")]
pub(super) enum Lexeme<'a> {
    #[token("(")]
    Open,
    #[token(")")]
    Close,
    #[regex(r#""([^"\\]|\\.)*""#, unquote)]
    Quoted(String),
    #[regex(r#"[^"() \t\r\f\n]+"#, |lex| lex.slice())]
    Atom(&'a str),
}

impl Lexeme<'_> {
    pub(super) fn describe(&self) -> &'static str {
        match self {
            Lexeme::Open => "'('",
            Lexeme::Close => "')'",
            Lexeme::Quoted(_) => "quoted string",
            Lexeme::Atom(_) => "atom",
        }
    }
}

/// Lexemes with their position. Unlexable input becomes an error item
/// instead of ending the stream.
pub(super) fn lex(input: &str) -> impl Iterator<Item = (Result<Lexeme<'_>, ParseError>, Span)> {
    Lexeme::lexer(input).spanned().map(move |(lexeme, span)| {
        let lexeme = lexeme.map_err(|_| ParseError::UnknownToken {
            found: input[span.clone()].to_owned(),
            at: span.clone(),
        });
        (lexeme, span)
    })
}
