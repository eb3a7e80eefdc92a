use crate::error::{ParseError, Span};

use super::{
    lexer::{lex, Lexeme},
    SExpr,
};

struct Parser<'a> {
    lexemes: std::vec::IntoIter<(Result<Lexeme<'a>, ParseError>, Span)>,
    end: usize,
}

impl<'a> Parser<'a> {
    fn advance(&mut self) -> Result<(Lexeme<'a>, Span), ParseError> {
        let Some((lexeme, span)) = self.lexemes.next() else {
            return Err(ParseError::UnexpectedEof {
                at: self.end..self.end,
            });
        };
        Ok((lexeme?, span))
    }

    fn unexpected(expected: &str, found: &Lexeme, at: Span) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_owned(),
            found: found.describe().to_owned(),
            at,
        }
    }

    fn root(&mut self) -> Result<SExpr, ParseError> {
        match self.advance()? {
            (Lexeme::Open, _) => self.list(),
            (other, at) => Err(Self::unexpected("'('", &other, at)),
        }
    }

    /// `label child...)`, the opening paren already consumed
    fn list(&mut self) -> Result<SExpr, ParseError> {
        let label = match self.advance()? {
            (Lexeme::Atom(label), _) => label.to_owned(),
            (other, at) => return Err(Self::unexpected("label", &other, at)),
        };

        let mut children = Vec::new();
        loop {
            match self.advance()? {
                (Lexeme::Close, _) => return Ok(SExpr::SExpr(label, children)),
                (Lexeme::Open, _) => children.push(self.list()?),
                (Lexeme::Atom(s), _) => children.push(SExpr::atom(s)),
                (Lexeme::Quoted(s), _) => children.push(SExpr::String(s)),
            }
        }
    }
}

impl TryFrom<&str> for SExpr {
    type Error = ParseError;

    fn try_from(input: &str) -> Result<Self, Self::Error> {
        let mut parser = Parser {
            lexemes: lex(input).collect::<Vec<_>>().into_iter(),
            end: input.len(),
        };
        parser.root()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ParseError;
    use crate::sexpr::SExpr;
    use rstest::*;

    #[rstest]
    #[case("(abc)", "(abc)")]
    #[case("(abc\n)", "(abc)")]
    #[case("(ref \"R1\")", "(ref R1)")]
    #[case("(name \"\")", "(name \"\")")]
    #[case("(field (name Reference) D)", "(field (name Reference) D)")]
    #[case("(d \"a \\\"b\\\" c\")", "(d \"a \\\"b\\\" c\")")]
    #[case("(net (code 1) (name \"Net-(R1-Pad1)\"))", "(net (code 1) (name \"Net-(R1-Pad1)\"))")]
    fn can_parse_sexpr(#[case] input: &str, #[case] expected: &str) {
        let sexpr = SExpr::try_from(input).unwrap();
        assert_eq!(&format!("{sexpr}"), expected);
    }

    #[test]
    fn nests_lists() {
        let sexpr = SExpr::try_from("(a (b c) d)").unwrap();
        assert_eq!(
            sexpr,
            SExpr::list(
                "a",
                vec![SExpr::list("b", vec![SExpr::atom("c")]), SExpr::atom("d")]
            )
        );
    }

    #[rstest]
    #[case("(abc")]
    #[case("(a (b c)")]
    #[case("")]
    fn rejects_unterminated_input(#[case] input: &str) {
        assert!(matches!(
            SExpr::try_from(input).unwrap_err(),
            ParseError::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn rejects_unterminated_quote() {
        assert!(matches!(
            SExpr::try_from("(a \"b)").unwrap_err(),
            ParseError::UnknownToken { .. }
        ));
    }

    #[rstest]
    #[case("((a))")]
    #[case("a")]
    #[case("(\"quoted\" label)")]
    fn rejects_list_without_label(#[case] input: &str) {
        assert!(matches!(
            SExpr::try_from(input).unwrap_err(),
            ParseError::UnexpectedToken { .. }
        ));
    }
}
