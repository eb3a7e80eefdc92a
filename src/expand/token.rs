use std::borrow::Cow;

use logos::Logos;

/// Characters that make a name plural. The backtick is not one of them, it
/// only marks an annotation.
const OPERATORS: &[char] = &['[', ']', '{', '}', '|', '/', ':', ','];

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    #[regex(r"[^\[\]{}|/:,`]+", |lex| lex.slice())]
    Literal(&'a str),
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("|")]
    Pipe,
    #[token("/")]
    Slash,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("`")]
    Backtick,
}

/// Split a name into literal runs and operators. Never fails: anything that
/// is not an operator ends up in a literal.
pub fn tokenize(name: &str) -> Vec<Token<'_>> {
    Token::lexer(name)
        .spanned()
        .map(|(tok, span)| tok.unwrap_or(Token::Literal(&name[span])))
        .collect()
}

/// Drop each backtick and the annotation number following it. KiCad refuses
/// `U[1:4]` as a reference but accepts `U[1:4]`1`, and names unlabeled nets
/// after a pin such as `Net-(U[1:4]`1-Pad3)`.
pub fn strip_annotation(name: &str) -> Cow<'_, str> {
    if !name.contains('`') {
        return Cow::Borrowed(name);
    }
    let mut stripped = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(i) = rest.find('`') {
        stripped.push_str(&rest[..i]);
        rest = rest[i + 1..].trim_start_matches(|c: char| c.is_ascii_digit());
    }
    stripped.push_str(rest);
    Cow::Owned(stripped)
}

/// Quick check before tokenizing
pub fn has_operators(name: &str) -> bool {
    name.contains(OPERATORS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[test]
    fn splits_literals_and_operators() {
        let tokens = tokenize("U[1:4].A{x,y}|B/C");
        let expected = vec![
            Token::Literal("U"),
            Token::BracketOpen,
            Token::Literal("1"),
            Token::Colon,
            Token::Literal("4"),
            Token::BracketClose,
            Token::Literal(".A"),
            Token::BraceOpen,
            Token::Literal("x"),
            Token::Comma,
            Token::Literal("y"),
            Token::BraceClose,
            Token::Pipe,
            Token::Literal("B"),
            Token::Slash,
            Token::Literal("C"),
        ];
        assert_eq!(tokens, expected);
    }

    #[test]
    fn adjacent_operators_have_no_empty_literal() {
        assert_eq!(
            tokenize("][,"),
            vec![Token::BracketClose, Token::BracketOpen, Token::Comma]
        );
    }

    #[test]
    fn keeps_unusual_characters_in_literals() {
        assert_eq!(
            tokenize("Net-(R1-Pad1) µ$1"),
            vec![Token::Literal("Net-(R1-Pad1) µ$1")]
        );
    }

    #[test]
    fn backtick_is_a_token() {
        assert_eq!(
            tokenize("A`1"),
            vec![Token::Literal("A"), Token::Backtick, Token::Literal("1")]
        );
    }

    #[rstest]
    #[case("A[1:5]`1", "A[1:5]")]
    #[case("R12", "R12")]
    #[case("U[1:4]`12", "U[1:4]")]
    #[case("Net-(U[1:2]`1-Pad3)", "Net-(U[1:2]-Pad3)")]
    #[case("`x", "x")]
    #[case("A`1,B`2", "A,B")]
    fn strips_annotation(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_annotation(input), expected);
    }

    #[rstest]
    #[case("R1", false)]
    #[case("Net-(R1-Pad1)", false)]
    #[case("A,B", true)]
    #[case("1:3", true)]
    #[case("/GND", true)]
    #[case("A{x}", true)]
    fn detects_operators(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(has_operators(input), expected);
    }
}
