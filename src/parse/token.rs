use logos::{Lexer, Logos};

use crate::{Error, Quantifier, Reluctance, Result};

/// Tokens of the dCBOR pattern mini-language.
///
/// A handful of variants carry a `Result` payload because validating their
/// content (hex digits, regex syntax, capture-name shape, digest length)
/// happens during lexing, where the raw lexeme is still at hand; the parser
/// only has to propagate the error.
#[derive(Debug, Clone, Logos, PartialEq)]
#[rustfmt::skip]
#[logos(error = Error)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("bool")]
    Bool,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("number")]
    Number,
    #[token("text")]
    Text,
    #[token("bytes")]
    Bytes,
    #[token("map")]
    Map,
    #[token("array")]
    Array,
    #[token("tagged")]
    Tagged,
    #[token("date")]
    Date,
    #[token("digest")]
    Digest,
    #[token("known")]
    Known,
    #[token("NaN")]
    NaN,
    #[token("-Infinity")]
    NegInfinity,
    #[token("Infinity")]
    Infinity,

    #[token("|")]
    Or,
    #[token("&")]
    And,
    #[token("!")]
    Not,

    #[token("*+")]
    StarPossessive,
    #[token("*?")]
    StarLazy,
    #[token("*")]
    Star,
    #[token("++")]
    PlusPossessive,
    #[token("+?")]
    PlusLazy,
    #[token("+")]
    Plus,
    #[token("?+")]
    QuestionPossessive,
    #[token("??")]
    QuestionLazy,
    #[token("?")]
    Question,

    #[token("...")]
    Ellipsis,
    #[token("..")]
    DotDot,
    #[token(">=")]
    GreaterThanOrEqual,
    #[token("<=")]
    LessThanOrEqual,
    #[token(">")]
    GreaterThan,
    #[token("<")]
    LessThan,

    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("}")]
    BraceClose,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    /// A `{` whose content is resolved immediately: if it scans as a
    /// cardinality range (`{n}`, `{n,m}`, `{n,}`, optionally suffixed `?`/
    /// `+`) this is `Some(quantifier)` and the lexer has already consumed
    /// through the closing brace. Otherwise it's `None` and the lexer has
    /// consumed only the `{`, leaving a map body (`{}`, `{k: v, ...}`) for
    /// the parser to read token by token.
    #[token("{", lex_brace)]
    BraceOpen(Option<Quantifier>),

    #[regex(r"-?[0-9]+(\.[0-9]+)?", lex_number_literal)]
    NumberLiteral(f64),

    #[token("\"", lex_string_literal)]
    StringLiteral(Result<String>),

    #[token("/", lex_regex)]
    RegexLiteral(Result<String>),

    #[token("h'/", lex_hex_binary_regex)]
    HexBinaryRegex(Result<String>),

    #[token("h'", lex_hex_string)]
    HexString(Result<Vec<u8>>),

    #[token("digest'", lex_digest_quoted)]
    DigestQuoted(Result<Vec<u8>>),

    #[token("date'", lex_date_quoted)]
    DateQuoted(Result<String>),

    #[token("'", lex_single_quoted)]
    SingleQuoted(Result<String>),

    #[regex(r"@[^\s()\[\]{},:]+", lex_group_name)]
    GroupName(Result<String>),
}

fn lex_number_literal(lex: &mut Lexer<Token>) -> Result<f64> {
    lex.slice().parse().map_err(|_| Error::InvalidNumberFormat(lex.span()))
}

fn skip_ws(s: &str, pos: &mut usize) {
    while let Some(ch) = s[*pos..].chars().next() {
        if matches!(ch, ' ' | '\t' | '\n' | '\r' | '\u{0c}') {
            *pos += ch.len_utf8();
        } else {
            break;
        }
    }
}

/// Scans digits starting at `*pos`, returning `None` (without advancing) if
/// there are none.
fn scan_digits(s: &str, pos: &mut usize) -> Option<usize> {
    let start = *pos;
    while let Some(ch) = s[*pos..].chars().next() {
        if ch.is_ascii_digit() {
            *pos += ch.len_utf8();
        } else {
            break;
        }
    }
    if start == *pos { None } else { s[start..*pos].parse().ok() }
}

/// Callback for `{`. Decides, without committing, whether the content looks
/// like a cardinality range (digits followed by `,` or `}`) or a map body
/// (digits followed by `:`, or anything not starting with a digit at all).
fn lex_brace(lex: &mut Lexer<Token>) -> Result<Option<Quantifier>> {
    let src = lex.remainder();
    let mut pos = 0;
    skip_ws(src, &mut pos);

    let Some(min) = scan_digits(src, &mut pos) else { return Ok(None) };

    let after_min = pos;
    skip_ws(src, &mut pos);
    match src[pos..].chars().next() {
        Some(',') | Some('}') => {}
        _ => return Ok(None), // e.g. `{1: ...}` — a map constraint, not a range
    }
    pos = after_min;
    skip_ws(src, &mut pos);

    let max = match src[pos..].chars().next() {
        Some(',') => {
            pos += 1;
            skip_ws(src, &mut pos);
            match src[pos..].chars().next() {
                Some('}') => None,
                Some(ch) if ch.is_ascii_digit() => {
                    let m = scan_digits(src, &mut pos)
                        .ok_or_else(|| Error::InvalidRange(lex.span()))?;
                    skip_ws(src, &mut pos);
                    Some(m)
                }
                _ => return Err(Error::InvalidRange(lex.span())),
            }
        }
        Some('}') => Some(min),
        _ => return Err(Error::InvalidRange(lex.span())),
    };

    if !matches!(src[pos..].chars().next(), Some('}')) {
        return Err(Error::InvalidRange(lex.span()));
    }
    pos += 1;

    let reluctance = match src[pos..].chars().next() {
        Some('?') => {
            pos += 1;
            Reluctance::Lazy
        }
        Some('+') => {
            pos += 1;
            Reluctance::Possessive
        }
        _ => Reluctance::Greedy,
    };

    if let Some(max) = max {
        if min > max {
            return Err(Error::InvalidRange(lex.span()));
        }
    }

    lex.bump(pos);
    let quantifier = match max {
        Some(max) => Quantifier::new(min..=max, reluctance),
        None => Quantifier::new(min.., reluctance),
    };
    Ok(Some(quantifier))
}

fn lex_string_literal(lex: &mut Lexer<Token>) -> Result<String> {
    let src = lex.remainder();
    let mut content = String::new();
    let mut escape = false;
    for (i, ch) in src.char_indices() {
        if escape {
            content.push(match ch {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
            escape = false;
            continue;
        }
        match ch {
            '\\' => escape = true,
            '"' => {
                lex.bump(i + 1);
                return Ok(content);
            }
            _ => content.push(ch),
        }
    }
    Err(Error::UnterminatedString(lex.span()))
}

fn lex_regex(lex: &mut Lexer<Token>) -> Result<String> {
    let src = lex.remainder();
    let mut escape = false;
    for (i, ch) in src.char_indices() {
        match (ch, escape) {
            ('\\', false) => escape = true,
            ('/', false) => {
                lex.bump(i + 1);
                let body = src[..i].to_owned();
                return regex::Regex::new(&body)
                    .map(|_| body)
                    .map_err(|_| Error::InvalidRegex(lex.span()));
            }
            _ => escape = false,
        }
    }
    Err(Error::UnterminatedRegex(lex.span()))
}

fn lex_hex_string(lex: &mut Lexer<Token>) -> Result<Vec<u8>> {
    let src = lex.remainder();
    for (i, ch) in src.char_indices() {
        if ch == '\'' {
            let hex = hex::decode(&src[..i])
                .map_err(|_| Error::InvalidHexString(lex.span()))?;
            lex.bump(i + 1);
            return Ok(hex);
        }
        if !ch.is_ascii_hexdigit() {
            return Err(Error::InvalidHexString(lex.span()));
        }
    }
    Err(Error::UnterminatedHexString(lex.span()))
}

fn lex_hex_binary_regex(lex: &mut Lexer<Token>) -> Result<String> {
    let src = lex.remainder();
    let mut escape = false;
    for (i, ch) in src.char_indices() {
        match (ch, escape) {
            ('\\', false) => escape = true,
            ('/', false) => {
                let body = src[..i].to_owned();
                let mut consumed = i + 1;
                if src[consumed..].starts_with('\'') {
                    consumed += 1;
                } else {
                    return Err(Error::UnterminatedHexString(lex.span()));
                }
                lex.bump(consumed);
                return regex::bytes::Regex::new(&body)
                    .map(|_| body)
                    .map_err(|_| Error::InvalidRegex(lex.span()));
            }
            _ => escape = false,
        }
    }
    Err(Error::UnterminatedRegex(lex.span()))
}

fn lex_digest_quoted(lex: &mut Lexer<Token>) -> Result<Vec<u8>> {
    let src = lex.remainder();
    for (i, ch) in src.char_indices() {
        if ch == '\'' {
            let bytes = hex::decode(&src[..i])
                .map_err(|_| Error::InvalidDigestPattern(lex.span()))?;
            lex.bump(i + 1);
            if bytes.is_empty() || bytes.len() > 32 {
                return Err(Error::InvalidDigestPattern(lex.span()));
            }
            return Ok(bytes);
        }
        if !ch.is_ascii_hexdigit() {
            return Err(Error::InvalidDigestPattern(lex.span()));
        }
    }
    Err(Error::UnterminatedDigestQuoted(lex.span()))
}

fn lex_date_quoted(lex: &mut Lexer<Token>) -> Result<String> {
    let src = lex.remainder();
    for (i, ch) in src.char_indices() {
        if ch == '\'' {
            let iso = src[..i].to_owned();
            lex.bump(i + 1);
            return Ok(iso);
        }
    }
    Err(Error::UnterminatedDateQuoted(lex.span()))
}

fn lex_single_quoted(lex: &mut Lexer<Token>) -> Result<String> {
    let src = lex.remainder();
    for (i, ch) in src.char_indices() {
        if ch == '\'' {
            let content = src[..i].to_owned();
            lex.bump(i + 1);
            return Ok(content);
        }
    }
    Err(Error::UnexpectedEndOfInput)
}

fn lex_group_name(lex: &mut Lexer<Token>) -> Result<String> {
    let name = &lex.slice()[1..];
    let valid = !name.is_empty()
        && name.chars().enumerate().all(|(i, ch)| {
            if i == 0 {
                ch.is_ascii_alphabetic() || ch == '_'
            } else {
                ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
            }
        });
    if valid {
        Ok(name.to_string())
    } else {
        Err(Error::InvalidCaptureGroupName(name.to_string(), lex.span()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(Token::lexer("bool").next(), Some(Ok(Token::Bool)));
        assert_eq!(Token::lexer("true").next(), Some(Ok(Token::True)));
        assert_eq!(Token::lexer("array").next(), Some(Ok(Token::Array)));
        assert_eq!(Token::lexer("tagged").next(), Some(Ok(Token::Tagged)));
        assert_eq!(Token::lexer("NaN").next(), Some(Ok(Token::NaN)));
        assert_eq!(
            Token::lexer("-Infinity").next(),
            Some(Ok(Token::NegInfinity))
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(Token::lexer("|").next(), Some(Ok(Token::Or)));
        assert_eq!(Token::lexer("*?").next(), Some(Ok(Token::StarLazy)));
        assert_eq!(Token::lexer("*").next(), Some(Ok(Token::Star)));
        assert_eq!(Token::lexer("...").next(), Some(Ok(Token::Ellipsis)));
        assert_eq!(Token::lexer("..").next(), Some(Ok(Token::DotDot)));
    }

    #[test]
    fn test_number_literal() {
        assert_eq!(
            Token::lexer("42").next(),
            Some(Ok(Token::NumberLiteral(42.0)))
        );
        assert_eq!(
            Token::lexer("-3.5").next(),
            Some(Ok(Token::NumberLiteral(-3.5)))
        );
    }

    #[test]
    fn test_brace_as_range() {
        assert_eq!(
            Token::lexer("{1,5}").next(),
            Some(Ok(Token::BraceOpen(Some(Quantifier::new(
                1..=5,
                Reluctance::Greedy
            )))))
        );
        assert_eq!(
            Token::lexer("{3,}?").next(),
            Some(Ok(Token::BraceOpen(Some(Quantifier::new(
                3..,
                Reluctance::Lazy
            )))))
        );
        assert_eq!(
            Token::lexer("{2}+").next(),
            Some(Ok(Token::BraceOpen(Some(Quantifier::new(
                2..=2,
                Reluctance::Possessive
            )))))
        );
    }

    #[test]
    fn test_brace_as_map_body() {
        let mut lexer = Token::lexer("{}");
        assert_eq!(lexer.next(), Some(Ok(Token::BraceOpen(None))));
        assert_eq!(lexer.next(), Some(Ok(Token::BraceClose)));

        let mut lexer = Token::lexer("{1: text}");
        assert_eq!(lexer.next(), Some(Ok(Token::BraceOpen(None))));
        assert_eq!(lexer.next(), Some(Ok(Token::NumberLiteral(1.0))));
        assert_eq!(lexer.next(), Some(Ok(Token::Colon)));
        assert_eq!(lexer.next(), Some(Ok(Token::Text)));
        assert_eq!(lexer.next(), Some(Ok(Token::BraceClose)));
    }

    #[test]
    fn test_string_literal() {
        let mut lexer = Token::lexer(r#""hello\nworld""#);
        assert_eq!(
            lexer.next(),
            Some(Ok(Token::StringLiteral(Ok("hello\nworld".to_string()))))
        );
    }

    #[test]
    fn test_regex_literal() {
        let mut lexer = Token::lexer("/[a-z]+/");
        assert_eq!(
            lexer.next(),
            Some(Ok(Token::RegexLiteral(Ok("[a-z]+".to_string()))))
        );
    }

    #[test]
    fn test_hex_string() {
        let mut lexer = Token::lexer("h'deadbeef'");
        assert_eq!(
            lexer.next(),
            Some(Ok(Token::HexString(Ok(vec![0xde, 0xad, 0xbe, 0xef]))))
        );
    }

    #[test]
    fn test_group_name() {
        let mut lexer = Token::lexer("@first");
        assert_eq!(
            lexer.next(),
            Some(Ok(Token::GroupName(Ok("first".into()))))
        );
    }

    #[test]
    fn test_known_value_quoted_forms() {
        let mut lexer = Token::lexer("'date'");
        assert_eq!(
            lexer.next(),
            Some(Ok(Token::SingleQuoted(Ok("date".into()))))
        );
    }
}
