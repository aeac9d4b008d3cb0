use dcbor::Date;
use dcbor::prelude::*;
use known_values::KnownValue;
use logos::{Logos, Span};

use super::Token;
use crate::{Error, Interval, Pattern, Quantifier, Reluctance, Result};

/// Parses a complete dCBOR pattern expression.
pub fn parse_pattern(input: impl AsRef<str>) -> Result<Pattern> {
    let input = input.as_ref();
    if input.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    parse_full_pattern(input)
}

/// Parses `src` as a standalone pattern, rejecting trailing garbage. Used
/// both at the top level and recursively for `tagged(...)`'s content region.
fn parse_full_pattern(src: &str) -> Result<Pattern> {
    let mut lexer = Token::lexer(src);
    let pattern = parse_or(&mut lexer)?;
    match lexer.next() {
        None => Ok(pattern),
        Some(Ok(_)) => Err(Error::ExtraData(lexer.span())),
        Some(Err(e)) => Err(e),
    }
}

fn parse_or(lexer: &mut logos::Lexer<Token>) -> Result<Pattern> {
    let mut branches = vec![parse_and(lexer)?];
    loop {
        let mut lookahead = lexer.clone();
        match lookahead.next() {
            Some(Ok(Token::Or)) => {
                *lexer = lookahead;
                branches.push(parse_and(lexer)?);
            }
            _ => break,
        }
    }
    if branches.len() == 1 { Ok(branches.remove(0)) } else { Ok(Pattern::or(branches)) }
}

fn parse_and(lexer: &mut logos::Lexer<Token>) -> Result<Pattern> {
    let mut branches = vec![parse_not(lexer)?];
    loop {
        let mut lookahead = lexer.clone();
        match lookahead.next() {
            Some(Ok(Token::And)) => {
                *lexer = lookahead;
                branches.push(parse_not(lexer)?);
            }
            _ => break,
        }
    }
    if branches.len() == 1 { Ok(branches.remove(0)) } else { Ok(Pattern::and(branches)) }
}

fn parse_not(lexer: &mut logos::Lexer<Token>) -> Result<Pattern> {
    let mut lookahead = lexer.clone();
    if let Some(Ok(Token::Not)) = lookahead.next() {
        *lexer = lookahead;
        let inner = parse_not(lexer)?;
        return Ok(Pattern::not_matching(inner));
    }

    let primary = parse_primary(lexer)?;
    match parse_quantifier(lexer) {
        Some(quantifier) => Ok(Pattern::repeat_quantifier(primary, quantifier)),
        None => Ok(primary),
    }
}

/// Looks for a trailing quantifier (`*`, `+`, `?`, or a `{...}` range, each
/// optionally suffixed `?`/`+` for laziness/possessiveness) after a primary.
/// Consumes it from `lexer` only when one is actually present.
fn parse_quantifier(lexer: &mut logos::Lexer<Token>) -> Option<Quantifier> {
    let mut lookahead = lexer.clone();
    let quantifier = match lookahead.next() {
        Some(Ok(Token::Star)) => Quantifier::new(0.., Reluctance::Greedy),
        Some(Ok(Token::StarLazy)) => Quantifier::new(0.., Reluctance::Lazy),
        Some(Ok(Token::StarPossessive)) => {
            Quantifier::new(0.., Reluctance::Possessive)
        }
        Some(Ok(Token::Plus)) => Quantifier::new(1.., Reluctance::Greedy),
        Some(Ok(Token::PlusLazy)) => Quantifier::new(1.., Reluctance::Lazy),
        Some(Ok(Token::PlusPossessive)) => {
            Quantifier::new(1.., Reluctance::Possessive)
        }
        Some(Ok(Token::Question)) => Quantifier::new(0..=1, Reluctance::Greedy),
        Some(Ok(Token::QuestionLazy)) => Quantifier::new(0..=1, Reluctance::Lazy),
        Some(Ok(Token::QuestionPossessive)) => {
            Quantifier::new(0..=1, Reluctance::Possessive)
        }
        Some(Ok(Token::BraceOpen(Some(q)))) => q,
        _ => return None,
    };
    *lexer = lookahead;
    Some(quantifier)
}

fn quantifier_to_interval(quantifier: Quantifier) -> Interval {
    match quantifier.max() {
        Some(max) => Interval::new(quantifier.min()..=max),
        None => Interval::new(quantifier.min()..),
    }
}

fn expect_paren_open(lexer: &mut logos::Lexer<Token>) -> Result<()> {
    match lexer.next() {
        Some(Ok(Token::ParenOpen)) => Ok(()),
        Some(Ok(t)) => Err(Error::UnexpectedToken(Box::new(t), lexer.span())),
        Some(Err(e)) => Err(e),
        None => Err(Error::ExpectedOpenParen(lexer.span())),
    }
}

fn expect_paren_close(lexer: &mut logos::Lexer<Token>) -> Result<()> {
    match lexer.next() {
        Some(Ok(Token::ParenClose)) => Ok(()),
        Some(Ok(t)) => Err(Error::UnexpectedToken(Box::new(t), lexer.span())),
        Some(Err(e)) => Err(e),
        None => Err(Error::ExpectedCloseParen(lexer.span())),
    }
}

fn expect_bracket_close(lexer: &mut logos::Lexer<Token>) -> Result<()> {
    match lexer.next() {
        Some(Ok(Token::BracketClose)) => Ok(()),
        Some(Ok(t)) => Err(Error::UnexpectedToken(Box::new(t), lexer.span())),
        Some(Err(e)) => Err(e),
        None => Err(Error::ExpectedCloseBracket(lexer.span())),
    }
}

fn expect_brace_close(lexer: &mut logos::Lexer<Token>) -> Result<()> {
    match lexer.next() {
        Some(Ok(Token::BraceClose)) => Ok(()),
        Some(Ok(t)) => Err(Error::UnexpectedToken(Box::new(t), lexer.span())),
        Some(Err(e)) => Err(e),
        None => Err(Error::ExpectedCloseBrace(lexer.span())),
    }
}

fn expect_colon(lexer: &mut logos::Lexer<Token>) -> Result<()> {
    match lexer.next() {
        Some(Ok(Token::Colon)) => Ok(()),
        Some(Ok(t)) => Err(Error::UnexpectedToken(Box::new(t), lexer.span())),
        Some(Err(e)) => Err(e),
        None => Err(Error::ExpectedColon(lexer.span())),
    }
}

fn expect_number_literal(lexer: &mut logos::Lexer<Token>) -> Result<f64> {
    match lexer.next() {
        Some(Ok(Token::NumberLiteral(v))) => Ok(v),
        Some(Ok(t)) => Err(Error::UnexpectedToken(Box::new(t), lexer.span())),
        Some(Err(e)) => Err(e),
        None => Err(Error::ExpectedPattern(lexer.span())),
    }
}

fn parse_primary(lexer: &mut logos::Lexer<Token>) -> Result<Pattern> {
    let token = match lexer.next() {
        Some(Ok(tok)) => tok,
        Some(Err(e)) => return Err(e),
        None => return Err(Error::UnexpectedEndOfInput),
    };

    match token {
        Token::Bool => Ok(Pattern::any_bool()),
        Token::True => Ok(Pattern::bool(true)),
        Token::False => Ok(Pattern::bool(false)),
        Token::Null => Ok(Pattern::null()),

        Token::Number => Ok(Pattern::any_number()),
        Token::NumberLiteral(v) => parse_number_or_range(lexer, v),
        Token::GreaterThanOrEqual => {
            expect_number_literal(lexer).map(Pattern::number_greater_than_or_equal)
        }
        Token::LessThanOrEqual => {
            expect_number_literal(lexer).map(Pattern::number_less_than_or_equal)
        }
        Token::GreaterThan => {
            expect_number_literal(lexer).map(Pattern::number_greater_than)
        }
        Token::LessThan => {
            expect_number_literal(lexer).map(Pattern::number_less_than)
        }
        Token::NaN => Ok(Pattern::number_nan()),
        Token::Infinity => Ok(Pattern::number(f64::INFINITY)),
        Token::NegInfinity => Ok(Pattern::number(f64::NEG_INFINITY)),

        Token::Text => Ok(Pattern::any_text()),
        Token::StringLiteral(res) => Ok(Pattern::text(res?)),
        Token::RegexLiteral(res) => {
            let regex = regex::Regex::new(&res?)
                .map_err(|_| Error::InvalidRegex(lexer.span()))?;
            Ok(Pattern::text_regex(regex))
        }

        Token::Bytes => Ok(Pattern::any_byte_string()),
        Token::HexString(res) => Ok(Pattern::byte_string(res?)),
        Token::HexBinaryRegex(res) => {
            let regex = regex::bytes::Regex::new(&res?)
                .map_err(|_| Error::InvalidRegex(lexer.span()))?;
            Ok(Pattern::byte_string_binary_regex(regex))
        }

        Token::Date => Ok(Pattern::any_date()),
        Token::DateQuoted(res) => {
            let content = res?;
            parse_date_quoted(lexer, content)
        }

        Token::Digest => Ok(Pattern::any_digest()),
        Token::DigestQuoted(res) => Ok(Pattern::digest_prefix(res?)),

        Token::Known => Ok(Pattern::any_known_value()),
        Token::SingleQuoted(res) => {
            let content = res?;
            parse_known_value_quoted(lexer, content)
        }

        Token::Array => Ok(Pattern::any_array()),
        Token::BracketOpen => parse_array_body(lexer),

        Token::Map => Ok(Pattern::any_map()),
        Token::BraceOpen(length) => parse_map_body(lexer, length),

        Token::Tagged => parse_tagged(lexer),

        Token::GroupName(res) => {
            let name = res?;
            expect_paren_open(lexer)?;
            let inner = parse_or(lexer)?;
            expect_paren_close(lexer)?;
            Ok(Pattern::capture(name, inner))
        }

        Token::Ellipsis => {
            expect_paren_open(lexer)?;
            let inner = parse_or(lexer)?;
            expect_paren_close(lexer)?;
            Ok(Pattern::search(inner))
        }

        Token::ParenOpen => {
            let inner = parse_or(lexer)?;
            expect_paren_close(lexer)?;
            Ok(inner)
        }

        Token::Star => Ok(Pattern::any()),

        t => Err(Error::UnexpectedToken(Box::new(t), lexer.span())),
    }
}

fn parse_number_or_range(
    lexer: &mut logos::Lexer<Token>,
    first: f64,
) -> Result<Pattern> {
    let mut lookahead = lexer.clone();
    if let Some(Ok(Token::DotDot)) = lookahead.next() {
        *lexer = lookahead;
        let second = expect_number_literal(lexer)?;
        return Ok(Pattern::number_range(first, second));
    }
    Ok(Pattern::number(first))
}

fn parse_date_quoted(
    lexer: &mut logos::Lexer<Token>,
    content: String,
) -> Result<Pattern> {
    let span = lexer.span();

    if content.len() >= 2 && content.starts_with('/') && content.ends_with('/') {
        let inner = &content[1..content.len() - 1];
        let regex = regex::Regex::new(inner)
            .map_err(|_| Error::InvalidRegex(span.clone()))?;
        return Ok(Pattern::date_regex(regex));
    }

    if let Some(dots) = content.find("..") {
        let left = &content[..dots];
        let right = &content[dots + 2..];
        return match (left.is_empty(), right.is_empty()) {
            (true, true) => Err(Error::InvalidDateFormat(span)),
            (false, true) => {
                let date = Date::from_string(left)
                    .map_err(|_| Error::InvalidDateFormat(span.clone()))?;
                Ok(Pattern::date_earliest(date))
            }
            (true, false) => {
                let date = Date::from_string(right)
                    .map_err(|_| Error::InvalidDateFormat(span.clone()))?;
                Ok(Pattern::date_latest(date))
            }
            (false, false) => {
                let min = Date::from_string(left)
                    .map_err(|_| Error::InvalidDateFormat(span.clone()))?;
                let max = Date::from_string(right)
                    .map_err(|_| Error::InvalidDateFormat(span.clone()))?;
                Ok(Pattern::date_range(min..=max))
            }
        };
    }

    match Date::from_string(&content) {
        Ok(date) => Ok(Pattern::date(date)),
        Err(_) => Ok(Pattern::date_iso8601(content)),
    }
}

fn parse_known_value_quoted(
    lexer: &mut logos::Lexer<Token>,
    content: String,
) -> Result<Pattern> {
    let span = lexer.span();

    if !content.is_empty() && content.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(value) = content.parse::<u64>() {
            return Ok(Pattern::known_value(KnownValue::new(value)));
        }
    }

    if content.len() >= 2 && content.starts_with('/') && content.ends_with('/') {
        let inner = &content[1..content.len() - 1];
        let regex =
            regex::Regex::new(inner).map_err(|_| Error::InvalidRegex(span))?;
        return Ok(Pattern::known_value_regex(regex));
    }

    Ok(Pattern::known_value_named(content))
}

fn parse_array_body(lexer: &mut logos::Lexer<Token>) -> Result<Pattern> {
    let mut lookahead = lexer.clone();
    match lookahead.next() {
        Some(Ok(Token::BracketClose)) => {
            *lexer = lookahead;
            return Ok(Pattern::array_with_length(Interval::new(0..=0)));
        }
        Some(Ok(Token::BraceOpen(Some(quantifier)))) => {
            *lexer = lookahead;
            expect_bracket_close(lexer)?;
            return Ok(Pattern::array_with_length(quantifier_to_interval(
                quantifier,
            )));
        }
        _ => {}
    }

    let mut elements = vec![parse_or(lexer)?];
    loop {
        let mut lookahead = lexer.clone();
        match lookahead.next() {
            Some(Ok(Token::Comma)) => {
                *lexer = lookahead;
                elements.push(parse_or(lexer)?);
            }
            _ => break,
        }
    }
    expect_bracket_close(lexer)?;

    if elements.len() == 1 {
        Ok(Pattern::array_with_elements(elements.remove(0)))
    } else {
        Ok(Pattern::array_with_elements(Pattern::sequence(elements)))
    }
}

fn parse_map_body(
    lexer: &mut logos::Lexer<Token>,
    length: Option<Quantifier>,
) -> Result<Pattern> {
    if let Some(quantifier) = length {
        return Ok(Pattern::map_with_length(quantifier_to_interval(quantifier)));
    }

    let mut lookahead = lexer.clone();
    if let Some(Ok(Token::BraceClose)) = lookahead.next() {
        *lexer = lookahead;
        return Ok(Pattern::map_with_constraints(vec![]));
    }

    let mut pairs = Vec::new();
    loop {
        let key = parse_or(lexer)?;
        expect_colon(lexer)?;
        let value = parse_or(lexer)?;
        pairs.push((key, value));

        let mut lookahead = lexer.clone();
        match lookahead.next() {
            Some(Ok(Token::Comma)) => *lexer = lookahead,
            _ => break,
        }
    }
    expect_brace_close(lexer)?;
    Ok(Pattern::map_with_constraints(pairs))
}

fn parse_tagged(lexer: &mut logos::Lexer<Token>) -> Result<Pattern> {
    let mut lookahead = lexer.clone();
    if !matches!(lookahead.next(), Some(Ok(Token::ParenOpen))) {
        return Ok(Pattern::any_tagged());
    }
    *lexer = lookahead;

    let base_offset = lexer.span().end;
    let src = lexer.remainder();
    let (comma_offset, close_offset) = scan_tagged_args(src, base_offset)?;

    let selector_str = src[..comma_offset].trim();
    let content_str = &src[comma_offset + 1..close_offset];
    let content_offset = base_offset + comma_offset + 1;
    let selector_span = base_offset..(base_offset + comma_offset);

    lexer.bump(close_offset + 1);

    let content = parse_full_pattern(content_str)
        .map_err(|e| offset_error(e, content_offset))?;

    if let Ok(value) = selector_str.parse::<u64>() {
        return Ok(Pattern::tagged_with_value(value, content));
    }
    if selector_str.len() >= 2
        && selector_str.starts_with('/')
        && selector_str.ends_with('/')
    {
        let inner = &selector_str[1..selector_str.len() - 1];
        let regex = regex::Regex::new(inner)
            .map_err(|_| Error::InvalidRegex(selector_span.clone()))?;
        return Ok(Pattern::tagged_with_regex(regex, content));
    }
    if !selector_str.is_empty() {
        return Ok(Pattern::tagged_with_name(selector_str.to_string(), content));
    }
    Err(Error::ExpectedPattern(selector_span))
}

/// Finds the top-level (paren-depth 0) comma separating a `tagged(...)`
/// selector from its content pattern, and the matching top-level closing
/// parenthesis, scanning raw text so that inner parentheses (including those
/// of a nested `tagged(...)`) are preserved. String/regex/hex-delimited
/// regions are skipped wholesale so that a `(` or `)` inside, say, a regex
/// body doesn't perturb the depth count. Offsets returned are relative to
/// `src`; `base_offset` is only used to produce correctly-positioned errors.
fn scan_tagged_args(src: &str, base_offset: usize) -> Result<(usize, usize)> {
    let bytes = src.as_bytes();
    let mut i = 0usize;
    let mut depth: i32 = 0;
    let mut comma: Option<usize> = None;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'/' => {
                let delim = bytes[i];
                i += 1;
                let mut escape = false;
                loop {
                    if i >= bytes.len() {
                        return Err(Error::ExpectedCloseParen(
                            (base_offset + src.len())..(base_offset + src.len()),
                        ));
                    }
                    let b = bytes[i];
                    i += 1;
                    if escape {
                        escape = false;
                    } else if b == b'\\' {
                        escape = true;
                    } else if b == delim {
                        break;
                    }
                }
            }
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                if depth == 0 {
                    let comma = comma.ok_or_else(|| {
                        Error::ExpectedPattern((base_offset + i)..(base_offset + i))
                    })?;
                    return Ok((comma, i));
                }
                depth -= 1;
                i += 1;
            }
            b',' => {
                if depth == 0 && comma.is_none() {
                    comma = Some(i);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    Err(Error::ExpectedCloseParen(
        (base_offset + src.len())..(base_offset + src.len()),
    ))
}

/// Shifts the span carried by a parse error that came from re-parsing a
/// sub-string (a `tagged(...)` content region) so it reads as an offset into
/// the original source rather than the sub-string.
fn offset_error(err: Error, offset: usize) -> Error {
    fn shift(span: &Span, offset: usize) -> Span {
        (span.start + offset)..(span.end + offset)
    }
    match &err {
        Error::ExtraData(s) => Error::ExtraData(shift(s, offset)),
        Error::UnexpectedToken(t, s) => {
            Error::UnexpectedToken(t.clone(), shift(s, offset))
        }
        Error::UnrecognizedToken(s) => Error::UnrecognizedToken(shift(s, offset)),
        Error::ExpectedOpenParen(s) => Error::ExpectedOpenParen(shift(s, offset)),
        Error::ExpectedCloseParen(s) => Error::ExpectedCloseParen(shift(s, offset)),
        Error::ExpectedCloseBracket(s) => {
            Error::ExpectedCloseBracket(shift(s, offset))
        }
        Error::ExpectedCloseBrace(s) => Error::ExpectedCloseBrace(shift(s, offset)),
        Error::ExpectedColon(s) => Error::ExpectedColon(shift(s, offset)),
        Error::ExpectedPattern(s) => Error::ExpectedPattern(shift(s, offset)),
        Error::UnmatchedParentheses(s) => {
            Error::UnmatchedParentheses(shift(s, offset))
        }
        Error::UnmatchedBraces(s) => Error::UnmatchedBraces(shift(s, offset)),
        Error::UnterminatedString(s) => Error::UnterminatedString(shift(s, offset)),
        Error::UnterminatedRegex(s) => Error::UnterminatedRegex(shift(s, offset)),
        Error::InvalidRegex(s) => Error::InvalidRegex(shift(s, offset)),
        Error::InvalidHexString(s) => Error::InvalidHexString(shift(s, offset)),
        Error::UnterminatedHexString(s) => {
            Error::UnterminatedHexString(shift(s, offset))
        }
        Error::InvalidNumberFormat(s) => Error::InvalidNumberFormat(shift(s, offset)),
        Error::InvalidRange(s) => Error::InvalidRange(shift(s, offset)),
        Error::InvalidDateFormat(s) => Error::InvalidDateFormat(shift(s, offset)),
        Error::UnterminatedDateQuoted(s) => {
            Error::UnterminatedDateQuoted(shift(s, offset))
        }
        Error::InvalidDigestPattern(s) => Error::InvalidDigestPattern(shift(s, offset)),
        Error::UnterminatedDigestQuoted(s) => {
            Error::UnterminatedDigestQuoted(shift(s, offset))
        }
        Error::InvalidCaptureGroupName(n, s) => {
            Error::InvalidCaptureGroupName(n.clone(), shift(s, offset))
        }
        _ => err,
    }
}
