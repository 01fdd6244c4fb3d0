//! Grammar productions for conventional commit messages.
//!
//! The header and footer token grammars are winnow parsers; the
//! boundary-sensitive pieces (the greedy scope close, issue references, the
//! body/footer split, footer value spans) are explicit scans, each a single
//! pass over its input.

use winnow::ascii::digit1;
use winnow::combinator::{alt, opt, preceded, trace};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{rest, take_while};

use crate::lines::LinesWithTerminator;

/// `(type, scope, breaking, subject)` as matched out of a header line.
pub(crate) type HeaderDetails<'a> = (&'a str, Option<&'a str>, bool, &'a str);

// <header>     ::= <type>, ["(", <scope>, ")"], ["!"], ": ", <subject>
pub(crate) fn header<'a>(i: &mut &'a str) -> ModalResult<HeaderDetails<'a>> {
    trace(
        "header",
        (
            type_,
            opt(scope),
            opt('!').map(|bang| bang.is_some()),
            ": ",
            subject,
        )
            .map(|(ty, scope, breaking, _, subject)| (ty, scope, breaking, subject)),
    )
    .parse_next(i)
}

// <type>       ::= (<word> | <whitespace>)+
fn type_<'a>(i: &mut &'a str) -> ModalResult<&'a str> {
    trace("type", take_while(1.., is_type_char)).parse_next(i)
}

fn is_type_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c.is_whitespace()
}

// <scope>      ::= "(", <any characters>, ")"
//
// The scope is greedy: it closes at the last ")" that still leaves a
// well-formed separator behind it, so "feat(a(b)c): x" scopes "a(b)c". Only
// the parens are consumed here; the "!" and ": " stay for `header`.
fn scope<'a>(i: &mut &'a str) -> ModalResult<&'a str> {
    trace("scope", |i: &mut &'a str| {
        let Some(inner) = i.strip_prefix('(') else {
            return Err(ErrMode::Backtrack(ContextError::new()));
        };
        for (at, _) in inner.char_indices().rev().filter(|(_, c)| *c == ')') {
            let after = &inner[at + 1..];
            if after.starts_with(": ") || after.starts_with("!: ") {
                *i = after;
                return Ok(&inner[..at]);
            }
        }
        Err(ErrMode::Backtrack(ContextError::new()))
    })
    .parse_next(i)
}

// <subject>    ::= <any characters>*
fn subject<'a>(i: &mut &'a str) -> ModalResult<&'a str> {
    trace("subject", rest).parse_next(i)
}

// <issue>      ::= "#", <digit>+
fn issue<'a>(i: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    trace(
        "issue",
        preceded('#', digit1)
            .with_taken()
            .map(|(id, token)| (token, id)),
    )
    .parse_next(i)
}

/// Scans a subject for issue references, yielding `(token, id)` pairs in
/// left-to-right order, duplicates included.
pub(crate) fn issues<'a>(subject: &'a str) -> Vec<(&'a str, &'a str)> {
    let mut found = Vec::new();
    let mut rest = subject;
    while let Some(at) = rest.find('#') {
        match issue.parse_peek(&rest[at..]) {
            Ok((remaining, reference)) => {
                found.push(reference);
                rest = remaining;
            }
            Err(_) => rest = &rest[at + 1..],
        }
    }
    found
}

// <token>      ::= "BREAKING CHANGE" | (<word> | "-")+
fn token<'a>(i: &mut &'a str) -> ModalResult<&'a str> {
    trace(
        "token",
        alt(("BREAKING CHANGE", take_while(1.., is_token_char))),
    )
    .parse_next(i)
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

// <separator>  ::= ": " | " #"
fn separator<'a>(i: &mut &'a str) -> ModalResult<&'a str> {
    trace("separator", alt((": ", " #"))).parse_next(i)
}

/// Scans a footer block for `<token><separator><value>` trailers.
///
/// A token only counts at the start of a line; each value runs from just
/// after its separator to the start of the next matched token (or the end of
/// the block) and is trimmed. Returns the byte offset of the first token,
/// which is the body/footer boundary inside the block, along with the
/// `(title, value)` pairs in document order.
pub(crate) fn footers(block: &str) -> (Option<usize>, Vec<(&str, &str)>) {
    let mut heads: Vec<(usize, usize, &str)> = Vec::new();
    for (start, line) in LinesWithTerminator::new(block) {
        if let Ok((after, (title, _sep))) = trace("footer", (token, separator)).parse_peek(line) {
            heads.push((start, start + line.len() - after.len(), title));
        }
    }

    let boundary = heads.first().map(|&(start, _, _)| start);
    let footers = heads
        .iter()
        .enumerate()
        .map(|(at, &(_, value_start, title))| {
            let value_end = heads.get(at + 1).map_or(block.len(), |&(next, _, _)| next);
            (title, block[value_start..value_end].trim())
        })
        .collect();
    (boundary, footers)
}

/// Splits the lines after the header into body text and parsed footers.
///
/// The footer block is the trailing run of lines after the last blank line
/// (the whole remainder when there is none); trailing blank lines never
/// count as the separator. Whatever prefix of the block matches no trailer
/// stays body text, so no input is ever dropped.
pub(crate) fn remainder(lines: &[String]) -> (String, Vec<(String, String)>) {
    let mut end = lines.len();
    while end > 0 && lines[end - 1].trim().is_empty() {
        end -= 1;
    }
    let lines = &lines[..end];

    let split = lines
        .iter()
        .rposition(|line| line.trim().is_empty())
        .map_or(0, |at| at + 1);
    let block = lines[split..].join("\n");
    let (boundary, matches) = footers(&block);

    let mut body = lines[..split].join("\n");
    let stray = &block[..boundary.unwrap_or(block.len())];
    if !stray.trim().is_empty() {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(stray);
    }
    let body = body.trim().to_owned();

    let matches = matches
        .into_iter()
        .map(|(title, text)| (title.to_owned(), text.to_owned()))
        .collect();
    (body, matches)
}
