//! The conventional commit data model and parse operations.

use std::fmt;

use winnow::Parser as _;

use crate::parser;
use crate::{Error, ErrorKind};

/// The note title shared by the `!` marker and the breaking-change footer.
const BREAKING_CHANGE_TITLE: &str = "BREAKING CHANGE";

/// Footer titles that are mirrored into the note list.
const NOTE_KEYWORDS: &[&str] = &[BREAKING_CHANGE_TITLE];

/// A raw commit message, pre-split into lines.
///
/// Line 0 is the header; every following line belongs to the body/footer
/// remainder. How a message becomes lines is the caller's choice;
/// [`Commit::from_message`] applies the canonical policy (normalize `\r\n`
/// to `\n`, then split on `\n`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Commit {
    message_lines: Vec<String>,
}

impl Commit {
    /// Wrap pre-split message lines, verbatim.
    pub fn new(message_lines: Vec<String>) -> Self {
        Self { message_lines }
    }

    /// Split a raw message into lines.
    pub fn from_message(message: &str) -> Self {
        let message = message.replace("\r\n", "\n");
        Self::new(message.split('\n').map(str::to_owned).collect())
    }

    /// The message lines, header first.
    pub fn message_lines(&self) -> &[String] {
        &self.message_lines
    }
}

/// A parsed conventional commit.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConventionalCommit {
    header: Header,
    body: String,
    footers: Vec<Footer>,
    notes: Vec<Note>,
    issues: Vec<Issue>,
}

impl ConventionalCommit {
    /// Parse one commit message.
    ///
    /// Malformed content never fails: a header that does not match the
    /// grammar is left at its empty default (see
    /// [`Header::is_conventional`]) and a footer block without trailers
    /// yields no footers. The only error is a commit with no message lines
    /// at all.
    pub fn parse(commit: &Commit) -> Result<Self, Error> {
        let (header, remaining) = commit
            .message_lines()
            .split_first()
            .ok_or_else(|| Error::new(ErrorKind::EmptyCommit))?;

        let mut parsed = Self::default();
        if let Ok((ty, scope, breaking, subject)) = parser::header.parse(header.as_str()) {
            parsed.header = Header::new(ty, scope.unwrap_or(""), subject);
            if breaking {
                parsed.notes.push(Note::new(BREAKING_CHANGE_TITLE, ""));
            }
            for (token, id) in parser::issues(subject) {
                parsed.issues.push(Issue::new(token, id));
            }
        }

        let (body, footers) = parser::remainder(remaining);
        parsed.body = body;
        for (title, text) in footers {
            if NOTE_KEYWORDS.contains(&title.as_str()) {
                parsed.notes.push(Note::new(title.clone(), text.clone()));
            }
            parsed.footers.push(Footer::new(title, text));
        }
        Ok(parsed)
    }

    /// Parse a sequence of commits, preserving order.
    ///
    /// Fails fast on the first commit with no message lines.
    pub fn parse_all(commits: &[Commit]) -> Result<Vec<Self>, Error> {
        commits.iter().map(Self::parse).collect()
    }

    /// The parsed header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The free-form body, empty when the message has none.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// All footers, in message order, duplicates preserved.
    pub fn footers(&self) -> &[Footer] {
        &self.footers
    }

    /// All notes: marker-derived first, then footer-derived, in message
    /// order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Issue references found in the subject, left to right.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// A flag to signal that the commit contains breaking changes.
    ///
    /// Set either when the header carries an exclamation mark after the
    /// type and scope, e.g.:
    /// ```text
    /// feat(scope)!: this is a breaking change
    /// ```
    ///
    /// Or when the `BREAKING CHANGE: ` footer is present:
    /// ```text
    /// feat: my commit description
    ///
    /// BREAKING CHANGE: this is a breaking change
    /// ```
    pub fn breaking(&self) -> bool {
        !self.notes.is_empty()
    }
}

/// The parsed first line of a commit message.
///
/// A header line that failed to match the grammar keeps every field empty;
/// [`Header::is_conventional`] tells the two cases apart.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Header {
    ty: String,
    scope: String,
    subject: String,
}

impl Header {
    /// Piece together a header.
    pub fn new(
        ty: impl Into<String>,
        scope: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            ty: ty.into(),
            scope: scope.into(),
            subject: subject.into(),
        }
    }

    /// The commit type, verbatim and unvalidated against any list.
    pub fn type_(&self) -> &str {
        &self.ty
    }

    /// The scope, or the empty string when the header carries none.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The subject text after the `: ` separator, verbatim.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Whether the header line matched the conventional grammar.
    ///
    /// A matched header always has a non-empty type, so an empty type means
    /// the line degraded silently.
    pub fn is_conventional(&self) -> bool {
        !self.ty.is_empty()
    }
}

/// A single footer.
///
/// A footer is similar to a Git trailer, with the exception of not requiring
/// whitespace before newlines.
///
/// See: <https://git-scm.com/docs/git-interpret-trailers>
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Footer {
    title: String,
    text: String,
}

impl Footer {
    /// Piece together a footer.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// The trailer token, e.g. `Reviewed-by`.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The trimmed value; may span multiple message lines.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// A flag to signal that the footer describes a breaking change.
    pub fn breaking(&self) -> bool {
        self.title == BREAKING_CHANGE_TITLE
    }
}

impl fmt::Display for Footer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.text)
    }
}

/// A titled annotation extracted from the message.
///
/// The `!` marker yields a note with empty text; a `BREAKING CHANGE` footer
/// yields one carrying the footer's text.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Note {
    title: String,
    text: String,
}

impl Note {
    /// Piece together a note.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// The note title, e.g. `BREAKING CHANGE`.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The explanation; empty when derived from the `!` marker.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// An issue reference found in the subject, e.g. `#123`.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Issue {
    token: String,
    id: String,
}

impl Issue {
    /// Piece together an issue reference.
    pub fn new(token: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            id: id.into(),
        }
    }

    /// The full match, including the `#`.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The id as written, with no numeric conversion.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use indoc::indoc;
    #[cfg(feature = "serde")]
    use serde_test::Token;

    fn parse(message: &str) -> ConventionalCommit {
        ConventionalCommit::parse(&Commit::from_message(message)).unwrap()
    }

    #[test]
    fn test_valid_simple_commit() {
        let commit = parse("feat(parser): add support for scopes");

        assert_eq!(commit.header().type_(), "feat");
        assert_eq!(commit.header().scope(), "parser");
        assert_eq!(commit.header().subject(), "add support for scopes");
        assert!(commit.header().is_conventional());
        assert_eq!(commit.body(), "");
        assert!(commit.footers().is_empty());
        assert!(commit.notes().is_empty());
        assert!(commit.issues().is_empty());
    }

    #[test]
    fn test_breaking_marker() {
        let commit = parse("fix!: drop legacy API");

        assert_eq!(commit.header().type_(), "fix");
        assert_eq!(commit.header().scope(), "");
        assert_eq!(commit.header().subject(), "drop legacy API");
        assert!(commit.breaking());
        assert_eq!(commit.notes(), [Note::new("BREAKING CHANGE", "")]);
    }

    #[test]
    fn test_no_marker_no_note() {
        let commit = parse("fix: keep the legacy API");

        assert!(!commit.breaking());
        assert!(commit.notes().is_empty());
    }

    #[test]
    fn test_issue_references() {
        let commit = parse("fix: resolve #42 and #7");

        assert_eq!(
            commit.issues(),
            [Issue::new("#42", "42"), Issue::new("#7", "7")]
        );
    }

    #[test]
    fn test_header_mismatch_degrades() {
        let commit = parse("not a conventional header");

        assert!(!commit.header().is_conventional());
        assert_eq!(commit.header().type_(), "");
        assert_eq!(commit.header().scope(), "");
        assert_eq!(commit.header().subject(), "");
        assert!(commit.issues().is_empty());
    }

    #[test]
    fn test_degraded_header_keeps_footers() {
        let commit = parse(indoc!(
            "not a conventional header

            Reviewed-by: Jane Doe"
        ));

        assert!(!commit.header().is_conventional());
        assert_eq!(commit.footers(), [Footer::new("Reviewed-by", "Jane Doe")]);
    }

    #[test]
    fn test_trailing_whitespace_without_body() {
        let commit = parse("type(my scope): hello world\n\n\n");

        assert_eq!(commit.header().type_(), "type");
        assert_eq!(commit.header().scope(), "my scope");
        assert_eq!(commit.header().subject(), "hello world");
        assert_eq!(commit.body(), "");
        assert!(commit.footers().is_empty());
    }

    #[test]
    fn test_footers() {
        let commit = parse(indoc!(
            "fix: use the new parser

            Reviewed-by: Jane Doe
            Fixes #42"
        ));

        assert_eq!(
            commit.footers(),
            [
                Footer::new("Reviewed-by", "Jane Doe"),
                Footer::new("Fixes", "42"),
            ]
        );
    }

    #[test]
    fn test_duplicate_footers_preserved() {
        let commit = parse(indoc!(
            "fix: collect reviews

            Reviewed-by: Jane Doe
            Reviewed-by: John Doe"
        ));

        assert_eq!(
            commit.footers(),
            [
                Footer::new("Reviewed-by", "Jane Doe"),
                Footer::new("Reviewed-by", "John Doe"),
            ]
        );
    }

    #[test]
    fn test_multi_line_footer_value() {
        let commit = parse(indoc!(
            "fix: wrap long trailers

            Reviewed-by: Jane Doe
            and John Doe
            Fixes #1"
        ));

        assert_eq!(
            commit.footers(),
            [
                Footer::new("Reviewed-by", "Jane Doe\nand John Doe"),
                Footer::new("Fixes", "1"),
            ]
        );
    }

    #[test]
    fn test_breaking_change_footer_adds_note() {
        let commit = parse(indoc!(
            "feat: message

            BREAKING CHANGE: breaking change"
        ));

        assert_eq!(
            commit.footers(),
            [Footer::new("BREAKING CHANGE", "breaking change")]
        );
        assert!(commit.footers()[0].breaking());
        assert_eq!(
            commit.notes(),
            [Note::new("BREAKING CHANGE", "breaking change")]
        );
        assert!(commit.breaking());
    }

    #[test]
    fn test_marker_note_precedes_footer_note() {
        let commit = parse(indoc!(
            "feat!: message

            BREAKING CHANGE: the details"
        ));

        assert_eq!(
            commit.notes(),
            [
                Note::new("BREAKING CHANGE", ""),
                Note::new("BREAKING CHANGE", "the details"),
            ]
        );
    }

    #[test]
    fn test_hyphenated_breaking_is_plain_footer() {
        let commit = parse(indoc!(
            "fix: message

            BREAKING-CHANGE: it's broken"
        ));

        assert_eq!(
            commit.footers(),
            [Footer::new("BREAKING-CHANGE", "it's broken")]
        );
        assert!(commit.notes().is_empty());
        assert!(!commit.breaking());
    }

    #[test]
    fn test_valid_complex_commit() {
        let commit = parse(indoc!(
            "chore: improve changelog readability

            Change date notation from YYYY-MM-DD to YYYY.MM.DD to make it a tiny bit
            easier to parse while reading.

            BREAKING CHANGE: Just kidding!"
        ));

        assert_eq!(commit.header().type_(), "chore");
        assert_eq!(commit.header().scope(), "");
        assert_eq!(commit.header().subject(), "improve changelog readability");
        assert_eq!(
            commit.body(),
            indoc!(
                "Change date notation from YYYY-MM-DD to YYYY.MM.DD to make it a tiny bit
                easier to parse while reading."
            )
        );
        assert_eq!(commit.footers()[0].text(), "Just kidding!");
    }

    #[test]
    fn test_footers_without_blank_separator() {
        let commit = parse("fix: something\nFixes #42");

        assert_eq!(commit.body(), "");
        assert_eq!(commit.footers(), [Footer::new("Fixes", "42")]);
    }

    #[test]
    fn test_footer_display_reparses_to_itself() {
        let commit = parse(indoc!(
            "fix: something

            Reviewed-by: Jane Doe
            Fixes #42"
        ));

        for footer in commit.footers() {
            let alone = parse(&format!("fix: again\n\n{footer}"));
            assert_eq!(alone.footers(), [footer.clone()]);
        }
    }

    #[test]
    fn test_empty_commit_is_an_error() {
        let err = ConventionalCommit::parse(&Commit::new(vec![])).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::EmptyCommit);
    }

    #[test]
    fn test_crlf_messages_normalize() {
        let commit = parse("fix: something\r\n\r\nReviewed-by: Jane Doe");

        assert_eq!(commit.header().subject(), "something");
        assert_eq!(commit.footers(), [Footer::new("Reviewed-by", "Jane Doe")]);
    }

    #[test]
    fn test_parse_all_preserves_order() {
        let commits = [
            Commit::from_message("feat: first"),
            Commit::from_message("fix: second"),
        ];

        let parsed = ConventionalCommit::parse_all(&commits).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].header().subject(), "first");
        assert_eq!(parsed[1].header().subject(), "second");
    }

    #[test]
    fn test_parse_all_fails_fast_on_empty_commit() {
        let commits = [Commit::from_message("feat: fine"), Commit::new(vec![])];

        let err = ConventionalCommit::parse_all(&commits).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyCommit);
    }

    #[test]
    fn test_issue_display() {
        let commit = parse("fix: resolve #42");

        assert_eq!(commit.issues()[0].to_string(), "#42");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_commit_serialize() {
        let commit = parse("feat(parser): add support for scopes");
        serde_test::assert_ser_tokens(
            &commit,
            &[
                Token::Struct {
                    name: "ConventionalCommit",
                    len: 5,
                },
                Token::Str("header"),
                Token::Struct {
                    name: "Header",
                    len: 3,
                },
                Token::Str("ty"),
                Token::Str("feat"),
                Token::Str("scope"),
                Token::Str("parser"),
                Token::Str("subject"),
                Token::Str("add support for scopes"),
                Token::StructEnd,
                Token::Str("body"),
                Token::Str(""),
                Token::Str("footers"),
                Token::Seq { len: Some(0) },
                Token::SeqEnd,
                Token::Str("notes"),
                Token::Seq { len: Some(0) },
                Token::SeqEnd,
                Token::Str("issues"),
                Token::Seq { len: Some(0) },
                Token::SeqEnd,
                Token::StructEnd,
            ],
        );
    }
}
