//! A parser library for the [Conventional Commit] message convention.
//!
//! [conventional commit]: https://www.conventionalcommits.org
//!
//! A message is parsed into a typed/scoped header, a free-form body, the
//! trailing `token: value` footers, breaking-change notes, and any `#123`
//! issue references found in the subject. Malformed message content never
//! fails to parse; a header that does not match the grammar is left empty
//! (see [`Header::is_conventional`]).
//!
//! # Example
//!
//! ```rust
//! use conventional_commits_parser::{Commit, ConventionalCommit};
//! use indoc::indoc;
//!
//! let commit = Commit::from_message(indoc!("
//!     feat(parser)!: support scoped packages, see #42
//!
//!     Scopes may now contain any text, including parentheses.
//!
//!     BREAKING CHANGE: scoped lookups changed
//!     Reviewed-by: Jane Doe
//!     Closes #7
//! "));
//!
//! let parsed = ConventionalCommit::parse(&commit).unwrap();
//!
//! // You can access all components of the header.
//! assert_eq!(parsed.header().type_(), "feat");
//! assert_eq!(parsed.header().scope(), "parser");
//! assert_eq!(parsed.header().subject(), "support scoped packages, see #42");
//!
//! // And the free-form commit body.
//! assert!(parsed.body().starts_with("Scopes may now"));
//!
//! // A commit marked with a bang (`!`) OR carrying a "BREAKING CHANGE"
//! // footer is a breaking commit; each path leaves a note.
//! assert!(parsed.breaking());
//! assert_eq!(parsed.notes()[0].text(), "");
//! assert_eq!(parsed.notes()[1].text(), "scoped lookups changed");
//!
//! // Footers keep their message order, `token: value` and `token #value`
//! // alike.
//! assert_eq!(parsed.footers()[1].title(), "Reviewed-by");
//! assert_eq!(parsed.footers()[1].text(), "Jane Doe");
//! assert_eq!(parsed.footers()[2].title(), "Closes");
//! assert_eq!(parsed.footers()[2].text(), "7");
//!
//! // Issue references from the subject.
//! assert_eq!(parsed.issues()[0].token(), "#42");
//! assert_eq!(parsed.issues()[0].id(), "42");
//! ```

#![warn(missing_docs)]

mod commit;
mod error;
mod lines;
mod parser;

pub use commit::{Commit, ConventionalCommit, Footer, Header, Issue, Note};
pub use error::{Error, ErrorKind};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
pub struct ReadmeDoctests;
