//! Term and posting cursors consumed by field data loading.
//!
//! The inverted index lives elsewhere (segment readers in production, small
//! fixtures in tests); field data loading only needs to walk one field's
//! terms in dictionary order and stream each term's postings. These traits
//! are that boundary. Cursors are plain owned values: dropping one releases
//! whatever the source holds for it, on every exit path.

use crate::{DocId, Result};

/// Sentinel doc id returned by a drained posting cursor.
pub const TERMINATED: DocId = DocId::MAX;

/// A term surfaced during dictionary enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermRef<'a> {
    pub field: &'a str,
    pub text: &'a str,
}

/// Walks terms in lexicographic `(field, text)` order.
pub trait TermCursor {
    /// The term the cursor is positioned on, `None` once exhausted.
    fn term(&self) -> Option<TermRef<'_>>;

    /// Move to the next term. Returns false once the dictionary is exhausted.
    fn advance(&mut self) -> Result<bool>;
}

/// Streams the ascending doc ids of one term's posting list.
///
/// A cursor is unpositioned until the first `seek` and may be re-seeked to
/// any number of terms over its lifetime.
pub trait PostingCursor {
    /// Position on the posting list of `(field, text)`. Seeking to a term
    /// with no postings leaves the cursor drained.
    fn seek(&mut self, field: &str, text: &str) -> Result<()>;

    /// Next doc id, or [`TERMINATED`] when the list is drained.
    fn advance(&mut self) -> Result<DocId>;
}

/// One segment's read-only term/posting source.
///
/// A load acquires one cursor of each kind up front and holds them for the
/// whole scan. A source may be shared by concurrent loads over the same or
/// different fields as long as nothing mutates the underlying index mid-scan.
pub trait TermPostingSource {
    type Terms: TermCursor;
    type Postings: PostingCursor;

    /// Exclusive upper bound on doc ids in this segment.
    fn max_doc(&self) -> DocId;

    /// Term cursor positioned at the first term of `field`, or at the
    /// nearest following term when the field has none.
    fn terms(&self, field: &str) -> Result<Self::Terms>;

    /// Posting cursor, unpositioned until the first seek.
    fn postings(&self) -> Result<Self::Postings>;
}
