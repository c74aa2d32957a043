//! Field data: per-document forward view of one indexed field.
//!
//! Queries that sort, facet or aggregate need doc -> value lookup, the
//! inverse of the term -> docs relation the inverted index stores. This
//! module builds that forward view in a single dictionary-order scan over a
//! field's terms and postings:
//!
//! - each term of the field gets a dense 1-based ordinal in enumeration order
//! - per-document storage starts as a flat single-valued column and promotes
//!   to a jagged multi-valued column the first time a document shows a
//!   second value
//! - a caller-supplied [`FieldDataBuilder`] observes the term stream and
//!   turns the final [`OrdinalStorage`] into a concrete field data value
//!
//! The inverted index itself is supplied by the caller through the
//! [`TermPostingSource`] boundary; this module never builds or mutates it.

mod loader;
mod ordinals;
mod source;

pub use loader::{FieldDataBuilder, ScanControl, load};
pub use ordinals::{ABSENT, OrdinalStorage};
pub use source::{PostingCursor, TERMINATED, TermCursor, TermPostingSource, TermRef};
