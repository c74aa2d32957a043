//! Quill - field data construction for a segment-based search engine core
//!
//! This crate builds the per-document forward view of an indexed field from
//! the field's inverted postings, plus the small result types the
//! surrounding engine ships around:
//! - Single sequential scan over a field's terms and postings
//! - Dense 1-based term ordinals assigned in dictionary order
//! - Flat single-valued ordinal columns with one-time promotion to a jagged
//!   multi-valued shape when a document shows a second value
//! - Pluggable per-type builders deciding the final field data representation
//! - Range facet results with a compact wire codec and client JSON rendering
//! - Write acknowledgments and script-field bookkeeping for the fetch phase

pub mod error;
pub mod facet;
pub mod field_data;
pub mod response;
pub mod script_fields;

// Re-exports from field_data
pub use field_data::{
    ABSENT, FieldDataBuilder, OrdinalStorage, PostingCursor, ScanControl, TERMINATED, TermCursor,
    TermPostingSource, TermRef,
};

// Re-exports from facet
pub use facet::{RangeFacet, RangeFacetEntry};

// Re-exports from other modules
pub use error::{Error, Result};
pub use response::IndexResponse;
pub use script_fields::{ScriptField, ScriptFieldsContext};

pub type DocId = u32;
pub type Ordinal = u32;
