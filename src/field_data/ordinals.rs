//! Per-document ordinal storage for one field data load.
//!
//! Starts as a flat single-valued column and promotes to a jagged
//! multi-valued column the first time a document receives a second ordinal:
//!
//! ```text
//! Single: [0, 3, 1, 0]                              ordinal per doc, 0 = absent
//! Multi:  [None, Some([3, 7]), Some([1]), None]     row per doc, rows non-empty
//! ```
//!
//! Promotion happens at most once per load and is irreversible. It keeps
//! every ordinal recorded so far: each assigned single-valued slot is seeded
//! as a one-element row before the triggering ordinal is appended.

use crate::{DocId, Ordinal};

/// Ordinal reserved for documents without a value for the field.
pub const ABSENT: Ordinal = 0;

/// Evolving per-document ordinal column for one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrdinalStorage {
    /// One ordinal slot per document; [`ABSENT`] when the doc has no value.
    Single(Vec<Ordinal>),
    /// One optional ordinal row per document, in term-enumeration order.
    /// Present rows are never empty.
    Multi(Vec<Option<Vec<Ordinal>>>),
}

impl OrdinalStorage {
    /// All-absent single-valued storage covering `max_doc` documents.
    pub fn new(max_doc: DocId) -> Self {
        OrdinalStorage::Single(vec![ABSENT; max_doc as usize])
    }

    /// Number of documents this storage covers.
    pub fn max_doc(&self) -> DocId {
        match self {
            OrdinalStorage::Single(slots) => slots.len() as DocId,
            OrdinalStorage::Multi(rows) => rows.len() as DocId,
        }
    }

    /// Whether the storage has promoted to the multi-valued shape.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, OrdinalStorage::Multi(_))
    }

    /// Whether `doc` has at least one recorded ordinal.
    pub fn has_value(&self, doc: DocId) -> bool {
        !self.ordinals(doc).is_empty()
    }

    /// Ordinals recorded for `doc`, in the order their terms were scanned.
    /// Empty for absent documents and for doc ids past `max_doc`.
    pub fn ordinals(&self, doc: DocId) -> &[Ordinal] {
        match self {
            OrdinalStorage::Single(slots) => match slots.get(doc as usize) {
                Some(slot) if *slot != ABSENT => std::slice::from_ref(slot),
                _ => &[],
            },
            OrdinalStorage::Multi(rows) => rows
                .get(doc as usize)
                .and_then(|row| row.as_deref())
                .unwrap_or(&[]),
        }
    }

    /// Record `ordinal` for `doc` (must be below `max_doc`).
    ///
    /// The second ordinal recorded for any document triggers the one-time
    /// promotion to the multi-valued shape before the new ordinal lands.
    pub fn record(&mut self, doc: DocId, ordinal: Ordinal) {
        if let OrdinalStorage::Single(slots) = self {
            let slot = &mut slots[doc as usize];
            if *slot == ABSENT {
                *slot = ordinal;
                return;
            }
            self.promote();
        }
        if let OrdinalStorage::Multi(rows) = self {
            match &mut rows[doc as usize] {
                Some(row) => row.push(ordinal),
                slot @ None => *slot = Some(vec![ordinal]),
            }
        }
    }

    /// Switch to the multi-valued shape, seeding every assigned slot as a
    /// one-element row. No-op when already multi-valued.
    pub fn promote(&mut self) {
        if let OrdinalStorage::Single(slots) = self {
            let rows = slots
                .iter()
                .map(|&ord| if ord == ABSENT { None } else { Some(vec![ord]) })
                .collect();
            *self = OrdinalStorage::Multi(rows);
        }
    }
}
