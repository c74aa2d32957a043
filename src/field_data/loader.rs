//! Forward-index construction: one scan over a field's terms and postings.
//!
//! Terms arrive in dictionary order and the n-th term of the field gets the
//! dense 1-based ordinal n. Each term's postings are drained into the
//! ordinal storage, which starts single-valued and promotes the first time a
//! document shows a second value. A caller-supplied builder observes the
//! term stream and turns the final storage into a concrete field data value.

use crate::{Ordinal, Result};

use super::ordinals::OrdinalStorage;
use super::source::{PostingCursor, TERMINATED, TermCursor, TermPostingSource};

/// Outcome of a [`FieldDataBuilder::collect_term`] call.
///
/// `Stop` is a cooperative signal, not a failure: the scan winds down and
/// the builder still receives its `finish` call with whatever accumulated.
/// A builder raises it e.g. once the term encoding can no longer match its
/// expected value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanControl {
    Continue,
    Stop,
}

/// Per-type strategy turning a scanned term stream into field data.
///
/// The loader drives the contract in a fixed order: `init` once, then
/// `collect_term` once per distinct term in dictionary order (the n-th call
/// corresponds to ordinal n), then `finish` exactly once with the final
/// storage in either shape. `finish` consumes the builder, so a spent
/// builder cannot leak into a second load.
pub trait FieldDataBuilder {
    /// Concrete field data value produced by `finish`.
    type FieldData;

    /// Called once before any term is seen. Resets accumulation state.
    fn init(&mut self) {}

    /// Called once per distinct term, before the term's postings are
    /// processed. Returning [`ScanControl::Stop`] ends the scan early.
    fn collect_term(&mut self, text: &str) -> ScanControl;

    /// Called exactly once after the scan ends, on every non-fatal path,
    /// including a field with zero terms (the storage is then an all-absent
    /// single-valued column).
    fn finish(self, field: &str, ordinals: OrdinalStorage) -> Self::FieldData;
}

/// Build field data for `field` in one pass over `source`.
///
/// The scan ends on the first term of another field, on dictionary
/// exhaustion, or on [`ScanControl::Stop`] from the builder; all three are
/// ordinary completion. Source I/O failures abort the load and propagate
/// after the cursors are released.
pub fn load<S, B>(source: &S, field: &str, mut builder: B) -> Result<B::FieldData>
where
    S: TermPostingSource,
    B: FieldDataBuilder,
{
    builder.init();

    let mut ordinals = OrdinalStorage::new(source.max_doc());

    // Both cursors live for the whole scan and drop on every exit path,
    // including error propagation below.
    let mut terms = source.terms(field)?;
    let mut postings = source.postings()?;

    let mut t: Ordinal = 0;
    let mut stopped = false;

    while let Some(term) = terms.term() {
        if term.field != field {
            break;
        }
        t += 1;
        if builder.collect_term(term.text) == ScanControl::Stop {
            stopped = true;
            break;
        }
        postings.seek(term.field, term.text)?;
        loop {
            let doc = postings.advance()?;
            if doc == TERMINATED {
                break;
            }
            ordinals.record(doc, t);
        }
        if !terms.advance()? {
            break;
        }
    }

    log::debug!(
        "[field_data] loaded {}: terms={}, multi={}{}",
        field,
        t,
        ordinals.is_multi_valued(),
        if stopped { " (stopped early)" } else { "" }
    );

    Ok(builder.finish(field, ordinals))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::io;
    use std::rc::Rc;

    use super::*;
    use super::super::source::TermRef;
    use crate::{DocId, Error};

    /// In-memory term/posting source with instrumented cursor release.
    #[derive(Default)]
    struct MemoryIndex {
        max_doc: DocId,
        terms: Rc<BTreeMap<(String, String), Vec<DocId>>>,
        term_cursor_drops: Rc<Cell<u32>>,
        posting_cursor_drops: Rc<Cell<u32>>,
        /// Posting advance fails when about to yield this doc id.
        fail_on_doc: Option<DocId>,
    }

    impl MemoryIndex {
        fn new(max_doc: DocId, terms: &[(&str, &str, &[DocId])]) -> Self {
            let map: BTreeMap<(String, String), Vec<DocId>> = terms
                .iter()
                .map(|&(field, text, docs)| ((field.to_string(), text.to_string()), docs.to_vec()))
                .collect();
            MemoryIndex {
                max_doc,
                terms: Rc::new(map),
                ..MemoryIndex::default()
            }
        }
    }

    struct MemoryTermCursor {
        entries: Vec<(String, String)>,
        pos: usize,
        drops: Rc<Cell<u32>>,
    }

    impl TermCursor for MemoryTermCursor {
        fn term(&self) -> Option<TermRef<'_>> {
            self.entries.get(self.pos).map(|(field, text)| TermRef {
                field,
                text,
            })
        }

        fn advance(&mut self) -> Result<bool> {
            self.pos += 1;
            Ok(self.pos < self.entries.len())
        }
    }

    impl Drop for MemoryTermCursor {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    struct MemoryPostingCursor {
        index: Rc<BTreeMap<(String, String), Vec<DocId>>>,
        current: Vec<DocId>,
        pos: usize,
        fail_on_doc: Option<DocId>,
        drops: Rc<Cell<u32>>,
    }

    impl PostingCursor for MemoryPostingCursor {
        fn seek(&mut self, field: &str, text: &str) -> Result<()> {
            self.current = self
                .index
                .get(&(field.to_string(), text.to_string()))
                .cloned()
                .unwrap_or_default();
            self.pos = 0;
            Ok(())
        }

        fn advance(&mut self) -> Result<DocId> {
            if self.pos >= self.current.len() {
                return Ok(TERMINATED);
            }
            let doc = self.current[self.pos];
            if self.fail_on_doc == Some(doc) {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::Other,
                    "posting read failed",
                )));
            }
            self.pos += 1;
            Ok(doc)
        }
    }

    impl Drop for MemoryPostingCursor {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    impl TermPostingSource for MemoryIndex {
        type Terms = MemoryTermCursor;
        type Postings = MemoryPostingCursor;

        fn max_doc(&self) -> DocId {
            self.max_doc
        }

        fn terms(&self, field: &str) -> Result<MemoryTermCursor> {
            let entries = self
                .terms
                .range((field.to_string(), String::new())..)
                .map(|((f, t), _)| (f.clone(), t.clone()))
                .collect();
            Ok(MemoryTermCursor {
                entries,
                pos: 0,
                drops: self.term_cursor_drops.clone(),
            })
        }

        fn postings(&self) -> Result<MemoryPostingCursor> {
            Ok(MemoryPostingCursor {
                index: self.terms.clone(),
                current: Vec::new(),
                pos: 0,
                fail_on_doc: self.fail_on_doc,
                drops: self.posting_cursor_drops.clone(),
            })
        }
    }

    /// Test builder collecting term texts verbatim.
    #[derive(Default)]
    struct StringValuesBuilder {
        terms: Vec<String>,
        inits: u32,
        /// Stop on the n-th collect_term call (1-based).
        stop_at: Option<usize>,
    }

    #[derive(Debug)]
    struct StringValues {
        field: String,
        terms: Vec<String>,
        ordinals: OrdinalStorage,
        inits: u32,
    }

    impl FieldDataBuilder for StringValuesBuilder {
        type FieldData = StringValues;

        fn init(&mut self) {
            self.inits += 1;
            self.terms.clear();
        }

        fn collect_term(&mut self, text: &str) -> ScanControl {
            self.terms.push(text.to_string());
            if self.stop_at == Some(self.terms.len()) {
                ScanControl::Stop
            } else {
                ScanControl::Continue
            }
        }

        fn finish(self, field: &str, ordinals: OrdinalStorage) -> StringValues {
            StringValues {
                field: field.to_string(),
                terms: self.terms,
                ordinals,
                inits: self.inits,
            }
        }
    }

    #[test]
    fn test_zero_terms() {
        let index = MemoryIndex::new(3, &[]);
        let data = load(&index, "title", StringValuesBuilder::default()).unwrap();

        assert_eq!(data.field, "title");
        assert_eq!(data.inits, 1);
        assert!(data.terms.is_empty());
        assert_eq!(data.ordinals, OrdinalStorage::Single(vec![0, 0, 0]));
    }

    #[test]
    fn test_zero_terms_other_fields_present() {
        let index = MemoryIndex::new(2, &[("body", "hello", &[0]), ("url", "x", &[1])]);
        let data = load(&index, "title", StringValuesBuilder::default()).unwrap();

        assert!(data.terms.is_empty());
        assert_eq!(data.ordinals, OrdinalStorage::Single(vec![0, 0]));
    }

    #[test]
    fn test_one_term_one_doc() {
        let index = MemoryIndex::new(3, &[("title", "hello", &[1])]);
        let data = load(&index, "title", StringValuesBuilder::default()).unwrap();

        assert_eq!(data.terms, ["hello"]);
        assert_eq!(data.ordinals, OrdinalStorage::Single(vec![0, 1, 0]));
    }

    #[test]
    fn test_promotion_on_second_value() {
        let index = MemoryIndex::new(3, &[("tag", "a", &[1]), ("tag", "b", &[1])]);
        let data = load(&index, "tag", StringValuesBuilder::default()).unwrap();

        assert_eq!(data.terms, ["a", "b"]);
        assert_eq!(
            data.ordinals,
            OrdinalStorage::Multi(vec![None, Some(vec![1, 2]), None])
        );
    }

    #[test]
    fn test_scan_stops_at_field_boundary() {
        let index = MemoryIndex::new(2, &[
            ("author", "kim", &[0]),
            ("tag", "a", &[0]),
            ("tag", "b", &[1]),
            ("title", "z", &[1]),
        ]);
        let data = load(&index, "tag", StringValuesBuilder::default()).unwrap();

        assert_eq!(data.terms, ["a", "b"]);
        assert_eq!(data.ordinals, OrdinalStorage::Single(vec![1, 2]));
    }

    #[test]
    fn test_ordinal_density() {
        // Postings scattered across docs; assigned ordinals must still be
        // exactly {1..T} with T = number of terms scanned.
        let index = MemoryIndex::new(5, &[
            ("tag", "a", &[4]),
            ("tag", "b", &[0, 2]),
            ("tag", "c", &[2]),
            ("tag", "d", &[1, 3, 4]),
        ]);
        let data = load(&index, "tag", StringValuesBuilder::default()).unwrap();

        assert_eq!(data.terms.len(), 4);
        let mut assigned: Vec<Ordinal> = (0..5)
            .flat_map(|doc| data.ordinals.ordinals(doc).to_vec())
            .collect();
        assigned.sort_unstable();
        assigned.dedup();
        assert_eq!(assigned, [1, 2, 3, 4]);
    }

    #[test]
    fn test_ordering_within_document() {
        let index = MemoryIndex::new(2, &[
            ("tag", "a", &[0, 1]),
            ("tag", "b", &[1]),
            ("tag", "c", &[0, 1]),
        ]);
        let data = load(&index, "tag", StringValuesBuilder::default()).unwrap();

        assert_eq!(data.ordinals.ordinals(0), &[1, 3]);
        assert_eq!(data.ordinals.ordinals(1), &[1, 2, 3]);
    }

    #[test]
    fn test_determinism() {
        let index = MemoryIndex::new(4, &[
            ("tag", "a", &[0, 3]),
            ("tag", "b", &[0]),
            ("tag", "c", &[1, 2, 3]),
        ]);
        let first = load(&index, "tag", StringValuesBuilder::default()).unwrap();
        let second = load(&index, "tag", StringValuesBuilder::default()).unwrap();

        assert_eq!(first.terms, second.terms);
        assert_eq!(first.ordinals, second.ordinals);
    }

    #[test]
    fn test_early_stop_keeps_prior_work() {
        let index = MemoryIndex::new(3, &[("tag", "a", &[0, 2]), ("tag", "b", &[1])]);
        let builder = StringValuesBuilder {
            stop_at: Some(2),
            ..StringValuesBuilder::default()
        };
        let data = load(&index, "tag", builder).unwrap();

        // The stopping term was observed but its postings never ran
        assert_eq!(data.terms, ["a", "b"]);
        assert_eq!(data.ordinals, OrdinalStorage::Single(vec![1, 0, 1]));
    }

    #[test]
    fn test_fatal_posting_failure_propagates() {
        let index = MemoryIndex {
            fail_on_doc: Some(2),
            ..MemoryIndex::new(3, &[("tag", "a", &[0, 2])])
        };
        let err = load(&index, "tag", StringValuesBuilder::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_cursors_released_once_on_success() {
        let index = MemoryIndex::new(3, &[("tag", "a", &[0])]);
        load(&index, "tag", StringValuesBuilder::default()).unwrap();

        assert_eq!(index.term_cursor_drops.get(), 1);
        assert_eq!(index.posting_cursor_drops.get(), 1);
    }

    #[test]
    fn test_cursors_released_once_on_early_stop() {
        let index = MemoryIndex::new(3, &[("tag", "a", &[0]), ("tag", "b", &[1])]);
        let builder = StringValuesBuilder {
            stop_at: Some(1),
            ..StringValuesBuilder::default()
        };
        load(&index, "tag", builder).unwrap();

        assert_eq!(index.term_cursor_drops.get(), 1);
        assert_eq!(index.posting_cursor_drops.get(), 1);
    }

    #[test]
    fn test_cursors_released_once_on_fatal_failure() {
        let index = MemoryIndex {
            fail_on_doc: Some(0),
            ..MemoryIndex::new(3, &[("tag", "a", &[0])])
        };
        assert!(load(&index, "tag", StringValuesBuilder::default()).is_err());

        assert_eq!(index.term_cursor_drops.get(), 1);
        assert_eq!(index.posting_cursor_drops.get(), 1);
    }
}
