//! Bookkeeping for script-computed fetch fields.
//!
//! A search request may ask for per-hit fields computed by a script instead
//! of stored values. The fetch phase accumulates the requested fields here;
//! the script value itself is opaque to the container.

/// One requested script field.
#[derive(Debug, Clone)]
pub struct ScriptField<S> {
    name: String,
    script: S,
    ignore_error: bool,
}

impl<S> ScriptField<S> {
    pub fn new(name: impl Into<String>, script: S, ignore_error: bool) -> Self {
        Self {
            name: name.into(),
            script,
            ignore_error,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn script(&self) -> &S {
        &self.script
    }

    /// Whether per-document evaluation failures are swallowed instead of
    /// failing the hit.
    pub fn ignore_error(&self) -> bool {
        self.ignore_error
    }
}

/// Script fields requested by one search, in request order.
#[derive(Debug, Clone)]
pub struct ScriptFieldsContext<S> {
    fields: Vec<ScriptField<S>>,
}

impl<S> ScriptFieldsContext<S> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn add(&mut self, field: ScriptField<S>) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[ScriptField<S>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S> Default for ScriptFieldsContext<S> {
    fn default() -> Self {
        Self::new()
    }
}
