//! Deferred concatenation of streamed text fragments.

/// Pending text for one (output index, field) pair.
///
/// Fragments are only collected while streaming; the backing string in the response is
/// left untouched until someone reads the text. Reading flushes all pending fragments in
/// arrival order and returns the buffer to [`TextBuffer::Synced`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TextBuffer {
    #[default]
    Synced,
    Dirty(Vec<String>),
}

impl TextBuffer {
    /// Queue a fragment. Empty fragments are dropped.
    pub fn push(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        match self {
            TextBuffer::Synced => *self = TextBuffer::Dirty(vec![fragment.to_string()]),
            TextBuffer::Dirty(parts) => parts.push(fragment.to_string()),
        }
    }

    /// Append every pending fragment to `target`. Returns true if anything was written.
    pub fn flush_into(&mut self, target: &mut String) -> bool {
        match std::mem::take(self) {
            TextBuffer::Synced => false,
            TextBuffer::Dirty(parts) => {
                target.reserve(parts.iter().map(String::len).sum());
                for part in &parts {
                    target.push_str(part);
                }
                true
            }
        }
    }

    /// Pending fragments, oldest first.
    pub fn pending(&self) -> &[String] {
        match self {
            TextBuffer::Synced => &[],
            TextBuffer::Dirty(parts) => parts,
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, TextBuffer::Synced)
    }
}

/// The three streamed text fields of one output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct OutputBuffers {
    pub content: TextBuffer,
    pub reasoning: TextBuffer,
    pub encrypted: TextBuffer,
}

impl OutputBuffers {
    pub fn is_synced(&self) -> bool {
        self.content.is_synced() && self.reasoning.is_synced() && self.encrypted.is_synced()
    }
}
