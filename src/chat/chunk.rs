//! Read-only view over one streaming chunk.

use crate::types::{CompletionChunk, FinishReason, OutputChunk, Role, ToolCall};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A chunk as seen by one consumer, bound to one output index or to all of them.
///
/// Cheap to clone; batch streams hand out one view per index over the same chunk.
#[derive(Debug, Clone)]
pub struct Chunk {
    proto: Arc<CompletionChunk>,
    index: Option<u32>,
}

impl Chunk {
    pub fn new(proto: Arc<CompletionChunk>, index: Option<u32>) -> Self {
        Self { proto, index }
    }

    pub fn proto(&self) -> &CompletionChunk {
        &self.proto
    }

    pub fn index(&self) -> Option<u32> {
        self.index
    }

    pub fn id(&self) -> &str {
        &self.proto.id
    }

    /// Output chunks relevant to this view.
    pub fn outputs(&self) -> impl Iterator<Item = &OutputChunk> {
        let index = self.index;
        self.proto
            .outputs
            .iter()
            .filter(move |o| index.map_or(true, |i| o.index == i))
    }

    fn joined<'a>(&'a self, field: fn(&'a OutputChunk) -> &'a str) -> Cow<'a, str> {
        let parts: Vec<&str> = self.outputs().map(field).filter(|s| !s.is_empty()).collect();
        match parts.as_slice() {
            [] => Cow::Borrowed(""),
            [only] => Cow::Borrowed(*only),
            _ => Cow::Owned(parts.concat()),
        }
    }

    pub fn content(&self) -> Cow<'_, str> {
        self.joined(|o| o.delta.content.as_str())
    }

    pub fn reasoning_content(&self) -> Cow<'_, str> {
        self.joined(|o| o.delta.reasoning_content.as_str())
    }

    pub fn encrypted_content(&self) -> Cow<'_, str> {
        self.joined(|o| o.delta.encrypted_content.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.outputs().find_map(|o| o.delta.role)
    }

    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.outputs().flat_map(|o| o.delta.tool_calls.iter()).collect()
    }

    pub fn citations(&self) -> Vec<&str> {
        self.outputs()
            .flat_map(|o| o.citations.iter().map(String::as_str))
            .collect()
    }

    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.outputs().find_map(|o| o.finish_reason)
    }

    /// True if the view carries no output for its index.
    pub fn is_empty(&self) -> bool {
        self.outputs().next().is_none()
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content())
    }
}
