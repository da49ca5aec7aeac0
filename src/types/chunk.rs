//! Streaming chunks (partial updates for one or more output indices).

use super::completion::{FinishReason, LogProbs, Role, ToolCall, Usage};
use serde::{Deserialize, Serialize};

/// Incremental change to a single output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub content: String,
    pub reasoning_content: String,
    pub encrypted_content: String,
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputChunk {
    pub index: u32,
    pub delta: Delta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<LogProbs>,
    pub citations: Vec<String>,
}

impl OutputChunk {
    /// Content-only chunk for `index`, mostly useful in tests and mocks.
    pub fn text(index: u32, content: impl Into<String>) -> Self {
        Self {
            index,
            delta: Delta {
                content: content.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.delta.role = Some(role);
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.delta.reasoning_content = reasoning.into();
        self
    }

    pub fn with_encrypted(mut self, encrypted: impl Into<String>) -> Self {
        self.delta.encrypted_content = encrypted.into();
        self
    }

    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = citations;
        self
    }
}

/// One message of a completion stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionChunk {
    pub id: String,
    pub outputs: Vec<OutputChunk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    pub model: String,
    pub system_fingerprint: String,
    /// Usage is only reported on some chunks (usually the last one).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl CompletionChunk {
    pub fn new(id: impl Into<String>, outputs: Vec<OutputChunk>) -> Self {
        Self {
            id: id.into(),
            outputs,
            ..Default::default()
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
