//! Completion responses as delivered by the transport.

use serde::{Deserialize, Serialize};

/// Role of a message or of a completion output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Unspecified,
    User,
    Assistant,
    System,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Unspecified => "unspecified",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Tool => "tool",
        }
    }
}

/// Why the model stopped generating a given output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Still generating, or the server did not report a reason.
    #[default]
    Unspecified,
    MaxLen,
    MaxContext,
    ToolCalls,
    TimeLimit,
    Stop,
}

impl FinishReason {
    /// Whether this reason marks a finished output.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FinishReason::Unspecified)
    }
}

/// Token accounting for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub reasoning_tokens: u32,
    pub total_tokens: u32,
    pub prompt_text_tokens: u32,
    pub prompt_image_tokens: u32,
    pub cached_prompt_text_tokens: u32,
    pub num_sources_used: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments, exactly as produced by the model.
    #[serde(default)]
    pub arguments: String,
}

/// Tool invocation requested by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopLogProb {
    pub token: String,
    pub logprob: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogProb {
    pub token: String,
    pub logprob: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_logprobs: Vec<TopLogProb>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogProbs {
    #[serde(default)]
    pub content: Vec<LogProb>,
}

/// Finalized message of one output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionMessage {
    pub role: Role,
    pub content: String,
    pub reasoning_content: String,
    /// Opaque reasoning blob that can be replayed to the server.
    pub encrypted_content: String,
    pub tool_calls: Vec<ToolCall>,
}

/// One of the parallel outputs ("choices") of a completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionOutput {
    pub index: u32,
    pub finish_reason: FinishReason,
    pub message: CompletionMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<LogProbs>,
    pub citations: Vec<String>,
}

impl CompletionOutput {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }
}

/// Complete (non-streaming) completion response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionResponse {
    pub id: String,
    pub outputs: Vec<CompletionOutput>,
    /// Creation time in seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    pub model: String,
    pub system_fingerprint: String,
    pub usage: Usage,
}

impl CompletionResponse {
    /// Empty response with one default output per index in `0..n`.
    pub fn with_outputs(n: u32) -> Self {
        Self {
            outputs: (0..n).map(CompletionOutput::new).collect(),
            ..Default::default()
        }
    }
}
