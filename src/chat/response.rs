//! Completion result accumulator.
//!
//! A [`Response`] wraps a [`CompletionResponse`] and exposes either one output ("choice")
//! or, in wildcard mode, all of them. Streamed text is not concatenated on ingestion:
//! fragments are parked in a `TextBuffer` per index and field, and only folded into the
//! backing strings when a text accessor (or [`Response::proto`]) is called. Reading the
//! text after every chunk therefore stays linear in the total text length.

use super::buffer::OutputBuffers;
use crate::error::ErrorContext;
use crate::types::{
    CompletionChunk, CompletionOutput, CompletionResponse, FinishReason, LogProb, Role, ToolCall,
    Usage,
};
use crate::{Error, Result};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Response {
    proto: CompletionResponse,
    /// Output this accumulator is bound to; `None` exposes every output.
    index: Option<u32>,
    buffers: BTreeMap<u32, OutputBuffers>,
}

impl Response {
    /// Wrap a complete response.
    ///
    /// With `Some(index)` exactly one output must carry that index. With `None` the output
    /// indices must be unique.
    pub fn new(proto: CompletionResponse, index: Option<u32>) -> Result<Self> {
        match index {
            Some(i) => {
                let count = proto.outputs.iter().filter(|o| o.index == i).count();
                if count == 0 {
                    return Err(Error::invalid_response_with_context(
                        format!("no output with index {}", i),
                        ErrorContext::new()
                            .with_field_path("outputs")
                            .with_details(format!("{} outputs present", proto.outputs.len()))
                            .with_source("response"),
                    ));
                }
                if count > 1 {
                    return Err(Error::AmbiguousResponse {
                        index: i.to_string(),
                        count,
                    });
                }
            }
            None => {
                let mut seen = BTreeMap::new();
                for out in &proto.outputs {
                    *seen.entry(out.index).or_insert(0usize) += 1;
                }
                if let Some((i, count)) = seen.into_iter().find(|(_, c)| *c > 1) {
                    return Err(Error::AmbiguousResponse {
                        index: i.to_string(),
                        count,
                    });
                }
            }
        }
        Ok(Self {
            proto,
            index,
            buffers: BTreeMap::new(),
        })
    }

    /// Empty accumulator with outputs `0..n`, ready for streaming.
    pub fn empty(n: u32, index: Option<u32>) -> Result<Self> {
        if let Some(i) = index {
            if i >= n {
                return Err(Error::validation_with_context(
                    format!("index {} out of range for {} outputs", i, n),
                    ErrorContext::new()
                        .with_field_path("index")
                        .with_source("response"),
                ));
            }
        }
        Ok(Self {
            proto: CompletionResponse::with_outputs(n),
            index,
            buffers: BTreeMap::new(),
        })
    }

    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// Ingest one streaming chunk.
    ///
    /// Text fragments are buffered; everything else is merged into the backing response
    /// immediately.
    pub fn process_chunk(&mut self, chunk: &CompletionChunk) {
        if !chunk.id.is_empty() {
            self.proto.id.clone_from(&chunk.id);
        }
        if !chunk.model.is_empty() {
            self.proto.model.clone_from(&chunk.model);
        }
        if !chunk.system_fingerprint.is_empty() {
            self.proto
                .system_fingerprint
                .clone_from(&chunk.system_fingerprint);
        }
        if chunk.created.is_some() {
            self.proto.created = chunk.created;
        }
        if let Some(usage) = &chunk.usage {
            self.proto.usage = usage.clone();
        }

        for oc in &chunk.outputs {
            if matches!(self.index, Some(i) if i != oc.index) {
                continue;
            }
            let out = output_slot(&mut self.proto.outputs, oc.index);
            if let Some(role) = oc.delta.role {
                out.message.role = role;
            }
            if let Some(reason) = oc.finish_reason {
                out.finish_reason = reason;
            }
            out.message
                .tool_calls
                .extend(oc.delta.tool_calls.iter().cloned());
            out.citations.extend(oc.citations.iter().cloned());
            if let Some(lp) = &oc.logprobs {
                out.logprobs
                    .get_or_insert_with(Default::default)
                    .content
                    .extend(lp.content.iter().cloned());
            }

            let bufs = self.buffers.entry(oc.index).or_default();
            bufs.content.push(&oc.delta.content);
            bufs.reasoning.push(&oc.delta.reasoning_content);
            bufs.encrypted.push(&oc.delta.encrypted_content);
        }
    }

    /// Fold pending fragments of every relevant index into the backing response.
    fn sync(&mut self) {
        let only = self.index;
        for (idx, bufs) in self.buffers.iter_mut() {
            if bufs.is_synced() || matches!(only, Some(i) if i != *idx) {
                continue;
            }
            if let Some(out) = self.proto.outputs.iter_mut().find(|o| o.index == *idx) {
                bufs.content.flush_into(&mut out.message.content);
                bufs.reasoning.flush_into(&mut out.message.reasoning_content);
                bufs.encrypted.flush_into(&mut out.message.encrypted_content);
            }
        }
    }

    fn sync_index(&mut self, index: u32) {
        if let Some(bufs) = self.buffers.get_mut(&index) {
            if bufs.is_synced() {
                return;
            }
            if let Some(out) = self.proto.outputs.iter_mut().find(|o| o.index == index) {
                bufs.content.flush_into(&mut out.message.content);
                bufs.reasoning.flush_into(&mut out.message.reasoning_content);
                bufs.encrypted.flush_into(&mut out.message.encrypted_content);
            }
        }
    }

    /// Outputs exposed by this accumulator. Wildcard mode keeps only assistant outputs.
    fn selected(&self) -> impl Iterator<Item = &CompletionOutput> {
        let index = self.index;
        self.proto.outputs.iter().filter(move |o| match index {
            Some(i) => o.index == i,
            None => o.message.role == Role::Assistant,
        })
    }

    fn output_at(&self, index: u32) -> Result<&CompletionOutput> {
        self.proto
            .outputs
            .iter()
            .find(|o| o.index == index)
            .ok_or_else(|| {
                Error::invalid_response_with_context(
                    format!("no output with index {}", index),
                    ErrorContext::new()
                        .with_field_path("outputs")
                        .with_source("response"),
                )
            })
    }

    fn joined<'a>(&'a self, field: fn(&'a CompletionOutput) -> &'a str) -> Cow<'a, str> {
        let mut parts = self.selected().map(field);
        match (parts.next(), parts.next()) {
            (None, _) => Cow::Borrowed(""),
            (Some(only), None) => Cow::Borrowed(only),
            (Some(first), Some(second)) => {
                let mut s = String::from(first);
                s.push_str(second);
                parts.for_each(|p| s.push_str(p));
                Cow::Owned(s)
            }
        }
    }

    /// Text generated so far.
    pub fn content(&mut self) -> Cow<'_, str> {
        self.sync();
        self.joined(|o| o.message.content.as_str())
    }

    pub fn reasoning_content(&mut self) -> Cow<'_, str> {
        self.sync();
        self.joined(|o| o.message.reasoning_content.as_str())
    }

    pub fn encrypted_content(&mut self) -> Cow<'_, str> {
        self.sync();
        self.joined(|o| o.message.encrypted_content.as_str())
    }

    pub fn content_at(&mut self, index: u32) -> Result<&str> {
        self.sync_index(index);
        Ok(self.output_at(index)?.message.content.as_str())
    }

    pub fn reasoning_content_at(&mut self, index: u32) -> Result<&str> {
        self.sync_index(index);
        Ok(self.output_at(index)?.message.reasoning_content.as_str())
    }

    pub fn encrypted_content_at(&mut self, index: u32) -> Result<&str> {
        self.sync_index(index);
        Ok(self.output_at(index)?.message.encrypted_content.as_str())
    }

    pub fn id(&self) -> &str {
        &self.proto.id
    }

    pub fn model(&self) -> &str {
        &self.proto.model
    }

    /// Creation time in seconds since the Unix epoch.
    pub fn created(&self) -> Option<i64> {
        self.proto.created
    }

    pub fn system_fingerprint(&self) -> &str {
        &self.proto.system_fingerprint
    }

    pub fn usage(&self) -> &Usage {
        &self.proto.usage
    }

    pub fn role(&self) -> Role {
        match self.index {
            Some(i) => self
                .output_at(i)
                .map(|o| o.message.role)
                .unwrap_or_default(),
            None if self.selected().next().is_some() => Role::Assistant,
            None => Role::Unspecified,
        }
    }

    /// Finish reason of the exposed output.
    ///
    /// In wildcard mode all assistant outputs must agree; conflicting reasons yield
    /// [`Error::AmbiguousResponse`]. Use [`Response::finish_reason_at`] for per-choice status.
    pub fn finish_reason(&self) -> Result<FinishReason> {
        let mut reasons: Vec<FinishReason> = self.selected().map(|o| o.finish_reason).collect();
        reasons.sort_by_key(|r| *r as u8);
        reasons.dedup();
        match reasons.as_slice() {
            [] => Ok(FinishReason::Unspecified),
            [only] => Ok(*only),
            many => Err(Error::AmbiguousResponse {
                index: "*".to_string(),
                count: many.len(),
            }),
        }
    }

    pub fn finish_reason_at(&self, index: u32) -> Result<FinishReason> {
        Ok(self.output_at(index)?.finish_reason)
    }

    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.selected()
            .flat_map(|o| o.message.tool_calls.iter())
            .collect()
    }

    pub fn citations(&self) -> Vec<&str> {
        self.selected()
            .flat_map(|o| o.citations.iter().map(String::as_str))
            .collect()
    }

    pub fn logprobs(&self) -> Vec<&LogProb> {
        self.selected()
            .filter_map(|o| o.logprobs.as_ref())
            .flat_map(|lp| lp.content.iter())
            .collect()
    }

    /// Whether every exposed output has reported a terminal finish reason.
    pub fn is_finished(&self) -> bool {
        let mut outputs = self.selected().peekable();
        outputs.peek().is_some() && outputs.all(|o| o.finish_reason.is_terminal())
    }

    /// Number of text fragments waiting to be synced, across all indices.
    pub fn pending_fragments(&self) -> usize {
        self.buffers
            .values()
            .map(|b| b.content.pending().len() + b.reasoning.pending().len() + b.encrypted.pending().len())
            .sum()
    }

    /// Backing response with all text synced.
    pub fn proto(&mut self) -> &CompletionResponse {
        self.sync();
        &self.proto
    }

    pub fn into_proto(mut self) -> CompletionResponse {
        self.sync();
        self.proto
    }

    /// Split a complete response to an `n`-output request into one response per
    /// index `0..n`, in index order. Fails if any requested index is missing.
    pub fn split(proto: CompletionResponse, n: u32) -> Result<Vec<Response>> {
        let present = proto.outputs.len();
        let mut choices: BTreeMap<u32, Response> = Response::new(proto, None)?
            .into_choices()
            .into_iter()
            .filter_map(|choice| Some((choice.index?, choice)))
            .collect();
        (0..n)
            .map(|i| {
                choices.remove(&i).ok_or_else(|| {
                    Error::invalid_response_with_context(
                        format!("no output with index {}", i),
                        ErrorContext::new()
                            .with_field_path("outputs")
                            .with_details(format!("{} of {} outputs present", present, n))
                            .with_source("response"),
                    )
                })
            })
            .collect()
    }

    /// Split into one single-index response per output.
    pub fn into_choices(mut self) -> Vec<Response> {
        if self.index.is_some() {
            return vec![self];
        }
        self.sync();
        let CompletionResponse {
            id,
            outputs,
            created,
            model,
            system_fingerprint,
            usage,
        } = self.proto;
        outputs
            .into_iter()
            .map(|out| {
                let index = out.index;
                Response {
                    proto: CompletionResponse {
                        id: id.clone(),
                        outputs: vec![out],
                        created,
                        model: model.clone(),
                        system_fingerprint: system_fingerprint.clone(),
                        usage: usage.clone(),
                    },
                    index: Some(index),
                    buffers: BTreeMap::new(),
                }
            })
            .collect()
    }
}

/// Output with `index`, inserted in index order if it does not exist yet.
fn output_slot(outputs: &mut Vec<CompletionOutput>, index: u32) -> &mut CompletionOutput {
    let pos = match outputs.iter().position(|o| o.index == index) {
        Some(pos) => pos,
        None => {
            debug!(index, "creating output for unseen index");
            let pos = outputs
                .iter()
                .position(|o| o.index > index)
                .unwrap_or(outputs.len());
            outputs.insert(pos, CompletionOutput::new(index));
            pos
        }
    };
    &mut outputs[pos]
}
