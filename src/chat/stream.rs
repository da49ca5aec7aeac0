//! Streaming iteration over a completion.
//!
//! Every call to `next` pulls exactly one chunk from the transport, folds it into the
//! accumulator and hands back both the updated accumulator and a view of the chunk.
//! Dropping the stream (or breaking out of the loop) leaves the accumulator with whatever
//! was received so far; nothing is sent upstream.

use super::chunk::Chunk;
use super::response::Response;
use crate::types::CompletionChunk;
use crate::{BoxStream, Result};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn, Instrument, Span};

/// Pulls chunks from the transport and logs stream milestones.
struct ChunkSource {
    chunks: BoxStream<'static, CompletionChunk>,
    span: Span,
    started: Instant,
    received: usize,
    exhausted: bool,
}

impl ChunkSource {
    fn new(chunks: BoxStream<'static, CompletionChunk>, span: Span) -> Self {
        Self {
            chunks,
            span,
            started: Instant::now(),
            received: 0,
            exhausted: false,
        }
    }

    async fn pull(&mut self) -> Option<Result<Arc<CompletionChunk>>> {
        if self.exhausted {
            return None;
        }
        let span = self.span.clone();
        match self.chunks.next().instrument(span).await {
            Some(Ok(chunk)) => {
                self.received += 1;
                if self.received == 1 {
                    let _g = self.span.enter();
                    debug!(
                        first_chunk_ms = self.started.elapsed().as_millis() as u64,
                        "first chunk received"
                    );
                }
                Some(Ok(Arc::new(chunk)))
            }
            Some(Err(e)) => {
                let _g = self.span.enter();
                warn!(chunks = self.received, error = %e, "completion stream failed");
                Some(Err(e))
            }
            None => {
                self.exhausted = true;
                let _g = self.span.enter();
                info!(
                    chunks = self.received,
                    duration_ms = self.started.elapsed().as_millis() as u64,
                    "completion stream finished"
                );
                None
            }
        }
    }
}

/// Stream of a single completion output.
pub struct ResponseStream {
    source: ChunkSource,
    response: Response,
}

impl ResponseStream {
    pub fn new(chunks: BoxStream<'static, CompletionChunk>, response: Response, span: Span) -> Self {
        Self {
            source: ChunkSource::new(chunks, span),
            response,
        }
    }

    /// Ingest the next chunk. `None` once the transport stream has ended.
    pub async fn next(&mut self) -> Option<Result<(&mut Response, Chunk)>> {
        let chunk = match self.source.pull().await? {
            Ok(chunk) => chunk,
            Err(e) => return Some(Err(e)),
        };
        self.response.process_chunk(&chunk);
        let view = Chunk::new(chunk, self.response.index());
        Some(Ok((&mut self.response, view)))
    }

    /// Accumulator state so far.
    pub fn response(&mut self) -> &mut Response {
        &mut self.response
    }

    pub fn into_response(self) -> Response {
        self.response
    }

    /// Drain the remaining chunks and return the final accumulator.
    pub async fn collect_final(mut self) -> Result<Response> {
        while let Some(step) = self.next().await {
            step?;
        }
        Ok(self.response)
    }
}

/// Stream of `n` parallel outputs, one single-index accumulator per output.
///
/// Every accumulator ingests every chunk and keeps only its own index, so
/// `responses[i]` and `views[i]` always describe the same output.
pub struct BatchResponseStream {
    source: ChunkSource,
    responses: Vec<Response>,
}

impl BatchResponseStream {
    pub fn new(chunks: BoxStream<'static, CompletionChunk>, n: u32, span: Span) -> Result<Self> {
        let responses = (0..n)
            .map(|i| Response::empty(n, Some(i)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            source: ChunkSource::new(chunks, span),
            responses,
        })
    }

    /// Ingest the next chunk into all `n` accumulators; the returned vector has one
    /// view per output index, in the same order as the accumulators.
    pub async fn next(&mut self) -> Option<Result<(&mut [Response], Vec<Chunk>)>> {
        let chunk = match self.source.pull().await? {
            Ok(chunk) => chunk,
            Err(e) => return Some(Err(e)),
        };
        let views = self
            .responses
            .iter_mut()
            .map(|response| {
                response.process_chunk(&chunk);
                Chunk::new(chunk.clone(), response.index())
            })
            .collect();
        Some(Ok((self.responses.as_mut_slice(), views)))
    }

    pub fn n(&self) -> u32 {
        self.responses.len() as u32
    }

    /// Accumulators so far, indexed by output index.
    pub fn responses(&mut self) -> &mut [Response] {
        &mut self.responses
    }

    pub fn into_responses(self) -> Vec<Response> {
        self.responses
    }

    pub async fn collect_final(mut self) -> Result<Vec<Response>> {
        while let Some(step) = self.next().await {
            step?;
        }
        Ok(self.responses)
    }
}

impl std::fmt::Debug for ResponseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseStream")
            .field("received", &self.source.received)
            .field("response", &self.response)
            .finish()
    }
}

impl std::fmt::Debug for BatchResponseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchResponseStream")
            .field("received", &self.source.received)
            .field("responses", &self.responses)
            .finish()
    }
}
