//! Per-connection movie replay.
//!
//! Every streaming connection gets its own replay task. The task walks the
//! shared [`Movie`] from the requested offset, hands each frame to an
//! [`EventSink`] and sleeps for the frame's delay. Event ids restart at 1
//! for every connection.

use asciimation_movie::Movie;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A frame ready to go out on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameEvent {
    /// Position in this connection's replay, starting at 1.
    pub id: usize,
    /// Serialized frame message.
    pub data: Arc<str>,
}

/// The receiving side of a sink has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("event sink closed")]
pub struct SinkClosed;

/// Destination for replayed frames.
#[async_trait]
pub trait EventSink: Send {
    async fn send(&mut self, event: FrameEvent) -> Result<(), SinkClosed>;
}

/// How a replay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Every frame from the offset was sent.
    Completed { sent: usize },
    /// The client disconnected.
    Disconnected { sent: usize },
    /// The server is shutting down.
    Interrupted { sent: usize },
}

impl ReplayOutcome {
    pub fn sent(&self) -> usize {
        match *self {
            Self::Completed { sent } | Self::Disconnected { sent } | Self::Interrupted { sent } => {
                sent
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::Disconnected { .. } => "disconnected",
            Self::Interrupted { .. } => "interrupted",
        }
    }
}

impl fmt::Display for ReplayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} after {} frames", self.label(), self.sent())
    }
}

/// Replay `movie` from `start` into `sink`, honoring frame delays.
///
/// Stops at the first failed send or when `shutdown` is cancelled.
pub async fn replay<S>(
    movie: &Movie,
    start: usize,
    sink: &mut S,
    shutdown: &CancellationToken,
) -> ReplayOutcome
where
    S: EventSink + ?Sized,
{
    let mut sent = 0;

    for (n, frame) in movie.frames_from(start).iter().enumerate() {
        let event = FrameEvent {
            id: n + 1,
            data: Arc::clone(frame.payload()),
        };

        let delivered = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return ReplayOutcome::Interrupted { sent },
            result = sink.send(event) => result,
        };
        if let Err(e) = delivered {
            // Usually a closed browser tab.
            tracing::debug!("Stopping replay at frame {}: {}", start + n + 1, e);
            return ReplayOutcome::Disconnected { sent };
        }
        sent += 1;

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => return ReplayOutcome::Interrupted { sent },
            _ = tokio::time::sleep(frame.delay()) => {}
        }
    }

    ReplayOutcome::Completed { sent }
}
