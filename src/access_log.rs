//! One-line-per-request access logging.
//!
//! Plain requests are logged by the server middleware as soon as the
//! response is ready. SSE responses stay open for the whole movie, so the
//! player owns an [`AccessLog`] and writes the line when the stream ends.

use crate::player::ReplayOutcome;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Tracing target for access lines.
pub const ACCESS_LOG_TARGET: &str = "asciimation::access";

/// Render an access line.
///
/// `HTTP <status> <METHOD> <PATH> (<REMOTE>) :: <ELAPSED>`, with a trailing
/// `:: SSE` marker for event streams.
pub fn format_line(
    status: u16,
    method: &str,
    path: &str,
    remote: Option<SocketAddr>,
    elapsed: Duration,
    sse: bool,
) -> String {
    let remote = remote.map_or_else(|| "-".to_string(), |addr| addr.to_string());
    let mut line = format!("HTTP {status} {method} {path} ({remote}) :: {elapsed:?}");
    if sse {
        line.push_str(" :: SSE");
    }
    line
}

/// Access log entry for one SSE connection.
///
/// Exactly one line is written, when the entry is finished or dropped.
#[derive(Debug)]
pub struct AccessLog {
    method: String,
    path: String,
    remote: Option<SocketAddr>,
    started: Instant,
    outcome: Option<ReplayOutcome>,
}

impl AccessLog {
    pub fn start(
        method: impl Into<String>,
        path: impl Into<String>,
        remote: Option<SocketAddr>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            remote,
            started: Instant::now(),
            outcome: None,
        }
    }

    /// Record how the replay ended and write the line.
    pub fn finish(mut self, outcome: ReplayOutcome) {
        self.outcome = Some(outcome);
    }

    fn line(&self) -> String {
        format_line(
            200,
            &self.method,
            &self.path,
            self.remote,
            self.started.elapsed(),
            true,
        )
    }
}

impl Drop for AccessLog {
    fn drop(&mut self) {
        let line = self.line();
        match self.outcome {
            Some(outcome) => tracing::info!(
                target: ACCESS_LOG_TARGET,
                outcome = outcome.label(),
                frames = outcome.sent(),
                "{}",
                line
            ),
            None => tracing::info!(target: ACCESS_LOG_TARGET, outcome = "aborted", "{}", line),
        }
    }
}

#[cfg(test)]
pub(crate) mod capture {
    //! Collects access lines written on the current thread.

    use super::ACCESS_LOG_TARGET;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[derive(Clone, Default)]
    pub struct AccessLines(Arc<Mutex<Vec<String>>>);

    impl AccessLines {
        pub fn lines(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct MessageVisitor(String);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for AccessLines {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if event.metadata().target() == ACCESS_LOG_TARGET {
                let mut visitor = MessageVisitor(String::new());
                event.record(&mut visitor);
                self.0.lock().unwrap().push(visitor.0);
            }
        }
    }

    /// Install a thread-local subscriber that records access lines.
    pub fn capture() -> (AccessLines, tracing::subscriber::DefaultGuard) {
        let lines = AccessLines::default();
        let subscriber = tracing_subscriber::registry().with(lines.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (lines, guard)
    }
}
