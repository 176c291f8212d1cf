//! `GET /sse`: replays the movie as a Server-Sent Events stream.

use crate::access_log::AccessLog;
use crate::player::{replay, EventSink, FrameEvent, SinkClosed};
use crate::server::AppContext;
use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, Query, State},
    http::{Method, Uri},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

pub fn sse_routes() -> Router<AppContext> {
    Router::new().route("/sse", get(sse_handler))
}

/// Query parameter holding the zero-based frame to start from.
pub const START_FRAME_PARAM: &str = "startFrame";

/// First `startFrame` value of the query. Later repeats are ignored.
fn start_frame(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == START_FRAME_PARAM)
        .map(|(_, value)| value.as_str())
}

/// Forwards frames into the response body.
struct ChannelSink(mpsc::Sender<Result<Event, Infallible>>);

#[async_trait]
impl EventSink for ChannelSink {
    async fn send(&mut self, event: FrameEvent) -> Result<(), SinkClosed> {
        let event = Event::default()
            .id(event.id.to_string())
            .data(&*event.data);
        // The receiver is dropped together with the response body.
        self.0.send(Ok(event)).await.map_err(|_| SinkClosed)
    }
}

pub async fn sse_handler(
    State(ctx): State<AppContext>,
    Query(params): Query<Vec<(String, String)>>,
    method: Method,
    uri: Uri,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Sse<ReceiverStream<Result<Event, Infallible>>> {
    let start = ctx.movie.start_index(start_frame(&params));
    let remote = connect_info.map(|ConnectInfo(addr)| addr);
    let log = AccessLog::start(method.as_str(), uri.path(), remote);

    tracing::debug!(
        "Replaying frames {}..{} to {:?}",
        start,
        ctx.movie.len(),
        remote
    );

    let (tx, rx) = mpsc::channel(1);
    let movie = Arc::clone(&ctx.movie);
    let shutdown = ctx.shutdown.clone();

    tokio::spawn(async move {
        let mut sink = ChannelSink(tx);
        let outcome = replay(&movie, start, &mut sink, &shutdown).await;
        tracing::debug!("Replay {}", outcome);
        log.finish(outcome);
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(
        KeepAlive::new().interval(Duration::from_secs(ctx.config.server.keep_alive_secs)),
    )
}
