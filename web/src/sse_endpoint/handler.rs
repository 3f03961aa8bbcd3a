use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::AppState;
use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use log::*;
use sse::connection::ConnectionId;
use sse::Manager;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;

/// SSE handler that establishes a long-lived connection for real-time updates.
/// One connection per browser session, stays open across page navigation
/// within the single-page app.
pub(crate) async fn sse_handler(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing SSE connection for user {}", user.id);

    let (tx, rx) = mpsc::unbounded_channel();

    let connection_id = app_state.sse_manager.register_connection(tx);

    let stream = connection_stream(rx, app_state.sse_manager.clone(), connection_id, user.id);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Builds the wire stream for one registered connection. The first item is a
/// comment, written immediately so the client sees traffic as soon as the
/// stream opens rather than after the first broadcast or keep-alive tick.
/// Events then arrive from the session's channel in publish order and are
/// passed straight through.
fn connection_stream(
    mut rx: mpsc::UnboundedReceiver<Result<Event, Infallible>>,
    manager: Arc<Manager>,
    connection_id: ConnectionId,
    user_id: domain::Id,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream! {
        yield Ok(Event::default().comment("connected"));

        while let Some(event) = rx.recv().await {
            yield event;
        }

        // Connection closed, clean up
        debug!("SSE connection closed for user {user_id}, cleaning up");
        manager.unregister_connection(&connection_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn stream_opens_with_a_comment_before_any_broadcast() {
        let manager = Arc::new(Manager::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = manager.register_connection(tx.clone());

        let stream = connection_stream(rx, manager.clone(), connection_id, domain::Id::new_v4());
        futures::pin_mut!(stream);

        // The greeting is available without anything having been broadcast
        let first = stream.next().await.unwrap().unwrap();
        assert!(format!("{first:?}").contains("connected"));

        // Broadcast traffic follows behind it in order
        tx.send(Ok(Event::default().event("announcement_created").data("{}")))
            .unwrap();
        let second = stream.next().await.unwrap().unwrap();
        assert!(format!("{second:?}").contains("announcement_created"));
    }
}
