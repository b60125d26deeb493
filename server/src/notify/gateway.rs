//! Socket.IO room gateway
//!
//! Clients join rooms named after notification topics ("table:{id}",
//! "order:{id}", "restaurant:{id}:staff") and receive every bus message
//! published to that topic. The gateway is a thin forwarder; all publish
//! semantics live in [`Notifier`](super::Notifier).

use serde_json::json;
use socketioxide::layer::SocketIoLayer;
use socketioxide::SocketIo;
use socketioxide::extract::{Data, SocketRef};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use shared::order::Notification;

pub struct SocketGateway;

impl SocketGateway {
    /// Build the socket.io layer with the room join/leave handlers.
    /// Returns the io handle for the bus forwarder.
    pub fn layer() -> (SocketIoLayer, SocketIo) {
        let (layer, io) = SocketIo::new_layer();

        io.ns("/", async |socket: SocketRef| {
            tracing::debug!(sid = %socket.id, "Socket connected");

            socket.on("join", async |socket: SocketRef, Data::<String>(room)| {
                tracing::debug!(sid = %socket.id, room = %room, "Socket joined room");
                socket.join(room);
            });

            socket.on("leave", async |socket: SocketRef, Data::<String>(room)| {
                socket.leave(room);
            });

            socket.on_disconnect(async |socket: SocketRef| {
                tracing::debug!(sid = %socket.id, "Socket disconnected");
            });
        });

        (layer, io)
    }

    /// Drain the bus into socket rooms until shutdown
    pub async fn forward(
        io: SocketIo,
        mut rx: broadcast::Receiver<Notification>,
        token: CancellationToken,
    ) {
        loop {
            let notification = tokio::select! {
                _ = token.cancelled() => break,
                received = rx.recv() => match received {
                    Ok(notification) => notification,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Socket forwarder lagged behind the bus");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
            };

            let payload = json!({
                "topic": notification.topic,
                "data": notification.data,
            });
            if let Err(e) = io
                .to(notification.topic.clone())
                .emit(notification.event.as_str(), &payload)
                .await
            {
                tracing::debug!(error = %e, "Socket emit failed");
            }
        }
    }
}
