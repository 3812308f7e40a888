//! WebSocket transport for the Okey room protocol.
//!
//! Incoming frames are parsed on a background task and handed to the table
//! loop through an unbounded channel; outgoing requests go through a
//! [`CommandSender`] that stamps each one with the next `reqId`.

use anyhow::{Context, Result};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use private_okey::net::{ClientCommand, ClientMessage, RoomPublic, RoomSnapshot, ServerMessage};
use tokio::{
    net::TcpStream,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message},
};

/// What the receive task hands to the table loop.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Snapshot(Box<RoomSnapshot>),
    Rooms(Vec<RoomPublic>),
    Created(Option<String>),
    Joined(Option<String>),
    /// The connection is gone; nothing else will arrive.
    Closed,
}

impl InboundEvent {
    /// Maps a parsed frame to an event. Frame types the table doesn't use
    /// yield `None`.
    pub fn from_message(message: ServerMessage) -> Option<Self> {
        match message {
            ServerMessage::RoomSnapshot(snapshot) => Some(Self::Snapshot(Box::new(snapshot))),
            ServerMessage::RoomsList(rooms) => Some(Self::Rooms(rooms)),
            ServerMessage::RoomCreated { room_id } => Some(Self::Created(room_id)),
            ServerMessage::RoomJoined { room_id } => Some(Self::Joined(room_id)),
            ServerMessage::Other(kind) => {
                tracing::debug!(kind = %kind, "Ignoring frame");
                None
            }
        }
    }
}

/// Write half of a connection.
pub struct CommandSender<W> {
    sink: W,
    user_id: String,
    next_req_id: u64,
}

impl<W> CommandSender<W>
where
    W: Sink<Message> + Unpin,
    W::Error: std::error::Error + Send + Sync + 'static,
{
    pub fn new(sink: W, user_id: impl Into<String>) -> Self {
        Self {
            sink,
            user_id: user_id.into(),
            next_req_id: 1,
        }
    }

    /// Sends `command` and returns the `reqId` it went out with.
    pub async fn send(&mut self, command: ClientCommand) -> Result<u64> {
        let req_id = self.next_req_id;
        self.next_req_id += 1;

        let message = ClientMessage::new(req_id, command);
        let frame = message.to_frame().context("Failed to encode request")?;
        self.sink
            .send(Message::Text(frame.into()))
            .await
            .context("Failed to send request")?;

        tracing::debug!(req_id, request = %message, "Sent");
        Ok(req_id)
    }

    pub async fn hello(&mut self) -> Result<u64> {
        let user_id = self.user_id.clone();
        self.send(ClientCommand::Hello { user_id }).await
    }

    pub async fn list_rooms(&mut self) -> Result<u64> {
        self.send(ClientCommand::RoomsListRequest {}).await
    }

    pub async fn create_room(&mut self) -> Result<u64> {
        let user_id = self.user_id.clone();
        self.send(ClientCommand::RoomCreate { user_id }).await
    }

    pub async fn join_room(&mut self, room_id: &str) -> Result<u64> {
        let user_id = self.user_id.clone();
        self.send(ClientCommand::RoomJoin {
            user_id,
            room_id: room_id.to_string(),
        })
        .await
    }

    pub async fn start_game(&mut self, room_id: &str) -> Result<u64> {
        let user_id = self.user_id.clone();
        self.send(ClientCommand::GameStart {
            user_id,
            room_id: room_id.to_string(),
        })
        .await
    }

    pub async fn close(&mut self) -> Result<()> {
        self.sink.close().await.context("Failed to close connection")
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Forwards every usable frame from `stream` to `tx` until the stream ends,
/// the server closes, or the receiver is dropped. Sends [`InboundEvent::Closed`]
/// on the way out.
pub async fn pump_frames<S>(mut stream: S, tx: UnboundedSender<InboundEvent>)
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => {
                tracing::info!("Server closed connection");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "WebSocket error");
                break;
            }
        };

        let message = match ServerMessage::parse(&text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping unreadable frame");
                continue;
            }
        };

        if let Some(event) = InboundEvent::from_message(message)
            && tx.send(event).is_err()
        {
            return;
        }
    }

    let _ = tx.send(InboundEvent::Closed);
}

pub type WsSink = futures_util::stream::SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// A live connection: the write half, the inbox and the receive task.
pub struct Connection {
    pub sender: CommandSender<WsSink>,
    pub inbox: UnboundedReceiver<InboundEvent>,
    pub reader: JoinHandle<()>,
}

/// WebSocket game client
pub struct WebSocketClient {
    ws_url: String,
    user_id: String,
}

impl WebSocketClient {
    pub fn new(ws_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            user_id: user_id.into(),
        }
    }

    /// Connects, spawns the receive task and announces the user.
    pub async fn connect(self) -> Result<Connection> {
        tracing::info!(url = %self.ws_url, "Connecting");
        let (ws_stream, _) = connect_async(&self.ws_url)
            .await
            .with_context(|| format!("Failed to connect to {}", self.ws_url))?;

        let (write, read) = ws_stream.split();
        let (tx, inbox) = mpsc::unbounded_channel();
        let reader = tokio::spawn(pump_frames(read, tx));

        let mut sender = CommandSender::new(write, self.user_id);
        sender.hello().await?;
        tracing::info!(user = %sender.user_id(), "Connected");

        Ok(Connection {
            sender,
            inbox,
            reader,
        })
    }
}
