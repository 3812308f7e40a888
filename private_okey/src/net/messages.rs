use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::{
    errors::{SnapshotError, SnapshotResult},
    lenient,
    snapshot::{PlayerEntry, RoomSnapshot},
};

#[derive(Deserialize)]
struct Envelope {
    #[serde(alias = "type", deserialize_with = "lenient::string", default)]
    t: Option<String>,
    #[serde(alias = "payload", default)]
    p: Value,
}

/// Player summary inside a room listing.
pub type PlayerPublic = PlayerEntry;

/// One room as shown in the lobby listing.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomPublic {
    #[serde(deserialize_with = "lenient::string")]
    pub room_id: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub owner_id: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    pub dealer_seat: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    pub turn_seat: Option<i64>,
    #[serde(deserialize_with = "lenient::string")]
    pub turn_phase: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    pub turn_deadline: Option<i64>,
    #[serde(deserialize_with = "lenient::entries")]
    pub players: Vec<PlayerPublic>,
}

impl fmt::Display for RoomPublic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seated = self
            .players
            .iter()
            .filter(|p| p.user_id.as_deref().is_some_and(|id| !id.is_empty()))
            .count();
        write!(
            f,
            "{} [{}] {seated}/4",
            self.room_id.as_deref().unwrap_or("?"),
            self.state.as_deref().unwrap_or("-"),
        )
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RoomsListPayload {
    #[serde(deserialize_with = "lenient::entries")]
    rooms: Vec<RoomPublic>,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RoomRef {
    #[serde(deserialize_with = "lenient::string")]
    room_id: Option<String>,
}

/// A frame from the server.
#[derive(Clone, Debug, PartialEq)]
pub enum ServerMessage {
    /// Authoritative room state; drives the table.
    RoomSnapshot(RoomSnapshot),
    /// The lobby's room listing.
    RoomsList(Vec<RoomPublic>),
    /// A room this user asked for was created.
    RoomCreated { room_id: Option<String> },
    /// This user joined a room.
    RoomJoined { room_id: Option<String> },
    /// Any other frame type, carried by name only.
    Other(String),
}

impl ServerMessage {
    /// Decodes one text frame.
    ///
    /// # Errors
    ///
    /// Fails if the frame isn't a JSON object envelope, or if a room
    /// snapshot carries no payload object. Unknown frame types are not an
    /// error.
    pub fn parse(text: &str) -> SnapshotResult<Self> {
        let Envelope { t, p } = serde_json::from_str(text)?;
        let kind = t.unwrap_or_default();

        match kind.as_str() {
            "ROOM_SNAPSHOT" => {
                if !p.is_object() {
                    return Err(SnapshotError::MissingPayload(kind));
                }
                Ok(Self::RoomSnapshot(serde_json::from_value(p)?))
            }
            "ROOMS_LIST" => {
                let payload: RoomsListPayload = from_payload(p)?;
                Ok(Self::RoomsList(payload.rooms))
            }
            "ROOM_CREATED" => Ok(Self::RoomCreated {
                room_id: from_payload::<RoomRef>(p)?.room_id,
            }),
            "ROOM_JOINED" => Ok(Self::RoomJoined {
                room_id: from_payload::<RoomRef>(p)?.room_id,
            }),
            _ => Ok(Self::Other(kind)),
        }
    }

    /// The envelope's type name.
    pub fn kind(&self) -> &str {
        match self {
            Self::RoomSnapshot(_) => "ROOM_SNAPSHOT",
            Self::RoomsList(_) => "ROOMS_LIST",
            Self::RoomCreated { .. } => "ROOM_CREATED",
            Self::RoomJoined { .. } => "ROOM_JOINED",
            Self::Other(kind) => kind,
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoomSnapshot(snapshot) => write!(f, "snapshot ({})", snapshot.state),
            Self::RoomsList(rooms) => write!(f, "{} room(s) listed", rooms.len()),
            Self::RoomCreated { room_id } | Self::RoomJoined { room_id } => {
                write!(f, "{} {}", self.kind(), room_id.as_deref().unwrap_or("?"))
            }
            Self::Other(kind) => write!(f, "{kind}"),
        }
    }
}

impl RoomSnapshot {
    /// Decodes a frame that must be a room snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::UnexpectedType`] for any other frame type,
    /// or the decoding error of [`ServerMessage::parse`].
    pub fn from_frame(text: &str) -> SnapshotResult<Self> {
        match ServerMessage::parse(text)? {
            ServerMessage::RoomSnapshot(snapshot) => Ok(snapshot),
            other => Err(SnapshotError::UnexpectedType(other.kind().to_string())),
        }
    }
}

fn from_payload<T: Default + serde::de::DeserializeOwned>(p: Value) -> SnapshotResult<T> {
    if p.is_object() {
        Ok(serde_json::from_value(p)?)
    } else {
        Ok(T::default())
    }
}

/// A request to the server.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(
    tag = "t",
    content = "p",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ClientCommand {
    /// Introduces the connection as `user_id`.
    Hello { user_id: String },
    RoomsListRequest {},
    RoomCreate { user_id: String },
    RoomJoin { user_id: String, room_id: String },
    /// Asks the server to start the game in `room_id`.
    GameStart { user_id: String, room_id: String },
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Hello { user_id } => format!("hello as {user_id}"),
            Self::RoomsListRequest {} => "list rooms".to_string(),
            Self::RoomCreate { .. } => "create room".to_string(),
            Self::RoomJoin { room_id, .. } => format!("join room {room_id}"),
            Self::GameStart { room_id, .. } => format!("start game in {room_id}"),
        };
        write!(f, "{repr}")
    }
}

/// A request with its correlation id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ClientMessage {
    #[serde(rename = "reqId")]
    pub req_id: String,
    #[serde(flatten)]
    pub command: ClientCommand,
}

impl ClientMessage {
    pub fn new(req_id: u64, command: ClientCommand) -> Self {
        Self {
            req_id: req_id.to_string(),
            command,
        }
    }

    /// Encodes the message as a text frame.
    ///
    /// # Errors
    ///
    /// Only fails if serialization itself fails, which these types never do.
    pub fn to_frame(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.req_id, self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::RoomState;
    use serde_json::json;

    #[test]
    fn test_parse_room_snapshot() {
        let frame = r#"{"t":"ROOM_SNAPSHOT","p":{"state":"BUILD_PILES","startPile":"4"}}"#;
        let ServerMessage::RoomSnapshot(snapshot) = ServerMessage::parse(frame).unwrap() else {
            panic!("expected a snapshot");
        };
        assert_eq!(snapshot.state, RoomState::BuildPiles);
        assert_eq!(snapshot.start_pile(), 4);
    }

    #[test]
    fn test_parse_accepts_long_envelope_names() {
        let frame = r#"{"type":"ROOM_SNAPSHOT","payload":{"dealLeft":3}}"#;
        let snapshot = RoomSnapshot::from_frame(frame).unwrap();
        assert_eq!(snapshot.deal_left, Some(3));
    }

    #[test]
    fn test_snapshot_without_payload_is_an_error() {
        let frame = r#"{"t":"ROOM_SNAPSHOT","p":null}"#;
        assert!(matches!(
            ServerMessage::parse(frame),
            Err(SnapshotError::MissingPayload(_))
        ));
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        assert!(matches!(
            ServerMessage::parse("not json"),
            Err(SnapshotError::Decode(_))
        ));
        assert!(matches!(
            ServerMessage::parse("42"),
            Err(SnapshotError::Decode(_))
        ));
    }

    #[test]
    fn test_unknown_type_is_carried_by_name() {
        let msg = ServerMessage::parse(r#"{"t":"PONG"}"#).unwrap();
        assert_eq!(msg, ServerMessage::Other("PONG".to_string()));
        assert!(matches!(
            RoomSnapshot::from_frame(r#"{"t":"PONG"}"#),
            Err(SnapshotError::UnexpectedType(kind)) if kind == "PONG"
        ));
    }

    #[test]
    fn test_parse_rooms_list() {
        let frame = json!({
            "t": "ROOMS_LIST",
            "p": {"rooms": [
                {"roomId": "r1", "state": "LOBBY", "dealerSeat": "2",
                 "players": {"1": {"userId": "alice", "seat": 1, "connected": true}}},
                "junk",
            ]}
        })
        .to_string();
        let ServerMessage::RoomsList(rooms) = ServerMessage::parse(&frame).unwrap() else {
            panic!("expected a room list");
        };
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].dealer_seat, Some(2));
        assert!(rooms[0].players[0].connected);
        assert_eq!(rooms[0].to_string(), "r1 [LOBBY] 1/4");
    }

    #[test]
    fn test_parse_room_joined() {
        let msg = ServerMessage::parse(r#"{"t":"ROOM_JOINED","p":{"roomId":77}}"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::RoomJoined {
                room_id: Some("77".to_string())
            }
        );
    }

    #[test]
    fn test_client_message_wire_shape() {
        let msg = ClientMessage::new(
            3,
            ClientCommand::RoomJoin {
                user_id: "alice".to_string(),
                room_id: "r1".to_string(),
            },
        );
        let value: Value = serde_json::from_str(&msg.to_frame().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"t": "ROOM_JOIN", "reqId": "3", "p": {"userId": "alice", "roomId": "r1"}})
        );
    }

    #[test]
    fn test_rooms_list_request_has_empty_payload() {
        let msg = ClientMessage::new(1, ClientCommand::RoomsListRequest {});
        let value: Value = serde_json::from_str(&msg.to_frame().unwrap()).unwrap();
        assert_eq!(value, json!({"t": "ROOMS_LIST_REQUEST", "reqId": "1", "p": {}}));
    }
}
