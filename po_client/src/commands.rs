//! Parsing of the lines typed at the client prompt.

use std::fmt;

/// A request typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask the server for the lobby listing.
    Rooms,
    /// Open a new room owned by the local user.
    Create,
    /// Take a seat in the given room.
    Join(String),
    /// Start the game in the given room, or the one last joined.
    Start(Option<String>),
    /// Log a summary of the table.
    Status,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `join` without a room id.
    MissingRoomId,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRoomId => write!(f, "Join requires a room id (e.g., 'join r1')"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP_TEXT: &str = "\
Available commands:
  rooms            list open rooms
  create           open a new room
  join ROOM        take a seat in ROOM
  start [ROOM]     start the game (defaults to the room last joined)
  status           show the table
  help, quit";

/// Parse a command string into a [`Command`].
///
/// # Examples
///
/// ```
/// use po_client::commands::{Command, parse_command};
///
/// assert_eq!(parse_command("rooms"), Ok(Command::Rooms));
/// assert_eq!(parse_command("join r7"), Ok(Command::Join("r7".to_string())));
/// assert_eq!(parse_command("start"), Ok(Command::Start(None)));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let mut words = input.split_whitespace();
    let Some(head) = words.next() else {
        return Err(ParseError::UnrecognizedCommand(String::new()));
    };
    let arg = words.next().map(str::to_string);

    match head.to_lowercase().as_str() {
        "rooms" | "list" => Ok(Command::Rooms),
        "create" | "new" => Ok(Command::Create),
        "join" => arg.map(Command::Join).ok_or(ParseError::MissingRoomId),
        "start" => Ok(Command::Start(arg)),
        "status" | "table" => Ok(Command::Status),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(ParseError::UnrecognizedCommand(head.to_string())),
    }
}
