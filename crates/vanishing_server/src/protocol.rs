//! Wire protocol between participants and the session manager.
//!
//! Frames are adjacently tagged JSON:
//!
//! ```json
//! {"type":"makeMove","data":{"room":"room_1","move":{"index":4,"symbol":"X"}}}
//! ```

use serde::{Deserialize, Serialize};
use vanishing_tictactoe::Symbol;

/// Identity of a connected participant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
#[display("p{}", _0)]
pub struct ParticipantId(pub u64);

/// Identity of a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Why a match ended.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    /// A line was completed.
    #[display("win")]
    Win,
    /// The turn holder's clock expired.
    #[display("timeout")]
    Timeout,
    /// A player gave up with a restart request mid-match.
    #[display("forfeit")]
    Forfeit,
    /// A player left or dropped.
    #[display("disconnect")]
    Disconnect,
}

/// Move payload of `makeMove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct MoveRequest {
    /// Target cell, 0-8.
    pub index: usize,
    /// Symbol the client believes it plays. Must match the server's assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
}

/// Messages a participant sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    /// Join the matchmaking queue.
    FindGame,
    /// Place a mark.
    MakeMove {
        /// Room the move is for.
        room: RoomId,
        /// The move itself.
        #[serde(rename = "move")]
        mv: MoveRequest,
    },
    /// Forfeit an active match, or ask for a rematch after it ended.
    RestartRequest {
        /// Room the request is for.
        room: RoomId,
    },
    /// Leave the queue or the current room.
    LeaveGame,
}

/// Messages the session manager sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    /// Queued; no opponent yet.
    WaitingForOpponent,
    /// Paired into a room.
    GameStart {
        /// Assigned symbol.
        symbol: Symbol,
        /// Room to address moves to.
        room: RoomId,
    },
    /// Whose turn it is.
    NewTurn {
        /// Participant expected to move.
        current_player_id: ParticipantId,
        /// Their symbol.
        symbol: Symbol,
    },
    /// The recipient's turn clock started.
    StartTimer {
        /// Clock length in milliseconds.
        duration: u64,
    },
    /// A move was applied; clients replay it through the same rule engine.
    MoveMade {
        /// Cell played.
        index: usize,
        /// Symbol that played it.
        symbol: Symbol,
    },
    /// The match was resolved.
    GameOver {
        /// Winner.
        winner_id: ParticipantId,
        /// Loser.
        loser_id: ParticipantId,
        /// Why it ended.
        reason: Reason,
    },
    /// A rematch began; symbols may have been swapped.
    RestartGame {
        /// The recipient's symbol for the new round.
        symbol: Symbol,
    },
    /// The opponent left a finished room; the room no longer exists.
    RoomClosed {
        /// The closed room.
        room: RoomId,
    },
    /// Number of connected participants.
    UpdatePlayerCount {
        /// Connection count.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn make_move_uses_move_field() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "makeMove",
            "data": {"room": "room_3", "move": {"index": 4, "symbol": "O"}}
        }))
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::MakeMove {
                room: RoomId::from("room_3"),
                mv: MoveRequest::new(4, Some(Symbol::O)),
            }
        );
    }

    #[test]
    fn unit_messages_need_no_data() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"findGame"}"#).unwrap();
        assert_eq!(msg, ClientMessage::FindGame);
    }

    #[test]
    fn game_over_is_camel_case() {
        let value = serde_json::to_value(ServerMessage::GameOver {
            winner_id: ParticipantId(1),
            loser_id: ParticipantId(2),
            reason: Reason::Timeout,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({
                "type": "gameOver",
                "data": {"winnerId": 1, "loserId": 2, "reason": "timeout"}
            })
        );
    }
}
