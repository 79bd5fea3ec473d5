//! Wire format of every message kind.

use serde_json::json;
use vanishing_server::{ClientMessage, ParticipantId, RoomId, ServerMessage};
use vanishing_tictactoe::Symbol;

#[test]
fn client_messages_parse() {
    let cases = [
        (json!({"type": "findGame"}), ClientMessage::FindGame),
        (json!({"type": "leaveGame"}), ClientMessage::LeaveGame),
        (
            json!({"type": "restartRequest", "data": {"room": "room_2"}}),
            ClientMessage::RestartRequest {
                room: RoomId::from("room_2"),
            },
        ),
    ];
    for (value, expected) in cases {
        assert_eq!(serde_json::from_value::<ClientMessage>(value).unwrap(), expected);
    }
}

#[test]
fn move_symbol_is_optional() {
    let msg: ClientMessage = serde_json::from_value(json!({
        "type": "makeMove",
        "data": {"room": "room_1", "move": {"index": 8}}
    }))
    .unwrap();
    let ClientMessage::MakeMove { mv, .. } = msg else {
        panic!("expected makeMove");
    };
    assert_eq!((mv.index, mv.symbol), (8, None));
}

#[test]
fn unknown_type_is_rejected() {
    assert!(serde_json::from_value::<ClientMessage>(json!({"type": "cheat"})).is_err());
}

#[test]
fn server_messages_serialize() {
    let cases = [
        (ServerMessage::WaitingForOpponent, json!({"type": "waitingForOpponent"})),
        (
            ServerMessage::GameStart {
                symbol: Symbol::O,
                room: RoomId::from("room_1"),
            },
            json!({"type": "gameStart", "data": {"symbol": "O", "room": "room_1"}}),
        ),
        (
            ServerMessage::NewTurn {
                current_player_id: ParticipantId(7),
                symbol: Symbol::X,
            },
            json!({"type": "newTurn", "data": {"currentPlayerId": 7, "symbol": "X"}}),
        ),
        (
            ServerMessage::StartTimer { duration: 3000 },
            json!({"type": "startTimer", "data": {"duration": 3000}}),
        ),
        (
            ServerMessage::MoveMade {
                index: 4,
                symbol: Symbol::X,
            },
            json!({"type": "moveMade", "data": {"index": 4, "symbol": "X"}}),
        ),
        (
            ServerMessage::RoomClosed {
                room: RoomId::from("room_5"),
            },
            json!({"type": "roomClosed", "data": {"room": "room_5"}}),
        ),
        (
            ServerMessage::UpdatePlayerCount { count: 3 },
            json!({"type": "updatePlayerCount", "data": {"count": 3}}),
        ),
    ];
    for (message, expected) in cases {
        assert_eq!(serde_json::to_value(&message).unwrap(), expected);
    }
}
