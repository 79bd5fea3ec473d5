//! Vanishing Games server - authoritative multiplayer for vanishing tic-tac-toe.
//!
//! # Architecture
//!
//! - **Protocol**: JSON messages exchanged with each participant
//! - **Session**: matchmaking slot, room registry, turn orchestration
//! - **Room**: two seats plus the authoritative [`MatchState`](vanishing_tictactoe::MatchState)
//! - **Timer**: per-room turn clock whose expiry resolves the match
//! - **Transport**: axum WebSocket adapter
//!
//! # Example
//!
//! ```no_run
//! use vanishing_server::{ServerConfig, serve};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default().with_port(4000);
//! serve(&config).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod protocol;
mod room;
mod session;
mod timer;
mod transport;

pub use config::{ConfigError, ServerConfig, SessionConfig};
pub use error::SessionError;
pub use protocol::{ClientMessage, MoveRequest, ParticipantId, Reason, RoomId, ServerMessage};
pub use room::{Room, Seat};
pub use session::{Outbox, SessionManager};
pub use timer::{TurnTicket, TurnTimer};
pub use transport::{dispatch, router, serve};
