//! Session manager: matchmaking, rooms, turns, and match resolution.
//!
//! Every room sits behind its own mutex, so events for one room (moves,
//! restart requests, departures, timer expiry) run one at a time while other
//! rooms proceed independently. The matchmaking slot has its own lock.
//! Registry maps are never locked while a room lock is held.

use crate::config::SessionConfig;
use crate::room::{Room, Seat};
use crate::timer::TurnTicket;
use crate::{
    ClientMessage, MoveRequest, ParticipantId, Reason, RoomId, ServerMessage, SessionError,
};
use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use vanishing_tictactoe::{Symbol, check_win};

/// Outgoing channel of one participant.
pub type Outbox = UnboundedSender<ServerMessage>;

type RoomHandle = Arc<Mutex<Room>>;

#[derive(Debug)]
struct Shared {
    config: SessionConfig,
    next_participant: AtomicU64,
    next_room: AtomicU64,
    outboxes: RwLock<HashMap<ParticipantId, Outbox>>,
    waiting: Mutex<Option<ParticipantId>>,
    rooms: RwLock<HashMap<RoomId, RoomHandle>>,
    memberships: RwLock<HashMap<ParticipantId, RoomId>>,
}

/// Authoritative multiplayer coordinator.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct SessionManager {
    inner: Arc<Shared>,
}

impl SessionManager {
    /// Creates a session manager.
    #[instrument]
    pub fn new(config: SessionConfig) -> Self {
        info!("Creating session manager");
        Self {
            inner: Arc::new(Shared {
                config,
                next_participant: AtomicU64::new(1),
                next_room: AtomicU64::new(1),
                outboxes: RwLock::new(HashMap::new()),
                waiting: Mutex::new(None),
                rooms: RwLock::new(HashMap::new()),
                memberships: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Session settings in use.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Registers a new connection and returns its identity and inbox.
    #[instrument(skip(self))]
    pub async fn connect(&self) -> (ParticipantId, UnboundedReceiver<ServerMessage>) {
        let id = ParticipantId(self.inner.next_participant.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = unbounded_channel();
        self.inner.outboxes.write().await.insert(id, tx);
        info!(participant = %id, "Participant connected");
        self.broadcast_presence().await;
        (id, rx)
    }

    /// Handles a dropped connection: departure, then forget the outbox.
    #[instrument(skip(self))]
    pub async fn disconnect(&self, participant: ParticipantId) {
        info!(participant = %participant, "Participant disconnected");
        self.depart(participant).await;
        self.inner.outboxes.write().await.remove(&participant);
        self.broadcast_presence().await;
    }

    /// Dispatches one client message.
    ///
    /// Errors are for logging and tests only; nothing is sent back for a
    /// rejected request.
    #[instrument(skip(self))]
    pub async fn handle(
        &self,
        participant: ParticipantId,
        message: ClientMessage,
    ) -> Result<(), SessionError> {
        match message {
            ClientMessage::FindGame => {
                self.find_game(participant).await;
                Ok(())
            }
            ClientMessage::MakeMove { room, mv } => self.make_move(participant, &room, mv).await,
            ClientMessage::RestartRequest { room } => self.restart(participant, &room).await,
            ClientMessage::LeaveGame => {
                self.depart(participant).await;
                Ok(())
            }
        }
    }

    /// Number of connected participants.
    pub async fn participant_count(&self) -> usize {
        self.inner.outboxes.read().await.len()
    }

    /// Room the participant is seated in.
    pub async fn room_of(&self, participant: ParticipantId) -> Option<RoomId> {
        self.inner.memberships.read().await.get(&participant).cloned()
    }

    /// Number of live rooms.
    pub async fn room_count(&self) -> usize {
        self.inner.rooms.read().await.len()
    }

    /// Participant waiting in the matchmaking slot.
    pub async fn waiting(&self) -> Option<ParticipantId> {
        *self.inner.waiting.lock().await
    }

    /// Runs `f` against a room under its lock.
    pub async fn inspect_room<T>(
        &self,
        room: &RoomId,
        f: impl FnOnce(&Room) -> T,
    ) -> Option<T> {
        let handle = self.room(room).await.ok()?;
        let guard = handle.lock().await;
        Some(f(&guard))
    }
}

// ─────────────────────────────────────────────────────────────
//  Matchmaking
// ─────────────────────────────────────────────────────────────

impl SessionManager {
    /// Queues the participant, or pairs them with the one already waiting.
    ///
    /// Runs entirely under the matchmaking lock, so membership checks and
    /// pairing cannot interleave with another search.
    #[instrument(skip(self))]
    pub async fn find_game(&self, participant: ParticipantId) {
        let mut waiting = self.inner.waiting.lock().await;
        if self.room_of(participant).await.is_some() {
            debug!(participant = %participant, "Leaving current room before searching");
            self.leave_room(participant).await;
        }

        if let Some(first) = *waiting
            && first != participant
        {
            match self.open_room(first, participant).await {
                Ok(handle) => {
                    *waiting = None;
                    let room = handle.lock().await;
                    self.start_round(&room);
                    return;
                }
                Err(missing) if missing == first => {
                    warn!(%first, "Dropping stale waiting participant");
                }
                Err(_) => {
                    warn!(%participant, "Ignoring search from participant without outbox");
                    return;
                }
            }
        }
        *waiting = Some(participant);
        drop(waiting);
        info!(participant = %participant, "Waiting for opponent");
        self.send(participant, ServerMessage::WaitingForOpponent).await;
    }

    /// Seats both participants in a new room.
    ///
    /// Fails with the participant whose outbox is gone, newcomer first.
    async fn open_room(
        &self,
        first: ParticipantId,
        second: ParticipantId,
    ) -> Result<RoomHandle, ParticipantId> {
        let (first_outbox, second_outbox) = {
            let outboxes = self.inner.outboxes.read().await;
            (outboxes.get(&first).cloned(), outboxes.get(&second).cloned())
        };
        let second_outbox = second_outbox.ok_or(second)?;
        let first_outbox = first_outbox.ok_or(first)?;

        let id = RoomId(format!(
            "room_{}",
            self.inner.next_room.fetch_add(1, Ordering::Relaxed)
        ));
        let room = Room::new(
            id.clone(),
            Seat::new(first, first_outbox),
            Seat::new(second, second_outbox),
        );
        let handle = Arc::new(Mutex::new(room));
        self.inner
            .rooms
            .write()
            .await
            .insert(id.clone(), handle.clone());
        {
            let mut memberships = self.inner.memberships.write().await;
            memberships.insert(first, id.clone());
            memberships.insert(second, id.clone());
        }
        info!(room = %id, x = %first, o = %second, "Room created");
        Ok(handle)
    }

    fn start_round(&self, room: &Room) {
        let [x, o] = room.players();
        for (id, symbol) in [(x, Symbol::X), (o, Symbol::O)] {
            room.unicast(
                id,
                ServerMessage::GameStart {
                    symbol,
                    room: room.id().clone(),
                },
            );
        }
        self.announce_turn(room);
    }
}

// ─────────────────────────────────────────────────────────────
//  Turns
// ─────────────────────────────────────────────────────────────

impl SessionManager {
    /// Applies a move from the turn holder.
    #[instrument(skip(self), fields(room = %room_id))]
    pub async fn make_move(
        &self,
        participant: ParticipantId,
        room_id: &RoomId,
        mv: MoveRequest,
    ) -> Result<(), SessionError> {
        let handle = self.room(room_id).await?;
        let mut room = handle.lock().await;
        if room.is_closed() {
            return Err(SessionError::UnknownRoom(room_id.clone()));
        }
        let symbol = room.symbol_of(participant).ok_or(SessionError::NotInRoom)?;
        if !room.state().is_active() {
            return Err(SessionError::MatchInactive);
        }
        if room.turn_holder() != participant {
            return Err(SessionError::NotYourTurn);
        }
        if mv.symbol.is_some_and(|claimed| claimed != symbol) {
            return Err(SessionError::SymbolMismatch);
        }

        let placement = room.state_mut().apply_move(mv.index, symbol)?;
        room.set_last_actor(participant);
        debug!(index = mv.index, %symbol, vanished = ?placement.vanished, "Move applied");
        room.broadcast(ServerMessage::MoveMade {
            index: mv.index,
            symbol,
        });

        if check_win(room.state().board()).is_some() {
            let winner = room.last_actor().ok_or(SessionError::NotInRoom)?;
            let loser = room.opponent_of(winner).ok_or(SessionError::NotInRoom)?;
            self.resolve(&mut room, Reason::Win, winner, loser)
        } else {
            self.new_turn(&mut room);
            Ok(())
        }
    }

    /// Clears the clock, passes the turn, announces it, and arms the clock
    /// for every turn after the first.
    fn new_turn(&self, room: &mut Room) {
        room.timer.cancel();
        room.state_mut().advance_turn();
        self.announce_turn(room);

        if room.state().turn_count() > 1 {
            let holder = room.turn_holder();
            let duration = *self.inner.config.turn_timeout();
            room.unicast(
                holder,
                ServerMessage::StartTimer {
                    duration: duration.as_millis() as u64,
                },
            );
            let ticket = room.ticket();
            let weak = Arc::downgrade(&self.inner);
            let room_id = room.id().clone();
            room.timer.arm(ticket, duration, expire_later(weak, room_id, ticket));
        }
    }

    fn announce_turn(&self, room: &Room) {
        let symbol = room.state().active_symbol();
        room.broadcast(ServerMessage::NewTurn {
            current_player_id: room.holder(symbol),
            symbol,
        });
    }

    /// Resolves the match as a timeout if `ticket` is still the live turn.
    #[instrument(skip(self), fields(room = %room_id))]
    pub async fn expire(&self, room_id: &RoomId, ticket: TurnTicket) -> Result<(), SessionError> {
        let handle = self.room(room_id).await?;
        let mut room = handle.lock().await;
        if room.is_closed() || !room.timer.holds(ticket) || room.ticket() != ticket {
            debug!(?ticket, "Stale timer ignored");
            return Err(SessionError::DoubleResolution);
        }
        room.timer.release();
        let loser = room.turn_holder();
        let winner = room.opponent_of(loser).ok_or(SessionError::NotInRoom)?;
        info!(%loser, "Turn clock expired");
        self.resolve(&mut room, Reason::Timeout, winner, loser)
    }

    /// Ends the match once; later attempts are no-ops.
    fn resolve(
        &self,
        room: &mut Room,
        reason: Reason,
        winner: ParticipantId,
        loser: ParticipantId,
    ) -> Result<(), SessionError> {
        if !room.state().is_active() {
            debug!(room = %room.id(), %reason, "Ignoring second resolution");
            return Err(SessionError::DoubleResolution);
        }
        room.state_mut().finish();
        room.timer.cancel();
        info!(room = %room.id(), %winner, %loser, %reason, "Match resolved");
        room.broadcast(ServerMessage::GameOver {
            winner_id: winner,
            loser_id: loser,
            reason,
        });
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Forfeit / rematch
// ─────────────────────────────────────────────────────────────

impl SessionManager {
    /// One control message, two meanings: forfeit while the match is
    /// active, rematch once it is over.
    #[instrument(skip(self), fields(room = %room_id))]
    pub async fn restart(
        &self,
        participant: ParticipantId,
        room_id: &RoomId,
    ) -> Result<(), SessionError> {
        let handle = self.room(room_id).await?;
        let mut room = handle.lock().await;
        if room.is_closed() {
            return Err(SessionError::UnknownRoom(room_id.clone()));
        }
        let opponent = room.opponent_of(participant).ok_or(SessionError::NotInRoom)?;

        if room.state().is_active() {
            info!(%participant, "Restart during active match is a forfeit");
            return self.resolve(&mut room, Reason::Forfeit, opponent, participant);
        }

        room.next_round();
        if coin_flip() {
            room.swap_seats();
        }
        let [x, o] = room.players();
        info!(%x, %o, round = room.round(), "Rematch started");
        room.unicast(x, ServerMessage::RestartGame { symbol: Symbol::X });
        room.unicast(o, ServerMessage::RestartGame { symbol: Symbol::O });
        self.announce_turn(&room);
        Ok(())
    }
}

fn coin_flip() -> bool {
    rand::rng().random_bool(0.5)
}

// ─────────────────────────────────────────────────────────────
//  Departure
// ─────────────────────────────────────────────────────────────

impl SessionManager {
    /// Removes the participant from the queue and from any room.
    ///
    /// An active match is resolved as a disconnect loss; a finished room is
    /// closed and the remaining occupant told so. Either way the room is
    /// deleted.
    #[instrument(skip(self))]
    pub async fn depart(&self, participant: ParticipantId) {
        let mut waiting = self.inner.waiting.lock().await;
        if *waiting == Some(participant) {
            info!(%participant, "Waiting participant left the queue");
            *waiting = None;
        }
        self.leave_room(participant).await;
    }

    /// Room half of departure. Callers hold the matchmaking lock.
    async fn leave_room(&self, participant: ParticipantId) {
        let Some(room_id) = self.inner.memberships.write().await.remove(&participant) else {
            return;
        };
        let Some(handle) = self.inner.rooms.write().await.remove(&room_id) else {
            return;
        };

        self.inner
            .memberships
            .write()
            .await
            .retain(|_, seated| *seated != room_id);

        let mut room = handle.lock().await;
        match room.opponent_of(participant) {
            Some(opponent) if room.state().is_active() => {
                if let Err(e) = self.resolve(&mut room, Reason::Disconnect, opponent, participant) {
                    debug!(error = %e, "Departure resolution skipped");
                }
            }
            Some(opponent) => {
                room.unicast(
                    opponent,
                    ServerMessage::RoomClosed {
                        room: room_id.clone(),
                    },
                );
            }
            None => {}
        }
        room.close();
        info!(room = %room_id, %participant, "Room deleted after departure");
    }
}

// ─────────────────────────────────────────────────────────────
//  Helpers
// ─────────────────────────────────────────────────────────────

impl SessionManager {
    async fn room(&self, id: &RoomId) -> Result<RoomHandle, SessionError> {
        self.inner
            .rooms
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownRoom(id.clone()))
    }

    async fn send(&self, participant: ParticipantId, message: ServerMessage) {
        if let Some(outbox) = self.inner.outboxes.read().await.get(&participant)
            && let Err(e) = outbox.send(message)
        {
            warn!(%participant, error = %e, "Failed send");
        }
    }

    async fn broadcast_presence(&self) {
        let outboxes = self.inner.outboxes.read().await;
        let count = outboxes.len();
        for (participant, outbox) in outboxes.iter() {
            if let Err(e) = outbox.send(ServerMessage::UpdatePlayerCount { count }) {
                warn!(%participant, error = %e, "Failed presence update");
            }
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

async fn expire_later(shared: Weak<Shared>, room: RoomId, ticket: TurnTicket) {
    let Some(inner) = shared.upgrade() else {
        return;
    };
    if let Err(e) = (SessionManager { inner }).expire(&room, ticket).await {
        debug!(%room, error = %e, "Expiry had no effect");
    }
}
