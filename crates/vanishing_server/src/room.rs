//! Rooms: two seated participants and their authoritative match.

use crate::timer::{TurnTicket, TurnTimer};
use crate::{Outbox, ParticipantId, RoomId, ServerMessage};
use tracing::{debug, warn};
use vanishing_tictactoe::{MatchState, Symbol};

/// A participant's place in a room.
#[derive(Debug, Clone)]
pub struct Seat {
    /// Who sits here.
    pub id: ParticipantId,
    outbox: Outbox,
}

impl Seat {
    /// Seats a participant with their outgoing channel.
    pub fn new(id: ParticipantId, outbox: Outbox) -> Self {
        Self { id, outbox }
    }
}

/// Authoritative pairing of two participants.
///
/// `seats[0]` plays `X` and `seats[1]` plays `O`; a rematch may swap them.
/// Only the session manager mutates a room, and only while holding the
/// room's lock.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    seats: [Seat; 2],
    state: MatchState,
    last_actor: Option<ParticipantId>,
    round: u64,
    closed: bool,
    pub(crate) timer: TurnTimer,
}

impl Room {
    /// Pairs two participants; the first queued plays `X`.
    pub fn new(id: RoomId, first: Seat, second: Seat) -> Self {
        Self {
            id,
            seats: [first, second],
            state: MatchState::new(),
            last_actor: None,
            round: 0,
            closed: false,
            timer: TurnTimer::default(),
        }
    }

    /// Returns the room id.
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Returns the match state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    /// Participant who made the last accepted move this round.
    pub fn last_actor(&self) -> Option<ParticipantId> {
        self.last_actor
    }

    pub(crate) fn set_last_actor(&mut self, actor: ParticipantId) {
        self.last_actor = Some(actor);
    }

    /// Rematch counter.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Whether the room was removed from the registry.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
        self.timer.cancel();
    }

    /// Both participants, `X` first.
    pub fn players(&self) -> [ParticipantId; 2] {
        [self.seats[0].id, self.seats[1].id]
    }

    /// Whether `id` is seated here.
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.seats.iter().any(|s| s.id == id)
    }

    /// Symbol held by `id`.
    pub fn symbol_of(&self, id: ParticipantId) -> Option<Symbol> {
        match self.seats.iter().position(|s| s.id == id) {
            Some(0) => Some(Symbol::X),
            Some(_) => Some(Symbol::O),
            None => None,
        }
    }

    /// Participant holding `symbol`.
    pub fn holder(&self, symbol: Symbol) -> ParticipantId {
        match symbol {
            Symbol::X => self.seats[0].id,
            Symbol::O => self.seats[1].id,
        }
    }

    /// Participant whose turn it is.
    pub fn turn_holder(&self) -> ParticipantId {
        self.holder(self.state.active_symbol())
    }

    /// The other seated participant.
    pub fn opponent_of(&self, id: ParticipantId) -> Option<ParticipantId> {
        self.contains(id)
            .then(|| self.seats.iter().find(|s| s.id != id).map(|s| s.id))
            .flatten()
    }

    /// Ticket for the current turn.
    pub fn ticket(&self) -> TurnTicket {
        TurnTicket {
            round: self.round,
            turn: self.state.turn_count(),
        }
    }

    /// Swaps which participant holds `X`.
    pub(crate) fn swap_seats(&mut self) {
        self.seats.swap(0, 1);
    }

    /// Resets the board for another round.
    pub(crate) fn next_round(&mut self) {
        self.timer.cancel();
        self.state.reset();
        self.last_actor = None;
        self.round += 1;
    }

    /// Sends to one seated participant.
    pub fn unicast(&self, id: ParticipantId, message: ServerMessage) {
        match self.seats.iter().find(|s| s.id == id) {
            Some(seat) => {
                if let Err(e) = seat.outbox.send(message) {
                    warn!(room = %self.id, participant = %id, error = %e, "Failed unicast");
                }
            }
            None => debug!(room = %self.id, participant = %id, "Unicast to unseated participant"),
        }
    }

    /// Sends to both seats.
    pub fn broadcast(&self, message: ServerMessage) {
        for seat in &self.seats {
            if let Err(e) = seat.outbox.send(message.clone()) {
                warn!(room = %self.id, participant = %seat.id, error = %e, "Failed broadcast");
            }
        }
    }
}
