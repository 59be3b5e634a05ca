//! Match ownership and the authoritative tick loop

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::game::constants::rink;
use crate::lobby::{JoinOutcome, LeaveOutcome, Role, SessionManager};
use crate::util::time::{tick_delta, MatchClock, TICK_DURATION_MICROS};
use crate::ws::protocol::{ClientMsg, Position, ServerMsg};

use super::phase::{PhaseController, PhaseEvent};
use super::simulation::SimulationStep;
use super::snapshot::SnapshotBuilder;
use super::state::{MatchState, Phase, Seat};
use super::{InputEvent, PlayerInput};

/// Capacity of a connection's direct outbox
pub const OUTBOX_CAPACITY: usize = 16;

/// Handle to the running match
#[derive(Clone)]
pub struct MatchHandle {
    pub input_tx: mpsc::Sender<PlayerInput>,
    pub snapshot_tx: broadcast::Sender<ServerMsg>,
    pub connection_count: Arc<AtomicUsize>,
    pub spectator_count: Arc<AtomicUsize>,
}

impl MatchHandle {
    pub fn connection_count(&self) -> usize {
        self.connection_count.load(Ordering::Relaxed)
    }

    pub fn spectator_count(&self) -> usize {
        self.spectator_count.load(Ordering::Relaxed)
    }

    /// Receiver for per-tick state broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMsg> {
        self.snapshot_tx.subscribe()
    }
}

/// The authoritative match. Sole owner of the match state and the session
/// registry; everything else reaches it through `input_tx`.
pub struct GameMatch {
    state: MatchState,
    sessions: SessionManager,
    clock: MatchClock,
    tick: u64,
    rng: ChaCha8Rng,
    /// Direct channels for per-connection messages
    outboxes: HashMap<Uuid, mpsc::Sender<ServerMsg>>,
    input_rx: mpsc::Receiver<PlayerInput>,
    snapshot_tx: broadcast::Sender<ServerMsg>,
    connection_count: Arc<AtomicUsize>,
    spectator_count: Arc<AtomicUsize>,
}

impl GameMatch {
    /// Create a new match
    pub fn new(seed: u64) -> (Self, MatchHandle) {
        let (input_tx, input_rx) = mpsc::channel(256);
        let (snapshot_tx, _) = broadcast::channel(64);
        let connection_count = Arc::new(AtomicUsize::new(0));
        let spectator_count = Arc::new(AtomicUsize::new(0));

        let handle = MatchHandle {
            input_tx,
            snapshot_tx: snapshot_tx.clone(),
            connection_count: connection_count.clone(),
            spectator_count: spectator_count.clone(),
        };

        let game_match = Self {
            state: MatchState::new(0),
            sessions: SessionManager::new(),
            clock: MatchClock::new(),
            tick: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            outboxes: HashMap::new(),
            input_rx,
            snapshot_tx,
            connection_count,
            spectator_count,
        };

        (game_match, handle)
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Current match-clock reading in seconds
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Run the authoritative tick loop until every input sender is gone
    pub async fn run(mut self) {
        info!(generation = self.state.generation, "Match loop started");

        let mut tick_interval = interval(Duration::from_micros(TICK_DURATION_MICROS));
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tick_interval.tick().await;

            // Drain input queue
            if !self.process_inputs() {
                info!("Input channel closed, stopping match loop");
                break;
            }

            self.tick();

            // Broadcast to all connected viewers; no receivers is fine
            let _ = self.snapshot_tx.send(ServerMsg::State(self.snapshot()));
        }
    }

    /// Apply every queued input. Returns false once all senders are gone.
    fn process_inputs(&mut self) -> bool {
        loop {
            match self.input_rx.try_recv() {
                Ok(input) => self.handle_input(input),
                Err(mpsc::error::TryRecvError::Empty) => return true,
                Err(mpsc::error::TryRecvError::Disconnected) => return false,
            }
        }
    }

    /// Apply one inbound event
    pub fn handle_input(&mut self, input: PlayerInput) {
        let conn_id = input.conn_id;
        match input.event {
            InputEvent::Connected { outbox } => {
                self.outboxes.insert(conn_id, outbox);
                self.connection_count.store(self.outboxes.len(), Ordering::Relaxed);
                debug!(conn_id = %conn_id, "Connection attached to match");
            }
            InputEvent::Message(ClientMsg::Join { nickname }) => self.handle_join(conn_id, &nickname),
            InputEvent::Message(ClientMsg::Move { pos, spin_direction }) => {
                self.handle_move(conn_id, pos, spin_direction)
            }
            InputEvent::Message(ClientMsg::Ready) => self.handle_ready(conn_id),
            InputEvent::Message(ClientMsg::Ping { t }) => self.send_to(conn_id, ServerMsg::Pong { t }),
            InputEvent::Disconnected => self.handle_disconnect(conn_id),
        }
    }

    /// Seat or queue a connection
    fn handle_join(&mut self, conn_id: Uuid, nickname: &str) {
        let JoinOutcome {
            role,
            nickname,
            newly_joined,
        } = self.sessions.join(conn_id, nickname);

        if newly_joined {
            info!(
                conn_id = %conn_id,
                nickname = %nickname,
                seat = role.seat().map(Seat::number).unwrap_or(0),
                "Connection joined"
            );
        } else {
            warn!(conn_id = %conn_id, "Repeated join, re-sending current seat");
        }

        if let Role::Player(seat) = role {
            self.state.set_name(seat, &nickname);
        }
        self.send_seat(conn_id, role, nickname);
        self.publish_counts();
        self.try_begin_ready();
    }

    /// Store paddle intent for a seated player
    fn handle_move(&mut self, conn_id: Uuid, pos: Option<Position>, spin_direction: f32) {
        let Some(seat) = self.sessions.seat_of(&conn_id) else {
            return;
        };

        let paddle = self.state.paddle_mut(seat);
        if let Some(pos) = pos {
            paddle.target_x = clamp_finite(pos.x, rink::WIDTH);
            paddle.target_y = clamp_finite(pos.y, rink::HEIGHT);
        }
        paddle.spin_direction = if spin_direction > 0.0 {
            1
        } else if spin_direction < 0.0 {
            -1
        } else {
            0
        };
    }

    fn handle_ready(&mut self, conn_id: Uuid) {
        let Some(seat) = self.sessions.seat_of(&conn_id) else {
            return;
        };

        let now = self.clock.now();
        let event = PhaseController::mark_ready(&mut self.state, seat, now, &mut self.rng);
        debug!(conn_id = %conn_id, seat = seat.number(), phase = self.state.phase.name(), "Ready signal");
        self.log_phase_event(event);
    }

    /// Vacate the connection's role, backfilling or resetting as needed
    fn handle_disconnect(&mut self, conn_id: Uuid) {
        self.outboxes.remove(&conn_id);
        self.connection_count.store(self.outboxes.len(), Ordering::Relaxed);

        match self.sessions.leave(conn_id) {
            LeaveOutcome::Promoted {
                seat,
                conn_id: promoted,
                nickname,
                waited,
            } => {
                info!(
                    conn_id = %conn_id,
                    promoted = %promoted,
                    seat = seat.number(),
                    waited_ms = waited.as_millis() as u64,
                    "Player left, promoted spectator"
                );
                PhaseController::clear_ready(&mut self.state, seat);
                self.state.set_name(seat, &nickname);
                self.send_seat(promoted, Role::Player(seat), nickname);
                self.try_begin_ready();
            }
            LeaveOutcome::SeatEmptied(seat) => {
                self.state = self.state.successor();
                self.sync_names();
                info!(
                    conn_id = %conn_id,
                    seat = seat.number(),
                    generation = self.state.generation,
                    "Player left with empty queue, match reset"
                );
            }
            LeaveOutcome::Dequeued => {
                debug!(conn_id = %conn_id, "Spectator left queue");
            }
            LeaveOutcome::Unknown => {
                debug!(conn_id = %conn_id, "Viewer disconnected");
            }
        }
        self.publish_counts();
    }

    /// Advance the match by one tick
    pub fn tick(&mut self) {
        self.tick += 1;
        let dt = tick_delta();
        let now = self.clock.advance(dt);

        let event = if self.state.phase == Phase::Playing {
            match SimulationStep::run(&mut self.state, dt) {
                Some(scorer) => {
                    let event = PhaseController::score_goal(&mut self.state, scorer, now);
                    info!(
                        scorer = scorer.number(),
                        score1 = self.state.score1,
                        score2 = self.state.score2,
                        "Goal"
                    );
                    event
                }
                None => PhaseEvent::Unchanged,
            }
        } else {
            PhaseController::advance(&mut self.state, now)
        };

        if let PhaseEvent::Reset(_) = event {
            // Seats survive timeouts
            self.sync_names();
        }
        self.log_phase_event(event);
    }

    /// Snapshot of the current state
    pub fn snapshot(&self) -> crate::ws::protocol::MatchSnapshot {
        SnapshotBuilder::build(self.tick, &self.state, self.clock.now())
    }

    fn try_begin_ready(&mut self) {
        if self.sessions.both_seated() {
            let event = PhaseController::begin_ready(&mut self.state, self.clock.now());
            self.log_phase_event(event);
        }
    }

    fn sync_names(&mut self) {
        for seat in Seat::BOTH {
            let name = self.sessions.seat_name(seat).to_string();
            self.state.set_name(seat, &name);
        }
    }

    fn send_seat(&self, conn_id: Uuid, role: Role, nickname: String) {
        let msg = match role {
            Role::Player(seat) => ServerMsg::Seat {
                seat: seat.number(),
                spectator: false,
                nickname,
            },
            Role::Spectator => ServerMsg::Seat {
                seat: 0,
                spectator: true,
                nickname,
            },
        };
        self.send_to(conn_id, msg);
    }

    /// Best-effort direct send; never blocks the loop
    fn send_to(&self, conn_id: Uuid, msg: ServerMsg) {
        if let Some(outbox) = self.outboxes.get(&conn_id) {
            if outbox.try_send(msg).is_err() {
                warn!(conn_id = %conn_id, "Outbox full or closed, dropping message");
            }
        }
    }

    fn publish_counts(&self) {
        self.spectator_count
            .store(self.sessions.spectator_count(), Ordering::Relaxed);
    }

    fn log_phase_event(&self, event: PhaseEvent) {
        match event {
            PhaseEvent::Unchanged => {}
            PhaseEvent::Changed { from, to } => {
                info!(
                    from,
                    to,
                    generation = self.state.generation,
                    "Phase transition"
                );
            }
            PhaseEvent::Reset(reason) => {
                info!(
                    ?reason,
                    generation = self.state.generation,
                    "Match reset to waiting_players"
                );
            }
        }
    }
}

/// Clamp a coordinate into [0, max]; non-finite values land on 0
fn clamp_finite(value: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}
