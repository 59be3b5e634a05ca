//! Snapshot building for network transmission

use crate::ws::protocol::{BodySnapshot, MatchSnapshot, PaddleSnapshot};

use super::body::{Paddle, RigidBody};
use super::state::{MatchState, Phase};

/// Timer value for phases that are not active
const INACTIVE: f64 = -1.0;

/// Builds per-tick state snapshots
pub struct SnapshotBuilder;

impl SnapshotBuilder {
    /// Snapshot of `state` as seen at match-clock time `now`
    pub fn build(tick: u64, state: &MatchState, now: f64) -> MatchSnapshot {
        let mut countdown = INACTIVE;
        let mut ready_countdown = INACTIVE;
        let mut gameover_countdown = INACTIVE;
        let mut ready = [false; 2];
        let mut goal_scorer = 0;
        let mut winner = 0;

        match state.phase {
            Phase::Ready { deadline, ready: flags } => {
                ready_countdown = whole_seconds_left(deadline, now);
                ready = flags;
            }
            Phase::Countdown { ends_at } => {
                countdown = (ends_at - now).max(0.0);
            }
            Phase::Goal { scorer, .. } | Phase::Reach { scorer, .. } => {
                goal_scorer = scorer.number();
            }
            Phase::GameOver {
                winner: seat,
                deadline,
                rematch,
            } => {
                gameover_countdown = whole_seconds_left(deadline, now);
                ready = rematch;
                goal_scorer = seat.number();
                winner = seat.number();
            }
            Phase::WaitingPlayers | Phase::Playing => {}
        }

        MatchSnapshot {
            tick,
            generation: state.generation,
            score1: state.score1,
            score2: state.score2,
            phase: state.phase.name().to_string(),
            countdown,
            ready_countdown,
            gameover_countdown,
            ready1: ready[0],
            ready2: ready[1],
            goal_scorer,
            winner,
            player1_name: state.player1_name.clone(),
            player2_name: state.player2_name.clone(),
            is_deuce: state.is_deuce,
            player1_reach: state.player1_reach,
            player2_reach: state.player2_reach,
            puck: body_snapshot(&state.puck),
            paddle1: paddle_snapshot(&state.paddle1),
            paddle2: paddle_snapshot(&state.paddle2),
        }
    }
}

fn whole_seconds_left(deadline: f64, now: f64) -> f64 {
    (deadline - now).max(0.0).ceil()
}

fn body_snapshot(body: &RigidBody) -> BodySnapshot {
    BodySnapshot {
        x: body.x,
        y: body.y,
        vx: body.vx,
        vy: body.vy,
        radius: body.radius,
        spin: body.spin,
        spin_angle: body.spin_angle,
    }
}

fn paddle_snapshot(paddle: &Paddle) -> PaddleSnapshot {
    PaddleSnapshot {
        body: body_snapshot(&paddle.body),
        target_x: paddle.target_x,
        target_y: paddle.target_y,
        spin_direction: paddle.spin_direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Seat;

    #[test]
    fn test_waiting_snapshot_has_inactive_timers() {
        let snapshot = SnapshotBuilder::build(1, &MatchState::default(), 0.0);

        assert_eq!(snapshot.phase, "waiting_players");
        assert_eq!(snapshot.countdown, -1.0);
        assert_eq!(snapshot.ready_countdown, -1.0);
        assert_eq!(snapshot.gameover_countdown, -1.0);
        assert_eq!(snapshot.puck.radius, 15.0);
        assert_eq!(snapshot.paddle2.body.radius, 30.0);
    }

    #[test]
    fn test_ready_snapshot() {
        let mut state = MatchState::default();
        state.phase = Phase::Ready {
            deadline: 20.0,
            ready: [true, false],
        };

        let snapshot = SnapshotBuilder::build(5, &state, 0.5);

        assert_eq!(snapshot.ready_countdown, 20.0);
        assert!(snapshot.ready1);
        assert!(!snapshot.ready2);
    }

    #[test]
    fn test_countdown_snapshot() {
        let mut state = MatchState::default();
        state.phase = Phase::Countdown { ends_at: 3.0 };

        let snapshot = SnapshotBuilder::build(5, &state, 1.0);

        assert_eq!(snapshot.countdown, 2.0);
    }

    #[test]
    fn test_gameover_snapshot() {
        let mut state = MatchState::default();
        state.phase = Phase::GameOver {
            winner: Seat::Two,
            deadline: 30.0,
            rematch: [false, true],
        };

        let snapshot = SnapshotBuilder::build(5, &state, 15.2);

        assert_eq!(snapshot.phase, "gameover");
        assert_eq!(snapshot.winner, 2);
        assert_eq!(snapshot.goal_scorer, 2);
        assert_eq!(snapshot.gameover_countdown, 15.0);
        assert!(snapshot.ready2);
    }

    #[test]
    fn test_paddle_snapshot_flattens_body() {
        let snapshot = SnapshotBuilder::build(1, &MatchState::default(), 0.0);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["paddle1"]["x"], 100.0);
        assert_eq!(json["paddle1"]["target_x"], 100.0);
        assert_eq!(json["paddle1"]["spin_direction"], 0);
    }
}
