//! Match phase state machine: ready checks, countdowns, goals, reach,
//! deuce and game over.

use rand::Rng;

use super::constants::rules;
use super::state::{MatchState, Phase, Seat, Serve};

/// Why a match was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    ReadyTimeout,
    GameoverTimeout,
}

/// Result of driving the phase machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseEvent {
    Unchanged,
    Changed {
        from: &'static str,
        to: &'static str,
    },
    /// State replaced by a fresh `waiting_players` instance
    Reset(ResetReason),
}

impl PhaseEvent {
    fn between(from: &Phase, to: &Phase) -> Self {
        if from.name() == to.name() {
            PhaseEvent::Unchanged
        } else {
            PhaseEvent::Changed {
                from: from.name(),
                to: to.name(),
            }
        }
    }
}

/// Drives `MatchState::phase`. All times are match-clock seconds.
pub struct PhaseController;

impl PhaseController {
    /// `waiting_players → ready` once both seats are filled
    pub fn begin_ready(state: &mut MatchState, now: f64) -> PhaseEvent {
        if state.phase != Phase::WaitingPlayers {
            return PhaseEvent::Unchanged;
        }
        Self::enter_ready(state, now);
        PhaseEvent::between(&Phase::WaitingPlayers, &state.phase)
    }

    /// Ready signal from a seated player. Starts the countdown in `ready`,
    /// drives a rematch in `gameover`, ignored elsewhere.
    pub fn mark_ready<R: Rng>(state: &mut MatchState, seat: Seat, now: f64, rng: &mut R) -> PhaseEvent {
        let before = state.phase;
        match &mut state.phase {
            Phase::Ready { ready, .. } => {
                ready[seat.index()] = true;
                if ready.iter().all(|r| *r) {
                    let serve = if rng.gen_bool(0.5) {
                        Serve::SeatOne
                    } else {
                        Serve::SeatTwo
                    };
                    state.place_bodies(serve);
                    state.phase = Phase::Countdown {
                        ends_at: now + rules::COUNTDOWN,
                    };
                }
            }
            Phase::GameOver { rematch, .. } => {
                rematch[seat.index()] = true;
                if rematch.iter().all(|r| *r) {
                    let mut fresh = state.successor();
                    fresh.player1_name = std::mem::take(&mut state.player1_name);
                    fresh.player2_name = std::mem::take(&mut state.player2_name);
                    *state = fresh;
                    Self::enter_ready(state, now);
                    return PhaseEvent::Changed {
                        from: before.name(),
                        to: state.phase.name(),
                    };
                }
            }
            _ => {}
        }
        PhaseEvent::between(&before, &state.phase)
    }

    /// Clear a seat's ready or rematch flag (seat changed hands)
    pub fn clear_ready(state: &mut MatchState, seat: Seat) {
        match &mut state.phase {
            Phase::Ready { ready, .. } => ready[seat.index()] = false,
            Phase::GameOver { rematch, .. } => rematch[seat.index()] = false,
            _ => {}
        }
    }

    /// Record a goal and freeze play until the win check
    pub fn score_goal(state: &mut MatchState, scorer: Seat, now: f64) -> PhaseEvent {
        if state.phase != Phase::Playing {
            return PhaseEvent::Unchanged;
        }
        state.add_point(scorer);
        state.phase = Phase::Goal {
            scorer,
            resolve_at: now + rules::GOAL_DELAY,
        };
        PhaseEvent::between(&Phase::Playing, &state.phase)
    }

    /// Fire whichever deadline of the current phase has passed
    pub fn advance(state: &mut MatchState, now: f64) -> PhaseEvent {
        let before = state.phase;
        match before {
            Phase::Ready { deadline, .. } if now >= deadline => {
                *state = state.successor();
                return PhaseEvent::Reset(ResetReason::ReadyTimeout);
            }
            Phase::GameOver { deadline, .. } if now >= deadline => {
                *state = state.successor();
                return PhaseEvent::Reset(ResetReason::GameoverTimeout);
            }
            Phase::Countdown { ends_at } if now >= ends_at => {
                state.phase = Phase::Playing;
            }
            Phase::Goal { scorer, resolve_at } if now >= resolve_at => {
                Self::evaluate_win(state, scorer, now);
            }
            Phase::Reach { scorer, resume_at } if now >= resume_at => {
                Self::resume_after_goal(state, scorer, now);
            }
            _ => {}
        }
        PhaseEvent::between(&before, &state.phase)
    }

    /// Post-goal decision: reach display, continue, or game over.
    /// A fresh reach takes priority over deciding the match.
    pub fn evaluate_win(state: &mut MatchState, scorer: Seat, now: f64) {
        let match_point = rules::WIN_SCORE - 1;
        let (s1, s2) = (state.score1, state.score2);

        let prev_reach = [state.player1_reach, state.player2_reach];
        state.player1_reach = s1 >= match_point && s1 >= s2;
        state.player2_reach = s2 >= match_point && s2 >= s1;
        state.is_deuce = s1 >= match_point && s2 >= match_point;

        let reach_rising = Seat::BOTH
            .iter()
            .any(|seat| state.reach(*seat) && !prev_reach[seat.index()]);
        if reach_rising {
            state.phase = Phase::Reach {
                scorer,
                resume_at: now + rules::REACH_DELAY,
            };
            return;
        }

        let winner = if state.is_deuce {
            Seat::BOTH.into_iter().find(|seat| {
                state.score(*seat) >= state.score(seat.opponent()) + rules::DEUCE_LEAD
            })
        } else {
            Seat::BOTH
                .into_iter()
                .find(|seat| state.score(*seat) >= rules::WIN_SCORE)
        };

        match winner {
            Some(winner) => {
                state.phase = Phase::GameOver {
                    winner,
                    deadline: now + rules::GAMEOVER_TIMEOUT,
                    rematch: [false; 2],
                };
            }
            None => Self::resume_after_goal(state, scorer, now),
        }
    }

    fn resume_after_goal(state: &mut MatchState, scorer: Seat, now: f64) {
        state.place_after_goal(scorer);
        state.phase = Phase::Countdown {
            ends_at: now + rules::COUNTDOWN,
        };
    }

    fn enter_ready(state: &mut MatchState, now: f64) {
        state.phase = Phase::Ready {
            deadline: now + rules::READY_TIMEOUT,
            ready: [false; 2],
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn at_goal(score1: u32, score2: u32, scorer: Seat) -> MatchState {
        let mut state = MatchState::default();
        // Flags as they were after the previous goal
        let (p1, p2) = (
            score1 - (scorer == Seat::One) as u32,
            score2 - (scorer == Seat::Two) as u32,
        );
        state.player1_reach = p1 >= rules::WIN_SCORE - 1 && p1 >= p2;
        state.player2_reach = p2 >= rules::WIN_SCORE - 1 && p2 >= p1;
        state.score1 = score1;
        state.score2 = score2;
        state
    }

    #[test]
    fn test_ready_then_countdown() {
        let mut state = MatchState::default();
        let mut rng = rng();

        assert_eq!(
            PhaseController::begin_ready(&mut state, 1.0),
            PhaseEvent::Changed { from: "waiting_players", to: "ready" }
        );
        assert!(matches!(state.phase, Phase::Ready { deadline, .. } if deadline == 21.0));

        assert_eq!(PhaseController::mark_ready(&mut state, Seat::One, 2.0, &mut rng), PhaseEvent::Unchanged);
        // Repeated signal from the same seat does not count twice
        assert_eq!(PhaseController::mark_ready(&mut state, Seat::One, 2.5, &mut rng), PhaseEvent::Unchanged);

        let event = PhaseController::mark_ready(&mut state, Seat::Two, 3.0, &mut rng);
        assert_eq!(event, PhaseEvent::Changed { from: "ready", to: "countdown" });
        assert_eq!(state.phase, Phase::Countdown { ends_at: 6.0 });
        assert!(state.puck.x == 200.0 || state.puck.x == 600.0);
    }

    #[test]
    fn test_ready_ignored_outside_ready_phases() {
        let mut state = MatchState::default();
        state.phase = Phase::Playing;

        let event = PhaseController::mark_ready(&mut state, Seat::One, 0.0, &mut rng());

        assert_eq!(event, PhaseEvent::Unchanged);
        assert_eq!(state.phase, Phase::Playing);
    }

    #[test]
    fn test_ready_timeout_resets() {
        let mut state = MatchState::new(4);
        PhaseController::begin_ready(&mut state, 0.0);

        assert_eq!(PhaseController::advance(&mut state, 19.9), PhaseEvent::Unchanged);
        assert_eq!(
            PhaseController::advance(&mut state, 20.0),
            PhaseEvent::Reset(ResetReason::ReadyTimeout)
        );
        assert_eq!(state.phase, Phase::WaitingPlayers);
        assert_eq!(state.generation, 5);
    }

    #[test]
    fn test_countdown_to_playing() {
        let mut state = MatchState::default();
        state.phase = Phase::Countdown { ends_at: 3.0 };

        assert_eq!(PhaseController::advance(&mut state, 2.99), PhaseEvent::Unchanged);
        PhaseController::advance(&mut state, 3.0);
        assert_eq!(state.phase, Phase::Playing);
    }

    #[test]
    fn test_goal_waits_for_delay() {
        let mut state = MatchState::default();
        state.phase = Phase::Playing;

        PhaseController::score_goal(&mut state, Seat::Two, 10.0);
        assert_eq!(state.score2, 1);
        assert_eq!(state.phase, Phase::Goal { scorer: Seat::Two, resolve_at: 13.0 });

        assert_eq!(PhaseController::advance(&mut state, 12.0), PhaseEvent::Unchanged);
        PhaseController::advance(&mut state, 13.0);
        assert_eq!(state.phase, Phase::Countdown { ends_at: 16.0 });
        assert_eq!(state.puck.x, 200.0);
    }

    #[test]
    fn test_goal_outside_play_ignored() {
        let mut state = MatchState::default();
        state.phase = Phase::Countdown { ends_at: 1.0 };

        assert_eq!(PhaseController::score_goal(&mut state, Seat::One, 0.0), PhaseEvent::Unchanged);
        assert_eq!(state.score1, 0);
    }

    #[test]
    fn test_reach_entered_on_rising_edge() {
        let mut state = at_goal(4, 2, Seat::One);

        PhaseController::evaluate_win(&mut state, Seat::One, 0.0);

        assert!(state.player1_reach);
        assert!(!state.player2_reach);
        assert_eq!(state.phase, Phase::Reach { scorer: Seat::One, resume_at: 3.0 });

        PhaseController::advance(&mut state, 3.0);
        assert_eq!(state.phase, Phase::Countdown { ends_at: 6.0 });
        assert_eq!(state.puck.x, 600.0);
    }

    #[test]
    fn test_reach_not_repeated_while_held() {
        let mut state = at_goal(4, 3, Seat::Two);
        state.player1_reach = true;

        PhaseController::evaluate_win(&mut state, Seat::Two, 0.0);
        // (4,3): seat 1 already had reach, seat 2 has none
        assert!(matches!(state.phase, Phase::Countdown { .. }));
    }

    #[test]
    fn test_plain_win() {
        let mut state = at_goal(5, 2, Seat::One);

        PhaseController::evaluate_win(&mut state, Seat::One, 1.0);

        assert_eq!(
            state.phase,
            Phase::GameOver { winner: Seat::One, deadline: 21.0, rematch: [false; 2] }
        );
    }

    #[test]
    fn test_deuce_needs_two_point_lead() {
        let mut state = at_goal(5, 4, Seat::One);

        PhaseController::evaluate_win(&mut state, Seat::One, 0.0);

        assert!(state.is_deuce);
        assert!(matches!(state.phase, Phase::Countdown { .. }));

        state.phase = Phase::Playing;
        PhaseController::score_goal(&mut state, Seat::One, 5.0);
        PhaseController::advance(&mut state, 8.0);

        assert_eq!((state.score1, state.score2), (6, 4));
        assert!(matches!(state.phase, Phase::GameOver { winner: Seat::One, .. }));
    }

    #[test]
    fn test_level_at_match_point_enters_deuce_with_reach() {
        // (3,4) then seat 1 equalises
        let mut state = at_goal(4, 4, Seat::One);
        assert!(!state.player1_reach && state.player2_reach);

        PhaseController::evaluate_win(&mut state, Seat::One, 0.0);

        assert!(state.is_deuce);
        assert!(state.player1_reach && state.player2_reach);
        assert_eq!(state.phase, Phase::Reach { scorer: Seat::One, resume_at: 3.0 });
    }

    #[test]
    fn test_deuce_equaliser_shows_reach_again() {
        // (5,4) then seat 2 equalises: its reach flag rises again
        let mut state = at_goal(5, 5, Seat::Two);

        PhaseController::evaluate_win(&mut state, Seat::Two, 0.0);

        assert!(state.player1_reach && state.player2_reach);
        assert!(matches!(state.phase, Phase::Reach { scorer: Seat::Two, .. }));
    }

    #[test]
    fn test_rematch_replaces_state() {
        let mut state = MatchState::new(2);
        state.score1 = 5;
        state.player1_name = "alice".into();
        state.player2_name = "bob".into();
        state.phase = Phase::GameOver { winner: Seat::One, deadline: 30.0, rematch: [false; 2] };
        let mut rng = rng();

        PhaseController::mark_ready(&mut state, Seat::Two, 12.0, &mut rng);
        assert!(matches!(state.phase, Phase::GameOver { rematch: [false, true], .. }));

        let event = PhaseController::mark_ready(&mut state, Seat::One, 13.0, &mut rng);

        assert_eq!(event, PhaseEvent::Changed { from: "gameover", to: "ready" });
        assert_eq!(state.generation, 3);
        assert_eq!(state.score1, 0);
        assert_eq!(state.player1_name, "alice");
        assert_eq!(state.player2_name, "bob");
        assert_eq!(state.phase, Phase::Ready { deadline: 33.0, ready: [false; 2] });
    }

    #[test]
    fn test_gameover_timeout_resets() {
        let mut state = MatchState::default();
        state.phase = Phase::GameOver { winner: Seat::Two, deadline: 20.0, rematch: [true, false] };

        assert_eq!(
            PhaseController::advance(&mut state, 20.0),
            PhaseEvent::Reset(ResetReason::GameoverTimeout)
        );
        assert_eq!(state.phase, Phase::WaitingPlayers);
    }

    #[test]
    fn test_clear_ready_flag() {
        let mut state = MatchState::default();
        state.phase = Phase::Ready { deadline: 20.0, ready: [true, false] };

        PhaseController::clear_ready(&mut state, Seat::One);

        assert_eq!(state.phase, Phase::Ready { deadline: 20.0, ready: [false, false] });
    }
}
