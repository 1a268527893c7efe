//! Round resolution: pairing, scoring, elimination, session end.
//!
//! Resolution is two-phase. [`pair_up`] is a pure function that turns
//! the round's entries into a complete list of [`PairOutcome`]s without
//! touching any state; the actor then applies that list. A resolution
//! therefore never commits a partial pairing, no matter what the
//! outcome application does to membership.

use faceoff_protocol::{ParticipantId, Phase, Update};

use crate::room::RoomActor;
use crate::{Connection, Gesture, Variant};

/// The result of matching one pair (or one leftover) in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PairOutcome {
    /// Odd participant out; carried into the next round unchanged.
    Bye(ParticipantId),
    /// At least one side submitted no move. Nobody scores, nobody is
    /// eliminated; both advance.
    Aborted {
        first: ParticipantId,
        second: ParticipantId,
    },
    /// The stronger gesture won: winner scores, loser is eliminated.
    Decided {
        winner: ParticipantId,
        loser: ParticipantId,
        winning: Gesture,
        losing: Gesture,
    },
    /// Same gesture on both sides; both advance.
    Tie {
        first: ParticipantId,
        second: ParticipantId,
        gesture: Gesture,
    },
}

/// Pairs the round's entries in order and decides every pair.
///
/// Entries arrive in room iteration order (ascending id, which is join
/// order), so the same room state always produces the same pairing. A
/// pair with any missing gesture is aborted: no score, no elimination.
pub(crate) fn pair_up(
    variant: Variant,
    entries: &[(ParticipantId, Option<Gesture>)],
) -> Vec<PairOutcome> {
    let mut outcomes = Vec::with_capacity(entries.len().div_ceil(2));

    for pair in entries.chunks(2) {
        match *pair {
            [(id, _)] => outcomes.push(PairOutcome::Bye(id)),
            [(a, Some(ga)), (b, Some(gb))] => {
                if ga == gb {
                    outcomes.push(PairOutcome::Tie {
                        first: a,
                        second: b,
                        gesture: ga,
                    });
                } else if variant.beats(ga, gb) {
                    outcomes.push(PairOutcome::Decided {
                        winner: a,
                        loser: b,
                        winning: ga,
                        losing: gb,
                    });
                } else {
                    outcomes.push(PairOutcome::Decided {
                        winner: b,
                        loser: a,
                        winning: gb,
                        losing: ga,
                    });
                }
            }
            [(a, _), (b, _)] => outcomes.push(PairOutcome::Aborted { first: a, second: b }),
            _ => unreachable!("chunks(2) yields one or two entries"),
        }
    }

    outcomes
}

impl<C: Connection> RoomActor<C> {
    /// Closes the current round: pairs everyone up, applies the
    /// outcomes, then either starts the next round or ends the session.
    pub(crate) fn resolve_round(&mut self) {
        let entries: Vec<(ParticipantId, Option<Gesture>)> = self
            .members
            .values()
            .filter(|p| p.is_eligible())
            .map(|p| (p.id, p.gesture))
            .collect();

        tracing::info!(
            room = %self.name,
            round = self.round,
            entrants = entries.len(),
            "resolving round"
        );

        let outcomes = pair_up(self.config.variant, &entries);

        // Broadcasts during application can drop unreachable members,
        // which must not re-trigger round closing underneath us.
        self.resolving = true;
        for outcome in outcomes {
            self.apply_outcome(outcome);
        }
        self.resolving = false;

        // Everyone may have vanished mid-resolution; the removal path
        // has already torn the session down in that case.
        if !self.phase.is_active() {
            return;
        }

        let remaining = self
            .members
            .values()
            .filter(|p| p.ready && !p.eliminated && !p.spectator)
            .count();
        if remaining <= 1 {
            let winner = self
                .members
                .values()
                .find(|p| p.ready && !p.eliminated && !p.spectator)
                .map(|p| p.id);
            self.end_session(winner);
        } else {
            self.start_round();
        }
    }

    fn apply_outcome(&mut self, outcome: PairOutcome) {
        match outcome {
            PairOutcome::Bye(id) => {
                let name = self.display_name(id);
                self.broadcast_message(format!("{name} sits this round out (odd one out)"));
            }
            PairOutcome::Aborted { first, second } => {
                let a = self.display_name(first);
                let b = self.display_name(second);
                self.broadcast_message(format!(
                    "{a} vs {b}: a move was missing — match abandoned, both advance"
                ));
            }
            PairOutcome::Tie {
                first,
                second,
                gesture,
            } => {
                let a = self.display_name(first);
                let b = self.display_name(second);
                self.broadcast_message(format!("{a} and {b} both played {gesture} — tie, both advance"));
            }
            PairOutcome::Decided {
                winner,
                loser,
                winning,
                losing,
            } => {
                let winner_name = self.display_name(winner);
                let loser_name = self.display_name(loser);
                self.broadcast_message(format!(
                    "{winner_name}'s {winning} beats {loser_name}'s {losing} — {loser_name} is eliminated"
                ));

                let mut winner_points = None;
                if let Some(p) = self.members.get_mut(&winner) {
                    p.points += 1;
                    winner_points = Some(p.points);
                }
                if let Some(p) = self.members.get_mut(&loser) {
                    p.eliminated = true;
                }
                if let Some(points) = winner_points {
                    self.broadcast(Update::Points {
                        participant_id: winner,
                        points,
                    });
                }
            }
        }
    }

    /// Ends the session: announces the winner and scoreboard, resets
    /// per-session state, and returns the room to the lobby. Scores
    /// stay visible on the scoreboard until the next session zeroes
    /// them.
    pub(crate) fn end_session(&mut self, winner: Option<ParticipantId>) {
        tracing::info!(
            room = %self.name,
            round = self.round,
            winner = winner.map(|id| id.0),
            "session over"
        );
        self.cancel_ready_timer();
        self.cancel_turn_timer();

        self.broadcast_message("Game over!".to_string());
        if let Some(id) = winner {
            let name = self.display_name(id);
            self.broadcast_message(format!("{name} wins the tournament!"));
        }
        self.broadcast_scoreboard();

        for p in self.members.values_mut() {
            p.eliminated = false;
            p.gesture = None;
        }
        self.reset_ready_statuses();
        self.reset_turn_statuses();
        self.set_phase(Phase::Ready);
    }

    fn broadcast_scoreboard(&mut self) {
        let mut rows: Vec<(String, u32)> = self
            .members
            .values()
            .filter(|p| !p.spectator)
            .map(|p| (p.display_name.clone(), p.points))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut text = String::from("Scoreboard:");
        for (name, points) in rows {
            text.push_str(&format!("\n  {name}: {points}"));
        }
        self.broadcast_message(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Gesture::*;

    fn id(n: u64) -> ParticipantId {
        ParticipantId(n)
    }

    #[test]
    fn test_empty_entries_yield_no_outcomes() {
        assert!(pair_up(Variant::ThreeWay, &[]).is_empty());
    }

    #[test]
    fn test_single_entry_is_a_bye() {
        let outcomes = pair_up(Variant::ThreeWay, &[(id(1), Some(Rock))]);
        assert_eq!(outcomes, vec![PairOutcome::Bye(id(1))]);
    }

    #[test]
    fn test_pairs_form_in_entry_order() {
        let entries = [
            (id(1), Some(Rock)),
            (id(2), Some(Scissors)),
            (id(3), Some(Paper)),
            (id(4), Some(Rock)),
            (id(5), Some(Spock)),
        ];
        let outcomes = pair_up(Variant::FiveWay, &entries);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes[0],
            PairOutcome::Decided {
                winner: id(1),
                loser: id(2),
                winning: Rock,
                losing: Scissors,
            }
        );
        assert_eq!(
            outcomes[1],
            PairOutcome::Decided {
                winner: id(3),
                loser: id(4),
                winning: Paper,
                losing: Rock,
            }
        );
        assert_eq!(outcomes[2], PairOutcome::Bye(id(5)));
    }

    #[test]
    fn test_any_missing_move_aborts_the_pair() {
        for entries in [
            [(id(1), None), (id(2), Some(Scissors))],
            [(id(1), Some(Paper)), (id(2), None)],
            [(id(1), None), (id(2), None)],
        ] {
            assert_eq!(
                pair_up(Variant::ThreeWay, &entries),
                vec![PairOutcome::Aborted {
                    first: id(1),
                    second: id(2),
                }],
                "a pair with a missing move must not score or eliminate"
            );
        }
    }

    #[test]
    fn test_same_gesture_is_a_tie() {
        let outcomes = pair_up(Variant::ThreeWay, &[(id(1), Some(Paper)), (id(2), Some(Paper))]);
        assert_eq!(
            outcomes,
            vec![PairOutcome::Tie {
                first: id(1),
                second: id(2),
                gesture: Paper,
            }]
        );
    }

    #[test]
    fn test_five_way_relation_drives_the_winner() {
        let outcomes = pair_up(Variant::FiveWay, &[(id(1), Some(Lizard)), (id(2), Some(Spock))]);
        assert_eq!(
            outcomes,
            vec![PairOutcome::Decided {
                winner: id(1),
                loser: id(2),
                winning: Lizard,
                losing: Spock,
            }]
        );
    }
}
