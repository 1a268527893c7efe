//! Game variants and their beats-relations.
//!
//! A variant is data, not a subclass: it selects a legal-move set over
//! [`Gesture`] and the directed winner/loser relation between moves. The
//! room carries exactly one active variant and can swap it between
//! sessions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A hand gesture a participant can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    Rock,
    Paper,
    Scissors,
    Lizard,
    Spock,
}

impl Gesture {
    /// Canonical lowercase token, as accepted on input.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
            Self::Lizard => "lizard",
            Self::Spock => "spock",
        }
    }

    /// Parses a gesture token, case-insensitively. Whitespace is the
    /// caller's problem; legality per variant is [`Variant::parse_move`]'s.
    pub fn parse(text: &str) -> Option<Self> {
        const ALL: [Gesture; 5] = [
            Gesture::Rock,
            Gesture::Paper,
            Gesture::Scissors,
            Gesture::Lizard,
            Gesture::Spock,
        ];
        ALL.into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(text))
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The active game-rule family: which gestures are legal and who beats
/// whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variant {
    /// Classic rock-paper-scissors.
    #[default]
    ThreeWay,
    /// Rock-paper-scissors-lizard-spock.
    FiveWay,
}

impl Variant {
    /// The legal-move set for this variant.
    pub fn legal_moves(self) -> &'static [Gesture] {
        use Gesture::*;
        match self {
            Self::ThreeWay => &[Rock, Paper, Scissors],
            Self::FiveWay => &[Rock, Paper, Scissors, Lizard, Spock],
        }
    }

    /// Human-readable legal-move list for rejection messages.
    pub fn legal_moves_text(self) -> &'static str {
        match self {
            Self::ThreeWay => "rock, paper, scissors",
            Self::FiveWay => "rock, paper, scissors, lizard, spock",
        }
    }

    /// Parses move text (case-insensitive, surrounding whitespace
    /// ignored) and checks it against this variant's legal set.
    pub fn parse_move(self, text: &str) -> Option<Gesture> {
        let gesture = Gesture::parse(text.trim())?;
        self.legal_moves().contains(&gesture).then_some(gesture)
    }

    /// Returns `true` if `a` beats `b` under this variant.
    ///
    /// Equal gestures never beat each other; for distinct legal gestures
    /// exactly one direction holds.
    pub fn beats(self, a: Gesture, b: Gesture) -> bool {
        use Gesture::*;
        match self {
            Self::ThreeWay => matches!(
                (a, b),
                (Rock, Scissors) | (Paper, Rock) | (Scissors, Paper)
            ),
            Self::FiveWay => matches!(
                (a, b),
                (Rock, Scissors)
                    | (Rock, Lizard)
                    | (Paper, Rock)
                    | (Paper, Spock)
                    | (Scissors, Paper)
                    | (Scissors, Lizard)
                    | (Lizard, Paper)
                    | (Lizard, Spock)
                    | (Spock, Rock)
                    | (Spock, Scissors)
            ),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThreeWay => write!(f, "RPS3"),
            Self::FiveWay => write!(f, "RPS5"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Gesture::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Gesture::parse("ROCK"), Some(Rock));
        assert_eq!(Gesture::parse("Spock"), Some(Spock));
        assert_eq!(Gesture::parse("banana"), None);
    }

    #[test]
    fn test_parse_move_trims_whitespace() {
        assert_eq!(Variant::ThreeWay.parse_move("  paper "), Some(Paper));
    }

    #[test]
    fn test_three_way_rejects_five_way_moves() {
        assert_eq!(Variant::ThreeWay.parse_move("lizard"), None);
        assert_eq!(Variant::ThreeWay.parse_move("spock"), None);
        assert_eq!(Variant::FiveWay.parse_move("lizard"), Some(Lizard));
    }

    #[test]
    fn test_three_way_beats_table() {
        let v = Variant::ThreeWay;
        assert!(v.beats(Rock, Scissors));
        assert!(v.beats(Paper, Rock));
        assert!(v.beats(Scissors, Paper));
        assert!(!v.beats(Scissors, Rock));
        assert!(!v.beats(Rock, Paper));
        assert!(!v.beats(Paper, Scissors));
    }

    #[test]
    fn test_five_way_beats_table() {
        let v = Variant::FiveWay;
        assert!(v.beats(Rock, Scissors) && v.beats(Rock, Lizard));
        assert!(v.beats(Paper, Rock) && v.beats(Paper, Spock));
        assert!(v.beats(Scissors, Paper) && v.beats(Scissors, Lizard));
        assert!(v.beats(Lizard, Paper) && v.beats(Lizard, Spock));
        assert!(v.beats(Spock, Rock) && v.beats(Spock, Scissors));
    }

    /// For any two distinct legal gestures exactly one side wins, and a
    /// gesture never beats itself. This is what makes round resolution
    /// total and deterministic.
    #[test]
    fn test_beats_relation_is_total_and_antisymmetric() {
        for v in [Variant::ThreeWay, Variant::FiveWay] {
            for &a in v.legal_moves() {
                assert!(!v.beats(a, a), "{v}: {a} beats itself");
                for &b in v.legal_moves() {
                    if a == b {
                        continue;
                    }
                    assert!(
                        v.beats(a, b) ^ v.beats(b, a),
                        "{v}: {a} vs {b} must have exactly one winner"
                    );
                }
            }
        }
    }

    #[test]
    fn test_default_variant_is_three_way() {
        assert_eq!(Variant::default(), Variant::ThreeWay);
    }
}
