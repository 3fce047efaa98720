//! Card and board types, plus board generation.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// The fixed token alphabet. Boards draw the first `pair_count` entries,
/// so the array must stay at least as long as the largest supported pair
/// count (20 pairs for a 5-player game).
pub const TOKENS: [char; 20] = [
    '🐶', '🐱', '🐭', '🐹', '🐰', '🦊', '🐻', '🐼', '🐨', '🐯', '🦁',
    '🐮', '🐷', '🐸', '🐵', '🐔', '🐧', '🐢', '🦉', '🦋',
];

/// Number of distinct pairs on the board for a given player count.
///
/// Unrecognized counts fall back to the smallest board rather than
/// failing — the room layer never passes anything outside 2..=5, but
/// the fallback keeps this total.
pub fn pair_count(players: usize) -> usize {
    match players {
        3 => 12,
        4 => 16,
        5 => 20,
        _ => 8,
    }
}

/// Face state of a single card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardState {
    /// Face down.
    Hidden,
    /// Face up this turn, not yet resolved.
    Revealed,
    /// Paired and out of play.
    Matched,
}

/// One card on the board. `position` is the card's index in the layout
/// and doubles as its identity on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub position: usize,
    pub value: char,
    pub state: CardState,
}

/// An ordered card layout. Length is always `2 * pair_count` and every
/// token value appears in exactly two positions.
///
/// Serializes as a plain array so clients never see a wrapper object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Generates a fresh board: the first `pairs` tokens duplicated,
    /// Fisher–Yates shuffled, every card hidden.
    ///
    /// Each call is an independent draw — nothing carries over between
    /// games, which is what makes a rematch a genuinely new layout.
    pub fn generate(pairs: usize) -> Self {
        let pairs = pairs.min(TOKENS.len());
        let mut values: Vec<char> = TOKENS[..pairs]
            .iter()
            .flat_map(|&t| [t, t])
            .collect();
        values.shuffle(&mut rand::rng());

        let cards = values
            .into_iter()
            .enumerate()
            .map(|(position, value)| Card {
                position,
                value,
                state: CardState::Hidden,
            })
            .collect();
        Self { cards }
    }

    /// Number of cards on the board.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if the board has no cards (the pre-game default).
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The card at `position`, if in range.
    pub fn card(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    pub(crate) fn card_mut(&mut self, position: usize) -> Option<&mut Card> {
        self.cards.get_mut(position)
    }

    /// `true` once every card is matched — the game-over condition.
    pub fn is_complete(&self) -> bool {
        self.cards.iter().all(|c| c.state == CardState::Matched)
    }

    /// Iterates the cards in layout order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}
