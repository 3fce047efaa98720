//! The two-flip turn engine.
//!
//! One [`TurnEngine`] exists per started game. It enforces the flip
//! protocol: only the cursor's slot may flip, only hidden cards, at most
//! two per turn. A matching pair resolves immediately; a mismatch leaves
//! the buffer full (blocking further flips) until the caller invokes
//! [`TurnEngine::resolve_mismatch`] after its reveal delay.
//!
//! Every rejected flip returns `None` and leaves the engine untouched.
//! Rejections are client desync, not faults — the caller stays silent.

use crate::board::{Board, CardState};

/// A card revealed this turn, awaiting resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingFlip {
    position: usize,
    value: char,
}

/// What a second flip resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Equal values: both cards matched, the acting slot scores, the
    /// turn does not change. `complete` is `true` when this match
    /// finished the board.
    Matched { positions: [usize; 2], complete: bool },
    /// Unequal values: the cards stay face up and the buffer stays
    /// full until `resolve_mismatch` runs.
    Mismatched { positions: [usize; 2] },
}

/// Outcome of an accepted flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipResult {
    /// Position of the card just revealed.
    pub position: usize,
    /// Its token value.
    pub value: char,
    /// Present on the second flip of a turn.
    pub resolution: Option<Resolution>,
}

/// Result of a mismatch timing out: the two positions re-hidden and the
/// slot whose turn it now is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnAdvance {
    pub turn: usize,
    pub reset: [usize; 2],
}

/// Board, turn cursor, and pending-flip buffer for one game.
#[derive(Debug, Clone)]
pub struct TurnEngine {
    board: Board,
    slots: usize,
    turn: usize,
    pending: Vec<PendingFlip>,
}

impl TurnEngine {
    /// Starts a game on the given board among `slots` players.
    /// The cursor starts at slot 0.
    pub fn new(board: Board, slots: usize) -> Self {
        Self {
            board,
            slots,
            turn: 0,
            pending: Vec::with_capacity(2),
        }
    }

    /// The slot whose turn it is.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// The current board layout.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of unresolved face-up cards this turn (0, 1, or 2).
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Attempts a flip by `slot` at `position`.
    ///
    /// Returns `None` without touching any state when the flip is out of
    /// turn, the card is not hidden, the position is out of range, or
    /// two cards are already face up this turn.
    pub fn flip(&mut self, slot: usize, position: usize) -> Option<FlipResult> {
        if slot != self.turn || self.pending.len() >= 2 {
            return None;
        }
        let card = self.board.card(position)?;
        if card.state != CardState::Hidden {
            return None;
        }
        let value = card.value;

        // All guards passed — commit.
        self.board.card_mut(position)?.state = CardState::Revealed;
        self.pending.push(PendingFlip { position, value });

        let resolution = if self.pending.len() == 2 {
            Some(self.resolve_pair())
        } else {
            None
        };

        Some(FlipResult {
            position,
            value,
            resolution,
        })
    }

    /// Resolves the two buffered cards. Called only from `flip` once the
    /// buffer holds exactly two entries.
    fn resolve_pair(&mut self) -> Resolution {
        let [first, second] = [self.pending[0], self.pending[1]];
        let positions = [first.position, second.position];

        if first.value == second.value {
            for p in positions {
                if let Some(card) = self.board.card_mut(p) {
                    card.state = CardState::Matched;
                }
            }
            self.pending.clear();
            Resolution::Matched {
                positions,
                complete: self.board.is_complete(),
            }
        } else {
            // Buffer intentionally stays full: it is the guard that
            // blocks a third flip until the reveal delay elapses.
            Resolution::Mismatched { positions }
        }
    }

    /// Finishes a mismatched turn: re-hides both buffered cards, clears
    /// the buffer, and advances the cursor to `(turn + 1) % slots`.
    ///
    /// Returns `None` if there is no full mismatch pending — a stale
    /// timer fire after the buffer was cleared by a rematch is a no-op.
    pub fn resolve_mismatch(&mut self) -> Option<TurnAdvance> {
        if self.pending.len() != 2 || self.pending[0].value == self.pending[1].value {
            return None;
        }
        let reset = [self.pending[0].position, self.pending[1].position];
        for p in reset {
            if let Some(card) = self.board.card_mut(p) {
                card.state = CardState::Hidden;
            }
        }
        self.pending.clear();
        // No connectivity check: the cursor may land on a disconnected
        // slot and stay there until that player returns.
        self.turn = (self.turn + 1) % self.slots;
        Some(TurnAdvance { turn: self.turn, reset })
    }
}

/// All slots tied at the maximum score. More than one entry means the
/// game is a draw among them; the caller reports names, never breaks
/// the tie.
pub fn winners(scores: &[u32]) -> Vec<usize> {
    let Some(&max) = scores.iter().max() else {
        return Vec::new();
    };
    scores
        .iter()
        .enumerate()
        .filter(|&(_, &s)| s == max)
        .map(|(i, _)| i)
        .collect()
}
