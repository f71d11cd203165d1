//! Transposition table keyed by the full Zobrist hash.
//!
//! One entry per slot, indexed by the low bits of the hash. The full key is
//! kept in the entry so index collisions are detected on probe. Mate scores
//! are stored relative to the node and rebased to root distance on probe.

use tessera_core::Move;

use crate::search::negamax::MATE_THRESHOLD;

/// Bound type stored in a TT entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound {
    /// No bound information (empty entry).
    #[default]
    None,
    /// The stored score is exact (PV node).
    Exact,
    /// The stored score is a lower bound (failed high / beta cutoff).
    LowerBound,
    /// The stored score is an upper bound (failed low / all-node).
    UpperBound,
}

/// Result of a successful TT probe.
#[derive(Debug, Clone, Copy)]
pub struct TtProbeResult {
    /// Best move from a previous search of this position (may be null).
    pub best_move: Move,
    /// Search depth of the stored entry.
    pub depth: u8,
    /// Bound type (exact, lower, or upper).
    pub bound: Bound,
    /// Score, already rebased to the probing ply.
    pub score: i32,
}

/// Convert a search score to TT-storable form.
///
/// Mate scores are path-dependent: `MATE_SCORE - ply` changes with the
/// path from the root. Storing distance-from-node keeps them reusable.
pub fn score_to_tt(score: i32, ply: u8) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Reverse of [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: u8) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Entry {
    key: u64,
    score: i32,
    mv: Move,
    depth: u8,
    bound: Bound,
    generation: u8,
}

/// Fixed-size transposition table owned by one [`Searcher`](crate::Searcher).
pub struct TranspositionTable {
    entries: Vec<Entry>,
    /// Index mask, `entries.len() - 1` (power-of-two allocation).
    mask: u64,
    generation: u8,
}

impl TranspositionTable {
    /// Create a table of roughly `mb` megabytes.
    ///
    /// The entry count is rounded down to a power of two and is at least one.
    pub fn new(mb: usize) -> Self {
        let bytes = mb * 1024 * 1024;
        let entry_size = std::mem::size_of::<Entry>();
        let num_entries = ((bytes / entry_size).next_power_of_two() >> 1).max(1);

        Self {
            entries: vec![Entry::default(); num_entries],
            mask: (num_entries - 1) as u64,
            generation: 0,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Clear all entries and reset the generation counter.
    pub fn clear(&mut self) {
        self.entries.fill(Entry::default());
        self.generation = 0;
    }

    /// Advance the generation counter. Called once per search.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn index(&self, hash: u64) -> usize {
        (hash & self.mask) as usize
    }

    /// Look up `hash`, returning `None` on an empty slot or key mismatch.
    pub fn probe(&self, hash: u64, ply: u8) -> Option<TtProbeResult> {
        let entry = &self.entries[self.index(hash)];
        if entry.bound == Bound::None || entry.key != hash {
            return None;
        }
        Some(TtProbeResult {
            best_move: entry.mv,
            depth: entry.depth,
            bound: entry.bound,
            score: score_from_tt(entry.score, ply),
        })
    }

    /// Store a search result.
    ///
    /// Replaces the slot if it is empty, belongs to an older generation,
    /// holds a shallower or equal depth, or the new bound is exact.
    pub fn store(&mut self, hash: u64, depth: u8, score: i32, best_move: Move, bound: Bound, ply: u8) {
        let generation = self.generation;
        let index = self.index(hash);
        let slot = &mut self.entries[index];

        let replace = slot.bound == Bound::None
            || slot.generation != generation
            || depth >= slot.depth
            || bound == Bound::Exact;
        if !replace {
            return;
        }

        // keep an older ordering hint when this node found no move
        let mv = if best_move.is_null() && slot.key == hash { slot.mv } else { best_move };

        *slot = Entry {
            key: hash,
            score: score_to_tt(score, ply),
            mv,
            depth,
            bound,
            generation,
        };
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("entries", &self.entries.len())
            .field("generation", &self.generation)
            .finish()
    }
}
