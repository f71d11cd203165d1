//! Killer move table and history heuristic for quiet move ordering.

use tessera_core::{Move, PieceKind, Square};

use crate::search::negamax::MAX_PLY;

/// Two killer moves per ply: quiet moves that caused beta cutoffs.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl KillerTable {
    /// Create an empty killer table.
    pub fn new() -> Self {
        Self {
            slots: [[Move::NULL; 2]; MAX_PLY],
        }
    }

    /// Store a killer move at the given ply.
    ///
    /// Shifts slot 0 to slot 1 if the new move differs from slot 0.
    pub fn store(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        if self.slots[ply][0] != mv {
            self.slots[ply][1] = self.slots[ply][0];
            self.slots[ply][0] = mv;
        }
    }

    /// Check if a move is a killer at the given ply.
    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        if ply >= MAX_PLY || mv.is_null() {
            return false;
        }
        self.slots[ply][0] == mv || self.slots[ply][1] == mv
    }

    pub fn clear(&mut self) {
        self.slots = [[Move::NULL; 2]; MAX_PLY];
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Maximum history score (prevents overflow and keeps quiets below killers).
pub(crate) const HISTORY_MAX: i32 = 8_000;

/// History heuristic table indexed by `[piece_kind][to_square]`.
///
/// Rewards quiet moves that cause beta cutoffs anywhere in the tree.
pub struct HistoryTable {
    table: [[i32; 64]; PieceKind::COUNT],
}

impl HistoryTable {
    /// Create a zeroed history table.
    pub fn new() -> Self {
        Self {
            table: [[0; 64]; PieceKind::COUNT],
        }
    }

    /// Reward a quiet move that caused a beta cutoff at `depth`.
    pub fn reward(&mut self, piece: PieceKind, to: Square, depth: u8) {
        let bonus = (depth as i32) * (depth as i32);
        let entry = &mut self.table[piece.index()][to.index()];
        *entry = (*entry + bonus).min(HISTORY_MAX);
    }

    /// History score for a quiet move.
    pub fn score(&self, piece: PieceKind, to: Square) -> i32 {
        self.table[piece.index()][to.index()]
    }

    pub fn clear(&mut self) {
        self.table = [[0; 64]; PieceKind::COUNT];
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn killer_store_and_check() {
        let mut kt = KillerTable::new();
        kt.store(5, mv("e2e4"));
        assert!(kt.is_killer(5, mv("e2e4")));
        assert!(!kt.is_killer(5, mv("d2d4")));

        kt.store(5, mv("d2d4"));
        assert!(kt.is_killer(5, mv("e2e4")));
        assert!(kt.is_killer(5, mv("d2d4")));

        // third killer pushes out the oldest
        kt.store(5, mv("g1f3"));
        assert!(!kt.is_killer(5, mv("e2e4")));
    }

    #[test]
    fn killer_same_move_no_shift() {
        let mut kt = KillerTable::new();
        kt.store(0, mv("e2e4"));
        kt.store(0, mv("d2d4"));
        kt.store(0, mv("d2d4"));
        assert!(kt.is_killer(0, mv("e2e4")));
        assert!(kt.is_killer(0, mv("d2d4")));
    }

    #[test]
    fn killers_are_per_ply() {
        let mut kt = KillerTable::new();
        kt.store(3, mv("e2e4"));
        assert!(kt.is_killer(3, mv("e2e4")));
        assert!(!kt.is_killer(4, mv("e2e4")));
        assert!(!kt.is_killer(0, Move::NULL));
        kt.store(MAX_PLY, mv("e2e4"));
        kt.clear();
        assert!(!kt.is_killer(3, mv("e2e4")));
    }

    #[test]
    fn history_grows_by_depth_squared() {
        let mut ht = HistoryTable::new();
        let f3: Square = "f3".parse().unwrap();
        assert_eq!(ht.score(PieceKind::Knight, f3), 0);
        ht.reward(PieceKind::Knight, f3, 4);
        assert_eq!(ht.score(PieceKind::Knight, f3), 16);
        ht.reward(PieceKind::Knight, f3, 3);
        assert_eq!(ht.score(PieceKind::Knight, f3), 25);
        assert_eq!(ht.score(PieceKind::Bishop, f3), 0);
    }

    #[test]
    fn history_clamped() {
        let mut ht = HistoryTable::new();
        let a1 = Square::new(0, 0);
        for _ in 0..500 {
            ht.reward(PieceKind::Pawn, a1, 10);
        }
        assert_eq!(ht.score(PieceKind::Pawn, a1), HISTORY_MAX);
        ht.clear();
        assert_eq!(ht.score(PieceKind::Pawn, a1), 0);
    }
}
