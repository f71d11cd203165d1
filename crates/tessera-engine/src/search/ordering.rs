//! Move ordering: TT move, MVV-LVA captures, killers, then history.

use tessera_core::{Move, MoveList, PieceKind, Position};

use crate::search::heuristics::{HistoryTable, KillerTable};

/// MVV-LVA scores indexed by `[victim][attacker]`.
///
/// Weights: Pawn=1, Knight=3, Bishop=3, Rook=5, Queen=9, King=0.
/// Formula: `victim_weight * 16 - attacker_weight`.
const MVV_LVA: [[i32; 6]; 6] = [
    // victim = Pawn (weight 1)
    [15, 13, 13, 11, 7, 16],
    // victim = Knight (weight 3)
    [47, 45, 45, 43, 39, 48],
    // victim = Bishop (weight 3)
    [47, 45, 45, 43, 39, 48],
    // victim = Rook (weight 5)
    [79, 77, 77, 75, 71, 80],
    // victim = Queen (weight 9)
    [143, 141, 141, 139, 135, 144],
    // victim = King (weight 0)
    [-1, -3, -3, -5, -9, 0],
];

const TT_MOVE_SCORE: i32 = 100_000;
const CAPTURE_BASE: i32 = 10_000;
const KILLER_SCORE: i32 = 9_000;

/// MVV-LVA score for a capture or promotion, `None` for a quiet move.
///
/// A promotion is scored as if it captured a queen with the pawn, on top of
/// anything it actually captures.
pub fn tactical_score(pos: &Position, mv: Move) -> Option<i32> {
    let attacker = pos.piece_at(mv.source()).map_or(PieceKind::Pawn, |p| p.kind);
    let victim = if pos.is_en_passant(mv) {
        Some(PieceKind::Pawn)
    } else {
        pos.piece_at(mv.dest()).map(|p| p.kind)
    };
    let capture = victim.map(|v| MVV_LVA[v.index()][attacker.index()]);
    let promotion = mv
        .promotion()
        .map(|_| MVV_LVA[PieceKind::Queen.index()][PieceKind::Pawn.index()]);
    match (capture, promotion) {
        (None, None) => None,
        (c, p) => Some(c.unwrap_or(0) + p.unwrap_or(0)),
    }
}

/// Score a move for the main search.
///
/// Bands, highest first: TT move (assigned by the picker), captures and
/// promotions, killers, then quiet moves by history (always below killers).
fn score_move(
    pos: &Position,
    mv: Move,
    killers: &KillerTable,
    history: &HistoryTable,
    ply: usize,
) -> i32 {
    if let Some(score) = tactical_score(pos, mv) {
        return CAPTURE_BASE + score;
    }
    if killers.is_killer(ply, mv) {
        return KILLER_SCORE;
    }
    let piece = pos.piece_at(mv.source()).map_or(PieceKind::Pawn, |p| p.kind);
    history.score(piece, mv.dest())
}

/// Incremental move picker using selection sort.
///
/// Yields moves in descending score order; only the moves actually
/// searched before a cutoff pay for the sort.
pub struct MovePicker {
    moves: [Move; 256],
    scores: [i32; 256],
    len: usize,
    cursor: usize,
}

impl MovePicker {
    /// Create a picker over `moves` for the main search.
    ///
    /// If `tt_move` is in the list it is yielded first.
    pub fn new(
        moves: &MoveList,
        pos: &Position,
        tt_move: Move,
        killers: &KillerTable,
        history: &HistoryTable,
        ply: usize,
    ) -> Self {
        let mut picker = Self::empty(moves.len());
        for (i, &mv) in moves.as_slice().iter().enumerate() {
            picker.moves[i] = mv;
            picker.scores[i] = if !tt_move.is_null() && mv == tt_move {
                TT_MOVE_SCORE
            } else {
                score_move(pos, mv, killers, history, ply)
            };
        }
        picker
    }

    /// Create a picker for quiescence: tactical moves by MVV-LVA, quiet
    /// moves after them in generation order.
    pub fn new_qsearch(moves: &MoveList, pos: &Position) -> Self {
        let mut picker = Self::empty(moves.len());
        for (i, &mv) in moves.as_slice().iter().enumerate() {
            picker.moves[i] = mv;
            picker.scores[i] = tactical_score(pos, mv).unwrap_or(i32::MIN);
        }
        picker
    }

    fn empty(len: usize) -> Self {
        Self {
            moves: [Move::NULL; 256],
            scores: [0; 256],
            len,
            cursor: 0,
        }
    }

    /// Yield the next highest-scored move, or `None` when exhausted.
    pub fn pick_next(&mut self) -> Option<Move> {
        if self.cursor >= self.len {
            return None;
        }

        let mut best_idx = self.cursor;
        for i in (self.cursor + 1)..self.len {
            if self.scores[i] > self.scores[best_idx] {
                best_idx = i;
            }
        }

        self.moves.swap(self.cursor, best_idx);
        self.scores.swap(self.cursor, best_idx);

        let mv = self.moves[self.cursor];
        self.cursor += 1;
        Some(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::generate_legal_moves;

    fn drain(mut picker: MovePicker) -> Vec<Move> {
        std::iter::from_fn(|| picker.pick_next()).collect()
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn pawn_takes_queen_scores_higher_than_queen_takes_pawn() {
        assert!(
            MVV_LVA[PieceKind::Queen.index()][PieceKind::Pawn.index()]
                > MVV_LVA[PieceKind::Pawn.index()][PieceKind::Queen.index()]
        );
    }

    #[test]
    fn lighter_attacker_preferred_for_same_victim() {
        let pxr = MVV_LVA[PieceKind::Rook.index()][PieceKind::Pawn.index()];
        let nxr = MVV_LVA[PieceKind::Rook.index()][PieceKind::Knight.index()];
        let qxr = MVV_LVA[PieceKind::Rook.index()][PieceKind::Queen.index()];
        assert!(pxr > nxr);
        assert!(nxr > qxr);
    }

    #[test]
    fn picker_yields_every_move_once() {
        let mut pos = Position::starting();
        let moves = generate_legal_moves(&mut pos, tessera_core::Color::White);
        let picked = drain(MovePicker::new(
            &moves,
            &pos,
            Move::NULL,
            &KillerTable::new(),
            &HistoryTable::new(),
            0,
        ));
        assert_eq!(picked.len(), 20);
        for m in &moves {
            assert!(picked.contains(m));
        }
    }

    #[test]
    fn ordering_bands() {
        // Qd4 can take the e5 pawn; the rook on a1 has quiet moves
        let (mut pos, side) = Position::from_fen("4k3/8/8/4p3/3Q4/8/8/R3K3 w - - 0 1").unwrap();
        let moves = generate_legal_moves(&mut pos, side);
        let mut killers = KillerTable::new();
        killers.store(3, mv("a1a7"));
        let mut history = HistoryTable::new();
        history.reward(PieceKind::Rook, "a6".parse().unwrap(), 5);

        let picked = drain(MovePicker::new(&moves, &pos, mv("e1f1"), &killers, &history, 3));
        assert_eq!(picked[0], mv("e1f1"));
        assert_eq!(picked[1], mv("d4e5"));
        assert_eq!(picked[2], mv("a1a7"));
        assert_eq!(picked[3], mv("a1a6"));
    }

    #[test]
    fn most_valuable_victim_first() {
        // the e4 pawn can take a queen on d5 or a knight on f5
        let (mut pos, side) = Position::from_fen("4k3/8/8/3q1n2/4P3/8/8/4K3 w - - 0 1").unwrap();
        let moves = generate_legal_moves(&mut pos, side);
        let picked = drain(MovePicker::new_qsearch(&moves, &pos));
        assert_eq!(picked[0], mv("e4d5"));
        assert_eq!(picked[1], mv("e4f5"));
    }

    #[test]
    fn en_passant_and_promotion_are_tactical() {
        let (pos, _) = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(tactical_score(&pos, mv("e5d6")), Some(15));
        assert_eq!(tactical_score(&pos, mv("e5e6")), None);

        let (pos, _) = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(tactical_score(&pos, mv("a7a8q")), Some(143));
    }
}
