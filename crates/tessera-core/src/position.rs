//! Mailbox position state and read-only queries.

use std::fmt;

use crate::attacks::king_in_check;
use crate::castle_rights::CastleRights;
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::PositionError;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;
use crate::zobrist;

/// An 8x8 grid of optional pieces, indexed `[row][col]`.
pub type Grid = [[Option<Piece>; 8]; 8];

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Complete position state.
///
/// The side to move is not part of the position: every operation that needs
/// it takes the color explicitly. The hash, however, does fold in the side to
/// move, so it changes every ply.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    grid: Grid,
    castling: CastleRights,
    /// Square of the pawn that double-stepped on the previous ply.
    en_passant: Option<Square>,
    /// Cached king squares, indexed by [`Color::index()`].
    king_location: [Square; Color::COUNT],
    /// Last move committed through `apply_move`; display only.
    last_move: Option<Move>,
    hash: u64,
}

impl Position {
    /// An empty board with no rights, hashed for White to move.
    ///
    /// King locations point at a1/h8 until kings are placed. Fill it with
    /// [`Position::put`].
    pub fn empty() -> Position {
        Position {
            grid: [[None; 8]; 8],
            castling: CastleRights::NONE,
            en_passant: None,
            king_location: [Square::new(0, 0), Square::new(7, 7)],
            last_move: None,
            hash: zobrist::castling(CastleRights::NONE.bits()),
        }
    }

    /// The standard starting position, White to move.
    pub fn starting() -> Position {
        let mut pos = Position::empty();
        for color in Color::ALL {
            for (col, kind) in BACK_RANK.into_iter().enumerate() {
                pos.place(Square::new(color.home_row(), col as u8), Piece::new(kind, color));
                pos.place(
                    Square::new(color.pawn_row(), col as u8),
                    Piece::new(PieceKind::Pawn, color),
                );
            }
        }
        pos.set_castling(CastleRights::ALL);
        pos
    }

    /// Return the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.col() as usize]
    }

    /// Return `true` if no piece stands on `sq`.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Return `true` if `sq` holds a piece of the side opposing `color`.
    #[inline]
    pub fn has_enemy(&self, sq: Square, color: Color) -> bool {
        self.piece_at(sq).is_some_and(|p| p.color != color)
    }

    /// Return `true` if `sq` holds a piece of `color`.
    #[inline]
    pub fn has_own(&self, sq: Square, color: Color) -> bool {
        self.piece_at(sq).is_some_and(|p| p.color == color)
    }

    /// Cached king square for `color`.
    #[inline]
    pub fn king_location(&self, color: Color) -> Square {
        self.king_location[color.index()]
    }

    /// Return the current castling rights.
    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    /// Square of the pawn that may be captured en passant, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Column of the pawn that may be captured en passant, if any.
    #[inline]
    pub fn en_passant_file(&self) -> Option<u8> {
        self.en_passant.map(Square::col)
    }

    /// Return the Zobrist hash of the position, side to move included.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Last move committed through [`apply_move`](crate::apply_move).
    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Borrow the raw grid.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Iterate over every occupied square with its piece, a1 first.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Return `true` if `mv` removes an enemy piece, en passant included.
    pub fn is_capture(&self, mv: Move) -> bool {
        !self.is_empty(mv.dest()) || self.is_en_passant(mv)
    }

    /// Return `true` if `mv` is a pawn moving diagonally onto an empty square.
    pub fn is_en_passant(&self, mv: Move) -> bool {
        self.piece_at(mv.source())
            .is_some_and(|p| p.kind == PieceKind::Pawn)
            && mv.col_delta() != 0
            && self.is_empty(mv.dest())
    }

    /// Return `true` if `mv` is a king moving two files.
    pub fn is_castle(&self, mv: Move) -> bool {
        self.piece_at(mv.source())
            .is_some_and(|p| p.kind == PieceKind::King)
            && mv.col_delta().abs() == 2
    }

    /// Validate the structural integrity of the position for `side` to move.
    pub fn validate(&self, side: Color) -> Result<(), PositionError> {
        for color in Color::ALL {
            let count = self
                .occupied()
                .filter(|(_, p)| p.kind == PieceKind::King && p.color == color)
                .count() as u32;
            if count != 1 {
                return Err(PositionError::InvalidKingCount { color, count });
            }
            let square = self.king_location(color);
            let cached = self.piece_at(square);
            if !cached.is_some_and(|p| p.kind == PieceKind::King && p.color == color) {
                return Err(PositionError::StaleKingLocation { color, square });
            }
        }

        // the side that just moved may not have left its king attacked
        if king_in_check(self, side.flip()) {
            return Err(PositionError::OpponentInCheck { color: side.flip() });
        }

        if self
            .occupied()
            .any(|(sq, p)| p.kind == PieceKind::Pawn && (sq.row() == 0 || sq.row() == 7))
        {
            return Err(PositionError::PawnsOnBackRank);
        }

        let flagged: Vec<Square> = self
            .occupied()
            .filter(|(_, p)| p.en_passant)
            .map(|(sq, _)| sq)
            .collect();
        let consistent = match (self.en_passant, flagged.as_slice()) {
            (None, []) => true,
            (Some(ep), [only]) => {
                ep == *only && self.piece_at(ep).is_some_and(|p| p.kind == PieceKind::Pawn)
            }
            _ => false,
        };
        if !consistent {
            return Err(PositionError::InconsistentEnPassant);
        }

        let expected = zobrist::hash_from_scratch(self, side);
        if self.hash != expected {
            return Err(PositionError::HashMismatch {
                stored: self.hash,
                expected,
            });
        }
        Ok(())
    }

    /// Return a pretty-printable wrapper for this position.
    pub fn pretty(&self) -> PrettyPosition<'_> {
        PrettyPosition(self)
    }

    /// Set or clear one square, keeping the hash and king cache current.
    ///
    /// Castling rights and the en passant square are left untouched.
    pub fn put(&mut self, sq: Square, piece: Option<Piece>) {
        self.take(sq);
        if let Some(piece) = piece {
            self.place(sq, piece);
        }
    }

    /// Put `piece` on an empty square, hashing it in.
    pub(crate) fn place(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.is_empty(sq), "place on occupied {sq}");
        self.grid[sq.row() as usize][sq.col() as usize] = Some(piece);
        self.hash ^= zobrist::piece_square(piece.index(), sq.index());
        if piece.kind == PieceKind::King {
            self.king_location[piece.color.index()] = sq;
        }
    }

    /// Remove and return the piece on `sq`, hashing it out.
    pub(crate) fn take(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.grid[sq.row() as usize][sq.col() as usize].take()?;
        self.hash ^= zobrist::piece_square(piece.index(), sq.index());
        Some(piece)
    }

    /// Mutable access to a piece's state flags. Kind and color must not change.
    pub(crate) fn piece_mut(&mut self, sq: Square) -> Option<&mut Piece> {
        self.grid[sq.row() as usize][sq.col() as usize].as_mut()
    }

    /// Replace castling rights, folding the change into the hash.
    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.hash ^= zobrist::castling(self.castling.bits()) ^ zobrist::castling(rights.bits());
        self.castling = rights;
    }

    /// Replace the en passant pawn, updating both the pawn flags and the hash.
    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        if let Some(old) = self.en_passant.take() {
            if let Some(p) = self.piece_mut(old) {
                p.en_passant = false;
            }
            self.hash ^= zobrist::en_passant_file(old.col());
        }
        if let Some(new) = sq {
            if let Some(p) = self.piece_mut(new) {
                p.en_passant = true;
            }
            self.hash ^= zobrist::en_passant_file(new.col());
            self.en_passant = Some(new);
        }
    }

    /// Toggle the side-to-move key.
    #[inline]
    pub(crate) fn flip_side_hash(&mut self) {
        self.hash ^= zobrist::side_to_move();
    }

    /// Raw grid write with no hash bookkeeping. Used by undo.
    #[inline]
    pub(crate) fn set_square_raw(&mut self, sq: Square, piece: Option<Piece>) {
        self.grid[sq.row() as usize][sq.col() as usize] = piece;
    }

    /// Restore scalar state saved in an undo record.
    pub(crate) fn restore_raw(
        &mut self,
        castling: CastleRights,
        en_passant: Option<Square>,
        hash: u64,
    ) {
        self.castling = castling;
        self.en_passant = en_passant;
        self.hash = hash;
    }

    #[inline]
    pub(crate) fn set_king_location(&mut self, color: Color, sq: Square) {
        self.king_location[color.index()] = sq;
    }

    #[inline]
    pub(crate) fn set_last_move(&mut self, mv: Option<Move>) {
        self.last_move = mv;
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::starting()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Position(\"{} {} {}\")",
            self.placement_fen(),
            self.castling,
            self.en_passant.map_or("-".to_string(), |sq| sq.to_string())
        )
    }
}

/// Wrapper for pretty-printing a position as an 8x8 grid.
pub struct PrettyPosition<'a>(&'a Position);

impl fmt::Display for PrettyPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0u8..8).rev() {
            write!(f, "{}  ", row + 1)?;
            for col in 0u8..8 {
                let c = self
                    .0
                    .piece_at(Square::new(row, col))
                    .map_or('.', Piece::fen_char);
                if col < 7 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::castle_rights::CastleRights;
    use crate::chess_move::Move;
    use crate::color::Color;
    use crate::error::PositionError;
    use crate::piece::Piece;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;
    use crate::zobrist::hash_from_scratch;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn starting_position_validates() {
        Position::starting().validate(Color::White).unwrap();
    }

    #[test]
    fn starting_position_layout() {
        let pos = Position::starting();
        assert_eq!(pos.piece_at(sq("e1")).unwrap().kind, PieceKind::King);
        assert_eq!(pos.piece_at(sq("d8")).unwrap().kind, PieceKind::Queen);
        assert_eq!(pos.piece_at(sq("d8")).unwrap().color, Color::Black);
        assert!(pos.is_empty(sq("e4")));
        assert_eq!(pos.king_location(Color::White), sq("e1"));
        assert_eq!(pos.king_location(Color::Black), sq("e8"));
        assert_eq!(pos.castling(), CastleRights::ALL);
        assert_eq!(pos.occupied().count(), 32);
        assert!(pos.occupied().all(|(_, p)| !p.moved && !p.en_passant));
    }

    #[test]
    fn own_and_enemy_queries() {
        let pos = Position::starting();
        assert!(pos.has_own(sq("a2"), Color::White));
        assert!(pos.has_enemy(sq("a7"), Color::White));
        assert!(!pos.has_enemy(sq("a3"), Color::White));
        assert!(!pos.has_own(sq("a7"), Color::White));
    }

    #[test]
    fn move_shape_queries() {
        let pos = Position::starting();
        assert!(!pos.is_capture(Move::new(sq("e2"), sq("e4"))));
        assert!(pos.is_capture(Move::new(sq("d1"), sq("d7"))));
        assert!(pos.is_castle(Move::new(sq("e1"), sq("g1"))));
        assert!(!pos.is_castle(Move::new(sq("d1"), sq("f1"))));
    }

    #[test]
    fn validate_detects_stale_hash() {
        let mut pos = Position::starting();
        pos.flip_side_hash();
        assert!(matches!(
            pos.validate(Color::White),
            Err(PositionError::HashMismatch { .. })
        ));
        pos.validate(Color::Black).unwrap();
    }

    #[test]
    fn validate_detects_missing_king() {
        let mut pos = Position::starting();
        pos.take(sq("e8"));
        assert_eq!(
            pos.validate(Color::White),
            Err(PositionError::InvalidKingCount {
                color: Color::Black,
                count: 0
            })
        );
    }

    #[test]
    fn validate_rejects_side_not_to_move_in_check() {
        let mut pos = Position::empty();
        pos.put(sq("e1"), Some(Piece::new(PieceKind::King, Color::White)));
        pos.put(sq("e8"), Some(Piece::new(PieceKind::King, Color::Black)));
        pos.put(sq("e2"), Some(Piece::new(PieceKind::Rook, Color::White)));
        assert_eq!(
            pos.validate(Color::White),
            Err(PositionError::OpponentInCheck { color: Color::Black })
        );
        assert!(Position::from_fen("4k3/8/8/8/8/8/4R3/4K3 w - - 0 1").is_err());
        // the same board is fine with the checked side to move
        let (pos, side) = Position::from_fen("4k3/8/8/8/8/8/4R3/4K3 b - - 0 1").unwrap();
        pos.validate(side).unwrap();
    }

    #[test]
    fn empty_and_put_build_a_valid_position() {
        let mut pos = Position::empty();
        pos.put(sq("g1"), Some(Piece::new(PieceKind::King, Color::White)));
        pos.put(sq("b8"), Some(Piece::new(PieceKind::King, Color::Black)));
        pos.put(sq("d4"), Some(Piece::new(PieceKind::Knight, Color::White)));
        // overwrite, then clear
        pos.put(sq("d4"), Some(Piece::new(PieceKind::Bishop, Color::Black)));
        pos.put(sq("c6"), Some(Piece::new(PieceKind::Pawn, Color::White).with_moved(true)));
        pos.put(sq("c6"), None);
        assert_eq!(pos.king_location(Color::White), sq("g1"));
        assert_eq!(pos.king_location(Color::Black), sq("b8"));
        assert_eq!(pos.piece_at(sq("d4")).unwrap().kind, PieceKind::Bishop);
        assert!(pos.is_empty(sq("c6")));
        pos.validate(Color::White).unwrap();
        assert_eq!(pos.hash(), hash_from_scratch(&pos, Color::White));
        assert_eq!(pos.to_fen(Color::White), "1k6/8/8/8/3b4/8/8/6K1 w - - 0 1");
    }

    #[test]
    fn pretty_print() {
        let pretty = format!("{}", Position::starting().pretty());
        let lines: Vec<&str> = pretty.lines().collect();
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[7], "1  R N B Q K B N R");
        assert_eq!(lines[8], "   a b c d e f g h");
    }
}
