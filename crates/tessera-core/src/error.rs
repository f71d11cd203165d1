//! Error types for FEN parsing, position validation and move application.

use crate::chess_move::Move;
use crate::color::Color;
use crate::square::Square;

/// Errors that occur when parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// The FEN string has fewer than 4 or more than 6 space-separated fields.
    #[error("expected 4 to 6 FEN fields, found {found}")]
    WrongFieldCount {
        /// Number of fields found.
        found: usize,
    },
    /// The piece placement section does not have exactly 8 ranks.
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount {
        /// Number of ranks found.
        found: usize,
    },
    /// A rank in the piece placement describes more or fewer than 8 squares.
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength {
        /// Zero-based rank index (0 = rank 8 in FEN, 7 = rank 1).
        rank_index: usize,
        /// Number of squares described.
        length: usize,
    },
    /// An unrecognized character appeared in the piece placement.
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar {
        /// The invalid character.
        character: char,
    },
    /// The active color field is not "w" or "b".
    #[error("invalid active color: \"{found}\"")]
    InvalidColor {
        /// The invalid color string.
        found: String,
    },
    /// An unrecognized character appeared in the castling rights field.
    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar {
        /// The invalid character.
        character: char,
    },
    /// The en passant field is not "-" or a target square with a capturable pawn behind it.
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant {
        /// The invalid en passant string.
        found: String,
    },
    /// The parsed position fails structural validation.
    #[error("invalid position: {source}")]
    InvalidPosition {
        /// The underlying validation error.
        #[from]
        source: PositionError,
    },
}

/// Errors from structural validation of a [`Position`](crate::position::Position).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// A side does not have exactly one king.
    #[error("expected 1 king for {color}, found {count}")]
    InvalidKingCount {
        /// Which side has the wrong king count.
        color: Color,
        /// Number of kings found.
        count: u32,
    },
    /// The cached king location does not hold that side's king.
    #[error("king location cache for {color} points at {square}")]
    StaleKingLocation {
        /// Side whose cache is stale.
        color: Color,
        /// Square the cache points at.
        square: Square,
    },
    /// The side not to move has its king attacked.
    #[error("{color} is in check but not to move")]
    OpponentInCheck {
        /// Side whose king is attacked.
        color: Color,
    },
    /// Pawns occupy the first or eighth rank.
    #[error("pawns found on back rank")]
    PawnsOnBackRank,
    /// More than one pawn carries the en passant flag, or the flag disagrees with the recorded square.
    #[error("inconsistent en passant state")]
    InconsistentEnPassant,
    /// The stored hash differs from a from-scratch recomputation.
    #[error("hash {stored:#018x} differs from recomputed {expected:#018x}")]
    HashMismatch {
        /// Incrementally maintained value.
        stored: u64,
        /// Value recomputed from the board.
        expected: u64,
    },
}

/// Errors returned by [`apply_move`](crate::apply_move).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// There is no piece on the source square.
    #[error("no piece on {0}")]
    EmptySource(Square),
    /// The move is not legal for the piece on its source square.
    #[error("illegal move {0}")]
    Illegal(Move),
}
