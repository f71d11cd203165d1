//! Core chess state for search: mailbox positions, attack detection, move
//! generation and reversible make/undo with incremental hashing.

mod attacks;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod make_move;
pub mod movegen;
mod perft;
mod piece;
mod piece_kind;
mod position;
mod square;
mod zobrist;

pub use attacks::{PieceLookup, king_in_check, least_valuable_attacker, square_attacked};
pub use castle_rights::{CastleRights, CastleSide};
pub use chess_move::Move;
pub use color::Color;
pub use error::{FenError, MoveError, PositionError};
pub use fen::STARTING_FEN;
pub use make_move::{UndoRecord, apply_move};
pub use movegen::{MoveList, generate_legal_moves, generate_pseudo_moves, has_legal_move};
pub use perft::{divide, perft};
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use position::{Grid, Position, PrettyPosition};
pub use square::Square;
pub use zobrist::hash_from_scratch;
