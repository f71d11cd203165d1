//! Zobrist keys and from-scratch hashing.
//!
//! All keys come from one xorshift64 stream with a fixed seed, so hashes are
//! stable across runs and builds.

use crate::color::Color;
use crate::position::Position;

const SEED: u64 = 0x5445_5353_4552_4121; // "TESSERA!"

const PIECE_KEYS: usize = 12 * 64;
const KEY_COUNT: usize = PIECE_KEYS + 1 + 16 + 8;

/// Xorshift64 PRNG step.
const fn xorshift64(mut state: u64) -> u64 {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

static KEYS: [u64; KEY_COUNT] = {
    let mut keys = [0u64; KEY_COUNT];
    let mut state = SEED;
    let mut i = 0;
    while i < KEY_COUNT {
        state = xorshift64(state);
        keys[i] = state;
        i += 1;
    }
    keys
};

/// Key for a (piece index, square index) pair.
#[inline]
pub(crate) fn piece_square(piece_index: usize, square_index: usize) -> u64 {
    KEYS[piece_index * 64 + square_index]
}

/// Key XORed in when Black is to move.
#[inline]
pub(crate) fn side_to_move() -> u64 {
    KEYS[PIECE_KEYS]
}

/// Key for a castling-rights mask (0..16).
#[inline]
pub(crate) fn castling(bits: u8) -> u64 {
    KEYS[PIECE_KEYS + 1 + bits as usize]
}

/// Key for the column of a pawn that may be captured en passant.
#[inline]
pub(crate) fn en_passant_file(col: u8) -> u64 {
    KEYS[PIECE_KEYS + 17 + col as usize]
}

/// Hash `position` as if `side` were to move, ignoring the stored value.
pub fn hash_from_scratch(position: &Position, side: Color) -> u64 {
    let mut hash = position
        .occupied()
        .fold(0u64, |acc, (sq, piece)| acc ^ piece_square(piece.index(), sq.index()));

    if side == Color::Black {
        hash ^= side_to_move();
    }
    hash ^= castling(position.castling().bits());
    if let Some(col) = position.en_passant_file() {
        hash ^= en_passant_file(col);
    }
    hash
}
