//! Square attack detection by ray casting outward from the target.
//!
//! Nothing here generates moves: each query walks pawn, knight, slider and
//! king geometry backwards from the attacked square.

use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::{Grid, Position};
use crate::square::Square;

/// Knight jump offsets as (row, col).
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

/// King step offsets as (row, col).
pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

pub(crate) const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
pub(crate) const DIAGONAL: [(i8, i8); 4] = [(1, 1), (-1, 1), (-1, -1), (1, -1)];

/// Read-only piece lookup shared by [`Position`] and scratch grids.
pub trait PieceLookup {
    /// Return the piece on `sq`, if any.
    fn lookup(&self, sq: Square) -> Option<Piece>;
}

impl PieceLookup for Position {
    #[inline]
    fn lookup(&self, sq: Square) -> Option<Piece> {
        self.piece_at(sq)
    }
}

impl PieceLookup for Grid {
    #[inline]
    fn lookup(&self, sq: Square) -> Option<Piece> {
        self[sq.row() as usize][sq.col() as usize]
    }
}

#[inline]
fn holds(board: &impl PieceLookup, sq: Square, color: Color, kinds: &[PieceKind]) -> bool {
    board
        .lookup(sq)
        .is_some_and(|p| p.color == color && kinds.contains(&p.kind))
}

/// First occupied square along a ray from `from` (exclusive).
#[inline]
fn first_on_ray(board: &impl PieceLookup, from: Square, (dr, dc): (i8, i8)) -> Option<(Square, Piece)> {
    let mut cur = from;
    while let Some(next) = cur.offset(dr, dc) {
        if let Some(piece) = board.lookup(next) {
            return Some((next, piece));
        }
        cur = next;
    }
    None
}

fn ray_hits(
    board: &impl PieceLookup,
    sq: Square,
    by: Color,
    dirs: &[(i8, i8)],
    kinds: &[PieceKind],
) -> bool {
    dirs.iter().any(|&dir| {
        first_on_ray(board, sq, dir).is_some_and(|(_, p)| p.color == by && kinds.contains(&p.kind))
    })
}

/// Return `true` if any piece of `by` attacks `sq`.
pub fn square_attacked(board: &impl PieceLookup, sq: Square, by: Color) -> bool {
    // An attacking pawn sits one row behind `sq` from its own point of view.
    let pawn_row = -by.forward();
    if [-1, 1].into_iter().any(|dc| {
        sq.offset(pawn_row, dc)
            .is_some_and(|from| holds(board, from, by, &[PieceKind::Pawn]))
    }) {
        return true;
    }

    if KNIGHT_OFFSETS.iter().any(|&(dr, dc)| {
        sq.offset(dr, dc)
            .is_some_and(|from| holds(board, from, by, &[PieceKind::Knight]))
    }) {
        return true;
    }

    if ray_hits(board, sq, by, &ORTHOGONAL, &[PieceKind::Rook, PieceKind::Queen])
        || ray_hits(board, sq, by, &DIAGONAL, &[PieceKind::Bishop, PieceKind::Queen])
    {
        return true;
    }

    KING_OFFSETS.iter().any(|&(dr, dc)| {
        sq.offset(dr, dc)
            .is_some_and(|from| holds(board, from, by, &[PieceKind::King]))
    })
}

/// Square and kind of the cheapest piece of `by` attacking `sq`, if any.
pub fn least_valuable_attacker(
    board: &impl PieceLookup,
    sq: Square,
    by: Color,
) -> Option<(Square, PieceKind)> {
    let mut best: Option<(Square, PieceKind)> = None;
    let mut consider = |from: Square, kind: PieceKind| {
        if best.is_none_or(|(_, k)| kind.value() < k.value()) {
            best = Some((from, kind));
        }
    };

    for dc in [-1, 1] {
        if let Some(from) = sq.offset(-by.forward(), dc)
            && holds(board, from, by, &[PieceKind::Pawn])
        {
            return Some((from, PieceKind::Pawn));
        }
    }
    for &(dr, dc) in &KNIGHT_OFFSETS {
        if let Some(from) = sq.offset(dr, dc)
            && holds(board, from, by, &[PieceKind::Knight])
        {
            consider(from, PieceKind::Knight);
        }
    }
    for (dirs, kinds) in [
        (&DIAGONAL, [PieceKind::Bishop, PieceKind::Queen]),
        (&ORTHOGONAL, [PieceKind::Rook, PieceKind::Queen]),
    ] {
        for &dir in dirs {
            if let Some((from, p)) = first_on_ray(board, sq, dir)
                && p.color == by
                && kinds.contains(&p.kind)
            {
                consider(from, p.kind);
            }
        }
    }
    for &(dr, dc) in &KING_OFFSETS {
        if let Some(from) = sq.offset(dr, dc)
            && holds(board, from, by, &[PieceKind::King])
        {
            consider(from, PieceKind::King);
        }
    }
    best
}

/// Return `true` if `color`'s king is attacked.
#[inline]
pub fn king_in_check(position: &Position, color: Color) -> bool {
    square_attacked(position, position.king_location(color), color.flip())
}
