//! Material balance.

use tessera_core::{Color, Position};

/// Signed material sum from White's perspective, king included.
pub fn material(pos: &Position) -> i32 {
    pos.occupied()
        .map(|(_, p)| match p.color {
            Color::White => p.kind.value(),
            Color::Black => -p.kind.value(),
        })
        .sum()
}
