//! Static evaluation: material plus piece-square tables.

pub mod material;
pub mod pst;

use tessera_core::{Color, Position};

use self::material::material;
use self::pst::pst_value;

/// Evaluate the position from White's perspective (positive = White ahead).
pub fn evaluate(pos: &Position) -> i32 {
    let placement: i32 = pos
        .occupied()
        .map(|(sq, p)| p.color.sign() * pst_value(p.kind, p.color, sq))
        .sum();
    material(pos) + placement
}

/// Evaluate the position from `side`'s perspective, as negamax needs it.
#[inline]
pub fn evaluate_for(pos: &Position, side: Color) -> i32 {
    side.sign() * evaluate(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_exactly_zero() {
        assert_eq!(evaluate(&Position::starting()), 0);
    }

    #[test]
    fn side_relative_sign() {
        let (pos, _) = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let white = evaluate_for(&pos, Color::White);
        assert!(white > 400);
        assert_eq!(evaluate_for(&pos, Color::Black), -white);
    }

    #[test]
    fn mirrored_position_negates() {
        let (a, _) = Position::from_fen("4k3/8/8/8/3N4/8/PP6/4K3 w - - 0 1").unwrap();
        let (b, _) = Position::from_fen("4k3/pp6/8/3n4/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(evaluate(&a), -evaluate(&b));
    }

    #[test]
    fn development_is_rewarded() {
        let (developed, _) =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1").unwrap();
        assert!(evaluate(&developed) > 0);
    }
}
