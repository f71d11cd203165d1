//! Property tests: random legal move sequences keep the incremental hash
//! exact and unwind back to the starting state.

use proptest::prelude::*;
use tessera_core::{
    Color, PieceKind, Position, Square, UndoRecord, generate_legal_moves, hash_from_scratch,
    king_in_check,
};

const FENS: [&str; 5] = [
    tessera_core::STARTING_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
];

fn start_position() -> impl Strategy<Value = (Position, Color)> {
    prop::sample::select(FENS.to_vec()).prop_map(|fen| Position::from_fen(fen).unwrap())
}

/// Walk `choices` as indices into each node's legal move list.
fn play(pos: &mut Position, mut side: Color, choices: &[usize]) -> Vec<(UndoRecord, Color)> {
    let mut undos = Vec::new();
    for &choice in choices {
        let moves = generate_legal_moves(pos, side);
        if moves.is_empty() {
            break;
        }
        let mv = moves[choice % moves.len()];
        undos.push((pos.make_move(mv, side), side));
        side = side.flip();
    }
    undos
}

proptest! {
    #[test]
    fn make_undo_roundtrip_is_bit_identical(
        (mut pos, side) in start_position(),
        choices in prop::collection::vec(any::<usize>(), 0..24),
    ) {
        let original = pos.clone();
        let undos = play(&mut pos, side, &choices);
        for (undo, _) in undos.into_iter().rev() {
            pos.undo_move(undo);
        }
        prop_assert_eq!(pos.hash(), original.hash());
        prop_assert_eq!(pos, original);
    }

    #[test]
    fn incremental_hash_matches_recomputation(
        (mut pos, mut side) in start_position(),
        choices in prop::collection::vec(any::<usize>(), 1..24),
    ) {
        for &choice in &choices {
            let moves = generate_legal_moves(&mut pos, side);
            if moves.is_empty() {
                break;
            }
            pos.make_move(moves[choice % moves.len()], side);
            side = side.flip();
            prop_assert_eq!(pos.hash(), hash_from_scratch(&pos, side));
            prop_assert!(pos.validate(side).is_ok());
        }
    }

    #[test]
    fn legal_moves_leave_king_safe(
        (mut pos, side) in start_position(),
        choices in prop::collection::vec(any::<usize>(), 0..12),
    ) {
        let undos = play(&mut pos, side, &choices);
        let to_move = if undos.len() % 2 == 0 { side } else { side.flip() };
        for &mv in &generate_legal_moves(&mut pos, to_move) {
            let undo = pos.make_move(mv, to_move);
            prop_assert!(!king_in_check(&pos, to_move), "{} leaves the king attacked", mv);
            pos.undo_move(undo);
        }
    }

    #[test]
    fn at_most_one_en_passant_pawn(
        (mut pos, side) in start_position(),
        choices in prop::collection::vec(any::<usize>(), 0..24),
    ) {
        play(&mut pos, side, &choices);
        let flagged: Vec<(Square, _)> = pos.occupied().filter(|(_, p)| p.en_passant).collect();
        prop_assert!(flagged.len() <= 1);
        if let Some((sq, piece)) = flagged.first() {
            prop_assert_eq!(piece.kind, PieceKind::Pawn);
            prop_assert_eq!(pos.en_passant(), Some(*sq));
        }
    }
}
