//! End-to-end search behaviour on known positions.

use std::time::{Duration, Instant};

use proptest::prelude::*;
use tessera_core::{Color, Move, Position, generate_legal_moves, king_in_check};
use tessera_engine::{
    MATE_SCORE, MATE_THRESHOLD, SearchConfig, SearchLimits, Searcher, evaluate_for, get_best_move,
};

fn parse(fen: &str) -> (Position, Color) {
    Position::from_fen(fen).unwrap()
}

fn mv(s: &str) -> Move {
    s.parse().unwrap()
}

/// Plain negamax without pruning, tables or quiescence.
fn reference_negamax(pos: &mut Position, side: Color, depth: u8, ply: i32) -> i32 {
    if depth == 0 {
        return evaluate_for(pos, side);
    }
    let moves = generate_legal_moves(pos, side);
    if moves.is_empty() {
        return if king_in_check(pos, side) { -(MATE_SCORE - ply) } else { 0 };
    }
    let mut best = i32::MIN;
    for &m in &moves {
        let undo = pos.make_move(m, side);
        let score = -reference_negamax(pos, side.flip(), depth - 1, ply + 1);
        pos.undo_move(undo);
        best = best.max(score);
    }
    best
}

fn no_quiescence() -> SearchConfig {
    SearchConfig {
        quiescence_plies: 0,
        tt_mb: 1,
        ..SearchConfig::default()
    }
}

const EQUIVALENCE_CASES: [(&str, u8); 5] = [
    ("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", 3),
    ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3),
    ("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4", 2),
    ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 2),
    ("6k1/5ppp/8/8/8/8/8/R5K1 b - - 0 1", 3),
];

#[test]
fn alpha_beta_matches_plain_negamax() {
    for (fen, depth) in EQUIVALENCE_CASES {
        let (mut pos, side) = parse(fen);
        let expected = reference_negamax(&mut pos, side, depth, 0);
        let result = Searcher::with_config(no_quiescence()).search(&mut pos, side, &SearchLimits::depth(depth));
        assert_eq!(result.score, expected, "{fen} at depth {depth}");
    }
}

#[test]
fn warm_table_bounds_keep_scores_exact() {
    // the second search probes stored bounds at every depth, narrowing windows
    for (fen, depth) in EQUIVALENCE_CASES {
        let (mut pos, side) = parse(fen);
        let expected = reference_negamax(&mut pos, side, depth, 0);
        let mut searcher = Searcher::with_config(SearchConfig {
            keep_tt: true,
            ..no_quiescence()
        });
        let cold = searcher.search(&mut pos, side, &SearchLimits::depth(depth));
        let warm = searcher.search(&mut pos, side, &SearchLimits::depth(depth));
        assert_eq!(cold.score, expected, "{fen} cold at depth {depth}");
        assert_eq!(warm.score, expected, "{fen} warm at depth {depth}");
        assert!(warm.stats.tt_hits > 0);
    }
}

#[test]
fn back_rank_mate_in_one() {
    let (mut pos, side) = parse("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    let result = Searcher::new().search(&mut pos, side, &SearchLimits::depth(1));
    assert_eq!(result.best_move, Some(mv("a1a8")));
    assert!(result.score > MATE_THRESHOLD);
    assert_eq!(result.pv, vec![mv("a1a8")]);
}

#[test]
fn defender_sees_the_back_rank_threat() {
    let (mut pos, side) = parse("6k1/5ppp/8/8/8/8/8/R5K1 b - - 0 1");
    let result = Searcher::new().search(&mut pos, side, &SearchLimits::depth(3));
    let best = result.best_move.unwrap();
    assert_ne!(best, mv("g8h8"), "g8h8 walks into Ra8#");
    assert!(result.score > -MATE_THRESHOLD, "black is not lost: {}", result.score);
}

#[test]
fn stalemate_returns_none() {
    let (mut pos, side) = parse("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
    assert_eq!(get_best_move(&mut pos, 4, None, side), None);
}

#[test]
fn checkmated_side_returns_none() {
    let (mut pos, side) = parse("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1");
    assert_eq!(get_best_move(&mut pos, 2, None, side), None);
}

#[test]
fn opening_move_is_quiet_and_balanced() {
    let mut pos = Position::starting();
    let result = Searcher::new().search(&mut pos, Color::White, &SearchLimits::depth(1));
    let best = result.best_move.unwrap();
    assert!(!pos.is_capture(best));
    assert!(result.score.abs() < 100, "score {}", result.score);
}

#[test]
fn search_restores_the_position() {
    let (mut pos, side) = parse("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let before = pos.clone();
    Searcher::new().search(&mut pos, side, &SearchLimits::depth(3));
    assert_eq!(pos, before);

    // an aborted search unwinds just as cleanly
    Searcher::new().search(&mut pos, side, &SearchLimits::depth(8).with_node_limit(5_000));
    assert_eq!(pos, before);
}

#[test]
fn time_limit_is_respected() {
    let mut pos = Position::starting();
    let start = Instant::now();
    let best = get_best_move(&mut pos, 40, Some(Duration::from_millis(200)), Color::White);
    assert!(start.elapsed() < Duration::from_secs(2), "took {:?}", start.elapsed());
    let best = best.unwrap();
    assert!(generate_legal_moves(&mut pos, Color::White).contains(best));
}

#[test]
fn zero_time_still_answers() {
    let mut pos = Position::starting();
    let result = Searcher::new().search(
        &mut pos,
        Color::White,
        &SearchLimits::depth(5).with_time_limit(Duration::ZERO),
    );
    assert_eq!(result.depth, 0);
    assert!(result.best_move.is_some());
}

#[test]
fn quiescence_avoids_poisoned_pawn() {
    // Qxd5 wins a pawn but loses the queen to the e6 pawn
    let (mut pos, side) = parse("4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1");
    let best = get_best_move(&mut pos, 1, None, side).unwrap();
    assert_ne!(best, mv("d1d5"));
}

#[test]
fn wins_hanging_queen() {
    let (mut pos, side) = parse("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1");
    assert_eq!(get_best_move(&mut pos, 2, None, side), Some(mv("d1d5")));
}

#[test]
fn statistics_are_collected() {
    let (mut pos, side) = parse("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4");
    let result = Searcher::new().search(&mut pos, side, &SearchLimits::depth(4));
    assert_eq!(result.depth, 4);
    assert!(result.stats.nodes > 0);
    assert!(result.stats.qnodes > 0 && result.stats.qnodes <= result.stats.nodes);
    assert!(result.stats.beta_cutoffs > 0);
    assert!(!result.pv.is_empty() && result.pv.len() <= 4);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn best_move_is_legal_after_random_play(choices in prop::collection::vec(any::<usize>(), 0..12)) {
        let mut pos = Position::starting();
        let mut side = Color::White;
        for choice in choices {
            let moves = generate_legal_moves(&mut pos, side);
            if moves.is_empty() {
                break;
            }
            pos.make_move(moves[choice % moves.len()], side);
            side = side.flip();
        }

        let before = pos.clone();
        let legal = generate_legal_moves(&mut pos, side);
        let best = get_best_move(&mut pos, 2, None, side);
        prop_assert_eq!(&pos, &before);
        match best {
            Some(m) => prop_assert!(legal.contains(m)),
            None => prop_assert!(legal.is_empty()),
        }
    }
}
