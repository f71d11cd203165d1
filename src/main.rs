use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tessera_core::{Color, Position, STARTING_FEN, divide, has_legal_move, king_in_check};
use tessera_engine::{SearchConfig, SearchLimits, Searcher, format_pv, mate_distance};
use tracing::info;

/// Search one position and print the engine's choice.
#[derive(Parser, Debug)]
#[command(name = "tessera", version)]
struct Cli {
    /// Position to search, in FEN (quote it); defaults to the initial position.
    fen: Option<String>,

    /// Depth of the last iteration, in plies.
    #[arg(short, long, default_value_t = 5)]
    depth: u8,

    /// Stop deepening after this many milliseconds.
    #[arg(short, long)]
    movetime: Option<u64>,

    /// Transposition table size in megabytes.
    #[arg(long, default_value_t = SearchConfig::default().tt_mb)]
    hash: usize,

    /// Print a per-move perft breakdown to this depth instead of searching.
    #[arg(long, value_name = "DEPTH")]
    perft: Option<usize>,
}

fn describe_score(score: i32) -> String {
    match mate_distance(score) {
        Some(0) => "checkmated".to_string(),
        Some(plies) if plies > 0 => format!("mate in {}", (plies + 1) / 2),
        Some(plies) => format!("mated in {}", (-plies + 1) / 2),
        None => format!("{score} cp"),
    }
}

/// Describe a finished game, or `None` while the side to move has a move.
fn game_over(position: &mut Position, side: Color) -> Option<&'static str> {
    if has_legal_move(position, side) {
        None
    } else if king_in_check(position, side) {
        Some("checkmate")
    } else {
        Some("stalemate")
    }
}

/// Print `divide` lines and return the total leaf count.
fn run_perft(position: &mut Position, side: Color, depth: usize) -> u64 {
    let mut total = 0;
    for (mv, nodes) in divide(position, side, depth) {
        println!("{mv}: {nodes}");
        total += nodes;
    }
    total
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let fen = cli.fen.as_deref().unwrap_or(STARTING_FEN);
    let (mut position, side) =
        Position::from_fen(fen).with_context(|| format!("cannot parse FEN {fen:?}"))?;

    let mut limits = SearchLimits::depth(cli.depth);
    if let Some(ms) = cli.movetime {
        limits = limits.with_time_limit(Duration::from_millis(ms));
    }
    info!(depth = cli.depth, movetime = ?cli.movetime, "tessera starting");

    println!("{}", position.pretty());
    println!("{side:?} to move\n");

    if let Some(depth) = cli.perft {
        let started = Instant::now();
        let total = run_perft(&mut position, side, depth);
        println!("\nperft {depth}: {total} ({} ms)", started.elapsed().as_millis());
        return Ok(());
    }
    if let Some(outcome) = game_over(&mut position, side) {
        println!("{outcome}");
        return Ok(());
    }

    let config = SearchConfig {
        tt_mb: cli.hash,
        ..SearchConfig::default()
    };
    let mut searcher = Searcher::with_config(config);
    let result = searcher.search_with(&mut position, side, &limits, |depth, score, stats, pv| {
        println!(
            "depth {depth:>2}  score {:>12}  nodes {:>10}  pv {}",
            describe_score(score),
            stats.nodes,
            format_pv(pv)
        );
    });

    let Some(best) = result.best_move else {
        println!("no legal moves: {}", describe_score(result.score));
        return Ok(());
    };

    println!();
    println!("best move  {best}");
    println!("score      {}", describe_score(result.score));
    println!("depth      {}", result.depth);
    println!("pv         {}", format_pv(&result.pv));
    println!(
        "nodes      {} ({} quiescence, {} tt hits, {} cutoffs)",
        result.stats.nodes, result.stats.qnodes, result.stats.tt_hits, result.stats.beta_cutoffs
    );
    println!("time       {} ms", result.elapsed.as_millis());
    Ok(())
}
