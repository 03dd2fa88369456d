use std::time::{Duration, Instant};

use clap::Parser;
use skak_core::{
    board::{Board, CoordMove},
    perft::perft,
};

/// Perft driver for the skak move generator.
///
/// Counts legal move sequences from a position, for checking generated
/// node counts against published values and for measuring generator
/// throughput.
#[derive(Parser, Debug)]
struct Args {
    /// Starting position.
    ///
    /// Either the string "startpos" or a position in Forsyth-Edwards
    /// Notation.
    #[arg(short, long, default_value = "startpos", value_parser = parse_position)]
    position: Board,

    /// Moves to play on the starting position before counting.
    ///
    /// Each move is given in coordinate notation: source square,
    /// destination square, and an optional promotion letter, e.g. `d2d4`
    /// or `e7e8q`. Useful for drilling into a disputed subtree.
    #[arg(short, long, num_args(0..))]
    moves: Vec<CoordMove>,

    /// Maximum depth to count to.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..), default_value_t = 6)]
    depth: u8,

    /// Divide mode: list every move in the position with the node count
    /// of its subtree at depth - 1, instead of totals per depth.
    #[arg(long)]
    divide: bool,
}

fn parse_position(s: &str) -> Result<Board, String> {
    if s == "startpos" {
        Ok(Board::starting_position())
    } else {
        Board::try_parse_fen(s)
            .map_err(|e| format!("expected `startpos` or a valid FEN string: {e}"))
    }
}

fn perft_per_depth(mut board: Board, max_depth: usize) {
    let mut total_nodes = 0;
    let mut total_time = Duration::ZERO;
    let mut last_depth_time = Duration::ZERO;

    for depth in 1..=max_depth {
        let start = Instant::now();
        let nodes = perft(&mut board, depth);
        let elapsed = start.elapsed();

        println!(
            "Depth: {depth}\tNodes: {nodes}\tTime: {:.3}s",
            elapsed.as_secs_f64()
        );

        total_nodes += nodes;
        total_time += elapsed;
        last_depth_time = elapsed;
    }

    println!();
    println!(
        "Total nodes: {total_nodes}\tTotal time: {:.3}s\tNodes per second: {:.0}",
        total_time.as_secs_f64(),
        total_nodes as f64 / last_depth_time.as_secs_f64().max(f64::EPSILON)
    );
}

fn perft_divide(mut board: Board, depth: usize) {
    let mut total_nodes = 0;

    for m in board.legal_moves() {
        let unmake = board.make_move(m);
        let nodes = perft(&mut board, depth - 1);
        board.unmake_move(m, unmake);

        total_nodes += nodes;
        println!("{m}: {nodes}");
    }

    println!();
    println!("Nodes searched: {total_nodes}");
}

fn main() -> Result<(), String> {
    let Args {
        position,
        moves,
        depth,
        divide,
    } = Args::parse();

    let mut board = position;
    for spec in moves {
        if board.push_move(spec.from, spec.to, spec.promotion).is_none() {
            return Err(format!(
                "move `{spec}` is not legal in position {}",
                board.fen()
            ));
        }
    }

    if divide {
        perft_divide(board, depth as usize);
    } else {
        perft_per_depth(board, depth as usize);
    }

    Ok(())
}
