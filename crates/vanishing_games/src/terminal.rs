//! Terminal front end for local matches.
//!
//! Reads one command per line: a cell number 1-9, `r` to restart, or `q` to
//! quit. In the hard tier the human's line is raced against the turn clock.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use vanishing_tictactoe::{LocalMatch, LocalMode, LocalResult, LocalTurn};

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    /// Zero-based cell index.
    Cell(usize),
    Restart,
    Quit,
    Invalid,
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        "q" | "Q" => Input::Quit,
        "r" | "R" => Input::Restart,
        other => match other.parse::<usize>() {
            Ok(n @ 1..=9) => Input::Cell(n - 1),
            _ => Input::Invalid,
        },
    }
}

fn render(game: &LocalMatch) {
    println!("\n{}\n", game.state().board().display());
    match game.result() {
        Some(LocalResult::Won(symbol)) => println!("{} wins! (r to play again, q to quit)", symbol),
        Some(LocalResult::TimedOut) => println!("Time's up, O wins! (r to play again, q to quit)"),
        None => {
            let clock = game
                .human_clock()
                .map(|d| format!(" ({} ms)", d.as_millis()))
                .unwrap_or_default();
            println!("{} to move{}:", game.state().active_symbol(), clock);
        }
    }
}

fn report(turn: &LocalTurn) {
    if turn.placement.armed_now {
        println!("O has three marks. From now on, old marks vanish.");
    }
    if let Some(cell) = turn.placement.vanished {
        println!(
            "{}'s oldest mark at {} vanished.",
            turn.placement.symbol.opponent(),
            cell + 1
        );
    }
}

/// Runs a local match until the player quits or stdin closes.
pub async fn run(mode: LocalMode) -> Result<()> {
    let mut game = LocalMatch::new(mode);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut rng = rand::rng();

    println!("Vanishing tic-tac-toe. Cells are numbered 1-9.");
    render(&game);

    loop {
        if game.is_computer_turn() {
            let Some(turn) = game.computer_move(&mut rng) else {
                warn!("Computer found no move");
                break;
            };
            println!("O plays {}.", turn.placement.index + 1);
            report(&turn);
            render(&game);
            continue;
        }

        let line = match game.human_clock() {
            Some(clock) => match tokio::time::timeout(clock, lines.next_line()).await {
                Ok(line) => line?,
                Err(_) => {
                    debug!("Human clock expired");
                    game.time_out();
                    render(&game);
                    continue;
                }
            },
            None => lines.next_line().await?,
        };
        let Some(line) = line else {
            break;
        };

        match parse_input(&line) {
            Input::Quit => break,
            Input::Restart => {
                game.restart();
                render(&game);
            }
            Input::Cell(index) => match game.play(index) {
                Ok(turn) => {
                    report(&turn);
                    render(&game);
                }
                Err(e) => println!("{}", e),
            },
            Input::Invalid => println!("Enter a cell 1-9, r to restart, or q to quit."),
        }
    }

    println!("Goodbye.");
    Ok(())
}
