//! A bare-bones frontend for debugging: reads commands from stdin and prints the field after each one.

use clap::Parser;
use color_eyre::{eyre::WrapErr, Result};
use rand::{rngs::StdRng, SeedableRng};
use std::io::BufRead;
use termsweeper::{Minesweeper, MinesweeperStatus};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short = 'H', long, default_value_t = 9)]
    height: u8,
    #[arg(short, long, default_value_t = 9)]
    width: u8,
    #[arg(short, long, default_value_t = 10)]
    mines: u16,
    #[arg(short, long)]
    seed: Option<u64>,
    /// Print the hidden contents of the field too
    #[arg(long)]
    reveal: bool,
}

/// A parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Open((u8, u8)),
    Flag((u8, u8)),
}

/// Parses lines like `o 3,5` (open the cell at row 3, column 5) or `f 3,5` (flag it).
fn parse_command(input: &str) -> Option<Command> {
    let [action, cell_position]: [&str; 2] = input
        .split_whitespace()
        .collect::<Vec<&str>>()
        .as_slice()
        .try_into()
        .ok()?;

    let (row_index, column_index) = cell_position.split_once(',')?;
    let cell_position = (
        row_index.trim().parse().ok()?,
        column_index.trim().parse().ok()?,
    );

    match action {
        "o" => Some(Command::Open(cell_position)),
        "f" => Some(Command::Flag(cell_position)),
        _ => None,
    }
}

fn print_game(game: &Minesweeper, reveal: bool) {
    println!("Flags left: {}", game.get_remaining_flags());
    println!("{}", game.get_field());

    if reveal {
        println!("{:?}", game.get_field());
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Minesweeper::new(args.height, args.width, args.mines, &mut rng)
        .wrap_err("Couldn't create a game instance!")?;

    println!("Enter the desired action and the target cell's coordinates (e.g. `f 3,5` to flag the 6th cell on the 4th line):");
    print_game(&game, args.reveal);

    for line in std::io::stdin().lock().lines() {
        let line = line?;

        let Some(command) = parse_command(&line) else {
            println!("Incorrect input! Please, try again.");
            continue;
        };

        let result = match command {
            Command::Open(cell_position) => game.open_cell(cell_position),
            Command::Flag(cell_position) => game.toggle_flag(cell_position),
        };

        match result {
            Ok(MinesweeperStatus::InProgress) => print_game(&game, args.reveal),
            Ok(status) => {
                let status = *status;
                print_game(&game, true);
                println!("{status:?}");
                break;
            }
            Err(error) => println!("{error}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::{parse_command, Command};

    #[test]
    fn commands_are_parsed() {
        assert_eq!(parse_command("o 3,5"), Some(Command::Open((3, 5))));
        assert_eq!(parse_command("  f 0,12 "), Some(Command::Flag((0, 12))));
    }

    #[test]
    fn bad_commands_are_rejected() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("o"), None);
        assert_eq!(parse_command("x 1,1"), None);
        assert_eq!(parse_command("o 1;1"), None);
        assert_eq!(parse_command("o 1,300"), None);
        assert_eq!(parse_command("o 1,1 extra"), None);
    }
}
