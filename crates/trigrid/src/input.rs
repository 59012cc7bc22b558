//! The human move source for the challenger binary.

use std::io::{self, BufRead, Write};

use trigrid_game::{Cell, Game, Mark, MoveSource};

/// Prompts on the terminal until the human types a legal move.
///
/// Bad input re-prompts locally; only validated cells ever reach the
/// wire. An EOF on stdin reads as resigning.
#[derive(Debug, Default)]
pub struct HumanPrompt;

impl HumanPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl MoveSource for HumanPrompt {
    fn choose(&mut self, game: &Game, mark: Mark) -> Option<Cell> {
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            println!("{}", game.board());
            print!("Place your {mark} [1-9]: ");
            let _ = io::stdout().flush();

            line.clear();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
            let choice = match line.trim().parse::<u8>() {
                Ok(choice) => choice,
                Err(_) => {
                    println!("That is not a number from 1 to 9.");
                    continue;
                }
            };
            match game.validate(choice) {
                Ok(cell) => return Some(cell),
                Err(err) => println!("{err}."),
            }
        }
    }
}
