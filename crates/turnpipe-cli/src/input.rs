//! Keyboard-style command parsing.
//!
//! A line is a sequence of tokens separated by whitespace. A token is either a
//! full command name (`move-up`, `rotate-left`, ...) or a run of key letters:
//!
//! | key | command        |
//! |-----|----------------|
//! | `w` | `move-up`      |
//! | `a` | `move-left`    |
//! | `s` | `move-down`    |
//! | `d` | `move-right`   |
//! | `q` | `rotate-left`  |
//! | `e` | `rotate-right` |

use anyhow::{bail, Result};
use turnpipe_core::Command;

fn key(c: char) -> Option<Command> {
    match c.to_ascii_lowercase() {
        'w' => Some(Command::MoveUp),
        'a' => Some(Command::MoveLeft),
        's' => Some(Command::MoveDown),
        'd' => Some(Command::MoveRight),
        'q' => Some(Command::RotateLeft),
        'e' => Some(Command::RotateRight),
        _ => None,
    }
}

/// Parses one line of input into commands, in order.
pub fn parse_line(line: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for token in line.split_whitespace() {
        if let Ok(command) = token.parse::<Command>() {
            commands.push(command);
            continue;
        }
        for c in token.chars() {
            match key(c) {
                Some(command) => commands.push(command),
                None => bail!("unknown key `{c}` in `{token}`"),
            }
        }
    }
    Ok(commands)
}
