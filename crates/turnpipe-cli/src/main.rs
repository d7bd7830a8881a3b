//! Terminal front end for the turnpipe rule engine.
//!
//! ```text
//! turnpipe [--config PATH] [--json] [KEYS...]
//! ```
//!
//! With `KEYS` the commands are applied in order and the final frame is
//! printed. Without them, lines are read from stdin and the frame is printed
//! after every command. See [`input`] for the key map. Set `RUST_LOG` to see
//! turn events.

mod input;
mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use turnpipe_core::{Command, Engine, EngineConfig, TurnOutcome};

const USAGE: &str = "usage: turnpipe [--config PATH] [--json] [KEYS...]";

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    json: bool,
    keys: Vec<String>,
}

impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().context("--config needs a path")?;
                    options.config = Some(PathBuf::from(path));
                }
                "--json" => options.json = true,
                "--help" | "-h" => bail!(USAGE),
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    bail!("unknown option `{flag}`\n{USAGE}")
                }
                _ => options.keys.push(arg),
            }
        }
        Ok(options)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn load_config(options: &Options) -> Result<EngineConfig> {
    let Some(path) = &options.config else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    EngineConfig::from_json_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Prints the frame and consumes the per-frame handshake values.
fn present(
    engine: &mut Engine,
    outcome: Option<TurnOutcome>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, &engine.view().snapshot())?;
        writeln!(out)?;
    } else {
        let view = engine.view();
        write!(out, "{}", render::render(&view))?;
        writeln!(out, "{}", render::status(&view))?;
    }

    let counts = engine.take_rotation_counts();
    let partial = engine.take_partial_rotation();
    if json {
        return Ok(());
    }
    if let Some(outcome) = outcome {
        writeln!(out, "turn {outcome}")?;
    }
    if !counts.is_zero() {
        writeln!(out, "rotated left {} right {}", counts.left, counts.right)?;
    }
    if let Some(partial) = partial {
        writeln!(out, "stalled at {:.3} rad", partial.angle)?;
    }
    Ok(())
}

fn run_keys(engine: &mut Engine, keys: &[String], json: bool) -> Result<()> {
    let commands: Vec<Command> = keys
        .iter()
        .map(String::as_str)
        .map(input::parse_line)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    let mut last = None;
    for command in commands {
        last = Some(engine.apply(command));
    }
    present(engine, last, json, &mut io::stdout().lock())
}

fn run_interactive(engine: &mut Engine, json: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    present(engine, None, json, &mut stdout)?;
    for line in stdin.lock().lines() {
        let line = line?;
        let commands = match input::parse_line(&line) {
            Ok(commands) => commands,
            Err(error) => {
                warn!(%error, "bad input");
                writeln!(stdout, "{error}")?;
                continue;
            }
        };
        for command in commands {
            let outcome = engine.apply(command);
            present(engine, Some(outcome), json, &mut stdout)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let options = Options::parse(std::env::args().skip(1))?;
    let config = load_config(&options)?;
    let mut engine = Engine::new(config).context("building the board")?;
    info!(entities = engine.board().store().len(), "=== turnpipe ready ===");

    if options.keys.is_empty() {
        run_interactive(&mut engine, options.json)
    } else {
        run_keys(&mut engine, &options.keys, options.json)
    }
}
