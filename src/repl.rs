//! Line-oriented front end for the calculator.
//!
//! Each input line holds whitespace-separated key names (`7 ÷ 2 =`), or a
//! single meta command starting with `:`.

use anyhow::{Context, Result, bail};
use mathflow::{CalcMode, InputState, Key, Session};

/// Width of the right-aligned screen.
const SCREEN_WIDTH: usize = 24;

/// What the front end should do after a line.
#[derive(Debug, PartialEq)]
pub enum Reply {
    /// Show the screen.
    Screen(String),
    /// Show some text.
    Text(String),
    Quit,
}

/// Render the two-line calculator screen.
pub fn render_screen(state: &InputState) -> String {
    format!(
        "{:>width$}\n{:>width$}",
        state.equation.trim_end(),
        state.display,
        width = SCREEN_WIDTH
    )
}

/// Parse every key on the line before pressing any of them.
pub fn parse_keys<S: AsRef<str>>(names: &[S]) -> Result<Vec<Key>> {
    names
        .iter()
        .map(|name| name.as_ref().parse::<Key>().map_err(anyhow::Error::msg))
        .collect()
}

/// Handle one line of input.
pub fn handle_line(session: &mut Session, line: &str) -> Result<Reply> {
    let line = line.trim();
    if let Some(command) = line.strip_prefix(':') {
        return handle_command(session, command);
    }

    let names: Vec<&str> = line.split_whitespace().collect();
    for key in parse_keys(names.as_slice())? {
        session.press(key);
    }
    Ok(Reply::Screen(render_screen(&session.state())))
}

fn handle_command(session: &mut Session, command: &str) -> Result<Reply> {
    let args: Vec<&str> = command.split_whitespace().collect();
    match args.as_slice() {
        ["q" | "quit" | "exit"] => Ok(Reply::Quit),
        ["mode"] => Ok(Reply::Text(session.mode().to_string())),
        ["mode", mode] => {
            let mode: CalcMode = mode.parse().map_err(anyhow::Error::msg)?;
            session.set_mode(mode);
            Ok(Reply::Text(format!("mode: {}", mode)))
        }
        ["history"] => {
            if session.history().is_empty() {
                return Ok(Reply::Text("No history".to_string()));
            }
            let lines: Vec<String> = session
                .history()
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    format!(
                        "{:>3}  {}  {}",
                        i,
                        entry.timestamp.format("%H:%M:%S"),
                        entry
                    )
                })
                .collect();
            Ok(Reply::Text(lines.join("\n")))
        }
        ["history", "json"] => {
            let json = session
                .history()
                .to_json()
                .context("serializing history")?;
            Ok(Reply::Text(json))
        }
        ["history", "clear"] => {
            session.clear_history();
            Ok(Reply::Text("History cleared".to_string()))
        }
        ["recall", index] => {
            let index: usize = index
                .parse()
                .with_context(|| format!("invalid history index '{}'", index))?;
            if session.select(index).is_none() {
                bail!("no history entry {}", index);
            }
            session.recall(index);
            Ok(Reply::Screen(render_screen(&session.state())))
        }
        _ => bail!("unknown command ':{}'", command),
    }
}
