mod cli;
mod repl;

use anyhow::{Context, Result, bail};
use mathflow::calculator::evaluate_expression;
use mathflow::{CalcMode, Outcome, Session, load_config};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::repl::{Reply, handle_line, parse_keys, render_screen};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let mut options = config.session_options();
    if cli.scientific {
        options.mode = CalcMode::Scientific;
    }
    tracing::info!(mode = %options.mode, "MathFlow v{}", env!("CARGO_PKG_VERSION"));

    match cli.command() {
        Commands::Repl => run_repl(Session::with_options(options)).await,
        Commands::Press { keys } => {
            let mut session = Session::with_options(options);
            let mut failure = None;
            for key in parse_keys(keys.as_slice())? {
                if let Outcome::Failed { error, .. } = session.press(key) {
                    failure = Some(error);
                }
            }
            println!("{}", render_screen(&session.state()));
            match failure {
                Some(error) if session.state().error => bail!("{}", error),
                _ => Ok(()),
            }
        }
        Commands::Eval { expression } => {
            let evaluation = evaluate_expression(&expression, options.settings.decimals)
                .with_context(|| format!("evaluating '{}'", expression))?;
            println!("{}", evaluation.display_result);
            Ok(())
        }
    }
}

async fn run_repl(mut session: Session) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("{}", render_screen(&session.state()));
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let output = match handle_line(&mut session, &line) {
            Ok(Reply::Quit) => break,
            Ok(Reply::Screen(text) | Reply::Text(text)) => text,
            Err(e) => format!("error: {:#}", e),
        };
        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}
