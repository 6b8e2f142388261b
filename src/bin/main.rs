use std::io;
use std::process::ExitCode;

use clap::Parser;
use emulator::config::Cli;
use emulator::session::{self, Prompter, Session};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
  // logs go to stderr so they stay out of the prompt
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  match start(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("error: {e}");
      ExitCode::FAILURE
    }
  }
}

fn start(cli: &Cli) -> emulator::Result<()> {
  if cli.run {
    session::batch(cli, &mut io::stdout().lock())?;
    return Ok(());
  }

  let mut prompt = Prompter::new(io::stdin().lock(), io::stdout().lock());
  let Some(vm) = session::configure(cli, &mut prompt)? else {
    return Ok(());
  };
  Session::new(vm, prompt, cli.budget).run()
}
