#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use std::process::ExitCode;

use clap::Parser;

use crate::ui::{Cli, Colors, Commands, colors};

mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  let cli = Cli::parse();
  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));

  match cli.command {
    Commands::Compare(command) => {
      let config = ui::commands::CompareConfig::from_command(command)?;
      let outcome = ui::commands::compare_specs(&config, &colors).await?;
      Ok(outcome.exit_code())
    }
    Commands::Serve(command) => {
      ui::commands::serve(command.into(), &colors).await?;
      Ok(ExitCode::SUCCESS)
    }
  }
}
