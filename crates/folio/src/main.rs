use std::io::stdout;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use folio_content::Portfolio;
use ratatui::DefaultTerminal;
use tracing::info;

use crate::{app::App, cli::Cli};

mod app;
mod cli;
mod logging;
mod page;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _log_guard = logging::init();

    let config = cli.load_config()?;
    let portfolio = match &config.content {
        Some(path) => Portfolio::load(path)?,
        None => Portfolio::builtin()?,
    };
    info!(
        theme = config.theme.label(),
        sections = portfolio.sections.len(),
        "starting folio"
    );

    let (cols, rows) = crossterm::terminal::size()?;
    let app = App::new(config, portfolio, cli.seed, cols, rows);

    let terminal = ratatui::init();
    let result = run(app, terminal);
    ratatui::restore();
    result
}

/// Run the app with mouse wheel events enabled.
fn run(app: App, terminal: DefaultTerminal) -> color_eyre::Result<()> {
    execute!(stdout(), EnableMouseCapture)?;
    let result = app.run(terminal);
    execute!(stdout(), DisableMouseCapture)?;
    result
}
