use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use newsearch::api::{ArticleSource, NewsApiClient};
use newsearch::app::App;
use newsearch::config::{self, Config, FileConfig, Overrides};
use newsearch::error::SearchError;
use newsearch::opener::{ExternalOpener, SystemOpener};
use newsearch::search::{OverlapPolicy, SearchTicket};
use newsearch::{input, logging, model, ui};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;

type Outcome = (SearchTicket, Result<Vec<model::Article>, SearchError>);

/// Search news articles from the terminal.
#[derive(Debug, Parser)]
#[command(name = "newsearch", version, about)]
struct Cli {
    /// Search term to run as soon as the screen opens.
    query: Option<String>,

    /// NewsAPI key.
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/newsearch/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search endpoint URL.
    #[arg(long)]
    endpoint: Option<String>,

    /// Per-request timeout in seconds; 0 or unset waits indefinitely.
    #[arg(long)]
    timeout: Option<u64>,

    /// How to treat overlapping searches: last-resolved or latest-submitted.
    #[arg(long)]
    overlap: Option<OverlapPolicy>,

    /// Where to write logs.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init(&config.log_file)?;
    tracing::info!(endpoint = %config.endpoint, policy = ?config.overlap_policy, "starting");

    let source: Arc<dyn ArticleSource> =
        Arc::new(NewsApiClient::new(&config).context("building HTTP client")?);

    let mut guard = TerminalGuard::enter()?;
    run(&mut guard.terminal, &config, source, &SystemOpener, cli.query).await
}

fn load_config(cli: &Cli) -> Result<Config> {
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::load_default()?,
    };
    let overrides = Overrides {
        api_key: cli.api_key.clone(),
        endpoint: cli.endpoint.clone(),
        request_timeout_secs: cli.timeout,
        overlap_policy: cli.overlap,
        log_file: cli.log_file.clone(),
    };
    Ok(Config::resolve(file, overrides, config::BUILD_API_KEY)?)
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: &Config,
    source: Arc<dyn ArticleSource>,
    opener: &dyn ExternalOpener,
    initial_query: Option<String>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<Outcome>(16);

    let mut app = App::new(config.overlap_policy);
    if let Some(query) = initial_query {
        app.search.set_query(query);
        spawn_search(&mut app, &source, &tx);
    }

    loop {
        // Apply finished searches
        while let Ok((ticket, outcome)) = rx.try_recv() {
            app.apply(&ticket, outcome);
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        match input::poll_action(app.focus)? {
            input::Action::Quit => break,
            input::Action::Down => app.move_down(),
            input::Action::Up => app.move_up(),
            input::Action::Submit => spawn_search(&mut app, &source, &tx),
            input::Action::QueryChar(c) => app.search.push_char(c),
            input::Action::Backspace => app.search.pop_char(),
            input::Action::ClearQuery => app.search.clear_query(),
            input::Action::ToggleFocus => app.toggle_focus(),
            input::Action::OpenInBrowser => app.open_selected(opener),
            input::Action::OpenImage => app.open_selected_image(opener),
            input::Action::None => {}
        }
    }

    Ok(())
}

/// Start a search in the background; its outcome arrives on `tx`.
/// Overlapping searches are not blocked.
fn spawn_search(app: &mut App, source: &Arc<dyn ArticleSource>, tx: &mpsc::Sender<Outcome>) {
    let Some(ticket) = app.begin_search() else {
        return;
    };
    let source = Arc::clone(source);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = source.search(ticket.query()).await;
        let _ = tx.send((ticket, outcome)).await;
    });
}

/// Owns the terminal while the TUI runs and restores it on drop, so a panic
/// in the event loop does not leave the shell in raw mode.
struct TerminalGuard<B: Backend> {
    terminal: Terminal<B>,
    restore: fn(&mut Terminal<B>) -> Result<()>,
}

impl TerminalGuard<CrosstermBackend<Stdout>> {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            restore: restore_terminal,
        })
    }
}

impl<B: Backend> Drop for TerminalGuard<B> {
    fn drop(&mut self) {
        if let Err(e) = (self.restore)(&mut self.terminal) {
            tracing::warn!(error = %e, "could not restore terminal");
        }
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
