//! Terminal user interface for `hive search`.
//!
//! ## Entry points
//!
//! - [`run_search_tui`]: interactive search box over a list of causes.
//!
//! Suggestion requests run on a worker thread so the input never blocks on
//! the network; requests and results travel over `mpsc` channels and are
//! matched back up by generation number.

pub mod search;

use anyhow::{Context, Result};
use causehive_core::Cause;
use causehive_core::config::ClientConfig;
use causehive_core::store::KvStore;
use causehive_search::search_box::FetchRequest;
use causehive_search::{ApiClient, FallbackSource, SuggestError, Suggestion, SuggestionSource};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use search::{SearchView, ViewAction};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(50);

type FetchResult = (u64, Result<Vec<Suggestion>, SuggestError>);

/// Run the search TUI until the user quits.
pub fn run_search_tui<S: KvStore>(config: &ClientConfig, store: S, causes: Vec<Cause>) -> Result<()> {
    let mut view = SearchView::new(config, store, causes);
    let (requests, responses) = spawn_suggestion_worker(config);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, &mut view, &requests, &responses);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    let analytics = view.search_box().analytics();
    tracing::info!(
        searches = analytics.total_searches(),
        clicks = analytics.total_clicks(),
        "search session ended"
    );
    result
}

/// The worker exits once the request sender is dropped.
fn spawn_suggestion_worker(config: &ClientConfig) -> (Sender<FetchRequest>, Receiver<FetchResult>) {
    let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
    let (result_tx, result_rx) = mpsc::channel::<FetchResult>();
    let source = FallbackSource::new(ApiClient::new(&config.api));
    let limit = config.search.max_suggestions;

    thread::spawn(move || {
        for request in request_rx {
            let result = source.suggest(&request.query, limit);
            if result_tx.send((request.generation, result)).is_err() {
                break;
            }
        }
    });

    (request_tx, result_rx)
}

fn event_loop<B: Backend, S: KvStore>(
    terminal: &mut Terminal<B>,
    view: &mut SearchView<S>,
    requests: &Sender<FetchRequest>,
    responses: &Receiver<FetchResult>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| view.render(frame, frame.area()))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if view.handle_key(key, Instant::now()) == Some(ViewAction::Quit) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => view.handle_mouse(mouse),
                _ => {}
            }
        }

        if let Some(request) = view.tick(Instant::now()) {
            requests
                .send(request)
                .context("suggestion worker stopped")?;
        }
        while let Ok((generation, result)) = responses.try_recv() {
            view.on_suggestions(generation, result);
        }
    }
}
