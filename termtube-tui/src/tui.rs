use crate::{
    app::{Action, App, StatusKind},
    feeders::spawn_tui_feeders,
    player, view,
};
use anyhow::Result;
use crossterm::{
    event::Event as CtEvent,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Stdout},
    sync::{Arc, atomic::Ordering},
};
use termtube_config::PlayerSettings;
use termtube_extract::{Extractor, VideoRecord};
use tokio::sync::mpsc;

pub enum TuiMsg {
    Input(CtEvent),
    InputError(String),
    Tick,
    SearchDone {
        id: u64,
        query: String,
        result: std::result::Result<Vec<VideoRecord>, String>,
    },
}

#[derive(Debug, Clone)]
pub struct TuiOptions {
    pub page_size: usize,
    pub player: PlayerSettings,
}

/// Raw mode plus alternate screen for as long as it lives.
struct TerminalGuard {
    term: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> termtube_common::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut term = Terminal::new(CrosstermBackend::new(stdout))?;
        term.clear()?;
        Ok(Self { term })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        let _ = execute!(self.term.backend_mut(), LeaveAlternateScreen);
        let _ = self.term.show_cursor();
    }
}

/// Run the interactive search UI until the user quits.
pub async fn run(extractor: Arc<dyn Extractor>, opts: TuiOptions) -> Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let (tx, mut rx) = mpsc::channel::<TuiMsg>(256);
    let stop = spawn_tui_feeders(tx.clone());

    let mut app = App::new(opts.page_size);
    tracing::info!(provider = ?extractor.provider(), page_size = app.page_size, "tui.start");

    let outcome = async {
        guard.term.draw(|f| view::draw(f, &app))?;
        app.dirty = false;

        while let Some(msg) = rx.recv().await {
            match msg {
                TuiMsg::Input(CtEvent::Key(key)) => match app.handle_key(key) {
                    Action::Quit => break,
                    Action::Search { id, query } => {
                        spawn_search(extractor.clone(), id, query, tx.clone())
                    }
                    Action::Launch(idx) => {
                        launch_record(&mut app, extractor.as_ref(), &opts.player, idx)
                    }
                    Action::None => {}
                },
                TuiMsg::Input(CtEvent::Resize(..)) => app.dirty = true,
                TuiMsg::Input(_) => {}
                TuiMsg::InputError(e) => {
                    tracing::error!(error = %e, "tui.input_error");
                    app.set_status(format!("input error: {e}"), StatusKind::Error);
                }
                TuiMsg::Tick => app.step_spinner(),
                TuiMsg::SearchDone { id, query, result } => {
                    if !app.finish_search(id, &query, result) {
                        tracing::debug!(id, %query, "tui.search_superseded");
                    }
                }
            }

            if app.dirty {
                guard.term.draw(|f| view::draw(f, &app))?;
                app.dirty = false;
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    stop.store(true, Ordering::Relaxed);
    tracing::info!("tui.stop");
    outcome
}

fn spawn_search(extractor: Arc<dyn Extractor>, id: u64, query: String, tx: mpsc::Sender<TuiMsg>) {
    tokio::spawn(async move {
        let url = extractor.search_url(&query);
        let result = extractor.extract_listing(&url).await.map_err(|e| {
            tracing::warn!(%query, error = %e, "tui.search_failed");
            e.to_string()
        });
        let _ = tx.send(TuiMsg::SearchDone { id, query, result }).await;
    });
}

fn launch_record(app: &mut App, extractor: &dyn Extractor, player: &PlayerSettings, idx: usize) {
    let Some(record) = app.results.get(idx) else {
        return;
    };
    let url = extractor.watch_url(record);
    let title = record.title.clone();
    match player::launch(player, &url) {
        Ok(_) => app.set_status(format!("playing: {title}"), StatusKind::Info),
        Err(e) => app.set_status(
            format!("could not start {}: {e}", player.command),
            StatusKind::Error,
        ),
    }
}
