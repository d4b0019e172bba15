use ghrm::app::{AppState, ConfirmAction, LoadPhase};
use ghrm::cache::SnapshotCache;
use ghrm::cli::Cli;
use ghrm::events::{AppEvent, EventHandler};
use ghrm::filters::FilterState;
use ghrm::gh::{GhExecutor, GhParser};
use ghrm::input::{self, Action, InputContext, InputMode};
use ghrm::select::autoscroll;
use ghrm::select::geometry::Point;
use ghrm::sync::{self, RepoCache};
use ghrm::traits::{RepoExecutor, RepoParser};
use ghrm::tui;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::future::Future;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn setup_verbose_logging() -> Result<()> {
    let state_dir = state_dir_or_fallback();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .init();
    tracing::info!(
        "ghrm v{} starting with verbose logging",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

fn state_dir_or_fallback() -> std::path::PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        std::path::PathBuf::from(state).join("ghrm")
    } else if let Some(home) = std::env::var_os("HOME") {
        std::path::PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("ghrm")
    } else {
        std::path::PathBuf::from("/tmp/ghrm")
    }
}

fn spawn_monitored(
    tx: tokio::sync::mpsc::UnboundedSender<AppEvent>,
    label: &'static str,
    fut: impl Future<Output = ()> + Send + 'static,
) {
    tokio::spawn(async move {
        let handle = tokio::spawn(fut);
        if let Err(join_err) = handle.await {
            let msg = if join_err.is_panic() {
                match join_err.into_panic().downcast::<String>() {
                    Ok(s) => *s,
                    Err(payload) => match payload.downcast::<&str>() {
                        Ok(s) => s.to_string(),
                        Err(_) => "unknown panic".to_string(),
                    },
                }
            } else {
                "task cancelled".to_string()
            };
            tracing::error!("{label} panicked: {msg}");
            if tx
                .send(AppEvent::Error(format!("{label} crashed: {msg}")))
                .is_err()
            {
                tracing::warn!("{label}: channel closed while reporting panic");
            }
        }
    });
}

/// Everything a spawned remote call needs, cloneable per task.
struct Remote {
    executor: Arc<dyn RepoExecutor>,
    parser: Arc<dyn RepoParser>,
    cache: RepoCache,
    tx: tokio::sync::mpsc::UnboundedSender<AppEvent>,
}

impl Remote {
    /// Kick off a list load for the current filters. Cached snapshots only
    /// serve the initial load; everything user-triggered refetches.
    fn start_load(&self, state: &mut AppState, use_cache: bool) {
        state.begin_loading();
        let seq = state.next_load_seq();
        let filters = state.filters.clone();
        let executor = self.executor.clone();
        let parser = self.parser.clone();
        let cache = self.cache.clone();
        let tx = self.tx.clone();
        spawn_monitored(self.tx.clone(), "load_repos", async move {
            sync::load_repos(executor, parser, cache, filters, seq, use_cache, tx).await;
        });
    }

    fn start_delete_one(&self, state: &mut AppState, full_name: String) {
        state.begin_loading();
        let executor = self.executor.clone();
        let cache = self.cache.clone();
        let tx = self.tx.clone();
        spawn_monitored(self.tx.clone(), "delete_repo", async move {
            sync::delete_one(executor, cache, full_name, tx).await;
        });
    }

    fn start_delete_batch(&self, state: &mut AppState, full_names: Vec<String>) {
        state.begin_loading();
        let executor = self.executor.clone();
        let cache = self.cache.clone();
        let tx = self.tx.clone();
        spawn_monitored(self.tx.clone(), "delete_batch", async move {
            sync::delete_batch(executor, cache, full_names, tx).await;
        });
    }

    fn start_user_refresh(&self) {
        let executor = self.executor.clone();
        let parser = self.parser.clone();
        let tx = self.tx.clone();
        spawn_monitored(self.tx.clone(), "refresh_user", async move {
            sync::refresh_user(executor, parser, tx).await;
        });
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    if args.verbose {
        setup_verbose_logging()?;
    }

    let executor: Arc<dyn RepoExecutor> = Arc::new(GhExecutor::default());
    let parser: Arc<dyn RepoParser> = Arc::new(GhParser);

    // Validate the session before touching the terminal.
    if let Err(e) = executor.check_available().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let mut filters = FilterState::from_query([("per_page", args.per_page.to_string().as_str())]);
    if let Some(search) = args.search {
        filters.set_search(search);
    }

    let mut state = AppState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        !args.no_notify && cfg!(feature = "desktop-notify"),
    );
    state.filters = filters;

    // Restore the terminal on panic, before the default hook prints.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Failed to disable raw mode during panic: {e}");
        }
        if let Err(e) = execute!(
            io::stdout(),
            DisableMouseCapture,
            DisableFocusChange,
            LeaveAlternateScreen,
            SetTitle("")
        ) {
            eprintln!("Failed to leave alternate screen during panic: {e}");
        }
        original_hook(panic_info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        SetTitle("ghrm")
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let cache: RepoCache = Arc::new(Mutex::new(SnapshotCache::default()));
    let events = EventHandler::new(Duration::from_millis(100));
    let remote = Remote {
        executor,
        parser,
        cache,
        tx: events.sender(),
    };

    remote.start_load(&mut state, true);
    remote.start_user_refresh();

    let result = run_app(&mut terminal, &mut state, events, &remote).await;

    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        DisableFocusChange,
        LeaveAlternateScreen,
        SetTitle("")
    )?;
    terminal.show_cursor()?;

    if state.auth_expired {
        eprintln!("GitHub session is invalid or expired. Run `gh auth login` and try again.");
        std::process::exit(1);
    }

    result
}

fn input_mode(state: &AppState) -> InputMode {
    if state.has_confirm_overlay() {
        InputMode::Confirm
    } else if state.search_input.is_some() {
        InputMode::Search
    } else {
        InputMode::Normal
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn list_height(state: &AppState) -> usize {
    state
        .list_area
        .map(|area| (area.bottom - area.top).max(0.0) as usize)
        .unwrap_or(0)
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    mut events: EventHandler,
    remote: &Remote,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let mode = input_mode(state);
        state.ensure_cursor_visible(list_height(state));
        terminal.draw(|f| tui::render::render(f, state, mode))?;

        // Refresh the geometry the mouse handling works against. Derived
        // from the same layout the draw used.
        let size = terminal.size()?;
        let screen = tui::layout(ratatui::layout::Rect::new(0, 0, size.width, size.height));
        state.list_area = Some(tui::to_geometry(screen.list));
        state.item_bounds = tui::list_row_bounds(screen.list, &state.repos, state.list_offset);

        state.prune_notifications();
        state.prune_error();

        if let Some(event) = events.next().await {
            match event {
                AppEvent::Key(key) => {
                    let ctx = InputContext {
                        has_error: state.error.is_some(),
                        is_loading: state.is_loading(),
                        has_selection: !state.selection.is_empty(),
                        mode: input_mode(state),
                    };
                    handle_action(input::map_key(key, &ctx), state, remote);
                }
                AppEvent::Mouse(mouse) => handle_mouse(mouse, state),
                AppEvent::FocusLost => {
                    // Pointer-up may happen in another window; never leave a
                    // drag live across a focus change.
                    state.selection.end_drag();
                    state.selection.set_shift(false);
                    state.auto_scroll.stop();
                }
                AppEvent::Resize => {}
                AppEvent::Tick => {
                    if last_tick.elapsed() >= Duration::from_millis(100) {
                        if state.is_loading() {
                            state.advance_spinner();
                        }
                        last_tick = Instant::now();
                        drive_auto_scroll(state);
                    }
                }
                AppEvent::ReposLoaded {
                    seq,
                    repos,
                    from_cache,
                } => {
                    state.end_loading();
                    if state.apply_repos(seq, repos) {
                        state.clear_error();
                        if from_cache {
                            tracing::debug!("list served from cache");
                        }
                    }
                }
                AppEvent::UserLoaded(user) => {
                    state.user = Some(user);
                }
                AppEvent::DeleteDone { full_name } => {
                    state.end_loading();
                    state.remove_repo(&full_name);
                    state.add_notification(format!("Deleted {full_name}"));
                    remote.start_user_refresh();
                }
                AppEvent::BatchDone(outcome) => {
                    state.end_loading();
                    state.apply_batch(&outcome);
                    state.add_notification(outcome.summary());
                    if let Some(first) = outcome.failed.first() {
                        state.set_error(format!(
                            "{} could not be deleted: {}",
                            first.full_name, first.reason
                        ));
                    }
                    #[cfg(feature = "desktop-notify")]
                    if state.config.desktop_notify {
                        ghrm::notify::send_batch_result(&outcome);
                    }
                    remote.start_user_refresh();
                }
                AppEvent::AuthExpired => {
                    if let Ok(mut cache) = remote.cache.lock() {
                        cache.clear();
                    }
                    state.reset_session();
                    state.auth_expired = true;
                    state.should_quit = true;
                }
                AppEvent::Error(e) => {
                    state.end_loading();
                    if state.load_phase == LoadPhase::Loading {
                        state.load_phase = LoadPhase::Failed;
                    }
                    state.set_error(e);
                }
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

fn handle_action(action: Action, state: &mut AppState, remote: &Remote) {
    match action {
        Action::Quit => state.should_quit = true,
        Action::DismissError => state.clear_error(),
        Action::MoveUp => state.move_cursor_up(),
        Action::MoveDown => state.move_cursor_down(),
        Action::NextPage => {
            if state.has_next_page() {
                let page = state.filters.page + 1;
                state.filters.set_page(page);
                remote.start_load(state, false);
            }
        }
        Action::PrevPage => {
            if state.filters.page > 1 {
                let page = state.filters.page - 1;
                state.filters.set_page(page);
                remote.start_load(state, false);
            }
        }
        Action::ToggleSelect => {
            if let Some(repo) = state.current_repo() {
                let full_name = repo.full_name.clone();
                state.selection.toggle(&full_name);
            }
        }
        Action::SelectAll => {
            let all: Vec<String> = state.repos.iter().map(|r| r.full_name.clone()).collect();
            state.selection.select_all(all.iter().map(String::as_str));
        }
        Action::ClearSelection => state.selection.clear(),
        Action::Refresh => remote.start_load(state, false),
        Action::DeleteCurrent => {
            if let Some(repo) = state.current_repo() {
                let full_name = repo.full_name.clone();
                state.open_confirm_overlay(
                    "Delete repository".to_string(),
                    format!("Permanently delete {full_name}? This cannot be undone."),
                    ConfirmAction::DeleteOne(full_name),
                );
            }
        }
        Action::DeleteSelected => {
            let names = state.selected_in_list_order();
            if !names.is_empty() {
                state.open_confirm_overlay(
                    "Delete selected repositories".to_string(),
                    format!(
                        "Permanently delete {} repositories? This cannot be undone.",
                        names.len()
                    ),
                    ConfirmAction::DeleteBatch(names),
                );
            }
        }
        Action::OpenBrowser => {
            if let Some(repo) = state.current_repo() {
                if let Err(e) = remote.executor.open_in_browser(&repo.html_url) {
                    state.set_error(e.to_string());
                }
            }
        }
        Action::CycleAffiliation => {
            state.filters.cycle_affiliation();
            remote.start_load(state, false);
        }
        Action::CycleVisibility => {
            state.filters.cycle_visibility();
            remote.start_load(state, false);
        }
        Action::CycleSort => {
            state.filters.cycle_sort();
            remote.start_load(state, false);
        }
        Action::ToggleDirection => {
            state.filters.toggle_direction();
            remote.start_load(state, false);
        }
        Action::CyclePerPage => {
            state.filters.cycle_per_page();
            remote.start_load(state, false);
        }
        Action::StartSearch => {
            state.search_input = Some(state.filters.search.clone());
        }
        Action::SearchChar(c) => {
            if let Some(buffer) = &mut state.search_input {
                buffer.push(c);
            }
        }
        Action::SearchBackspace => {
            if let Some(buffer) = &mut state.search_input {
                buffer.pop();
            }
        }
        Action::SearchSubmit => {
            if let Some(buffer) = state.search_input.take() {
                state.filters.set_search(buffer);
                remote.start_load(state, false);
            }
        }
        Action::SearchCancel => {
            state.search_input = None;
        }
        Action::ConfirmAccept => {
            let confirmed = state.confirm_action();
            state.close_confirm_overlay();
            match confirmed {
                Some(ConfirmAction::DeleteOne(full_name)) => {
                    remote.start_delete_one(state, full_name);
                }
                Some(ConfirmAction::DeleteBatch(full_names)) => {
                    remote.start_delete_batch(state, full_names);
                }
                None => {}
            }
        }
        Action::ConfirmCancel => state.close_confirm_overlay(),
        Action::None => {}
    }
}

fn handle_mouse(mouse: MouseEvent, state: &mut AppState) {
    state
        .selection
        .set_shift(mouse.modifiers.contains(KeyModifiers::SHIFT));
    if !state.selection.shift_held() {
        state.auto_scroll.stop();
    }

    let Some(list_area) = state.list_area else {
        return;
    };
    let x = f64::from(mouse.column);
    let y = f64::from(mouse.row);
    let inside_list = x >= list_area.left
        && x < list_area.right
        && y >= list_area.top
        && y < list_area.bottom;
    let local = Point::new(x - list_area.left, y - list_area.top);
    let height = list_area.bottom - list_area.top;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !inside_list {
                return;
            }
            if state.selection.shift_held() {
                state.selection.begin_drag(local);
            } else {
                // Plain click: move the cursor to the clicked row.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let row = state.list_offset + local.y as usize;
                if row < state.repos.len() {
                    state.cursor = row;
                }
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if state.selection.dragging() {
                state
                    .selection
                    .drag_update(local, state.list_area, &state.item_bounds);
                state.auto_scroll.update(local.y, height);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            state.selection.end_drag();
            state.auto_scroll.stop();
        }
        MouseEventKind::ScrollUp => state.scroll_list(-autoscroll::SCROLL_STEP_ROWS, list_height(state)),
        MouseEventKind::ScrollDown => state.scroll_list(autoscroll::SCROLL_STEP_ROWS, list_height(state)),
        _ => {}
    }
}

/// Edge auto-scroll runs off the tick so it continues while the pointer
/// rests in the edge band. After scrolling, the selection is re-derived
/// against the shifted row geometry.
fn drive_auto_scroll(state: &mut AppState) {
    if !state.selection.dragging() || !state.auto_scroll.is_running() {
        return;
    }
    let Some(list_area) = state.list_area else {
        return;
    };
    let height = list_area.bottom - list_area.top;
    let delta = state.auto_scroll.tick(height);
    if delta == 0 {
        return;
    }
    state.scroll_list(delta, list_height(state));
    if let Some(drag_box) = state.selection.drag_box() {
        // Rebuild row bounds at the new offset before re-deriving.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let area = ratatui::layout::Rect::new(
            list_area.left as u16,
            list_area.top as u16,
            (list_area.right - list_area.left) as u16,
            height as u16,
        );
        state.item_bounds = tui::list_row_bounds(area, &state.repos, state.list_offset);
        state
            .selection
            .drag_update(drag_box.end, state.list_area, &state.item_bounds);
    }
}
