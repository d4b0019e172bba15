//! Application data model and list/selection state management.

use crate::filters::FilterState;
use crate::select::autoscroll::AutoScroll;
use crate::select::geometry::Rect;
use crate::select::Selection;
use crate::sync::BatchOutcome;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Long enough to read; short enough to not permanently obscure the list.
pub const ERROR_TTL_SECS: u64 = 10;
pub const NOTIFICATION_TTL_SECS: u64 = 5;
/// Must match the length of `BRAILLE_FRAMES` in `tui::render`.
pub const SPINNER_FRAME_COUNT: usize = 10;
/// Below 70 cols the filter summary and key hints don't fit — compact layout.
pub const NARROW_WIDTH_THRESHOLD: u16 = 70;

/// Unicode-width-aware truncation with ellipsis.
/// Returns `""` when `max_width` is 0.
pub fn truncate(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthStr;
    if max_width == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(s) <= max_width {
        s.to_string()
    } else {
        let mut result = String::new();
        let mut width = 0;
        for c in s.chars() {
            let cw = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if width + cw + 1 > max_width {
                result.push('\u{2026}');
                break;
            }
            result.push(c);
            width += cw;
        }
        result
    }
}

/// One repository as returned by the list endpoints. `full_name` is the
/// identity key everywhere (selection, deletes, cache reconciliation).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RepoItem {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub private: bool,
    pub html_url: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
}

/// Aggregate account data for the header. Refreshed out-of-band after
/// deletes; a failed refresh is non-fatal.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GhUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub total_private_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub timestamp: std::time::Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteOne(String),
    DeleteBatch(Vec<String>),
}

pub struct ConfirmOverlay {
    pub title: String,
    pub message: String,
    pub action: ConfirmAction,
}

/// At most one overlay active at a time (not a stack). New overlay replaces
/// previous.
pub enum ActiveOverlay {
    None,
    Confirm(ConfirmOverlay),
}

/// List-load lifecycle. `Failed` keeps the previous list on screen; only an
/// invalid session empties it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Immutable configuration set at startup.
pub struct AppConfig {
    pub version_string: String,
    pub desktop_notify: bool,
}

pub struct AppState {
    pub config: AppConfig,

    // Repository list
    pub repos: Vec<RepoItem>,
    pub user: Option<GhUser>,
    pub filters: FilterState,
    /// Page-size heuristic: a full page bumps this to `page + 1`. An
    /// approximation, not a count — the API has no cheap total.
    pub total_pages: u32,
    pub load_phase: LoadPhase,
    /// Sequence of the most recently issued load. Results carrying an older
    /// sequence are discarded (last-issued-wins).
    pub load_seq: u64,

    // Selection
    pub selection: Selection,
    pub auto_scroll: AutoScroll,
    /// Screen bounds per repo row, rebuilt from the layout every frame.
    pub item_bounds: HashMap<String, Rect>,
    pub list_area: Option<Rect>,

    // List navigation
    pub cursor: usize,
    pub list_offset: usize,

    // Transient UI
    pub notifications: Vec<Notification>,
    pub error: Option<(String, std::time::Instant)>,
    pub spinner_frame: usize,
    pub loading_count: u16,
    pub should_quit: bool,
    /// Set when the remote boundary reported an invalid session; the caller
    /// prints a sign-in hint after the terminal is restored.
    pub auth_expired: bool,
    pub search_input: Option<String>,

    pub overlay: ActiveOverlay,
}

impl AppState {
    pub fn new(version_string: String, desktop_notify: bool) -> Self {
        Self {
            config: AppConfig {
                version_string,
                desktop_notify,
            },
            repos: vec![],
            user: None,
            filters: FilterState::default(),
            total_pages: 1,
            load_phase: LoadPhase::Idle,
            load_seq: 0,
            selection: Selection::default(),
            auto_scroll: AutoScroll::default(),
            item_bounds: HashMap::new(),
            list_area: None,
            cursor: 0,
            list_offset: 0,
            notifications: Vec::new(),
            error: None,
            spinner_frame: 0,
            loading_count: 0,
            should_quit: false,
            auth_expired: false,
            search_input: None,
            overlay: ActiveOverlay::None,
        }
    }

    /// Issue a new load sequence. The result for any earlier sequence is
    /// stale by definition.
    pub fn next_load_seq(&mut self) -> u64 {
        self.load_seq += 1;
        self.load_seq
    }

    /// Apply a finished list load. Returns `false` (and changes nothing)
    /// when the result was superseded by a later load.
    pub fn apply_repos(&mut self, seq: u64, repos: Vec<RepoItem>) -> bool {
        if seq != self.load_seq {
            tracing::debug!("discarding stale list result (seq {seq} < {})", self.load_seq);
            return false;
        }
        self.repos = repos;
        self.load_phase = LoadPhase::Loaded;
        self.total_pages = if self.repos.len() as u32 == self.filters.per_page {
            self.filters.page + 1
        } else {
            self.filters.page
        };
        self.reconcile_selection();
        self.clamp_cursor();
        true
    }

    pub fn has_next_page(&self) -> bool {
        self.filters.page < self.total_pages
    }

    /// Remove a single repository after a successful remote delete. No
    /// refetch — the list and selection are updated in place.
    pub fn remove_repo(&mut self, full_name: &str) {
        self.repos.retain(|r| r.full_name != full_name);
        self.reconcile_selection();
        self.clamp_cursor();
    }

    /// Fold a batch-delete outcome into the list. Only the successful names
    /// leave; failed ones stay listed (and stay selected) so the user can see
    /// and retry them. A fully successful batch clears the selection.
    pub fn apply_batch(&mut self, outcome: &BatchOutcome) {
        self.repos
            .retain(|r| !outcome.successful.contains(&r.full_name));
        if outcome.failed.is_empty() {
            self.selection.clear();
        } else {
            self.reconcile_selection();
        }
        self.total_pages = ((self.repos.len() as u32).div_ceil(self.filters.per_page)).max(1);
        self.clamp_cursor();
    }

    /// The one well-defined point where selection and list are re-synced.
    fn reconcile_selection(&mut self) {
        let live: Vec<&str> = self.repos.iter().map(|r| r.full_name.as_str()).collect();
        self.selection.reconcile(live);
    }

    /// Hard reset on logout or an invalid session.
    pub fn reset_session(&mut self) {
        self.repos.clear();
        self.user = None;
        self.selection.clear();
        self.auto_scroll.stop();
        self.total_pages = 1;
        self.load_phase = LoadPhase::Idle;
        self.cursor = 0;
        self.list_offset = 0;
        self.overlay = ActiveOverlay::None;
    }

    fn clamp_cursor(&mut self) {
        if self.repos.is_empty() {
            self.cursor = 0;
            self.list_offset = 0;
        } else if self.cursor >= self.repos.len() {
            self.cursor = self.repos.len() - 1;
        }
    }

    pub fn current_repo(&self) -> Option<&RepoItem> {
        self.repos.get(self.cursor)
    }

    /// Selected names in list order, for deterministic batch requests.
    pub fn selected_in_list_order(&self) -> Vec<String> {
        self.repos
            .iter()
            .filter(|r| self.selection.contains(&r.full_name))
            .map(|r| r.full_name.clone())
            .collect()
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_down(&mut self) {
        if !self.repos.is_empty() && self.cursor < self.repos.len() - 1 {
            self.cursor += 1;
        }
    }

    /// Keep the cursor row inside the visible window of `height` rows.
    pub fn ensure_cursor_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.list_offset {
            self.list_offset = self.cursor;
        } else if self.cursor >= self.list_offset + height {
            self.list_offset = self.cursor + 1 - height;
        }
    }

    /// Apply an auto-scroll delta to the list offset, clamped to the list.
    pub fn scroll_list(&mut self, delta: i32, height: usize) {
        let max_offset = self.repos.len().saturating_sub(height.max(1));
        if delta.is_negative() {
            self.list_offset = self.list_offset.saturating_sub(delta.unsigned_abs() as usize);
        } else {
            self.list_offset = (self.list_offset + delta as usize).min(max_offset);
        }
    }

    // --- transient UI ---

    pub fn is_loading(&self) -> bool {
        self.loading_count > 0
    }

    pub fn begin_loading(&mut self) {
        self.loading_count = self.loading_count.saturating_add(1);
        self.load_phase = LoadPhase::Loading;
    }

    pub fn end_loading(&mut self) {
        self.loading_count = self.loading_count.saturating_sub(1);
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAME_COUNT;
    }

    pub fn set_error(&mut self, msg: String) {
        self.error = Some((msg, std::time::Instant::now()));
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn prune_error(&mut self) {
        if let Some((_, ts)) = &self.error {
            if ts.elapsed().as_secs() >= ERROR_TTL_SECS {
                self.error = None;
            }
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|(msg, _)| msg.as_str())
    }

    pub fn add_notification(&mut self, message: String) {
        self.notifications.push(Notification {
            message,
            timestamp: std::time::Instant::now(),
        });
    }

    pub fn prune_notifications(&mut self) {
        let now = std::time::Instant::now();
        self.notifications
            .retain(|n| now.duration_since(n.timestamp).as_secs() < NOTIFICATION_TTL_SECS);
    }

    // --- confirm overlay ---

    pub fn has_confirm_overlay(&self) -> bool {
        matches!(self.overlay, ActiveOverlay::Confirm(_))
    }

    pub fn confirm_action(&self) -> Option<ConfirmAction> {
        if let ActiveOverlay::Confirm(ref overlay) = self.overlay {
            Some(overlay.action.clone())
        } else {
            None
        }
    }

    pub fn open_confirm_overlay(&mut self, title: String, message: String, action: ConfirmAction) {
        self.overlay = ActiveOverlay::Confirm(ConfirmOverlay {
            title,
            message,
            action,
        });
    }

    pub fn close_confirm_overlay(&mut self) {
        if matches!(self.overlay, ActiveOverlay::Confirm(_)) {
            self.overlay = ActiveOverlay::None;
        }
    }
}
