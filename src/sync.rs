//! Async orchestration between the UI loop and the remote boundary.
//!
//! Every function here is meant to run inside a spawned task: it performs
//! the remote call, then reports back over the event channel. Results never
//! touch [`crate::app::AppState`] directly, so all state mutation stays on
//! the main loop.

use crate::app::RepoItem;
use crate::cache::SnapshotCache;
use crate::events::AppEvent;
use crate::filters::{FilterState, SortKey, Visibility};
use crate::gh::ApiError;
use crate::traits::{RepoExecutor, RepoParser};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

pub type RepoCache = Arc<Mutex<SnapshotCache<Vec<RepoItem>>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub full_name: String,
    pub reason: String,
}

/// Result of a batch delete: which repositories went away and which did
/// not. Never an all-or-nothing error, a partial batch is still progress.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub successful: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn requested(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "Deleted {} of {} repositories",
            self.successful.len(),
            self.requested()
        )
    }
}

/// Which remote endpoint a filter state maps to. A non-empty search term
/// switches to the search endpoint, which speaks a different dialect.
#[derive(Debug, PartialEq, Eq)]
pub enum ListRequest {
    List(Vec<(&'static str, String)>),
    Search(Vec<(&'static str, String)>),
}

/// Map filter state onto endpoint parameters.
///
/// The search endpoint has no `affiliation` (the `user:@me` qualifier
/// already scopes to the signed-in account), folds visibility into the
/// query string, and only understands `updated` among our sort keys.
pub fn build_request(filters: &FilterState) -> ListRequest {
    if filters.search.is_empty() {
        let mut params = vec![
            ("affiliation", filters.affiliation.as_str().to_string()),
            ("sort", filters.sort.as_str().to_string()),
            ("direction", filters.direction.as_str().to_string()),
            ("per_page", filters.per_page.to_string()),
            ("page", filters.page.to_string()),
        ];
        if filters.visibility != Visibility::All {
            params.insert(1, ("visibility", filters.visibility.as_str().to_string()));
        }
        ListRequest::List(params)
    } else {
        let mut q = format!("{} user:@me", filters.search);
        match filters.visibility {
            Visibility::All => {}
            Visibility::Public => q.push_str(" is:public"),
            Visibility::Private => q.push_str(" is:private"),
        }
        let mut params = vec![("q", q)];
        if filters.sort == SortKey::Updated {
            params.push(("sort", "updated".to_string()));
            params.push(("order", filters.direction.as_str().to_string()));
        }
        params.push(("per_page", filters.per_page.to_string()));
        params.push(("page", filters.page.to_string()));
        ListRequest::Search(params)
    }
}

/// Canonical cache key for a request. Stable field order comes from
/// [`build_request`].
pub fn cache_key(request: &ListRequest) -> String {
    let (path, params) = match request {
        ListRequest::List(params) => ("user/repos", params),
        ListRequest::Search(params) => ("search/repositories", params),
    };
    let mut key = String::from(path);
    for (i, (k, v)) in params.iter().enumerate() {
        key.push(if i == 0 { '?' } else { '&' });
        key.push_str(k);
        key.push('=');
        key.push_str(v);
    }
    key
}

fn report(tx: &mpsc::UnboundedSender<AppEvent>, err: ApiError) {
    let event = if err.is_auth() {
        AppEvent::AuthExpired
    } else {
        AppEvent::Error(err.to_string())
    };
    if tx.send(event).is_err() {
        tracing::warn!("event channel closed");
    }
}

/// Fetch one page of repositories for the given filters. When `use_cache`
/// is set, a fresh snapshot short-circuits the remote call; explicit
/// refreshes and filter changes pass `use_cache = false`.
pub async fn load_repos(
    executor: Arc<dyn RepoExecutor>,
    parser: Arc<dyn RepoParser>,
    cache: RepoCache,
    filters: FilterState,
    seq: u64,
    use_cache: bool,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    let request = build_request(&filters);
    let key = cache_key(&request);

    if use_cache {
        let hit = match cache.lock() {
            Ok(mut cache) => cache.get(&key).cloned(),
            Err(_) => None,
        };
        if let Some(repos) = hit {
            let _ = tx.send(AppEvent::ReposLoaded {
                seq,
                repos,
                from_cache: true,
            });
            return;
        }
    }

    let fetched = match &request {
        ListRequest::List(params) => executor.fetch_repos(params).await,
        ListRequest::Search(params) => executor.search_repos(params).await,
    };
    let json = match fetched {
        Ok(json) => json,
        Err(err) => {
            report(&tx, err);
            return;
        }
    };
    match parser.parse_repos(&json) {
        Ok(repos) => {
            if let Ok(mut cache) = cache.lock() {
                cache.insert(key, repos.clone());
            }
            let _ = tx.send(AppEvent::ReposLoaded {
                seq,
                repos,
                from_cache: false,
            });
        }
        Err(e) => {
            let _ = tx.send(AppEvent::Error(format!("Parse error: {e}")));
        }
    }
}

/// Delete a single repository. List snapshots are invalidated wholesale:
/// any cached page could contain the deleted entry.
pub async fn delete_one(
    executor: Arc<dyn RepoExecutor>,
    cache: RepoCache,
    full_name: String,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    match executor.delete_repo(&full_name).await {
        Ok(()) => {
            if let Ok(mut cache) = cache.lock() {
                cache.clear();
            }
            let _ = tx.send(AppEvent::DeleteDone { full_name });
        }
        Err(err) => report(&tx, err),
    }
}

/// Delete a batch of repositories sequentially, collecting per-item
/// outcomes. An invalid session aborts the remainder (every further call
/// would fail the same way); what already succeeded is still reported.
pub async fn delete_batch(
    executor: Arc<dyn RepoExecutor>,
    cache: RepoCache,
    full_names: Vec<String>,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    let mut outcome = BatchOutcome::default();
    let mut auth_expired = false;

    for full_name in full_names {
        if auth_expired {
            outcome.failed.push(BatchFailure {
                full_name,
                reason: "session expired".to_string(),
            });
            continue;
        }
        match executor.delete_repo(&full_name).await {
            Ok(()) => outcome.successful.push(full_name),
            Err(err) => {
                if err.is_auth() {
                    auth_expired = true;
                }
                outcome.failed.push(BatchFailure {
                    full_name,
                    reason: err.to_string(),
                });
            }
        }
    }

    if !outcome.successful.is_empty() {
        if let Ok(mut cache) = cache.lock() {
            cache.clear();
        }
    }
    let _ = tx.send(AppEvent::BatchDone(outcome));
    if auth_expired {
        let _ = tx.send(AppEvent::AuthExpired);
    }
}

/// Refresh the account header. Failures are logged, not surfaced: stale
/// profile numbers are not worth a toast.
pub async fn refresh_user(
    executor: Arc<dyn RepoExecutor>,
    parser: Arc<dyn RepoParser>,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    let json = match executor.fetch_user().await {
        Ok(json) => json,
        Err(err) => {
            if err.is_auth() {
                report(&tx, err);
            } else {
                tracing::warn!("user refresh failed: {err}");
            }
            return;
        }
    };
    match parser.parse_user(&json) {
        Ok(user) => {
            let _ = tx.send(AppEvent::UserLoaded(user));
        }
        Err(e) => tracing::warn!("user parse failed: {e}"),
    }
}
