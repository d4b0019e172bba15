#![allow(dead_code)]

use chrono::Utc;
use ghrm::app::{AppState, GhUser, RepoItem};

pub fn repo(full_name: &str) -> RepoItem {
    RepoItem {
        id: 1,
        name: full_name
            .rsplit('/')
            .next()
            .unwrap_or(full_name)
            .to_string(),
        full_name: full_name.to_string(),
        description: Some("fixture repository".to_string()),
        private: false,
        html_url: format!("https://github.com/{full_name}"),
        updated_at: Utc::now(),
        language: Some("Rust".to_string()),
        stargazers_count: 2,
        forks_count: 0,
    }
}

pub fn private_repo(full_name: &str) -> RepoItem {
    let mut r = repo(full_name);
    r.private = true;
    r
}

pub fn repos(names: &[&str]) -> Vec<RepoItem> {
    names.iter().map(|n| repo(n)).collect()
}

pub fn user(login: &str) -> GhUser {
    GhUser {
        login: login.to_string(),
        name: None,
        public_repos: 5,
        total_private_repos: 3,
        followers: 1,
        following: 2,
    }
}

pub fn state_with_repos(names: &[&str]) -> AppState {
    let mut state = AppState::new("test".to_string(), false);
    let seq = state.next_load_seq();
    state.apply_repos(seq, repos(names));
    state
}

pub fn repo_list_json(names: &[&str]) -> String {
    let items: Vec<String> = names
        .iter()
        .map(|full_name| {
            format!(
                r#"{{"id": 1, "name": "r", "full_name": "{full_name}",
                "description": "fixture repository", "private": false,
                "html_url": "https://github.com/{full_name}",
                "updated_at": "2024-05-01T12:00:00Z",
                "language": "Rust", "stargazers_count": 2, "forks_count": 0}}"#
            )
        })
        .collect();
    format!("[{}]", items.join(","))
}
