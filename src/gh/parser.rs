use crate::app::{GhUser, RepoItem};
use crate::traits::RepoParser;
use color_eyre::eyre::Result;

/// The list endpoint returns a bare array; the search endpoint wraps the
/// same objects in an `items` envelope. Accept both so callers don't need
/// to know which endpoint produced the payload.
pub fn parse_repos(json: &str) -> Result<Vec<RepoItem>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum RepoPayload {
        List(Vec<RepoItem>),
        Search { items: Vec<RepoItem> },
    }

    match serde_json::from_str(json)? {
        RepoPayload::List(repos) => Ok(repos),
        RepoPayload::Search { items } => Ok(items),
    }
}

pub fn parse_user(json: &str) -> Result<GhUser> {
    let user: GhUser = serde_json::from_str(json)?;
    Ok(user)
}

pub struct GhParser;

impl RepoParser for GhParser {
    fn parse_repos(&self, json: &str) -> Result<Vec<RepoItem>> {
        parse_repos(json)
    }

    fn parse_user(&self, json: &str) -> Result<GhUser> {
        parse_user(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_REPO_JSON: &str = r#"[
        {
            "id": 101,
            "name": "old-experiment",
            "full_name": "octocat/old-experiment",
            "description": "Abandoned prototype",
            "private": true,
            "html_url": "https://github.com/octocat/old-experiment",
            "updated_at": "2024-03-10T08:30:00Z",
            "language": "Rust",
            "stargazers_count": 3,
            "forks_count": 1
        }
    ]"#;

    #[test]
    fn parse_single_repo() {
        let repos = parse_repos(SINGLE_REPO_JSON).unwrap();
        assert_eq!(repos.len(), 1);
        let repo = &repos[0];
        assert_eq!(repo.id, 101);
        assert_eq!(repo.name, "old-experiment");
        assert_eq!(repo.full_name, "octocat/old-experiment");
        assert_eq!(repo.description.as_deref(), Some("Abandoned prototype"));
        assert!(repo.private);
        assert_eq!(repo.language.as_deref(), Some("Rust"));
        assert_eq!(repo.stargazers_count, 3);
    }

    #[test]
    fn parse_null_description_and_language() {
        let json = r#"[{
            "id": 1, "name": "r", "full_name": "u/r",
            "description": null, "private": false,
            "html_url": "https://github.com/u/r",
            "updated_at": "2024-01-01T00:00:00Z",
            "language": null, "stargazers_count": 0, "forks_count": 0
        }]"#;
        let repos = parse_repos(json).unwrap();
        assert!(repos[0].description.is_none());
        assert!(repos[0].language.is_none());
    }

    #[test]
    fn parse_search_envelope() {
        let json = r#"{
            "total_count": 1,
            "incomplete_results": false,
            "items": [{
                "id": 7, "name": "r", "full_name": "u/r",
                "private": false,
                "html_url": "https://github.com/u/r",
                "updated_at": "2024-01-01T00:00:00Z"
            }]
        }"#;
        let repos = parse_repos(json).unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].full_name, "u/r");
    }

    #[test]
    fn parse_empty_array() {
        assert!(parse_repos("[]").unwrap().is_empty());
    }

    #[test]
    fn parse_empty_search_result() {
        let json = r#"{"total_count": 0, "incomplete_results": false, "items": []}"#;
        assert!(parse_repos(json).unwrap().is_empty());
    }

    #[test]
    fn counts_default_when_absent() {
        let json = r#"[{
            "id": 1, "name": "r", "full_name": "u/r", "private": false,
            "html_url": "https://github.com/u/r",
            "updated_at": "2024-01-01T00:00:00Z"
        }]"#;
        let repos = parse_repos(json).unwrap();
        assert_eq!(repos[0].stargazers_count, 0);
        assert_eq!(repos[0].forks_count, 0);
    }

    #[test]
    fn parse_invalid_json_error() {
        assert!(parse_repos("not json").is_err());
    }

    #[test]
    fn parse_missing_fields_error() {
        assert!(parse_repos(r#"[{"id": 1}]"#).is_err());
    }

    #[test]
    fn parse_unicode_description() {
        let json = r#"[{
            "id": 1, "name": "r", "full_name": "u/r",
            "description": "日本語のメモ 🚀", "private": false,
            "html_url": "https://github.com/u/r",
            "updated_at": "2024-01-01T00:00:00Z"
        }]"#;
        let repos = parse_repos(json).unwrap();
        assert_eq!(repos[0].description.as_deref(), Some("日本語のメモ 🚀"));
    }

    #[test]
    fn parse_user_profile() {
        let json = r#"{
            "login": "octocat",
            "name": "The Octocat",
            "public_repos": 8,
            "total_private_repos": 4,
            "followers": 20,
            "following": 0
        }"#;
        let user = parse_user(json).unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.name.as_deref(), Some("The Octocat"));
        assert_eq!(user.public_repos, 8);
        assert_eq!(user.total_private_repos, 4);
    }

    #[test]
    fn parse_user_minimal() {
        let user = parse_user(r#"{"login": "octocat"}"#).unwrap();
        assert_eq!(user.login, "octocat");
        assert!(user.name.is_none());
        assert_eq!(user.public_repos, 0);
    }

    #[test]
    fn parse_user_invalid_error() {
        assert!(parse_user(r#"{"no_login": true}"#).is_err());
    }
}
