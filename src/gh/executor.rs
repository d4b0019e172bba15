use crate::gh::limiter::RateLimiter;
use crate::gh::ApiError;
use crate::traits::RepoExecutor;
use async_trait::async_trait;
use color_eyre::eyre::{eyre, Result};
use std::ffi::OsStr;
use tokio::process::Command;
use tokio::sync::Mutex;

pub async fn run_gh<I, S>(args: I) -> Result<String, ApiError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new("gh").args(args).output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApiError::GhMissing
        } else {
            ApiError::Spawn(e.to_string())
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(classify_stderr(&stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Map gh's stderr onto the error cases the app distinguishes. The auth
/// case matters most: it drives the session-reset path.
fn classify_stderr(stderr: &str) -> ApiError {
    let trimmed = stderr.trim();
    if trimmed.contains("HTTP 401")
        || trimmed.contains("not logged")
        || trimmed.contains("auth login")
        || trimmed.contains("Bad credentials")
    {
        return ApiError::AuthExpired;
    }
    if trimmed.contains("HTTP 404") {
        return ApiError::NotFound(trimmed.to_string());
    }
    if trimmed.contains("HTTP 403") {
        return ApiError::Forbidden(trimmed.to_string());
    }
    ApiError::Gh(trimmed.to_string())
}

/// Talks to GitHub through the `gh api` subcommand, so authentication,
/// token storage, and proxies stay gh's problem. All calls go through the
/// shared [`RateLimiter`].
pub struct GhExecutor {
    limiter: Mutex<RateLimiter>,
}

impl Default for GhExecutor {
    fn default() -> Self {
        Self::new(RateLimiter::default())
    }
}

impl GhExecutor {
    pub fn new(limiter: RateLimiter) -> Self {
        Self {
            limiter: Mutex::new(limiter),
        }
    }

    // With `-X GET`, gh appends `-f` fields to the URL query string and
    // handles the encoding.
    async fn api_get(&self, path: &str, params: &[(&'static str, String)]) -> Result<String, ApiError> {
        self.limiter.lock().await.acquire().await;
        let mut args: Vec<String> =
            vec!["api".to_string(), "-X".to_string(), "GET".to_string(), path.to_string()];
        for (key, value) in params {
            args.push("-f".to_string());
            args.push(format!("{key}={value}"));
        }
        run_gh(args).await
    }
}

#[async_trait]
impl RepoExecutor for GhExecutor {
    async fn check_available(&self) -> Result<(), ApiError> {
        run_gh(["auth", "status"]).await.map(|_| ())
    }

    async fn fetch_repos(&self, params: &[(&'static str, String)]) -> Result<String, ApiError> {
        self.api_get("user/repos", params).await
    }

    async fn search_repos(&self, params: &[(&'static str, String)]) -> Result<String, ApiError> {
        self.api_get("search/repositories", params).await
    }

    async fn fetch_user(&self) -> Result<String, ApiError> {
        self.api_get("user", &[]).await
    }

    async fn delete_repo(&self, full_name: &str) -> Result<(), ApiError> {
        self.limiter.lock().await.acquire().await;
        let path = format!("repos/{full_name}");
        run_gh(["api", "-X", "DELETE", path.as_str()])
            .await
            .map(|_| ())
    }

    fn open_in_browser(&self, url: &str) -> Result<()> {
        let (cmd, args): (&str, Vec<&str>) = if cfg!(target_os = "macos") {
            ("open", vec![url])
        } else if cfg!(target_os = "windows") {
            ("cmd", vec!["/C", "start", url])
        } else {
            ("xdg-open", vec![url])
        };
        std::process::Command::new(cmd)
            .args(&args)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| eyre!("Failed to open browser: {}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_401_classifies_as_auth() {
        assert!(classify_stderr("gh: Requires authentication (HTTP 401)").is_auth());
        assert!(classify_stderr("You are not logged into any GitHub hosts.").is_auth());
        assert!(classify_stderr("To get started with GitHub CLI, please run:  gh auth login").is_auth());
    }

    #[test]
    fn http_404_classifies_as_not_found() {
        let err = classify_stderr("gh: Not Found (HTTP 404)");
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn http_403_classifies_as_forbidden() {
        let err = classify_stderr("gh: Must have admin rights to Repository. (HTTP 403)");
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn anything_else_is_a_plain_gh_error() {
        let err = classify_stderr("gh: something unexpected\n");
        match err {
            ApiError::Gh(msg) => assert_eq!(msg, "gh: something unexpected"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
