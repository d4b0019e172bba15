use crate::app::{GhUser, RepoItem};
use crate::gh::ApiError;
use async_trait::async_trait;
use color_eyre::eyre::Result;

#[async_trait]
pub trait RepoExecutor: Send + Sync {
    async fn check_available(&self) -> Result<(), ApiError>;
    async fn fetch_repos(&self, params: &[(&'static str, String)]) -> Result<String, ApiError>;
    async fn search_repos(&self, params: &[(&'static str, String)]) -> Result<String, ApiError>;
    async fn fetch_user(&self) -> Result<String, ApiError>;
    async fn delete_repo(&self, full_name: &str) -> Result<(), ApiError>;
    fn open_in_browser(&self, url: &str) -> Result<()>;
}

pub trait RepoParser: Send + Sync {
    fn parse_repos(&self, json: &str) -> Result<Vec<RepoItem>>;
    fn parse_user(&self, json: &str) -> Result<GhUser>;
}
