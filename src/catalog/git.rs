//! Git provider configuration for catalog entities

/// Repository an entity is linked to. An entity has at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitProvider {
    Github {
        repository: String,
        base_path: Option<String>,
    },
    Gitlab {
        repository: String,
        base_path: Option<String>,
    },
    AzureDevops {
        project: String,
        repository: String,
        base_path: Option<String>,
    },
    Bitbucket {
        repository: String,
    },
}

impl GitProvider {
    /// Key used under `x-cortex-git`
    pub fn key(&self) -> &'static str {
        match self {
            GitProvider::Github { .. } => "github",
            GitProvider::Gitlab { .. } => "gitlab",
            GitProvider::AzureDevops { .. } => "azure",
            GitProvider::Bitbucket { .. } => "bitbucket",
        }
    }

    pub fn repository(&self) -> &str {
        match self {
            GitProvider::Github { repository, .. }
            | GitProvider::Gitlab { repository, .. }
            | GitProvider::AzureDevops { repository, .. }
            | GitProvider::Bitbucket { repository } => repository,
        }
    }
}
