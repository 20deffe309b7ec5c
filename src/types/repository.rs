use serde::{Deserialize, Serialize};

/// Repository as listed under a team, carrying the team's role on it.
#[derive(Deserialize, Debug, Clone)]
pub struct TeamRepository {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub role_name: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RepositoryDetail {
    pub repo_id: i64,
    pub role_name: String,
}

impl From<&TeamRepository> for RepositoryDetail {
    fn from(repo: &TeamRepository) -> Self {
        Self {
            repo_id: repo.id,
            role_name: repo.role_name.clone().unwrap_or_default(),
        }
    }
}
