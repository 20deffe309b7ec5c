use serde::Deserialize;

/// Team as returned by `GET /orgs/{org}/teams/{slug}`.
#[derive(Deserialize, Debug, Clone)]
pub struct Team {
    pub id: i64,
    pub node_id: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub privacy: Option<String>,
    pub permission: Option<String>,
}
