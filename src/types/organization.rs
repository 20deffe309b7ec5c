use serde::Deserialize;

/// Organization context every team call is scoped to.
#[derive(Deserialize, Debug, Clone)]
pub struct Owner {
    pub id: i64,
    pub login: String,
}
