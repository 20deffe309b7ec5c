use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Member {
    pub login: String,
}
