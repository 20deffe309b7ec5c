use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

/// Which team members to enumerate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipType {
    /// Direct members plus those inherited through nested teams
    #[default]
    All,
    /// Direct members only
    Immediate,
}

impl MembershipType {
    pub fn as_str(self) -> &'static str {
        match self {
            MembershipType::All => "all",
            MembershipType::Immediate => "immediate",
        }
    }
}

impl fmt::Display for MembershipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
