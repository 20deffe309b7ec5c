//! Shared GraphQL response types.

use serde::Deserialize;

use crate::types::Member;

/// Pagination info for cursor-based pagination.
#[derive(Deserialize, Debug)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
}

/// `organization { team { members } }` response for the immediate-members query.
#[derive(Deserialize, Debug)]
pub struct TeamMembersResponse {
    pub organization: Option<OrganizationNode>,
}

#[derive(Deserialize, Debug)]
pub struct OrganizationNode {
    pub team: Option<TeamMembersNode>,
}

#[derive(Deserialize, Debug)]
pub struct TeamMembersNode {
    pub members: MemberConnection,
}

#[derive(Deserialize, Debug)]
pub struct MemberConnection {
    pub nodes: Vec<Member>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
}
