use async_trait::async_trait;
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::TeamArgs;
use crate::client::GithubClient;
use crate::config::Config;
use crate::error::{GithubError, Result};
use crate::output;
use crate::pagination::{Page, PageFetcher, PageToken, Pages, RestPages};
use crate::responses::TeamMembersResponse;
use crate::types::{Member, MembershipType, Owner, RepositoryDetail, Team, TeamRepository};

const IMMEDIATE_MEMBERS_QUERY: &str = r#"
query TeamMembers($owner: String!, $slug: String!, $memberCursor: String) {
    organization(login: $owner) {
        team(slug: $slug) {
            members(first: 100, after: $memberCursor, membership: IMMEDIATE) {
                nodes {
                    login
                }
                pageInfo {
                    endCursor
                    hasNextPage
                }
            }
        }
    }
}
"#;

/// Options of a single team read.
#[derive(Debug, Clone)]
pub struct TeamQuery {
    pub slug: String,
    pub membership_type: MembershipType,
    pub summary_only: bool,
    pub results_per_page: u32,
}

impl TeamQuery {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            membership_type: MembershipType::All,
            summary_only: false,
            results_per_page: 100,
        }
    }
}

/// Everything known about a team after one read.
#[derive(Serialize, Debug)]
pub struct TeamData {
    /// Decimal form of the numeric team ID
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub privacy: String,
    pub permission: String,
    pub node_id: String,
    pub members: Vec<String>,
    pub repositories: Vec<String>,
    pub repositories_detailed: Vec<RepositoryDetail>,
    pub membership_type: MembershipType,
    pub summary_only: bool,
    pub results_per_page: u32,
}

/// Direct members of a team, one GraphQL page per cursor.
pub struct ImmediateMembers<'a> {
    client: &'a GithubClient,
    owner: &'a str,
    slug: &'a str,
}

impl<'a> ImmediateMembers<'a> {
    pub fn new(client: &'a GithubClient, owner: &'a str, slug: &'a str) -> Self {
        Self {
            client,
            owner,
            slug,
        }
    }
}

#[async_trait]
impl<'a> PageFetcher for ImmediateMembers<'a> {
    type Item = Member;

    async fn fetch(&self, token: &PageToken) -> Result<Page<Member>> {
        let cursor = match token {
            PageToken::First => None,
            PageToken::Cursor(c) => Some(c.as_str()),
            PageToken::Number(_) => return Err(GithubError::UnexpectedPageToken(token.to_string())),
        };

        let variables = json!({
            "owner": self.owner,
            "slug": self.slug,
            "memberCursor": cursor,
        });
        let response: TeamMembersResponse = self
            .client
            .query(IMMEDIATE_MEMBERS_QUERY, Some(variables))
            .await?;

        let members = response
            .organization
            .and_then(|org| org.team)
            .map(|team| team.members)
            .ok_or_else(|| GithubError::TeamNotFound(self.slug.to_string()))?;

        let next = if members.page_info.has_next_page {
            let cursor = members
                .page_info
                .end_cursor
                .ok_or(GithubError::MissingEndCursor)?;
            Some(PageToken::Cursor(cursor))
        } else {
            None
        };

        Ok(Page {
            items: members.nodes,
            next,
        })
    }
}

pub async fn lookup_owner(client: &GithubClient, login: &str) -> Result<Owner> {
    client.get(&format!("/orgs/{login}")).await
}

pub async fn resolve_team(client: &GithubClient, owner: &Owner, slug: &str) -> Result<Team> {
    client
        .get(&format!("/orgs/{}/teams/{slug}", owner.login))
        .await
}

fn members_fetcher<'a>(
    client: &'a GithubClient,
    owner: &'a Owner,
    team: &Team,
    query: &'a TeamQuery,
) -> Box<dyn PageFetcher<Item = Member> + 'a> {
    match query.membership_type {
        MembershipType::All => Box::new(RestPages::new(
            client,
            format!("/organizations/{}/team/{}/members", owner.id, team.id),
            query.results_per_page,
        )),
        MembershipType::Immediate => {
            Box::new(ImmediateMembers::new(client, &owner.login, &query.slug))
        }
    }
}

pub async fn list_members(
    client: &GithubClient,
    owner: &Owner,
    team: &Team,
    query: &TeamQuery,
) -> Result<Vec<String>> {
    let members = Pages::new(members_fetcher(client, owner, team, query))
        .try_collect()
        .await?;
    Ok(members.into_iter().map(|m| m.login).collect())
}

pub async fn list_repositories(
    client: &GithubClient,
    owner: &Owner,
    team: &Team,
    per_page: u32,
) -> Result<Vec<TeamRepository>> {
    let fetcher = RestPages::new(
        client,
        format!("/organizations/{}/team/{}/repos", owner.id, team.id),
        per_page,
    );
    Pages::new(fetcher).try_collect().await
}

/// Resolve the team, then enumerate members and repositories unless only a summary is wanted.
pub async fn read(client: &GithubClient, owner: &Owner, query: &TeamQuery) -> Result<TeamData> {
    let team = resolve_team(client, owner, &query.slug).await?;
    tracing::debug!(slug = %team.slug, id = team.id, "resolved team");

    let (members, repositories) = if query.summary_only {
        (Vec::new(), Vec::new())
    } else {
        let members = list_members(client, owner, &team, query).await?;
        let repositories = list_repositories(client, owner, &team, query.results_per_page).await?;
        (members, repositories)
    };

    tracing::info!(
        slug = %query.slug,
        members = members.len(),
        repositories = repositories.len(),
        "read team"
    );

    Ok(TeamData {
        id: team.id.to_string(),
        slug: query.slug.clone(),
        name: team.name,
        description: team.description.unwrap_or_default(),
        privacy: team.privacy.unwrap_or_default(),
        permission: team.permission.unwrap_or_default(),
        node_id: team.node_id,
        members,
        repositories_detailed: repositories.iter().map(RepositoryDetail::from).collect(),
        repositories: repositories.into_iter().map(|r| r.name).collect(),
        membership_type: query.membership_type,
        summary_only: query.summary_only,
        results_per_page: query.results_per_page,
    })
}

#[derive(Tabled)]
struct RepositoryRow {
    #[tabled(rename = "Repository")]
    name: String,
    #[tabled(rename = "ID")]
    repo_id: i64,
    #[tabled(rename = "Role")]
    role_name: String,
}

fn display(team: &TeamData) {
    println!("{} ({})", team.name.bold(), team.slug);
    if !team.description.is_empty() {
        println!("{}", team.description);
    }
    println!();
    println!("ID:         {}", team.id);
    println!("Node ID:    {}", team.node_id);
    println!("Privacy:    {}", team.privacy);
    println!("Permission: {}", team.permission);

    if team.summary_only {
        return;
    }

    println!();
    println!(
        "{} ({}, {})",
        "Members".bold(),
        team.members.len(),
        team.membership_type
    );
    for login in &team.members {
        println!("  {login}");
    }

    println!();
    println!("{} ({})", "Repositories".bold(), team.repositories.len());
    if team.repositories.is_empty() {
        return;
    }
    let rows: Vec<RepositoryRow> = team
        .repositories
        .iter()
        .zip(&team.repositories_detailed)
        .map(|(name, detail)| RepositoryRow {
            name: name.clone(),
            repo_id: detail.repo_id,
            role_name: detail.role_name.clone(),
        })
        .collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

pub async fn show(client: &GithubClient, config: &Config, args: TeamArgs) -> Result<()> {
    let login = config.resolve_owner(args.org.as_deref())?;
    let owner = lookup_owner(client, &login).await?;

    let query = TeamQuery {
        membership_type: args.membership_type,
        summary_only: args.summary_only,
        results_per_page: args.results_per_page,
        ..TeamQuery::new(args.slug)
    };
    let team = read(client, &owner, &query).await?;

    output::print_item(&team, display);
    Ok(())
}
