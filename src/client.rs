use reqwest::{header::LINK, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::error::{GithubError, Result};

const API_VERSION: &str = "2022-11-28";
const ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("gh-team/", env!("CARGO_PKG_VERSION"));

pub struct GithubClient {
    http: Client,
    token: String,
    base_url: String,
    graphql_url: Url,
}

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Deserialize, Debug)]
struct GraphQLError {
    message: String,
}

/// One page of a REST list endpoint.
#[derive(Debug)]
pub struct RestPage<T> {
    pub items: Vec<T>,
    /// Page number advertised by the `rel="next"` link, if any
    pub next_page: Option<u32>,
}

impl GithubClient {
    pub fn new(token: String, base_url: &str, graphql_url: &str) -> Result<Self> {
        // validate early so a bad config fails before the first request
        Url::parse(base_url)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
            graphql_url: Url::parse(graphql_url)?,
        })
    }

    fn rest(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// GET a single REST resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!(path, "GET");
        let response = check_status(self.rest(path).send().await?).await?;
        Ok(response.json().await?)
    }

    /// GET one page of a REST list, reading the next page number from the `Link` header.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<RestPage<T>> {
        tracing::debug!(path, ?query, "GET page");
        let response = check_status(self.rest(path).query(query).send().await?).await?;

        let next_page = match response.headers().get(LINK) {
            Some(value) => {
                let value = value
                    .to_str()
                    .map_err(|_| GithubError::InvalidLinkHeader("non-ASCII header".to_string()))?;
                next_page(value)?
            }
            None => None,
        };

        let items = response.json().await?;
        Ok(RestPage { items, next_page })
    }

    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<T> {
        let request = GraphQLRequest { query, variables };
        tracing::debug!(url = %self.graphql_url, "POST graphql");

        let response = self
            .http
            .post(self.graphql_url.clone())
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let response = check_status(response).await?;
        let gql_response: GraphQLResponse<T> = response.json().await?;

        if let Some(errors) = gql_response.errors {
            return Err(GithubError::GraphQL {
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }

        gql_response.data.ok_or(GithubError::EmptyResponse)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    Err(GithubError::ApiError {
        status: response.status().as_u16(),
        message: response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read response body>".to_string()),
    })
}

/// Split a `Link` header into `(target, params)` entries. Only commas after the
/// closing `>` and outside quoted values separate entries.
fn link_entries(link: &str) -> Result<Vec<(&str, &str)>> {
    let mut entries = Vec::new();
    let mut rest = link.trim();

    while !rest.is_empty() {
        let malformed = || GithubError::InvalidLinkHeader(rest.to_string());
        let (target, after) = rest
            .strip_prefix('<')
            .and_then(|body| body.split_once('>'))
            .ok_or_else(malformed)?;

        let mut in_quotes = false;
        let end = after
            .char_indices()
            .find(|&(_, c)| {
                if c == '"' {
                    in_quotes = !in_quotes;
                }
                c == ',' && !in_quotes
            })
            .map_or(after.len(), |(i, _)| i);

        entries.push((target.trim(), &after[..end]));
        rest = after[end..].trim_start_matches(',').trim_start();
    }

    Ok(entries)
}

/// `rel` may be quoted or bare and may list several relation types.
fn has_rel_next(params: &str) -> bool {
    params
        .split(';')
        .filter_map(|param| param.split_once('='))
        .any(|(key, value)| {
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        })
}

/// Extract the `page` query parameter of the `rel="next"` entry of a `Link` header.
pub fn next_page(link: &str) -> Result<Option<u32>> {
    for (target, params) in link_entries(link)? {
        if !has_rel_next(params) {
            continue;
        }

        let url = Url::parse(target)?;
        let page = url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
            .ok_or_else(|| GithubError::InvalidLinkHeader(target.to_string()))?;

        return Ok(Some(page));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_next_page_from_link() {
        let link = r#"<https://api.github.com/organizations/1/team/2/members?per_page=2&page=3>; rel="next", <https://api.github.com/organizations/1/team/2/members?per_page=2&page=5>; rel="last""#;
        assert_eq!(next_page(link).unwrap(), Some(3));
    }

    #[test]
    fn test_no_next_on_last_page() {
        let link = r#"<https://api.github.com/organizations/1/team/2/members?page=1>; rel="prev", <https://api.github.com/organizations/1/team/2/members?page=1>; rel="first""#;
        assert_eq!(next_page(link).unwrap(), None);
    }

    #[test]
    fn test_next_without_page_param_is_rejected() {
        let link = r#"<https://api.github.com/organizations/1/team/2/members?cursor=abc>; rel="next""#;
        assert!(matches!(
            next_page(link),
            Err(GithubError::InvalidLinkHeader(_))
        ));
    }

    #[test]
    fn test_unquoted_rel() {
        let link = "<https://api.github.com/x?page=2>; rel=next";
        assert_eq!(next_page(link).unwrap(), Some(2));
    }

    #[test]
    fn test_multi_valued_rel() {
        let link = r#"<https://api.github.com/x?page=1>; rel="prev first", <https://api.github.com/x?page=4>; rel="next last""#;
        assert_eq!(next_page(link).unwrap(), Some(4));
    }

    #[test]
    fn test_comma_inside_target() {
        let link = r#"<https://api.github.com/x?q=a,b&page=1>; rel="prev", <https://api.github.com/x?q=a,b&page=2>; rel="next""#;
        assert_eq!(next_page(link).unwrap(), Some(2));
    }

    #[test]
    fn test_comma_inside_quoted_param() {
        let link = r#"<https://api.github.com/x?page=7>; title="a, b"; rel="next""#;
        assert_eq!(next_page(link).unwrap(), Some(7));
    }

    #[test]
    fn test_garbage_link_is_rejected() {
        assert!(next_page("not a link header").is_err());
    }

    #[tokio::test]
    async fn test_get_page_reads_link_header() {
        let server = MockServer::start().await;
        let next = format!("<{}/things?page=2>; rel=\"next\"", server.uri());

        Mock::given(method("GET"))
            .and(path("/things"))
            .and(query_param("per_page", "1"))
            .and(header("authorization", "Bearer t0ken"))
            .and(header("x-github-api-version", API_VERSION))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", next.as_str())
                    .set_body_json(json!([1])),
            )
            .mount(&server)
            .await;

        let client = GithubClient::new("t0ken".to_string(), &server.uri(), &server.uri()).unwrap();
        let page: RestPage<u32> = client
            .get_page("/things", &[("per_page", "1".to_string())])
            .await
            .unwrap();

        assert_eq!(page.items, vec![1]);
        assert_eq!(page.next_page, Some(2));
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orgs/acme/teams/nope"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let client = GithubClient::new("t".to_string(), &server.uri(), &server.uri()).unwrap();
        let err = client
            .get::<serde_json::Value>("/orgs/acme/teams/nope")
            .await
            .unwrap_err();

        match err {
            GithubError::ApiError { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_graphql_errors_are_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({ "variables": { "slug": "core" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Could not resolve to an Organization" }]
            })))
            .mount(&server)
            .await;

        let graphql_url = format!("{}/graphql", server.uri());
        let client = GithubClient::new("t".to_string(), &server.uri(), &graphql_url).unwrap();
        let err = client
            .query::<serde_json::Value>("query { x }", Some(json!({ "slug": "core" })))
            .await
            .unwrap_err();

        match err {
            GithubError::GraphQL { messages } => {
                assert_eq!(messages, vec!["Could not resolve to an Organization"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
