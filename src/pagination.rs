//! Page-at-a-time enumeration of upstream list endpoints.
//!
//! A [`PageFetcher`] knows how to turn a [`PageToken`] into one [`Page`].
//! [`Pages`] drives a fetcher from the first page until the upstream stops
//! advertising a next token, yielding each page exactly once.

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::client::GithubClient;
use crate::error::{GithubError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    First,
    /// REST page number taken from a `Link` header
    Number(u32),
    /// GraphQL `endCursor`
    Cursor(String),
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageToken::First => write!(f, "first"),
            PageToken::Number(n) => write!(f, "page {n}"),
            PageToken::Cursor(c) => write!(f, "cursor {c}"),
        }
    }
}

#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageToken>,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Item: Send;

    async fn fetch(&self, token: &PageToken) -> Result<Page<Self::Item>>;
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    type Item = F::Item;

    async fn fetch(&self, token: &PageToken) -> Result<Page<Self::Item>> {
        self.as_ref().fetch(token).await
    }
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    type Item = F::Item;

    async fn fetch(&self, token: &PageToken) -> Result<Page<Self::Item>> {
        (**self).fetch(token).await
    }
}

/// Lazy, finite sequence of pages. Once exhausted or failed it stays done.
pub struct Pages<F> {
    fetcher: F,
    next: Option<PageToken>,
}

impl<F: PageFetcher> Pages<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            next: Some(PageToken::First),
        }
    }

    pub async fn next_page(&mut self) -> Option<Result<Vec<F::Item>>> {
        let token = self.next.take()?;

        match self.fetcher.fetch(&token).await {
            Ok(page) => {
                tracing::debug!(%token, items = page.items.len(), more = page.next.is_some(), "fetched page");
                self.next = page.next;
                Some(Ok(page.items))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Drain every remaining page into one list, stopping at the first error.
    pub async fn try_collect(mut self) -> Result<Vec<F::Item>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await {
            all.extend(page?);
        }
        Ok(all)
    }
}

/// Page-number pagination over a REST list endpoint.
pub struct RestPages<'a, T> {
    client: &'a GithubClient,
    path: String,
    per_page: u32,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T> RestPages<'a, T> {
    /// `per_page` of 0 leaves the page size to GitHub.
    pub fn new(client: &'a GithubClient, path: impl Into<String>, per_page: u32) -> Self {
        Self {
            client,
            path: path.into(),
            per_page,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<'a, T> PageFetcher for RestPages<'a, T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Item = T;

    async fn fetch(&self, token: &PageToken) -> Result<Page<T>> {
        let mut query = Vec::new();
        if self.per_page > 0 {
            query.push(("per_page", self.per_page.to_string()));
        }
        match token {
            PageToken::First => {}
            PageToken::Number(n) => query.push(("page", n.to_string())),
            PageToken::Cursor(_) => return Err(GithubError::UnexpectedPageToken(token.to_string())),
        }

        let page = self.client.get_page::<T>(&self.path, &query).await?;
        Ok(Page {
            items: page.items,
            next: page.next_page.map(PageToken::Number),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Serves canned pages addressed by number and records every request.
    struct ScriptedFetcher {
        pages: Vec<Result<Vec<u32>>>,
        seen: Mutex<Vec<PageToken>>,
    }

    impl ScriptedFetcher {
        fn new(pages: Vec<Result<Vec<u32>>>) -> Self {
            Self {
                pages,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        type Item = u32;

        async fn fetch(&self, token: &PageToken) -> Result<Page<u32>> {
            self.seen.lock().unwrap().push(token.clone());
            let index = match token {
                PageToken::First => 0,
                PageToken::Number(n) => *n as usize,
                PageToken::Cursor(_) => unreachable!(),
            };
            let next = (index + 1 < self.pages.len()).then(|| PageToken::Number(index as u32 + 1));
            match &self.pages[index] {
                Ok(items) => Ok(Page {
                    items: items.clone(),
                    next,
                }),
                Err(_) => Err(GithubError::EmptyResponse),
            }
        }
    }

    #[tokio::test]
    async fn test_collects_every_page_in_order() {
        let fetcher = ScriptedFetcher::new(vec![Ok(vec![1, 2]), Ok(vec![3, 4]), Ok(vec![5])]);
        let all = Pages::new(&fetcher).try_collect().await.unwrap();

        assert_eq!(all, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            *fetcher.seen.lock().unwrap(),
            vec![PageToken::First, PageToken::Number(1), PageToken::Number(2)]
        );
    }

    #[tokio::test]
    async fn test_single_empty_page() {
        let fetcher = ScriptedFetcher::new(vec![Ok(vec![])]);
        let all = Pages::new(&fetcher).try_collect().await.unwrap();
        assert!(all.is_empty());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_error_ends_the_sequence() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(vec![1]),
            Err(GithubError::EmptyResponse),
            Ok(vec![3]),
        ]);
        let mut pages = Pages::new(&fetcher);

        assert_eq!(pages.next_page().await.unwrap().unwrap(), vec![1]);
        assert!(pages.next_page().await.unwrap().is_err());
        assert!(pages.next_page().await.is_none());
        assert!(pages.next_page().await.is_none());
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_try_collect_propagates_error() {
        let fetcher = ScriptedFetcher::new(vec![Ok(vec![1]), Err(GithubError::EmptyResponse)]);
        let result = Pages::new(&fetcher).try_collect().await;
        assert!(matches!(result, Err(GithubError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_rest_pages_follow_link_header() {
        let server = MockServer::start().await;
        let next = format!("<{}/items?per_page=2&page=2>; rel=\"next\"", server.uri());

        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("per_page", "2"))
            .and(query_param_is_missing("page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", next.as_str())
                    .set_body_json(json!(["a", "b"])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["c"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GithubClient::new("t".to_string(), &server.uri(), &server.uri()).unwrap();
        let fetcher: RestPages<String> = RestPages::new(&client, "/items", 2);
        let all = Pages::new(fetcher).try_collect().await.unwrap();

        assert_eq!(all, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_rest_pages_omit_zero_page_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param_is_missing("per_page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([7])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GithubClient::new("t".to_string(), &server.uri(), &server.uri()).unwrap();
        let all = Pages::new(RestPages::<u32>::new(&client, "/items", 0))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(all, vec![7]);
    }

    #[tokio::test]
    async fn test_rest_pages_reject_cursor() {
        let client = GithubClient::new("t".to_string(), "http://localhost", "http://localhost").unwrap();
        let fetcher = RestPages::<u32>::new(&client, "/items", 10);
        let err = fetcher
            .fetch(&PageToken::Cursor("abc".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, GithubError::UnexpectedPageToken(_)));
    }
}
