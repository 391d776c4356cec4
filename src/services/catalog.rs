//! External book catalog (Open Library) client

use async_trait::async_trait;
use futures::future::join_all;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    config::OpenLibraryConfig,
    error::{AppError, AppResult},
    models::catalog::{BookMetadata, CatalogBook},
};

const UNKNOWN_AUTHOR: &str = "Unknown author";
const NO_TITLE: &str = "No title available";
const SEARCH_FAILED: &str = "Failed to fetch books from Open Library";
const DETAILS_FAILED: &str = "Failed to fetch book details from Open Library";

/// Remote catalog used for search and for filling personal books
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Free-text search
    async fn search(&self, query: &str) -> AppResult<Vec<CatalogBook>>;

    /// Work metadata with author names resolved. Only the work fetch itself can fail.
    async fn get_metadata(&self, open_library_id: &str) -> AppResult<BookMetadata>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(default)]
    title: String,
    author_name: Option<Vec<String>>,
    first_publish_year: Option<i32>,
    key: String,
    cover_i: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WorkResponse {
    title: Option<String>,
    first_publish_year: Option<i32>,
    covers: Option<Vec<i64>>,
    authors: Option<Vec<WorkAuthor>>,
}

#[derive(Debug, Deserialize)]
struct WorkAuthor {
    author: Option<KeyRef>,
}

#[derive(Debug, Deserialize)]
struct KeyRef {
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorResponse {
    name: Option<String>,
}

#[derive(Clone)]
pub struct OpenLibraryClient {
    http: Client,
    base_url: String,
    covers_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: &OpenLibraryConfig) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            covers_url: config.covers_url.trim_end_matches('/').to_string(),
        })
    }

    fn cover_url(&self, cover_id: Option<i64>) -> Option<String> {
        cover_id
            .filter(|id| *id > 0)
            .map(|id| format!("{}/b/id/{}-M.jpg", self.covers_url, id))
    }

    async fn get_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> reqwest::Result<T> {
        request.send().await?.error_for_status()?.json::<T>().await
    }

    async fn author_name(&self, key: Option<&str>) -> String {
        let Some(key) = key else {
            return UNKNOWN_AUTHOR.to_string();
        };

        let url = format!("{}{}.json", self.base_url, key);
        match self.get_json::<AuthorResponse>(self.http.get(&url)).await {
            Ok(author) => author
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            Err(e) => {
                tracing::warn!("Error fetching author details for {}: {}", key, e);
                UNKNOWN_AUTHOR.to_string()
            }
        }
    }
}

#[async_trait]
impl BookCatalog for OpenLibraryClient {
    async fn search(&self, query: &str) -> AppResult<Vec<CatalogBook>> {
        let url = format!("{}/search.json", self.base_url);
        let response: SearchResponse = self
            .get_json(self.http.get(&url).query(&[("q", query)]))
            .await
            .map_err(|e| {
                tracing::error!("Error searching books: {}", e);
                AppError::upstream(SEARCH_FAILED)
            })?;

        Ok(response
            .docs
            .into_iter()
            .map(|doc| CatalogBook {
                cover_url: self.cover_url(doc.cover_i),
                title: doc.title,
                author_name: doc.author_name,
                first_publish_year: doc.first_publish_year,
                open_library_id: doc.key.replace("/works/", ""),
            })
            .collect())
    }

    async fn get_metadata(&self, open_library_id: &str) -> AppResult<BookMetadata> {
        let url = format!("{}/works/{}.json", self.base_url, open_library_id);
        let work: WorkResponse = self.get_json(self.http.get(&url)).await.map_err(|e| {
            tracing::error!("Error fetching book metadata for {}: {}", open_library_id, e);
            AppError::upstream(DETAILS_FAILED)
        })?;

        let author_refs = work.authors.unwrap_or_default();
        let authors = if author_refs.is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            let lookups = author_refs.iter().map(|entry| {
                let key = entry.author.as_ref().and_then(|a| a.key.as_deref());
                self.author_name(key)
            });
            join_all(lookups).await.join(", ")
        };

        Ok(BookMetadata {
            title: work
                .title
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| NO_TITLE.to_string()),
            authors,
            publish_year: work.first_publish_year,
            cover_url: self.cover_url(work.covers.and_then(|covers| covers.first().copied())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> OpenLibraryClient {
        OpenLibraryClient::new(&OpenLibraryConfig {
            base_url: server.uri(),
            covers_url: "https://covers.example".to_string(),
            user_agent: "test-agent".to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_maps_docs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "dune"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "numFound": 2,
                "docs": [
                    {
                        "key": "/works/OL893415W",
                        "title": "Dune",
                        "author_name": ["Frank Herbert"],
                        "first_publish_year": 1965,
                        "cover_i": 11481354
                    },
                    { "key": "/works/OL1W", "title": "Dune Messiah" }
                ]
            })))
            .mount(&server)
            .await;

        let books = client_for(&server).search("dune").await.unwrap();

        assert_eq!(books.len(), 2);
        assert_eq!(books[0].open_library_id, "OL893415W");
        assert_eq!(books[0].author_name, Some(vec!["Frank Herbert".to_string()]));
        assert_eq!(books[0].first_publish_year, Some(1965));
        assert_eq!(
            books[0].cover_url.as_deref(),
            Some("https://covers.example/b/id/11481354-M.jpg")
        );
        assert_eq!(books[1].open_library_id, "OL1W");
        assert_eq!(books[1].author_name, None);
        assert_eq!(books[1].cover_url, None);
    }

    #[tokio::test]
    async fn test_search_failure_is_generic_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(503).set_body_string("backend exploded"))
            .mount(&server)
            .await;

        let err = client_for(&server).search("dune").await.unwrap_err();

        assert!(matches!(err, AppError::Upstream { .. }));
        assert_eq!(err.to_string(), SEARCH_FAILED);
    }

    #[tokio::test]
    async fn test_metadata_resolves_authors_and_swallows_lookup_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works/OL45804W.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Fantastic Mr Fox",
                "first_publish_year": 1970,
                "covers": [6498519, 8904777],
                "authors": [
                    { "author": { "key": "/authors/OL34184A" } },
                    { "author": { "key": "/authors/OL_BROKEN" } },
                    { "type": { "key": "/type/author_role" } }
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/authors/OL34184A.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Roald Dahl" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/authors/OL_BROKEN.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let metadata = client_for(&server).get_metadata("OL45804W").await.unwrap();

        assert_eq!(metadata.title, "Fantastic Mr Fox");
        assert_eq!(metadata.authors, "Roald Dahl, Unknown author, Unknown author");
        assert_eq!(metadata.publish_year, Some(1970));
        assert_eq!(
            metadata.cover_url.as_deref(),
            Some("https://covers.example/b/id/6498519-M.jpg")
        );
    }

    #[tokio::test]
    async fn test_metadata_defaults_when_fields_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works/OL2W.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let metadata = client_for(&server).get_metadata("OL2W").await.unwrap();

        assert_eq!(metadata.title, NO_TITLE);
        assert_eq!(metadata.authors, UNKNOWN_AUTHOR);
        assert_eq!(metadata.publish_year, None);
        assert_eq!(metadata.cover_url, None);
    }

    #[tokio::test]
    async fn test_metadata_fails_only_when_work_fetch_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works/OL404W.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).get_metadata("OL404W").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { ref message, .. } if message == DETAILS_FAILED));
        assert!(err.location().unwrap().file().ends_with("catalog.rs"));
    }
}
