use serde_json::Value;

use crate::core::collection::{hydrate_collection, HydrateOptions};
use crate::core::entity::hydrate_entity;
use crate::domain::model::{Collection, COLLECTION_DATA_FIELD};
use crate::domain::movie::Movie;
use crate::domain::ports::{ConfigProvider, JsonFetcher};
use crate::utils::error::{HydrateError, Result};

// Field an OMDb search response keeps its results under.
const SEARCH_RESULTS_FIELD: &str = "Search";

/// Looks movies up on an OMDb-style API and hydrates the responses.
pub struct MovieService<F: JsonFetcher> {
    fetcher: F,
    api_url: String,
    api_key: String,
    options: HydrateOptions,
}

impl<F: JsonFetcher> MovieService<F> {
    pub fn new<C: ConfigProvider>(fetcher: F, config: &C) -> Self {
        Self {
            fetcher,
            api_url: config.api_url().trim_end_matches('/').to_string(),
            api_key: config.api_key().to_string(),
            options: HydrateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: HydrateOptions) -> Self {
        self.options = options;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.api_url)
    }

    /// Fetches a single movie by title. An empty title sends no title filter.
    pub async fn fetch_movie(&self, title: &str) -> Result<Movie> {
        let mut query = vec![("apikey", self.api_key.as_str())];
        if !title.is_empty() {
            query.push(("t", title));
        }

        tracing::info!("🎬 Fetching movie: {}", title);
        let body = self.fetcher.get_json(&self.endpoint(), &query).await?;
        check_response(&body)?;

        let record = body.get("movie").unwrap_or(&body);
        hydrate_entity(record)
    }

    /// Searches movies by title. Paging metadata such as `totalResults` is
    /// kept on the returned collection.
    pub async fn search_movies(&self, search: &str) -> Result<Collection<Movie>> {
        let query = [("apikey", self.api_key.as_str()), ("s", search)];

        tracing::info!("🔍 Searching movies: {}", search);
        let body = self.fetcher.get_json(&self.endpoint(), &query).await?;
        check_response(&body)?;

        let wrapper = match body {
            Value::Object(mut map) => {
                if let Some(results) = map.remove(SEARCH_RESULTS_FIELD) {
                    map.insert(COLLECTION_DATA_FIELD.to_string(), results);
                }
                Value::Object(map)
            }
            other => other,
        };

        let movies = hydrate_collection(&wrapper, Collection::default(), self.options)?;
        tracing::info!("✅ Hydrated {} movies", movies.len());
        Ok(movies)
    }
}

/// OMDb reports lookup failures with a success status and `"Response": "False"`.
fn check_response(body: &Value) -> Result<()> {
    if body.get("Response").and_then(Value::as_str) == Some("False") {
        let details = body
            .get("Error")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error.")
            .to_string();
        return Err(HydrateError::ApiResponse {
            status: 200,
            details,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct MockConfig;

    impl ConfigProvider for MockConfig {
        fn api_url(&self) -> &str {
            "http://test.local/"
        }

        fn api_key(&self) -> &str {
            "key123"
        }
    }

    #[derive(Clone)]
    struct MockFetcher {
        response: Value,
        calls: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
    }

    impl MockFetcher {
        fn new(response: Value) -> Self {
            Self {
                response,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl JsonFetcher for MockFetcher {
        async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
            let mut calls = self.calls.lock().await;
            calls.push((
                url.to_string(),
                query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            Ok(self.response.clone())
        }
    }

    #[tokio::test]
    async fn test_fetch_movie_builds_query_and_hydrates() {
        let fetcher = MockFetcher::new(json!({
            "movie": {"Title": "Heat", "Year": 1995, "Response": "True"}
        }));
        let service = MovieService::new(fetcher.clone(), &MockConfig);

        let movie = service.fetch_movie("Heat").await.unwrap();

        assert_eq!(movie.title, "Heat");
        assert_eq!(movie.year, "1995");

        let calls = fetcher.calls.lock().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "http://test.local/");
        assert_eq!(
            calls[0].1,
            vec![
                ("apikey".to_string(), "key123".to_string()),
                ("t".to_string(), "Heat".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_movie_without_title() {
        let fetcher = MockFetcher::new(json!({"Title": "Anything"}));
        let service = MovieService::new(fetcher.clone(), &MockConfig);

        let movie = service.fetch_movie("").await.unwrap();

        assert_eq!(movie.title, "Anything");
        let calls = fetcher.calls.lock().await;
        assert_eq!(calls[0].1.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_movie_not_found() {
        let fetcher = MockFetcher::new(json!({"Response": "False", "Error": "Movie not found!"}));
        let service = MovieService::new(fetcher, &MockConfig);

        let err = service.fetch_movie("zzz").await.unwrap_err();
        assert!(matches!(err, HydrateError::ApiResponse { ref details, .. } if details == "Movie not found!"));
    }

    #[tokio::test]
    async fn test_search_movies_keeps_metadata() {
        let fetcher = MockFetcher::new(json!({
            "Search": [
                {"Title": "Alien", "Year": "1979", "imdbID": "tt0078748"},
                {"Title": "Aliens", "Year": "1986", "imdbID": "tt0090605"}
            ],
            "totalResults": "2",
            "Response": "True"
        }));
        let service = MovieService::new(fetcher, &MockConfig);

        let movies = service.search_movies("alien").await.unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies.data[1].imdb_id, "tt0090605");
        assert_eq!(movies.extra.get("totalResults"), Some(&json!("2")));
    }

    #[tokio::test]
    async fn test_search_movies_skips_bad_records_when_ignoring() {
        let fetcher = MockFetcher::new(json!({
            "Search": [
                {"Title": "Good"},
                {"Title": "Bad", "Ratings": "not-a-list"},
                {"Title": "Also good"}
            ]
        }));
        let service =
            MovieService::new(fetcher, &MockConfig).with_options(HydrateOptions::ignoring_errors());

        let movies = service.search_movies("x").await.unwrap();

        let titles: Vec<&str> = movies.data.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Good", "Also good"]);
    }
}
