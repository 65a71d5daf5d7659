//! Catalog service client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::error::{ClientError, ClientResult};
use crate::models::{Track, TrackQuery};

/// Read access to the catalog service.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch the available moods.
    async fn moods(&self) -> ClientResult<Vec<String>>;

    /// Fetch the available genres.
    async fn genres(&self) -> ClientResult<Vec<String>>;

    /// Fetch the tracks matching `query`.
    async fn tracks(&self, query: &TrackQuery) -> ClientResult<Vec<Track>>;
}

/// Catalog client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let mut request = self
            .client
            .get(self.endpoint(path))
            .header("Accept", "application/json");
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "Catalog request failed");
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn moods(&self) -> ClientResult<Vec<String>> {
        self.get_json::<_, ()>("/api/moods", None).await
    }

    async fn genres(&self) -> ClientResult<Vec<String>> {
        self.get_json::<_, ()>("/api/genres", None).await
    }

    async fn tracks(&self, query: &TrackQuery) -> ClientResult<Vec<Track>> {
        self.get_json("/api/tracks", Some(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api;
    use crate::catalog::Catalog;
    use crate::models::AppState;
    use actix_web::dev::ServerHandle;
    use actix_web::{web, App, HttpResponse, HttpServer};
    use std::sync::Arc;

    /// Bind `$factory` on an ephemeral port; yields the base url and a
    /// handle to stop the server.
    macro_rules! serve {
        ($factory:expr) => {{
            let server = HttpServer::new($factory)
                .workers(1)
                .bind(("127.0.0.1", 0))
                .unwrap();
            let addr = server.addrs()[0];
            let server = server.run();
            let handle: ServerHandle = server.handle();
            actix_web::rt::spawn(server);
            (format!("http://{}", addr), handle)
        }};
    }

    fn catalog_server() -> (String, ServerHandle) {
        let state = AppState {
            catalog: Arc::new(Catalog::seeded("http://assets.test")),
            assets_folder: None,
        };
        serve!(move || {
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(api::catalog::configure)
                .default_service(web::to(api::catalog::not_found))
        })
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = HttpCatalogClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.endpoint("/api/moods"), "http://localhost:5000/api/moods");
    }

    #[actix_web::test]
    async fn test_moods_and_genres_from_server() {
        let (base_url, handle) = catalog_server();
        let client = HttpCatalogClient::new(base_url);

        assert_eq!(
            client.moods().await.unwrap(),
            ["Happy", "Sad", "Energetic", "Chill"]
        );
        assert_eq!(
            client.genres().await.unwrap(),
            ["Pop", "Lo-fi", "Cinematic", "EDM"]
        );

        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_tracks_query_reaches_server() {
        let (base_url, handle) = catalog_server();
        let client = HttpCatalogClient::new(base_url);

        let query = TrackQuery::new(Some("Happy".into()), Some("EDM".into()));
        let tracks = client.tracks(&query).await.unwrap();
        let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Sunny Vibes", "Chill Zone"]);

        let query = TrackQuery::new(Some("Lo-fi & more".into()), Some("Polka".into()));
        assert!(client.tracks(&query).await.unwrap().is_empty());

        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_error_status_is_reported() {
        let (base_url, handle) = catalog_server();
        let client = HttpCatalogClient::new(format!("{}/missing", base_url));

        let err = client.moods().await.unwrap_err();
        assert!(matches!(err, ClientError::Status(404)));
        assert!(err.is_transport());

        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_malformed_body_is_transport_error() {
        let (base_url, handle) = serve!(|| {
            App::new().route(
                "/api/moods",
                web::get().to(|| async { HttpResponse::Ok().body("not json") }),
            )
        });
        let client = HttpCatalogClient::new(base_url);

        let err = client.moods().await.unwrap_err();
        assert!(matches!(err, ClientError::Http(ref e) if e.is_decode()));
        assert_eq!(
            err.user_message(),
            "Something went wrong while fetching tracks."
        );

        handle.stop(true).await;
    }
}
