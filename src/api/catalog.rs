//! Catalog API endpoints.

use actix_web::{get, web, HttpRequest, HttpResponse};

use crate::error::{AppError, AppResult};
use crate::models::{AppState, TrackQuery};

/// List all moods.
///
/// GET /api/moods
#[get("/api/moods")]
pub async fn list_moods(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(data.catalog.moods())
}

/// List all genres.
///
/// GET /api/genres
#[get("/api/genres")]
pub async fn list_genres(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(data.catalog.genres())
}

/// Filter tracks by mood and genre.
///
/// GET /api/tracks
///
/// Query parameters:
/// - `mood`: Mood filter
/// - `genre`: Genre filter
///
/// Filters are OR-ed and an absent filter matches every track. Repeated
/// parameters keep their first value.
#[get("/api/tracks")]
pub async fn list_tracks(
    data: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> HttpResponse {
    let query = TrackQuery::from_pairs(query.into_inner());
    let tracks = data.catalog.filter_tracks(&query);

    tracing::debug!(
        mood = ?query.mood(),
        genre = ?query.genre(),
        matched = tracks.len(),
        "Filtered tracks"
    );

    HttpResponse::Ok().json(tracks)
}

/// Fallback for unknown routes.
pub async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::route_not_found(req.path()))
}

/// Query extractor config that reports parse failures as JSON errors.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Configure catalog routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config())
        .service(list_moods)
        .service(list_genres)
        .service(list_tracks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::models::Track;
    use actix_web::{http::StatusCode, test, App};
    use std::sync::Arc;

    fn state() -> AppState {
        AppState {
            catalog: Arc::new(Catalog::seeded("http://assets.test")),
            assets_folder: None,
        }
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(state()))
                    .configure(configure)
                    .default_service(web::to(not_found)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_list_moods() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/moods").to_request();
        let moods: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(moods, ["Happy", "Sad", "Energetic", "Chill"]);
    }

    #[actix_web::test]
    async fn test_list_genres() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/genres").to_request();
        let genres: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(genres, ["Pop", "Lo-fi", "Cinematic", "EDM"]);
    }

    #[actix_web::test]
    async fn test_tracks_or_match() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/tracks?mood=Happy&genre=EDM")
            .to_request();
        let tracks: Vec<Track> = test::call_and_read_body_json(&app, req).await;

        let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Sunny Vibes", "Chill Zone"]);
        assert_eq!(tracks[0].url, "http://assets.test/assets/good-vibes.mp3");
    }

    #[actix_web::test]
    async fn test_tracks_without_filters() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/tracks").to_request();
        let tracks: Vec<Track> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(tracks.len(), 4);
    }

    #[actix_web::test]
    async fn test_tracks_no_match_is_empty_array() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/tracks?mood=Angry&genre=Polka")
            .to_request();
        let tracks: Vec<Track> = test::call_and_read_body_json(&app, req).await;
        assert!(tracks.is_empty());
    }

    #[actix_web::test]
    async fn test_repeated_query_param_uses_first_value() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/tracks?mood=Happy&mood=Sad&genre=EDM")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let tracks: Vec<Track> = test::read_body_json(resp).await;
        let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Sunny Vibes", "Chill Zone"]);
    }

    #[actix_web::test]
    async fn test_unknown_query_params_are_ignored() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/tracks?mood=Angry&genre=Polka&limit=abc")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let tracks: Vec<Track> = test::read_body_json(resp).await;
        assert!(tracks.is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_route() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/artists").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "NOT_FOUND");
    }
}
