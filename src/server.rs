use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{DiscoveryClient, Fetched};
use crate::audio::strip_data_url;
use crate::cache::SimilarCache;
use crate::error::ApiError;
use crate::html_template::HTML_CONTENT;
use crate::radar::radar_view;
use crate::recommend::{filter_tracks, rank_local, LikedTracks};
use crate::songs;
use crate::track::{NewSong, RadarTrack, Track, TrackId};

/// Uploaded audio arrives base64-encoded in JSON bodies.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

struct AppState {
    client: DiscoveryClient,
    similar_cache: SimilarCache,
}

pub fn router(client: DiscoveryClient) -> Router {
    let state = Arc::new(AppState {
        client,
        similar_cache: SimilarCache::new(),
    });

    Router::new()
        .route("/", get(serve_index))
        .route("/api/tracks", get(get_tracks))
        .route("/api/local-songs", get(get_local_songs))
        .route("/api/compare", get(compare_songs))
        .route("/api/local-similar/{id}", get(get_local_similar))
        .route("/api/similar/{id}", get(get_similar))
        .route("/api/recommend", post(post_recommend))
        .route("/api/identify", post(post_identify))
        .route("/api/songs", post(post_song))
        .route("/api/radar", get(get_radar))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(client: DiscoveryClient, port: u16) -> Result<()> {
    let upstream = client.config().api_url.clone();
    let app = router(client);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%upstream, "Dashboard available at http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn serve_index() -> Html<&'static str> {
    Html(HTML_CONTENT)
}

#[derive(Deserialize)]
struct TracksParams {
    #[serde(default)]
    search: String,
}

async fn get_tracks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TracksParams>,
) -> Json<Fetched<Vec<Track>>> {
    let fetched = state.client.all_tracks().await;
    Json(fetched.map(|tracks| {
        filter_tracks(&tracks, &params.search)
            .into_iter()
            .cloned()
            .collect()
    }))
}

async fn get_local_songs() -> Json<Vec<Track>> {
    Json(songs::all_songs().iter().map(|s| s.to_track()).collect())
}

#[derive(Deserialize)]
struct CompareParams {
    a: TrackId,
    b: TrackId,
}

#[derive(Serialize)]
struct Comparison {
    a: Track,
    b: Track,
    score: f32,
    percent: u8,
}

async fn compare_songs(Query(params): Query<CompareParams>) -> Response {
    let (a, b) = match (songs::find_song(params.a), songs::find_song(params.b)) {
        (Some(a), Some(b)) => (a, b),
        (None, _) => return error_response(StatusCode::NOT_FOUND, format!("No song {}", params.a)),
        (_, None) => return error_response(StatusCode::NOT_FOUND, format!("No song {}", params.b)),
    };

    let score = a.features.similarity(&b.features);
    Json(Comparison {
        a: a.to_track(),
        b: b.to_track(),
        score: score.value(),
        percent: score.as_percent(),
    })
    .into_response()
}

#[derive(Deserialize)]
struct LocalSimilarParams {
    top: Option<usize>,
}

async fn get_local_similar(
    Path(id): Path<TrackId>,
    Query(params): Query<LocalSimilarParams>,
) -> Response {
    match songs::find_song(id) {
        Some(seed) => {
            let top = params.top.unwrap_or(5);
            Json(rank_local(seed, songs::all_songs(), top)).into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, format!("No song {}", id)),
    }
}

async fn get_similar(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TrackId>,
) -> Json<Fetched<Vec<Track>>> {
    if let Some(data) = state.similar_cache.get(id) {
        return Json(Fetched::Live { data });
    }

    let fetched = state.client.similar(id).await;
    if fetched.is_live() {
        state.similar_cache.put(id, fetched.data().clone());
    }
    Json(fetched)
}

#[derive(Deserialize)]
struct RecommendBody {
    song_ids: Vec<TrackId>,
}

async fn post_recommend(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecommendBody>,
) -> Json<Fetched<Vec<Track>>> {
    let liked: LikedTracks = body.song_ids.into_iter().collect();
    Json(state.client.recommendations(&liked.ids()).await)
}

#[derive(Deserialize)]
struct IdentifyBody {
    audio_base64: String,
}

async fn post_identify(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IdentifyBody>,
) -> Json<Fetched<Option<Track>>> {
    let audio = strip_data_url(&body.audio_base64);
    Json(state.client.identify_soft(audio).await)
}

async fn post_song(State(state): State<Arc<AppState>>, Json(mut song): Json<NewSong>) -> Response {
    song.track = strip_data_url(&song.track).to_string();

    match state.client.add_song(&song).await {
        Ok(()) => {
            info!(title = %song.title, artist = %song.artist, "Song added");
            // Cached similar lists predate the new song
            state.similar_cache.clear();
            (StatusCode::CREATED, Json(json!({ "ok": true }))).into_response()
        }
        Err(ApiError::InvalidInput(msg)) => error_response(StatusCode::BAD_REQUEST, msg),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

async fn get_radar(State(state): State<Arc<AppState>>) -> Json<Fetched<Vec<RadarTrack>>> {
    let (points, tracks) = tokio::join!(state.client.radar(), state.client.all_tracks());
    Json(radar_view(points, tracks))
}
