//! Discovery API Client
//!
//! Async HTTP+JSON client for the remote catalog, similarity, recognition
//! and recommendation service. Every endpoint has a `Result`-returning call;
//! the read-only endpoints also have a fail-soft variant that substitutes a
//! fallback value and reports it through [`Fetched::Fallback`].

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::recommend::sort_by_match;
use crate::songs;
use crate::track::{NewSong, RadarPoint, Track, TrackId};

const ALL_TRACKS: &str = "getAllTracks";
const SIMILAR: &str = "findSimilarSongs";
const RECOMMEND: &str = "recommend";
const SHAZAM: &str = "getShazamSong";
const ADD_SONG: &str = "addSong";
const RADAR: &str = "getRadar";

/// Outcome of a fail-soft call: real upstream data, or a substituted
/// value together with the reason the upstream call failed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Fetched<T> {
    Live { data: T },
    Fallback { data: T, reason: String },
}

impl<T> Fetched<T> {
    fn from_result(endpoint: &str, result: ApiResult<T>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(data) => Fetched::Live { data },
            Err(e) => {
                warn!(endpoint, error = %e, "Upstream call failed, using fallback");
                Fetched::Fallback {
                    data: fallback(),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Fetched::Live { .. })
    }

    pub fn data(&self) -> &T {
        match self {
            Fetched::Live { data } | Fetched::Fallback { data, .. } => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            Fetched::Live { data } | Fetched::Fallback { data, .. } => data,
        }
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Fetched::Live { .. } => None,
            Fetched::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Live { data } => Fetched::Live { data: f(data) },
            Fetched::Fallback { data, reason } => Fetched::Fallback {
                data: f(data),
                reason,
            },
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct DiscoveryClient {
    http: Client,
    config: ClientConfig,
}

impl DiscoveryClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("songscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: "client",
                source,
            })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, endpoint: &'static str) -> ApiResult<reqwest::Url> {
        self.config
            .endpoint(endpoint)
            .map_err(|e| ApiError::InvalidInput(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> ApiResult<T> {
        debug!(endpoint, "GET");
        let resp = self
            .http
            .get(self.url(endpoint)?)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        read_json(endpoint, resp).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> ApiResult<T> {
        debug!(endpoint, "POST");
        let resp = self
            .http
            .post(self.url(endpoint)?)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        read_json(endpoint, resp).await
    }

    /// `GET /getAllTracks`
    pub async fn fetch_all_tracks(&self) -> ApiResult<Vec<Track>> {
        self.get_json(ALL_TRACKS).await
    }

    /// `POST /findSimilarSongs`, sorted by match, best first.
    pub async fn fetch_similar(&self, id: TrackId) -> ApiResult<Vec<Track>> {
        let mut tracks: Vec<Track> = self.post_json(SIMILAR, &json!({ "song_id": id })).await?;
        sort_by_match(&mut tracks);
        Ok(tracks)
    }

    /// `POST /recommend` with the liked ids, sorted by match, best first.
    pub async fn fetch_recommendations(&self, liked: &[TrackId]) -> ApiResult<Vec<Track>> {
        if liked.is_empty() {
            return Err(ApiError::InvalidInput(
                "at least one liked track is required".to_string(),
            ));
        }
        let mut tracks: Vec<Track> = self
            .post_json(RECOMMEND, &json!({ "song_ids": liked }))
            .await?;
        sort_by_match(&mut tracks);
        Ok(tracks)
    }

    /// `POST /getShazamSong`. `None` when the service found no match.
    pub async fn identify(&self, audio_base64: &str) -> ApiResult<Option<Track>> {
        if audio_base64.trim().is_empty() {
            return Err(ApiError::InvalidInput("audio is empty".to_string()));
        }
        self.post_json(SHAZAM, &json!({ "audio_base64": audio_base64 }))
            .await
    }

    /// `POST /addSong`. Succeeds only on a 2xx answer.
    pub async fn add_song(&self, song: &NewSong) -> ApiResult<()> {
        song.validate().map_err(ApiError::InvalidInput)?;
        let _: serde_json::Value = self.post_json(ADD_SONG, song).await?;
        Ok(())
    }

    /// `GET /getRadar`
    pub async fn fetch_radar(&self) -> ApiResult<Vec<RadarPoint>> {
        self.get_json(RADAR).await
    }

    /// Catalog, or the bundled fallback catalog if the service fails.
    pub async fn all_tracks(&self) -> Fetched<Vec<Track>> {
        Fetched::from_result(
            ALL_TRACKS,
            self.fetch_all_tracks().await,
            songs::fallback_tracks,
        )
    }

    pub async fn similar(&self, id: TrackId) -> Fetched<Vec<Track>> {
        Fetched::from_result(SIMILAR, self.fetch_similar(id).await, Vec::new)
    }

    /// An empty like-set is answered locally with no suggestions.
    pub async fn recommendations(&self, liked: &[TrackId]) -> Fetched<Vec<Track>> {
        if liked.is_empty() {
            return Fetched::Live { data: Vec::new() };
        }
        Fetched::from_result(
            RECOMMEND,
            self.fetch_recommendations(liked).await,
            Vec::new,
        )
    }

    pub async fn identify_soft(&self, audio_base64: &str) -> Fetched<Option<Track>> {
        Fetched::from_result(SHAZAM, self.identify(audio_base64).await, || None)
    }

    pub async fn radar(&self) -> Fetched<Vec<RadarPoint>> {
        Fetched::from_result(RADAR, self.fetch_radar().await, Vec::new)
    }
}

async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    resp: reqwest::Response,
) -> ApiResult<T> {
    let status = resp.status();
    let body = resp
        .bytes()
        .await
        .map_err(|source| ApiError::Transport { endpoint, source })?;

    if !status.is_success() {
        let message = match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(e) => e.error,
            Err(_) => String::from_utf8_lossy(&body).trim().to_string(),
        };
        return Err(ApiError::Status {
            endpoint,
            status,
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|source| ApiError::Decode { endpoint, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::Value;
    use tokio::net::TcpListener;

    async fn spawn_upstream(router: Router) -> DiscoveryClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let config = ClientConfig::new(&format!("http://{}", addr), 5).unwrap();
        DiscoveryClient::new(config).unwrap()
    }

    fn catalog_json() -> Value {
        json!([
            {"id": 1, "title": "Song A", "artist": "Artist A", "album": "Album A", "duration_s": 200.0, "image": null},
            {"id": 2, "title": "Song B", "artist": "Artist B", "album": null, "duration_s": 180.5, "image": "b.png"}
        ])
    }

    #[tokio::test]
    async fn test_all_tracks_live() {
        let client =
            spawn_upstream(Router::new().route("/getAllTracks", get(|| async { Json(catalog_json()) })))
                .await;

        let fetched = client.all_tracks().await;
        assert!(fetched.is_live());
        let tracks = fetched.into_data();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].image.as_deref(), Some("b.png"));
    }

    #[tokio::test]
    async fn test_all_tracks_falls_back_on_server_error() {
        let client = spawn_upstream(Router::new().route(
            "/getAllTracks",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"error": "Database file not found"})),
                )
            }),
        ))
        .await;

        let err = client.fetch_all_tracks().await.unwrap_err();
        match &err {
            ApiError::Status { status, message, .. } => {
                assert_eq!(status.as_u16(), 404);
                assert_eq!(message, "Database file not found");
            }
            other => panic!("unexpected error {:?}", other),
        }

        let fetched = client.all_tracks().await;
        assert!(!fetched.is_live());
        assert!(fetched.fallback_reason().unwrap().contains("Database file not found"));
        assert_eq!(fetched.data().len(), songs::fallback_tracks().len());
    }

    #[tokio::test]
    async fn test_all_tracks_falls_back_on_bad_body() {
        let client = spawn_upstream(Router::new().route(
            "/getAllTracks",
            get(|| async { Json(json!({"unexpected": true})) }),
        ))
        .await;

        assert!(matches!(
            client.fetch_all_tracks().await,
            Err(ApiError::Decode { .. })
        ));
        assert!(!client.all_tracks().await.is_live());
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ClientConfig::new(&format!("http://{}", addr), 2).unwrap();
        let client = DiscoveryClient::new(config).unwrap();

        let err = client.fetch_radar().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));

        let fetched = client.radar().await;
        assert!(!fetched.is_live());
        assert!(fetched.data().is_empty());
    }

    #[tokio::test]
    async fn test_similar_sends_id_and_sorts_by_match() {
        let client = spawn_upstream(Router::new().route(
            "/findSimilarSongs",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["song_id"], json!(3));
                Json(json!([
                    {"id": 5, "title": "Low", "artist": "x", "album": "y", "match": "61.0"},
                    {"id": 8, "title": "High", "artist": "x", "album": "y", "match": "93.5"},
                    {"id": 2, "title": "Mid", "artist": "x", "album": "y", "match": "77.2"}
                ]))
            }),
        ))
        .await;

        let tracks = client.fetch_similar(TrackId(3)).await.unwrap();
        let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["High", "Mid", "Low"]);
    }

    #[tokio::test]
    async fn test_recommendations_send_liked_ids() {
        let client = spawn_upstream(Router::new().route(
            "/recommend",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["song_ids"], json!([1, 4]));
                Json(json!([{"id": 9, "title": "Pick", "artist": "x", "album": "y", "match": 88}]))
            }),
        ))
        .await;

        let fetched = client.recommendations(&[TrackId(1), TrackId(4)]).await;
        assert!(fetched.is_live());
        assert_eq!(fetched.data()[0].id, TrackId(9));
    }

    #[tokio::test]
    async fn test_empty_like_set_makes_no_request() {
        let client = spawn_upstream(Router::new()).await;

        let fetched = client.recommendations(&[]).await;
        assert!(fetched.is_live());
        assert!(fetched.data().is_empty());
        assert!(matches!(
            client.fetch_recommendations(&[]).await,
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_identify_match_and_no_match() {
        let client = spawn_upstream(Router::new().route(
            "/getShazamSong",
            post(|Json(body): Json<Value>| async move {
                if body["audio_base64"] == json!("bWF0Y2g=") {
                    Json(json!({"id": 6, "title": "Billie Jean", "artist": "Michael Jackson", "album": "Thriller"}))
                } else {
                    Json(Value::Null)
                }
            }),
        ))
        .await;

        let found = client.identify("bWF0Y2g=").await.unwrap().unwrap();
        assert_eq!(found.title, "Billie Jean");
        assert!(client.identify("bm9pc2U=").await.unwrap().is_none());
        assert!(matches!(
            client.identify("").await,
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_add_song_reports_failure() {
        let client = spawn_upstream(Router::new().route(
            "/addSong",
            post(|Json(body): Json<Value>| async move {
                if body["title"] == json!("Good") {
                    (StatusCode::OK, Json(json!({})))
                } else {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"error": "ffmpeg failed"})),
                    )
                }
            }),
        ))
        .await;

        let mut song = NewSong {
            title: "Good".into(),
            artist: "Artist".into(),
            album: "Album".into(),
            image: String::new(),
            track: "UklGRg==".into(),
        };
        client.add_song(&song).await.unwrap();

        song.title = "Bad".into();
        let err = client.add_song(&song).await.unwrap_err();
        assert!(err.to_string().contains("ffmpeg failed"));
    }

    #[tokio::test]
    async fn test_radar_points() {
        let client = spawn_upstream(Router::new().route(
            "/getRadar",
            get(|| async { Json(json!([{"song_id": 1, "x": 0.5, "y": -1.25}])) }),
        ))
        .await;

        let points = client.fetch_radar().await.unwrap();
        assert_eq!(points, vec![RadarPoint { song_id: TrackId(1), x: 0.5, y: -1.25 }]);
    }

    #[test]
    fn test_fetched_serializes_source() {
        let live: Fetched<Vec<u8>> = Fetched::Live { data: vec![1] };
        let fallback: Fetched<Vec<u8>> = Fetched::Fallback {
            data: vec![],
            reason: "down".into(),
        };
        assert_eq!(
            serde_json::to_value(&live).unwrap(),
            json!({"source": "live", "data": [1]})
        );
        assert_eq!(
            serde_json::to_value(&fallback).unwrap(),
            json!({"source": "fallback", "data": [], "reason": "down"})
        );
    }
}
