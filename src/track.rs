//! Catalog data model shared by the API client, the CLI and the dashboard.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical track identifier.
///
/// Upstream payloads carry ids both as JSON numbers and as numeric strings;
/// both are read into the same integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TrackId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(TrackId)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(u64),
    Float(f64),
    Str(String),
}

impl<'de> Deserialize<'de> for TrackId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Int(n) => Ok(TrackId(n)),
            // u64::MAX rounds up to 2^64 as f64, so the bound is exclusive
            NumberOrString::Float(f) if f >= 0.0 && f < u64::MAX as f64 && f.fract() == 0.0 => {
                Ok(TrackId(f as u64))
            }
            NumberOrString::Float(f) => Err(serde::de::Error::custom(format!(
                "track id must be a non-negative integer, got {}",
                f
            ))),
            NumberOrString::Str(s) => s
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid track id {:?}", s))),
        }
    }
}

/// Match percentage (0-100) produced by a real similarity computation,
/// either upstream or by the local scorer.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct MatchScore(f32);

impl MatchScore {
    pub fn from_percent(percent: f32) -> Self {
        Self(percent.clamp(0.0, 100.0))
    }

    /// Build from a similarity in [0, 1].
    pub fn from_similarity(similarity: f32) -> Self {
        Self::from_percent(similarity * 100.0)
    }

    pub fn percent(self) -> f32 {
        self.0
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl<'de> Deserialize<'de> for MatchScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let percent = match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Int(n) => n as f32,
            NumberOrString::Float(f) => f as f32,
            NumberOrString::Str(s) => s
                .trim()
                .parse::<f32>()
                .map_err(|_| serde::de::Error::custom(format!("invalid match score {:?}", s)))?,
        };
        if !percent.is_finite() {
            return Err(serde::de::Error::custom("match score is not finite"));
        }
        Ok(MatchScore::from_percent(percent))
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(alias = "song_id")]
    pub id: TrackId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artist: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub album: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, alias = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_s: Option<f64>,
    #[serde(
        default,
        alias = "imagePath",
        alias = "imageUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(default, alias = "imageHint", skip_serializing_if = "Option::is_none")]
    pub image_hint: Option<String>,
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<MatchScore>,
}

impl Track {
    /// "m:ss" rendering of the duration, if known.
    pub fn duration_label(&self) -> Option<String> {
        let secs = self.duration_s?;
        if !secs.is_finite() || secs < 0.0 {
            return None;
        }
        let total = secs.round() as u64;
        Some(format!("{}:{:02}", total / 60, total % 60))
    }
}

/// Body of `POST /addSong`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub album: String,
    #[serde(default)]
    pub image: String,
    /// Base64-encoded audio, without any data-URL prefix.
    pub track: String,
}

impl NewSong {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("title", &self.title),
            ("artist", &self.artist),
            ("album", &self.album),
            ("track", &self.track),
        ] {
            if value.trim().is_empty() {
                return Err(format!("missing required field '{}'", name));
            }
        }
        Ok(())
    }
}

/// One point of the 2D song map returned by `GET /getRadar`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub song_id: TrackId,
    pub x: f64,
    pub y: f64,
}

/// A radar point joined with catalog metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarTrack {
    pub id: TrackId,
    pub x: f64,
    pub y: f64,
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_track_id_from_number_and_string() {
        let a: TrackId = serde_json::from_value(json!(7)).unwrap();
        let b: TrackId = serde_json::from_value(json!("7")).unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_value::<TrackId>(json!("abc")).is_err());
        assert!(serde_json::from_value::<TrackId>(json!(-3)).is_err());
    }

    #[test]
    fn test_track_id_rejects_out_of_range_float() {
        let id: TrackId = serde_json::from_value(json!(12.0)).unwrap();
        assert_eq!(id, TrackId(12));
        assert!(serde_json::from_value::<TrackId>(json!(1e30)).is_err());
        assert!(serde_json::from_value::<TrackId>(json!(18446744073709551616.0)).is_err());
    }

    #[test]
    fn test_track_from_catalog_row() {
        let track: Track = serde_json::from_value(json!({
            "id": 12,
            "title": "Imagine",
            "artist": "John Lennon",
            "album": null,
            "duration_s": 183.4,
            "image": "https://example.com/imagine.jpg"
        }))
        .unwrap();

        assert_eq!(track.id, TrackId(12));
        assert_eq!(track.album, "");
        assert_eq!(track.duration_label().as_deref(), Some("3:03"));
        assert_eq!(track.image.as_deref(), Some("https://example.com/imagine.jpg"));
        assert!(track.match_score.is_none());
    }

    #[test]
    fn test_track_field_variants() {
        let track: Track = serde_json::from_value(json!({
            "song_id": "4",
            "title": "Smells Like Teen Spirit",
            "artist": "Nirvana",
            "album": "Nevermind",
            "duration": 301,
            "imagePath": "covers/nevermind.png",
            "match": "87.3"
        }))
        .unwrap();

        assert_eq!(track.id, TrackId(4));
        assert_eq!(track.duration_s, Some(301.0));
        assert_eq!(track.image.as_deref(), Some("covers/nevermind.png"));
        let score = track.match_score.unwrap();
        assert!((score.percent() - 87.3).abs() < 1e-4);
        assert_eq!(score.to_string(), "87.3%");
    }

    #[test]
    fn test_match_score_serializes_as_number() {
        let track = Track {
            id: TrackId(1),
            title: "One".into(),
            artist: "U2".into(),
            album: "Achtung Baby".into(),
            year: Some(1991),
            duration_s: None,
            image: None,
            image_hint: None,
            match_score: Some(MatchScore::from_similarity(0.5)),
        };
        let value = serde_json::to_value(&track).unwrap();
        assert_eq!(value["match"], json!(50.0));
        assert_eq!(value["id"], json!(1));
        assert!(value.get("image").is_none());
    }

    #[test]
    fn test_new_song_validation() {
        let mut song = NewSong {
            title: "Song".into(),
            artist: "Artist".into(),
            album: "Album".into(),
            image: String::new(),
            track: "UklGRg==".into(),
        };
        assert!(song.validate().is_ok());
        song.album = "  ".into();
        assert_eq!(song.validate().unwrap_err(), "missing required field 'album'");
    }
}
