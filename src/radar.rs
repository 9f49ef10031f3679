//! Song radar: joins the 2D projection from `/getRadar` with catalog metadata.

use std::collections::HashMap;

use crate::api::Fetched;
use crate::track::{RadarPoint, RadarTrack, Track, TrackId};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

pub fn join_radar(points: &[RadarPoint], tracks: &[Track]) -> Vec<RadarTrack> {
    let by_id: HashMap<TrackId, &Track> = tracks.iter().map(|t| (t.id, t)).collect();

    points
        .iter()
        .map(|point| {
            let track = by_id.get(&point.song_id);
            RadarTrack {
                id: point.song_id,
                x: point.x,
                y: point.y,
                title: track
                    .map(|t| t.title.clone())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                artist: track
                    .map(|t| t.artist.clone())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
                image: track.and_then(|t| t.image.clone()),
            }
        })
        .collect()
}

/// Joins fail-soft radar and catalog answers. A substituted catalog never
/// names real upstream points: they stay unknown and the whole result is
/// reported as fallback with the catalog's reason.
pub fn radar_view(
    points: Fetched<Vec<RadarPoint>>,
    catalog: Fetched<Vec<Track>>,
) -> Fetched<Vec<RadarTrack>> {
    match (points, catalog) {
        (Fetched::Live { data: points }, Fetched::Live { data: tracks }) => Fetched::Live {
            data: join_radar(&points, &tracks),
        },
        (Fetched::Live { data: points }, Fetched::Fallback { reason, .. }) => Fetched::Fallback {
            data: join_radar(&points, &[]),
            reason,
        },
        (Fetched::Fallback { data: points, reason }, _) => Fetched::Fallback {
            data: join_radar(&points, &[]),
            reason,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::songs::fallback_tracks;

    #[test]
    fn test_join_known_and_unknown() {
        let points = vec![
            RadarPoint { song_id: TrackId(6), x: 1.0, y: 2.0 },
            RadarPoint { song_id: TrackId(99), x: -3.5, y: 0.0 },
        ];
        let joined = join_radar(&points, &fallback_tracks());

        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].title, "Billie Jean");
        assert_eq!(joined[0].artist, "Michael Jackson");
        assert_eq!((joined[0].x, joined[0].y), (1.0, 2.0));
        assert_eq!(joined[1].title, UNKNOWN_TITLE);
        assert_eq!(joined[1].artist, UNKNOWN_ARTIST);
        assert!(joined[1].image.is_none());
    }

    #[test]
    fn test_substituted_catalog_is_not_joined() {
        let points = vec![RadarPoint { song_id: TrackId(1), x: 0.5, y: 0.5 }];

        let view = radar_view(
            Fetched::Live { data: points.clone() },
            Fetched::Fallback {
                data: fallback_tracks(),
                reason: "getAllTracks returned 500".into(),
            },
        );
        assert_eq!(view.fallback_reason(), Some("getAllTracks returned 500"));
        assert_eq!(view.data()[0].title, UNKNOWN_TITLE);
        assert_eq!(view.data()[0].artist, UNKNOWN_ARTIST);

        let view = radar_view(
            Fetched::Live { data: points },
            Fetched::Live { data: fallback_tracks() },
        );
        assert!(view.is_live());
        assert_eq!(view.data()[0].title, "Bohemian Rhapsody");
    }

    #[test]
    fn test_failed_radar_keeps_its_reason() {
        let view = radar_view(
            Fetched::Fallback {
                data: vec![],
                reason: "getRadar unreachable".into(),
            },
            Fetched::Live { data: fallback_tracks() },
        );
        assert_eq!(view.fallback_reason(), Some("getRadar unreachable"));
        assert!(view.data().is_empty());
    }
}
