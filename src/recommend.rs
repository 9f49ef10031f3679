//! Recommendation Shaping Module
//!
//! Client-side helpers around the recommendation flow: catalog filtering,
//! ordering by match score, local similarity ranking over the bundled
//! catalog, and the like-set the user builds before asking for suggestions.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::songs::Song;
use crate::track::{MatchScore, Track, TrackId};

/// Keep tracks whose title or artist contains `term` (case-insensitive).
/// An empty term keeps everything.
pub fn filter_tracks<'a>(tracks: &'a [Track], term: &str) -> Vec<&'a Track> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return tracks.iter().collect();
    }
    tracks
        .iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&term) || t.artist.to_lowercase().contains(&term)
        })
        .collect()
}

/// Sort by match score, best first. Unscored tracks go last, keeping their
/// relative order.
pub fn sort_by_match(tracks: &mut [Track]) {
    tracks.sort_by(|a, b| match (a.match_score, b.match_score) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Rank `songs` by cosine similarity to `seed`
///
/// # Arguments
/// * `seed` - The song to compare against (excluded from the results)
/// * `songs` - Candidate songs with feature vectors
/// * `top_k` - Number of results to return
///
/// # Returns
/// Tracks carrying a computed match score, most similar first
pub fn rank_local(seed: &Song, songs: &[Song], top_k: usize) -> Vec<Track> {
    let mut results: Vec<Track> = songs
        .iter()
        .filter(|song| song.id != seed.id)
        .map(|song| {
            let score = seed.features.similarity(&song.features);
            let mut track = song.to_track();
            track.match_score = Some(MatchScore::from_similarity(score.value()));
            track
        })
        .collect();

    sort_by_match(&mut results);
    results.truncate(top_k);
    results
}

/// Tracks the user has liked, in id order.
#[derive(Debug, Default, Clone)]
pub struct LikedTracks {
    ids: BTreeSet<TrackId>,
}

impl LikedTracks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like or unlike a track. Returns true if it is now liked.
    pub fn toggle(&mut self, id: TrackId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> Vec<TrackId> {
        self.ids.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl FromIterator<TrackId> for LikedTracks {
    fn from_iter<I: IntoIterator<Item = TrackId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::songs::{all_songs, fallback_tracks, find_song};

    fn scored(id: u64, percent: Option<f32>) -> Track {
        let mut track = fallback_tracks().remove(0);
        track.id = TrackId(id);
        track.match_score = percent.map(MatchScore::from_percent);
        track
    }

    #[test]
    fn test_filter_by_title_or_artist() {
        let tracks = fallback_tracks();
        let hits: Vec<u64> = filter_tracks(&tracks, "ing").iter().map(|t| t.id.0).collect();
        assert_eq!(hits, vec![5, 10]);
        let hits: Vec<u64> = filter_tracks(&tracks, "weeknd").iter().map(|t| t.id.0).collect();
        assert_eq!(hits, vec![10]);

        assert_eq!(filter_tracks(&tracks, "  QUEEN ").len(), 1);
        assert_eq!(filter_tracks(&tracks, "").len(), tracks.len());
        assert!(filter_tracks(&tracks, "zzz").is_empty());
    }

    #[test]
    fn test_sort_by_match_puts_unscored_last() {
        let mut tracks = vec![
            scored(1, None),
            scored(2, Some(70.0)),
            scored(3, Some(95.5)),
            scored(4, None),
        ];
        sort_by_match(&mut tracks);
        let ids: Vec<u64> = tracks.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_rank_local_excludes_seed() {
        let seed = find_song(TrackId(1)).unwrap();
        let ranked = rank_local(seed, all_songs(), 3);

        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|t| t.id != seed.id));
        // "One" has nearly the same profile as "Bohemian Rhapsody"
        assert_eq!(ranked[0].id, TrackId(8));

        let scores: Vec<f32> = ranked
            .iter()
            .map(|t| t.match_score.unwrap().percent())
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_liked_tracks_toggle() {
        let mut liked = LikedTracks::new();
        assert!(liked.toggle(TrackId(4)));
        assert!(liked.toggle(TrackId(1)));
        assert!(!liked.toggle(TrackId(4)));
        assert!(liked.contains(TrackId(1)));
        assert_eq!(liked.ids(), vec![TrackId(1)]);
        liked.clear();
        assert!(liked.is_empty());
    }
}
