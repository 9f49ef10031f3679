//! Bundled reference catalog.
//!
//! Ten well-known songs with hand-assigned five-dimensional feature vectors.
//! Used by the local comparison tools and as the catalog shown when the
//! remote service cannot be reached.

use std::sync::LazyLock;

use crate::similarity::FeatureVector;
use crate::track::{Track, TrackId};

/// Length of the bundled feature vectors.
pub const FEATURE_DIM: usize = 5;

#[derive(Debug, Clone)]
pub struct Song {
    pub id: TrackId,
    pub title: &'static str,
    pub artist: &'static str,
    pub album: &'static str,
    pub year: u32,
    pub features: FeatureVector,
}

impl Song {
    pub fn to_track(&self) -> Track {
        Track {
            id: self.id,
            title: self.title.to_string(),
            artist: self.artist.to_string(),
            album: self.album.to_string(),
            year: Some(self.year),
            duration_s: None,
            image: None,
            image_hint: Some("album cover".to_string()),
            match_score: None,
        }
    }
}

type Row = (u64, &'static str, &'static str, &'static str, u32, [f32; FEATURE_DIM]);

const ROWS: [Row; 10] = [
    (1, "Bohemian Rhapsody", "Queen", "A Night at the Opera", 1975, [0.8, 0.6, 0.9, 0.2, 0.5]),
    (2, "Stairway to Heaven", "Led Zeppelin", "Led Zeppelin IV", 1971, [0.7, 0.5, 0.8, 0.3, 0.6]),
    (3, "Hotel California", "Eagles", "Hotel California", 1976, [0.6, 0.7, 0.7, 0.4, 0.4]),
    (4, "Smells Like Teen Spirit", "Nirvana", "Nevermind", 1991, [0.9, 0.2, 0.3, 0.8, 0.7]),
    (5, "Like a Rolling Stone", "Bob Dylan", "Highway 61 Revisited", 1965, [0.5, 0.8, 0.6, 0.1, 0.3]),
    (6, "Billie Jean", "Michael Jackson", "Thriller", 1982, [0.4, 0.9, 0.5, 0.6, 0.8]),
    (7, "Imagine", "John Lennon", "Imagine", 1971, [0.3, 0.4, 0.9, 0.1, 0.2]),
    (8, "One", "U2", "Achtung Baby", 1991, [0.7, 0.6, 0.8, 0.3, 0.5]),
    (9, "Shape of You", "Ed Sheeran", "÷", 2017, [0.3, 0.8, 0.4, 0.7, 0.9]),
    (10, "Blinding Lights", "The Weeknd", "After Hours", 2020, [0.5, 0.9, 0.5, 0.8, 0.8]),
];

static SONGS: LazyLock<Vec<Song>> = LazyLock::new(|| {
    ROWS.iter()
        .map(|&(id, title, artist, album, year, features)| Song {
            id: TrackId(id),
            title,
            artist,
            album,
            year,
            features: FeatureVector::new(features.to_vec()),
        })
        .collect()
});

pub fn all_songs() -> &'static [Song] {
    &SONGS
}

pub fn find_song(id: TrackId) -> Option<&'static Song> {
    SONGS.iter().find(|s| s.id == id)
}

/// Catalog substituted when `/getAllTracks` fails.
pub fn fallback_tracks() -> Vec<Track> {
    SONGS.iter().map(Song::to_track).collect()
}
