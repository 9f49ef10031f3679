//! Local audio input: base64 encoding for upload, tag reading for new songs,
//! and directory scanning for bulk adds.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Accessor;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "flac", "wav", "m4a", "ogg", "webm"];

/// Read a file and return its contents as standard base64.
pub fn encode_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read audio file {:?}", path))?;
    Ok(STANDARD.encode(bytes))
}

/// Drop a `data:<mime>;base64,` prefix if present.
pub fn strip_data_url(input: &str) -> &str {
    match input.split_once(',') {
        Some((head, rest)) if head.starts_with("data:") => rest,
        _ => input,
    }
}

/// Metadata found for a local audio file. Missing fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_s: Option<f64>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Split a file name of the form "Title - Artist".
fn parse_filename(path: &Path) -> (Option<String>, Option<String>) {
    let stem = match path.file_stem().and_then(|s| s.to_str()) {
        Some(s) => s,
        None => return (None, None),
    };

    match stem.split_once(" - ") {
        Some((title, artist)) => (
            non_empty(Some(title.to_string())),
            non_empty(Some(artist.to_string())),
        ),
        None => (non_empty(Some(stem.to_string())), None),
    }
}

/// Read title, artist, album and duration from the file's tags.
///
/// Title and artist fall back to the file name, album to the name of the
/// containing directory.
pub fn read_song_tags(path: &Path) -> SongTags {
    let mut tags = match Probe::open(path).and_then(|p| p.read()) {
        Ok(tagged_file) => {
            let duration = tagged_file.properties().duration().as_secs_f64();
            let mut tags = SongTags {
                duration_s: (duration > 0.0).then_some(duration),
                ..SongTags::default()
            };
            if let Some(t) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
                tags.title = non_empty(t.title().map(|s| s.into_owned()));
                tags.artist = non_empty(t.artist().map(|s| s.into_owned()));
                tags.album = non_empty(t.album().map(|s| s.into_owned()));
            }
            tags
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "No readable tags");
            SongTags::default()
        }
    };

    if tags.title.is_none() {
        let (title, artist) = parse_filename(path);
        tags.title = title;
        if tags.artist.is_none() {
            tags.artist = artist;
        }
    }
    if tags.album.is_none() {
        tags.album = non_empty(
            path.parent()
                .and_then(|p| p.file_name())
                .and_then(|s| s.to_str())
                .map(str::to_string),
        );
    }
    tags
}

/// Recursively collect audio files under `dir`, sorted by path.
pub fn scan_audio_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("{:?} is not a directory", dir);
    }
    let valid_extensions: HashSet<&str> = AUDIO_EXTENSIONS.into_iter().collect();

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| valid_extensions.contains(ext.to_lowercase().as_str()))
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        fs::write(&path, b"RIFF").unwrap();
        assert_eq!(encode_file(&path).unwrap(), "UklGRg==");
        assert!(encode_file(&dir.path().join("missing.wav")).is_err());
    }

    #[test]
    fn test_strip_data_url() {
        assert_eq!(strip_data_url("data:audio/webm;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_url("AAAA"), "AAAA");
        assert_eq!(strip_data_url("not,data"), "not,data");
    }

    #[test]
    fn test_tags_fall_back_to_file_and_dir_names() {
        let dir = tempfile::tempdir().unwrap();
        let album_dir = dir.path().join("Power Corruption");
        fs::create_dir(&album_dir).unwrap();
        let path = album_dir.join("Blue Monday - New Order.wav");
        fs::write(&path, b"not really audio").unwrap();

        let tags = read_song_tags(&path);
        assert_eq!(tags.title.as_deref(), Some("Blue Monday"));
        assert_eq!(tags.artist.as_deref(), Some("New Order"));
        assert_eq!(tags.album.as_deref(), Some("Power Corruption"));
        assert_eq!(tags.duration_s, None);
    }

    #[test]
    fn test_filename_without_artist() {
        let (title, artist) = parse_filename(Path::new("/music/Interlude.mp3"));
        assert_eq!(title.as_deref(), Some("Interlude"));
        assert_eq!(artist, None);
    }

    #[test]
    fn test_scan_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.mp3"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::write(dir.path().join("sub").join("c.FLAC"), b"").unwrap();

        let files = scan_audio_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.mp3"));
        assert!(files[1].ends_with("sub/c.FLAC"));

        assert!(scan_audio_files(&dir.path().join("a.mp3")).is_err());
    }
}
