use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod api;
pub mod audio;
pub mod cache;
pub mod config;
pub mod error;
pub mod html_template;
pub mod radar;
pub mod recommend;
pub mod server;
pub mod similarity;
pub mod songs;
pub mod track;

use api::{DiscoveryClient, Fetched};
use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use recommend::LikedTracks;
use track::{NewSong, Track, TrackId};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the discovery API
    #[arg(long, global = true, env = "SONGSCOPE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "SONGSCOPE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the catalog
    Tracks {
        /// Only show tracks whose title or artist contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Compare two bundled songs by their feature vectors
    Compare { a: TrackId, b: TrackId },
    /// Rank the bundled songs by similarity to one of them
    LocalSimilar {
        id: TrackId,
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Ask the service for songs similar to a track
    Similar { id: TrackId },
    /// Ask the service for recommendations from liked tracks
    Recommend {
        #[arg(required = true)]
        liked: Vec<TrackId>,
    },
    /// Identify a song from an audio recording
    Identify { file: PathBuf },
    /// Upload a new song
    Add(AddArgs),
    /// Upload every audio file found under a directory
    AddDir {
        dir: PathBuf,
        /// Cover image URL applied to every song
        #[arg(long)]
        image: Option<String>,
    },
    /// Show the 2D song map
    Radar,
    /// Start web dashboard
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

#[derive(Parser, Debug)]
struct AddArgs {
    file: PathBuf,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    artist: Option<String>,
    #[arg(long)]
    album: Option<String>,
    /// Cover image URL
    #[arg(long)]
    image: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Local commands need no client
    match &cli.command {
        Commands::Compare { a, b } => return run_compare(*a, *b),
        Commands::LocalSimilar { id, top } => return run_local_similar(*id, *top),
        _ => {}
    }

    let config = ClientConfig::new(&cli.api_url, cli.timeout_secs)?;
    let client = DiscoveryClient::new(config)?;

    match cli.command {
        Commands::Tracks { search } => run_tracks(&client, search.as_deref()).await,
        Commands::Similar { id } => run_similar(&client, id).await,
        Commands::Recommend { liked } => run_recommend(&client, liked).await,
        Commands::Identify { file } => run_identify(&client, &file).await,
        Commands::Add(args) => run_add(&client, args).await,
        Commands::AddDir { dir, image } => run_add_dir(&client, &dir, image).await,
        Commands::Radar => run_radar(&client).await,
        Commands::Serve { port } => server::start_server(client, port).await,
        Commands::Compare { .. } | Commands::LocalSimilar { .. } => Ok(()),
    }
}

fn print_tracks(tracks: &[Track]) {
    if tracks.is_empty() {
        println!("(no tracks)");
        return;
    }
    for t in tracks {
        let score = t
            .match_score
            .map(|m| format!("{:>7}", m.to_string()))
            .unwrap_or_else(|| " ".repeat(7));
        let duration = t.duration_label().unwrap_or_default();
        println!(
            "{:>5}  {}  {} - {} [{}] {}",
            t.id, score, t.title, t.artist, t.album, duration
        );
    }
}

fn note_fallback<T>(fetched: &Fetched<T>) {
    if let Some(reason) = fetched.fallback_reason() {
        eprintln!("Service unavailable, showing fallback data: {}", reason);
    }
}

async fn run_tracks(client: &DiscoveryClient, search: Option<&str>) -> Result<()> {
    let fetched = client.all_tracks().await;
    note_fallback(&fetched);
    let tracks = fetched.into_data();
    let shown: Vec<Track> = recommend::filter_tracks(&tracks, search.unwrap_or_default())
        .into_iter()
        .cloned()
        .collect();
    print_tracks(&shown);
    println!("{} of {} tracks", shown.len(), tracks.len());
    Ok(())
}

fn run_compare(a: TrackId, b: TrackId) -> Result<()> {
    let song_a = songs::find_song(a).with_context(|| format!("No bundled song {}", a))?;
    let song_b = songs::find_song(b).with_context(|| format!("No bundled song {}", b))?;

    let score = song_a.features.similarity(&song_b.features);
    println!(
        "{} ({}) vs {} ({}): {}% ({:.4})",
        song_a.title,
        song_a.artist,
        song_b.title,
        song_b.artist,
        score.as_percent(),
        score.value()
    );
    Ok(())
}

fn run_local_similar(id: TrackId, top: usize) -> Result<()> {
    let seed = songs::find_song(id).with_context(|| format!("No bundled song {}", id))?;
    println!("Songs closest to {} by {}:", seed.title, seed.artist);
    print_tracks(&recommend::rank_local(seed, songs::all_songs(), top));
    Ok(())
}

async fn run_similar(client: &DiscoveryClient, id: TrackId) -> Result<()> {
    let fetched = client.similar(id).await;
    note_fallback(&fetched);
    print_tracks(fetched.data());
    Ok(())
}

async fn run_recommend(client: &DiscoveryClient, liked: Vec<TrackId>) -> Result<()> {
    let liked: LikedTracks = liked.into_iter().collect();
    let fetched = client.recommendations(&liked.ids()).await;
    note_fallback(&fetched);
    print_tracks(fetched.data());
    Ok(())
}

async fn run_identify(client: &DiscoveryClient, file: &Path) -> Result<()> {
    let audio = audio::encode_file(file)?;
    info!(file = %file.display(), bytes = audio.len(), "Sending recording for recognition");

    match client.identify(&audio).await? {
        Some(track) => {
            println!("Identified:");
            print_tracks(&[track]);
        }
        None => println!("No match found."),
    }
    Ok(())
}

/// Explicit values win over tags read from the file.
fn build_new_song(
    file: &Path,
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    image: Option<String>,
) -> Result<NewSong> {
    let tags = audio::read_song_tags(file);
    if let Some(secs) = tags.duration_s {
        info!(file = %file.display(), duration_s = secs, "Read audio tags");
    }
    let song = NewSong {
        title: title.or(tags.title).unwrap_or_default(),
        artist: artist.or(tags.artist).unwrap_or_default(),
        album: album.or(tags.album).unwrap_or_default(),
        image: image.unwrap_or_default(),
        track: audio::encode_file(file)?,
    };
    if let Err(msg) = song.validate() {
        bail!("{:?}: {} (pass it explicitly)", file, msg);
    }
    Ok(song)
}

async fn run_add(client: &DiscoveryClient, args: AddArgs) -> Result<()> {
    let song = build_new_song(&args.file, args.title, args.artist, args.album, args.image)?;
    client
        .add_song(&song)
        .await
        .with_context(|| format!("Could not add {:?}", args.file))?;
    println!("Added {} by {}", song.title, song.artist);
    Ok(())
}

async fn run_add_dir(client: &DiscoveryClient, dir: &Path, image: Option<String>) -> Result<()> {
    let files = audio::scan_audio_files(dir)?;
    info!(dir = %dir.display(), count = files.len(), "Found audio files");

    let mut added = 0;
    let mut failed = 0;
    for file in &files {
        let result = match build_new_song(file, None, None, None, image.clone()) {
            Ok(song) => client.add_song(&song).await.map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                added += 1;
                println!("Added {:?}", file);
            }
            Err(e) => {
                failed += 1;
                warn!(file = %file.display(), error = %e, "Failed to add song");
            }
        }
    }

    println!("Added: {}, Errors: {}", added, failed);
    Ok(())
}

async fn run_radar(client: &DiscoveryClient) -> Result<()> {
    let (points, tracks) = tokio::join!(client.radar(), client.all_tracks());
    let view = radar::radar_view(points, tracks);
    note_fallback(&view);
    for p in view.into_data() {
        println!("{:>5}  ({:>8.3}, {:>8.3})  {} - {}", p.id, p.x, p.y, p.title, p.artist);
    }
    Ok(())
}
