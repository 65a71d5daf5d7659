//! Command-line client for a QuickTune catalog server.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quicktune::client::{
    CatalogClient, ClientConfig, ClientError, GenerateOutcome, HttpCatalogClient,
    JsonFileStorage, Playback, TrackState, TrackStore,
};
use quicktune::models::{Track, TrackQuery};

#[derive(Parser)]
#[command(name = "quicktune-cli", about = "Pick music by mood and genre")]
struct Cli {
    /// Catalog server URL (overrides QUICKTUNE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available moods
    Moods,
    /// List available genres
    Genres,
    /// List tracks matching a mood or genre
    Tracks {
        #[arg(long)]
        mood: Option<String>,
        #[arg(long)]
        genre: Option<String>,
    },
    /// Pick a random track for a mood and genre
    Generate {
        #[arg(long)]
        mood: String,
        #[arg(long)]
        genre: String,
        /// Start playing the picked track
        #[arg(long)]
        play: bool,
        /// Like the picked track
        #[arg(long)]
        like: bool,
    },
    /// Play a liked or recent track by url
    Play { url: String },
    /// Show liked tracks
    Likes,
    /// Remove a track from the liked tracks
    Unlike { url: String },
    /// Show recently played tracks
    Recent,
}

fn print_track(state: &TrackState, track: &Track) {
    let marker = if state.is_liked(track) { "*" } else { " " };
    println!(
        "{} {}  [{} / {}]  {}",
        marker, track.title, track.mood, track.genre, track.url
    );
}

fn print_tracks(state: &TrackState, tracks: &[Track], empty: &str) {
    if tracks.is_empty() {
        println!("{}", empty);
        return;
    }
    for track in tracks {
        print_track(state, track);
    }
}

fn user_error(e: ClientError) -> anyhow::Error {
    tracing::debug!(error = %e, code = e.error_code(), "Command failed");
    anyhow::anyhow!(e.user_message())
}

fn find_known(state: &TrackState, url: &str) -> Option<Track> {
    state
        .liked_tracks
        .iter()
        .chain(state.recent_tracks.iter())
        .find(|t| t.url == url)
        .cloned()
}

fn play(store: &mut TrackStore<HttpCatalogClient>, track: Track) -> Result<()> {
    store.set_current_track(Some(track.clone()));
    let mut player = Playback::new(track);
    player.toggle(store).map_err(user_error)?;
    println!("Now playing: {}", player.track().title);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let storage = JsonFileStorage::open(&config.state_file).with_context(|| {
        format!("Failed to open state file {}", config.state_file.display())
    })?;
    let client = HttpCatalogClient::new(config.api_url.clone());
    let mut store =
        TrackStore::new(client, Arc::new(storage)).with_generate_delay(config.generate_delay);

    match cli.command {
        Commands::Moods => {
            for mood in store.catalog().moods().await.map_err(user_error)? {
                println!("{}", mood);
            }
        }
        Commands::Genres => {
            for genre in store.catalog().genres().await.map_err(user_error)? {
                println!("{}", genre);
            }
        }
        Commands::Tracks { mood, genre } => {
            let tracks = store
                .catalog()
                .tracks(&TrackQuery::new(mood, genre))
                .await
                .map_err(user_error)?;
            print_tracks(store.state(), &tracks, "No tracks found.");
        }
        Commands::Generate {
            mood,
            genre,
            play: start,
            like,
        } => {
            store.set_mood(mood);
            store.set_genre(genre);
            println!("Generating...");

            match store.generate().await.map_err(user_error)? {
                GenerateOutcome::Picked(track) => {
                    if like {
                        store.toggle_like(&track).map_err(user_error)?;
                    }
                    print_track(store.state(), &track);
                    if start {
                        play(&mut store, track)?;
                    }
                }
                outcome @ GenerateOutcome::NoMatch => {
                    println!("{}", outcome.message().unwrap_or_default());
                }
                GenerateOutcome::Stale => {}
            }
        }
        Commands::Play { url } => {
            let Some(track) = find_known(store.state(), &url) else {
                bail!("No liked or recent track with url {}", url);
            };
            play(&mut store, track)?;
        }
        Commands::Likes => {
            print_tracks(store.state(), &store.state().liked_tracks, "No liked tracks yet.");
        }
        Commands::Unlike { url } => {
            let Some(track) = store
                .state()
                .liked_tracks
                .iter()
                .find(|t| t.url == url)
                .cloned()
            else {
                bail!("No liked track with url {}", url);
            };
            store.toggle_like(&track).map_err(user_error)?;
            println!("Removed {} from liked tracks", track.title);
        }
        Commands::Recent => {
            print_tracks(
                store.state(),
                &store.state().recent_tracks,
                "Nothing played yet.",
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
