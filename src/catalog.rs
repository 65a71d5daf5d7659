//! The static track catalog.
//!
//! Seeded once at startup and never mutated, so it can be shared between
//! server workers without locking.

use crate::models::{Track, TrackQuery};

const MOODS: &[&str] = &["Happy", "Sad", "Energetic", "Chill"];

const GENRES: &[&str] = &["Pop", "Lo-fi", "Cinematic", "EDM"];

/// (title, asset file, mood, genre)
const SEED_TRACKS: &[(&str, &str, &str, &str)] = &[
    ("Sunny Vibes", "good-vibes.mp3", "Happy", "Pop"),
    ("Midnight Rain", "midnight-highway.mp3", "Sad", "Lo-fi"),
    ("Epic Pulse", "epic-hollywood.mp3", "Energetic", "Cinematic"),
    ("Chill Zone", "chill.mp3", "Chill", "EDM"),
];

/// Read-only provider of moods, genres and tracks.
#[derive(Debug, Clone)]
pub struct Catalog {
    moods: Vec<String>,
    genres: Vec<String>,
    tracks: Vec<Track>,
}

impl Catalog {
    /// Build the fixed catalog with track urls rooted at `asset_base_url`.
    pub fn seeded(asset_base_url: &str) -> Self {
        let base = asset_base_url.trim_end_matches('/');

        let tracks = SEED_TRACKS
            .iter()
            .map(|(title, file, mood, genre)| Track {
                title: title.to_string(),
                url: format!("{}/assets/{}", base, file),
                mood: mood.to_string(),
                genre: genre.to_string(),
            })
            .collect();

        Self {
            moods: MOODS.iter().map(|m| m.to_string()).collect(),
            genres: GENRES.iter().map(|g| g.to_string()).collect(),
            tracks,
        }
    }

    pub fn moods(&self) -> &[String] {
        &self.moods
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Tracks matching the query, in catalog order.
    ///
    /// The two filters are OR-ed, and an absent filter matches every
    /// track. A track therefore qualifies when either clause holds:
    /// `(no mood || mood matches) || (no genre || genre matches)`.
    /// Supplying only one filter returns the whole catalog.
    pub fn filter_tracks(&self, query: &TrackQuery) -> Vec<Track> {
        let mood = query.mood();
        let genre = query.genre();

        self.tracks
            .iter()
            .filter(|t| {
                mood.map_or(true, |m| t.mood == m) || genre.map_or(true, |g| t.genre == g)
            })
            .cloned()
            .collect()
    }
}
