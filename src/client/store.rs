//! Client state store.
//!
//! [`TrackState`] is a plain value whose transition methods return a new
//! state. [`TrackStore`] owns the current state together with its
//! injected catalog client and persistence port, applies transitions and
//! mirrors liked/recent tracks to storage after every change.

use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

use super::api::CatalogClient;
use super::error::{ClientError, ClientResult};
use super::storage::{load_json, save_json, SharedStorage};
use crate::models::{Track, TrackQuery};

/// Storage key for liked tracks.
pub const LIKED_TRACKS_KEY: &str = "likedTracks";

/// Storage key for recently played tracks.
pub const RECENT_TRACKS_KEY: &str = "recentTracks";

/// Maximum number of recently played tracks kept.
pub const RECENT_LIMIT: usize = 2;

/// Pause before a generate request is sent.
pub const DEFAULT_GENERATE_DELAY: Duration = Duration::from_millis(2000);

/// Informational message for a generate request that matched nothing.
pub const NO_MATCH_MESSAGE: &str = "No such music created. Try some different filters.";

/// Selection, playback pointer and history of one UI session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackState {
    pub selected_mood: Option<String>,
    pub selected_genre: Option<String>,
    pub current_track: Option<Track>,
    pub generate_loading: bool,
    pub playing_track_url: Option<String>,
    /// Unique by url, in like order.
    pub liked_tracks: Vec<Track>,
    /// Most recent first, at most [`RECENT_LIMIT`] entries.
    pub recent_tracks: Vec<Track>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl TrackState {
    pub fn with_mood(&self, mood: Option<String>) -> Self {
        Self {
            selected_mood: non_empty(mood),
            ..self.clone()
        }
    }

    pub fn with_genre(&self, genre: Option<String>) -> Self {
        Self {
            selected_genre: non_empty(genre),
            ..self.clone()
        }
    }

    pub fn with_current_track(&self, track: Option<Track>) -> Self {
        Self {
            current_track: track,
            ..self.clone()
        }
    }

    pub fn with_generate_loading(&self, loading: bool) -> Self {
        Self {
            generate_loading: loading,
            ..self.clone()
        }
    }

    pub fn with_playing_track_url(&self, url: Option<String>) -> Self {
        Self {
            playing_track_url: url,
            ..self.clone()
        }
    }

    /// Remove `track` from the liked set if present, otherwise append it.
    pub fn toggle_like(&self, track: &Track) -> Self {
        let mut liked_tracks = self.liked_tracks.clone();
        if self.is_liked(track) {
            liked_tracks.retain(|t| !t.same_as(track));
        } else {
            liked_tracks.push(track.clone());
        }

        Self {
            liked_tracks,
            ..self.clone()
        }
    }

    /// Move `track` to the front of the recent list, evicting the oldest
    /// entries beyond [`RECENT_LIMIT`].
    pub fn add_recent(&self, track: &Track) -> Self {
        let mut recent_tracks = Vec::with_capacity(RECENT_LIMIT);
        recent_tracks.push(track.clone());
        recent_tracks.extend(
            self.recent_tracks
                .iter()
                .filter(|t| !t.same_as(track))
                .cloned(),
        );
        recent_tracks.truncate(RECENT_LIMIT);

        Self {
            recent_tracks,
            ..self.clone()
        }
    }

    pub fn is_liked(&self, track: &Track) -> bool {
        self.liked_tracks.iter().any(|t| t.same_as(track))
    }

    pub fn is_playing(&self, track: &Track) -> bool {
        self.playing_track_url.as_deref() == Some(track.url.as_str())
    }

    /// The query a generate request would send, if both filters are set.
    pub fn selection_query(&self) -> Option<TrackQuery> {
        match (&self.selected_mood, &self.selected_genre) {
            (Some(mood), Some(genre)) => {
                Some(TrackQuery::new(Some(mood.clone()), Some(genre.clone())))
            }
            _ => None,
        }
    }
}

/// Handle for an in-flight generate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateTicket {
    generation: u64,
    query: TrackQuery,
}

impl GenerateTicket {
    pub fn query(&self) -> &TrackQuery {
        &self.query
    }
}

/// Result of a completed generate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// A track was picked and is now the current track.
    Picked(Track),
    /// The query matched nothing; the current track stays unset.
    NoMatch,
    /// A newer request or a selection change superseded this one.
    Stale,
}

impl GenerateOutcome {
    /// Informational message to show the user, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::NoMatch => Some(NO_MATCH_MESSAGE),
            Self::Picked(_) | Self::Stale => None,
        }
    }
}

/// State container with injected catalog client and persistence port.
pub struct TrackStore<C> {
    state: TrackState,
    catalog: C,
    storage: SharedStorage,
    /// Bumped by every generate start and selection change.
    generation: u64,
    generate_delay: Duration,
}

impl<C: CatalogClient> TrackStore<C> {
    /// Create a store and load persisted history from `storage`.
    pub fn new(catalog: C, storage: SharedStorage) -> Self {
        let mut store = Self {
            state: TrackState::default(),
            catalog,
            storage,
            generation: 0,
            generate_delay: DEFAULT_GENERATE_DELAY,
        };
        store.initialize();
        store
    }

    /// Override the pause before generate requests.
    pub fn with_generate_delay(mut self, delay: Duration) -> Self {
        self.generate_delay = delay;
        self
    }

    pub fn state(&self) -> &TrackState {
        &self.state
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    fn initialize(&mut self) {
        let liked: Vec<Track> = self.load_tracks(LIKED_TRACKS_KEY);
        let recent: Vec<Track> = self.load_tracks(RECENT_TRACKS_KEY);

        let mut state = TrackState::default();
        for track in &liked {
            if !state.is_liked(track) {
                state = state.toggle_like(track);
            }
        }
        // Replay oldest first so the stored order is kept.
        for track in recent.iter().rev() {
            state = state.add_recent(track);
        }

        tracing::debug!(
            liked = state.liked_tracks.len(),
            recent = state.recent_tracks.len(),
            "Loaded track history"
        );
        self.state = state;
    }

    fn load_tracks(&self, key: &str) -> Vec<Track> {
        match load_json(self.storage.as_ref(), key) {
            Ok(Some(tracks)) => tracks,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring unreadable stored tracks");
                Vec::new()
            }
        }
    }

    fn persist(&self, key: &str, tracks: &[Track]) -> ClientResult<()> {
        save_json(self.storage.as_ref(), key, tracks).map_err(|e| {
            tracing::warn!(key, error = %e, "Failed to persist tracks");
            e
        })
    }

    fn cancel_pending(&mut self) {
        self.generation += 1;
        if self.state.generate_loading {
            tracing::debug!("Selection changed, discarding pending generate");
            self.state = self.state.with_generate_loading(false);
        }
    }

    /// Select a mood. An empty string clears the selection.
    pub fn set_mood(&mut self, mood: impl Into<String>) {
        self.cancel_pending();
        self.state = self.state.with_mood(Some(mood.into()));
    }

    /// Select a genre. An empty string clears the selection.
    pub fn set_genre(&mut self, genre: impl Into<String>) {
        self.cancel_pending();
        self.state = self.state.with_genre(Some(genre.into()));
    }

    pub fn set_current_track(&mut self, track: Option<Track>) {
        self.state = self.state.with_current_track(track);
    }

    /// Hand the playback token to `url`, or release it with `None`.
    pub fn set_playing_track_url(&mut self, url: Option<String>) {
        tracing::debug!(url = ?url, "Playing track changed");
        self.state = self.state.with_playing_track_url(url);
    }

    /// Like or unlike `track`. Returns whether it is liked afterwards.
    pub fn toggle_like(&mut self, track: &Track) -> ClientResult<bool> {
        self.state = self.state.toggle_like(track);
        let liked = self.state.is_liked(track);
        tracing::debug!(url = %track.url, liked, "Toggled like");

        self.persist(LIKED_TRACKS_KEY, &self.state.liked_tracks)?;
        Ok(liked)
    }

    pub fn add_recent(&mut self, track: &Track) -> ClientResult<()> {
        self.state = self.state.add_recent(track);
        tracing::debug!(url = %track.url, "Added recent track");

        self.persist(RECENT_TRACKS_KEY, &self.state.recent_tracks)
    }

    /// Start a generate request for the current selection.
    ///
    /// Fails without side effects when mood or genre is unset. Otherwise
    /// marks the store as loading, clears the current track and returns a
    /// ticket to pass to [`finish_generate`](Self::finish_generate).
    pub fn begin_generate(&mut self) -> ClientResult<GenerateTicket> {
        let query = self
            .state
            .selection_query()
            .ok_or(ClientError::MissingSelection)?;

        self.generation += 1;
        self.state = self
            .state
            .with_generate_loading(true)
            .with_current_track(None);

        Ok(GenerateTicket {
            generation: self.generation,
            query,
        })
    }

    /// Apply the catalog response for `ticket`.
    ///
    /// Responses for superseded tickets leave the state untouched.
    pub fn finish_generate<R: Rng + ?Sized>(
        &mut self,
        ticket: GenerateTicket,
        result: ClientResult<Vec<Track>>,
        rng: &mut R,
    ) -> ClientResult<GenerateOutcome> {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping stale generate response"
            );
            return Ok(GenerateOutcome::Stale);
        }

        let tracks = match result {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::warn!(error = %e, "Generate request failed");
                self.state = self.state.with_generate_loading(false);
                return Err(e);
            }
        };

        let picked = tracks.choose(rng).cloned();
        self.state = self
            .state
            .with_current_track(picked.clone())
            .with_generate_loading(false);

        match picked {
            Some(track) => {
                tracing::info!(title = %track.title, candidates = tracks.len(), "Generated track");
                Ok(GenerateOutcome::Picked(track))
            }
            None => {
                tracing::info!(
                    mood = ?ticket.query.mood(),
                    genre = ?ticket.query.genre(),
                    "No track matched"
                );
                Ok(GenerateOutcome::NoMatch)
            }
        }
    }

    /// Run a full generate cycle: validate, wait, fetch and pick.
    pub async fn generate(&mut self) -> ClientResult<GenerateOutcome> {
        let ticket = self.begin_generate()?;

        if !self.generate_delay.is_zero() {
            tokio::time::sleep(self.generate_delay).await;
        }

        let result = self.catalog.tracks(ticket.query()).await;
        let mut rng = rand::thread_rng();
        self.finish_generate(ticket, result, &mut rng)
    }
}
