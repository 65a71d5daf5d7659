//! Per-track playback control.
//!
//! Audio output itself is left to the embedding UI; this tracks play/pause,
//! progress and seeking, and cooperates with other players through the
//! store's playing-track token so only one track plays at a time.

use super::api::CatalogClient;
use super::error::ClientResult;
use super::store::TrackStore;
use crate::models::Track;

/// Player state for a single track.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    track: Track,
    playing: bool,
    position: f64,
    duration: Option<f64>,
}

impl Playback {
    pub fn new(track: Track) -> Self {
        Self {
            track,
            playing: false,
            position: 0.0,
            duration: None,
        }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current position in seconds.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Track length in seconds, once known.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Play or pause.
    ///
    /// Starting playback claims the store's playing-track token and records
    /// the track as recently played; pausing releases the token.
    pub fn toggle<C: CatalogClient>(&mut self, store: &mut TrackStore<C>) -> ClientResult<()> {
        if self.playing {
            self.playing = false;
            store.set_playing_track_url(None);
            return Ok(());
        }

        self.playing = true;
        store.set_playing_track_url(Some(self.track.url.clone()));
        store.add_recent(&self.track)
    }

    /// React to a change of the playing-track token.
    ///
    /// Returns true when this player stopped because another track (or
    /// nothing) now owns the token.
    pub fn observe(&mut self, playing_url: Option<&str>) -> bool {
        if self.playing && playing_url != Some(self.track.url.as_str()) {
            self.playing = false;
            return true;
        }
        false
    }

    /// Record the track length reported by the decoder.
    pub fn set_duration(&mut self, secs: f64) {
        if secs.is_finite() && secs > 0.0 {
            self.duration = Some(secs);
            self.position = self.position.min(secs);
        }
    }

    /// Record the decoder's current position.
    pub fn update_position(&mut self, secs: f64) {
        if secs.is_finite() {
            self.position = match self.duration {
                Some(d) => secs.clamp(0.0, d),
                None => secs.max(0.0),
            };
        }
    }

    /// Seek to `fraction` of the track. Returns the new position, or `None`
    /// while the duration is still unknown.
    pub fn seek_fraction(&mut self, fraction: f64) -> Option<f64> {
        let duration = self.duration?;
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.position = fraction * duration;
        Some(self.position)
    }

    /// Progress through the track as a percentage.
    pub fn progress_percent(&self) -> f64 {
        match self.duration {
            Some(d) => self.position / d * 100.0,
            None => 0.0,
        }
    }
}

/// Format seconds as `m:ss`.
pub fn format_time(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::MemoryStorage;
    use crate::client::store::tests::{store_with, track, FakeCatalog};
    use std::sync::Arc;

    #[test]
    fn test_toggle_claims_and_releases_token() {
        let mut store = store_with(FakeCatalog::new(), Arc::new(MemoryStorage::new()));
        let mut player = Playback::new(track("a"));

        player.toggle(&mut store).unwrap();
        assert!(player.is_playing());
        assert!(store.state().is_playing(&track("a")));
        assert_eq!(store.state().recent_tracks, vec![track("a")]);

        player.toggle(&mut store).unwrap();
        assert!(!player.is_playing());
        assert_eq!(store.state().playing_track_url, None);
    }

    #[test]
    fn test_only_one_player_keeps_playing() {
        let mut store = store_with(FakeCatalog::new(), Arc::new(MemoryStorage::new()));
        let mut first = Playback::new(track("a"));
        let mut second = Playback::new(track("b"));

        first.toggle(&mut store).unwrap();
        second.toggle(&mut store).unwrap();

        let token = store.state().playing_track_url.clone();
        assert!(first.observe(token.as_deref()));
        assert!(!second.observe(token.as_deref()));
        assert!(!first.is_playing());
        assert!(second.is_playing());
        assert_eq!(store.state().recent_tracks, vec![track("b"), track("a")]);
    }

    #[test]
    fn test_seek_and_progress() {
        let mut player = Playback::new(track("a"));
        assert_eq!(player.seek_fraction(0.5), None);

        player.set_duration(200.0);
        assert_eq!(player.seek_fraction(0.25), Some(50.0));
        assert_eq!(player.progress_percent(), 25.0);

        assert_eq!(player.seek_fraction(3.0), Some(200.0));
        player.update_position(500.0);
        assert_eq!(player.position(), 200.0);
    }

    #[test]
    fn test_duration_clamps_earlier_position() {
        let mut player = Playback::new(track("a"));
        player.update_position(300.0);
        player.set_duration(200.0);
        assert_eq!(player.position(), 200.0);
        assert_eq!(player.progress_percent(), 100.0);
    }

    #[test]
    fn test_invalid_duration_ignored() {
        let mut player = Playback::new(track("a"));
        player.set_duration(f64::NAN);
        player.set_duration(0.0);
        assert_eq!(player.duration(), None);
        assert_eq!(player.progress_percent(), 0.0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.9), "0:09");
        assert_eq!(format_time(61.0), "1:01");
        assert_eq!(format_time(754.2), "12:34");
        assert_eq!(format_time(f64::NAN), "0:00");
    }
}
