//! Shared data types for the catalog API and the client store.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::Catalog;

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub assets_folder: Option<PathBuf>,
}

/// A single playable item.
///
/// Two tracks are the same track when their `url` is equal; the other
/// fields are descriptive only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub url: String,
    pub mood: String,
    pub genre: String,
}

impl Track {
    /// Whether `other` refers to the same audio asset.
    pub fn same_as(&self, other: &Track) -> bool {
        self.url == other.url
    }
}

/// Query parameters for `GET /api/tracks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl TrackQuery {
    pub fn new(mood: Option<String>, genre: Option<String>) -> Self {
        Self { mood, genre }
    }

    /// Build a query from raw key/value pairs.
    ///
    /// The first value of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "mood" if query.mood.is_none() => query.mood = Some(value),
                "genre" if query.genre.is_none() => query.genre = Some(value),
                _ => {}
            }
        }
        query
    }

    /// Mood filter, treating an empty value as absent.
    pub fn mood(&self) -> Option<&str> {
        self.mood.as_deref().filter(|m| !m.is_empty())
    }

    /// Genre filter, treating an empty value as absent.
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref().filter(|g| !g.is_empty())
    }
}
