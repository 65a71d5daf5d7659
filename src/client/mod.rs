//! Client side of QuickTune: catalog client, persistent track store and
//! playback control.

pub mod api;
pub mod config;
pub mod error;
pub mod playback;
pub mod storage;
pub mod store;

pub use api::{CatalogClient, HttpCatalogClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use playback::{format_time, Playback};
pub use storage::{JsonFileStorage, MemoryStorage, SharedStorage, StateStorage};
pub use store::{GenerateOutcome, GenerateTicket, TrackState, TrackStore};
