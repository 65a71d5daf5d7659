//! QuickTune - mood and genre based music browsing.
//!
//! The catalog service answers mood, genre and track queries over a fixed
//! in-memory catalog. The client store keeps the user's selection, picks
//! tracks from catalog results and persists liked and recent tracks.

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
