//! Durable leaderboard of finished games.

pub mod db;
pub mod error;
pub mod leaderboard;
pub(crate) mod schema;
