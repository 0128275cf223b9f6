//! The quiz engine: rounds, turns, scoring, hints and track selection.

pub mod catalog;
pub mod error;
pub mod hint;
pub mod normalize;
pub mod rng;
pub mod round;
pub mod scoring;
pub mod session;
pub mod sink;

pub use error::GameError;
pub use session::{RoundAdvance, Session, SessionState, SessionStats};
pub use sink::{GameMode, ScoreEntry, ScoreSink};
