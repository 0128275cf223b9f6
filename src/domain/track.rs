use serde::{Deserialize, Serialize};

use super::hash::TrackId;

/// Represent a music track that can be guessed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    title: String,
    artist: String,
    duration_secs: u32,
}

impl Track {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            duration_secs,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn id(&self) -> TrackId {
        TrackId::from_fields(&self.title, &self.artist, self.duration_secs)
    }
}
