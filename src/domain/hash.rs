use std::fmt::Display;

use blake3::Hash;

/// Value identity of a track.
///
/// Two tracks with the same title, artist and duration share an id,
/// which is what the session uses to remember what was already played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub Hash);

impl TrackId {
    pub fn from_fields(title: &str, artist: &str, duration_secs: u32) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(title.as_bytes());
        hasher.update(&[0]);
        hasher.update(artist.as_bytes());
        hasher.update(&[0]);
        hasher.update(&duration_secs.to_le_bytes());
        Self(hasher.finalize())
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }

    /// first 8 hex digits, enough for log lines
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }
}

impl Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::TrackId;

    #[test]
    fn test_same_fields_same_id() {
        let a = TrackId::from_fields("Hey Jude", "The Beatles", 431);
        let b = TrackId::from_fields("Hey Jude", "The Beatles", 431);
        assert_eq!(a, b);
    }

    #[test]
    fn test_field_boundaries_are_not_ambiguous() {
        let a = TrackId::from_fields("ab", "c", 1);
        let b = TrackId::from_fields("a", "bc", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_short_is_prefix_of_hex() {
        let id = TrackId::from_fields("Creep", "Radiohead", 238);
        assert!(id.to_hex().starts_with(&id.short()));
        assert_eq!(id.short().len(), 8);
    }
}
