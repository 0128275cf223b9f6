use rusqlite::Connection;

pub mod tables {
    pub const SCORES: &str = "scores";

    #[cfg(test)]
    pub const ALL_TABLES: &[&str] = &[SCORES];
}

pub mod columns {
    pub const PLAYER: &str = "player";
    pub const POINTS: &str = "points";
    pub const MODE: &str = "mode";
    pub const GENRE: &str = "genre";
    pub const TRACKS_PLAYED: &str = "tracks_played";
    pub const CORRECT_TITLES: &str = "correct_titles";
    pub const CORRECT_ARTISTS: &str = "correct_artists";
    pub const HINTS_USED: &str = "hints_used";
    pub const PLAYED_AT: &str = "played_at";
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS scores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player TEXT NOT NULL,
    points INTEGER NOT NULL,
    mode TEXT NOT NULL,
    genre TEXT NOT NULL,
    tracks_played INTEGER NOT NULL,
    correct_titles INTEGER NOT NULL,
    correct_artists INTEGER NOT NULL,
    hints_used INTEGER NOT NULL,
    played_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS scores_by_points ON scores (points DESC, played_at ASC);
"#;

pub fn init(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA)
}
