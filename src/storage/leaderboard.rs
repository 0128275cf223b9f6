use std::time::SystemTime;

use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::{
    config,
    game::{GameMode, ScoreEntry, ScoreSink},
    storage::{
        db::{self, SecondsSinceUnix, system_time_to_i64},
        error::StorageError,
        schema::{columns::*, tables::*},
    },
};

pub const DEFAULT_LIMIT: usize = 10;

/// Which rows `Leaderboard::top` returns
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// case insensitive
    pub genre: Option<String>,
    pub mode: Option<GameMode>,
    /// `None` means [`DEFAULT_LIMIT`]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: ScoreEntry,
    pub played_at: SecondsSinceUnix,
}

/// Stores the results of finished games
pub struct Leaderboard {
    pub(crate) db: Connection,
}

impl Leaderboard {
    /// opens the configured database, creating the schema if needed
    pub fn new(db_config: &config::Database) -> Result<Self, StorageError> {
        Ok(Self::from_existing_conn(db::open(db_config)?))
    }

    pub fn from_existing_conn(db: Connection) -> Self {
        Self { db }
    }

    pub fn insert(&mut self, entry: &ScoreEntry) -> Result<(), StorageError> {
        self.insert_at(entry, SystemTime::now())
    }

    pub fn insert_at(&mut self, entry: &ScoreEntry, time: SystemTime) -> Result<(), StorageError> {
        let played_at = system_time_to_i64(time).map_err(StorageError::Internal)?;

        self.db.execute(
            &format!(
                "INSERT INTO {SCORES} ({PLAYER}, {POINTS}, {MODE}, {GENRE}, {TRACKS_PLAYED}, \
                 {CORRECT_TITLES}, {CORRECT_ARTISTS}, {HINTS_USED}, {PLAYED_AT}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ),
            params![
                entry.player,
                entry.points,
                entry.mode.label(),
                entry.genre,
                entry.tracks_played,
                entry.correct_titles,
                entry.correct_artists,
                entry.hints_used,
                played_at,
            ],
        )?;

        log::debug!("recorded {} points for {}", entry.points, entry.player);
        Ok(())
    }

    /// Best results first; ties go to the earlier game
    pub fn top(&self, filter: &Filter) -> Result<Vec<LeaderboardRow>, StorageError> {
        let limit = i64::try_from(filter.limit.unwrap_or(DEFAULT_LIMIT)).unwrap_or(i64::MAX);

        let mut stmt = self.db.prepare(&format!(
            "SELECT {PLAYER}, {POINTS}, {MODE}, {GENRE}, {TRACKS_PLAYED}, {CORRECT_TITLES}, \
             {CORRECT_ARTISTS}, {HINTS_USED}, {PLAYED_AT} FROM {SCORES} \
             WHERE (?1 IS NULL OR {GENRE} = ?1 COLLATE NOCASE) \
             AND (?2 IS NULL OR {MODE} = ?2) \
             ORDER BY {POINTS} DESC, {PLAYED_AT} ASC, id ASC \
             LIMIT ?3"
        ))?;

        let rows = stmt
            .query_map(
                params![filter.genre, filter.mode.map(|m| m.label()), limit],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        [
                            row.get::<_, u32>(4)?,
                            row.get::<_, u32>(5)?,
                            row.get::<_, u32>(6)?,
                            row.get::<_, u32>(7)?,
                        ],
                        row.get::<_, SecondsSinceUnix>(8)?,
                    ))
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .enumerate()
            .map(|(i, (player, points, mode, genre, counts, played_at))| {
                let mode = mode
                    .parse::<GameMode>()
                    .map_err(|_| StorageError::InvalidMode(mode))?;
                let [tracks_played, correct_titles, correct_artists, hints_used] = counts;
                Ok(LeaderboardRow {
                    rank: i + 1,
                    entry: ScoreEntry {
                        player,
                        points,
                        mode,
                        genre,
                        tracks_played,
                        correct_titles,
                        correct_artists,
                        hints_used,
                    },
                    played_at,
                })
            })
            .collect()
    }
}

impl ScoreSink for Leaderboard {
    fn record(&mut self, entry: &ScoreEntry) -> anyhow::Result<()> {
        Ok(self.insert(entry)?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use rusqlite::Connection;

    use super::*;
    use crate::storage::schema;

    fn setup_leaderboard() -> anyhow::Result<Leaderboard> {
        let conn = Connection::open_in_memory()?;
        schema::init(&conn)?;
        Ok(Leaderboard::from_existing_conn(conn))
    }

    fn entry(player: &str, points: u32, mode: GameMode, genre: &str) -> ScoreEntry {
        ScoreEntry {
            player: player.to_string(),
            points,
            mode,
            genre: genre.to_string(),
            tracks_played: 5,
            correct_titles: 3,
            correct_artists: 2,
            hints_used: 1,
        }
    }

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_insert_and_read_back() -> anyhow::Result<()> {
        let mut board = setup_leaderboard()?;
        let alice = entry("alice", 7, GameMode::Solo, "rock");

        board.insert_at(&alice, at(100))?;

        let rows = board.top(&Filter::default())?;
        assert_eq!(
            rows,
            vec![LeaderboardRow {
                rank: 1,
                entry: alice,
                played_at: 100,
            }]
        );

        let stored_mode: String = board.db.query_row(
            &format!("SELECT {MODE} FROM {SCORES}"),
            [],
            |row| row.get(0),
        )?;
        assert_eq!(stored_mode, "Solo");

        Ok(())
    }

    #[test]
    fn test_top_orders_by_points_then_earliest() -> anyhow::Result<()> {
        let mut board = setup_leaderboard()?;
        board.insert_at(&entry("late", 5, GameMode::Solo, "pop"), at(300))?;
        board.insert_at(&entry("best", 9, GameMode::Solo, "pop"), at(200))?;
        board.insert_at(&entry("early", 5, GameMode::Solo, "pop"), at(100))?;

        let rows = board.top(&Filter::default())?;
        let names = rows.iter().map(|r| r.entry.player.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["best", "early", "late"]);
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);

        Ok(())
    }

    #[test]
    fn test_top_filters_by_genre_and_mode() -> anyhow::Result<()> {
        let mut board = setup_leaderboard()?;
        board.insert_at(&entry("a", 1, GameMode::Solo, "rock"), at(1))?;
        board.insert_at(&entry("b", 2, GameMode::Duel, "rock"), at(2))?;
        board.insert_at(&entry("c", 3, GameMode::Duel, "pop"), at(3))?;

        let rock = board.top(&Filter {
            genre: Some("ROCK".to_string()),
            ..Default::default()
        })?;
        assert_eq!(rock.len(), 2);

        let duel_rock = board.top(&Filter {
            genre: Some("rock".to_string()),
            mode: Some(GameMode::Duel),
            limit: None,
        })?;
        assert_eq!(duel_rock.len(), 1);
        assert_eq!(duel_rock[0].entry.player, "b");

        let duel = board.top(&Filter {
            mode: Some(GameMode::Duel),
            ..Default::default()
        })?;
        assert_eq!(duel.len(), 2);

        Ok(())
    }

    #[test]
    fn test_top_respects_limit() -> anyhow::Result<()> {
        let mut board = setup_leaderboard()?;
        for i in 0..15 {
            board.insert_at(&entry(&format!("p{i}"), i, GameMode::Solo, "pop"), at(i as u64))?;
        }

        assert_eq!(board.top(&Filter::default())?.len(), DEFAULT_LIMIT);
        let top3 = board.top(&Filter {
            limit: Some(3),
            ..Default::default()
        })?;
        assert_eq!(top3.len(), 3);
        assert_eq!(top3[0].entry.points, 14);

        Ok(())
    }

    #[test]
    fn test_corrupt_mode_is_reported() -> anyhow::Result<()> {
        let board = setup_leaderboard()?;
        board.db.execute(
            &format!(
                "INSERT INTO {SCORES} ({PLAYER}, {POINTS}, {MODE}, {GENRE}, {TRACKS_PLAYED}, \
                 {CORRECT_TITLES}, {CORRECT_ARTISTS}, {HINTS_USED}, {PLAYED_AT}) \
                 VALUES ('x', 1, 'Team', 'pop', 1, 0, 0, 0, 0)"
            ),
            [],
        )?;

        let result = board.top(&Filter::default());
        assert!(matches!(result, Err(StorageError::InvalidMode(m)) if m == "Team"));

        Ok(())
    }

    #[test]
    fn test_leaderboard_as_score_sink() -> anyhow::Result<()> {
        let mut board = setup_leaderboard()?;
        let sink: &mut dyn ScoreSink = &mut board;
        sink.record(&entry("alice", 4, GameMode::Duel, "electro"))?;

        let rows = board.top(&Filter::default())?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entry.mode, GameMode::Duel);

        Ok(())
    }
}
