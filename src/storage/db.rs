use std::{
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Local};
use rusqlite::Connection;

use crate::{
    config::Database,
    storage::{error::StorageError, schema},
};

pub type SecondsSinceUnix = i64;

fn open_in_memory() -> Result<rusqlite::Connection, rusqlite::Error> {
    Connection::open_in_memory()
}

fn open_from_file(path: &Path) -> Result<rusqlite::Connection, rusqlite::Error> {
    Connection::open(path)
}

pub fn open(config: &Database) -> Result<rusqlite::Connection, StorageError> {
    let db = if config.in_memory {
        open_in_memory()?
    } else {
        let path = config
            .path
            .as_deref()
            .ok_or_else(|| StorageError::Internal(anyhow!("database path is not configured")))?;
        open_from_file(path)?
    };
    schema::init(&db)?;
    Ok(db)
}

/// converts time to number of seconds since unix_epoch
pub fn system_time_to_i64(time: SystemTime) -> anyhow::Result<SecondsSinceUnix> {
    i64::try_from(
        time.duration_since(UNIX_EPOCH)
            .with_context(|| "failed to get unix timestamp")?
            .as_secs(),
    )
    .with_context(|| "failed to get timestamp in seconds")
}

/// converts number of seconds since unix epoch local time to local date time
pub fn i64_seconds_to_local_time(since_unix: i64) -> anyhow::Result<DateTime<Local>> {
    let datetime = DateTime::from_timestamp_secs(since_unix).ok_or(anyhow!(
        "failed to convert {since_unix} s timestamp to datetime"
    ))?;

    Ok(DateTime::from(datetime))
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::SystemTime};

    use tempfile::tempdir;

    use crate::{
        config::Database,
        storage::{db::*, schema},
    };

    fn table_names(db: &rusqlite::Connection) -> Vec<String> {
        let mut stmt = db
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();

        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn open_in_memory_db_initializes_schema() {
        let db = open(&Database {
            in_memory: true,
            path: None,
        })
        .unwrap();

        let tables = table_names(&db);
        for table in schema::tables::ALL_TABLES {
            assert!(tables.contains(&table.to_string()));
        }
    }

    #[test]
    fn open_on_disk_db_persists_schema() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path: PathBuf = dir.path().join("scores.db");
        let config = Database {
            in_memory: false,
            path: Some(path.clone()),
        };

        drop(open(&config)?);
        assert!(path.exists());

        let reopened = open(&config)?;
        assert!(table_names(&reopened).contains(&schema::tables::SCORES.to_string()));

        Ok(())
    }

    #[test]
    fn open_without_path_fails() {
        let result = open(&Database {
            in_memory: false,
            path: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn timestamps_round_trip_through_local_time() -> anyhow::Result<()> {
        let secs = system_time_to_i64(SystemTime::now())?;
        let local = i64_seconds_to_local_time(secs)?;
        assert_eq!(local.timestamp(), secs);
        Ok(())
    }
}
