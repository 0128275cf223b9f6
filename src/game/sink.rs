use std::{cell::RefCell, fmt::Display, rc::Rc, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Solo,
    Duel,
}

impl GameMode {
    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Solo => "Solo",
            GameMode::Duel => "Duel",
        }
    }
}

impl Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "solo" => Ok(GameMode::Solo),
            "duel" => Ok(GameMode::Duel),
            other => Err(format!("unknown game mode '{other}'")),
        }
    }
}

/// Final result of one player, written once per player at game end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player: String,
    pub points: u32,
    pub mode: GameMode,
    pub genre: String,
    pub tracks_played: u32,
    pub correct_titles: u32,
    pub correct_artists: u32,
    pub hints_used: u32,
}

/// Durable destination of finished games.
///
/// Errors are reported back so the session can log them; they never undo
/// the end of a game.
pub trait ScoreSink {
    fn record(&mut self, entry: &ScoreEntry) -> anyhow::Result<()>;
}

impl ScoreSink for Vec<ScoreEntry> {
    fn record(&mut self, entry: &ScoreEntry) -> anyhow::Result<()> {
        self.push(entry.clone());
        Ok(())
    }
}

impl<S: ScoreSink> ScoreSink for Rc<RefCell<S>> {
    fn record(&mut self, entry: &ScoreEntry) -> anyhow::Result<()> {
        self.borrow_mut().record(entry)
    }
}
