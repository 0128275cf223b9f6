//! Round and turn controller of a single game.
//!
//! A [`Session`] goes `NotStarted -> InProgress -> Finished`. All mutation
//! goes through [`Session::start_game`], [`Session::next_round`],
//! [`Session::submit_answer`] and [`Session::request_hint`]; everything else
//! is a read-only view.

use std::{collections::HashSet, fmt::Debug};

use log::{debug, error, info, warn};

use crate::{
    config::GameSettings,
    domain::{hash::TrackId, player::Player, track::Track},
    game::{
        catalog::{TrackCatalog, fallback_tracks},
        error::GameError,
        normalize::{StandardNormalizer, TextNormalizer},
        rng::GameRng,
        round::{HintTarget, Round},
        scoring::{AnswerOutcome, points_for},
        sink::{GameMode, ScoreEntry, ScoreSink},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Finished,
}

/// Session-wide counters, shared by every player's final record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub tracks_played: u32,
    pub correct_titles: u32,
    pub correct_artists: u32,
    pub hints_used: u32,
}

/// What a round advance led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundAdvance {
    Started {
        round_index: usize,
        player_index: usize,
    },
    Finished,
}

pub struct Session {
    settings: GameSettings,
    mode: GameMode,
    genre: String,
    players: Vec<Player>,
    rounds: Vec<Round>,
    /// tracks obtained from the catalog for this game
    playlist: Vec<Track>,
    played: HashSet<TrackId>,
    state: SessionState,
    /// `None` before the first round, `Some(rounds.len())` once finished
    current_round: Option<usize>,
    current_player: usize,
    stats: SessionStats,
    rng: GameRng,
    normalizer: Box<dyn TextNormalizer>,
    sink: Box<dyn ScoreSink>,
}

impl Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("genre", &self.genre)
            .field("state", &self.state)
            .field("current_round", &self.current_round)
            .field("players", &self.players)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Sets up a game and fetches its playlist. An empty `genre` means the
    /// default genre from the settings.
    pub fn new(
        names: Vec<String>,
        mode: GameMode,
        genre: &str,
        settings: GameSettings,
        catalog: &dyn TrackCatalog,
        sink: Box<dyn ScoreSink>,
    ) -> Result<Self, GameError> {
        if names.is_empty() {
            return Err(GameError::EmptyRoster);
        }
        if mode == GameMode::Duel && names.len() < 2 {
            return Err(GameError::DuelNeedsTwoPlayers(names.len()));
        }

        let genre = if genre.trim().is_empty() {
            settings.default_genre.clone()
        } else {
            genre.trim().to_string()
        };

        let total_rounds = match mode {
            GameMode::Solo => settings.rounds as usize,
            GameMode::Duel => settings.rounds as usize * 2,
        };

        let mut rng = GameRng::new(settings.seed);
        let mut playlist = catalog.generate(&genre, total_rounds, &mut rng);
        if playlist.is_empty() {
            warn!("catalog returned no tracks for '{genre}', using fallback list");
            playlist = fallback_tracks();
        }

        Ok(Self {
            settings,
            mode,
            genre,
            players: names.into_iter().map(Player::new).collect(),
            rounds: vec![Round::default(); total_rounds],
            playlist,
            played: HashSet::new(),
            state: SessionState::NotStarted,
            current_round: None,
            current_player: 0,
            stats: SessionStats::default(),
            rng,
            normalizer: Box::new(StandardNormalizer),
            sink,
        })
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn TextNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Starts the game and opens round 0. Calling it on a running game does nothing.
    pub fn start_game(&mut self) {
        match self.state {
            SessionState::InProgress => return,
            SessionState::Finished => {
                warn!("start requested on a finished game, ignoring");
                return;
            }
            SessionState::NotStarted => {}
        }

        self.current_round = None;
        self.current_player = 0;
        self.played.clear();
        self.stats = SessionStats::default();
        self.state = SessionState::InProgress;

        info!(
            "{} game started: {} players, {} rounds, genre '{}'",
            self.mode,
            self.players.len(),
            self.rounds.len(),
            self.genre
        );
        self.advance();
    }

    /// Moves to the next round, or ends the game once every round was played.
    pub fn next_round(&mut self) -> Result<RoundAdvance, GameError> {
        match self.state {
            SessionState::NotStarted => Err(GameError::NotStarted),
            SessionState::Finished => Err(GameError::Finished),
            SessionState::InProgress => Ok(self.advance()),
        }
    }

    fn advance(&mut self) -> RoundAdvance {
        let index = self.current_round.map_or(0, |i| i + 1);

        if index >= self.rounds.len() {
            self.finish();
            return RoundAdvance::Finished;
        }

        let Some(track) = self.select_random_track() else {
            info!("no track left for round {index}, ending the game early");
            self.finish();
            return RoundAdvance::Finished;
        };

        debug!(
            "round {index}: track {} ({} - {})",
            track.id().short(),
            track.artist(),
            track.title()
        );
        self.played.insert(track.id());
        self.stats.tracks_played += 1;
        self.rounds[index].assign(track);
        self.current_round = Some(index);

        if self.mode == GameMode::Duel {
            self.current_player = index % self.players.len();
        }

        RoundAdvance::Started {
            round_index: index,
            player_index: self.current_player,
        }
    }

    /// Picks an unplayed track from the playlist.
    ///
    /// When every track was played and the playlist is shorter than the game,
    /// the history is forgotten and tracks start repeating.
    fn select_random_track(&mut self) -> Option<Track> {
        let candidates = self
            .playlist
            .iter()
            .filter(|t| !self.played.contains(&t.id()))
            .collect::<Vec<_>>();

        if !candidates.is_empty() {
            let pick = self.rng.pick_index(candidates.len());
            return Some(candidates[pick].clone());
        }

        if self.playlist.is_empty() || self.playlist.len() >= self.rounds.len() {
            return None;
        }

        warn!(
            "all {} tracks played, allowing repeats for the remaining rounds",
            self.playlist.len()
        );
        self.played.clear();
        let pick = self.rng.pick_index(self.playlist.len());
        Some(self.playlist[pick].clone())
    }

    fn finish(&mut self) {
        self.state = SessionState::Finished;
        self.current_round = Some(self.rounds.len());

        let entries = self
            .players
            .iter()
            .map(|player| ScoreEntry {
                player: player.name().to_string(),
                points: player.score(),
                mode: self.mode,
                genre: self.genre.clone(),
                tracks_played: self.stats.tracks_played,
                correct_titles: self.stats.correct_titles,
                correct_artists: self.stats.correct_artists,
                hints_used: self.stats.hints_used,
            })
            .collect::<Vec<_>>();

        for entry in &entries {
            if let Err(err) = self.sink.record(entry) {
                error!("failed to record score of {}: {err:#}", entry.player);
            }
        }

        info!(
            "game finished after {} tracks: {}",
            self.stats.tracks_played,
            entries
                .iter()
                .map(|e| format!("{}={}", e.player, e.points))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    /// Scores an answer for the current round and closes it.
    ///
    /// Answers outside a running game, out of turn, or for an already answered
    /// round have no effect.
    pub fn submit_answer(
        &mut self,
        title_guess: &str,
        artist_guess: &str,
        elapsed_secs: f64,
        player_index: usize,
    ) -> AnswerOutcome {
        if self.state != SessionState::InProgress {
            return AnswerOutcome::NO_EFFECT;
        }
        if self.mode == GameMode::Duel && player_index != self.current_player {
            warn!(
                "player {player_index} answered during player {}'s turn, ignoring",
                self.current_player
            );
            return AnswerOutcome::NO_EFFECT;
        }
        if player_index >= self.players.len() {
            return AnswerOutcome::NO_EFFECT;
        }

        let Some(round) = self.current_round.and_then(|i| self.rounds.get_mut(i)) else {
            return AnswerOutcome::NO_EFFECT;
        };
        let Some(track) = round.track() else {
            return AnswerOutcome::NO_EFFECT;
        };
        if round.is_answered() {
            return AnswerOutcome::NO_EFFECT;
        }

        let normalizer = &self.normalizer;
        // blank input is a timeout, not a guess
        let matches = |guess: &str, answer: &str| {
            !guess.trim().is_empty() && normalizer.normalize(guess) == normalizer.normalize(answer)
        };
        let title_correct = matches(title_guess, track.title());
        let artist_correct = matches(artist_guess, track.artist());
        round.close();

        if title_correct {
            self.stats.correct_titles += 1;
        }
        if artist_correct {
            self.stats.correct_artists += 1;
        }

        let points = points_for(title_correct, artist_correct, elapsed_secs, &self.settings);
        let player = &mut self.players[player_index];
        player.add_points(points);

        debug!(
            "{} answered in {elapsed_secs:.1}s: title {title_correct}, artist {artist_correct}, +{points} (total {})",
            player.name(),
            player.score()
        );

        AnswerOutcome {
            title_correct,
            artist_correct,
            points_awarded: points,
            round_over: true,
        }
    }

    /// Uncovers one more letter of the title or the artist and returns the
    /// updated mask, or `None` when hints are off or nothing is left hidden.
    pub fn request_hint(&mut self) -> Option<String> {
        if !self.settings.hints_enabled || self.state != SessionState::InProgress {
            return None;
        }

        let round = self.rounds.get_mut(self.current_round?)?;
        round.track()?;

        let target = match (
            round.hint(HintTarget::Title).is_hidden(),
            round.hint(HintTarget::Artist).is_hidden(),
        ) {
            (true, true) => {
                if self.rng.coin_flip() {
                    HintTarget::Title
                } else {
                    HintTarget::Artist
                }
            }
            (true, false) => HintTarget::Title,
            (false, true) => HintTarget::Artist,
            (false, false) => return None,
        };

        let hint = round.hint_mut(target);
        let position = hint.reveal_next()?;
        self.stats.hints_used += 1;

        debug!("hint: revealed {target:?} position {position}");
        Some(hint.render())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn current_round_index(&self) -> Option<usize> {
        self.current_round
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.current_round.and_then(|i| self.rounds.get(i))
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Whose turn it is. Always 0 in solo mode.
    pub fn current_player_index(&self) -> usize {
        self.current_player
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }
}
