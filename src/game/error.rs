use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("a game needs at least one player")]
    EmptyRoster,

    #[error("duel mode needs at least two players, got {0}")]
    DuelNeedsTwoPlayers(usize),

    #[error("game not started")]
    NotStarted,

    #[error("game already finished")]
    Finished,
}
