/// A participant of a game session.
///
/// Names are not required to be unique. The score can only grow, and only
/// through the session's scoring step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    name: String,
    score: u32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn add_points(&mut self, points: u32) {
        self.score += points;
    }
}
