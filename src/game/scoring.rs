use crate::config::GameSettings;

/// Result of one answer submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub title_correct: bool,
    pub artist_correct: bool,
    pub points_awarded: u32,
    pub round_over: bool,
}

impl AnswerOutcome {
    /// Returned for submissions that must not touch the game
    pub const NO_EFFECT: AnswerOutcome = AnswerOutcome {
        title_correct: false,
        artist_correct: false,
        points_awarded: 0,
        round_over: false,
    };
}

/// 2 points for both parts, 1 for either, plus 1 for answering within the
/// first half of the excerpt when the speed bonus is on.
pub fn points_for(
    title_correct: bool,
    artist_correct: bool,
    elapsed_secs: f64,
    settings: &GameSettings,
) -> u32 {
    let base = u32::from(title_correct) + u32::from(artist_correct);
    let half = f64::from(settings.extract_duration_secs) / 2.0;

    if settings.speed_bonus_enabled && base > 0 && elapsed_secs < half {
        base + 1
    } else {
        base
    }
}
