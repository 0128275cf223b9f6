use crate::{domain::track::Track, game::hint::Hint};

/// Which part of the answer a hint uncovers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintTarget {
    Title,
    Artist,
}

/// One scheduled turn of a game
#[derive(Debug, Clone, Default)]
pub struct Round {
    track: Option<Track>,
    title_hint: Hint,
    artist_hint: Hint,
    answered: bool,
}

impl Round {
    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn title_hint(&self) -> String {
        self.title_hint.render()
    }

    pub fn artist_hint(&self) -> String {
        self.artist_hint.render()
    }

    /// An answer was already submitted for this round
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn hint(&self, target: HintTarget) -> &Hint {
        match target {
            HintTarget::Title => &self.title_hint,
            HintTarget::Artist => &self.artist_hint,
        }
    }

    /// Assigns the track and builds fresh masks. A round's track is never replaced.
    pub(crate) fn assign(&mut self, track: Track) -> bool {
        if self.track.is_some() {
            return false;
        }
        self.title_hint = Hint::masked(track.title());
        self.artist_hint = Hint::masked(track.artist());
        self.track = Some(track);
        true
    }

    pub(crate) fn close(&mut self) {
        self.answered = true;
    }

    pub(crate) fn hint_mut(&mut self, target: HintTarget) -> &mut Hint {
        match target {
            HintTarget::Title => &mut self.title_hint,
            HintTarget::Artist => &mut self.artist_hint,
        }
    }
}
