/// Character shown for a hidden position
pub const PLACEHOLDER: char = '_';

/// Letter-by-letter mask over an answer.
///
/// Alphanumeric characters start hidden, everything else (spaces, punctuation)
/// is shown from the start. Hidden positions are tracked as flags, so an answer
/// containing a literal `_` cannot be mistaken for a hidden position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hint {
    answer: Vec<char>,
    hidden: Vec<bool>,
}

impl Hint {
    pub fn masked(answer: &str) -> Self {
        let answer = answer.chars().collect::<Vec<_>>();
        let hidden = answer.iter().map(|c| c.is_alphanumeric()).collect();
        Self { answer, hidden }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden_count() > 0
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.iter().filter(|h| **h).count()
    }

    /// Uncovers the first hidden position. Returns its index, or `None`
    /// when the answer is already fully shown.
    pub fn reveal_next(&mut self) -> Option<usize> {
        let pos = self.hidden.iter().position(|h| *h)?;
        self.hidden[pos] = false;
        Some(pos)
    }

    pub fn render(&self) -> String {
        self.answer
            .iter()
            .zip(&self.hidden)
            .map(|(c, hidden)| if *hidden { PLACEHOLDER } else { *c })
            .collect()
    }
}
