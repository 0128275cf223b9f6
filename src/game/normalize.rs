use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Canonicalizes free text so that answers can be compared for equality.
///
/// Implementations must be stable: the same input always gives the same output.
pub trait TextNormalizer {
    fn normalize(&self, text: &str) -> String;
}

/// Case, diacritic and punctuation insensitive normalizer.
///
/// "  Beyoncé - Halo! " and "beyonce halo" normalize to the same string.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardNormalizer;

impl TextNormalizer for StandardNormalizer {
    fn normalize(&self, text: &str) -> String {
        let stripped = text
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .filter(|c| c.is_alphanumeric() || *c == ' ')
            .collect::<String>();

        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
