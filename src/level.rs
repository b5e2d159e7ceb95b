use crate::error::DrillError;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 9;

/// Characters each level adds on top of the previous one, starting from
/// the home-row index keys. Levels never remove characters.
const LEVEL_STEPS: [&[char]; MAX_LEVEL as usize] = [
    &['j', 'f'],
    &['k', 'd'],
    &['l', 's'],
    &[';', 'a'],
    &['g', 'h'],
    &['b', 'n'],
    &['v', 'c'],
    &['x', 'z'],
    &['m', ',', '.'],
];

/// Immutable level-to-charset mapping, built once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelMap {
    charsets: Vec<Vec<char>>,
}

impl LevelMap {
    pub fn standard() -> Self {
        let mut charsets = Vec::with_capacity(LEVEL_STEPS.len());
        let mut acc: Vec<char> = Vec::new();
        for step in LEVEL_STEPS {
            acc.extend_from_slice(step);
            charsets.push(acc.clone());
        }
        Self { charsets }
    }

    /// The allowed characters for `level`, or None when the level is unmapped.
    pub fn charset(&self, level: u8) -> Option<&[char]> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return None;
        }
        self.charsets.get(level as usize - 1).map(Vec::as_slice)
    }

    /// Parse the user's level answer. Whitespace is trimmed; anything
    /// non-numeric or outside the map is an `InvalidLevelSelection`.
    pub fn parse_selection(&self, input: &str) -> Result<u8, DrillError> {
        let trimmed = input.trim();
        let level = trimmed
            .parse::<u8>()
            .map_err(|_| DrillError::InvalidLevelSelection(trimmed.to_string()))?;
        if self.charset(level).is_none() {
            return Err(DrillError::InvalidLevelSelection(trimmed.to_string()));
        }
        Ok(level)
    }
}

impl Default for LevelMap {
    fn default() -> Self {
        Self::standard()
    }
}
