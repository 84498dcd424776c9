//! Difficulty levels

use serde::{Deserialize, Serialize};

/// Difficulty multiplier. The integer value scales the hole count directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy = 1,
    #[default]
    Medium = 2,
    Hard = 3,
}

impl Difficulty {
    /// All difficulties in persistence/menu order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Multiplier used by room generation
    #[inline]
    pub fn value(self) -> u32 {
        self as u32
    }

    /// Zero-based index into `ALL`
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_values() {
        assert_eq!(Difficulty::Easy.value(), 1);
        assert_eq!(Difficulty::Medium.value(), 2);
        assert_eq!(Difficulty::Hard.value(), 3);
    }

    #[test]
    fn test_index_roundtrip_and_parse() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_index(d.index()), Some(d));
        }
        assert_eq!(Difficulty::from_index(3), None);
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("med"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }
}
