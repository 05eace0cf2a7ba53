//! Seed codes such as "1A" (winner of Group A) or "3C" (third of Group C).

use crate::models::group::{GroupId, TEAMS_PER_GROUP};

/// `<position><group>`: a finishing position (1..=4) within a group.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SeedCode {
    pub position: u8,
    pub group: GroupId,
}

impl SeedCode {
    pub const fn new(position: u8, group: GroupId) -> Self {
        Self { position, group }
    }

    /// Parse a 2-character code. `None` for wrong length, a position outside 1..=4,
    /// or an unknown group.
    pub fn parse(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let (pos, group) = match (chars.next(), chars.next(), chars.next()) {
            (Some(p), Some(g), None) => (p, g),
            _ => return None,
        };
        let position = pos.to_digit(10)?;
        if position == 0 || position as usize > TEAMS_PER_GROUP {
            return None;
        }
        let group = GroupId::from_char(group)?;
        Some(Self::new(position as u8, group))
    }
}

impl std::fmt::Display for SeedCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.position, self.group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_codes() {
        assert_eq!(SeedCode::parse("2B"), Some(SeedCode::new(2, GroupId::B)));
        assert_eq!(SeedCode::parse("4L"), Some(SeedCode::new(4, GroupId::L)));
        assert_eq!(SeedCode::new(1, GroupId::E).to_string(), "1E");
    }

    #[test]
    fn rejects_malformed_codes() {
        for code in ["", "2", "2AB", "5A", "0A", "2Z", "A2", "2a"] {
            assert_eq!(SeedCode::parse(code), None, "{code}");
        }
    }
}
