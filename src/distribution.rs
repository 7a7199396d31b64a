use std::fmt;

use serde::Serialize;

use crate::character::{Character, RoleType};
use crate::error::{Error, Result};

/// Player counts the base setup table covers.
pub const MIN_PLAYERS: u8 = 5;
pub const MAX_PLAYERS: u8 = 15;

/// Counts of the four counted character types. Fields are signed because
/// setup modifications may push a count below zero before out-of-range
/// distributions are filtered away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Distribution {
    pub townsfolk: i32,
    pub outsider: i32,
    pub minion: i32,
    pub demon: i32,
}

impl Distribution {
    pub const fn new(townsfolk: i32, outsider: i32, minion: i32, demon: i32) -> Self {
        Distribution {
            townsfolk,
            outsider,
            minion,
            demon,
        }
    }

    pub const fn total(&self) -> i32 {
        self.townsfolk + self.outsider + self.minion + self.demon
    }

    /// Standard distribution for `player_count` players before any character
    /// modifies it. Defined for 5 to 15 players.
    pub fn base_setup(player_count: u8) -> Self {
        let n = i32::from(player_count);
        let (outsider, minion) = match player_count {
            5 | 6 => (n - 5, 1),
            _ => ((n - 7).rem_euclid(3), (n - 7).div_euclid(3) + 1),
        };
        let demon = 1;
        Distribution {
            townsfolk: n - outsider - minion - demon,
            outsider,
            minion,
            demon,
        }
    }

    /// Count of `role_type`; special types always count zero.
    pub const fn get(&self, role_type: RoleType) -> i32 {
        match role_type {
            RoleType::Townsfolk => self.townsfolk,
            RoleType::Outsider => self.outsider,
            RoleType::Minion => self.minion,
            RoleType::Demon => self.demon,
            RoleType::Traveler | RoleType::Fabled => 0,
        }
    }

    /// Add `amount` to the count for `role_type`. Special types are ignored.
    pub fn add(&mut self, role_type: RoleType, amount: i32) {
        match role_type {
            RoleType::Townsfolk => self.townsfolk += amount,
            RoleType::Outsider => self.outsider += amount,
            RoleType::Minion => self.minion += amount,
            RoleType::Demon => self.demon += amount,
            RoleType::Traveler | RoleType::Fabled => {}
        }
    }

    /// Tally the counted types of `characters`.
    pub fn of_characters<'a>(characters: impl IntoIterator<Item = &'a Character>) -> Self {
        let mut distribution = Distribution::default();
        for character in characters {
            distribution.add(character.role_type, 1);
        }
        distribution
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}T/{}O/{}M/{}D",
            self.townsfolk, self.outsider, self.minion, self.demon
        )
    }
}

pub fn base_distribution(player_count: u8) -> Distribution {
    Distribution::base_setup(player_count)
}

/// `count` as a player count, if the base setup table covers it.
pub fn checked_player_count(count: usize) -> Result<u8> {
    u8::try_from(count)
        .ok()
        .filter(|n| (MIN_PLAYERS..=MAX_PLAYERS).contains(n))
        .ok_or(Error::PlayerCount(count))
}

pub fn same_distribution(a: &Distribution, b: &Distribution) -> bool {
    a.townsfolk == b.townsfolk && a.outsider == b.outsider && a.minion == b.minion && a.demon == b.demon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_setup_sums_to_player_count() {
        for n in 5..=15u8 {
            let base = base_distribution(n);
            assert_eq!(base.total(), i32::from(n), "{} players", n);
            assert_eq!(base.demon, 1);
            assert!(base.townsfolk >= 0 && base.outsider >= 0 && base.minion >= 1);
        }
    }

    #[test]
    fn test_base_setup_table() {
        assert_eq!(base_distribution(5), Distribution::new(3, 0, 1, 1));
        assert_eq!(base_distribution(6), Distribution::new(3, 1, 1, 1));
        assert_eq!(base_distribution(7), Distribution::new(5, 0, 1, 1));
        assert_eq!(base_distribution(8), Distribution::new(5, 1, 1, 1));
        assert_eq!(base_distribution(9), Distribution::new(5, 2, 1, 1));
        assert_eq!(base_distribution(10), Distribution::new(7, 0, 2, 1));
        assert_eq!(base_distribution(13), Distribution::new(9, 0, 3, 1));
        assert_eq!(base_distribution(15), Distribution::new(9, 2, 3, 1));
    }

    #[test]
    fn test_same_distribution() {
        let a = Distribution::new(5, 0, 1, 1);
        let b = Distribution::new(5, 0, 1, 1);
        let c = Distribution::new(4, 1, 1, 1);
        assert!(same_distribution(&a, &a));
        assert!(same_distribution(&a, &b) && same_distribution(&b, &a));
        assert!(!same_distribution(&a, &c));
        assert_eq!(same_distribution(&a, &c), a == c);
    }

    #[test]
    fn test_checked_player_count() {
        assert_eq!(checked_player_count(5).unwrap(), 5);
        assert_eq!(checked_player_count(15).unwrap(), 15);
        assert!(matches!(checked_player_count(2), Err(Error::PlayerCount(2))));
        assert!(matches!(checked_player_count(16), Err(Error::PlayerCount(16))));
        assert!(matches!(checked_player_count(300), Err(Error::PlayerCount(300))));
        assert_eq!(
            Error::PlayerCount(2).to_string(),
            "2 players is outside the supported range of 5 to 15"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Distribution::new(3, 2, 1, 1).to_string(), "3T/2O/1M/1D");
    }

    #[test]
    fn test_counts_ignore_special_types() {
        let mut dist = Distribution::default();
        dist.add(RoleType::Outsider, 2);
        dist.add(RoleType::Fabled, 1);
        dist.add(RoleType::Traveler, 1);
        assert_eq!(dist, Distribution::new(0, 2, 0, 0));
        assert_eq!(dist.get(RoleType::Fabled), 0);
    }
}
