use std::fmt;
use std::str::FromStr;

use phf::phf_map;

/// The fixed set of matchup query shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchupMode {
    /// Starting pitcher against one team
    SpVsTeam,
    /// Two starting pitcher/team matchups side by side
    SpVs2,
    /// Reliever against three consecutive batters
    RpInning,
    /// One hitter against one pitcher
    HitterVsPitcher,
    /// Up to five hitter/pitcher rows
    MultiHitter,
}

static MODE_IDS: phf::Map<&'static str, MatchupMode> = phf_map! {
    "sp_vs_team" => MatchupMode::SpVsTeam,
    "sp_vs_2" => MatchupMode::SpVs2,
    "rp_inning" => MatchupMode::RpInning,
    "hitter_vs_pitcher" => MatchupMode::HitterVsPitcher,
    "multi_hitter" => MatchupMode::MultiHitter,
};

/// Number of rows offered by multi_hitter
pub const MULTI_HITTER_ROWS: usize = 5;

/// Which option list feeds a key position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Pitcher,
    Hitter,
    Team,
    Side,
}

/// Home/away marker used as an index key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Away,
    Home,
}

impl Side {
    pub fn all() -> [Self; 2] {
        [Self::Away, Self::Home]
    }

    /// The literal stored in the fragment index
    pub fn key(&self) -> &'static str {
        match self {
            Self::Away => "@",
            Self::Home => "vs.",
        }
    }
}

/// One key position in a row: what it holds and how the form labels it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySlot {
    pub kind: KeyKind,
    pub label: &'static str,
}

const fn slot(kind: KeyKind, label: &'static str) -> KeySlot {
    KeySlot { kind, label }
}

const PITCHER_SIDE_TEAM: [KeySlot; 3] = [
    slot(KeyKind::Pitcher, "Pitcher"),
    slot(KeyKind::Side, "Side"),
    slot(KeyKind::Team, "Team"),
];

const HITTER_SIDE_PITCHER: [KeySlot; 3] = [
    slot(KeyKind::Hitter, "Hitter"),
    slot(KeyKind::Side, "Side"),
    slot(KeyKind::Pitcher, "Pitcher"),
];

const RELIEVER_BATTERS: [KeySlot; 4] = [
    slot(KeyKind::Pitcher, "Reliever"),
    slot(KeyKind::Hitter, "Batter 1"),
    slot(KeyKind::Hitter, "Batter 2"),
    slot(KeyKind::Hitter, "Batter 3"),
];

impl MatchupMode {
    pub fn all() -> [Self; 5] {
        [
            Self::SpVsTeam,
            Self::SpVs2,
            Self::HitterVsPitcher,
            Self::MultiHitter,
            Self::RpInning,
        ]
    }

    /// Identifier used as the `modes` key in the fragment index
    pub fn id(&self) -> &'static str {
        match self {
            Self::SpVsTeam => "sp_vs_team",
            Self::SpVs2 => "sp_vs_2",
            Self::RpInning => "rp_inning",
            Self::HitterVsPitcher => "hitter_vs_pitcher",
            Self::MultiHitter => "multi_hitter",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::SpVsTeam => "SP vs Team",
            Self::SpVs2 => "SP vs Team (x2)",
            Self::RpInning => "RP Inning",
            Self::HitterVsPitcher => "Hitter vs Pitcher",
            Self::MultiHitter => "Multi Hitter",
        }
    }

    /// Key layout of a single resolve call
    pub fn row_layout(&self) -> &'static [KeySlot] {
        match self {
            Self::SpVsTeam | Self::SpVs2 => &PITCHER_SIDE_TEAM,
            Self::HitterVsPitcher | Self::MultiHitter => &HITTER_SIDE_PITCHER,
            Self::RpInning => &RELIEVER_BATTERS,
        }
    }

    /// Number of independent resolve calls the form offers
    pub fn row_count(&self) -> usize {
        match self {
            Self::SpVs2 => 2,
            Self::MultiHitter => MULTI_HITTER_ROWS,
            _ => 1,
        }
    }

    /// Whether every row must be filled before the selection counts as complete
    pub fn requires_all_rows(&self) -> bool {
        !matches!(self, Self::MultiHitter)
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        let i = all.iter().position(|m| m == self).unwrap_or(0);
        all[(i + 1) % all.len()]
    }

    pub fn prev(&self) -> Self {
        let all = Self::all();
        let i = all.iter().position(|m| m == self).unwrap_or(0);
        all[(i + all.len() - 1) % all.len()]
    }
}

impl fmt::Display for MatchupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MatchupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MODE_IDS
            .get(s.trim())
            .copied()
            .ok_or_else(|| format!("Unknown matchup mode '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_ids_round_trip_through_from_str() {
        for mode in MatchupMode::all() {
            assert_eq!(mode.id().parse::<MatchupMode>(), Ok(mode));
        }
        assert!("sp_vs_3".parse::<MatchupMode>().is_err());
    }

    #[test]
    fn test_row_layouts() {
        assert_eq!(MatchupMode::SpVsTeam.row_layout().len(), 3);
        assert_eq!(MatchupMode::RpInning.row_layout().len(), 4);
        assert_eq!(MatchupMode::RpInning.row_layout()[0].kind, KeyKind::Pitcher);
        assert_eq!(MatchupMode::HitterVsPitcher.row_layout()[2].kind, KeyKind::Pitcher);
        assert_eq!(MatchupMode::MultiHitter.row_count(), 5);
        assert_eq!(MatchupMode::SpVs2.row_count(), 2);
        assert!(!MatchupMode::MultiHitter.requires_all_rows());
    }

    #[test]
    fn test_side_keys() {
        assert_eq!(Side::Away.key(), "@");
        assert_eq!(Side::Home.key(), "vs.");
    }

    #[test]
    fn test_mode_cycle() {
        let mut mode = MatchupMode::SpVsTeam;
        for _ in 0..MatchupMode::all().len() {
            mode = mode.next();
        }
        assert_eq!(mode, MatchupMode::SpVsTeam);
        assert_eq!(MatchupMode::SpVsTeam.prev(), MatchupMode::RpInning);
    }
}
