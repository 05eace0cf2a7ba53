//! Groups, the fixed group configuration, and validated standings.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

/// Marker for an unfilled standing slot (what the selection widgets send before a choice is made).
pub const EMPTY_CHOICE: &str = "-";

/// Teams per group.
pub const TEAMS_PER_GROUP: usize = 4;

/// One of the 12 group letters.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum GroupId {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
}

impl GroupId {
    /// All groups in letter order.
    pub const ALL: [GroupId; 12] = [
        GroupId::A,
        GroupId::B,
        GroupId::C,
        GroupId::D,
        GroupId::E,
        GroupId::F,
        GroupId::G,
        GroupId::H,
        GroupId::I,
        GroupId::J,
        GroupId::K,
        GroupId::L,
    ];

    pub fn as_char(self) -> char {
        (b'A' + self as u8) as char
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.as_char() == c)
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl std::str::FromStr for GroupId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c.to_ascii_uppercase())
                .ok_or_else(|| ConfigError::UnknownGroup(s.to_string())),
            _ => Err(ConfigError::UnknownGroup(s.to_string())),
        }
    }
}

/// Errors while loading a group configuration.
#[derive(Debug)]
pub enum ConfigError {
    Csv(csv::Error),
    Io(std::io::Error),
    /// A row names a group letter outside A..L.
    UnknownGroup(String),
    /// A group has the wrong number of teams.
    WrongTeamCount { group: GroupId, count: usize },
    /// Some groups are missing from the file.
    MissingGroups(Vec<GroupId>),
    /// The same team appears twice.
    DuplicateTeam(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Csv(e) => write!(f, "CSV error: {}", e),
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::UnknownGroup(g) => write!(f, "Unknown group '{}' (expected A to L)", g),
            ConfigError::WrongTeamCount { group, count } => {
                write!(f, "Group {} must have exactly 4 teams (found {})", group, count)
            }
            ConfigError::MissingGroups(groups) => {
                let names: Vec<String> = groups.iter().map(|g| g.to_string()).collect();
                write!(f, "Missing groups: {}", names.join(", "))
            }
            ConfigError::DuplicateTeam(team) => write!(f, "Team '{}' appears more than once", team),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<csv::Error> for ConfigError {
    fn from(e: csv::Error) -> Self {
        ConfigError::Csv(e)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

#[derive(Deserialize)]
struct GroupRow {
    group: String,
    team: String,
}

/// Fixed mapping of the 12 groups to their 4 teams (setup order, not a ranking).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupConfiguration {
    groups: BTreeMap<GroupId, [String; TEAMS_PER_GROUP]>,
}

impl Default for GroupConfiguration {
    fn default() -> Self {
        Self::world_cup_2026()
    }
}

impl GroupConfiguration {
    /// The 2026 World Cup draw (playoff winners still shown by their playoff path).
    pub fn world_cup_2026() -> Self {
        let table: [(GroupId, [&str; TEAMS_PER_GROUP]); 12] = [
            (GroupId::A, ["Mexico", "South Africa", "South Korea", "UEFA D (DEN/MKD/CZE/IRL)"]),
            (GroupId::B, ["Canada", "UEFA A (ITA/NIR/WAL/BIH)", "Qatar", "Switzerland"]),
            (GroupId::C, ["Brazil", "Morocco", "Haiti", "Scotland"]),
            (GroupId::D, ["USA", "Paraguay", "Australia", "UEFA C (SVK/KOS/TUR/ROU)"]),
            (GroupId::E, ["Germany", "Curaçao", "Ivory Coast", "Ecuador"]),
            (GroupId::F, ["Netherlands", "Japan", "UEFA B (UKR/SWE/POL/ALB)", "Tunisia"]),
            (GroupId::G, ["Belgium", "Egypt", "Iran", "New Zealand"]),
            (GroupId::H, ["Spain", "Cabo Verde", "Saudi Arabia", "Uruguay"]),
            (GroupId::I, ["France", "Senegal", "IC2 (BOL/SUR/IRQ)", "Norway"]),
            (GroupId::J, ["Argentina", "Algeria", "Austria", "Jordan"]),
            (GroupId::K, ["Portugal", "IC1 (NCL/JAM/COD)", "Uzbekistan", "Colombia"]),
            (GroupId::L, ["England", "Croatia", "Ghana", "Panama"]),
        ];
        let groups = table
            .into_iter()
            .map(|(g, teams)| (g, teams.map(String::from)))
            .collect();
        Self { groups }
    }

    /// Load from CSV with a `group,team` header, one row per team, teams listed in setup order.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut by_group: BTreeMap<GroupId, Vec<String>> = BTreeMap::new();
        let mut seen: HashSet<String> = HashSet::new();
        for row in rdr.deserialize() {
            let row: GroupRow = row?;
            let group: GroupId = row.group.parse()?;
            let team = row.team.trim().to_string();
            if !seen.insert(team.clone()) {
                return Err(ConfigError::DuplicateTeam(team));
            }
            by_group.entry(group).or_default().push(team);
        }

        let missing: Vec<GroupId> = GroupId::ALL
            .iter()
            .copied()
            .filter(|g| !by_group.contains_key(g))
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingGroups(missing));
        }

        let mut groups = BTreeMap::new();
        for (group, teams) in by_group {
            let count = teams.len();
            let teams: [String; TEAMS_PER_GROUP] = teams
                .try_into()
                .map_err(|_| ConfigError::WrongTeamCount { group, count })?;
            groups.insert(group, teams);
        }
        Ok(Self { groups })
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Teams of a group in setup order.
    pub fn teams(&self, group: GroupId) -> &[String] {
        self.groups.get(&group).map(|t| t.as_slice()).unwrap_or(&[])
    }

    pub fn contains_team(&self, group: GroupId, team: &str) -> bool {
        self.teams(group).iter().any(|t| t == team)
    }
}

/// Raw per-group choices from the driver: 4 entries each, team names or [`EMPTY_CHOICE`].
pub type StandingsSelection = BTreeMap<GroupId, Vec<String>>;

/// Validated standings: only groups whose 4 positions are distinct teams of that group.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Standings {
    groups: BTreeMap<GroupId, [String; TEAMS_PER_GROUP]>,
}

impl Standings {
    /// Record a complete ranking for a group (1st..4th).
    pub fn insert(&mut self, group: GroupId, ranking: [String; TEAMS_PER_GROUP]) {
        self.groups.insert(group, ranking);
    }

    pub fn is_complete(&self, group: GroupId) -> bool {
        self.groups.contains_key(&group)
    }

    /// Number of groups with a complete ranking.
    pub fn complete_count(&self) -> usize {
        self.groups.len()
    }

    /// Team at a 1-based position, if the group is complete.
    pub fn team_at(&self, group: GroupId, position: u8) -> Option<&str> {
        let idx = usize::from(position).checked_sub(1)?;
        self.groups.get(&group)?.get(idx).map(String::as_str)
    }

    /// Complete rankings in group order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &[String; TEAMS_PER_GROUP])> {
        self.groups.iter().map(|(g, r)| (*g, r))
    }
}

/// A group's third-placed team.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ThirdPlaceCandidate {
    pub group: GroupId,
    pub team: String,
}

impl ThirdPlaceCandidate {
    pub fn new(group: GroupId, team: impl Into<String>) -> Self {
        Self {
            group,
            team: team.into(),
        }
    }
}
