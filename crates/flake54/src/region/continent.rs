use core::{fmt, str::FromStr};

use crate::error::ConfigError;

/// Continents, in the order of their 3-bit machine ID code.
///
/// The code occupies the upper three bits of every [`MachineId`], so the
/// discriminants are part of the ID layout and must not be reordered.
///
/// [`MachineId`]: crate::MachineId
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Continent {
    Asia = 0,
    Africa = 1,
    NorthAmerica = 2,
    SouthAmerica = 3,
    Antarctica = 4,
    Europe = 5,
    Oceania = 6,
}

/// Region codes (Fly.io naming) grouped by continent, indexed by continent
/// code.
const REGIONS: [&[&str]; 7] = [
    &["bom", "hkg", "nrt", "sin"],
    &["jnb"],
    &[
        "atl", "bos", "den", "dfw", "ewr", "iad", "lax", "mia", "ord", "phx", "sea", "sjc", "yul",
        "yyz",
    ],
    &["bog", "eze", "gdl", "gig", "gru", "qro", "scl"],
    &[],
    &["ams", "arn", "cdg", "fra", "lhr", "mad", "otp", "waw"],
    &["syd"],
];

impl Continent {
    /// Every continent, ordered by code.
    pub const ALL: [Self; 7] = [
        Self::Asia,
        Self::Africa,
        Self::NorthAmerica,
        Self::SouthAmerica,
        Self::Antarctica,
        Self::Europe,
        Self::Oceania,
    ];

    /// The 3-bit code stored in the machine ID.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a continent by its 3-bit code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Asia),
            1 => Some(Self::Africa),
            2 => Some(Self::NorthAmerica),
            3 => Some(Self::SouthAmerica),
            4 => Some(Self::Antarctica),
            5 => Some(Self::Europe),
            6 => Some(Self::Oceania),
            _ => None,
        }
    }

    /// Resolves a region code such as `"fra"` to the continent hosting it.
    ///
    /// Matching is exact and case-sensitive.
    ///
    /// ```
    /// use flake54::Continent;
    ///
    /// assert_eq!(Continent::from_region("fra"), Some(Continent::Europe));
    /// assert_eq!(Continent::from_region("FRA"), None);
    /// ```
    pub fn from_region(region: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|continent| continent.regions().contains(&region))
    }

    /// Region codes belonging to this continent.
    pub const fn regions(self) -> &'static [&'static str] {
        REGIONS[self as usize]
    }

    /// Lower snake case name, as used by [`fmt::Display`] and [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Asia => "asia",
            Self::Africa => "africa",
            Self::NorthAmerica => "north_america",
            Self::SouthAmerica => "south_america",
            Self::Antarctica => "antarctica",
            Self::Europe => "europe",
            Self::Oceania => "oceania",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Continent {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|continent| continent.name() == s)
            .ok_or_else(|| ConfigError::UnknownRegion(s.to_owned()))
    }
}

impl TryFrom<u8> for Continent {
    type Error = ConfigError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(ConfigError::ContinentOutOfRange(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_regions_to_their_continent() {
        assert_eq!(Continent::from_region("bom"), Some(Continent::Asia));
        assert_eq!(Continent::from_region("jnb"), Some(Continent::Africa));
        assert_eq!(Continent::from_region("lax"), Some(Continent::NorthAmerica));
        assert_eq!(Continent::from_region("gru"), Some(Continent::SouthAmerica));
        assert_eq!(Continent::from_region("arn"), Some(Continent::Europe));
        assert_eq!(Continent::from_region("syd"), Some(Continent::Oceania));
    }

    #[test]
    fn unknown_regions_do_not_resolve() {
        for region in ["", "unk", "Fra", "fra ", "europe"] {
            assert_eq!(Continent::from_region(region), None, "{region:?}");
        }
    }

    #[test]
    fn antarctica_has_no_regions() {
        assert!(Continent::Antarctica.regions().is_empty());
    }

    #[test]
    fn every_region_belongs_to_exactly_one_continent() {
        for continent in Continent::ALL {
            for region in continent.regions() {
                let owners = Continent::ALL
                    .iter()
                    .filter(|c| c.regions().contains(region))
                    .count();
                assert_eq!(owners, 1, "{region} listed under {owners} continents");
            }
        }
    }

    #[test]
    fn codes_round_trip() {
        for continent in Continent::ALL {
            assert_eq!(Continent::from_code(continent.code()), Some(continent));
            assert_eq!(Continent::try_from(continent.code()), Ok(continent));
        }
        assert_eq!(Continent::from_code(7), None);
        assert_eq!(
            Continent::try_from(7),
            Err(ConfigError::ContinentOutOfRange(7))
        );
    }

    #[test]
    fn names_parse_back() {
        for continent in Continent::ALL {
            assert_eq!(continent.to_string().parse::<Continent>(), Ok(continent));
        }
        assert!("atlantis".parse::<Continent>().is_err());
    }
}
