use core::fmt;

use crate::{
    error::{ConfigError, Error, Result},
    region::Continent,
};

/// The 9-bit machine identifier embedded in every [`FlakeId`].
///
/// ```text
///  Bit Index:  8            6 5            0
///              +-------------+--------------+
///  Field:      | continent 3 |   index 6    |
///              +-------------+--------------+
/// ```
///
/// Operators must assign a distinct `(continent, index)` pair to every
/// running generator. Two processes sharing a machine ID can emit the same
/// [`FlakeId`] in the same millisecond.
///
/// [`FlakeId`]: crate::FlakeId
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MachineId(u16);

impl MachineId {
    /// Bits reserved for the continent code.
    pub const CONTINENT_BITS: u32 = 3;

    /// Bits reserved for the per-continent machine index.
    pub const INDEX_BITS: u32 = 6;

    /// Largest per-continent machine index.
    pub const MAX_INDEX: u8 = (1 << Self::INDEX_BITS) - 1;

    /// Bitmask of the full 9-bit field.
    pub const MASK: u16 = (1 << (Self::CONTINENT_BITS + Self::INDEX_BITS)) - 1;

    /// Builds a machine ID from a continent and an index in `0..64`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `index` is negative or larger
    /// than [`Self::MAX_INDEX`].
    pub fn new(continent: Continent, index: i64) -> Result<Self> {
        let index = u8::try_from(index)
            .ok()
            .filter(|&i| i <= Self::MAX_INDEX)
            .ok_or(ConfigError::IndexOutOfRange {
                index,
                max: Self::MAX_INDEX,
            })?;
        Ok(Self((u16::from(continent.code()) << Self::INDEX_BITS) | u16::from(index)))
    }

    /// Resolves `region` through the region table and builds the machine ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the region is unknown or the
    /// index is out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use flake54::{Continent, MachineId};
    ///
    /// let machine = MachineId::from_region("arn", 35).unwrap();
    /// assert_eq!(machine.to_raw(), 0b101_100011);
    /// assert_eq!(machine.continent(), Some(Continent::Europe));
    /// assert_eq!(machine.index(), 35);
    /// ```
    pub fn from_region(region: &str, index: i64) -> Result<Self> {
        let continent = Continent::from_region(region)
            .ok_or_else(|| ConfigError::UnknownRegion(region.to_owned()))?;
        Self::new(continent, index)
    }

    /// Wraps a raw 9-bit value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the value does not fit in 9
    /// bits or its continent code names no continent.
    pub fn try_from_raw(raw: u16) -> Result<Self> {
        if raw > Self::MASK {
            return Err(Error::InvalidConfiguration(
                ConfigError::ContinentOutOfRange((raw >> Self::INDEX_BITS) as u8),
            ));
        }
        let id = Self(raw);
        Continent::try_from(id.continent_code())?;
        Ok(id)
    }

    /// Wraps a raw value without validation, keeping only the low 9 bits.
    pub(crate) const fn from_raw_masked(raw: u16) -> Self {
        Self(raw & Self::MASK)
    }

    /// The packed 9-bit value.
    pub const fn to_raw(self) -> u16 {
        self.0
    }

    /// The 3-bit continent code.
    pub const fn continent_code(self) -> u8 {
        (self.0 >> Self::INDEX_BITS) as u8
    }

    /// The continent, or `None` for the unused code 7.
    pub const fn continent(self) -> Option<Continent> {
        Continent::from_code(self.continent_code())
    }

    /// The per-continent machine index.
    pub const fn index(self) -> u8 {
        (self.0 & Self::MAX_INDEX as u16) as u8
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.continent() {
            Some(continent) => write!(f, "{continent}/{}", self.index()),
            None => write!(f, "{}/{}", self.continent_code(), self.index()),
        }
    }
}

impl TryFrom<u16> for MachineId {
    type Error = Error;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Self::try_from_raw(raw)
    }
}

impl From<MachineId> for u16 {
    fn from(id: MachineId) -> Self {
        id.to_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_continent_above_index() {
        let fra = MachineId::from_region("fra", 35).unwrap();
        assert_eq!(fra.to_raw(), (5 << 6) | 35);

        let lax = MachineId::from_region("lax", 4).unwrap();
        assert_eq!(lax.to_raw(), (2 << 6) | 4);
        assert_eq!(lax.continent(), Some(Continent::NorthAmerica));
        assert_eq!(lax.index(), 4);
    }

    #[test]
    fn accepts_full_index_range() {
        assert_eq!(MachineId::new(Continent::Asia, 0).unwrap().to_raw(), 0);
        let max = MachineId::new(Continent::Oceania, 63).unwrap();
        assert_eq!(max.to_raw(), (6 << 6) | 63);
        assert_eq!(max.index(), MachineId::MAX_INDEX);
    }

    #[test]
    fn rejects_unknown_region() {
        assert_eq!(
            MachineId::from_region("unk", 0),
            Err(Error::InvalidConfiguration(ConfigError::UnknownRegion(
                "unk".into()
            )))
        );
    }

    #[test]
    fn rejects_out_of_range_index() {
        for index in [-1, 64, 256, i64::MAX] {
            assert_eq!(
                MachineId::from_region("phx", index),
                Err(Error::InvalidConfiguration(ConfigError::IndexOutOfRange {
                    index,
                    max: 63
                }))
            );
        }
    }

    #[test]
    fn raw_values_are_validated() {
        assert_eq!(MachineId::try_from(355_u16).unwrap().index(), 35);
        assert!(MachineId::try_from(MachineId::MASK).is_err()); // continent 7
        assert!(MachineId::try_from(MachineId::MASK + 1).is_err());
    }

    #[test]
    fn displays_continent_and_index() {
        let id = MachineId::from_region("syd", 9).unwrap();
        assert_eq!(id.to_string(), "oceania/9");
        assert_eq!(MachineId::from_raw_masked(0x1FF).to_string(), "7/63");
    }
}
