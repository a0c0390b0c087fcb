use core::{fmt, str::FromStr, time::Duration};
use std::time::SystemTime;

use crate::{
    base54::{Base54Buf, decode_base54, encode_base54, encode_base54_to_buf},
    error::{Error, Result},
    id::MachineId,
    time::FLAKE_EPOCH,
};

/// A 64-bit Snowflake ID.
///
/// - 1 bit unused (always zero, keeps valid IDs non-negative)
/// - 42 bits timestamp (ms since [`FLAKE_EPOCH`], good until 2159)
/// - 9 bits machine ID (see [`MachineId`])
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63         63 62            21 20             12 11             0
///              +------------+----------------+-----------------+---------------+
///  Field:      | unused (1) | timestamp (42) | machine ID (9)  | sequence (12) |
///              +------------+----------------+-----------------+---------------+
///              |<----------- MSB ---------- 64 bits ---------- LSB ----------->|
/// ```
///
/// The integer form is meant for storage and internal use; the base 54 text
/// form ([`FlakeId::encode`], [`fmt::Display`]) is what users should see.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlakeId {
    id: i64,
}

impl FlakeId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u32 = 42;

    /// Width of the machine ID field.
    pub const MACHINE_ID_BITS: u32 = 9;

    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u32 = 12;

    /// Bitmask for the 42-bit timestamp field. Occupies bits 21 through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for the 9-bit machine ID field. Occupies bits 12 through 20.
    pub const MACHINE_ID_MASK: u64 = (1 << Self::MACHINE_ID_BITS) - 1;

    /// Bitmask for the 12-bit sequence field. Occupies bits 0 through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its position (bit 21).
    pub const TIMESTAMP_SHIFT: u32 = Self::MACHINE_ID_BITS + Self::SEQUENCE_BITS;

    /// Number of bits to shift the machine ID to its position (bit 12).
    pub const MACHINE_ID_SHIFT: u32 = Self::SEQUENCE_BITS;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Reserved value returned in place of an ID when parsing fails.
    ///
    /// All bits set, so it is negative and can never come out of a generator.
    pub const INVALID: Self = Self { id: -1 };

    /// Builds an ID from its fields, truncating each to its width.
    pub const fn from_parts(timestamp: u64, machine_id: MachineId, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let machine_id =
            (machine_id.to_raw() as u64 & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: (timestamp | machine_id | sequence) as i64,
        }
    }

    /// Builds an ID from its fields.
    ///
    /// Fields wider than their slot are a bug in the caller; they trip a debug
    /// assertion and are truncated in release builds.
    pub fn from_components(timestamp: u64, machine_id: MachineId, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from_parts(timestamp, machine_id, sequence)
    }

    /// Wraps a raw integer, e.g. one read from a database column.
    ///
    /// No validation happens; see [`Self::is_valid`].
    pub const fn from_raw(raw: i64) -> Self {
        Self { id: raw }
    }

    /// The raw integer value.
    pub const fn to_raw(&self) -> i64 {
        self.id
    }

    /// Whether the value could have been produced by a generator.
    pub const fn is_valid(&self) -> bool {
        self.id >= 0
    }

    /// Milliseconds since [`FLAKE_EPOCH`].
    pub const fn timestamp(&self) -> u64 {
        ((self.id as u64) >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Milliseconds since the Unix epoch.
    pub const fn unix_millis(&self) -> u64 {
        self.timestamp() + FLAKE_EPOCH.as_millis() as u64
    }

    /// The creation time as a [`SystemTime`].
    pub fn to_system_time(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_millis(self.unix_millis())
    }

    /// The machine that generated this ID.
    pub const fn machine_id(&self) -> MachineId {
        MachineId::from_raw_masked(
            (((self.id as u64) >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK) as u16,
        )
    }

    /// Position of this ID among those issued in the same millisecond.
    pub const fn sequence(&self) -> u64 {
        ((self.id as u64) >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Largest sequence value within one millisecond.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Largest timestamp the layout can hold.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    pub(crate) const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::SEQUENCE_MASK
    }

    pub(crate) fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.machine_id(), self.sequence() + 1)
    }

    pub(crate) fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.machine_id(), 0)
    }

    /// Encodes this ID into `buf` using the base 54 alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] if the ID is negative.
    pub fn encode_to_buf<'a>(&self, buf: &'a mut Base54Buf) -> Result<&'a str> {
        encode_base54_to_buf(self.id, buf)
    }

    /// Encodes this ID into a base 54 [`String`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] if the ID is negative.
    ///
    /// # Example
    ///
    /// ```
    /// use flake54::FlakeId;
    ///
    /// assert_eq!(FlakeId::from_raw(123_123).encode().unwrap(), "6vF");
    /// assert!(FlakeId::INVALID.encode().is_err());
    /// ```
    pub fn encode(&self) -> Result<String> {
        encode_base54(self.id)
    }

    /// Parses a base 54 string.
    ///
    /// # Errors
    ///
    /// See [`decode_base54`].
    ///
    /// # Example
    ///
    /// ```
    /// use flake54::FlakeId;
    ///
    /// let id = FlakeId::decode("8uyZY2sj3re").unwrap();
    /// assert_eq!(id.to_raw(), 305_023_354_946_072_576);
    /// assert_eq!(id.machine_id().to_raw(), 35);
    /// ```
    pub fn decode(encoded: &str) -> Result<Self> {
        decode_base54(encoded).map(Self::from_raw)
    }

    /// Parses a base 54 string, mapping any failure to [`Self::INVALID`].
    pub fn decode_or_invalid(encoded: &str) -> Self {
        Self::decode(encoded).unwrap_or(Self::INVALID)
    }
}

const _: () = assert!(
    FlakeId::TIMESTAMP_BITS + FlakeId::MACHINE_ID_BITS + FlakeId::SEQUENCE_BITS == 63,
    "layout must leave the sign bit unused"
);
const _: () = assert!(
    FlakeId::MACHINE_ID_BITS == MachineId::CONTINENT_BITS + MachineId::INDEX_BITS,
    "machine id field must hold a MachineId"
);

impl fmt::Display for FlakeId {
    /// Writes the base 54 form; invalid IDs render as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Base54Buf::default();
        match self.encode_to_buf(&mut buf) {
            Ok(encoded) => f.write_str(encoded),
            Err(_) => Ok(()),
        }
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.debug_tuple("FlakeId").field(&self.id).finish();
        }
        f.debug_struct("FlakeId")
            .field("id", &self.id)
            .field("encoded", &format_args!("{self}"))
            .field("timestamp", &self.timestamp())
            .field("machine_id", &self.machine_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl FromStr for FlakeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl TryFrom<i64> for FlakeId {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        let id = Self::from_raw(raw);
        if id.is_valid() {
            Ok(id)
        } else {
            Err(Error::InvalidId)
        }
    }
}

impl From<FlakeId> for i64 {
    fn from(id: FlakeId) -> Self {
        id.to_raw()
    }
}
