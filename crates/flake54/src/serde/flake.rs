use ::serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};

use crate::{error::Error, id::FlakeId};

impl Serialize for FlakeId {
    /// Serializes the ID as its base 54 string.
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buf = crate::Base54Buf::default();
        let encoded = self.encode_to_buf(&mut buf).map_err(ser::Error::custom)?;
        s.serialize_str(encoded)
    }
}

impl<'de> Deserialize<'de> for FlakeId {
    /// Deserializes the ID from a non-empty base 54 string.
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Base54Visitor;

        impl de::Visitor<'_> for Base54Visitor {
            type Value = FlakeId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a base 54 encoded string")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if v.is_empty() {
                    return Err(de::Error::custom(Error::InvalidJson));
                }
                FlakeId::decode(v).map_err(de::Error::custom)
            }
        }

        d.deserialize_str(Base54Visitor)
    }
}

/// Serde adapter storing a [`FlakeId`] as its raw integer.
///
/// Use it for binary formats or database rows where the numeric form is the
/// interchange format:
///
/// ```
/// use flake54::{FlakeId, as_native};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Row {
///     #[serde(with = "as_native")]
///     id: FlakeId,
/// }
/// ```
pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer, de};
    use crate::id::FlakeId;

    /// Serialize an ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &FlakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize an ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the value is
    /// negative.
    pub fn deserialize<'de, D>(d: D) -> Result<FlakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(d)?;
        FlakeId::try_from(raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct Event {
        id: FlakeId,
    }

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "as_native")]
        event_id: FlakeId,
    }

    #[test]
    fn serializes_as_encoded_string() {
        let json = serde_json::to_string(&FlakeId::from_raw(123_123)).unwrap();
        assert_eq!(json, r#""6vF""#);

        let event = Event {
            id: FlakeId::from_raw(i64::MAX),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"id":"EZNmktHEz5H"}"#);
        assert_eq!(serde_json::from_str::<Event>(&json).unwrap(), event);
    }

    #[test]
    fn invalid_id_does_not_serialize() {
        let err = serde_json::to_string(&FlakeId::INVALID).unwrap_err();
        assert_eq!(err.to_string(), Error::InvalidId.to_string());
    }

    #[test]
    fn deserializes_known_fixtures() {
        for (json, raw) in [
            (r#""6vF""#, 123_123),
            (r#""nHW1a""#, 123_123_123),
            (r#""efUzLtM5yvu""#, 1_820_096_636_282_474_496),
            (r#""8HH7MXkTRtr""#, 310_311_215_280_041_986),
        ] {
            let id: FlakeId = serde_json::from_str(json).unwrap();
            assert_eq!(id.to_raw(), raw);
        }
    }

    #[test]
    fn rejects_non_string_and_empty_input() {
        assert!(serde_json::from_value::<FlakeId>(json!(123_123)).is_err());
        assert!(serde_json::from_str::<FlakeId>("6vF").is_err());

        let err = serde_json::from_str::<FlakeId>(r#""""#).unwrap_err();
        assert!(err.to_string().contains(&Error::InvalidJson.to_string()));
    }

    #[test]
    fn propagates_codec_errors() {
        let err = serde_json::from_str::<FlakeId>(r#""xZNmktHEz5H""#).unwrap_err();
        assert!(err.to_string().contains(&Error::InvalidId.to_string()));

        let err = serde_json::from_str::<FlakeId>(r#""6v-""#).unwrap_err();
        let expected = Error::InvalidByte {
            byte: b'-',
            index: 2,
        };
        assert!(err.to_string().contains(&expected.to_string()));
    }

    #[test]
    fn native_roundtrip() {
        let row = Row {
            event_id: FlakeId::from_raw(42),
        };

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"event_id":42}"#);
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn native_rejects_negative_values() {
        let err = serde_json::from_value::<Row>(json!({"event_id": -1})).unwrap_err();
        assert!(err.to_string().contains(&Error::InvalidId.to_string()));
    }
}
