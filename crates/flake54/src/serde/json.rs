use crate::{
    base54::Base54Buf,
    error::{Error, Result},
    id::FlakeId,
};

impl FlakeId {
    /// Renders the ID as a JSON string literal holding its base 54 encoding.
    ///
    /// The alphabet never needs escaping, so this skips a JSON serializer.
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
    /// assert_eq!(FlakeId::from_raw(123_123).to_json().unwrap(), r#""6vF""#);
    /// ```
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Base54Buf::default();
        let encoded = self.encode_to_buf(&mut buf)?;
        let mut json = String::with_capacity(encoded.len() + 2);
        json.push('"');
        json.push_str(encoded);
        json.push('"');
        Ok(json)
    }

    /// Parses a JSON string literal holding a base 54 encoded ID.
    ///
    /// The input must be exactly one quoted, non-empty string with no
    /// surrounding whitespace. Escape sequences are not interpreted: none of
    /// them can produce an alphabet symbol.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidJson`] if the input is not a quoted, non-empty string.
    /// - Any error from [`FlakeId::decode`] for the quoted contents.
    ///
    /// # Example
    ///
    /// ```
    /// use flake54::{Error, FlakeId};
    ///
    /// let id = FlakeId::from_json(br#""8HH7MXkTRtr""#).unwrap();
    /// assert_eq!(id.to_raw(), 310_311_215_280_041_986);
    ///
    /// assert_eq!(FlakeId::from_json(b"6vF"), Err(Error::InvalidJson));
    /// ```
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let inner = match data {
            [b'"', inner @ .., b'"'] if !inner.is_empty() => inner,
            _ => return Err(Error::InvalidJson),
        };
        let encoded = core::str::from_utf8(inner).map_err(|e| Error::InvalidByte {
            byte: inner[e.valid_up_to()],
            index: e.valid_up_to(),
        })?;
        Self::decode(encoded)
    }
}
