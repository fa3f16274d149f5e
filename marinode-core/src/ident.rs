//! Inline identifiers for sensors and display names
//!
//! Configuration and readings carry short, human-assigned identifiers
//! ("fresh_water", "bilge_pump"). Storing them inline keeps configs and
//! readings `Copy` and avoids heap allocation on no_std targets.

use core::fmt;

/// Maximum length for inline identifiers
///
/// IDs longer than this are rejected at configuration time.
pub const MAX_INLINE_ID: usize = 15;

/// Inline string for sensor IDs and display names
///
/// Avoids heap allocation for common ID lengths
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InlineString {
    len: u8,
    data: [u8; MAX_INLINE_ID],
}

/// Identifier of a configured sensor, used to build publish topics
pub type SensorId = InlineString;

impl InlineString {
    /// Create from string slice
    ///
    /// Returns `None` when the input exceeds [`MAX_INLINE_ID`] bytes.
    pub fn new(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_INLINE_ID {
            return None;
        }

        let mut data = [0u8; MAX_INLINE_ID];
        data[..bytes.len()].copy_from_slice(bytes);

        Some(Self {
            len: bytes.len() as u8,
            data,
        })
    }

    /// Get as string slice
    pub fn as_str(&self) -> &str {
        // Only valid UTF-8 is stored by new(), so this cannot panic
        core::str::from_utf8(&self.data[..self.len as usize]).unwrap_or("")
    }

    /// True when the identifier is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for InlineString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for InlineString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for InlineString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InlineString {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_short_ids() {
        let id = InlineString::new("fresh_water").unwrap();
        assert_eq!(id.as_str(), "fresh_water");
        assert!(!id.is_empty());
    }

    #[test]
    fn rejects_oversized_ids() {
        assert!(InlineString::new("a_very_long_identifier_indeed").is_none());
        // Exactly at the limit is fine
        assert!(InlineString::new("123456789012345").is_some());
    }
}
