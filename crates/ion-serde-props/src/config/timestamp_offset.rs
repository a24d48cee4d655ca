//! Offset applied when normalizing timestamps on write.

use tracing::debug;

use crate::base::BaseProperties;
use crate::config::TIMESTAMP_OFFSET_KEY;
use crate::error::ConfigResult;

/// Resolved `ion.timestamp.serialization_offset`, in minutes east of UTC.
///
/// Any `i32` is accepted; range checks belong to the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampOffsetConfig {
    minutes: i32,
}

impl TimestampOffsetConfig {
    /// Reads the offset, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`](crate::ConfigError::InvalidValue)
    /// if the value is not an integer.
    pub fn from_properties(base: &BaseProperties<'_>, default: i32) -> ConfigResult<Self> {
        let minutes = base.int_or(TIMESTAMP_OFFSET_KEY, default)?;
        debug!(minutes, "resolved timestamp offset");
        Ok(Self { minutes })
    }

    /// Offset in minutes.
    #[must_use]
    pub fn minutes(&self) -> i32 {
        self.minutes
    }
}
