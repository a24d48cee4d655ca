//! Whether a record that cannot be read is skipped or fails the query.

use tracing::debug;

use crate::base::BaseProperties;
use crate::config::IGNORE_MALFORMED_KEY;
use crate::error::ConfigResult;

/// Resolved `ion.ignore_malformed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgnoreMalformedConfig {
    ignore: bool,
}

impl IgnoreMalformedConfig {
    /// Reads the flag, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`](crate::ConfigError::InvalidValue)
    /// for a non-boolean value.
    pub fn from_properties(base: &BaseProperties<'_>, default: bool) -> ConfigResult<Self> {
        let ignore = base.bool_or(IGNORE_MALFORMED_KEY, default)?;
        debug!(ignore, "resolved ignore_malformed");
        Ok(Self { ignore })
    }

    /// `true` when malformed records are skipped.
    #[must_use]
    pub fn ignore(&self) -> bool {
        self.ignore
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PropertyMap;

    #[test]
    fn test_flag() {
        let config: PropertyMap = [("ion.ignore_malformed", "true")].into_iter().collect();
        let base = BaseProperties::new(&config);
        assert!(IgnoreMalformedConfig::from_properties(&base, false).unwrap().ignore());

        let empty = PropertyMap::new();
        let base = BaseProperties::new(&empty);
        assert!(!IgnoreMalformedConfig::from_properties(&base, false).unwrap().ignore());
    }
}
