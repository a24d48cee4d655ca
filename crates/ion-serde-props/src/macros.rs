/// Generates `FromStr` and optionally `Display` impls for simple string enums.
///
/// Parse failures return a `String` message; [`crate::base`] turns it into
/// a [`ConfigError::InvalidValue`](crate::error::ConfigError::InvalidValue)
/// carrying the offending key and raw value.
///
/// # Forms
///
/// - `str_enum!(Enum, norm, "msg", ...)`: both `Display` and `FromStr`
/// - `str_enum!(fromstr Enum, norm, "msg", ...)`: `FromStr` only
///
/// The first literal of each variant is its canonical spelling (used by
/// `Display`); further literals are accepted aliases.
///
/// # Normalization modes
///
/// - `lowercase`: `to_lowercase().replace('-', "_")`
/// - `lowercase_nodash`: `to_lowercase()`
macro_rules! str_enum {
    // ── Full form: Display + FromStr ──
    ($enum_name:ident, $norm:ident, $err_msg:literal,
        $( $variant:ident => $display:literal $(, $alias:literal)* );+ $(;)?
    ) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = match self {
                    $( Self::$variant => $display, )+
                };
                f.write_str(s)
            }
        }
        str_enum!(fromstr $enum_name, $norm, $err_msg,
            $( $variant => $display $(, $alias)* );+);
    };

    // ── FromStr-only form ──
    (fromstr $enum_name:ident, $norm:ident, $err_msg:literal,
        $( $variant:ident => $canonical:literal $(, $alias:literal)* );+ $(;)?
    ) => {
        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = str_enum!(@normalize $norm s);
                match normalized.as_str() {
                    $( $canonical $(| $alias)* => Ok(Self::$variant), )+
                    other => Err(format!(
                        "{} '{}' (expected one of: {})",
                        $err_msg,
                        other,
                        [$( $canonical ),+].join(", "),
                    )),
                }
            }
        }
    };

    // ── Normalization helpers ──
    (@normalize lowercase $s:ident) => { $s.trim().to_lowercase().replace('-', "_") };
    (@normalize lowercase_nodash $s:ident) => { $s.trim().to_lowercase() };
}
