//! Macro for implementing Display and FromStr for label enums
//!
//! Run log operations and record sources are persisted as their display
//! label (`"Import"`, `"ManualAdd"`, `"Manual"`, ...). This macro keeps the
//! label, `Display` and `FromStr` in one place.
//!
//! # Example
//!
//! ```rust
//! use payline_domain::impl_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Api,
//!     Manual,
//! }
//!
//! impl_label_conversions!(Channel {
//!     Api => "API",
//!     Manual => "Manual",
//! });
//!
//! assert_eq!(Channel::Api.as_str(), "API");
//! assert_eq!("manual".parse::<Channel>(), Ok(Channel::Manual));
//! ```

/// Implements `as_str`, `ALL`, `Display` and `FromStr` for label enums.
///
/// Parsing is case-insensitive; output always uses the canonical label.
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical label stored in the database and shown to users.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
