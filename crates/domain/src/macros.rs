//! Macro for mapping fieldless enums to their wire names
//!
//! Several domain enums travel as plain strings (resource types inside
//! identifiers, space types and sort orders in query strings). This macro
//! generates `as_str`, `Display` and a case-insensitive `FromStr` from a
//! single table.
//!
//! # Example
//!
//! ```rust
//! use webex_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Direction {
//!     Inbound,
//!     Outbound,
//! }
//!
//! impl_wire_name_conversions!(Direction {
//!     Inbound => "inbound",
//!     Outbound => "outbound",
//! });
//!
//! assert_eq!(Direction::Inbound.as_str(), "inbound");
//! assert_eq!("OUTBOUND".parse::<Direction>(), Ok(Direction::Outbound));
//! ```

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum.
///
/// Wire names must be written in lowercase; parsing lowercases its input
/// before matching.
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Wire name of this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
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
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
