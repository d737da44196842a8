//! Macro for implementing Display and FromStr for tag-like enums
//!
//! Claim states, auth states and routes all travel as short lowercase tags
//! (logs, CLI output, config). This macro provides both conversions from a
//! single mapping with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use concierge_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Presence {
//!     Online,
//!     Away,
//! }
//!
//! impl_domain_status_conversions!(Presence {
//!     Online => "online",
//!     Away => "away",
//! });
//!
//! assert_eq!(Presence::Away.to_string(), "away");
//! assert_eq!("ONLINE".parse::<Presence>(), Ok(Presence::Online));
//! ```

/// Implements Display and FromStr traits for tag-like enums
///
/// This macro generates:
/// - Display trait: writes the mapped tag
/// - FromStr trait: parses the tag case-insensitively
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
///
/// # Features
///
/// - Case-insensitive parsing (e.g., "SAVED", "saved", "Saved" all work)
/// - Output is exactly the mapped tag
/// - Descriptive error messages with enum name
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
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
