//! Portalnesia utilities - small, stateless helpers shared across Portalnesia services
//!
//! This library provides:
//! - String helpers (truncate, HTML cleaning, slugs, title case, initials)
//! - Human-readable number formatting (byte sizes, short counts, digit grouping)
//! - URL, Twitter URL and email validation
//! - Random identifiers (nanoid, UUID, ULID)
//! - `Moment`, a date wrapper with relative-time and range formatting rules

pub mod config;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod moment;
pub mod utils;

// Re-export main types for convenience
pub use crate::config::UtilsConfig;
pub use crate::error::{UtilsError, UtilsResult};
pub use crate::i18n::Language;
pub use crate::moment::{FormatPreset, Moment, MomentInput, TimeAgo, Unit};
pub use crate::utils::{
    is_true, nanoid, nanoid_with_alphabet, ternary, ulid, uuid, FormatUtils, IdGenerator,
    NumberFormat, NumberFormatter, StringUtils, Truthy, ValidationUtils,
};
