//! String, number, validation and identifier helpers

use crate::error::UtilsResult;
use crate::moment::{Moment, TimeAgo};

pub mod format_utils;
pub mod id_utils;
pub mod string_utils;
pub mod truthy;
pub mod validation_utils;

pub use format_utils::{FormatUtils, NumberFormat, NumberFormatter};
pub use id_utils::{nanoid, nanoid_with_alphabet, ulid, uuid, IdGenerator};
pub use string_utils::StringUtils;
pub use truthy::{is_true, ternary, Truthy};
pub use validation_utils::ValidationUtils;

/// Relative time for an epoch-seconds timestamp
#[deprecated(note = "use `Moment::new(timestamp)?.time_ago(keep_years)`")]
pub fn time_ago(timestamp: i64, keep_years: bool) -> UtilsResult<TimeAgo> {
    Ok(Moment::new(timestamp)?.time_ago(keep_years))
}
