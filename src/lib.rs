pub mod dates;
pub mod error;
pub mod extract;
pub mod models;
pub mod report;
pub mod workload;

pub use dates::normalize_date;
pub use error::{DateFormatError, InvalidTypeError, RecordError};
pub use models::{Assignment, AssignmentType, Plan, WeeklyWorkload};
pub use workload::{compute_weekly_workload, get_week_start};
