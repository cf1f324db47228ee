pub mod text;
pub mod time;

pub use text::{format_amount, mask, truncate_to_width};
pub use time::{export_timestamp_slug, format_expense_date};
