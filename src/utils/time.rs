use chrono::{Local, NaiveDate};

/// Display form used in the expense table, e.g. `01 Jan 2024`. Missing dates show as `-`.
pub fn format_expense_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%d %b %Y").to_string(),
        None => "-".to_string(),
    }
}

pub fn export_timestamp_slug() -> String {
    Local::now().format("%Y_%m_%d_%H_%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert_eq!(format_expense_date(date), "05 Jan 2024");
        assert_eq!(format_expense_date(None), "-");
    }
}
