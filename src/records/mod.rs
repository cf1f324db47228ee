use std::fs;
use std::path::{Path, PathBuf};

use crate::api::Expense;
use crate::error::{Context, Result};
use crate::utils::export_timestamp_slug;

pub const EXPORT_HEADER: [&str; 5] = ["id", "title", "category", "amount", "date"];

/// Write the rows currently on screen, in display order, to `path`.
pub fn save_expenses_csv<P: AsRef<Path>>(path: P, rows: &[&Expense]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create export directory {}", parent.display())
            })?;
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;

    writer.write_record(EXPORT_HEADER)?;
    for expense in rows {
        let amount = expense.amount.to_string();
        let date = expense
            .date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writer.write_record([
            expense.id.as_str(),
            expense.title.as_str(),
            expense.category_name(),
            amount.as_str(),
            date.as_str(),
        ])?;
    }

    writer.flush()?;
    log::info!("Exported {} expenses to {}", rows.len(), path.display());
    Ok(())
}

/// Timestamped file name used when the user exports without naming a file.
pub fn default_export_path(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref()
        .join(format!("expenses_{}.csv", export_timestamp_slug()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Category;
    use chrono::NaiveDate;

    #[test]
    fn writes_rows_in_display_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("expenses.csv");

        let coffee = Expense {
            id: "1".to_string(),
            title: "Coffee, large".to_string(),
            category: Category {
                id: None,
                name: "Food".to_string(),
            },
            amount: 5.5,
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
        };
        let bus = Expense {
            id: "2".to_string(),
            title: "Bus".to_string(),
            category: Category::default(),
            amount: 2.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 2),
        };

        save_expenses_csv(&path, &[&bus, &coffee]).expect("export succeeds");

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), EXPORT_HEADER.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Bus");
        assert_eq!(&rows[0][2], "");
        assert_eq!(&rows[1][1], "Coffee, large");
        assert_eq!(&rows[1][3], "5.5");
        assert_eq!(&rows[1][4], "2024-01-01");
    }

    #[test]
    fn default_export_path_is_timestamped_csv() {
        let path = default_export_path("exports");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("expenses_"));
        assert!(name.ends_with(".csv"));
        assert!(path.starts_with("exports"));
    }
}
