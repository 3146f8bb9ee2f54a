use chrono::NaiveDate;

use crate::error::StoreError;

/// Validate a task title: must be non-empty after trimming.
pub fn validate_title(title: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::validation("title", "must not be empty"));
    }
    Ok(())
}

/// Validate a due date against the current date. Absent dates are fine; a
/// present date must be today or later.
pub fn validate_due_date(due_date: Option<NaiveDate>, today: NaiveDate) -> Result<(), StoreError> {
    if let Some(d) = due_date {
        if d < today {
            return Err(StoreError::validation(
                "due_date",
                format!("{d} is in the past; choose today or a future date"),
            ));
        }
    }
    Ok(())
}

pub fn validate_hours(hours: u32) -> Result<(), StoreError> {
    if hours == 0 {
        return Err(StoreError::validation(
            "estimated_hours",
            "must be at least 1",
        ));
    }
    Ok(())
}

pub fn validate_importance(importance: u8) -> Result<(), StoreError> {
    if !(1..=10).contains(&importance) {
        return Err(StoreError::validation(
            "importance",
            format!("{importance} is out of range; must be 1-10"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn titles() {
        assert!(validate_title("Write report").is_ok());
        assert!(validate_title("  x  ").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn due_dates() {
        let today = date("2026-08-28");
        assert!(validate_due_date(None, today).is_ok());
        assert!(validate_due_date(Some(today), today).is_ok());
        assert!(validate_due_date(Some(date("2026-12-31")), today).is_ok());
        assert!(validate_due_date(Some(date("2026-08-27")), today).is_err());
        assert!(validate_due_date(Some(date("2000-01-01")), today).is_err());
    }

    #[test]
    fn hours_and_importance() {
        assert!(validate_hours(1).is_ok());
        assert!(validate_hours(0).is_err());
        assert!(validate_importance(1).is_ok());
        assert!(validate_importance(10).is_ok());
        assert!(validate_importance(0).is_err());
        assert!(validate_importance(11).is_err());
    }
}
