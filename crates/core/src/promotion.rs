//! Promotion scheduling rules.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Validate that a promotion window is non-empty.
pub fn validate_schedule(start_date: Timestamp, end_date: Timestamp) -> Result<(), CoreError> {
    if end_date <= start_date {
        return Err(CoreError::Validation(
            "Promotion end_date must be after start_date".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn schedule_must_end_after_start() {
        let now = Utc::now();
        assert!(validate_schedule(now, now + Duration::days(1)).is_ok());
        assert!(validate_schedule(now, now).is_err());
        assert!(validate_schedule(now, now - Duration::hours(1)).is_err());
    }
}
