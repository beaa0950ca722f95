use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use std::str::FromStr;

use crate::error::{EsiStatusError, Result};

/// Parsed cron schedule for the background status update.
#[derive(Debug, Clone)]
pub struct UpdateSchedule {
    /// The cron expression string.
    expression: String,
    /// Parsed schedule.
    schedule: Schedule,
}

impl Default for UpdateSchedule {
    fn default() -> Self {
        // Every 30 minutes.
        Self::new("0 */30 * * * *").expect("default schedule is valid")
    }
}

impl UpdateSchedule {
    /// Create a new schedule from a cron expression.
    pub fn new(expression: &str) -> Result<Self> {
        // Normalize expression (add seconds if missing)
        let normalized = normalize_cron_expression(expression);

        let schedule = Schedule::from_str(&normalized)
            .map_err(|e| EsiStatusError::Schedule(e.to_string()))?;

        Ok(Self {
            expression: normalized,
            schedule,
        })
    }

    /// Get the cron expression string.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Get the next scheduled time after the given time.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Get the next scheduled time after the given time in a specific timezone.
    pub fn next_after_in_tz(&self, after: DateTime<Utc>, timezone: &str) -> Option<DateTime<Utc>> {
        let tz: Tz = timezone.parse().ok()?;
        let local_time = after.with_timezone(&tz);

        self.schedule
            .after(&local_time)
            .next()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Normalize a cron expression to include seconds.
fn normalize_cron_expression(expr: &str) -> String {
    let parts: Vec<&str> = expr.split_whitespace().collect();

    match parts.len() {
        5 => format!("0 {}", expr), // Add "0" for seconds
        _ => expr.to_string(),      // Let the parser handle the rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_five_part_cron() {
        let schedule = UpdateSchedule::new("*/5 * * * *").unwrap();
        assert_eq!(schedule.expression(), "0 */5 * * * *");
    }

    #[test]
    fn test_parse_six_part_cron() {
        let schedule = UpdateSchedule::new("30 */5 * * * *").unwrap();
        assert_eq!(schedule.expression(), "30 */5 * * * *");
    }

    #[test]
    fn test_next_after() {
        let schedule = UpdateSchedule::new("0 0 * * * *").unwrap(); // Every hour
        let now = Utc::now();
        let next = schedule.next_after(now);
        assert!(next.is_some());
        assert!(next.unwrap() > now);
    }

    #[test]
    fn test_next_after_in_tz() {
        let schedule = UpdateSchedule::default();
        let now = Utc::now();
        let next = schedule.next_after_in_tz(now, "Europe/Berlin");
        assert!(next.is_some());
        assert!(next.unwrap() > now);
    }

    #[test]
    fn test_invalid_cron() {
        let result = UpdateSchedule::new("invalid");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_timezone_yields_none() {
        let schedule = UpdateSchedule::default();
        assert!(schedule.next_after_in_tz(Utc::now(), "Mars/Olympus").is_none());
    }
}
