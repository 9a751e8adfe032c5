use chrono::NaiveDate;

/// Where a user sits in the check cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    NoCheckYet,
    NotDue,
    Due,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueStatus {
    pub due: bool,
    pub state: CheckState,
    pub message: String,
    pub days_since_last_check: Option<i64>,
}

/// Pure due-date query. `today` is an explicit input so callers control the
/// clock; nothing here reads wall time or writes state.
pub fn evaluate(
    last_check: Option<NaiveDate>,
    today: NaiveDate,
    cadence_days: i64,
) -> DueStatus {
    match last_check {
        None => DueStatus {
            due: true,
            state: CheckState::NoCheckYet,
            message: "No compliance check on record yet; a first check is due.".to_string(),
            days_since_last_check: None,
        },
        Some(last) => {
            let elapsed = (today - last).num_days();
            if elapsed >= cadence_days {
                DueStatus {
                    due: true,
                    state: CheckState::Due,
                    message: format!(
                        "Last check was {elapsed} days ago; cadence is {cadence_days} days, so a new check is due."
                    ),
                    days_since_last_check: Some(elapsed),
                }
            } else {
                DueStatus {
                    due: false,
                    state: CheckState::NotDue,
                    message: format!(
                        "Last check was {elapsed} days ago; next check in {} days.",
                        cadence_days - elapsed
                    ),
                    days_since_last_check: Some(elapsed),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn no_previous_check_is_due() {
        let status = evaluate(None, today(), 14);
        assert!(status.due);
        assert_eq!(status.state, CheckState::NoCheckYet);
        assert_eq!(status.days_since_last_check, None);
    }

    #[test]
    fn one_day_short_of_cadence_is_not_due() {
        let last = today() - Duration::days(13);
        let status = evaluate(Some(last), today(), 14);
        assert!(!status.due);
        assert_eq!(status.state, CheckState::NotDue);
        assert_eq!(status.days_since_last_check, Some(13));
    }

    #[test]
    fn exactly_at_cadence_is_due() {
        let last = today() - Duration::days(14);
        let status = evaluate(Some(last), today(), 14);
        assert!(status.due);
        assert_eq!(status.state, CheckState::Due);
        assert_eq!(status.days_since_last_check, Some(14));
    }

    #[test]
    fn same_day_check_is_not_due() {
        let status = evaluate(Some(today()), today(), 14);
        assert!(!status.due);
        assert_eq!(status.days_since_last_check, Some(0));
    }

    #[test]
    fn custom_cadence_is_respected() {
        let last = today() - Duration::days(7);
        assert!(evaluate(Some(last), today(), 7).due);
        assert!(!evaluate(Some(last), today(), 8).due);
    }
}
