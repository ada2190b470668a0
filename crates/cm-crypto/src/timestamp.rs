use chrono::{DateTime, SubsecRound, Utc};

/// Returns the current UTC time without the sub-second component
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Whole seconds between `since` and `now`, negative when `since` is ahead
pub fn age_in_seconds(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_seconds()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Timelike};

    #[test]
    fn now_has_second_precision() {
        assert_eq!(now().nanosecond(), 0);
    }

    #[test]
    fn age() {
        let t = now();
        assert_eq!(age_in_seconds(t - Duration::seconds(61), t), 61);
        assert_eq!(age_in_seconds(t, t), 0);
        assert_eq!(age_in_seconds(t + Duration::seconds(5), t), -5);
    }
}
