use chrono::TimeDelta;

/// Converts host seconds into a [`TimeDelta`] with microsecond resolution.
#[allow(clippy::cast_possible_truncation)]
pub fn secs_to_delta(secs: f64) -> TimeDelta {
    if secs.is_finite() { TimeDelta::microseconds((secs * 1e6).round() as i64) } else { TimeDelta::zero() }
}

/// Deadline timer gating when an "all clear" is trusted.
///
/// The timer is armed by the first [`ManeuverTimer::check`] after a reset and
/// reports elapsed once more than `period` of simulation time passed since then.
/// Time is whatever clock the caller passes in, the CPS uses accumulated tick deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManeuverTimer {
    period: TimeDelta,
    deadline: Option<TimeDelta>,
}

impl ManeuverTimer {
    pub fn new(period: TimeDelta) -> Self { Self { period, deadline: None } }

    pub fn period(&self) -> TimeDelta { self.period }

    /// Arms the timer if needed and tells whether the deadline has passed.
    pub fn check(&mut self, now: TimeDelta) -> bool {
        match self.deadline {
            None => {
                self.deadline = Some(now + self.period);
                false
            }
            Some(deadline) => deadline < now,
        }
    }

    pub fn is_armed(&self) -> bool { self.deadline.is_some() }

    /// Disarms the timer; the next check starts a new period.
    pub fn reset(&mut self) { self.deadline = None; }
}

#[cfg(test)]
mod tests {
    use super::{ManeuverTimer, secs_to_delta};
    use chrono::TimeDelta;

    #[test]
    fn test_elapses_after_period() {
        let mut t = ManeuverTimer::new(TimeDelta::seconds(3));
        assert!(!t.check(TimeDelta::seconds(10)));
        assert!(!t.check(TimeDelta::seconds(12)));
        assert!(!t.check(TimeDelta::seconds(13)));
        assert!(t.check(TimeDelta::milliseconds(13_001)));
    }

    #[test]
    fn test_reset_restarts_period() {
        let mut t = ManeuverTimer::new(TimeDelta::seconds(3));
        t.check(TimeDelta::zero());
        t.reset();
        assert!(!t.is_armed());
        assert!(!t.check(TimeDelta::seconds(5)));
        assert!(t.check(TimeDelta::seconds(9)));
    }

    #[test]
    fn test_secs_to_delta() {
        assert_eq!(secs_to_delta(0.02), TimeDelta::milliseconds(20));
        assert_eq!(secs_to_delta(f64::NAN), TimeDelta::zero());
    }
}
