use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum progress before a goal may be locked.
pub const LOCK_THRESHOLD: u32 = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GoalError {
    #[error("goal cannot be locked yet: progress {progress} is below {LOCK_THRESHOLD} days")]
    LockTooEarly { progress: u32 },
    #[error("goal is locked and cannot be modified")]
    AlreadyLocked,
    #[error("progress would exceed the target of {target} days")]
    TargetExceeded { target: u32 },
}

/// An accountability goal. Progress only ever moves forward, and locking is
/// a one-way transition — there is no unlock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Option<i64>,
    pub subject: String,
    pub title: String,
    pub description: String,
    pub target_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub locked: bool,
    pub is_public: bool,
    pub progress: u32,
}

impl Goal {
    pub fn new(
        subject: &str,
        title: &str,
        description: &str,
        target_days: u32,
        start_date: NaiveDate,
        is_public: bool,
    ) -> Self {
        Self {
            id: None,
            subject: subject.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            target_days,
            start_date,
            end_date: start_date + chrono::Duration::days(target_days as i64),
            locked: false,
            is_public,
            progress: 0,
        }
    }

    pub fn is_active(&self, today: NaiveDate) -> bool {
        today >= self.start_date && today <= self.end_date
    }

    pub fn has_room(&self) -> bool {
        self.progress < self.target_days
    }

    /// Advance progress by one day. Fails on a locked goal or past target.
    pub fn record_progress(&mut self) -> Result<(), GoalError> {
        if self.locked {
            return Err(GoalError::AlreadyLocked);
        }
        if self.progress >= self.target_days {
            return Err(GoalError::TargetExceeded {
                target: self.target_days,
            });
        }
        self.progress += 1;
        Ok(())
    }

    /// Lock the goal. Permitted only once progress has reached
    /// LOCK_THRESHOLD; locking twice is rejected.
    pub fn lock(&mut self) -> Result<(), GoalError> {
        if self.locked {
            return Err(GoalError::AlreadyLocked);
        }
        if self.progress < LOCK_THRESHOLD {
            return Err(GoalError::LockTooEarly {
                progress: self.progress,
            });
        }
        self.locked = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal_with_progress(progress: u32) -> Goal {
        let start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let mut g = Goal::new("yusuf", "30 days of discipline", "", 30, start, false);
        g.progress = progress;
        g
    }

    #[test]
    fn lock_requires_seven_days_of_progress() {
        let mut g = goal_with_progress(6);
        assert_eq!(g.lock(), Err(GoalError::LockTooEarly { progress: 6 }));
        assert!(!g.locked);

        let mut g = goal_with_progress(7);
        assert_eq!(g.lock(), Ok(()));
        assert!(g.locked);
    }

    #[test]
    fn locked_goal_is_immutable() {
        let mut g = goal_with_progress(7);
        g.lock().unwrap();
        assert_eq!(g.record_progress(), Err(GoalError::AlreadyLocked));
        assert_eq!(g.progress, 7);
        assert_eq!(g.lock(), Err(GoalError::AlreadyLocked));
    }

    #[test]
    fn progress_never_exceeds_target() {
        let mut g = goal_with_progress(0);
        g.target_days = 2;
        assert!(g.record_progress().is_ok());
        assert!(g.record_progress().is_ok());
        assert_eq!(
            g.record_progress(),
            Err(GoalError::TargetExceeded { target: 2 })
        );
        assert_eq!(g.progress, 2);
    }

    #[test]
    fn active_window_is_inclusive() {
        let g = goal_with_progress(0);
        assert!(g.is_active(g.start_date));
        assert!(g.is_active(g.end_date));
        assert!(!g.is_active(g.start_date.pred_opt().unwrap()));
        assert!(!g.is_active(g.end_date.succ_opt().unwrap()));
    }
}
