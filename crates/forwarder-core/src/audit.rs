//! Audit and soft-delete metadata stamped onto every persisted row.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column names of [`Audit`], in insert order.
pub const AUDIT_COLUMNS: &[&str] = &["created_at", "created_by", "updated_at", "updated_by"];

/// Returns the current time truncated to the storage precision (microseconds).
///
/// Postgres `timestamptz` keeps microseconds, so stamping with a truncated
/// value makes the in-memory entity equal to what a re-read returns.
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Creation and modification metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Audit {
    /// When the row was first inserted.
    pub created_at: DateTime<Utc>,
    /// Account that inserted the row.
    pub created_by: Option<Uuid>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
    /// Account that last wrote the row.
    pub updated_by: Option<Uuid>,
}

impl Audit {
    /// Stamps creation metadata.
    pub fn stamp_created(&mut self, actor: Option<Uuid>, now: DateTime<Utc>) {
        self.created_at = now;
        self.created_by = actor;
    }

    /// Stamps modification metadata.
    ///
    /// `updated_at` never moves backwards: when the clock has not advanced
    /// past the previous stamp, the previous stamp plus one microsecond is
    /// used instead.
    pub fn stamp_updated(&mut self, actor: Option<Uuid>, now: DateTime<Utc>) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
        self.updated_by = actor;
    }
}

/// Soft-delete markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SoftDelete {
    /// When the row was marked deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Account that marked the row deleted.
    pub deleted_by: Option<Uuid>,
}

impl SoftDelete {
    /// Returns true once the row has been marked deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_is_truncated_to_micros() {
        let now = now_utc();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_stamp_created_sets_actor_and_time() {
        let actor = Uuid::now_v7();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut audit = Audit::default();

        audit.stamp_created(Some(actor), now);

        assert_eq!(audit.created_at, now);
        assert_eq!(audit.created_by, Some(actor));
    }

    #[test]
    fn test_stamp_updated_advances() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let t1 = t0 + Duration::seconds(5);
        let mut audit = Audit::default();

        audit.stamp_updated(None, t0);
        assert_eq!(audit.updated_at, t0);

        audit.stamp_updated(None, t1);
        assert_eq!(audit.updated_at, t1);
    }

    #[test]
    fn test_stamp_updated_never_goes_backwards() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut audit = Audit::default();
        audit.stamp_updated(None, t0);

        // Clock skew: same or earlier instant.
        audit.stamp_updated(None, t0);
        assert_eq!(audit.updated_at, t0 + Duration::microseconds(1));

        audit.stamp_updated(None, t0 - Duration::seconds(10));
        assert_eq!(audit.updated_at, t0 + Duration::microseconds(2));
    }

    #[test]
    fn test_soft_delete_is_deleted() {
        let mut marker = SoftDelete::default();
        assert!(!marker.is_deleted());

        marker.deleted_at = Some(now_utc());
        assert!(marker.is_deleted());
    }
}
