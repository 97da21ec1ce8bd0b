//! Member standing derived from the audit log

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::entities::{AuditEntry, AuditKind, Member};
use crate::value_objects::{Snowflake, Standing};

/// More idle days than this makes a member INACTIVE
pub const INACTIVE_AFTER_DAYS: i64 = 30;
/// Activity within this many days keeps a member ACTIVE
pub const ACTIVE_WITHIN_DAYS: i64 = 7;
pub const MISSED_DUTY_LIMIT: i32 = 3;
pub const IGNORED_REMINDER_LIMIT: i32 = 3;

pub const DEFAULT_WINDOW_DAYS: i64 = 90;
/// Anything shorter could not see a full inactivity period
pub const MIN_WINDOW_DAYS: i64 = INACTIVE_AFTER_DAYS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StandingInputs {
    pub last_activity_at: DateTime<Utc>,
    pub missed_duty_count: i32,
    pub ignored_reminder_count: i32,
}

impl StandingInputs {
    pub fn idle_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_activity_at).num_days().max(0)
    }
}

/// Classify a member; deterministic for fixed inputs and `now`
pub fn recompute_standing(inputs: &StandingInputs, now: DateTime<Utc>) -> Standing {
    let idle = inputs.idle_days(now);
    if idle > INACTIVE_AFTER_DAYS || inputs.ignored_reminder_count >= IGNORED_REMINDER_LIMIT {
        Standing::Inactive
    } else if inputs.missed_duty_count >= MISSED_DUTY_LIMIT {
        Standing::Irregular
    } else if idle <= ACTIVE_WITHIN_DAYS {
        Standing::Active
    } else {
        Standing::Irregular
    }
}

/// Fold a member's audit entries inside `[now - window_days, now]` into
/// standing inputs
///
/// Entries may arrive in any order. Activity starts from the member's
/// creation time and moves forward with every entry the member performed,
/// plus non-punitive entries targeting them.
pub fn fold_standing(
    member: &Member,
    entries: &[AuditEntry],
    window_days: i64,
    now: DateTime<Utc>,
) -> StandingInputs {
    let since = window_start(window_days, now);
    let mut relevant: Vec<&AuditEntry> = entries
        .iter()
        .filter(|e| e.created_at >= since && e.created_at <= now)
        .filter(|e| e.target_member_id == member.id || e.performed_by_id == Some(member.id))
        .collect();
    relevant.sort_by_key(|e| (e.created_at, e.id));

    let mut inputs = StandingInputs {
        last_activity_at: member.created_at,
        missed_duty_count: 0,
        ignored_reminder_count: 0,
    };

    for entry in relevant {
        if is_activity(entry, member.id) && entry.created_at > inputs.last_activity_at {
            inputs.last_activity_at = entry.created_at;
        }
        if entry.target_member_id != member.id {
            continue;
        }
        match entry.action_kind {
            AuditKind::DutyMissed => inputs.missed_duty_count += 1,
            AuditKind::ReminderIgnored => inputs.ignored_reminder_count += 1,
            AuditKind::CountersReset => {
                inputs.missed_duty_count = 0;
                inputs.ignored_reminder_count = 0;
            }
            _ => {}
        }
    }
    inputs
}

pub fn window_start(window_days: i64, now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(window_days.max(MIN_WINDOW_DAYS))
}

fn is_activity(entry: &AuditEntry, member_id: Snowflake) -> bool {
    if entry.performed_by_id == Some(member_id) {
        return true;
    }
    entry.target_member_id == member_id && entry.action_kind.counts_as_target_activity()
}
