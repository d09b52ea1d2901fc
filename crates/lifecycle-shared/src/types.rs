//! Common types

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub type EntityId = Uuid;

pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// The nil UUID stands in for a missing id or actor.
pub fn is_absent(id: &EntityId) -> bool {
    id.is_nil()
}

/// Next `updated_at` value: `now`, unless the clock has not moved past `previous`.
pub fn advance_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
