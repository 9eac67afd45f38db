pub mod calendar;
pub mod overlap;

use time::{OffsetDateTime, PrimitiveDateTime};

/// Current wall-clock time as a naive datetime, for comparison against
/// session dates and times (which carry no zone).
pub fn now_naive() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}
