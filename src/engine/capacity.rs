use crate::model::*;

/// Walk every working day of the inclusive range, summing committed daily
/// hours from bookings covering the day plus the candidate's hours.
///
/// `exclude` drops one booking from the committed set; for updates, the
/// booking being replaced must not count against its own candidate.
/// A day is overbooked on strict `>`: exactly-at-capacity is allowed.
/// Non-working days are skipped entirely; they neither accumulate hours nor
/// can be flagged.
pub(crate) fn day_loads(
    ledger: &ResourceLedger,
    range: &DateRange,
    candidate_hours: f64,
    exclude: Option<BookingId>,
) -> Vec<DayLoad> {
    let committed: Vec<&Booking> = ledger
        .overlapping(range)
        .filter(|b| exclude != Some(b.id))
        .collect();
    let capacity = ledger.resource.capacity_per_day;

    let mut days = Vec::new();
    for date in range.working_days() {
        let mut total_hours = candidate_hours;
        let mut contributing_bookings = Vec::new();
        for booking in &committed {
            if booking.range().covers(date) {
                total_hours += booking.daily_hours;
                contributing_bookings.push(booking.id);
            }
        }
        days.push(DayLoad {
            date,
            total_hours,
            contributing_bookings,
            overbooked: total_hours > capacity,
        });
    }
    days
}

/// Aggregate a day-walk into the pre-check shape: overall verdict plus the
/// filtered overbooked subset.
pub(crate) fn preview(days: Vec<DayLoad>) -> CapacityPreview {
    let overbooked: Vec<DayLoad> = days.iter().filter(|d| d.overbooked).cloned().collect();
    CapacityPreview {
        is_overbooked: !overbooked.is_empty(),
        overbooked,
        days,
    }
}
