use crate::model::AllocationMethod;

/// Hours in the standard day that `percentage` allocations refer to.
/// Always 8, never the resource's declared capacity.
pub const STANDARD_DAY_HOURS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationError {
    /// A `total` allocation over a range with no working days has no
    /// meaningful daily rate. Rejected before dividing.
    NoWorkingDays,
}

impl std::fmt::Display for AllocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationError::NoWorkingDays => {
                write!(f, "allocation range contains no working days")
            }
        }
    }
}

impl std::error::Error for AllocationError {}

/// Normalize an allocation method/value pair into a daily-hours rate.
///
/// - `hours`: the value already is a daily rate.
/// - `percentage`: fraction of the 8-hour standard day.
/// - `total`: spread evenly across every working day in range.
pub fn daily_hours(
    method: AllocationMethod,
    value: f64,
    working_days: u32,
) -> Result<f64, AllocationError> {
    match method {
        AllocationMethod::Hours => Ok(value),
        AllocationMethod::Percentage => Ok(value / 100.0 * STANDARD_DAY_HOURS),
        AllocationMethod::Total => {
            if working_days == 0 {
                return Err(AllocationError::NoWorkingDays);
            }
            Ok(value / working_days as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_pass_through() {
        assert_eq!(daily_hours(AllocationMethod::Hours, 6.0, 5).unwrap(), 6.0);
        assert_eq!(daily_hours(AllocationMethod::Hours, 6.0, 1).unwrap(), 6.0);
    }

    #[test]
    fn percentage_of_standard_day() {
        assert_eq!(daily_hours(AllocationMethod::Percentage, 50.0, 5).unwrap(), 4.0);
        assert_eq!(daily_hours(AllocationMethod::Percentage, 100.0, 3).unwrap(), 8.0);
        assert_eq!(daily_hours(AllocationMethod::Percentage, 25.0, 10).unwrap(), 2.0);
    }

    #[test]
    fn total_spread_over_working_days() {
        assert_eq!(daily_hours(AllocationMethod::Total, 40.0, 5).unwrap(), 8.0);
        assert_eq!(daily_hours(AllocationMethod::Total, 12.0, 3).unwrap(), 4.0);
    }

    #[test]
    fn total_over_zero_working_days_rejected() {
        assert_eq!(
            daily_hours(AllocationMethod::Total, 40.0, 0),
            Err(AllocationError::NoWorkingDays)
        );
    }
}
