//! Calendar trait and minimal built-in implementations.
//!
//! A calendar knows which dates are business days and adjusts dates
//! according to a [`BusinessDayConvention`].  Only the structural calendars
//! live here ([`WeekendsOnly`] and [`NullCalendar`]); market holiday rules
//! are outside the scope of this library.

use crate::business_day_convention::BusinessDayConvention;
use crate::date::Date;
use crate::period::Period;
use crate::time_unit::TimeUnit;

/// A financial calendar.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// `true` if `date` is a business day in this calendar.
    fn is_business_day(&self, date: Date) -> bool;

    /// `true` if `date` is a holiday (non-business day).
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// `true` if `date` falls on a weekend.
    fn is_weekend(&self, date: Date) -> bool {
        date.weekday().is_weekend()
    }

    /// Adjust `date` according to `convention`.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        match convention {
            BusinessDayConvention::Unadjusted => date,
            BusinessDayConvention::Following => {
                let mut d = date;
                while self.is_holiday(d) {
                    d = d + 1;
                }
                d
            }
            BusinessDayConvention::ModifiedFollowing => {
                let adjusted = self.adjust(date, BusinessDayConvention::Following);
                if adjusted.month() != date.month() {
                    self.adjust(date, BusinessDayConvention::Preceding)
                } else {
                    adjusted
                }
            }
            BusinessDayConvention::Preceding => {
                let mut d = date;
                while self.is_holiday(d) {
                    d = d - 1;
                }
                d
            }
            BusinessDayConvention::ModifiedPreceding => {
                let adjusted = self.adjust(date, BusinessDayConvention::Preceding);
                if adjusted.month() != date.month() {
                    self.adjust(date, BusinessDayConvention::Following)
                } else {
                    adjusted
                }
            }
        }
    }

    /// Advance `date` by `period`, adjusting the result.
    ///
    /// A day period steps over business days one at a time; other units
    /// move in calendar time first and adjust once at the end.
    fn advance(&self, date: Date, period: Period, convention: BusinessDayConvention) -> Date {
        match period.unit {
            TimeUnit::Days => {
                let mut remaining = period.length;
                let mut d = date;
                while remaining > 0 {
                    d = d + 1;
                    while self.is_holiday(d) {
                        d = d + 1;
                    }
                    remaining -= 1;
                }
                while remaining < 0 {
                    d = d - 1;
                    while self.is_holiday(d) {
                        d = d - 1;
                    }
                    remaining += 1;
                }
                d
            }
            _ => self.adjust(date + period, convention),
        }
    }

    /// Business days in `[from, to]`, inclusive on both ends.
    fn business_days_between(&self, from: Date, to: Date) -> u32 {
        if from > to {
            return self.business_days_between(to, from);
        }
        let mut count = 0;
        let mut d = from;
        while d <= to {
            if self.is_business_day(d) {
                count += 1;
            }
            d = d + 1;
        }
        count
    }
}

/// A calendar with Saturdays and Sundays as its only holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendsOnly;

impl Calendar for WeekendsOnly {
    fn name(&self) -> &str {
        "weekends only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !self.is_weekend(date)
    }
}

/// A calendar with no holidays at all, weekends included.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &str {
        "null calendar"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn weekends_only_business_days() {
        let cal = WeekendsOnly;
        assert!(cal.is_business_day(date(2025, 8, 5))); // Tuesday
        assert!(!cal.is_business_day(date(2025, 8, 9))); // Saturday
        assert!(!cal.is_business_day(date(2025, 8, 10))); // Sunday
        assert!(cal.is_holiday(date(2025, 8, 10)));
    }

    #[test]
    fn following_and_preceding() {
        let cal = WeekendsOnly;
        let saturday = date(2025, 8, 9);
        assert_eq!(
            cal.adjust(saturday, BusinessDayConvention::Following),
            date(2025, 8, 11)
        );
        assert_eq!(
            cal.adjust(saturday, BusinessDayConvention::Preceding),
            date(2025, 8, 8)
        );
        assert_eq!(
            cal.adjust(saturday, BusinessDayConvention::Unadjusted),
            saturday
        );
    }

    #[test]
    fn modified_following_respects_month_end() {
        let cal = WeekendsOnly;
        // Saturday 2025-08-30: following lands in September, so modified
        // following backs up to Friday the 29th.
        let d = date(2025, 8, 30);
        assert_eq!(
            cal.adjust(d, BusinessDayConvention::Following),
            date(2025, 9, 1)
        );
        assert_eq!(
            cal.adjust(d, BusinessDayConvention::ModifiedFollowing),
            date(2025, 8, 29)
        );
    }

    #[test]
    fn advance_in_business_days() {
        let cal = WeekendsOnly;
        // Friday + 1 business day = Monday.
        assert_eq!(
            cal.advance(
                date(2025, 8, 8),
                Period::days(1),
                BusinessDayConvention::Following
            ),
            date(2025, 8, 11)
        );
        // Monday - 1 business day = Friday.
        assert_eq!(
            cal.advance(
                date(2025, 8, 11),
                Period::days(-1),
                BusinessDayConvention::Following
            ),
            date(2025, 8, 8)
        );
    }

    #[test]
    fn advance_in_months_adjusts_once() {
        let cal = WeekendsOnly;
        // 2025-07-09 + 1M = 2025-08-09, a Saturday; Following gives Monday.
        assert_eq!(
            cal.advance(
                date(2025, 7, 9),
                Period::months(1),
                BusinessDayConvention::Following
            ),
            date(2025, 8, 11)
        );
    }

    #[test]
    fn null_calendar_never_adjusts() {
        let cal = NullCalendar;
        let saturday = date(2025, 8, 9);
        assert!(cal.is_business_day(saturday));
        assert_eq!(
            cal.adjust(saturday, BusinessDayConvention::Following),
            saturday
        );
    }

    #[test]
    fn business_day_count() {
        let cal = WeekendsOnly;
        // Mon 2025-08-04 .. Fri 2025-08-08: five business days.
        assert_eq!(
            cal.business_days_between(date(2025, 8, 4), date(2025, 8, 8)),
            5
        );
        // A full week including the weekend still counts five.
        assert_eq!(
            cal.business_days_between(date(2025, 8, 4), date(2025, 8, 10)),
            5
        );
    }
}
