//! Day count conventions, business day adjustment, calendars and tenors.
//!
//! This module provides:
//! - `DayCountConvention`: year fraction between two dates
//! - `BusinessDayConvention`: adjustment of dates falling on non-business days
//! - `Calendar`: business day determination (no calendar, named, or custom)
//! - `Tenor` and [`add_tenor`]: date arithmetic for strings like `"3m"`
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use curve_core::types::time::{add_tenor, BusinessDayConvention, Calendar, DayCountConvention, Tenor};
//!
//! let start = NaiveDate::from_ymd_opt(2022, 1, 31).unwrap();
//! let tenor: Tenor = "1m".parse().unwrap();
//! let end = add_tenor(start, &tenor, None, &Calendar::Null).unwrap();
//! assert_eq!(end, NaiveDate::from_ymd_opt(2022, 2, 28).unwrap());
//!
//! let dcf = DayCountConvention::Act360.dcf(start, end);
//! assert!((dcf - 28.0 / 360.0).abs() < 1e-15);
//! ```

use super::error::{CurveError, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Day count convention (year fraction convention).
///
/// # Variants
/// - `Act365F`: actual days / 365
/// - `Act360`: actual days / 360
/// - `Thirty360`: 30/360 US bond basis
/// - `ActActIsda`: actual days split by calendar year, each part over 365 or 366
/// - `One`: every period has a fraction of 1
///
/// # Usage
///
/// ```
/// use curve_core::types::time::DayCountConvention;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
///
/// let dcf = DayCountConvention::Act365F.dcf(start, end);
/// assert!((dcf - 182.0 / 365.0).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayCountConvention {
    /// Actual/365 Fixed.
    Act365F,
    /// Actual/360. Standard for money market curves.
    Act360,
    /// 30/360 US bond basis.
    Thirty360,
    /// Actual/Actual ISDA.
    ActActIsda,
    /// Constant fraction of one per period.
    One,
}

impl DayCountConvention {
    /// Returns the canonical convention name.
    ///
    /// ```
    /// use curve_core::types::time::DayCountConvention;
    ///
    /// assert_eq!(DayCountConvention::Act360.name(), "ACT360");
    /// assert_eq!(DayCountConvention::Thirty360.name(), "30360");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act365F => "ACT365F",
            DayCountConvention::Act360 => "ACT360",
            DayCountConvention::Thirty360 => "30360",
            DayCountConvention::ActActIsda => "ACTACTISDA",
            DayCountConvention::One => "1",
        }
    }

    /// Day count fraction between two dates.
    ///
    /// Negative when `end` precedes `start` (except for `One`, which is
    /// always 1).
    ///
    /// # Arguments
    /// * `start` - Period start
    /// * `end` - Period end
    pub fn dcf(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        if start > end {
            return match self {
                DayCountConvention::One => 1.0,
                _ => -self.dcf(end, start),
            };
        }
        let days = (end - start).num_days() as f64;
        match self {
            DayCountConvention::Act365F => days / 365.0,
            DayCountConvention::Act360 => days / 360.0,
            DayCountConvention::Thirty360 => {
                let d1 = start.day().min(30);
                let d2 = if end.day() == 31 && d1 == 30 {
                    30
                } else {
                    end.day()
                };
                let days = 360 * (end.year() - start.year())
                    + 30 * (end.month() as i32 - start.month() as i32)
                    + (d2 as i32 - d1 as i32);
                days as f64 / 360.0
            }
            DayCountConvention::ActActIsda => act_act_isda(start, end),
            DayCountConvention::One => 1.0,
        }
    }
}

fn days_in_year(year: i32) -> f64 {
    if is_leap_year(year) {
        366.0
    } else {
        365.0
    }
}

fn act_act_isda(start: NaiveDate, end: NaiveDate) -> f64 {
    if start.year() == end.year() {
        return (end - start).num_days() as f64 / days_in_year(start.year());
    }
    let mut total = 0.0;
    let mut cursor = start;
    for year in start.year()..=end.year() {
        let boundary = NaiveDate::from_ymd_opt(year + 1, 1, 1).map_or(end, |b| b.min(end));
        total += (boundary - cursor).num_days() as f64 / days_in_year(year);
        cursor = boundary;
    }
    total
}

impl FromStr for DayCountConvention {
    type Err = CurveError;

    /// Parses a day count convention (case-insensitive, `/`, `_` and spaces ignored).
    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().replace(['/', ' ', '_'], "").as_str() {
            "ACT365F" | "ACT365" | "ACTUAL365" | "A365" => Ok(DayCountConvention::Act365F),
            "ACT360" | "ACTUAL360" | "A360" => Ok(DayCountConvention::Act360),
            "30360" | "THIRTY360" | "30E360" => Ok(DayCountConvention::Thirty360),
            "ACTACTISDA" | "ACTACT" => Ok(DayCountConvention::ActActIsda),
            "1" | "1+" | "ONE" => Ok(DayCountConvention::One),
            _ => Err(CurveError::UnknownConvention(s.to_string())),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for DayCountConvention {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for DayCountConvention {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DayCountConvention::from_str(&s).map_err(de::Error::custom)
    }
}

/// Business day convention for date adjustments.
///
/// # Examples
///
/// ```
/// use curve_core::types::time::BusinessDayConvention;
///
/// let conv: BusinessDayConvention = "mf".parse().unwrap();
/// assert_eq!(conv, BusinessDayConvention::ModifiedFollowing);
/// assert_eq!(conv.code(), "MF");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessDayConvention {
    /// Move to the next business day.
    Following,
    /// Move to the next business day, unless it crosses a month boundary.
    ModifiedFollowing,
    /// Move to the previous business day.
    Preceding,
    /// Move to the previous business day, unless it crosses a month boundary.
    ModifiedPreceding,
    /// Do not adjust the date.
    Unadjusted,
}

impl BusinessDayConvention {
    /// Returns a short code for this convention.
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            BusinessDayConvention::Following => "F",
            BusinessDayConvention::ModifiedFollowing => "MF",
            BusinessDayConvention::Preceding => "P",
            BusinessDayConvention::ModifiedPreceding => "MP",
            BusinessDayConvention::Unadjusted => "NONE",
        }
    }

    /// The convention with any month-end modification removed.
    fn unmodified(self) -> Self {
        match self {
            BusinessDayConvention::ModifiedFollowing => BusinessDayConvention::Following,
            BusinessDayConvention::ModifiedPreceding => BusinessDayConvention::Preceding,
            other => other,
        }
    }

    /// Adjust `date` to a business day of `calendar`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use curve_core::types::time::{BusinessDayConvention, Calendar};
    ///
    /// let cal: Calendar = "bus".parse().unwrap();
    /// let saturday = NaiveDate::from_ymd_opt(2022, 4, 30).unwrap();
    /// let adjusted = BusinessDayConvention::ModifiedFollowing.adjust(saturday, &cal);
    /// assert_eq!(adjusted, NaiveDate::from_ymd_opt(2022, 4, 29).unwrap());
    /// ```
    pub fn adjust(&self, date: NaiveDate, calendar: &Calendar) -> NaiveDate {
        match self {
            BusinessDayConvention::Unadjusted => date,
            BusinessDayConvention::Following => calendar.next_business_day(date),
            BusinessDayConvention::Preceding => calendar.previous_business_day(date),
            BusinessDayConvention::ModifiedFollowing => {
                let following = calendar.next_business_day(date);
                if following.month() != date.month() {
                    calendar.previous_business_day(date)
                } else {
                    following
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let preceding = calendar.previous_business_day(date);
                if preceding.month() != date.month() {
                    calendar.next_business_day(date)
                } else {
                    preceding
                }
            }
        }
    }
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for BusinessDayConvention {
    type Err = CurveError;

    /// Parses full names and short codes (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "following" | "f" => Ok(BusinessDayConvention::Following),
            "modifiedfollowing" | "mf" => Ok(BusinessDayConvention::ModifiedFollowing),
            "preceding" | "p" => Ok(BusinessDayConvention::Preceding),
            "modifiedpreceding" | "mp" => Ok(BusinessDayConvention::ModifiedPreceding),
            "unadjusted" | "u" | "none" => Ok(BusinessDayConvention::Unadjusted),
            _ => Err(CurveError::UnknownModifier(s.to_string())),
        }
    }
}

impl Serialize for BusinessDayConvention {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for BusinessDayConvention {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BusinessDayConvention::from_str(&s).map_err(de::Error::custom)
    }
}

/// Named holiday calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCalendar {
    /// Every day is a business day.
    All,
    /// Monday to Friday, no holidays.
    Bus,
    /// TARGET: Monday to Friday excluding New Year, Good Friday, Easter
    /// Monday, 1 May, 25 and 26 December.
    Tgt,
}

impl NamedCalendar {
    /// Lowercase key used in persisted curves.
    pub fn key(&self) -> &'static str {
        match self {
            NamedCalendar::All => "all",
            NamedCalendar::Bus => "bus",
            NamedCalendar::Tgt => "tgt",
        }
    }

    fn is_business_day(&self, date: NaiveDate) -> bool {
        match self {
            NamedCalendar::All => true,
            NamedCalendar::Bus => !is_weekend(date),
            NamedCalendar::Tgt => !is_weekend(date) && !is_target_holiday(date),
        }
    }
}

/// Business day calendar.
///
/// `Null` treats every date as a business day; `Custom` is a weekmask of
/// business weekdays plus an explicit holiday list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Calendar {
    /// No calendar: every date is a business day.
    #[default]
    Null,
    /// A built-in calendar.
    Named(NamedCalendar),
    /// Explicit weekmask and holidays.
    Custom {
        /// Weekdays that are business days
        weekmask: Vec<Weekday>,
        /// Non-business dates
        holidays: BTreeSet<NaiveDate>,
    },
}

/// Persisted form of a [`Calendar`]: a named key or an explicit weekmask and
/// holiday list. `Calendar::Null` has no descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalendarDescriptor {
    /// Named calendar key such as `"tgt"`.
    Named(String),
    /// Weekmask such as `"Mon Tue Wed Thu Fri"` and holiday dates.
    Custom {
        /// Space separated business weekdays
        weekmask: String,
        /// Holiday dates
        holidays: Vec<NaiveDate>,
    },
}

impl Calendar {
    /// Construct a custom calendar from a weekmask string and holidays.
    ///
    /// # Errors
    /// `InvalidCalendar` if a weekmask token is not a weekday name.
    pub fn custom<I>(weekmask: &str, holidays: I) -> Result<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let weekmask = weekmask
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<Weekday>()
                    .map_err(|_| CurveError::InvalidCalendar(format!("bad weekday '{}'", token)))
            })
            .collect::<Result<Vec<_>>>()?;
        if weekmask.is_empty() {
            return Err(CurveError::InvalidCalendar("empty weekmask".to_string()));
        }
        Ok(Calendar::Custom {
            weekmask,
            holidays: holidays.into_iter().collect(),
        })
    }

    /// Whether `date` is a business day.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        match self {
            Calendar::Null => true,
            Calendar::Named(named) => named.is_business_day(date),
            Calendar::Custom { weekmask, holidays } => {
                weekmask.contains(&date.weekday()) && !holidays.contains(&date)
            }
        }
    }

    fn next_business_day(&self, date: NaiveDate) -> NaiveDate {
        let mut current = date;
        while !self.is_business_day(current) {
            current += Duration::days(1);
        }
        current
    }

    fn previous_business_day(&self, date: NaiveDate) -> NaiveDate {
        let mut current = date;
        while !self.is_business_day(current) {
            current -= Duration::days(1);
        }
        current
    }

    /// Move `days` business days from `date`; negative moves backward.
    pub fn add_business_days(&self, date: NaiveDate, days: i32) -> NaiveDate {
        let step = if days >= 0 { 1 } else { -1 };
        let mut left = days.abs();
        let mut current = date;
        while left > 0 {
            current += Duration::days(step);
            if self.is_business_day(current) {
                left -= 1;
            }
        }
        current
    }

    /// Persisted descriptor, `None` for `Calendar::Null`.
    pub fn descriptor(&self) -> Option<CalendarDescriptor> {
        match self {
            Calendar::Null => None,
            Calendar::Named(named) => Some(CalendarDescriptor::Named(named.key().to_string())),
            Calendar::Custom { weekmask, holidays } => Some(CalendarDescriptor::Custom {
                weekmask: weekmask
                    .iter()
                    .map(|w| w.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
                holidays: holidays.iter().copied().collect(),
            }),
        }
    }

    /// Rebuild a calendar from its persisted descriptor.
    pub fn from_descriptor(descriptor: Option<&CalendarDescriptor>) -> Result<Self> {
        match descriptor {
            None => Ok(Calendar::Null),
            Some(CalendarDescriptor::Named(key)) => key.parse(),
            Some(CalendarDescriptor::Custom { weekmask, holidays }) => {
                Calendar::custom(weekmask, holidays.iter().copied())
            }
        }
    }
}

impl FromStr for Calendar {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "null" | "none" => Ok(Calendar::Null),
            "all" => Ok(Calendar::Named(NamedCalendar::All)),
            "bus" => Ok(Calendar::Named(NamedCalendar::Bus)),
            "tgt" | "target" => Ok(Calendar::Named(NamedCalendar::Tgt)),
            other => Err(CurveError::InvalidCalendar(format!(
                "unknown calendar '{}'",
                other
            ))),
        }
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Month and day of Easter Sunday (Meeus/Jones/Butcher).
fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = ((h + l - 7 * m + 114) % 31) + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

fn is_target_holiday(date: NaiveDate) -> bool {
    if matches!(
        (date.month(), date.day()),
        (1, 1) | (5, 1) | (12, 25) | (12, 26)
    ) {
        return true;
    }
    easter_sunday(date.year()).is_some_and(|easter| {
        date == easter - Duration::days(2) || date == easter + Duration::days(1)
    })
}

/// Unit of a [`Tenor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenorUnit {
    /// Calendar days (`d`)
    Day,
    /// Business days (`b`)
    BusinessDay,
    /// Weeks (`w`)
    Week,
    /// Months (`m`)
    Month,
    /// Years (`y`)
    Year,
}

/// A signed period such as `"1d"`, `"2b"`, `"3w"`, `"6m"` or `"-1y"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tenor {
    /// Signed number of units
    pub count: i32,
    /// Period unit
    pub unit: TenorUnit,
}

impl Tenor {
    /// Construct a tenor.
    pub fn new(count: i32, unit: TenorUnit) -> Self {
        Self { count, unit }
    }
}

impl FromStr for Tenor {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().to_lowercase();
        let invalid = || CurveError::InvalidTenor(s.to_string());
        let unit = match trimmed.chars().last() {
            Some('d') => TenorUnit::Day,
            Some('b') => TenorUnit::BusinessDay,
            Some('w') => TenorUnit::Week,
            Some('m') => TenorUnit::Month,
            Some('y') => TenorUnit::Year,
            _ => return Err(invalid()),
        };
        let count = trimmed[..trimmed.len() - 1]
            .parse::<i32>()
            .map_err(|_| invalid())?;
        Ok(Tenor { count, unit })
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            TenorUnit::Day => 'd',
            TenorUnit::BusinessDay => 'b',
            TenorUnit::Week => 'w',
            TenorUnit::Month => 'm',
            TenorUnit::Year => 'y',
        };
        write!(f, "{}{}", self.count, unit)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Add calendar months with end-of-month clamping.
fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = date.month0() as i32 + months;
    let year = date.year() + total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Add a tenor to a date and adjust the result.
///
/// Business day tenors count business days of `calendar` and are not
/// further adjusted. Day and week tenors are adjusted without month-end
/// modification; month and year tenors clamp to month end and are adjusted
/// with `modifier` as given. `None` leaves the date unadjusted.
///
/// # Errors
/// `InvalidTenor` if the result is outside the representable date range.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use curve_core::types::time::{add_tenor, BusinessDayConvention, Calendar};
///
/// let cal: Calendar = "bus".parse().unwrap();
/// let friday = NaiveDate::from_ymd_opt(2022, 4, 29).unwrap();
/// let next = add_tenor(friday, &"1b".parse().unwrap(), None, &cal).unwrap();
/// assert_eq!(next, NaiveDate::from_ymd_opt(2022, 5, 2).unwrap());
/// ```
pub fn add_tenor(
    date: NaiveDate,
    tenor: &Tenor,
    modifier: Option<BusinessDayConvention>,
    calendar: &Calendar,
) -> Result<NaiveDate> {
    let overflow = || CurveError::InvalidTenor(tenor.to_string());
    let count = tenor.count;
    let (unadjusted, modifier) = match tenor.unit {
        TenorUnit::BusinessDay => return Ok(calendar.add_business_days(date, count)),
        TenorUnit::Day => (
            date.checked_add_signed(Duration::days(count as i64)),
            modifier.map(BusinessDayConvention::unmodified),
        ),
        TenorUnit::Week => (
            date.checked_add_signed(Duration::weeks(count as i64)),
            modifier.map(BusinessDayConvention::unmodified),
        ),
        TenorUnit::Month => (add_months(date, count), modifier),
        TenorUnit::Year => (add_months(date, count.saturating_mul(12)), modifier),
    };
    let unadjusted = unadjusted.ok_or_else(overflow)?;
    Ok(match modifier {
        Some(modifier) => modifier.adjust(unadjusted, calendar),
        None => unadjusted,
    })
}
