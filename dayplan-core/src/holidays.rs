//! Japanese national holidays, computed rather than looked up.
//!
//! Covers the Act on National Holidays as amended through 2021:
//! - fixed-date holidays and "Happy Monday" holidays
//! - vernal/autumnal equinox via the usual approximation (1980-2099 only)
//! - substitute holidays (a holiday on Sunday moves to the next non-holiday)
//! - citizens' holidays (a day sandwiched between two holidays)
//! - one-off days (imperial ceremonies, the 2020/2021 Olympic moves)
//!
//! Dates outside what the rules cover are simply not holidays.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::calendar::{CapacityCalendar, is_weekend};

/// Weekends plus Japanese national holidays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JapaneseHolidays;

impl CapacityCalendar for JapaneseHolidays {
    fn is_reduced_capacity_day(&self, date: NaiveDate) -> bool {
        is_weekend(date) || holiday_name(date).is_some()
    }

    fn describe(&self, date: NaiveDate) -> Option<String> {
        holiday_name(date).map(str::to_string)
    }
}

/// Name of the holiday on `date`, including substitute and citizens' holidays.
pub fn holiday_name(date: NaiveDate) -> Option<&'static str> {
    if let Some(name) = national_holiday(date) {
        return Some(name);
    }
    if is_substitute_holiday(date) {
        return Some("Substitute Holiday");
    }
    if is_citizens_holiday(date) {
        return Some("Citizens' Holiday");
    }
    None
}

pub fn is_holiday(date: NaiveDate) -> bool {
    holiday_name(date).is_some()
}

/// Holidays named by the Act, before substitute/citizens' rules apply.
fn national_holiday(date: NaiveDate) -> Option<&'static str> {
    let year = date.year();
    if year < 1949 {
        return None;
    }
    let (m, d) = (date.month(), date.day());

    if let Some(name) = special_day(year, m, d) {
        return Some(name);
    }

    match m {
        1 => {
            if d == 1 {
                return Some("New Year's Day");
            }
            let coming_of_age = if year >= 2000 {
                monday_of(year, 1, 2) == Some(date)
            } else {
                d == 15
            };
            if coming_of_age {
                return Some("Coming of Age Day");
            }
        }
        2 => {
            if d == 11 && year >= 1967 {
                return Some("National Foundation Day");
            }
            if d == 23 && year >= 2020 {
                return Some("Emperor's Birthday");
            }
        }
        3 => {
            if vernal_equinox_day(year) == Some(d) {
                return Some("Vernal Equinox Day");
            }
        }
        4 => {
            if d == 29 {
                return Some(match year {
                    ..=1988 => "Emperor's Birthday",
                    1989..=2006 => "Greenery Day",
                    _ => "Showa Day",
                });
            }
        }
        5 => match d {
            3 => return Some("Constitution Memorial Day"),
            4 if year >= 2007 => return Some("Greenery Day"),
            5 => return Some("Children's Day"),
            _ => {}
        },
        7 => {
            let marine = match year {
                1996..=2002 => d == 20,
                2020 => d == 23,
                2021 => d == 22,
                2003.. => monday_of(year, 7, 3) == Some(date),
                _ => false,
            };
            if marine {
                return Some("Marine Day");
            }
            if (year == 2020 && d == 24) || (year == 2021 && d == 23) {
                return Some("Sports Day");
            }
        }
        8 => {
            let mountain = match year {
                2020 => d == 10,
                2021 => d == 8,
                2016.. => d == 11,
                _ => false,
            };
            if mountain {
                return Some("Mountain Day");
            }
        }
        9 => {
            let respect = match year {
                1966..=2002 => d == 15,
                2003.. => monday_of(year, 9, 3) == Some(date),
                _ => false,
            };
            if respect {
                return Some("Respect for the Aged Day");
            }
            if autumnal_equinox_day(year) == Some(d) {
                return Some("Autumnal Equinox Day");
            }
        }
        10 => {
            let sports = match year {
                1966..=1999 => d == 10,
                2020 | 2021 => false,
                2000.. => monday_of(year, 10, 2) == Some(date),
                _ => false,
            };
            if sports {
                return Some("Sports Day");
            }
        }
        11 => match d {
            3 => return Some("Culture Day"),
            23 => return Some("Labor Thanksgiving Day"),
            _ => {}
        },
        12 => {
            if d == 23 && (1989..=2018).contains(&year) {
                return Some("Emperor's Birthday");
            }
        }
        _ => {}
    }
    None
}

fn special_day(year: i32, month: u32, day: u32) -> Option<&'static str> {
    match (year, month, day) {
        (1959, 4, 10) => Some("Crown Prince's Wedding"),
        (1989, 2, 24) => Some("Funeral of Emperor Showa"),
        (1990, 11, 12) => Some("Enthronement Ceremony"),
        (1993, 6, 9) => Some("Crown Prince's Wedding"),
        (2019, 5, 1) => Some("Emperor's Accession"),
        (2019, 10, 22) => Some("Enthronement Ceremony"),
        _ => None,
    }
}

fn monday_of(year: i32, month: u32, nth: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Mon, nth)
}

fn equinox_day(year: i32, base: f64) -> Option<u32> {
    if !(1980..=2099).contains(&year) {
        return None;
    }
    let y = f64::from(year - 1980);
    let day = (base + 0.242194 * y - (y / 4.0).floor()).floor();
    Some(day as u32)
}

fn vernal_equinox_day(year: i32) -> Option<u32> {
    equinox_day(year, 20.8431)
}

fn autumnal_equinox_day(year: i32) -> Option<u32> {
    equinox_day(year, 23.2488)
}

/// Since 2007 a Sunday holiday pushes forward past any run of holidays;
/// 1973-2006 only the following Monday was substituted.
fn is_substitute_holiday(date: NaiveDate) -> bool {
    let year = date.year();
    if year < 1973 || national_holiday(date).is_some() {
        return false;
    }
    if year < 2007 {
        return date.weekday() == Weekday::Mon
            && national_holiday(date - Duration::days(1)).is_some();
    }
    let mut day = date - Duration::days(1);
    while national_holiday(day).is_some() {
        if day.weekday() == Weekday::Sun {
            return true;
        }
        day -= Duration::days(1);
    }
    false
}

fn is_citizens_holiday(date: NaiveDate) -> bool {
    if date.year() < 1985 || date.weekday() == Weekday::Sun || national_holiday(date).is_some() {
        return false;
    }
    national_holiday(date - Duration::days(1)).is_some()
        && national_holiday(date + Duration::days(1)).is_some()
}
