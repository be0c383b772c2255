use chrono::{Datelike, NaiveDate, Weekday};
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

/// Italian national public holidays as (month, day), excluding the moveable
/// Easter Monday which is computed per year.
pub const DEFAULT_FIXED_HOLIDAYS: [(u32, u32); 10] = [
    (1, 1),   // Capodanno
    (1, 6),   // Epifania
    (4, 25),  // Festa della Liberazione
    (5, 1),   // Festa del Lavoro
    (6, 2),   // Festa della Repubblica
    (8, 15),  // Ferragosto
    (11, 1),  // Ognissanti
    (12, 8),  // Immacolata Concezione
    (12, 25), // Natale
    (12, 26), // Santo Stefano
];

/// Decides whether a calendar date is a working day. Pure and deterministic;
/// the per-year holiday cache is an optimization only and is scoped to this
/// instance rather than living in a process-wide global.
#[derive(Debug, Default)]
pub struct WorkingCalendar {
    fixed_holidays: Vec<(u32, u32)>,
    cache: Mutex<HashMap<i32, HashSet<NaiveDate>>>,
}

impl WorkingCalendar {
    pub fn new(fixed_holidays: Vec<(u32, u32)>) -> Self {
        Self {
            fixed_holidays,
            cache: Mutex::default(),
        }
    }

    pub fn italian() -> Self {
        Self::new(DEFAULT_FIXED_HOLIDAYS.to_vec())
    }

    pub fn is_non_working_day(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || self.is_holiday(date)
    }

    fn is_holiday(&self, date: NaiveDate) -> bool {
        let mut cache = self.cache.lock().unwrap();
        cache
            .entry(date.year())
            .or_insert_with(|| Self::compute_holidays(&self.fixed_holidays, date.year()))
            .contains(&date)
    }

    /// The full holiday set for a year: every configured fixed holiday plus
    /// the computed Easter Monday. Memoized per year behind `is_holiday`.
    pub fn holiday_set(&self, year: i32) -> HashSet<NaiveDate> {
        let mut cache = self.cache.lock().unwrap();
        cache
            .entry(year)
            .or_insert_with(|| Self::compute_holidays(&self.fixed_holidays, year))
            .clone()
    }

    fn compute_holidays(fixed: &[(u32, u32)], year: i32) -> HashSet<NaiveDate> {
        let mut holidays: HashSet<NaiveDate> = fixed
            .iter()
            .filter_map(|&(month, day)| NaiveDate::from_ymd_opt(year, month, day))
            .collect();
        holidays.insert(easter_monday(year));
        holidays
    }
}

/// Pasquetta, the day after Easter Sunday.
pub fn easter_monday(year: i32) -> NaiveDate {
    easter_sunday(year).succ_opt().unwrap()
}

/// Gregorian Easter Sunday via the anonymous (Meeus/Jones/Butcher) algorithm.
/// Valid for any Gregorian year, i.e. 1583 onward for civil use.
fn easter_sunday(year: i32) -> NaiveDate {
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
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32).unwrap()
}
