//! Upcoming birthday computation
//!
//! A contact matches when the next anniversary of its birth date, counted
//! from `today`, falls within `today..=today + days`. Feb 29 birthdays are
//! celebrated on Feb 28 in non-leap years.

use crate::contract::Contact;
use chrono::{Datelike, Days, NaiveDate};

/// Anniversary of `birth` in `year`
fn anniversary(birth: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, birth.month(), birth.day().saturating_sub(1)))
}

/// First anniversary of `birth` on or after `today`
pub fn next_birthday(birth: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = anniversary(birth, today.year())?;
    if this_year >= today {
        Some(this_year)
    } else {
        anniversary(birth, today.year() + 1)
    }
}

/// Every next anniversary lies within this many days of today
const MAX_WINDOW_DAYS: u32 = 366;

/// Keep contacts whose next birthday is within the window, soonest first
pub fn select_upcoming(contacts: Vec<Contact>, today: NaiveDate, days: u32) -> Vec<Contact> {
    let last_day = today
        .checked_add_days(Days::new(u64::from(days.min(MAX_WINDOW_DAYS))))
        .unwrap_or(NaiveDate::MAX);

    let mut upcoming: Vec<(NaiveDate, Contact)> = contacts
        .into_iter()
        .filter_map(|contact| {
            let next = next_birthday(contact.birth_date?, today)?;
            (next <= last_day).then_some((next, contact))
        })
        .collect();

    upcoming.sort_by(|(a_date, a), (b_date, b)| a_date.cmp(b_date).then(a.id.cmp(&b.id)));
    upcoming.into_iter().map(|(_, contact)| contact).collect()
}
