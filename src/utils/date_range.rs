use chrono::{Days, NaiveDate};
use std::mem::replace;

/// Iterator over every calendar day from the start date through the end date (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    pub fn day_count(&self) -> usize {
        if self.0 > self.1 {
            0
        } else {
            (self.1 - self.0).num_days() as usize + 1
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0 <= date && date <= self.1
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0.checked_add_days(Days::new(1))?;
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}
