use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::ValidationError;

const PERIOD_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Fiscal period-end date (`YYYY-MM-DD`, no time component).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodDate(Date);

impl PeriodDate {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), PERIOD_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidPeriodDate {
                value: input.to_owned(),
            })
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub fn format(self) -> Result<String, time::error::Format> {
        self.0.format(PERIOD_FORMAT)
    }
}

impl Display for PeriodDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let formatted = self.format().map_err(|_| std::fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl Serialize for PeriodDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self.format().map_err(S::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for PeriodDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
