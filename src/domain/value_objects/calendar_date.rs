//! Calendar Date Value Object
//!
//! Dates in timelines belong to arbitrary (often fictional) calendars, so
//! they are plain `{year, month, day}` triples with no validation against
//! a real calendar. Years may be negative.

use serde::Serialize;
use serde_yaml_ng::Value;

/// Largest accepted year magnitude. Keeps `sort_key` inside `i64` for any
/// `u32` month and day.
const YEAR_LIMIT: i64 = 100_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CalendarDate {
    pub year: i64,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub fn new(year: i64, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Composite ordering key: `year*10000 + month*100 + day`
    pub fn sort_key(&self) -> i64 {
        self.year
            .saturating_mul(10_000)
            .saturating_add(i64::from(self.month) * 100)
            .saturating_add(i64::from(self.day))
    }

    /// Checked constructor used by the parsers
    fn checked(year: i64, month: u32, day: u32) -> Option<Self> {
        if month == 0 || day == 0 || year.unsigned_abs() > YEAR_LIMIT.unsigned_abs() {
            return None;
        }
        Some(Self::new(year, month, day))
    }

    /// Parse a `Y-M-D`-prefixed string (`1165-03-01`, `1165-3-1 dawn`, `-20-01-05`)
    pub fn parse_str(s: &str) -> Option<Self> {
        let s = s.trim();
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let mut parts = rest.splitn(3, '-');
        let year = leading_digits(parts.next()?)?;
        let month = leading_digits(parts.next()?)?;
        let day_part = parts.next()?;
        let day_digits: String = day_part.chars().take_while(|c| c.is_ascii_digit()).collect();
        if day_digits.is_empty() {
            return None;
        }

        let year: i64 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        let day: u32 = day_digits.parse().ok()?;
        Self::checked(if negative { -year } else { year }, month, day)
    }

    /// Parse either shape accepted in document metadata
    pub fn from_yaml(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse_str(s),
            Value::Mapping(map) => {
                let year = yaml_int(map.get("year")?)?;
                let month = u32::try_from(yaml_int(map.get("month")?)?).ok()?;
                let day = u32::try_from(yaml_int(map.get("day")?)?).ok()?;
                Self::checked(year, month, day)
            }
            Value::Tagged(tagged) => Self::from_yaml(&tagged.value),
            _ => None,
        }
    }
}

fn leading_digits(s: &str) -> Option<&str> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        Some(s)
    } else {
        None
    }
}

fn yaml_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
