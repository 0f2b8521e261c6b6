use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Number of school days in one A/B cycle.
pub const CYCLE_DAYS: usize = 10;

const DAY_NAMES: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Time of day in minutes since midnight. Travels over the wire as an HHMM integer.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Hash)]
pub struct Time(pub u16);

impl Time {
    pub fn from_hhmm(hhmm: u16) -> Option<Time> {
        let (hours, minutes) = (hhmm / 100, hhmm % 100);
        if hours > 23 || minutes > 59 {
            return None;
        }
        Some(Time(hours * 60 + minutes))
    }

    pub fn hhmm(self) -> u16 {
        (self.0 / 60) * 100 + self.0 % 60
    }

    /// Accepts `HH:MM` as well as a bare `HHMM`.
    pub fn parse(s: &str) -> Option<Time> {
        let s = s.trim();
        match s.split_once(':') {
            Some((h, m)) => {
                let hours: u16 = h.parse().ok()?;
                let minutes: u16 = m.parse().ok()?;
                if minutes > 59 {
                    return None;
                }
                Time::from_hhmm(hours.checked_mul(100)? + minutes)
            }
            None => Time::from_hhmm(s.parse().ok()?),
        }
    }

    pub fn minutes_between(self, other: Time) -> u16 {
        self.0.abs_diff(other.0)
    }

    pub fn is_within(self, other: Time, tolerance: u16) -> bool {
        self.minutes_between(other) <= tolerance
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.hhmm())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTime {
    Number(u64),
    Text(String),
}

impl RawTime {
    fn into_time<E: serde::de::Error>(self) -> Result<Option<Time>, E> {
        match self {
            RawTime::Text(text) if text.trim().is_empty() => Ok(None),
            RawTime::Text(text) => Time::parse(&text)
                .map(Some)
                .ok_or_else(|| E::custom(format!("invalid time '{}', expected HH:MM", text))),
            RawTime::Number(n) => u16::try_from(n)
                .ok()
                .and_then(Time::from_hhmm)
                .map(Some)
                .ok_or_else(|| E::custom(format!("invalid time {}, expected HHMM", n))),
        }
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawTime::deserialize(deserializer)?
            .into_time()?
            .ok_or_else(|| D::Error::custom("empty time"))
    }
}

/// Optional time field where `null`, a missing key and `""` all mean "not set".
pub fn deserialize_optional<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Time>, D::Error> {
    match Option::<RawTime>::deserialize(deserializer)? {
        Some(raw) => raw.into_time(),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Schoolbound,
    Homebound,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Schoolbound, Direction::Homebound];

    pub fn is_schoolbound(self) -> bool {
        self == Direction::Schoolbound
    }

    /// The earlier of two times for the morning, the later for the afternoon.
    pub fn extreme(self, a: Time, b: Time) -> Time {
        match self {
            Direction::Schoolbound => a.min(b),
            Direction::Homebound => a.max(b),
        }
    }

    pub(crate) fn serialize_as_flag<S: Serializer>(
        direction: &Direction,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(direction.is_schoolbound())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Schoolbound => write!(f, "schoolbound"),
            Direction::Homebound => write!(f, "homebound"),
        }
    }
}

/// Human readable day label, e.g. `Wednesday (B)`.
pub fn day_name(day: usize) -> String {
    let week = if day < 5 { "A" } else { "B" };
    format!("{} ({})", DAY_NAMES[day % 5], week)
}

/// Short day tag used in pool names, e.g. `wed-b`.
pub fn day_tag(day: usize) -> String {
    let week = if day < 5 { "a" } else { "b" };
    format!("{}-{}", DAY_NAMES[day % 5][..3].to_lowercase(), week)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleDay {
    pub day_of_week: String,
    pub is_week_a: bool,
    pub unique_number: u8,
}

impl CycleDay {
    pub fn new(day: usize) -> CycleDay {
        CycleDay {
            day_of_week: DAY_NAMES[day % 5].to_uppercase(),
            is_week_a: day < 5,
            unique_number: (day + 1) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hhmm_conversion() {
        assert_eq!(Time::from_hhmm(755), Some(Time(475)));
        assert_eq!(Time(475).hhmm(), 755);
        assert_eq!(Time::from_hhmm(2400), None);
        assert_eq!(Time::from_hhmm(1260), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Time::parse("07:55"), Some(Time(475)));
        assert_eq!(Time::parse("1330"), Some(Time(810)));
        assert_eq!(Time::parse("7:5"), Some(Time(425)));
        assert_eq!(Time::parse("25:00"), None);
        assert_eq!(Time::parse("12:75"), None);
        assert_eq!(Time::parse("noon"), None);
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        let a = Time::from_hhmm(800).unwrap();
        let b = Time::from_hhmm(830).unwrap();
        assert!(a.is_within(b, 30));
        assert!(!a.is_within(b, 29));
        // crosses the hour boundary in minutes, not in HHMM digits
        assert_eq!(Time::from_hhmm(755).unwrap().minutes_between(Time::from_hhmm(805).unwrap()), 10);
    }

    #[test]
    fn test_serde_wire_format() {
        let t: Time = serde_json::from_str("755").unwrap();
        assert_eq!(t, Time(475));
        let t: Time = serde_json::from_str("\"13:05\"").unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "1305");
        assert!(serde_json::from_str::<Time>("2500").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Time::from_hhmm(905).unwrap().to_string(), "09:05");
    }

    #[test]
    fn test_day_labels() {
        assert_eq!(day_name(0), "Monday (A)");
        assert_eq!(day_name(7), "Wednesday (B)");
        assert_eq!(day_tag(9), "fri-b");
        assert_eq!(
            CycleDay::new(6),
            CycleDay { day_of_week: "TUESDAY".to_string(), is_week_a: false, unique_number: 7 }
        );
    }

    #[test]
    fn test_extreme() {
        let early = Time(400);
        let late = Time(500);
        assert_eq!(Direction::Schoolbound.extreme(early, late), early);
        assert_eq!(Direction::Homebound.extreme(early, late), late);
    }
}
