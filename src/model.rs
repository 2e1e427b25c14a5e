use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use time::{Date, Time};

/// Record ids are per-table auto-increment integers assigned by the store.
pub(crate) type Id = u32;

/// A timed appointment on a single calendar day.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Event {
    pub(crate) id: Id,
    pub(crate) date: Date,
    pub(crate) start: Time,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) end: Option<Time>,
    pub(crate) content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) category: Option<Id>,
}

impl Event {
    /// "09:00 – 10:00" with an end time, "09:00" without.
    pub(crate) fn time_range(&self) -> String {
        match self.end {
            Some(end) => format!("{} – {}", hhmm(self.start), hhmm(end)),
            None => hhmm(self.start),
        }
    }
}

/// A checklist item on a single calendar day.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Todo {
    pub(crate) id: Id,
    pub(crate) date: Date,
    pub(crate) content: String,
    pub(crate) completed: bool,
}

/// A named color tag attachable to events.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Category {
    pub(crate) id: Id,
    pub(crate) name: String,
    pub(crate) color: Swatch,
}

/// The fixed palette categories may be tinted with.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Swatch {
    Green,
    Blue,
    Red,
    Yellow,
    Magenta,
    Cyan,
}

impl Swatch {
    pub(crate) const ALL: [Swatch; 6] = [
        Swatch::Green,
        Swatch::Blue,
        Swatch::Red,
        Swatch::Yellow,
        Swatch::Magenta,
        Swatch::Cyan,
    ];

    pub(crate) fn color(self) -> Color {
        match self {
            Swatch::Green => Color::LightGreen,
            Swatch::Blue => Color::LightBlue,
            Swatch::Red => Color::LightRed,
            Swatch::Yellow => Color::LightYellow,
            Swatch::Magenta => Color::LightMagenta,
            Swatch::Cyan => Color::LightCyan,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Swatch::Green => "green",
            Swatch::Blue => "blue",
            Swatch::Red => "red",
            Swatch::Yellow => "yellow",
            Swatch::Magenta => "magenta",
            Swatch::Cyan => "cyan",
        }
    }

    pub(crate) fn next(self) -> Swatch {
        let i = Swatch::ALL
            .iter()
            .position(|&sw| sw == self)
            .expect("every swatch is in ALL");
        Swatch::ALL[(i + 1) % Swatch::ALL.len()]
    }

    pub(crate) fn previous(self) -> Swatch {
        let i = Swatch::ALL
            .iter()
            .position(|&sw| sw == self)
            .expect("every swatch is in ALL");
        Swatch::ALL[(i + Swatch::ALL.len() - 1) % Swatch::ALL.len()]
    }
}

pub(crate) fn hhmm(t: Time) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

/// "2026-08-06", as entered in forms and printed by the CLI.
pub(crate) fn ymd(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn test_event_json_round_trip() {
        let event = Event {
            id: 7,
            date: date!(2026 - 08 - 06),
            start: time!(14:00),
            end: Some(time!(15:30)),
            content: "dentist".into(),
            category: Some(2),
        };
        let text = serde_json::to_string(&event).unwrap();
        assert_eq!(serde_json::from_str::<Event>(&text).unwrap(), event);
    }

    #[test]
    fn test_event_json_round_trip_without_optionals() {
        let event = Event {
            id: 1,
            date: date!(2023 - 02 - 28),
            start: time!(9:00),
            end: None,
            content: "standup".into(),
            category: None,
        };
        let text = serde_json::to_string(&event).unwrap();
        assert!(!text.contains("end"));
        assert!(!text.contains("category"));
        assert_eq!(serde_json::from_str::<Event>(&text).unwrap(), event);
    }

    #[test]
    fn test_time_range() {
        let mut event = Event {
            id: 1,
            date: date!(2026 - 08 - 06),
            start: time!(9:05),
            end: Some(time!(10:00)),
            content: "standup".into(),
            category: None,
        };
        assert_eq!(event.time_range(), "09:05 – 10:00");
        event.end = None;
        assert_eq!(event.time_range(), "09:05");
    }

    #[test]
    fn test_swatch_cycle_covers_palette() {
        let mut sw = Swatch::Green;
        for _ in 0..Swatch::ALL.len() {
            sw = sw.next();
        }
        assert_eq!(sw, Swatch::Green);
        assert_eq!(Swatch::Blue.previous(), Swatch::Green);
        assert_eq!(Swatch::Green.previous(), Swatch::Cyan);
    }

    #[test]
    fn test_ymd() {
        assert_eq!(ymd(date!(2026 - 08 - 06)), "2026-08-06");
        assert_eq!(ymd(date!(0987 - 12 - 31)), "0987-12-31");
    }
}
