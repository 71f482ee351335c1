use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::common::Error;

/// Named shorthand for a calendar date range relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Today,
    Yesterday,
    #[serde(rename = "today_plus_7")]
    TodayPlus7,
    #[serde(rename = "today_plus_30")]
    TodayPlus30,
    CurrentWeek,
    CurrentMonth,
    CurrentQuarter,
    CurrentYear,
    LastWeek,
    LastMonth,
    LastQuarter,
    LastYear,
    AllTime,
    Custom,
}

impl Preset {
    pub const ALL: [Preset; 14] = [
        Preset::Today,
        Preset::Yesterday,
        Preset::TodayPlus7,
        Preset::TodayPlus30,
        Preset::CurrentWeek,
        Preset::CurrentMonth,
        Preset::CurrentQuarter,
        Preset::CurrentYear,
        Preset::LastWeek,
        Preset::LastMonth,
        Preset::LastQuarter,
        Preset::LastYear,
        Preset::AllTime,
        Preset::Custom,
    ];

    /// Presets offered in the period dropdown, in display order
    pub const MENU: [Preset; 11] = [
        Preset::TodayPlus7,
        Preset::TodayPlus30,
        Preset::CurrentWeek,
        Preset::CurrentMonth,
        Preset::CurrentQuarter,
        Preset::CurrentYear,
        Preset::LastWeek,
        Preset::LastMonth,
        Preset::LastQuarter,
        Preset::LastYear,
        Preset::AllTime,
    ];

    /// Candidates tried by preset detection. First exact match wins.
    pub const DETECTION_ORDER: [Preset; 6] = [
        Preset::Today,
        Preset::Yesterday,
        Preset::CurrentWeek,
        Preset::CurrentMonth,
        Preset::CurrentQuarter,
        Preset::CurrentYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Today => "today",
            Preset::Yesterday => "yesterday",
            Preset::TodayPlus7 => "today_plus_7",
            Preset::TodayPlus30 => "today_plus_30",
            Preset::CurrentWeek => "current_week",
            Preset::CurrentMonth => "current_month",
            Preset::CurrentQuarter => "current_quarter",
            Preset::CurrentYear => "current_year",
            Preset::LastWeek => "last_week",
            Preset::LastMonth => "last_month",
            Preset::LastQuarter => "last_quarter",
            Preset::LastYear => "last_year",
            Preset::AllTime => "all_time",
            Preset::Custom => "custom",
        }
    }

    /// Label shown on the dashboard's period chips
    pub fn label(&self) -> &'static str {
        match self {
            Preset::Today => "Сегодня",
            Preset::Yesterday => "Вчера",
            Preset::TodayPlus7 => "Сегодня ± 7 дней",
            Preset::TodayPlus30 => "Сегодня ± 30 дней",
            Preset::CurrentWeek => "Текущая неделя",
            Preset::CurrentMonth => "Текущий месяц",
            Preset::CurrentQuarter => "Текущий квартал",
            Preset::CurrentYear => "Текущий год",
            Preset::LastWeek => "Прошлая неделя",
            Preset::LastMonth => "Прошлый месяц",
            Preset::LastQuarter => "Прошлый квартал",
            Preset::LastYear => "Прошлый год",
            Preset::AllTime => "Все время",
            Preset::Custom => "Период",
        }
    }

    /// false for the presets without concrete bounds
    pub fn is_bounded(&self) -> bool {
        !matches!(self, Preset::AllTime | Preset::Custom)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL.iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| Error::InvalidPreset(s.to_string()))
    }
}
