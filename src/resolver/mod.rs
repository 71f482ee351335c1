//! Preset range resolution and detection.
//!
//! `resolve` turns a symbolic preset plus a reference instant into concrete calendar dates in the
//! configured timezone. `detect_preset` goes the other way for a limited set of candidates and is
//! always evaluated against the instant of the detection call, not the instant the range was
//! produced at.


use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use log::debug;
use crate::common::{Error, Result};
use crate::preset::Preset;
use crate::range::DateRange;
use crate::util::{month_of, previous_month, previous_quarter, quarter_index, quarter_of, week_of, year_of};

/// Zone the dashboard's business day runs in, UTC+6 all year round
pub const DEFAULT_TIMEZONE: &str = "Asia/Bishkek";

/// Resolves presets against "now" in a fixed timezone. Holds no mutable state, so one value can
/// be shared freely between callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetRangeResolver {
    timezone: Tz,
}

impl Default for PresetRangeResolver {
    fn default() -> Self {
        PresetRangeResolver { timezone: Tz::Asia__Bishkek }
    }
}

impl PresetRangeResolver {
    pub fn new(timezone: Tz) -> PresetRangeResolver {
        PresetRangeResolver { timezone }
    }

    /// Build a resolver from an IANA zone name, e.g. `Europe/Berlin`
    pub fn from_timezone_name(name: &str) -> Result<PresetRangeResolver> {
        let timezone = parse_timezone(name)?;
        Ok(PresetRangeResolver { timezone })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Calendar date of `now` in the resolver's timezone. Fails when the zone offset pushes the
    /// local time past what chrono can represent.
    pub fn today(&self, now: DateTime<Utc>) -> Result<NaiveDate> {
        let utc = now.naive_utc();
        let offset = self.timezone.offset_from_utc_datetime(&utc).fix();
        utc.checked_add_signed(Duration::seconds(offset.local_minus_utc() as i64))
            .map(|local| local.date())
            .ok_or_else(|| Error::DateOutOfRange(format!("{now} in {}", self.timezone)))
    }

    /// Concrete range for a preset. `None`, `all_time` and `custom` have no bounds.
    pub fn resolve(&self, preset: Option<Preset>, now: DateTime<Utc>) -> Result<DateRange> {
        let preset = match preset {
            Some(p) if p.is_bounded() => p,
            _ => return Ok(DateRange::unbounded()),
        };

        let today = self.today(now)?;
        let out_of_range = || Error::DateOutOfRange(format!("{preset} relative to {today}"));

        let bounds = match preset {
            Preset::AllTime | Preset::Custom => None,
            Preset::Today => Some((today, today)),
            Preset::Yesterday => today.pred_opt().map(|d| (d, d)),
            Preset::TodayPlus7 => today.checked_add_days(Days::new(7)).map(|to| (today, to)),
            Preset::TodayPlus30 => today.checked_add_days(Days::new(30)).map(|to| (today, to)),
            Preset::CurrentWeek => week_of(today),
            Preset::CurrentMonth => month_of(today.year(), today.month()),
            Preset::CurrentQuarter => quarter_of(today.year(), quarter_index(today)),
            Preset::CurrentYear => year_of(today.year()),
            Preset::LastWeek => today.checked_sub_days(Days::new(7)).and_then(week_of),
            Preset::LastMonth => {
                let (year, month) = previous_month(today.year(), today.month());
                month_of(year, month)
            }
            Preset::LastQuarter => {
                let (year, quarter) = previous_quarter(today.year(), quarter_index(today));
                quarter_of(year, quarter)
            }
            Preset::LastYear => year_of(today.year() - 1),
        };

        let (from, to) = bounds.ok_or_else(out_of_range)?;
        let range = DateRange::new(from, to);
        debug!("Resolved {} at {} ({}) to {}", preset, now, self.timezone, range);
        Ok(range)
    }

    /// Parse a preset tag and resolve it. Unknown tags are rejected, never coerced.
    pub fn resolve_tag(&self, tag: Option<&str>, now: DateTime<Utc>) -> Result<DateRange> {
        let preset = tag.map(str::parse::<Preset>).transpose()?;
        self.resolve(preset, now)
    }

    /// Preset matching `[from, to]` when evaluated at `now`.
    ///
    /// Only `Preset::DETECTION_ORDER` is tried and the first exact match wins. A missing bound
    /// gives `all_time`, anything else `custom`. A range that was `today` yesterday is `yesterday`
    /// now, and one produced as `last_month` is never recognised.
    pub fn detect_preset_at(&self, from: Option<NaiveDate>, to: Option<NaiveDate>, now: DateTime<Utc>) -> Preset {
        let (from, to) = match (from, to) {
            (Some(from), Some(to)) => (from, to),
            _ => return Preset::AllTime,
        };

        let wanted = DateRange::new(from, to);
        let detected = Preset::DETECTION_ORDER.iter()
            .copied()
            .find(|candidate| match self.resolve(Some(*candidate), now) {
                Ok(range) => range == wanted,
                Err(_) => false,
            })
            .unwrap_or(Preset::Custom);

        debug!("Detected {} for {} at {}", detected, wanted, now);
        detected
    }

    /// `detect_preset_at` against the current wall clock
    pub fn detect_preset(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Preset {
        self.detect_preset_at(from, to, Utc::now())
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim().parse::<Tz>().map_err(|_| Error::InvalidTimezone(name.to_string()))
}

/// Resolve a preset in the named timezone
pub fn resolve(preset: Option<Preset>, now: DateTime<Utc>, timezone: &str) -> Result<DateRange> {
    PresetRangeResolver::from_timezone_name(timezone)?.resolve(preset, now)
}

/// Detect a preset for `[from, to]` using the current instant and the default timezone
pub fn detect_preset(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Preset {
    PresetRangeResolver::default().detect_preset(from, to)
}
