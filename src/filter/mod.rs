use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::char;
use nom::combinator::all_consuming;
use nom::IResult;
use nom::multi::separated_list1;
use nom::sequence::separated_pair;
use serde::{Deserialize, Serialize};
use crate::common::{Error, Result};
use crate::preset::Preset;
use crate::range::{format_date, parse_optional_date, DateRange};
use crate::resolver::PresetRangeResolver;

/// State of one period filter control: the selected preset and the dates shown in its inputs.
///
/// Transitions consume the old state and return the new one, the caller decides where it lives
/// (URL, local storage, a view model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodFilter {
    pub preset: Option<Preset>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl PeriodFilter {
    /// A preset was picked from the menu
    pub fn select_preset(self, preset: Preset, resolver: &PresetRangeResolver, now: DateTime<Utc>) -> Result<PeriodFilter> {
        let range = resolver.resolve(Some(preset), now)?;
        Ok(PeriodFilter { preset: Some(preset), from: range.from, to: range.to })
    }

    /// The "from" input was edited. `None` means it was cleared.
    pub fn set_from(self, from: Option<NaiveDate>, resolver: &PresetRangeResolver, now: DateTime<Utc>) -> PeriodFilter {
        let preset = resolver.detect_preset_at(from, self.to, now);
        PeriodFilter { preset: Some(preset), from, to: self.to }
    }

    /// The "to" input was edited. `None` means it was cleared.
    pub fn set_to(self, to: Option<NaiveDate>, resolver: &PresetRangeResolver, now: DateTime<Utc>) -> PeriodFilter {
        let preset = resolver.detect_preset_at(self.from, to, now);
        PeriodFilter { preset: Some(preset), from: self.from, to }
    }

    pub fn range(&self) -> DateRange {
        DateRange { from: self.from, to: self.to }
    }

    /// Text on the button that opens the preset menu. Only presets offered in the menu get
    /// their own label, so a range detected as `today` still reads as a plain period.
    pub fn button_label(&self) -> &'static str {
        match self.preset {
            Some(p) if Preset::MENU.contains(&p) => p.label(),
            _ => Preset::Custom.label(),
        }
    }

    /// Query parameters describing this filter, keyed `{prefix}_preset`, `{prefix}_from` and
    /// `{prefix}_to`. A bounded preset is re-resolved at `now` so a bookmarked "current month"
    /// keeps meaning the current month.
    pub fn to_query_params(&self, prefix: &str, resolver: &PresetRangeResolver, now: DateTime<Utc>) -> Result<Vec<(String, String)>> {
        let mut params = vec![];
        match self.preset {
            Some(preset) if preset.is_bounded() => {
                params.push((key(prefix, "preset"), preset.as_str().to_string()));
                let range = resolver.resolve(Some(preset), now)?;
                push_bounds(&mut params, prefix, range);
            }
            Some(Preset::Custom) | None => push_bounds(&mut params, prefix, self.range()),
            Some(_) => {}
        }
        Ok(params)
    }

    /// Read a filter back from query parameters. Keys with other prefixes are ignored.
    pub fn from_query_params(prefix: &str, params: &[(String, String)]) -> Result<PeriodFilter> {
        let mut filter = PeriodFilter::default();
        for (k, v) in params {
            let name = match k.strip_prefix(prefix).and_then(|rest| rest.strip_prefix('_')) {
                Some(name) => name,
                None => continue,
            };

            match name {
                "preset" if v.is_empty() => filter.preset = None,
                "preset" => filter.preset = Some(v.parse::<Preset>()?),
                "from" => filter.from = parse_optional_date(v)?,
                "to" => filter.to = parse_optional_date(v)?,
                _ => debug!("Ignoring query parameter {}", k),
            }
        }
        Ok(filter)
    }
}

fn key(prefix: &str, name: &str) -> String {
    format!("{prefix}_{name}")
}

fn push_bounds(params: &mut Vec<(String, String)>, prefix: &str, range: DateRange) {
    if let Some(from) = range.from {
        params.push((key(prefix, "from"), format_date(from)));
    }
    if let Some(to) = range.to {
        params.push((key(prefix, "to"), format_date(to)));
    }
}

/// key=value
fn query_pair(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        take_while1(|c: char| c != '=' && c != '&'),
        char('='),
        take_while(|c: char| c != '&'),
    )(input)
}

/// Split `a=1&b=2` (optionally starting with `?`) into pairs. Values are taken verbatim.
pub fn parse_query_string(input: &str) -> Result<Vec<(String, String)>> {
    let input = input.trim();
    let input = input.strip_prefix('?').unwrap_or(input);
    if input.is_empty() {
        return Ok(vec![]);
    }

    match all_consuming(separated_list1(char('&'), query_pair))(input) {
        Ok((_, pairs)) => Ok(pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()),
        Err(e) => Err(Error::InvalidQuery(e.to_string())),
    }
}

pub fn to_query_string(params: &[(String, String)]) -> String {
    params.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<String>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use crate::common::Error;
    use crate::filter::{parse_query_string, to_query_string, PeriodFilter};
    use crate::preset::Preset;
    use crate::resolver::PresetRangeResolver;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// 2024-03-15 10:00 in UTC+6
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 4, 0, 0).unwrap()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_select_preset() {
        let resolver = PresetRangeResolver::default();
        let filter = PeriodFilter::default().select_preset(Preset::CurrentMonth, &resolver, now()).unwrap();
        assert_eq!(filter, PeriodFilter { preset: Some(Preset::CurrentMonth), from: Some(ymd(2024, 3, 1)), to: Some(ymd(2024, 3, 31)) });
        assert_eq!(filter.button_label(), "Текущий месяц");

        let filter = filter.select_preset(Preset::AllTime, &resolver, now()).unwrap();
        assert_eq!(filter, PeriodFilter { preset: Some(Preset::AllTime), from: None, to: None });
        assert_eq!(filter.button_label(), "Все время");
    }

    #[test]
    fn test_edit_bounds() {
        let resolver = PresetRangeResolver::default();
        let filter = PeriodFilter::default().select_preset(Preset::CurrentMonth, &resolver, now()).unwrap();

        // Moving "to" off the month end makes it a custom range
        let filter = filter.set_to(Some(ymd(2024, 3, 20)), &resolver, now());
        assert_eq!(filter.preset, Some(Preset::Custom));
        assert_eq!(filter.button_label(), "Период");

        // Editing the dates back to a known range picks the preset up again
        let filter = filter.set_from(Some(ymd(2024, 3, 11)), &resolver, now());
        assert_eq!(filter.preset, Some(Preset::Custom));
        let filter = filter.set_to(Some(ymd(2024, 3, 17)), &resolver, now());
        assert_eq!(filter.preset, Some(Preset::CurrentWeek));

        // Today and yesterday are detected but have no menu entry
        let filter = filter.set_from(Some(ymd(2024, 3, 15)), &resolver, now()).set_to(Some(ymd(2024, 3, 15)), &resolver, now());
        assert_eq!(filter.preset, Some(Preset::Today));
        assert_eq!(filter.button_label(), "Период");
        let filter = filter.set_from(Some(ymd(2024, 3, 14)), &resolver, now()).set_to(Some(ymd(2024, 3, 14)), &resolver, now());
        assert_eq!(filter.preset, Some(Preset::Yesterday));
        assert_eq!(filter.button_label(), "Период");

        // Clearing a bound
        let filter = filter.set_from(None, &resolver, now());
        assert_eq!(filter, PeriodFilter { preset: Some(Preset::AllTime), from: None, to: Some(ymd(2024, 3, 14)) });
    }

    #[test]
    fn test_to_query_params() {
        let resolver = PresetRangeResolver::default();

        let filter = PeriodFilter { preset: Some(Preset::LastQuarter), from: None, to: None };
        let params = filter.to_query_params("payment_date", &resolver, now()).unwrap();
        assert_eq!(params, pairs(&[
            ("payment_date_preset", "last_quarter"),
            ("payment_date_from", "2023-10-01"),
            ("payment_date_to", "2023-12-31"),
        ]));

        let filter = PeriodFilter { preset: Some(Preset::Custom), from: Some(ymd(2024, 2, 3)), to: None };
        assert_eq!(filter.to_query_params("date", &resolver, now()).unwrap(), pairs(&[("date_from", "2024-02-03")]));

        let filter = PeriodFilter { preset: None, from: None, to: Some(ymd(2024, 2, 3)) };
        assert_eq!(filter.to_query_params("date", &resolver, now()).unwrap(), pairs(&[("date_to", "2024-02-03")]));

        let filter = PeriodFilter { preset: Some(Preset::AllTime), from: Some(ymd(2024, 2, 3)), to: None };
        assert!(filter.to_query_params("date", &resolver, now()).unwrap().is_empty());
        assert!(PeriodFilter::default().to_query_params("date", &resolver, now()).unwrap().is_empty());
    }

    #[test]
    fn test_from_query_params() {
        let params = parse_query_string("?date_preset=current_week&date_from=2024-03-11&date_to=2024-03-17&page=2").unwrap();
        let filter = PeriodFilter::from_query_params("date", &params).unwrap();
        assert_eq!(filter, PeriodFilter { preset: Some(Preset::CurrentWeek), from: Some(ymd(2024, 3, 11)), to: Some(ymd(2024, 3, 17)) });

        // Another filter's keys on the same page are not ours
        let params = pairs(&[("due_date_preset", "last_year"), ("date_from", "")]);
        assert_eq!(PeriodFilter::from_query_params("date", &params).unwrap(), PeriodFilter::default());

        let params = pairs(&[("date_preset", "fortnight")]);
        assert_eq!(PeriodFilter::from_query_params("date", &params), Err(Error::InvalidPreset("fortnight".into())));

        let params = pairs(&[("date_to", "15.03.2024")]);
        assert_eq!(PeriodFilter::from_query_params("date", &params), Err(Error::InvalidDate("15.03.2024".into())));
    }

    #[test]
    fn test_parse_query_string() {
        assert!(parse_query_string("").unwrap().is_empty());
        assert!(parse_query_string("?").unwrap().is_empty());
        assert_eq!(parse_query_string("a=1&b=&c=3").unwrap(), pairs(&[("a", "1"), ("b", ""), ("c", "3")]));

        assert!(matches!(parse_query_string("a=1&b"), Err(Error::InvalidQuery(_))));
        assert!(matches!(parse_query_string("=1"), Err(Error::InvalidQuery(_))));
        assert!(matches!(parse_query_string("a=1&&b=2"), Err(Error::InvalidQuery(_))));

        let params = pairs(&[("date_preset", "today"), ("date_from", "2024-03-15")]);
        assert_eq!(to_query_string(&params), "date_preset=today&date_from=2024-03-15");
        assert_eq!(parse_query_string(&to_query_string(&params)).unwrap(), params);
    }
}
