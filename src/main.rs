use std::path::PathBuf;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, CellAlignment, Table, TableComponent};
use env_logger::Env;
use log::info;
use serde::Serialize;

use periodfilter::config::Config;
use periodfilter::filter::{parse_query_string, to_query_string};
use periodfilter::range::{format_date, parse_optional_date};
use periodfilter::{DateRange, PeriodFilter, Preset, PresetRangeResolver};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// Config file path, defaults to <config dir>/periodfilter/config.toml
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// IANA timezone, overrides the config file
    #[clap(long, global = true)]
    tz: Option<String>,

    /// Reference instant in RFC 3339, defaults to the current time
    #[clap(long, global = true, value_parser = parse_instant)]
    now: Option<DateTime<Utc>>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a preset into concrete dates
    Resolve {
        /// Preset tag, e.g. current_month
        preset: String,

        /// Print JSON instead of text
        #[clap(long)]
        json: bool,
    },
    /// Detect the preset matching a date range, '-' for a missing bound
    Detect {
        from: String,
        to: String,
    },
    /// List the menu presets with their resolved dates
    Presets,
    /// Decode a filter from a query string and re-encode it
    Params {
        query: String,

        /// Query key prefix, overrides the config file
        #[clap(long)]
        prefix: Option<String>,
    },
}

#[derive(Serialize)]
struct Resolved<'a> {
    preset: Preset,
    label: &'a str,
    #[serde(flatten)]
    range: DateRange,
}

fn parse_instant(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected RFC 3339 timestamp: {e}"))
}

fn parse_bound(s: &str) -> Result<Option<chrono::NaiveDate>> {
    if s == "-" {
        return Ok(None);
    }
    Ok(parse_optional_date(s)?)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match (&cli.config, Config::default_path()) {
        (Some(path), _) => Config::load_required_file(path).with_context(|| format!("loading {}", path.display()))?,
        (None, Some(path)) => Config::load_from_file(&path).with_context(|| format!("loading {}", path.display()))?,
        (None, None) => Config::default(),
    };
    if let Some(tz) = &cli.tz {
        config.timezone = tz.clone();
    }
    Ok(config)
}

fn print_presets(resolver: &PresetRangeResolver, now: DateTime<Utc>, display_format: &str) -> Result<()> {
    let mut table = Table::new();
    table.remove_style(TableComponent::HorizontalLines);
    table.remove_style(TableComponent::MiddleIntersections);
    table.remove_style(TableComponent::LeftBorderIntersections);
    table.remove_style(TableComponent::RightBorderIntersections);
    table.set_header(vec!["Preset", "Label", "From", "To", "Display"]);

    for preset in Preset::MENU {
        let range = resolver.resolve(Some(preset), now)?;
        let bound = |d: Option<chrono::NaiveDate>| d.map(format_date).unwrap_or_default();
        table.add_row(vec![
            Cell::new(preset.as_str()),
            Cell::new(preset.label()),
            Cell::new(bound(range.from)).set_alignment(CellAlignment::Right),
            Cell::new(bound(range.to)).set_alignment(CellAlignment::Right),
            Cell::new(range.format_display(display_format)),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli: Cli = Cli::parse();
    let config = load_config(&cli)?;
    let resolver = config.resolver()?;
    let now = cli.now.unwrap_or_else(Utc::now);
    info!("Reference instant {} ({} in {})", now, resolver.today(now)?, resolver.timezone());

    match &cli.command {
        Command::Resolve { preset, json } => {
            let preset: Preset = preset.parse()?;
            let range = resolver.resolve(Some(preset), now)?;
            if *json {
                let resolved = Resolved { preset, label: preset.label(), range };
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else if range.is_unbounded() {
                println!("{range} ({} has no bounds)", preset);
            } else {
                println!("{range}");
                println!("{}", range.format_display(&config.display_format));
            }
        }
        Command::Detect { from, to } => {
            let preset = resolver.detect_preset_at(parse_bound(from)?, parse_bound(to)?, now);
            println!("{} ({})", preset, preset.label());
        }
        Command::Presets => print_presets(&resolver, now, &config.display_format)?,
        Command::Params { query, prefix } => {
            let prefix = prefix.as_deref().unwrap_or(&config.url_param_prefix);
            let params = parse_query_string(query)?;
            let filter = PeriodFilter::from_query_params(prefix, &params)?;
            println!("{}: {}", filter.button_label(), filter.range());
            println!("{}", to_query_string(&filter.to_query_params(prefix, &resolver, now)?));
        }
    }

    Ok(())
}
