use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sdg_tracker::catalog::{self, sdg_goal};
use sdg_tracker::{Client, Country, DateRange, SeriesResult, Settings, stats};
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(
    name = "sdg",
    version,
    about = "Browse World Bank sustainability (SDG) indicators by country"
)]
struct Cli {
    /// API root (overrides SDG_API_BASE_URL).
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Request timeout in seconds (overrides SDG_TIMEOUT_SECS).
    #[arg(long, global = true)]
    timeout: Option<u64>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List countries (aggregates excluded).
    Countries(CountriesArgs),
    /// List the tracked indicators.
    Indicators(FormatArgs),
    /// Fetch one country/indicator series.
    Series(SeriesArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutFormat {
    #[default]
    Table,
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct FormatArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutFormat::Table)]
    format: OutFormat,
}

#[derive(Args, Debug)]
struct CountriesArgs {
    /// Only countries whose name contains this text (case-insensitive).
    #[arg(short, long)]
    search: Option<String>,
    #[command(flatten)]
    out: FormatArgs,
}

#[derive(Args, Debug)]
struct SeriesArgs {
    /// Country code (e.g., USA, FRA, WLD)
    #[arg(short, long)]
    country: String,
    /// Indicator code (e.g., EN.ATM.CO2E.PC)
    #[arg(short, long)]
    indicator: String,
    /// First year (default 2000 or SDG_DATE_FROM)
    #[arg(long)]
    from: Option<i32>,
    /// Last year (default 2024 or SDG_DATE_TO)
    #[arg(long)]
    to: Option<i32>,
    /// Observations per page.
    #[arg(long)]
    per_page: Option<u32>,
    /// Fetch every page instead of only the first.
    #[arg(long, default_value_t = false)]
    all_pages: bool,
    /// Print summary statistics after the series.
    #[arg(long, default_value_t = false)]
    stats: bool,
    /// Locale for table values (en, de, fr, ...).
    #[arg(long, default_value = "en")]
    locale: String,
    #[command(flatten)]
    out: FormatArgs,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if let Some(url) = cli.base_url {
        settings.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = cli.timeout {
        settings.timeout = std::time::Duration::from_secs(secs.max(1));
    }

    match cli.cmd {
        Command::Countries(args) => cmd_countries(settings, args),
        Command::Indicators(args) => cmd_indicators(args),
        Command::Series(args) => cmd_series(settings, args),
    }
}

fn cmd_countries(settings: Settings, args: CountriesArgs) -> Result<()> {
    let client = Client::new(settings)?;
    let countries = client.load_countries().context("loading country catalog")?;
    let needle = args.search.unwrap_or_default().to_lowercase();
    let shown: Vec<&Country> = countries
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.out.format {
        OutFormat::Table => {
            for c in &shown {
                writeln!(out, "{:<4} {:<40} {}", c.id, c.name, c.region_name().unwrap_or(""))?;
            }
        }
        OutFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            wtr.write_record(["id", "name", "region", "iso2_code", "capital_city"])?;
            for c in &shown {
                wtr.write_record([
                    c.id.as_str(),
                    c.name.as_str(),
                    c.region_name().unwrap_or(""),
                    c.iso2_code.as_deref().unwrap_or(""),
                    c.capital_city.as_deref().unwrap_or(""),
                ])?;
            }
            wtr.flush()?;
        }
        OutFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &shown)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn cmd_indicators(args: FormatArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let indicators = catalog::list_indicators();
    match args.format {
        OutFormat::Table => {
            for ind in indicators {
                writeln!(
                    out,
                    "{:<20} SDG {:>2}  {}",
                    ind.code, ind.sdg, ind.name
                )?;
            }
        }
        OutFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            wtr.write_record(["code", "name", "sdg", "goal"])?;
            for ind in indicators {
                wtr.write_record([
                    ind.code,
                    ind.name,
                    ind.sdg.to_string().as_str(),
                    sdg_goal(ind.sdg).unwrap_or(""),
                ])?;
            }
            wtr.flush()?;
        }
        OutFormat::Json => {
            serde_json::to_writer_pretty(&mut out, indicators)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn cmd_series(mut settings: Settings, args: SeriesArgs) -> Result<()> {
    let start = args.from.unwrap_or(settings.date_range.start);
    let end = args.to.unwrap_or(settings.date_range.end);
    let range = DateRange::new(start, end).context("invalid --from/--to")?;
    if let Some(n) = args.per_page {
        anyhow::ensure!(n > 0, "--per-page must be positive");
        settings.per_page = n;
    }
    settings.follow_pages |= args.all_pages;

    let client = Client::new(settings)?;
    let series = client
        .fetch_series(&args.country, &args.indicator, range)
        .with_context(|| format!("fetching {} for {}", args.indicator, args.country))?;

    if series.is_truncated() {
        eprintln!(
            "Note: showing {} of {} pages; pass --all-pages to fetch the rest",
            series.pages_fetched, series.pages
        );
    }

    if !series.has_data() {
        let name = catalog::find_indicator(&series.indicator)
            .map(|i| i.name)
            .unwrap_or(series.indicator.as_str());
        println!("No data available for {} on {}.", series.country, name);
        return Ok(());
    }

    print_series(&series, args.out.format, &args.locale)?;

    if args.stats {
        let s = stats::summarize(&series);
        let f = |v: Option<f64>| {
            v.map(|x| stats::format_value(x, 2, &args.locale))
                .unwrap_or_else(|| "NA".to_string())
        };
        eprintln!(
            "{} • {}  count={}  min={} max={} mean={} median={}",
            series.country,
            series.indicator,
            s.count,
            f(s.min),
            f(s.max),
            f(s.mean),
            f(s.median)
        );
    }
    Ok(())
}

fn print_series(series: &SeriesResult, format: OutFormat, locale: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutFormat::Table => {
            for o in series.observations() {
                writeln!(out, "{:<6} {:>16}", o.date, stats::format_value(o.value, 2, locale))?;
            }
        }
        OutFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            wtr.write_record(["country", "indicator", "date", "value"])?;
            for o in series.observations() {
                wtr.serialize((&series.country, &series.indicator, &o.date, o.value))?;
            }
            wtr.flush()?;
        }
        OutFormat::Json => {
            let doc = serde_json::json!({
                "country": series.country,
                "indicator": series.indicator,
                "date": series.range.to_query_param(),
                "has_data": series.has_data(),
                "observations": series.observations(),
            });
            serde_json::to_writer_pretty(&mut out, &doc)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
