use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prettytable::{format, Cell, Row, Table};
use std::{collections::BTreeMap, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use unesco_enrollment::{
    export, Config, DashboardView, Filters, ObservationCache, ObservationTable,
};

#[derive(Parser, Debug)]
#[command(name = "unesco-enrollment")]
#[command(version)]
#[command(about = "Reshape UNESCO female primary enrollment workbooks into tidy observations")]
struct Args {
    /// YAML config file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Workbook to load, overriding the config's data_path
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print row counts and per-year coverage
    Summary,

    /// Write the long-format table as Parquet
    Export {
        #[arg(short, long, default_value = "enrollment.parquet")]
        out: PathBuf,
    },

    /// Build the dashboard slices for one selection
    View {
        /// Selected year (latest year when omitted)
        #[arg(short, long)]
        year: Option<i32>,

        /// Selected country, repeatable (config defaults when omitted)
        #[arg(long = "country")]
        countries: Vec<String>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,unesco_enrollment=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(data) = args.data {
        config.data_path = data;
    }
    info!(path = %config.data_path.display(), "loading workbook");

    let cache = ObservationCache::new(config.reshape.clone());
    let table = cache
        .get_or_load(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    match args.command {
        Command::Summary => print_summary(&table),
        Command::Export { out } => {
            let bytes = export::write_parquet(&table, &out)?;
            println!("wrote {} rows ({} bytes) to {}", table.len(), bytes, out.display());
            Ok(())
        }
        Command::View {
            year,
            countries,
            out,
        } => {
            let mut filters = Filters::defaults(&table, &config.default_countries)?;
            if let Some(year) = year {
                filters.year = year;
            }
            if !countries.is_empty() {
                filters.countries = countries;
            }
            let snapshot = DashboardView::new(&table).snapshot(&filters)?;
            match out {
                Some(path) => export::write_json(&snapshot, &path)?,
                None => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            }
            Ok(())
        }
    }
}

fn print_summary(table: &ObservationTable) -> Result<()> {
    let mut per_year: BTreeMap<i32, (usize, f64)> = BTreeMap::new();
    for obs in table {
        let entry = per_year.entry(obs.year).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += obs.enrollment_pct;
    }

    println!(
        "{} observations, {} countries, {} years",
        table.len(),
        table.countries().len(),
        per_year.len()
    );
    if per_year.is_empty() {
        return Ok(());
    }

    let mut out = Table::new();
    out.set_format(*format::consts::FORMAT_BOX_CHARS);
    out.add_row(Row::new(vec![
        Cell::new("Year").style_spec("bFg"),
        Cell::new("Countries").style_spec("bFg"),
        Cell::new("Mean female %").style_spec("bFg"),
    ]));
    for (year, (count, sum)) in per_year {
        out.add_row(Row::new(vec![
            Cell::new(&year.to_string()),
            Cell::new(&count.to_string()).style_spec("r"),
            Cell::new(&format!("{:.2}", sum / count as f64)).style_spec("r"),
        ]));
    }
    out.printstd();
    Ok(())
}
