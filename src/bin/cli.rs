//! nemdata CLI
//!
//! Offline inspection of the filter engine:
//! - Show the SQL and Flux a request compiles to
//! - Read units from the configured database
//! - Show group expansions and dimension values

use clap::{Parser, Subcommand, ValueEnum};
use nemdata::compile::{compile_pipeline, compile_relational};
use nemdata::config::{generate_default_config, Config};
use nemdata::data::{
    flat_script, read_units, requested_groups, DemandFilter, GenerationFilter, RooftopFilter,
    UnitFilter, WindowFilter, DEMAND_MEASUREMENT, GENERATION_MEASUREMENT, ROOFTOP_MEASUREMENT,
};
use nemdata::filter::{FilterShape, QueryParams};
use nemdata::group::{dimension_values, expand, resolve_dimensions};
use nemdata::store::{SqliteStore, Unit};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nemdata-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect nemdata filters, units and groupings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Unit database, overrides the configured path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the statements a read would run, without touching a store
    Explain {
        read: Read,
        /// Query parameters in key=value format
        params: Vec<String>,
    },

    /// List units matching key=value filters
    Units {
        params: Vec<String>,
    },

    /// Expand grouping dimensions, e.g. `groups region fuel fuel_source.eq=Coal`
    Groups {
        /// Dimension names and key=value unit filters
        args: Vec<String>,
        /// Include combinations without units
        #[arg(long)]
        all: bool,
    },

    /// Distinct values of every grouping dimension
    Dimensions,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Read {
    Units,
    Demand,
    Rooftop,
    Generation,
    Grouped,
}

/// Split `key=value` arguments from bare words
fn split_args(args: &[String]) -> (QueryParams, Vec<String>) {
    let mut params = QueryParams::new();
    let mut words = Vec::new();
    for arg in args {
        match arg.split_once('=') {
            Some((k, v)) => params.insert(k, v),
            None => words.push(arg.clone()),
        }
    }
    (params, words)
}

fn print_units(units: &[Unit], format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(units)?);
        return Ok(());
    }

    if units.is_empty() {
        println!("No units match.");
        return Ok(());
    }

    println!(
        "{:<10} {:<32} {:<6} {:<18} {:>8}",
        "DUID", "Station", "Region", "Fuel", "Max MW"
    );
    println!("{}", "-".repeat(78));
    for unit in units {
        println!(
            "{:<10} {:<32} {:<6} {:<18} {:>8}",
            unit.duid, unit.station_name, unit.region_id, unit.fuel_source, unit.max_capacity
        );
    }
    println!();
    println!("{} units", units.len());
    Ok(())
}

fn explain(read: Read, params: &QueryParams, bucket: &str) -> anyhow::Result<()> {
    let units = UnitFilter::from_params(params);

    match read {
        Read::Units => {
            println!("SQL:{}", compile_relational(&units));
        }
        Read::Demand => {
            let filter = DemandFilter::from_params(params);
            println!("{}", flat_script(&filter, DEMAND_MEASUREMENT, bucket));
        }
        Read::Rooftop => {
            let filter = RooftopFilter::from_params(params);
            println!("{}", flat_script(&filter, ROOFTOP_MEASUREMENT, bucket));
        }
        Read::Generation => {
            if !units.is_unconstrained() {
                println!("Unit selection SQL:{}", compile_relational(&units));
                println!("(matching unit ids are added to the unit filter below)");
                println!();
            }
            let filter = GenerationFilter::from_params(params);
            println!("{}", flat_script(&filter, GENERATION_MEASUREMENT, bucket));
        }
        Read::Grouped => {
            let dimensions = resolve_dimensions(&requested_groups(params))?;
            let names: Vec<&str> = dimensions.iter().map(|d| d.as_str()).collect();
            println!("Dimensions: [{}]", names.join(", "));
            println!("Base unit SQL:{}", compile_relational(&units));
            println!();
            println!("Per-group window stages:");
            println!("{}", compile_pipeline(&WindowFilter::from_params(params)));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::from_env(),
    };
    let db_path = cli.db.clone().unwrap_or_else(|| config.sqlite.path.clone());

    match cli.command {
        Commands::Explain { read, params } => {
            let (params, _) = split_args(&params);
            explain(read, &params, &config.influx.bucket)?;
        }

        Commands::Units { params } => {
            let (params, _) = split_args(&params);
            let store = SqliteStore::open(&db_path)?;
            let units = read_units(&params, &store).await?;
            print_units(&units, &cli.format)?;
        }

        Commands::Groups { args, all } => {
            let (params, dims) = split_args(&args);
            let store = SqliteStore::open(&db_path)?;
            let expansion = expand(&dims, &UnitFilter::from_params(&params), &store).await?;

            if cli.format == "json" {
                let rows: Vec<serde_json::Value> = expansion
                    .iter()
                    .filter(|c| all || !c.is_empty())
                    .map(|c| {
                        serde_json::json!({
                            "label": c.label,
                            "units": c.unit_ids().collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:<40} {:>6}", "Group", "Units");
                println!("{}", "-".repeat(47));
                for combination in expansion.iter().filter(|c| all || !c.is_empty()) {
                    println!("{:<40} {:>6}", combination.label, combination.units.len());
                }
                println!();
                println!(
                    "{} combinations, {} with units",
                    expansion.len(),
                    expansion.populated().count()
                );
            }
        }

        Commands::Dimensions => {
            let store = SqliteStore::open(&db_path)?;
            let lookup = dimension_values(&store).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&lookup)?);
            } else {
                for (dimension, values) in &lookup {
                    println!("{} ({}):", dimension, dimension.column());
                    for value in values {
                        println!("  {}", value);
                    }
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}
