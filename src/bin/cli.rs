//! Binary entry point for the hubtree administrative CLI.
#![forbid(unsafe_code)]

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use hubtree::{
    cli::{run_import, run_seed, ImportConfig},
    Airport, Db, Position, Route,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hubtree",
    version,
    about = "CLI for the hubtree binary route-tree database",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for structured responses"
    )]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Create an airport")]
    AddAirport {
        #[arg(value_name = "DB")]
        db_path: PathBuf,

        #[arg(value_name = "CODE", help = "Unique airport code, e.g. JFK")]
        code: String,
    },

    #[command(about = "Insert a route and extend the closure index")]
    AddRoute {
        #[arg(value_name = "DB")]
        db_path: PathBuf,

        #[arg(value_name = "PARENT")]
        parent: String,

        #[arg(value_name = "CHILD")]
        child: String,

        #[arg(value_enum, value_name = "POSITION", help = "Child slot on the parent")]
        position: PositionArg,

        #[arg(value_name = "MINUTES", help = "Flight duration in minutes")]
        duration: u32,
    },

    #[command(about = "Find the Nth node always turning one direction")]
    NthNode {
        #[arg(value_name = "DB")]
        db_path: PathBuf,

        #[arg(value_name = "AIRPORT")]
        airport: String,

        #[arg(value_enum, value_name = "DIRECTION")]
        direction: PositionArg,

        #[arg(value_name = "N")]
        n: u32,
    },

    #[command(about = "Show the longest route, globally or from one airport")]
    Longest {
        #[arg(value_name = "DB")]
        db_path: PathBuf,

        #[arg(long, value_name = "AIRPORT", help = "Restrict to routes leaving this airport")]
        from: Option<String>,
    },

    #[command(about = "Show the shortest direct route between two airports")]
    Shortest {
        #[arg(value_name = "DB")]
        db_path: PathBuf,

        #[arg(value_name = "SOURCE")]
        source: String,

        #[arg(value_name = "DESTINATION")]
        destination: String,
    },

    #[command(about = "Print airport/route statistics")]
    Stats {
        #[arg(value_name = "DB")]
        db_path: PathBuf,
    },

    #[command(about = "Check the closure index against the route store")]
    Verify {
        #[arg(value_name = "DB")]
        db_path: PathBuf,
    },

    #[command(about = "Import airports/routes from CSV files")]
    Import {
        #[arg(value_name = "DB")]
        db_path: PathBuf,

        #[arg(long, value_name = "FILE", help = "CSV file containing airports")]
        airports: Option<PathBuf>,

        #[arg(long, value_name = "FILE", help = "CSV file containing routes")]
        routes: Option<PathBuf>,
    },

    #[command(about = "Populate the demo airport tree rooted at JFK")]
    SeedDemo {
        #[arg(value_name = "DB")]
        db_path: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum PositionArg {
    Left,
    Right,
}

impl From<PositionArg> for Position {
    fn from(position: PositionArg) -> Self {
        match position {
            PositionArg::Left => Position::Left,
            PositionArg::Right => Position::Right,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::AddAirport { db_path, code } => {
            let mut db = Db::open(db_path)?;
            let airport = db.create_airport(&code)?;
            emit(cli.format, &airport, || {
                println!("Created airport {}", airport.code)
            })?;
        }
        Command::AddRoute {
            db_path,
            parent,
            child,
            position,
            duration,
        } => {
            let mut db = Db::open(db_path)?;
            let route = db.add_route(&parent, &child, position.into(), duration)?;
            emit(cli.format, &route, || println!("Created route {route}"))?;
        }
        Command::NthNode {
            db_path,
            airport,
            direction,
            n,
        } => {
            let db = Db::open(db_path)?;
            let found = db.find_nth_node(&airport, direction.into(), n)?;
            print_optional_airport(cli.format, found.as_ref(), || {
                format!("No node at {n} steps in that direction")
            })?;
        }
        Command::Longest { db_path, from } => {
            let db = Db::open(db_path)?;
            let route = match &from {
                Some(airport) => db.longest_route_from(airport)?,
                None => db.longest_route()?,
            };
            print_optional_route(cli.format, route.as_ref(), "No routes found")?;
        }
        Command::Shortest {
            db_path,
            source,
            destination,
        } => {
            let db = Db::open(db_path)?;
            let route = db.shortest_route_between(&source, &destination)?;
            print_optional_route(cli.format, route.as_ref(), "No direct route found")?;
        }
        Command::Stats { db_path } => {
            let db = Db::open(db_path)?;
            let stats = db.stats()?;
            emit(cli.format, &stats, || {
                println!("Airports: {}", stats.airports);
                println!("Routes:   {}", stats.routes);
                match &stats.longest_route {
                    Some(route) => println!("Longest:  {route}"),
                    None => println!("Longest:  none"),
                }
            })?;
        }
        Command::Verify { db_path } => {
            let db = Db::open(db_path)?;
            let report = db.verify_closure()?;
            emit(cli.format, &report, || {
                println!(
                    "Checked {} closure rows against {} routes",
                    report.closure_rows, report.routes
                );
                for issue in &report.issues {
                    println!("  {issue}");
                }
                println!("{}", if report.success { "OK" } else { "FAILED" });
            })?;
            if !report.success {
                std::process::exit(2);
            }
        }
        Command::Import {
            db_path,
            airports,
            routes,
        } => {
            let mut db = Db::open(db_path)?;
            let summary = run_import(&mut db, &ImportConfig { airports, routes })?;
            emit(cli.format, &summary, || {
                println!(
                    "Imported {} airports and {} routes ({} rows skipped)",
                    summary.airports_imported, summary.routes_imported, summary.rows_skipped
                )
            })?;
        }
        Command::SeedDemo { db_path } => {
            let mut db = Db::open(db_path)?;
            let summary = run_seed(&mut db)?;
            emit(cli.format, &summary, || {
                println!(
                    "Seeded {} airports and {} routes",
                    summary.airports, summary.routes
                );
                for rejected in &summary.rejected {
                    println!("  rejected: {rejected}");
                }
            })?;
        }
    }

    Ok(())
}

fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(),
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => text(),
    }
    Ok(())
}

fn print_optional_airport(
    format: OutputFormat,
    airport: Option<&Airport>,
    missing: impl FnOnce() -> String,
) -> Result<(), Box<dyn Error>> {
    emit(format, &airport, || match airport {
        Some(airport) => println!("{}", airport.code),
        None => println!("{}", missing()),
    })
}

fn print_optional_route(
    format: OutputFormat,
    route: Option<&Route>,
    missing: &str,
) -> Result<(), Box<dyn Error>> {
    emit(format, &route, || match route {
        Some(route) => println!("{route}"),
        None => println!("{missing}"),
    })
}
