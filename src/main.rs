use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use stay_scout::fields::{available_fields, field_value};
use stay_scout::scrapers::{DetailsSource, FileDetailsSource, HttpDetailsSource};
use stay_scout::{AppConfig, ListingRecord, ListingService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stay-scout", version, about = "Normalize and store short-term rental listings")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, env = "STAY_SCOUT_DB", global = true)]
    db: Option<PathBuf>,

    /// Currency requested from the details source
    #[arg(long, env = "STAY_SCOUT_CURRENCY", global = true)]
    currency: Option<String>,

    /// Base URL of the details service
    #[arg(long, env = "STAY_SCOUT_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database and show its status
    Init,
    /// Fetch, normalize and store a listing
    Add {
        url: String,
        /// Saved payload file, or a directory of listing_<id>.json dumps
        #[arg(long)]
        payload: Option<PathBuf>,
    },
    /// Show one stored listing
    Show { id: i64 },
    /// Print one field of a stored listing
    Field { id: i64, label: String },
    /// List selectable field labels
    Fields,
    /// List all stored listings
    List,
    /// Find listings whose location contains the text
    Search { location: String },
    /// Number of stored listings
    Count,
    /// Delete a stored listing
    Delete { id: i64 },
    /// Correct the stored cost of a listing
    SetCost { id: i64, cost: f64 },
    /// Attach notes to a listing
    SetNotes { id: i64, notes: String },
}

impl Command {
    /// `fields` is answered from the catalog alone
    fn needs_store(&self) -> bool {
        !matches!(self, Command::Fields)
    }
}

impl Cli {
    fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_json_file(path)?,
            None => AppConfig::default(),
        };
        if let Some(db) = &self.db {
            config.database_path = db.clone();
        }
        if let Some(currency) = &self.currency {
            config.currency = currency.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.details_endpoint = Some(endpoint.clone());
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if !cli.command.needs_store() {
        for label in available_fields() {
            println!("{label}");
        }
        return Ok(());
    }

    let config = cli.app_config()?;
    let mut service = ListingService::open(&config).with_context(|| {
        format!("Failed to open database {}", config.database_path.display())
    })?;

    match cli.command {
        Command::Init => {
            info!("🏠 Stay Scout - listing store");
            info!("Available fields: {}", available_fields().join(", "));
            if let Some(path) = service.store().path() {
                info!("Database path: {}", path.display());
            }
            info!("Journal mode: {}", service.store().journal_mode()?);
            info!("Current listings in database: {}", service.listing_count()?);
        }
        Command::Add { url, payload } => {
            let source: Box<dyn DetailsSource> = match (payload, &config.details_endpoint) {
                (Some(path), _) => Box::new(FileDetailsSource::new(path)),
                (None, Some(endpoint)) => Box::new(HttpDetailsSource::with_timeout(
                    endpoint.clone(),
                    config.request_timeout(),
                )?),
                (None, None) => bail!("No details source: pass --payload or --endpoint"),
            };
            let record = service.add_listing(&url, source.as_ref()).await?;
            info!("✅ Listing {} saved", record.id);
            print_listing(1, &record);
        }
        Command::Show { id } => match service.listing_by_id(id)? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => bail!("Listing {id} not found"),
        },
        Command::Field { id, label } => {
            let Some(record) = service.listing_by_id(id)? else {
                bail!("Listing {id} not found");
            };
            match field_value(&label, &record)? {
                Value::String(text) => println!("{text}"),
                other => println!("{}", serde_json::to_string_pretty(&other)?),
            }
        }
        // printed above without opening the store
        Command::Fields => {}
        Command::List => {
            let listings = service.all_listings()?;
            for (i, record) in listings.iter().enumerate() {
                print_listing(i + 1, record);
            }
            info!("{} listings", listings.len());
        }
        Command::Search { location } => {
            let listings = service.listings_by_location(&location)?;
            for (i, record) in listings.iter().enumerate() {
                print_listing(i + 1, record);
            }
            info!("{} listings match '{}'", listings.len(), location);
        }
        Command::Count => println!("{}", service.listing_count()?),
        Command::Delete { id } => {
            if service.delete_listing(id)? {
                println!("Deleted listing {id}");
            } else {
                println!("Listing {id} not found");
            }
        }
        Command::SetCost { id, cost } => {
            if service.update_listing_cost(id, cost)? {
                println!("Updated cost of listing {id} to {cost}");
            } else {
                bail!("Listing {id} not found");
            }
        }
        Command::SetNotes { id, notes } => {
            if !service.set_notes(id, &notes)? {
                bail!("Listing {id} not found");
            }
        }
    }

    service.close()?;
    Ok(())
}

fn print_listing(index: usize, record: &ListingRecord) {
    println!("{}. {} ({} for {} nights)", index, record.location, record.cost, record.duration);
    println!("   {} guests, rating {:.2}", record.capacity, record.average_rating);
    if record.super_host {
        println!("   Superhost");
    }
    println!("   ID: {}", record.id);
    println!("   Highlights: {}", record.highlights.join(", "));
    println!("   Cover: {}", record.cover());
    println!("   URL: {}", record.url);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_runs_without_a_store() {
        let cli = Cli::try_parse_from(["stay-scout", "fields"]).unwrap();
        assert!(!cli.command.needs_store());

        let cli = Cli::try_parse_from(["stay-scout", "--db", "/tmp/x.db", "count"]).unwrap();
        assert!(cli.command.needs_store());
    }

    #[test]
    fn flags_override_config_defaults() {
        let cli = Cli::try_parse_from([
            "stay-scout",
            "show",
            "42",
            "--db",
            "/tmp/listings.db",
            "--currency",
            "EUR",
            "--endpoint",
            "http://localhost:8080/details",
        ])
        .unwrap();

        let config = cli.app_config().unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/listings.db"));
        assert_eq!(config.currency, "EUR");
        assert_eq!(
            config.details_endpoint.as_deref(),
            Some("http://localhost:8080/details")
        );
        assert!(matches!(cli.command, Command::Show { id: 42 }));
    }
}
