use clap::Parser;
use comfy_table::{Cell, Table};
use killrvideo_collections::sample::{self, WalkthroughReport};
use killrvideo_collections::{
    Backend, ConfigOverrides, CqlError, MemorySession, SampleConfig, logging,
};
use tracing::{error, info};

/// Walks through set, list, map and UDT column updates on a `videos` table
#[derive(Parser, Debug)]
#[command(name = "killrvideo")]
#[command(
    about = "Collection and user-defined type columns with a CQL query builder",
    long_about = None
)]
struct Args {
    /// Where to run the statements
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Cluster contact point (host:port)
    #[arg(short = 'c', long)]
    contact_point: Option<String>,

    /// Keyspace to create and use
    #[arg(short, long)]
    keyspace: Option<String>,

    /// Replication factor of the keyspace
    #[arg(short, long)]
    replication_factor: Option<u32>,

    /// Keep existing rows instead of truncating the table first
    #[arg(long)]
    no_truncate: bool,

    /// Log level (RUST_LOG takes precedence)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Print the final video as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            backend: self.backend,
            contact_point: self.contact_point.clone(),
            keyspace: self.keyspace.clone(),
            replication_factor: self.replication_factor,
            truncate: self.no_truncate.then_some(false),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = SampleConfig::load(&args.overrides())?;
    logging::init_with_level(&config.log_level);
    if let Some(path) = &config.source {
        info!("Loaded config from: {}", path.display());
    }
    config.validate()?;

    let report = match run(&config).await {
        Ok(report) => report,
        Err(e) => {
            error!("Walkthrough failed: {e}");
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.video)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

async fn run(config: &SampleConfig) -> Result<WalkthroughReport, CqlError> {
    match config.backend {
        Backend::Memory => {
            info!("Using the in-memory session");
            let session = MemorySession::new();
            sample::run(&session, config).await
        }
        #[cfg(feature = "cassandra")]
        Backend::Cassandra => {
            info!(
                "Connecting to {}, looking for keyspace '{}'...",
                config.contact_point, config.keyspace
            );
            let session =
                killrvideo_collections::session::CassandraSession::connect(&config.contact_point)
                    .await?;
            sample::run(&session, config).await
        }
        #[cfg(not(feature = "cassandra"))]
        Backend::Cassandra => Err(CqlError::Config(
            "built without the `cassandra` feature; rebuild with --features cassandra".to_string(),
        )),
    }
}

fn print_report(report: &WalkthroughReport) {
    let mut table = Table::new();
    table.set_header(vec!["Step", "Tags", "Formats", "Frames"]);
    for step in &report.steps {
        let formats: Vec<String> = step
            .collections
            .formats
            .iter()
            .map(|(key, format)| format!("{key}={format}"))
            .collect();
        table.add_row(vec![
            Cell::new(&step.label),
            Cell::new(format!("{:?}", step.collections.tags)),
            Cell::new(formats.join(", ")),
            Cell::new(format!("{:?}", step.collections.frames)),
        ]);
    }
    println!("Video {}", report.videoid);
    println!("{table}");
}
