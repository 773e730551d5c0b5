//! Folio - Versioned Catalog Store CLI
//!
//! Operator tool for the folio resource store. Storage is chosen from the
//! environment (a `.env` file is honoured): with `CASSANDRA_KEYSPACE` set the
//! distributed store is used, otherwise an in-memory store that lives only as
//! long as this process.
//!
//! # Usage
//!
//! ```bash
//! folio create --title "Dune" --author "Frank Herbert" --year 1965
//! folio get <ID>
//! folio update <ID> --if-match <VERSION> --title "Dune" --author "Frank Herbert" --year 1965
//! folio delete <ID> --if-match <VERSION>
//! folio smoke
//! ```

mod smoke;

use clap::{Parser, Subcommand};
use folio_core::{open_backend, BackendConfig, ResourceFields, ResourceStore};
use serde::Serialize;

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Application name
pub const APP_NAME: &str = "folio";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// CLI
// =============================================================================

/// Versioned catalog store
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "Versioned catalog store with pluggable backends")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Serialize creates so concurrent duplicates cannot both land
    #[arg(long, global = true)]
    serialize_creates: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Caller-supplied resource fields
#[derive(clap::Args, Debug)]
struct FieldArgs {
    /// Title
    #[arg(long)]
    title: String,

    /// Author (repeat for several)
    #[arg(long = "author")]
    authors: Vec<String>,

    /// Publication year
    #[arg(long, allow_negative_numbers = true)]
    year: i32,

    /// Free-text comment
    #[arg(long, default_value = "")]
    comment: String,
}

impl From<FieldArgs> for ResourceFields {
    fn from(args: FieldArgs) -> Self {
        ResourceFields::new(args.title, args.authors, args.year).with_comment(args.comment)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a resource
    Create {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Show one resource
    Get {
        /// Resource id
        id: String,
    },
    /// List every resource
    List,
    /// Replace a resource's fields
    Update {
        /// Resource id
        id: String,
        /// Version last observed (If-Match)
        #[arg(long)]
        if_match: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a resource
    Delete {
        /// Resource id
        id: String,
        /// Version last observed (If-Match)
        #[arg(long)]
        if_match: String,
    },
    /// Run a create/get/update/list/delete round against the backend
    Smoke,
}

/// Strip HTTP entity-tag quotes: `"abc"` and `abc` name the same version.
fn version_token(if_match: &str) -> &str {
    let trimmed = if_match.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn,folio=info,folio_core=info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("{} v{}", APP_NAME, APP_VERSION);

    // Backend construction failures are fatal
    let config = BackendConfig::from_env()?;
    let backend = open_backend(&config).await?;
    let store = ResourceStore::new(backend).with_serialized_creates(cli.serialize_creates);

    tracing::debug!(backend = config.backend_name(), "Storage backend selected");
    if matches!(config, BackendConfig::Memory) && !matches!(cli.command, Commands::Smoke) {
        tracing::warn!(
            backend = config.backend_name(),
            "Changes are discarded when this command exits"
        );
    }

    match cli.command {
        Commands::Create { fields } => {
            let created = store.create(fields.into()).await?;
            print_json(&created)?;
        }
        Commands::Get { id } => {
            print_json(&store.get(&id).await?)?;
        }
        Commands::List => {
            print_json(&store.list().await?)?;
        }
        Commands::Update { id, if_match, fields } => {
            let updated = store.update(&id, version_token(&if_match), fields.into()).await?;
            print_json(&updated)?;
        }
        Commands::Delete { id, if_match } => {
            store.delete(&id, version_token(&if_match)).await?;
            tracing::info!(id = %id, "Deleted");
        }
        Commands::Smoke => {
            smoke::run(&store).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_token_strips_quotes() {
        assert_eq!(version_token("\"abc\""), "abc");
        assert_eq!(version_token("abc"), "abc");
        assert_eq!(version_token("  \"abc\" "), "abc");
        assert_eq!(version_token("\"abc"), "\"abc");
    }

    #[test]
    fn test_cli_parses_update() {
        let cli = Cli::try_parse_from([
            "folio", "update", "b1", "--if-match", "v1", "--title", "Dune", "--author", "Frank Herbert",
            "--author", "Brian Herbert", "--year", "1965",
        ])
        .unwrap();

        let Commands::Update { id, if_match, fields } = cli.command else {
            panic!("expected update");
        };
        assert_eq!(id, "b1");
        assert_eq!(if_match, "v1");
        let fields: ResourceFields = fields.into();
        assert_eq!(fields.authors, vec!["Frank Herbert", "Brian Herbert"]);
        assert!(fields.comment.is_empty());
    }

    #[test]
    fn test_cli_debug_assert() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
