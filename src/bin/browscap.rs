//! Command-line interface for querying browscap databases.

use anyhow::{bail, Context, Result};
use browscap::UserAgentDatabase;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "browscap")]
#[command(
    about = "User-agent capabilities lookup against a browscap.ini database",
    long_about = "browscap - look up browser, platform, and device capabilities for HTTP User-Agent strings\n\n\
    Loads a browscap.ini database (glob patterns with inherited property sets) and\n\
    resolves User-Agent strings to their most specific matching entry.\n\n\
    Examples:\n\
      browscap query browscap.ini 'Mozilla/5.0 (X11; U; Linux i686) Firefox/1.5.0.5'\n\
      browscap query browscap.ini 'Wget/1.10.2' --json\n\
      browscap list browscap.ini\n\
      browscap validate browscap.ini"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one or more User-Agent strings
    Query {
        /// Path to the browscap.ini database
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// User-Agent strings to resolve
        #[arg(value_name = "USER_AGENT", required = true)]
        user_agents: Vec<String>,

        /// Report unknown agents as empty results instead of failing
        #[arg(long)]
        lenient: bool,

        /// Emit full property sets as JSON (one object per line)
        #[arg(long)]
        json: bool,
    },

    /// List every known user-agent pattern in the database
    List {
        /// Path to the browscap.ini database
        #[arg(value_name = "DATABASE")]
        database: PathBuf,
    },

    /// Check that all entries define the browser, version and platform properties
    Validate {
        /// Path to the browscap.ini database
        #[arg(value_name = "DATABASE")]
        database: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            database,
            user_agents,
            lenient,
            json,
        } => cmd_query(&database, &user_agents, lenient, json),
        Commands::List { database } => cmd_list(&database),
        Commands::Validate { database } => cmd_validate(&database),
    }
}

fn open_database(path: &Path) -> Result<UserAgentDatabase> {
    let db = UserAgentDatabase::new();
    db.load_file(path)
        .with_context(|| format!("loading {}", path.display()))?;
    Ok(db)
}

fn cmd_query(path: &Path, user_agents: &[String], lenient: bool, json: bool) -> Result<()> {
    let db = open_database(path)?;

    for agent in user_agents {
        let props = if lenient {
            db.query_lenient(agent)?
        } else {
            db.query(agent)?
        };

        if json {
            println!("{}", serde_json::to_string(&props)?);
        } else if props.is_empty() {
            println!("{} is unknown", agent);
        } else {
            let browser = props.get("browser").map(String::as_str).unwrap_or("?");
            let version = props.get("version").map(String::as_str).unwrap_or("?");
            println!("{} is {} {}", agent, browser, version);
        }
    }
    Ok(())
}

fn cmd_list(path: &Path) -> Result<()> {
    let db = open_database(path)?;
    for agent in db.known_user_agents()? {
        println!("{}", agent);
    }
    Ok(())
}

fn cmd_validate(path: &Path) -> Result<()> {
    let db = open_database(path)?;

    let mut missing = 0usize;
    for agent in db.known_user_agents()? {
        let props = db.query_lenient(&agent)?;
        for required in ["platform", "browser", "version"] {
            if !props.contains_key(required) {
                println!("No {} for {}", required, agent);
                missing += 1;
            }
        }
    }

    if missing > 0 {
        bail!("{} missing properties", missing);
    }
    println!("{} entries OK", db.len());
    Ok(())
}
