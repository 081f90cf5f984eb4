use clap::{Parser, Subcommand};
use figment::providers::{Format, Toml};
use std::sync::Arc;

use crate::app_state::AppState;
use crate::config::load_config_from;
use crate::errors::{DssError, DssResult};
use crate::matcher;
use crate::project::{ConstraintVector, ProjectRecord};
use crate::software::SoftwareApp;
use crate::store::open_store;
use crate::web::build_router;

/// Top-level CLI interface for the decision-support service
#[derive(Parser)]
#[command(
    name = "bim_dss",
    version = "0.1.0",
    about = "4D BIM scheduling-software decision support service"
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "dss.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API (project CRUD, recommendation, health)
    Serve {
        /// Host/IP to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List stored project records
    List,

    /// One-shot recommendation for a comma-separated constraint vector
    Recommend {
        /// Nine ordinal ratings, e.g. "0,1,2,0,1,2,0,1,2"
        #[arg(long)]
        constraints: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config_from(Toml::file(&cli.config))?;

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => {
            let store = open_store(&config)?;
            let state = Arc::new(AppState::new(store, &config));
            let app = build_router(state);

            let host = host.unwrap_or_else(|| config.listen.host.clone());
            let port = port.unwrap_or(config.listen.port);
            let addr = format!("{host}:{port}");

            tracing::info!(%addr, backend = %config.db_backend, "starting decision-support service");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await?;
            Ok(())
        }
        Commands::List => {
            let store = open_store(&config)?;
            for record in store.load()? {
                println!(
                    "{:>4}  {}  [{}]  accepted={} history={}",
                    record.id, record.title, record.application, record.accepted, record.history
                );
            }
            Ok(())
        }
        Commands::Recommend { constraints } => {
            let query = parse_constraints(&constraints)?;
            let store = open_store(&config)?;
            let history: Vec<ProjectRecord> = store
                .load()?
                .into_iter()
                .filter(|r| r.is_reference())
                .collect();

            let exact = matcher::exact_constraint_match(query.as_slice(), &history);
            println!("Exact matches: {}", exact.len());
            for record in &exact {
                println!("  {:>4}  {}  [{}]", record.id, record.title, record.application);
            }

            let scores =
                matcher::software_scores(query.as_slice(), &history, config.neighbour_threshold)?;
            for (app, score) in SoftwareApp::ALL.iter().zip(scores.iter()) {
                println!("  {app}: {score:.3}");
            }
            if !history.is_empty() {
                if let Some((index, score)) = matcher::max_score(&scores) {
                    println!("Recommended: {} ({score:.3})", SoftwareApp::ALL[index]);
                }
            }
            Ok(())
        }
    }
}

fn parse_constraints(input: &str) -> DssResult<ConstraintVector> {
    let values = input
        .split(',')
        .map(|token| {
            token.trim().parse::<u8>().map_err(|_| {
                DssError::invalid_input("constraints", format!("'{token}' is not a rating"))
            })
        })
        .collect::<DssResult<Vec<u8>>>()?;
    ConstraintVector::try_from(values)
}
