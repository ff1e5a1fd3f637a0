//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::engine::{Message, SyncConfig, SyncEngine};
use crate::error::Result;
use crate::http::{GraphQlClient, Transport};
use crate::output::{Catalog, JsonLinesWriter, MessageSink};
use crate::query::me_query;
use crate::state::StateManager;
use crate::streams::{EntityType, StreamSelection};
use serde_json::{json, Value};
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Discover => self.discover(),
            Commands::Read {
                streams,
                full_refresh,
            } => self.read(streams.as_deref(), *full_refresh).await,
            Commands::Streams => self.streams(),
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<TapConfig> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json_str(json_str);
        }

        if let Some(path) = &self.cli.config {
            return TapConfig::from_file(path);
        }

        // Defaults, with the token from the environment
        TapConfig::from_json_str("{}")
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        // Inline state takes precedence
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = GraphQlClient::from_config(&config)?;
        info!(endpoint = %client.endpoint(), "checking connection");

        match client.execute(&me_query()).await {
            Ok(body) => {
                let me = &body["data"]["me"];
                let account = me["account"]["name"].as_str().unwrap_or("unknown account");
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "SUCCEEDED",
                        "message": format!("Connected to {account}"),
                        "user": me.get("email").cloned().unwrap_or(Value::Null),
                    }
                }));
            }
            Err(e) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "FAILED",
                        "message": format!("Connection failed: {e}")
                    }
                }));
            }
        }

        Ok(())
    }

    /// Print the catalog
    fn discover(&self) -> Result<()> {
        self.output_message(&json!({
            "type": "CATALOG",
            "catalog": Catalog::discover(),
        }));
        Ok(())
    }

    /// List stream names
    fn streams(&self) -> Result<()> {
        let streams: Vec<Value> = EntityType::ALL
            .into_iter()
            .map(|entity| {
                let def = entity.def();
                json!({
                    "name": def.name,
                    "parent": def.parent.map(EntityType::name),
                    "sync_mode": def.sync_mode(),
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "STREAMS",
            "streams": streams,
        }));
        Ok(())
    }

    /// Read records
    async fn read(&self, streams: Option<&str>, full_refresh: bool) -> Result<()> {
        let config = self.load_config()?;
        let state = self.load_state()?;
        let selection = StreamSelection::parse(streams.unwrap_or(""))?;

        let client = GraphQlClient::from_config(&config)?;
        let sync = SyncConfig::new()
            .with_selection(selection)
            .with_ignore_bookmarks(full_refresh);
        let mut engine = SyncEngine::new(client, config, state).with_sync_config(sync);

        let stats = match self.cli.format {
            OutputFormat::Json => {
                let mut writer = JsonLinesWriter::stdout();
                let stats = engine.run(&mut writer).await?;
                debug!(lines = writer.lines_written(), "messages written");
                // Surface a failed final flush instead of losing it on drop
                writer.into_inner()?;
                stats
            }
            OutputFormat::Pretty => engine.run(&mut PrettyPrinter).await?,
        };

        info!(
            records = stats.records_synced(),
            per_stream = ?stats.records,
            "read finished"
        );
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Sink printing each message as indented JSON
struct PrettyPrinter;

impl MessageSink for PrettyPrinter {
    fn emit(&mut self, message: Message) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&message)?);
        Ok(())
    }
}
