//! Command-line front end for the ClickUp sync engine.
//!
//! Usage:
//!
//! ```text
//! clickflow upsert --id order_101 --title "Ship order 101" --priority 2
//! clickflow state
//! ```
//!
//! Settings come from flags, the environment, and a `.env` file in the
//! working directory, in that order of precedence.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use clickflow::config::{ConfigError, SyncConfig, parse_assignee_list};
use clickflow::sync::{
    adapters::{
        clickup::{ClickUpGateway, DEFAULT_API_BASE_URL},
        file::{DEFAULT_STATE_FILE, JsonFileStateStore},
        notify::{SlackNotifier, TemplateFormatter},
    },
    domain::{AssigneeId, ListId, Priority, TaskRecord},
    ports::{StateStore, UpsertNotifier},
    services::SyncEngine,
};
use mockable::DefaultClock;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Clickflow - mirror local tasks into ClickUp
#[derive(Parser)]
#[command(name = "clickflow")]
#[command(about = "Idempotent task sync into ClickUp", long_about = None)]
struct Cli {
    /// State file mapping internal ids to ClickUp task ids
    #[arg(long, env = "CLICKFLOW_STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    state_file: Utf8PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update one task
    Upsert {
        #[command(flatten)]
        remote: RemoteArgs,

        #[command(flatten)]
        task: TaskArgs,
    },

    /// Print the current id mapping
    State,
}

#[derive(Args)]
struct RemoteArgs {
    /// ClickUp API token
    #[arg(long, env = "CLICKUP_API_KEY", hide_env_values = true)]
    api_key: String,

    /// ClickUp API root
    #[arg(long, env = "CLICKUP_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Default destination list
    #[arg(long, env = "CLICKUP_LIST_ID")]
    list_id: String,

    /// Comma-separated assignees of the "general" bucket
    #[arg(long, env = "CLICKUP_DEFAULT_ASSIGNEE", default_value = "")]
    default_assignees: String,

    /// JSON file mapping category to assignee ids
    #[arg(long, env = "CLICKFLOW_BUCKETS")]
    buckets: Option<Utf8PathBuf>,

    /// Slack incoming-webhook URL
    #[arg(long, env = "SLACK_WEBHOOK_URL")]
    slack_webhook: Option<String>,

    /// minijinja template for Slack messages
    #[arg(long, env = "SLACK_MESSAGE_TEMPLATE")]
    slack_template: Option<String>,

    /// JSON file mapping assignee id to {"name", "department"}
    #[arg(long, env = "CLICKFLOW_MEMBERS")]
    members: Option<Utf8PathBuf>,
}

#[derive(Args)]
struct TaskArgs {
    /// Internal task id
    #[arg(long)]
    id: String,

    /// Task title
    #[arg(long)]
    title: String,

    /// Task description
    #[arg(long, default_value = "")]
    description: String,

    /// Remote status label
    #[arg(long)]
    status: Option<String>,

    /// Priority, 1 (urgent) to 4 (low)
    #[arg(long)]
    priority: Option<u8>,

    /// Tag, repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Assignment category
    #[arg(long, default_value = "general")]
    category: String,

    /// Destination list override
    #[arg(long = "list")]
    target_list: Option<String>,

    /// Explicit assignee id, repeatable
    #[arg(long = "assignee")]
    assignees: Vec<u64>,

    /// Due date in ClickUp's millisecond timestamp unit
    #[arg(long)]
    due_date: Option<i64>,
}

impl TaskArgs {
    fn into_record(self) -> Result<TaskRecord, BoxError> {
        let mut task = TaskRecord::new(self.id, self.title)?
            .with_description(self.description)
            .with_tags(self.tags)
            .with_category(self.category)
            .with_assignees(self.assignees.into_iter().map(AssigneeId::new));
        if let Some(status) = self.status {
            task = task.with_status(status);
        }
        if let Some(priority) = self.priority {
            task = task.with_priority(Priority::new(priority)?);
        }
        if let Some(list) = self.target_list {
            task = task.with_target_list(ListId::new(list)?);
        }
        if let Some(due_date) = self.due_date {
            task = task.with_due_date(due_date);
        }
        Ok(task)
    }
}

impl RemoteArgs {
    fn into_config(self, state_path: Utf8PathBuf) -> Result<SyncConfig, ConfigError> {
        Ok(SyncConfig {
            api_token: self.api_key,
            api_base_url: self.api_url,
            default_list_id: ListId::new(self.list_id)?,
            default_assignees: parse_assignee_list(&self.default_assignees)?,
            buckets_path: self.buckets,
            state_path,
            slack_webhook_url: self.slack_webhook,
            slack_template: self.slack_template,
            members_path: self.members,
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clickflow=info")),
        )
        .with_target(true)
        .init();
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
        Err(err) => debug!(error = %err, "No .env file loaded"),
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "clickflow failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, BoxError> {
    match cli.command {
        Commands::Upsert { remote, task } => {
            let config = remote.into_config(cli.state_file)?;
            upsert(&config, task.into_record()?).await
        }
        Commands::State => {
            write_state(&cli.state_file, &mut io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn write_state(state_file: &Utf8Path, out: &mut impl Write) -> Result<(), BoxError> {
    let store = JsonFileStateStore::load(state_file)?;
    let rendered = serde_json::to_string_pretty(&store.snapshot())?;
    writeln!(out, "{rendered}")?;
    Ok(())
}

async fn upsert(config: &SyncConfig, task: TaskRecord) -> Result<ExitCode, BoxError> {
    let gateway = ClickUpGateway::new(config.api_token.as_str()).with_base_url(&config.api_base_url);
    let store = JsonFileStateStore::load(&config.state_path)?;
    let mut engine = SyncEngine::new(
        Arc::new(gateway),
        store,
        Arc::new(DefaultClock),
        config.engine_config()?,
    );
    if config.wants_slack() {
        engine = engine.with_notifier(slack_notifier(config)?);
    }

    info!(internal_id = %task.internal_id(), "Syncing task");
    Ok(match engine.upsert(&task).await {
        Some(_) => ExitCode::SUCCESS,
        None => ExitCode::FAILURE,
    })
}

fn slack_notifier(config: &SyncConfig) -> Result<Arc<dyn UpsertNotifier>, BoxError> {
    let members = config.member_directory()?;
    let webhook = config.slack_webhook_url.clone();
    let notifier: Arc<dyn UpsertNotifier> = match &config.slack_template {
        Some(template) => Arc::new(SlackNotifier::with_formatter(
            webhook,
            members,
            TemplateFormatter::new(template.as_str())?,
        )),
        None => Arc::new(SlackNotifier::new(webhook, members)),
    };
    Ok(notifier)
}
