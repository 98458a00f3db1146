use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use terraform_provider_cortex::cortex::http::http_debug_enabled;
use terraform_provider_cortex::provider::plan::plan_resource;
use terraform_provider_cortex::provider::resource::{
    CreateRequest, DeleteRequest, ImportStateRequest, ReadDataSourceRequest, ReadRequest,
    StateResponse, UpdateRequest,
};
use terraform_provider_cortex::provider::root::PROVIDER_NAME;
use terraform_provider_cortex::provider::{CortexProvider, Diagnostics};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Terraform provider for the Cortex service catalog
#[derive(Parser, Debug)]
#[command(name = "terraform-provider-cortex", version = terraform_provider_cortex::VERSION, about, long_about = None)]
struct Args {
    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Cortex API base URL (falls back to CORTEX_API_URL)
    #[arg(long, global = true)]
    base_api_url: Option<String>,

    /// Cortex API token (falls back to CORTEX_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print provider, resource and data source schemas as JSON
    Schema,
    /// Plan a resource from its configuration and optional prior state
    Plan {
        type_name: String,
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        prior: Option<PathBuf>,
    },
    /// Plan and create a resource
    Create {
        type_name: String,
        #[arg(long)]
        config: PathBuf,
    },
    /// Refresh a resource's state
    Read {
        type_name: String,
        #[arg(long)]
        state: PathBuf,
    },
    /// Plan against the prior state and update a resource
    Update {
        type_name: String,
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        prior: PathBuf,
    },
    /// Delete a resource
    Delete {
        type_name: String,
        #[arg(long)]
        state: PathBuf,
    },
    /// Import an existing object by identifier
    Import { type_name: String, id: String },
    /// Read a data source
    Data {
        type_name: String,
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    // HTTP_DEBUG is pointless without a debug-level subscriber
    let level = if http_debug_enabled() {
        level.max(LogLevel::Debug)
    } else {
        level
    };
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(tracing_level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(
        "terraform-provider-{} {} started with log level: {:?}",
        PROVIDER_NAME,
        terraform_provider_cortex::VERSION,
        level
    );
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    let file_name = "terraform-provider-cortex.log";
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("terraform-provider-cortex").join(file_name);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".terraform-provider-cortex").join(file_name);
    }
    PathBuf::from(file_name)
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("{:?} is not valid JSON", path))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON output")?;
    println!("{}", rendered);
    Ok(())
}

/// Diagnostics to stderr; failure exit code when any is an error
fn report(diagnostics: &Diagnostics) -> ExitCode {
    for diagnostic in diagnostics.iter() {
        eprintln!("{}", diagnostic);
    }
    if diagnostics.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn finish(response: StateResponse) -> Result<ExitCode> {
    if !response.diagnostics.has_errors() {
        print_json(&response.state.unwrap_or(Value::Null))?;
    }
    Ok(report(&response.diagnostics))
}

struct Cli {
    args: Args,
    provider: CortexProvider,
}

impl Cli {
    fn new(args: Args) -> Self {
        Self {
            args,
            provider: CortexProvider::new(),
        }
    }

    /// Configure the provider from flags and environment
    fn configure(&mut self) -> Option<ExitCode> {
        let config = json!({
            "base_api_url": self.args.base_api_url,
            "token": self.args.token,
        });
        let diagnostics = self.provider.configure(&config);
        diagnostics.has_errors().then(|| report(&diagnostics))
    }

    /// Plan `config` for `type_name`, reporting failures
    fn plan(&self, type_name: &str, config: &Value, prior: Option<&Value>) -> Result<Result<Value, ExitCode>> {
        let Some(resource) = self.provider.resource(type_name) else {
            bail!("Unknown resource type {:?}", type_name);
        };
        let change = plan_resource(&resource.schema(), config, prior);
        if change.diagnostics.has_errors() {
            return Ok(Err(report(&change.diagnostics)));
        }
        Ok(Ok(change.planned_state))
    }

    async fn run(mut self) -> Result<ExitCode> {
        if let Command::Schema = self.args.command {
            print_json(&self.provider.schemas())?;
            return Ok(ExitCode::SUCCESS);
        }
        if let Command::Plan {
            type_name,
            config,
            prior,
        } = &self.args.command
        {
            let Some(resource) = self.provider.resource(type_name) else {
                bail!("Unknown resource type {:?}", type_name);
            };
            let config = read_json(config)?;
            let prior = prior.as_deref().map(read_json).transpose()?;
            let change = plan_resource(&resource.schema(), &config, prior.as_ref());
            if !change.diagnostics.has_errors() {
                print_json(&change)?;
            }
            return Ok(report(&change.diagnostics));
        }

        if let Some(code) = self.configure() {
            return Ok(code);
        }

        match &self.args.command {
            Command::Schema | Command::Plan { .. } => Ok(ExitCode::SUCCESS),
            Command::Create { type_name, config } => {
                let config = read_json(config)?;
                let planned_state = match self.plan(type_name, &config, None)? {
                    Ok(planned) => planned,
                    Err(code) => return Ok(code),
                };
                let resource = self.resource(type_name)?;
                finish(resource.create(CreateRequest { planned_state, config }).await)
            }
            Command::Read { type_name, state } => {
                let current_state = read_json(state)?;
                let resource = self.resource(type_name)?;
                finish(resource.read(ReadRequest { current_state }).await)
            }
            Command::Update {
                type_name,
                config,
                prior,
            } => {
                let config = read_json(config)?;
                let prior_state = read_json(prior)?;
                let planned_state = match self.plan(type_name, &config, Some(&prior_state))? {
                    Ok(planned) => planned,
                    Err(code) => return Ok(code),
                };
                let resource = self.resource(type_name)?;
                let request = UpdateRequest {
                    prior_state,
                    planned_state,
                    config,
                };
                finish(resource.update(request).await)
            }
            Command::Delete { type_name, state } => {
                let prior_state = read_json(state)?;
                let resource = self.resource(type_name)?;
                let response = resource.delete(DeleteRequest { prior_state }).await;
                Ok(report(&response.diagnostics))
            }
            Command::Import { type_name, id } => {
                let resource = self.resource(type_name)?;
                finish(resource.import_state(ImportStateRequest { id: id.clone() }).await)
            }
            Command::Data { type_name, config } => {
                let config = read_json(config)?;
                let Some(data_source) = self.provider.data_source(type_name) else {
                    bail!("Unknown data source type {:?}", type_name);
                };
                finish(data_source.read(ReadDataSourceRequest { config }).await)
            }
        }
    }

    fn resource(
        &self,
        type_name: &str,
    ) -> Result<Box<dyn terraform_provider_cortex::provider::resource::Resource>> {
        self.provider
            .resource(type_name)
            .with_context(|| format!("Unknown resource type {:?}", type_name))
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    Cli::new(args).run().await
}
