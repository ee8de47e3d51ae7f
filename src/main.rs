use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hci_acl::config::Config;
use hci_acl::hci::HciClient;
use hci_acl::resource::{NetworkAclRuleResource, ResourceData};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage HCI network ACL rules from declarative config
#[derive(Parser, Debug)]
#[command(name = "hci-acl", version, about, long_about = None)]
struct Args {
    /// HCI API URL (overrides HCI_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// HCI API key (overrides HCI_API_KEY and the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a rule from a config file and print its state
    Create {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Refresh a state file from the API and print it
    Read {
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Apply in-place changes from a config file to an existing rule
    Update {
        #[arg(short, long)]
        state: PathBuf,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Delete the rule recorded in a state file
    Delete {
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Import an existing rule by id and print its state
    Import {
        id: String,
        #[arg(short, long)]
        environment_id: String,
    },
    /// Print the resource schema
    Schema,
    /// Save the API URL and key to the config file
    Configure {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        key: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
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
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("hci-acl started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("hci-acl").join("hci-acl.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".hci-acl").join("hci-acl.log");
    }
    PathBuf::from("hci-acl.log")
}

/// Read a YAML or JSON map of attributes
fn load_resource_data(path: &Path) -> Result<ResourceData> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let value: serde_json::Value =
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))?;
    Ok(ResourceData::from_value(&value)?)
}

fn print_state(data: &ResourceData) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&data.to_value())?);
    Ok(())
}

fn build_resource(args: &Args, config: &Config) -> Result<NetworkAclRuleResource<HciClient>> {
    let api_url = args
        .api_url
        .clone()
        .unwrap_or_else(|| config.effective_api_url());
    let Some(api_key) = args.api_key.clone().or_else(|| config.effective_api_key()) else {
        bail!("No HCI API key configured. Set HCI_API_KEY or use --api-key");
    };

    tracing::info!("Using API: {}", api_url);
    let client = HciClient::new(&api_url, &api_key).context("Failed to create HCI client")?;
    Ok(NetworkAclRuleResource::new(client))
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();

    match &args.command {
        Command::Schema => {
            let schema = hci_acl::resource::network_acl_rule_schema();
            println!("{}", serde_json::to_string_pretty(schema)?);
        }
        Command::Configure { url, key } => {
            if let Some(url) = url {
                config.api_url = Some(url.clone());
            }
            if let Some(key) = key {
                config.api_key = Some(key.clone());
            }
            config.save().context("Failed to save config")?;
        }
        Command::Create { config: path } => {
            let resource = build_resource(&args, &config)?;
            let mut data = load_resource_data(path)?;
            resource.schema().validate(&data)?;
            resource.create(&mut data).await?;
            print_state(&data)?;
        }
        Command::Read { state } => {
            let resource = build_resource(&args, &config)?;
            let mut data = load_resource_data(state)?;
            resource.read(&mut data).await?;
            if data.is_empty() {
                eprintln!("Network ACL rule no longer exists");
            }
            print_state(&data)?;
        }
        Command::Update { state, config: path } => {
            let resource = build_resource(&args, &config)?;
            let prior = load_resource_data(state)?;
            let mut data = load_resource_data(path)?;
            resource.schema().validate(&data)?;

            let replace = resource.schema().requires_replace(&prior, &data);
            if !replace.is_empty() {
                bail!(
                    "Cannot update in place, these attributes force a new rule: {}",
                    replace.join(", ")
                );
            }

            data.set_id(prior.id());
            resource.update(&mut data).await?;
            print_state(&data)?;
        }
        Command::Delete { state } => {
            let resource = build_resource(&args, &config)?;
            let mut data = load_resource_data(state)?;
            resource.delete(&mut data).await?;
            print_state(&data)?;
        }
        Command::Import { id, environment_id } => {
            let resource = build_resource(&args, &config)?;
            let mut data = resource.import(id);
            data.set("environment_id", environment_id.as_str());
            resource.read(&mut data).await?;
            if data.is_empty() {
                bail!("Network ACL rule {} not found", id);
            }
            print_state(&data)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    run(args).await
}
