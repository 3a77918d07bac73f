use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, bail};
use clap::{ArgAction, Parser};
use relay_core::JanitorConfig;
use relay_observe::{LoggerConfig, LoggerFormat, LoggerLevel, LoggerTimeZone};
use relay_provider::{ApiKey, DeploymentConfig};

/// Runtime configuration for the `relay-agentd` binary.
///
/// Every value can be given as a CLI flag or through the environment; a `.env`
/// file in the working directory is loaded first.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "relay-agentd",
    version,
    about = "Asynchronous submit/poll relay in front of a text-generation provider"
)]
pub struct CliArgs {
    /// Address the HTTP server listens on.
    ///
    /// Environment variable: `RELAY_ADDR`
    #[arg(long, env = "RELAY_ADDR", default_value_t = String::from("0.0.0.0:8000"))]
    pub addr: String,

    /// Bearer token for the provider API.
    ///
    /// Environment variable: `PROVIDER_API_KEY`
    #[arg(long, env = "PROVIDER_API_KEY", hide_env_values = true)]
    pub provider_api_key: String,

    /// Provider environment the deployment is resolved in.
    ///
    /// Environment variable: `PROVIDER_ENVIRONMENT`
    #[arg(long, env = "PROVIDER_ENVIRONMENT", default_value_t = String::from(relay_provider::deployment::DEFAULT_ENVIRONMENT))]
    pub provider_environment: String,

    /// Base URL of the provider API.
    ///
    /// Environment variable: `PROVIDER_BASE_URL`
    #[arg(long, env = "PROVIDER_BASE_URL", default_value_t = String::from(relay_provider::deployment::DEFAULT_BASE_URL))]
    pub provider_base_url: String,

    /// Deployment invoked for every job.
    ///
    /// Environment variable: `PROVIDER_DEPLOYMENT_KEY`
    #[arg(long, env = "PROVIDER_DEPLOYMENT_KEY", default_value_t = String::from("spacewell-blog"))]
    pub provider_deployment_key: String,

    /// Metadata attached to every invocation, as `key=value` pairs.
    ///
    /// Repeat the flag, or separate pairs with commas in the environment.
    ///
    /// Environment variable: `PROVIDER_METADATA`
    #[arg(long, env = "PROVIDER_METADATA", value_delimiter = ',', value_parser = parse_key_value)]
    pub provider_metadata: Vec<(String, String)>,

    /// Per-job execution timeout in seconds; `0` disables it.
    ///
    /// Environment variable: `PROVIDER_TIMEOUT_SECS`
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value_t = 120)]
    pub provider_timeout_secs: u64,

    /// Seconds between janitor sweeps.
    ///
    /// Environment variable: `SWEEP_INTERVAL_SECS`
    #[arg(long, env = "SWEEP_INTERVAL_SECS", default_value_t = 60)]
    pub sweep_interval_secs: u64,

    /// Seconds an uncollected result is kept. Must exceed the sweep interval.
    ///
    /// Environment variable: `ENTRY_LIFETIME_SECS`
    #[arg(long, env = "ENTRY_LIFETIME_SECS", default_value_t = 3600)]
    pub entry_lifetime_secs: u64,

    /// Seconds in-flight jobs are given to finish on shutdown.
    ///
    /// Environment variable: `SHUTDOWN_GRACE_SECS`
    #[arg(long, env = "SHUTDOWN_GRACE_SECS", default_value_t = 30)]
    pub shutdown_grace_secs: u64,

    /// `EnvFilter` expression, e.g. `info` or `relay_core=debug,info`.
    ///
    /// Environment variable: `LOG_LEVEL`
    #[arg(long, env = "LOG_LEVEL", default_value_t = String::from("info"))]
    pub log_level: String,

    /// Log output: `text`, `json` or `journald`.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", default_value_t = String::from("text"))]
    pub log_format: String,

    /// Colored text logs when stdout is a terminal.
    ///
    /// Environment variable: `LOG_COLOR`
    #[arg(long, env = "LOG_COLOR", default_value_t = true, action = ArgAction::Set)]
    pub log_color: bool,

    /// Timezone of log timestamps: `utc` or `local`.
    ///
    /// Environment variable: `LOG_TZ`
    #[arg(long, env = "LOG_TZ", default_value_t = String::from("utc"))]
    pub log_tz: String,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub addr: SocketAddr,
    pub provider: DeploymentConfig,
    pub job_timeout: Option<Duration>,
    pub janitor: JanitorConfig,
    pub shutdown_grace: Duration,
    pub logger: LoggerConfig,
}

impl TryFrom<CliArgs> for AgentConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let addr: SocketAddr = args
            .addr
            .parse()
            .with_context(|| format!("RELAY_ADDR '{}' is not a socket address", args.addr))?;

        if args.provider_api_key.trim().is_empty() {
            bail!("PROVIDER_API_KEY must not be empty");
        }

        let provider = args.provider_metadata.into_iter().fold(
            DeploymentConfig::new(ApiKey::new(args.provider_api_key), args.provider_deployment_key)
                .with_base_url(args.provider_base_url)
                .with_environment(args.provider_environment),
            |cfg, (key, value)| cfg.with_metadata(key, value),
        );
        provider.validate()?;

        let janitor = JanitorConfig::new(
            Duration::from_secs(args.sweep_interval_secs),
            Duration::from_secs(args.entry_lifetime_secs),
        )
        .context("invalid SWEEP_INTERVAL_SECS / ENTRY_LIFETIME_SECS")?;

        let job_timeout =
            (args.provider_timeout_secs > 0).then(|| Duration::from_secs(args.provider_timeout_secs));

        let logger = LoggerConfig {
            format: LoggerFormat::from_str(&args.log_format)?,
            level: LoggerLevel::new(args.log_level)?,
            use_color: args.log_color,
            tz: LoggerTimeZone::from_str(&args.log_tz)?,
            ..Default::default()
        };

        Ok(Self {
            addr,
            provider,
            job_timeout,
            janitor,
            shutdown_grace: Duration::from_secs(args.shutdown_grace_secs),
            logger,
        })
    }
}
