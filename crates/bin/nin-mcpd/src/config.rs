use clap::{Parser, ValueEnum, builder::BoolishValueParser};
use nin_core::gateway::GatewayConfig;
use nin_core::providers::{
    BinanceConfig,
    DEFAULT_BINANCE_BASE_URL,
    DEFAULT_GROWW_BASE_URL,
    GrowwConfig,
};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";
const DEFAULT_API_ADDR: &str = "127.0.0.1:4030";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 45;
const DEFAULT_API_TIMEOUT_SECS: u64 = 60;
const DEFAULT_API_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Log output format written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "nin-mcpd", version, about = "NIN Terminal MCP daemon.")]
#[allow(clippy::struct_excessive_bools)]
struct CliArgs {
    #[arg(long, env = "GROWW_API_KEY", hide_env_values = true)]
    groww_api_key: Option<String>,

    #[arg(long, env = "GROWW_BASE_URL", default_value = DEFAULT_GROWW_BASE_URL)]
    groww_base_url: String,

    #[arg(long, env = "BINANCE_API_KEY", hide_env_values = true)]
    binance_api_key: Option<String>,

    #[arg(long, env = "BINANCE_SECRET_KEY", hide_env_values = true)]
    binance_secret_key: Option<String>,

    #[arg(long, env = "BINANCE_BASE_URL", default_value = DEFAULT_BINANCE_BASE_URL)]
    binance_base_url: String,

    #[arg(
        long,
        env = "NIN_PROVIDER_TIMEOUT_SECS",
        default_value_t = DEFAULT_PROVIDER_TIMEOUT_SECS
    )]
    provider_timeout_secs: u64,

    #[arg(
        long,
        env = "NIN_TOOL_TIMEOUT_SECS",
        default_value_t = DEFAULT_TOOL_TIMEOUT_SECS
    )]
    tool_timeout_secs: u64,

    #[arg(
        long = "stdio",
        env = "NIN_ENABLE_STDIO",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long,
        env = "NIN_MCP_SERVE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long, env = "NIN_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long,
        env = "NIN_API_SERVE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    api_serve: bool,

    #[arg(long, env = "NIN_API_ADDR", default_value = DEFAULT_API_ADDR)]
    api_addr: SocketAddr,

    #[arg(
        long,
        env = "NIN_API_TIMEOUT_SECS",
        default_value_t = DEFAULT_API_TIMEOUT_SECS
    )]
    api_timeout_secs: u64,

    #[arg(
        long,
        env = "NIN_API_MAX_BODY_BYTES",
        default_value_t = DEFAULT_API_MAX_BODY_BYTES
    )]
    api_max_body_bytes: usize,

    #[arg(long, env = "NIN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone)]
pub struct NinConfig {
    pub groww: GrowwConfig,
    pub binance: BinanceConfig,
    pub tool_timeout: Option<Duration>,
    pub enable_stdio: bool,
    pub mcp_serve: bool,
    pub mcp_http_addr: SocketAddr,
    pub api_serve: bool,
    pub api_addr: SocketAddr,
    pub api_timeout: Duration,
    pub api_max_body_bytes: usize,
    pub log_format: LogFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl NinConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::default()
            .with_groww(self.groww.clone())
            .with_binance(self.binance.clone())
            .with_tool_timeout(self.tool_timeout)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn base_url(name: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidSetting { name, value })
    }
}

impl TryFrom<CliArgs> for NinConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.provider_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "NIN_PROVIDER_TIMEOUT_SECS",
                value: args.provider_timeout_secs.to_string(),
            });
        }
        if args.api_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "NIN_API_TIMEOUT_SECS",
                value: args.api_timeout_secs.to_string(),
            });
        }
        if args.tool_timeout_secs != 0 && args.api_timeout_secs <= args.tool_timeout_secs {
            return Err(ConfigError::InvalidSetting {
                name: "NIN_API_TIMEOUT_SECS",
                value: format!(
                    "{} (must exceed NIN_TOOL_TIMEOUT_SECS={})",
                    args.api_timeout_secs, args.tool_timeout_secs
                ),
            });
        }
        if !(args.enable_stdio || args.mcp_serve || args.api_serve) {
            return Err(ConfigError::MissingSetting(
                "NIN_ENABLE_STDIO, NIN_MCP_SERVE or NIN_API_SERVE",
            ));
        }

        let provider_timeout = Duration::from_secs(args.provider_timeout_secs);
        let tool_timeout = if args.tool_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(args.tool_timeout_secs))
        };

        let mut groww = GrowwConfig::default()
            .with_base_url(base_url("GROWW_BASE_URL", args.groww_base_url)?)
            .with_timeout(provider_timeout);
        if let Some(api_key) = non_blank(args.groww_api_key) {
            groww = groww.with_api_key(api_key);
        }

        let mut binance = BinanceConfig::default()
            .with_base_url(base_url("BINANCE_BASE_URL", args.binance_base_url)?)
            .with_timeout(provider_timeout);
        binance.api_key = non_blank(args.binance_api_key);
        binance.secret_key = non_blank(args.binance_secret_key);

        Ok(Self {
            groww,
            binance,
            tool_timeout,
            enable_stdio: args.enable_stdio,
            mcp_serve: args.mcp_serve,
            mcp_http_addr: args.mcp_http_addr,
            api_serve: args.api_serve,
            api_addr: args.api_addr,
            api_timeout: Duration::from_secs(args.api_timeout_secs),
            api_max_body_bytes: args.api_max_body_bytes,
            log_format: args.log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            groww_api_key: None,
            groww_base_url: DEFAULT_GROWW_BASE_URL.to_string(),
            binance_api_key: None,
            binance_secret_key: None,
            binance_base_url: DEFAULT_BINANCE_BASE_URL.to_string(),
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            enable_stdio: true,
            mcp_serve: false,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            api_serve: false,
            api_addr: DEFAULT_API_ADDR.parse().expect("valid API addr"),
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            api_max_body_bytes: DEFAULT_API_MAX_BODY_BYTES,
            log_format: LogFormat::Text,
        }
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let mut args = base_args();
        args.groww_api_key = Some("   ".to_string());
        args.binance_api_key = Some("key".to_string());
        args.binance_secret_key = Some(String::new());

        let config = NinConfig::try_from(args).expect("config should parse");

        assert!(!config.groww.has_credentials());
        assert!(!config.binance.has_credentials());
        assert_eq!(config.binance.api_key.as_deref(), Some("key"));
    }

    #[test]
    fn credentials_and_timeouts_reach_the_gateway() {
        let mut args = base_args();
        args.groww_api_key = Some("token".to_string());
        args.provider_timeout_secs = 5;
        args.groww_base_url = "http://localhost:9000/".to_string();

        let config = NinConfig::try_from(args).expect("config should parse");
        let gateway = config.gateway_config();

        assert!(gateway.groww.has_credentials());
        assert_eq!(gateway.groww.base_url, "http://localhost:9000");
        assert_eq!(gateway.groww.timeout, Duration::from_secs(5));
        assert_eq!(gateway.binance.timeout, Duration::from_secs(5));
        assert_eq!(gateway.tool_timeout, Some(Duration::from_secs(45)));
    }

    #[test]
    fn zero_tool_timeout_disables_it() {
        let mut args = base_args();
        args.tool_timeout_secs = 0;

        let config = NinConfig::try_from(args).expect("config should parse");

        assert!(config.tool_timeout.is_none());
    }

    #[test]
    fn zero_provider_timeout_is_rejected() {
        let mut args = base_args();
        args.provider_timeout_secs = 0;

        let err = NinConfig::try_from(args).err().expect("should fail");

        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                name: "NIN_PROVIDER_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn api_timeout_must_outlast_the_tool_timeout() {
        let mut args = base_args();
        args.api_timeout_secs = 30;

        let err = NinConfig::try_from(args).err().expect("should fail");

        assert_eq!(
            err.to_string(),
            "invalid NIN_API_TIMEOUT_SECS value: 30 (must exceed NIN_TOOL_TIMEOUT_SECS=45)"
        );
    }

    #[test]
    fn disabled_tool_timeout_leaves_api_timeout_free() {
        let mut args = base_args();
        args.tool_timeout_secs = 0;
        args.api_timeout_secs = 5;

        let config = NinConfig::try_from(args).expect("config should parse");

        assert_eq!(config.api_timeout, Duration::from_secs(5));
    }

    #[test]
    fn base_url_must_be_http() {
        let mut args = base_args();
        args.binance_base_url = "api.binance.com".to_string();

        let err = NinConfig::try_from(args).err().expect("should fail");

        assert_eq!(err.to_string(), "invalid BINANCE_BASE_URL value: api.binance.com");
    }

    #[test]
    fn at_least_one_surface_is_required() {
        let mut args = base_args();
        args.enable_stdio = false;

        let err = NinConfig::try_from(args).err().expect("should fail");

        assert!(matches!(err, ConfigError::MissingSetting(_)));
    }
}
