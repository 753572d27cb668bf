use std::{error::Error, fmt, time::Duration};

use nin_store::envelope::{Reference, ResponseEnvelope};
use nin_store::schema::ToolName;
use serde::Serialize;

use crate::market::MarketDesk;
use crate::providers::{BinanceClient, BinanceConfig, GrowwClient, GrowwConfig, ProviderError};

pub mod analysis;
pub mod binance;
pub mod groww;

/// Coarse classification of a [`ToolError`], stable enough to assert on.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidTool,
    InvalidArguments,
    Provider,
    Configuration,
    Timeout,
    Internal,
}

impl ToolErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidTool => "invalid_tool",
            Self::InvalidArguments => "invalid_arguments",
            Self::Provider => "provider",
            Self::Configuration => "configuration",
            Self::Timeout => "timeout",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum ToolError {
    /// The requested name is not a registered tool.
    InvalidTool(String),
    InvalidArguments {
        tool: ToolName,
        message: String,
    },
    /// A provider call failed; `context` is the caller-facing prefix.
    Provider {
        context: String,
        source: ProviderError,
    },
    Timeout {
        tool: ToolName,
        after: Duration,
    },
    Encode(serde_json::Error),
}

impl ToolError {
    #[must_use]
    pub const fn kind(&self) -> ToolErrorKind {
        match self {
            Self::InvalidTool(_) => ToolErrorKind::InvalidTool,
            Self::InvalidArguments { .. } => ToolErrorKind::InvalidArguments,
            Self::Provider { source, .. } if source.is_configuration() => {
                ToolErrorKind::Configuration
            }
            Self::Provider { .. } => ToolErrorKind::Provider,
            Self::Timeout { .. } => ToolErrorKind::Timeout,
            Self::Encode(_) => ToolErrorKind::Internal,
        }
    }

    /// Wraps a provider failure under a caller-facing prefix.
    #[must_use]
    pub fn provider(context: impl Into<String>) -> impl FnOnce(ProviderError) -> Self {
        let context = context.into();
        move |source| Self::Provider { context, source }
    }

    /// Failure envelope for this error: one message, no references.
    #[must_use]
    pub fn to_envelope(&self) -> ResponseEnvelope {
        ResponseEnvelope::failure(self.to_string())
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTool(name) => {
                write!(f, "I'm sorry, the tool \"{name}\" is not available.")
            }
            Self::InvalidArguments { tool, message } => {
                write!(f, "Invalid arguments for {tool}: {message}")
            }
            Self::Provider { context, source } => write!(f, "{context}: {source}"),
            Self::Timeout { tool, after } => {
                write!(f, "{tool} timed out after {}s", after.as_secs())
            }
            Self::Encode(err) => write!(f, "failed to encode result: {err}"),
        }
    }
}

impl Error for ToolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Provider { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err)
    }
}

/// Success envelope whose reference carries `metadata` serialised to JSON.
pub(crate) fn envelope<T: Serialize + ?Sized>(
    summary: impl Into<String>,
    title: impl Into<String>,
    content: impl Into<String>,
    metadata: &T,
) -> Result<ResponseEnvelope, ToolError> {
    let reference = Reference::text(title, content).with_metadata(serde_json::to_value(metadata)?);
    Ok(ResponseEnvelope::success(summary, reference))
}

/// Handlers for every tool, grouped by domain in the submodules.
#[derive(Debug, Clone)]
pub struct NinControlPlane {
    desk: MarketDesk,
    groww: GrowwClient,
    binance: BinanceClient,
}

impl NinControlPlane {
    #[must_use]
    pub fn new(desk: MarketDesk, groww: &GrowwConfig, binance: &BinanceConfig) -> Self {
        Self {
            desk,
            groww: GrowwClient::new(groww),
            binance: BinanceClient::new(binance),
        }
    }

    #[must_use]
    pub const fn desk(&self) -> &MarketDesk {
        &self.desk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_classify_as_configuration() {
        let err = ToolError::provider("Error fetching Groww holdings")(
            ProviderError::MissingCredentials("Groww API key not configured"),
        );
        assert_eq!(err.kind(), ToolErrorKind::Configuration);
        assert_eq!(
            err.to_string(),
            "Error fetching Groww holdings: Groww API key not configured"
        );
    }

    #[test]
    fn timeout_renders_seconds() {
        let err = ToolError::Timeout {
            tool: ToolName::GetGrowwHoldings,
            after: Duration::from_secs(45),
        };
        assert_eq!(err.kind(), ToolErrorKind::Timeout);
        assert_eq!(err.to_string(), "getGrowwHoldings timed out after 45s");
    }

    #[test]
    fn failure_envelope_has_no_references() {
        let envelope = ToolError::InvalidTool("riskAssessment".to_string()).to_envelope();
        assert_eq!(
            envelope.summary(),
            "I'm sorry, the tool \"riskAssessment\" is not available."
        );
        assert!(envelope.references.is_empty());
    }

    #[test]
    fn kinds_serialise_in_snake_case() {
        let value = serde_json::to_value(ToolErrorKind::InvalidArguments).expect("serialise");
        assert_eq!(value, "invalid_arguments");
    }
}
