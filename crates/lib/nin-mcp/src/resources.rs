//! Read-only MCP resources backed by the market desk.

use rmcp::ErrorData;
use rmcp::model::{
    AnnotateAble,
    ErrorCode,
    RawResource,
    ReadResourceResult,
    Resource,
    ResourceContents,
};
use serde_json::json;

use crate::{NinMcp, helpers};

pub const MARKET_DATA_URI: &str = "nin://market-data";

/// Index levels, sector performance and key news as JSON.
#[must_use]
pub fn market_data_resource() -> Resource {
    let mut raw = RawResource::new(MARKET_DATA_URI, "market-data");
    raw.description =
        Some("Index levels, sector performance and key news from the market desk".to_string());
    raw.mime_type = Some("application/json".to_string());
    raw.no_annotation()
}

impl NinMcp {
    pub(crate) fn read_market_resource(&self, uri: &str) -> Result<ReadResourceResult, ErrorData> {
        if uri != MARKET_DATA_URI {
            return Err(ErrorData::resource_not_found(
                format!("unknown resource: {uri}"),
                Some(json!({ "uri": uri })),
            ));
        }
        let snapshot = self.gateway.control().desk().market_overview(None);
        let text = serde_json::to_string_pretty(&snapshot)
            .map_err(|err| helpers::mcp_err(ErrorCode::INTERNAL_ERROR, err.to_string()))?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }
}

#[cfg(test)]
mod tests {
    use nin_core::gateway::{GatewayConfig, ToolGateway};
    use serde_json::Value;

    use super::*;

    fn server() -> NinMcp {
        NinMcp::new(ToolGateway::new(&GatewayConfig::default()))
    }

    #[test]
    fn market_data_is_listed_as_json() {
        let resource = market_data_resource();
        assert_eq!(resource.raw.uri, MARKET_DATA_URI);
        assert_eq!(resource.raw.name, "market-data");
        assert_eq!(resource.raw.mime_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn market_data_serves_the_desk_snapshot() {
        let result = server()
            .read_market_resource(MARKET_DATA_URI)
            .expect("market data");
        assert_eq!(result.contents.len(), 1);
        let ResourceContents::TextResourceContents { text, .. } = &result.contents[0] else {
            panic!("expected text contents");
        };
        let value: Value = serde_json::from_str(text).expect("json snapshot");
        assert_eq!(value["overview"]["keyIndices"][0]["name"], "NIFTY 50");
    }

    #[test]
    fn unknown_resource_is_not_found() {
        let err = server()
            .read_market_resource("nin://unknown")
            .expect_err("unknown uri");
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
    }
}
