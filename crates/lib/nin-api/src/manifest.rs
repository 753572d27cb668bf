//! Capability discovery documents served under `/api`.

use nin_store::schema::ToolName;
use serde_json::{Value, json};

const NAME: &str = "NIN Terminal";
const DESCRIPTION: &str = "Financial analysis tools for Indian markets";
const CONTACT_EMAIL: &str = "support@ninterm.com";
const MCP_SERVER_NAME: &str = "NIN Terminal MCP Server";
const DOCUMENT_VERSION: &str = "1.0.0";

/// Plugin-style manifest pointing at the OpenAPI document on `host`.
#[must_use]
pub fn capability_manifest(host: &str) -> Value {
    json!({
        "schema_version": "v1",
        "name": NAME,
        "description": DESCRIPTION,
        "auth": { "type": "none" },
        "api": {
            "type": "openapi",
            "url": format!("http://{host}/api/openapi.json"),
        },
        "contact_email": CONTACT_EMAIL,
        "logo_url": format!("http://{host}/logo.png"),
        "legal_info_url": format!("http://{host}/legal"),
        "mcp_server": {
            "name": MCP_SERVER_NAME,
            "description": "Financial analysis tools for Indian markets via MCP",
            "path": "/mcp",
        },
    })
}

/// OpenAPI 3.0 description of the umbrella tool endpoint.
#[must_use]
pub fn openapi_document(host: &str) -> Value {
    let tool_names: Vec<&str> = ToolName::ALL.iter().map(|tool| tool.as_str()).collect();
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "NIN Terminal API",
            "description": DESCRIPTION,
            "version": DOCUMENT_VERSION,
        },
        "servers": [{ "url": format!("http://{host}/api") }],
        "paths": {
            "/claude/mcp": {
                "post": {
                    "summary": "Execute MCP tools",
                    "operationId": "executeMcpTool",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "required": ["name", "arguments"],
                                    "properties": {
                                        "name": {
                                            "type": "string",
                                            "description": "The name of the tool to execute",
                                            "enum": tool_names,
                                        },
                                        "arguments": {
                                            "type": "object",
                                            "description": "Tool arguments; see the MCP tool schemas",
                                        },
                                    },
                                },
                            },
                        },
                    },
                    "responses": {
                        "200": {
                            "description": "Tool executed successfully",
                            "content": {
                                "application/json": {
                                    "schema": envelope_schema(),
                                },
                            },
                        },
                        "400": {
                            "description": "Unknown tool or invalid arguments",
                        },
                    },
                },
            },
        },
    })
}

fn envelope_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "messages": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "role": { "type": "string" },
                        "content": { "type": "string" },
                    },
                },
            },
            "references": {
                "type": "array",
                "items": { "type": "object" },
            },
        },
    })
}

/// Tool listing for MCP client configuration.
#[must_use]
pub fn mcp_config() -> Value {
    let tools: Vec<Value> = ToolName::ALL
        .iter()
        .map(|tool| json!({ "name": tool.as_str(), "description": tool.description() }))
        .collect();
    json!({
        "name": MCP_SERVER_NAME,
        "version": DOCUMENT_VERSION,
        "description": DESCRIPTION,
        "tools": tools,
    })
}
