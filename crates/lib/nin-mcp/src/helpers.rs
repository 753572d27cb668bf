use std::borrow::Cow;

use nin_core::gateway::ToolResponse;
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, ErrorCode};

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

/// Summary text first, then the references as JSON. Failures carry only
/// the message and are flagged as tool errors.
pub fn call_result(response: &ToolResponse) -> Result<CallToolResult, ErrorData> {
    let envelope = &response.envelope;
    let text = Content::text(envelope.summary());
    if !response.is_success() {
        return Ok(CallToolResult::error(vec![text]));
    }
    let references = Content::json(&envelope.references)?;
    Ok(CallToolResult::success(vec![text, references]))
}
