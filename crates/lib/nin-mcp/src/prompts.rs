use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{PromptMessage, PromptMessageRole},
    prompt,
    prompt_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::NinMcp;

#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
pub struct MarketAnalysisArgs {
    /// Optional sector to focus on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// Timeframe for analysis (e.g., 'daily', 'weekly', 'monthly')
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

pub fn market_analysis_text(args: &MarketAnalysisArgs) -> String {
    let sector = non_blank(args.sector.as_deref()).unwrap_or("overall market");
    let timeframe = non_blank(args.timeframe.as_deref()).unwrap_or("daily");
    format!(
        "Generate a comprehensive {timeframe} analysis of the {sector}, including key trends, \
         notable movers, and potential opportunities. Include relevant technical and \
         fundamental factors."
    )
}

#[prompt_router(router = "prompt_router_market", vis = "pub")]
impl NinMcp {
    #[prompt(name = "market-analysis", description = "Generate a market analysis report")]
    async fn market_analysis(
        &self,
        Parameters(args): Parameters<MarketAnalysisArgs>,
    ) -> Result<Vec<PromptMessage>, ErrorData> {
        Ok(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            market_analysis_text(&args),
        )])
    }
}
