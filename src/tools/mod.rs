//! Tool trait and registry
//!
//! The callable operations exposed to the model form a closed, explicitly
//! enumerated set: each tool carries a static name, a natural-language
//! usage description and a JSON parameter schema, and wraps exactly one
//! Sectors data-access operation.

use crate::error::AgentError;
use crate::models::ToolDeclaration;
use crate::sectors::SectorsClient;
use crate::Result;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for a single callable operation
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON Schema for the tool's arguments, advertised to the model.
    fn parameters(&self) -> Value;
    async fn execute(&self, args: &Value) -> Result<Value>;
}

/// Tool registry for looking up and executing tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn list(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Render the registry as OpenAI-format tool declarations, in
    /// registration order.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| {
                ToolDeclaration::function(tool.name(), tool.description(), tool.parameters())
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            AgentError::InvalidToolArguments(format!("Expected a non-empty '{}' string", key))
        })
}

fn ticker_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "ticker": {
                "type": "string",
                "description": "Stock exchange ticker symbol of the company, e.g. BBCA"
            }
        },
        "required": ["ticker"]
    })
}

pub struct TopDividendTool {
    api: SectorsClient,
}

#[async_trait::async_trait]
impl Tool for TopDividendTool {
    fn name(&self) -> &'static str {
        "get_top_dividend"
    }

    fn description(&self) -> &'static str {
        "Fetch the companies with the highest dividend yield for a year. \
         Dividend yield values are fractions and must be presented as \
         percentages, e.g. 0.5 means 50%. Always pass the most recent year."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "year": {
                    "type": "string",
                    "description": "Year to fetch dividend yield data for, always the most recent year"
                }
            },
            "required": ["year"]
        })
    }

    async fn execute(&self, args: &Value) -> Result<Value> {
        let year = require_str(args, "year")?;
        Ok(self.api.top_dividend(year).await)
    }
}

pub struct CompanyOverviewTool {
    api: SectorsClient,
}

#[async_trait::async_trait]
impl Tool for CompanyOverviewTool {
    fn name(&self) -> &'static str {
        "get_company_overview"
    }

    fn description(&self) -> &'static str {
        "Overview of a company: general information, business summary, and \
         key financial figures."
    }

    fn parameters(&self) -> Value {
        ticker_parameters()
    }

    async fn execute(&self, args: &Value) -> Result<Value> {
        let ticker = require_str(args, "ticker")?;
        Ok(self.api.company_overview(ticker).await)
    }
}

pub struct CompanyFinancialsTool {
    api: SectorsClient,
}

#[async_trait::async_trait]
impl Tool for CompanyFinancialsTool {
    fn name(&self) -> &'static str {
        "get_company_financials"
    }

    fn description(&self) -> &'static str {
        "Financial data for a company. Highlight trends in revenue, earnings \
         and free cash flow, and the growth or stability of those figures."
    }

    fn parameters(&self) -> Value {
        ticker_parameters()
    }

    async fn execute(&self, args: &Value) -> Result<Value> {
        let ticker = require_str(args, "ticker")?;
        Ok(self.api.company_financials(ticker).await)
    }
}

pub struct CompanyDividendTool {
    api: SectorsClient,
}

#[async_trait::async_trait]
impl Tool for CompanyDividendTool {
    fn name(&self) -> &'static str {
        "get_company_dividend"
    }

    fn description(&self) -> &'static str {
        "Dividend data for a company. Show the stability or growth of the \
         dividend payout, and analyse the payout ratio where possible."
    }

    fn parameters(&self) -> Value {
        ticker_parameters()
    }

    async fn execute(&self, args: &Value) -> Result<Value> {
        let ticker = require_str(args, "ticker")?;
        Ok(self.api.company_dividend(ticker).await)
    }
}

/// Create the default registry with the four Sectors-backed tools.
pub fn create_default_registry(api: SectorsClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(TopDividendTool { api: api.clone() }));
    registry.register(Arc::new(CompanyOverviewTool { api: api.clone() }));
    registry.register(Arc::new(CompanyFinancialsTool { api: api.clone() }));
    registry.register(Arc::new(CompanyDividendTool { api }));

    registry
}
