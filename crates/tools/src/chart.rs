//! Chart rendering capability.

use async_trait::async_trait;
use serde_json::{Value, json};
use shopscope_charts::{ChartKind, ChartRenderer, ChartSpec};
use shopscope_core::error::{ChartError, ToolError};
use shopscope_core::tool::{Tool, names};
use tracing::{info, warn};

pub struct GenerateChartTool {
    renderer: ChartRenderer,
}

impl GenerateChartTool {
    pub fn new(renderer: ChartRenderer) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl Tool for GenerateChartTool {
    fn name(&self) -> &str {
        names::CHART
    }

    fn description(&self) -> &str {
        "Generates a visual chart (e.g., bar chart, line chart) from provided tabular data. \
         Use this when the user explicitly asks for a chart, graph, or visualization. \
         Requires data, chart type, and columns for X and Y axes."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "data": {
                    "type": "array",
                    "items": {"type": "object"},
                    "description": "The tabular data as a list of dictionaries (e.g., the 'data' field from an execute_sql_query output). Each dictionary is a row."
                },
                "chart_type": {
                    "type": "string",
                    "enum": ["bar", "line"],
                    "description": "The type of chart to generate ('bar' for categorical comparisons, 'line' for trends over time)."
                },
                "x_column": {
                    "type": "string",
                    "description": "The name of the column from the 'data' to use for the X-axis (e.g., 'month', 'category')."
                },
                "y_column": {
                    "type": "string",
                    "description": "The name of the column from the 'data' to use for the Y-axis (e.g., 'total_sales_amount', 'average_price')."
                },
                "title": {
                    "type": "string",
                    "description": "The title of the chart."
                },
                "x_label": {
                    "type": "string",
                    "description": "Optional label for the X-axis."
                },
                "y_label": {
                    "type": "string",
                    "description": "Optional label for the Y-axis."
                },
                "filename": {
                    "type": "string",
                    "description": "Optional filename for the saved chart image (e.g., 'sales_by_month.png'). If not provided, a unique name will be generated."
                }
            },
            "required": ["data", "chart_type", "x_column", "y_column", "title"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let rows = arguments["data"]
            .as_array()
            .cloned()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'data' argument".into()))?;

        let kind: ChartKind = match arguments["chart_type"].as_str() {
            Some(raw) => match raw.parse() {
                Ok(kind) => kind,
                Err(ChartError::UnsupportedKind) => {
                    return Ok(json!({
                        "success": false,
                        "message": ChartError::UnsupportedKind.to_string(),
                    }));
                }
                Err(e) => {
                    return Ok(json!({ "success": false, "message": e.to_string() }));
                }
            },
            None => {
                return Err(ToolError::InvalidArguments(
                    "Missing 'chart_type' argument".into(),
                ));
            }
        };

        let x_column = arguments["x_column"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'x_column' argument".into()))?;
        let y_column = arguments["y_column"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'y_column' argument".into()))?;

        let spec = ChartSpec {
            kind,
            x_column: x_column.to_string(),
            y_column: y_column.to_string(),
            title: arguments["title"].as_str().unwrap_or("Chart").to_string(),
            x_label: arguments["x_label"].as_str().map(String::from),
            y_label: arguments["y_label"].as_str().map(String::from),
            filename: arguments["filename"].as_str().map(String::from),
        };

        match self.renderer.render(&rows, &spec) {
            Ok(path) => {
                info!(path = %path.display(), "Chart successfully saved");
                Ok(json!({
                    "success": true,
                    "message": "Chart generated successfully.",
                    "file_path": path.to_string_lossy(),
                }))
            }
            Err(e) => {
                warn!(error = %e, "Chart generation failed");
                Ok(json!({
                    "success": false,
                    "message": e.to_string(),
                }))
            }
        }
    }
}
