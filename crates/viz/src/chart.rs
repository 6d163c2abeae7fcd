use serde::{Deserialize, Serialize};
use serde_json::json;
use sheetviz_core::{ChartKind, VizError, VizResult};

/// One coordinate: numeric, or a category label for a text column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Category(String),
}

impl AxisValue {
    /// The numeric value, if any.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Category(_) => None,
        }
    }
}

/// A plotted point and the worksheet data row it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub row: usize,
    pub x: AxisValue,
    pub y: AxisValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

/// Chart specification for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_label: Option<String>,
    /// Points in worksheet row order.
    pub points: Vec<ChartPoint>,
    /// Rows left out because a selected cell was empty.
    pub skipped_rows: usize,
}

/// Plotly.js bundle loaded by rendered pages.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Escape HTML special characters to prevent XSS.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Serialize JSON for a `<script>` context.
fn script_json(value: &serde_json::Value) -> String {
    // Prevent script tag breakout
    value.to_string().replace("</", "<\\/")
}

impl ChartSpec {
    /// Create an empty chart specification.
    #[must_use]
    pub fn new(
        kind: ChartKind,
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            z_label: None,
            points: Vec::new(),
            skipped_rows: 0,
        }
    }

    /// Number of plotted points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when nothing is plotted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Convert to JSON string for API responses.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> VizResult<String> {
        serde_json::to_string(self).map_err(VizError::from)
    }

    /// Plotly `data` and `layout` for this chart.
    #[must_use]
    pub fn plotly_figure(&self) -> serde_json::Value {
        let xs: Vec<&AxisValue> = self.points.iter().map(|p| &p.x).collect();
        let ys: Vec<&AxisValue> = self.points.iter().map(|p| &p.y).collect();

        let (trace, layout) = match self.kind {
            ChartKind::Scatter | ChartKind::Line => {
                let mode = if self.kind == ChartKind::Line {
                    "lines"
                } else {
                    "markers"
                };
                (
                    json!({ "type": "scatter", "mode": mode, "x": xs, "y": ys }),
                    json!({
                        "title": { "text": self.title },
                        "xaxis": { "title": { "text": self.x_label } },
                        "yaxis": { "title": { "text": self.y_label } },
                    }),
                )
            }
            ChartKind::Scatter3d => {
                let zs: Vec<Option<f64>> = self.points.iter().map(|p| p.z).collect();
                (
                    json!({ "type": "scatter3d", "mode": "markers", "x": xs, "y": ys, "z": zs }),
                    json!({
                        "title": { "text": self.title },
                        "scene": {
                            "xaxis": { "title": { "text": self.x_label } },
                            "yaxis": { "title": { "text": self.y_label } },
                            "zaxis": { "title": { "text": self.z_label } },
                        },
                    }),
                )
            }
        };

        json!({ "data": [trace], "layout": layout })
    }

    /// A `<div>` plus inline script drawing this chart; the page must load
    /// [`PLOTLY_CDN`].
    #[must_use]
    pub fn to_html_fragment(&self, div_id: &str) -> String {
        let id = escape_html(div_id);
        let figure = script_json(&self.plotly_figure());
        format!(
            r#"<div id="{id}" class="chart"></div>
<script>
    (function() {{
        const fig = {figure};
        Plotly.newPlot('{id}', fig.data, fig.layout, {{ responsive: true }});
    }})();
</script>"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(row: usize, x: f64, y: f64) -> ChartPoint {
        ChartPoint {
            row,
            x: AxisValue::Number(x),
            y: AxisValue::Number(y),
            z: None,
        }
    }

    #[test]
    fn test_chart_spec_new() {
        let chart = ChartSpec::new(ChartKind::Line, "Test Chart", "A", "B");
        assert_eq!(chart.title, "Test Chart");
        assert!(chart.is_empty());
        assert!(chart.z_label.is_none());
    }

    #[test]
    fn test_chart_to_json() {
        let mut chart = ChartSpec::new(ChartKind::Scatter3d, "Test", "A", "B");
        chart.points.push(ChartPoint {
            z: Some(3.0),
            ..point(0, 1.0, 2.0)
        });
        let json = chart.to_json().unwrap();
        assert!(json.contains("\"kind\":\"scatter3d\""));
        assert!(json.contains("\"z\":3.0"));
    }

    #[test]
    fn test_category_values_serialize_as_strings() {
        let mut chart = ChartSpec::new(ChartKind::Scatter, "Cats", "name", "n");
        chart.points.push(ChartPoint {
            row: 0,
            x: AxisValue::Category("north".to_string()),
            y: AxisValue::Number(4.0),
            z: None,
        });
        let figure = chart.plotly_figure();
        assert_eq!(figure["data"][0]["x"][0], "north");
        assert_eq!(figure["data"][0]["y"][0], 4.0);
    }

    #[test]
    fn test_line_mode() {
        let chart = ChartSpec::new(ChartKind::Line, "L", "A", "B");
        let figure = chart.plotly_figure();
        assert_eq!(figure["data"][0]["mode"], "lines");
        assert_eq!(figure["data"][0]["type"], "scatter");
    }

    #[test]
    fn test_3d_layout_uses_scene() {
        let mut chart = ChartSpec::new(ChartKind::Scatter3d, "S", "A", "B");
        chart.z_label = Some("C".to_string());
        let figure = chart.plotly_figure();
        assert_eq!(figure["data"][0]["type"], "scatter3d");
        assert_eq!(figure["layout"]["scene"]["zaxis"]["title"]["text"], "C");
    }

    #[test]
    fn test_fragment_cannot_break_out_of_script() {
        let chart = ChartSpec::new(ChartKind::Scatter, "</script><b>x</b>", "A", "B");
        let html = chart.to_html_fragment("c\"1");
        assert!(html.contains("<div id=\"c&quot;1\""));
        assert!(html.contains("<\\/script><b>x<\\/b>"));
        assert!(!html.contains("</script><b>"));
    }
}
