//! Chart.js scatter plotter
//!
//! Renders a [`ScatterSeries`] as a Chart.js scatter configuration. The
//! browser draws it on a canvas and destroys the previous canvas chart
//! before drawing a replacement; the handle here mirrors that lifetime on
//! the server side.

use serde_json::{json, Value};
use tomo_common::dashboard::{ChartHandle, ScatterPlotter, ScatterSeries, SCORE_AXIS_TITLE};
use tracing::debug;

const POINT_FILL: &str = "rgba(16, 185, 129, 0.6)";
const POINT_BORDER: &str = "rgba(16, 185, 129, 1)";

#[derive(Debug, Clone, Copy, Default)]
pub struct ChartJsPlotter;

/// A Chart.js configuration that is live until destroyed
#[derive(Debug)]
pub struct ChartJsHandle {
    title: String,
    config: Value,
    live: bool,
}

impl ChartJsHandle {
    pub fn config(&self) -> &Value {
        &self.config
    }

    pub fn is_live(&self) -> bool {
        self.live
    }
}

impl ChartHandle for ChartJsHandle {
    fn destroy(&mut self) {
        if self.live {
            self.live = false;
            debug!("Destroyed chart '{}'", self.title);
        }
    }
}

impl ScatterPlotter for ChartJsPlotter {
    type Handle = ChartJsHandle;

    fn plot(&self, series: &ScatterSeries) -> ChartJsHandle {
        let data: Vec<Value> = series
            .points
            .iter()
            .map(|p| json!({ "x": p.x, "y": p.y }))
            .collect();
        // Hover text per point, read by the page's tooltip callback
        let hovers: Vec<&str> = series.points.iter().map(|p| p.hover.as_str()).collect();

        let config = json!({
            "type": "scatter",
            "data": {
                "labels": series.labels,
                "datasets": [{
                    "label": "점수",
                    "data": data,
                    "hovers": hovers,
                    "backgroundColor": POINT_FILL,
                    "borderColor": POINT_BORDER,
                    "pointRadius": 6,
                    "pointHoverRadius": 8
                }]
            },
            "options": {
                "scales": {
                    "x": {
                        "type": "category",
                        "labels": series.labels,
                        "title": { "display": true, "text": series.axis_title, "font": { "weight": "bold" } }
                    },
                    "y": {
                        "beginAtZero": false,
                        "title": { "display": true, "text": SCORE_AXIS_TITLE, "font": { "weight": "bold" } }
                    }
                },
                "plugins": {
                    "legend": { "display": false },
                    "title": { "display": true, "text": series.title }
                }
            }
        });

        debug!(
            "Plotted chart '{}' with {} points",
            series.title,
            series.points.len()
        );

        ChartJsHandle {
            title: series.title.clone(),
            config,
            live: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomo_common::dashboard::ScatterPoint;

    fn series() -> ScatterSeries {
        ScatterSeries {
            title: "연령대별 점수 분포".into(),
            axis_title: "연령대".into(),
            labels: vec!["20대".into(), "30대".into()],
            points: vec![
                ScatterPoint { x: "30대".into(), y: 12.5, hover: "가: 12.50".into() },
                ScatterPoint { x: "20대".into(), y: -1.0, hover: "나: -1.00".into() },
            ],
        }
    }

    #[test]
    fn test_config_is_category_scatter() {
        let handle = ChartJsPlotter.plot(&series());
        let config = handle.config();
        assert_eq!(config["type"], "scatter");
        assert_eq!(config["options"]["scales"]["x"]["type"], "category");
        assert_eq!(config["data"]["labels"][1], "30대");
        assert_eq!(config["data"]["datasets"][0]["data"][0]["x"], "30대");
        assert_eq!(config["data"]["datasets"][0]["data"][1]["y"], -1.0);
        assert_eq!(config["data"]["datasets"][0]["hovers"][0], "가: 12.50");
        assert_eq!(config["options"]["scales"]["x"]["title"]["text"], "연령대");
    }

    #[test]
    fn test_destroy_marks_handle_dead() {
        let mut handle = ChartJsPlotter.plot(&series());
        assert!(handle.is_live());
        handle.destroy();
        assert!(!handle.is_live());
        handle.destroy();
        assert!(!handle.is_live());
    }
}
