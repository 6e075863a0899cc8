//! Metric chart data: parsing the embedded chart values and drawing them as
//! terminal sparklines. Bad data never fails the report; it turns into an
//! inline warning for that chart only.

use super::model::{MetricKind, MetricPanel};
use crate::error::ReportError;
use chrono::{Local, TimeZone};
use serde::Deserialize;
use serde_json::Value;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sample {
    #[serde(deserialize_with = "timestamp_millis")]
    pub timestamp: i64,
    pub value: f64,
}

fn timestamp_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    // Timestamps show up both as numbers and as numeric strings.
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| serde::de::Error::custom("timestamp out of range")),
        Value::String(s) => s.trim().parse::<i64>().map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "invalid timestamp: {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct GaugeValue {
    #[serde(default)]
    value: Option<f64>,
}

/// Parsed chart data.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Series(Vec<Sample>),
    Gauge(f64),
    Sparkline(Vec<f64>),
}

/// What to show for one chart panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Rendered(ChartData),
    Warning(String),
}

impl ChartOutcome {
    pub fn warning(&self) -> Option<&str> {
        match self {
            ChartOutcome::Warning(message) => Some(message),
            ChartOutcome::Rendered(_) => None,
        }
    }
}

/// Unwrap values that arrive as a JSON-encoded string.
fn decode_values(values: &Value) -> Result<Value, serde_json::Error> {
    match values {
        Value::String(raw) if raw.trim().is_empty() => Ok(Value::Null),
        Value::String(raw) => serde_json::from_str(raw),
        other => Ok(other.clone()),
    }
}

/// Parse the data of one panel.
pub fn parse_panel(panel: &MetricPanel) -> Result<Option<ChartData>, ReportError> {
    let invalid = |e: serde_json::Error| ReportError::InvalidChartData {
        label: panel.label.clone(),
        message: e.to_string(),
    };
    let values = decode_values(&panel.values).map_err(invalid)?;
    if values.is_null() {
        return Ok(None);
    }

    let data = match panel.kind {
        MetricKind::Line => {
            let samples: Vec<Sample> = serde_json::from_value(values).map_err(invalid)?;
            (!samples.is_empty()).then_some(ChartData::Series(samples))
        }
        MetricKind::Gauge => {
            let gauge: GaugeValue = serde_json::from_value(values).map_err(invalid)?;
            // Zero nodes is treated as missing data.
            gauge.value.filter(|v| *v != 0.0).map(ChartData::Gauge)
        }
        MetricKind::Sparkline => {
            let points: Vec<f64> = serde_json::from_value(values).map_err(invalid)?;
            (!points.is_empty()).then_some(ChartData::Sparkline(points))
        }
    };
    Ok(data)
}

/// Parse a panel, logging failures and turning them into inline warnings.
pub fn load_panel(panel: &MetricPanel) -> ChartOutcome {
    match parse_panel(panel) {
        Ok(Some(data)) => {
            log::debug!("Loaded {} chart", panel.label);
            ChartOutcome::Rendered(data)
        }
        Ok(None) => {
            log::warn!("No data for {} chart", panel.label);
            ChartOutcome::Warning(format!("⚠️ No data for {}", panel.label))
        }
        Err(e) => {
            log::error!("Failed to render {} chart: {}", panel.label, e);
            ChartOutcome::Warning(format!("⚠️ Failed to render {}", panel.label))
        }
    }
}

/// Draw values as a unicode sparkline.
pub fn sparkline(values: &[f64]) -> String {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return String::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    finite
        .iter()
        .map(|&v| {
            if span == 0.0 {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let level = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

/// Format a millisecond timestamp as local wall-clock time.
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(time) => time.format("%H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}

/// Render a chart as one or two text lines.
pub fn render_chart(label: &str, unit: &str, data: &ChartData) -> String {
    match data {
        ChartData::Series(samples) => {
            let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
            let (min, max) = min_max(&values);
            let last = values.last().copied().unwrap_or_default();
            let span = match (samples.first(), samples.last()) {
                (Some(first), Some(last_sample)) => format!(
                    "{} → {}",
                    format_timestamp(first.timestamp),
                    format_timestamp(last_sample.timestamp)
                ),
                _ => String::new(),
            };
            format!(
                "{} ({})\n  {}  min {:.1} / max {:.1} / last {:.1}  [{}]",
                label,
                unit,
                sparkline(&values),
                min,
                max,
                last,
                span
            )
        }
        ChartData::Gauge(value) => {
            let filled = (value.clamp(0.0, 100.0) / 5.0).round() as usize;
            format!(
                "{}\n  {}{}  {} {}",
                label,
                "█".repeat(filled),
                "░".repeat(20 - filled),
                value,
                unit
            )
        }
        ChartData::Sparkline(points) => sparkline(points),
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if values.is_empty() { (0.0, 0.0) } else { (min, max) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn panel(kind: MetricKind, values: Value) -> MetricPanel {
        MetricPanel {
            id: "chart".to_string(),
            label: "Cluster CPU Usage".to_string(),
            unit: "CPU Usage (%)".to_string(),
            kind,
            values,
        }
    }

    #[test]
    fn test_line_series_from_encoded_string() {
        let p = panel(
            MetricKind::Line,
            json!(r#"[{"timestamp":"1700000000000","value":10},{"timestamp":1700000060000,"value":30}]"#),
        );
        match load_panel(&p) {
            ChartOutcome::Rendered(ChartData::Series(samples)) => {
                assert_eq!(samples.len(), 2);
                assert_eq!(samples[0].timestamp, 1_700_000_000_000);
                assert_eq!(samples[1].value, 30.0);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_empty_series_warns() {
        let p = panel(MetricKind::Line, json!("[]"));
        assert_eq!(
            load_panel(&p).warning(),
            Some("⚠️ No data for Cluster CPU Usage")
        );
        let p = panel(MetricKind::Line, Value::Null);
        assert!(load_panel(&p).warning().is_some());
    }

    #[test]
    fn test_malformed_json_warns() {
        let p = panel(MetricKind::Line, json!("[{broken"));
        assert_eq!(
            load_panel(&p).warning(),
            Some("⚠️ Failed to render Cluster CPU Usage")
        );
        assert!(matches!(
            parse_panel(&p),
            Err(ReportError::InvalidChartData { .. })
        ));
    }

    #[test]
    fn test_gauge_and_sparkline() {
        let gauge = panel(MetricKind::Gauge, json!({"value": 6}));
        assert_eq!(load_panel(&gauge), ChartOutcome::Rendered(ChartData::Gauge(6.0)));

        let empty_gauge = panel(MetricKind::Gauge, json!("{}"));
        assert!(load_panel(&empty_gauge).warning().is_some());

        let spark = panel(MetricKind::Sparkline, json!([1.0, 2.0, 3.0]));
        assert_eq!(
            load_panel(&spark),
            ChartOutcome::Rendered(ChartData::Sparkline(vec![1.0, 2.0, 3.0]))
        );
    }

    #[test]
    fn test_sparkline_levels() {
        assert_eq!(sparkline(&[0.0, 7.0]), "▁█");
        assert_eq!(sparkline(&[5.0, 5.0, 5.0]), "▅▅▅");
        assert_eq!(sparkline(&[]), "");
        assert_eq!(sparkline(&[f64::NAN, 1.0, 2.0]).chars().count(), 2);
    }

    #[test]
    fn test_render_gauge() {
        let text = render_chart("Node Count", "Nodes", &ChartData::Gauge(50.0));
        assert!(text.starts_with("Node Count"));
        assert!(text.contains(&"█".repeat(10)));
        assert!(text.ends_with("50 Nodes"));
    }
}
