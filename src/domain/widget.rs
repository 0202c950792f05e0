// Widget domain model
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable widget identifier, unique within one dashboard config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Closed set of widget variants the dashboard can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetType {
    MetricCard,
    BarChart,
    PieChart,
    Sparkline,
    Text,
    RankedList,
    Heatmap,
}

impl WidgetType {
    pub const ALL: [WidgetType; 7] = [
        WidgetType::MetricCard,
        WidgetType::BarChart,
        WidgetType::PieChart,
        WidgetType::Sparkline,
        WidgetType::Text,
        WidgetType::RankedList,
        WidgetType::Heatmap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MetricCard => "metric-card",
            Self::BarChart => "bar-chart",
            Self::PieChart => "pie-chart",
            Self::Sparkline => "sparkline",
            Self::Text => "text",
            Self::RankedList => "ranked-list",
            Self::Heatmap => "heatmap",
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which metric/dataset/period a widget renders.
///
/// Only `metric` is looked at by layout validation; everything else is passed
/// through untouched to whoever fetches the widget's data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    #[serde(default)]
    pub metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl DataSource {
    pub fn metric(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            ..Self::default()
        }
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// Width/height hint in grid units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetSize {
    pub width: u16,
    pub height: u16,
}

impl WidgetSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

}

impl fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    #[serde(default)]
    pub data_source: DataSource,
    pub position: usize,
    pub size: WidgetSize,
}

impl Widget {
    pub fn new(
        id: WidgetId,
        widget_type: WidgetType,
        data_source: DataSource,
        position: usize,
        size: WidgetSize,
    ) -> Self {
        Self {
            id,
            widget_type,
            data_source,
            position,
            size,
        }
    }
}
