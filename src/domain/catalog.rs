// Widget catalog - static rendering requirements per widget and KPI type
use super::kpi::KpiType;
use super::widget::{DataSource, WidgetSize, WidgetType};

/// Shape of the payload a widget expects from its data source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataShape {
    /// Single number with an optional comparison value
    Scalar,
    /// Label/value pairs
    Categorical,
    /// Timestamped values
    TimeSeries,
    /// Label/value pairs, already sorted
    Ranked,
    /// Two-dimensional grid of values (e.g. weekday x hour)
    Matrix,
    /// Static content, no data fetch
    None,
}

/// Which chart component renders a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Stat,
    Bar,
    Pie,
    Line,
    Markdown,
    List,
    Heatmap,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetSpec {
    pub chart_kind: ChartKind,
    pub required_data_shape: DataShape,
    /// First entry is the default size
    pub allowed_sizes: &'static [WidgetSize],
    default_metric: &'static str,
    default_period: Option<&'static str>,
}

impl WidgetSpec {
    pub fn default_size(&self) -> WidgetSize {
        self.allowed_sizes[0]
    }

    pub fn default_data_source(&self) -> DataSource {
        let source = DataSource::metric(self.default_metric);
        match self.default_period {
            Some(period) => source.with_period(period),
            None => source,
        }
    }

    pub fn allows(&self, size: WidgetSize) -> bool {
        self.allowed_sizes.contains(&size)
    }

    /// Closest allowed size by grid distance; ties go to the earlier entry
    pub fn nearest_allowed(&self, size: WidgetSize) -> WidgetSize {
        let distance = |candidate: &WidgetSize| {
            u32::from(candidate.width.abs_diff(size.width))
                + u32::from(candidate.height.abs_diff(size.height))
        };
        self.allowed_sizes
            .iter()
            .copied()
            .min_by_key(distance)
            .unwrap_or(size)
    }

    pub fn needs_data(&self) -> bool {
        self.required_data_shape != DataShape::None
    }
}

const SMALL: WidgetSize = WidgetSize::new(1, 1);
const WIDE: WidgetSize = WidgetSize::new(2, 1);
const SQUARE: WidgetSize = WidgetSize::new(2, 2);
const TALL: WidgetSize = WidgetSize::new(1, 2);
const BANNER: WidgetSize = WidgetSize::new(4, 1);
const LARGE: WidgetSize = WidgetSize::new(4, 2);

impl WidgetType {
    pub fn spec(self) -> WidgetSpec {
        match self {
            Self::MetricCard => WidgetSpec {
                chart_kind: ChartKind::Stat,
                required_data_shape: DataShape::Scalar,
                allowed_sizes: &[SMALL, WIDE],
                default_metric: "revenue",
                default_period: Some("today"),
            },
            Self::BarChart => WidgetSpec {
                chart_kind: ChartKind::Bar,
                required_data_shape: DataShape::Categorical,
                allowed_sizes: &[WIDE, SQUARE, BANNER, LARGE],
                default_metric: "sales_by_branch",
                default_period: Some("last_7_days"),
            },
            Self::PieChart => WidgetSpec {
                chart_kind: ChartKind::Pie,
                required_data_shape: DataShape::Categorical,
                allowed_sizes: &[SQUARE, TALL],
                default_metric: "sales_by_category",
                default_period: Some("last_30_days"),
            },
            Self::Sparkline => WidgetSpec {
                chart_kind: ChartKind::Line,
                required_data_shape: DataShape::TimeSeries,
                allowed_sizes: &[WIDE, SMALL, BANNER],
                default_metric: "hourly_orders",
                default_period: Some("today"),
            },
            Self::Text => WidgetSpec {
                chart_kind: ChartKind::Markdown,
                required_data_shape: DataShape::None,
                allowed_sizes: &[WIDE, SMALL, SQUARE, BANNER],
                default_metric: "",
                default_period: None,
            },
            Self::RankedList => WidgetSpec {
                chart_kind: ChartKind::List,
                required_data_shape: DataShape::Ranked,
                allowed_sizes: &[TALL, SQUARE],
                default_metric: "top_menu_items",
                default_period: Some("last_7_days"),
            },
            Self::Heatmap => WidgetSpec {
                chart_kind: ChartKind::Heatmap,
                required_data_shape: DataShape::Matrix,
                allowed_sizes: &[LARGE, SQUARE],
                default_metric: "orders_by_weekday_hour",
                default_period: Some("last_30_days"),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KpiSpec {
    pub label: &'static str,
    pub unit: &'static str,
    pub icon: &'static str,
}

impl KpiType {
    pub fn spec(self) -> KpiSpec {
        match self {
            Self::Revenue => KpiSpec {
                label: "Revenue",
                unit: "currency",
                icon: "dollar-sign",
            },
            Self::Orders => KpiSpec {
                label: "Orders",
                unit: "count",
                icon: "receipt",
            },
            Self::AverageTicket => KpiSpec {
                label: "Average Ticket",
                unit: "currency",
                icon: "ticket",
            },
            Self::LaborCostPct => KpiSpec {
                label: "Labor Cost",
                unit: "percent",
                icon: "users",
            },
            Self::FoodCostPct => KpiSpec {
                label: "Food Cost",
                unit: "percent",
                icon: "utensils",
            },
            Self::InventoryValue => KpiSpec {
                label: "Inventory Value",
                unit: "currency",
                icon: "boxes",
            },
            Self::OpenPurchaseOrders => KpiSpec {
                label: "Open Purchase Orders",
                unit: "count",
                icon: "truck",
            },
            Self::ActiveEmployees => KpiSpec {
                label: "Active Employees",
                unit: "count",
                icon: "id-badge",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_widget_type_has_a_usable_spec() {
        for widget_type in WidgetType::ALL {
            let spec = widget_type.spec();
            assert!(!spec.allowed_sizes.is_empty(), "{widget_type} has no sizes");
            assert!(spec.allows(spec.default_size()));
            assert_eq!(
                spec.needs_data(),
                !spec.default_data_source().metric.is_empty(),
                "{widget_type} default source disagrees with its data shape"
            );
        }
    }

    #[test]
    fn test_nearest_allowed_size() {
        let spec = WidgetType::PieChart.spec();
        assert_eq!(spec.nearest_allowed(WidgetSize::new(2, 2)), SQUARE);
        assert_eq!(spec.nearest_allowed(WidgetSize::new(1, 3)), TALL);
        // (3, 3) is two steps from SQUARE and three from TALL
        assert_eq!(spec.nearest_allowed(WidgetSize::new(3, 3)), SQUARE);
    }

    #[test]
    fn test_kpi_labels_are_distinct() {
        let mut labels: Vec<_> = KpiType::ALL.iter().map(|k| k.spec().label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), KpiType::ALL.len());
    }
}
