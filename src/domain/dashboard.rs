// Dashboard configuration domain model
use super::kpi::{KpiSlot, KpiSlotId, KpiType};
use super::ordering;
use super::widget::{Widget, WidgetId, WidgetSize, WidgetType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// The persisted arrangement: insertion order is display order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    #[serde(default)]
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub kpi_slots: Vec<KpiSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutViolation {
    #[error("duplicate widget id {0}")]
    DuplicateWidgetId(WidgetId),
    #[error("duplicate KPI slot id {0}")]
    DuplicateKpiSlotId(KpiSlotId),
    #[error("widget {id} of type {widget_type} cannot be {size}")]
    SizeNotAllowed {
        id: WidgetId,
        widget_type: WidgetType,
        size: WidgetSize,
    },
    #[error("widget {0} needs a metric")]
    MissingMetric(WidgetId),
    #[error("{0} positions are not dense")]
    NotDense(&'static str),
}

const DEFAULT_KPIS: [KpiType; 4] = [
    KpiType::Revenue,
    KpiType::Orders,
    KpiType::AverageTicket,
    KpiType::LaborCostPct,
];

const DEFAULT_WIDGETS: [WidgetType; 4] = [
    WidgetType::Sparkline,
    WidgetType::BarChart,
    WidgetType::RankedList,
    WidgetType::PieChart,
];

impl DashboardConfig {
    pub fn new(widgets: Vec<Widget>, kpi_slots: Vec<KpiSlot>) -> Self {
        Self { widgets, kpi_slots }
    }

    /// Catalog-derived layout used when the backend has nothing saved yet
    pub fn default_layout() -> Self {
        let widgets = DEFAULT_WIDGETS
            .iter()
            .enumerate()
            .map(|(index, widget_type)| {
                let spec = widget_type.spec();
                Widget::new(
                    WidgetId(index as u64 + 1),
                    *widget_type,
                    spec.default_data_source(),
                    index,
                    spec.default_size(),
                )
            })
            .collect();

        let kpi_slots = DEFAULT_KPIS
            .iter()
            .enumerate()
            .map(|(index, kpi_type)| KpiSlot::new(KpiSlotId(index as u64 + 1), *kpi_type, index))
            .collect();

        Self { widgets, kpi_slots }
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|widget| widget.id == id)
    }

    pub fn kpi_slot(&self, id: KpiSlotId) -> Option<&KpiSlot> {
        self.kpi_slots.iter().find(|slot| slot.id == id)
    }

    /// Order both sequences by incoming position and make positions dense
    pub fn normalize(&mut self) {
        ordering::normalize(&mut self.widgets);
        ordering::normalize(&mut self.kpi_slots);
    }

    pub fn is_dense(&self) -> bool {
        ordering::is_dense(&self.widgets) && ordering::is_dense(&self.kpi_slots)
    }

    pub fn validate(&self) -> Result<(), LayoutViolation> {
        let mut widget_ids = HashSet::new();
        for widget in &self.widgets {
            if !widget_ids.insert(widget.id) {
                return Err(LayoutViolation::DuplicateWidgetId(widget.id));
            }

            let spec = widget.widget_type.spec();
            if !spec.allows(widget.size) {
                return Err(LayoutViolation::SizeNotAllowed {
                    id: widget.id,
                    widget_type: widget.widget_type,
                    size: widget.size,
                });
            }
            if spec.needs_data() && widget.data_source.metric.trim().is_empty() {
                return Err(LayoutViolation::MissingMetric(widget.id));
            }
        }

        let mut slot_ids = HashSet::new();
        for slot in &self.kpi_slots {
            if !slot_ids.insert(slot.id) {
                return Err(LayoutViolation::DuplicateKpiSlotId(slot.id));
            }
        }

        if !ordering::is_dense(&self.widgets) {
            return Err(LayoutViolation::NotDense("widget"));
        }
        if !ordering::is_dense(&self.kpi_slots) {
            return Err(LayoutViolation::NotDense("KPI slot"));
        }

        Ok(())
    }
}
