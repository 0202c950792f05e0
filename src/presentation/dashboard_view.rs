// Dashboard view state - Owns the store and drag controllers for one mount
use crate::application::config_store::{DashboardStore, EditSession};
use crate::application::dashboard_gateway::DashboardResult;
use crate::application::dashboard_service::DashboardService;
use crate::application::drag_controller::{Axis, DragController, DragTarget};
use crate::domain::catalog::ChartKind;
use crate::domain::kpi::{KpiSlotId, KpiType};
use crate::domain::widget::{DataSource, WidgetId, WidgetSize};
use std::sync::Arc;

/// One widget as the chart layer should draw it
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetRender {
    pub id: WidgetId,
    pub chart_kind: ChartKind,
    pub size: WidgetSize,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiRender {
    pub id: KpiSlotId,
    pub kpi_type: KpiType,
    pub label: &'static str,
    pub unit: &'static str,
    pub icon: &'static str,
}

/// Created on every mount, so navigating away and back always starts from a
/// freshly loaded store. Child components get the store by reference.
pub struct DashboardView {
    store: Arc<DashboardStore>,
    pub widget_drag: DragController<WidgetId>,
    pub kpi_drag: DragController<KpiSlotId>,
}

impl DashboardView {
    pub async fn mount(service: &DashboardService) -> DashboardResult<Self> {
        let store = service.mount().await?;
        Ok(Self {
            store: Arc::new(store),
            // widgets stack in a column, KPI tiles run along the top
            widget_drag: DragController::new(DragTarget::Widgets, Axis::Vertical),
            kpi_drag: DragController::new(DragTarget::KpiSlots, Axis::Horizontal),
        })
    }

    pub fn store(&self) -> &Arc<DashboardStore> {
        &self.store
    }

    pub fn session(&self) -> EditSession {
        self.store.session()
    }

    pub fn drop_widget(&mut self) -> Option<(usize, usize)> {
        self.widget_drag.finish(&self.store)
    }

    pub fn drop_kpi_slot(&mut self) -> Option<(usize, usize)> {
        self.kpi_drag.finish(&self.store)
    }

    pub fn cancel_drags(&mut self) {
        self.widget_drag.cancel();
        self.kpi_drag.cancel();
    }

    pub async fn save(&mut self) -> DashboardResult<()> {
        self.cancel_drags();
        self.store.exit_edit_mode(true).await
    }

    pub async fn discard(&mut self) -> DashboardResult<()> {
        self.cancel_drags();
        self.store.exit_edit_mode(false).await
    }

    pub fn widget_render_plan(&self) -> Vec<WidgetRender> {
        self.store
            .current()
            .widgets
            .into_iter()
            .map(|widget| WidgetRender {
                id: widget.id,
                chart_kind: widget.widget_type.spec().chart_kind,
                size: widget.size,
                data_source: widget.data_source,
            })
            .collect()
    }

    pub fn kpi_render_plan(&self) -> Vec<KpiRender> {
        self.store
            .current()
            .kpi_slots
            .into_iter()
            .map(|slot| {
                let spec = slot.kpi_type.spec();
                KpiRender {
                    id: slot.id,
                    kpi_type: slot.kpi_type,
                    label: spec.label,
                    unit: spec.unit,
                    icon: spec.icon,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::drag_controller::{ItemBounds, Point, Rect};
    use crate::domain::dashboard::DashboardConfig;
    use crate::infrastructure::memory_gateway::MemoryDashboardGateway;

    fn service() -> DashboardService {
        DashboardService::new(Arc::new(MemoryDashboardGateway::with_config(
            DashboardConfig::default_layout(),
        )))
    }

    fn column(view: &DashboardView) -> Vec<ItemBounds<WidgetId>> {
        view.widget_render_plan()
            .iter()
            .enumerate()
            .map(|(i, w)| ItemBounds {
                id: w.id,
                rect: Rect::new(0.0, i as f64 * 200.0, 400.0, 200.0),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_render_plan_follows_catalog() {
        let view = DashboardView::mount(&service()).await.unwrap();

        let kinds: Vec<_> = view.widget_render_plan().iter().map(|w| w.chart_kind).collect();
        assert_eq!(
            kinds,
            vec![ChartKind::Line, ChartKind::Bar, ChartKind::List, ChartKind::Pie]
        );
        assert_eq!(view.kpi_render_plan()[0].label, "Revenue");
    }

    #[tokio::test]
    async fn test_drag_then_save() {
        let service = service();
        let mut view = DashboardView::mount(&service).await.unwrap();
        view.store().enter_edit_mode();

        let items = column(&view);
        assert!(view.widget_drag.start(WidgetId(4), &items, Point::new(10.0, 700.0)));
        view.widget_drag.pointer_move(Point::new(10.0, 90.0), &items);
        assert_eq!(view.drop_widget(), Some((3, 0)));

        view.save().await.unwrap();
        assert!(!view.session().is_edit_mode);

        let remounted = DashboardView::mount(&service).await.unwrap();
        assert_eq!(remounted.widget_render_plan()[0].id, WidgetId(4));
    }

    #[tokio::test]
    async fn test_discard_cancels_active_drag() {
        let mut view = DashboardView::mount(&service()).await.unwrap();
        view.store().enter_edit_mode();
        let items = column(&view);
        view.widget_drag.start(WidgetId(1), &items, Point::new(10.0, 100.0));

        view.discard().await.unwrap();

        assert!(!view.widget_drag.is_dragging());
        assert_eq!(view.drop_widget(), None);
        assert_eq!(view.store().current(), DashboardConfig::default_layout());
    }
}
