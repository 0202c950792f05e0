// Config store - Owns the saved config and the edit session around it
use crate::application::dashboard_gateway::{DashboardError, DashboardGateway, DashboardResult};
use crate::domain::dashboard::DashboardConfig;
use crate::domain::kpi::{KpiSlot, KpiSlotId, KpiType};
use crate::domain::ordering::{self, Ordered};
use crate::domain::widget::{DataSource, Widget, WidgetId, WidgetSize, WidgetType};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Edit-session flags as seen by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditSession {
    pub is_edit_mode: bool,
    pub is_dirty: bool,
    pub is_saving: bool,
}

struct StoreState {
    saved: DashboardConfig,
    /// Working copy; `Some` exactly while edit mode is on
    pending: Option<DashboardConfig>,
    is_dirty: bool,
    next_widget_id: u64,
    next_kpi_slot_id: u64,
    last_saved_at: Option<DateTime<Utc>>,
}

impl StoreState {
    fn reseed_ids(&mut self, config: &DashboardConfig) {
        self.next_widget_id = self
            .next_widget_id
            .max(ordering::next_id_after(&config.widgets, |id| id.0));
        self.next_kpi_slot_id = self
            .next_kpi_slot_id
            .max(ordering::next_id_after(&config.kpi_slots, |id| id.0));
    }
}

/// Clears the saving flag when dropped, on every exit path
struct SavingGuard<'a>(&'a AtomicBool);

impl<'a> SavingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Single holder of the dashboard layout for the lifetime of one dashboard view.
///
/// Mutations are synchronous and never fail: they are ignored outside edit
/// mode or while a save is in flight, and clamp or no-op on bad input.
/// Only `exit_edit_mode(true)` talks to the gateway.
pub struct DashboardStore {
    gateway: Arc<dyn DashboardGateway>,
    state: Mutex<StoreState>,
    saving: AtomicBool,
}

impl DashboardStore {
    pub fn new(gateway: Arc<dyn DashboardGateway>, mut saved: DashboardConfig) -> Self {
        saved.normalize();
        let mut state = StoreState {
            saved: DashboardConfig::default(),
            pending: None,
            is_dirty: false,
            next_widget_id: 1,
            next_kpi_slot_id: 1,
            last_saved_at: None,
        };
        state.reseed_ids(&saved);
        state.saved = saved;

        Self {
            gateway,
            state: Mutex::new(state),
            saving: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn session(&self) -> EditSession {
        let state = self.lock();
        EditSession {
            is_edit_mode: state.pending.is_some(),
            is_dirty: state.is_dirty,
            is_saving: self.is_saving(),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.lock().pending.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().is_dirty
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub fn saved_config(&self) -> DashboardConfig {
        self.lock().saved.clone()
    }

    pub fn pending_config(&self) -> Option<DashboardConfig> {
        self.lock().pending.clone()
    }

    /// What the view should render: the working copy while editing,
    /// the saved config otherwise
    pub fn current(&self) -> DashboardConfig {
        let state = self.lock();
        state.pending.as_ref().unwrap_or(&state.saved).clone()
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.lock().last_saved_at
    }

    pub fn widget_index(&self, id: WidgetId) -> Option<usize> {
        let state = self.lock();
        ordering::index_of(&state.pending.as_ref().unwrap_or(&state.saved).widgets, id)
    }

    pub fn kpi_slot_index(&self, id: KpiSlotId) -> Option<usize> {
        let state = self.lock();
        ordering::index_of(&state.pending.as_ref().unwrap_or(&state.saved).kpi_slots, id)
    }

    pub fn enter_edit_mode(&self) {
        let mut state = self.lock();
        if state.pending.is_some() {
            return;
        }
        state.pending = Some(state.saved.clone());
        state.is_dirty = false;
        tracing::debug!("Entered dashboard edit mode");
    }

    /// Leave edit mode, either persisting or discarding the working copy.
    ///
    /// On a failed save the session stays in edit mode with the working copy
    /// intact. A second save (or a cancel) while one is in flight is rejected
    /// with `ConcurrentSave`.
    pub async fn exit_edit_mode(&self, save: bool) -> DashboardResult<()> {
        let Some(_guard) = SavingGuard::acquire(&self.saving) else {
            tracing::warn!("Rejected dashboard exit while a save is in flight");
            return Err(DashboardError::ConcurrentSave);
        };

        if !save {
            let mut state = self.lock();
            if state.pending.take().is_some() {
                tracing::debug!(dirty = state.is_dirty, "Discarded dashboard edits");
            }
            state.is_dirty = false;
            return Ok(());
        }

        let snapshot = {
            let state = self.lock();
            match &state.pending {
                Some(pending) => pending.clone(),
                None => return Ok(()),
            }
        };

        tracing::info!(
            widgets = snapshot.widgets.len(),
            kpi_slots = snapshot.kpi_slots.len(),
            "Saving dashboard config"
        );

        match self.gateway.save_config(&snapshot).await {
            Ok(mut accepted) => {
                accepted.normalize();
                let mut state = self.lock();
                state.reseed_ids(&accepted);
                state.saved = accepted;
                state.pending = None;
                state.is_dirty = false;
                state.last_saved_at = Some(Utc::now());
                tracing::info!("Dashboard config saved");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Dashboard save failed, keeping edits: {}", e);
                Err(e)
            }
        }
    }

    /// Run `op` against the working copy. `op` returns whether it changed anything.
    fn mutate<R>(&self, action: &str, op: impl FnOnce(&mut StoreState) -> Option<R>) -> Option<R> {
        let mut state = self.lock();
        // checked under the lock so a save cannot snapshot between check and write
        if self.is_saving() {
            tracing::warn!("Ignoring {} while a save is in flight", action);
            return None;
        }
        if state.pending.is_none() {
            tracing::debug!("Ignoring {} outside edit mode", action);
            return None;
        }

        let result = op(&mut *state);
        if result.is_some() {
            state.is_dirty = true;
        }
        result
    }

    /// Append a widget with a fresh id; returns `None` if the store ignored the call
    pub fn add_widget(&self, widget_type: WidgetType, data_source: DataSource) -> Option<WidgetId> {
        self.mutate("add_widget", |state| {
            let id = WidgetId(state.next_widget_id);
            state.next_widget_id += 1;
            let pending = state.pending.as_mut()?;
            let size = widget_type.spec().default_size();
            ordering::append(
                &mut pending.widgets,
                Widget::new(id, widget_type, data_source, 0, size),
            );
            Some(id)
        })
    }

    pub fn remove_widget(&self, id: WidgetId) {
        self.mutate("remove_widget", |state| {
            ordering::remove(&mut state.pending.as_mut()?.widgets, id).map(|_| ())
        });
    }

    pub fn reorder_widgets(&self, from_index: usize, to_index: usize) {
        self.mutate("reorder_widgets", |state| {
            reorder(&mut state.pending.as_mut()?.widgets, from_index, to_index)
        });
    }

    pub fn update_widget_data_source(&self, id: WidgetId, data_source: DataSource) {
        self.mutate("update_widget_data_source", |state| {
            let widget = state
                .pending
                .as_mut()?
                .widgets
                .iter_mut()
                .find(|widget| widget.id == id)?;
            widget.data_source = data_source;
            Some(())
        });
    }

    /// Set the size hint, snapping to the nearest size the catalog allows
    pub fn resize_widget(&self, id: WidgetId, size: WidgetSize) {
        self.mutate("resize_widget", |state| {
            let widget = state
                .pending
                .as_mut()?
                .widgets
                .iter_mut()
                .find(|widget| widget.id == id)?;
            let size = widget.widget_type.spec().nearest_allowed(size);
            if widget.size == size {
                return None;
            }
            widget.size = size;
            Some(())
        });
    }

    pub fn add_kpi_slot(&self, kpi_type: KpiType) -> Option<KpiSlotId> {
        self.mutate("add_kpi_slot", |state| {
            let id = KpiSlotId(state.next_kpi_slot_id);
            state.next_kpi_slot_id += 1;
            ordering::append(
                &mut state.pending.as_mut()?.kpi_slots,
                KpiSlot::new(id, kpi_type, 0),
            );
            Some(id)
        })
    }

    pub fn remove_kpi_slot(&self, id: KpiSlotId) {
        self.mutate("remove_kpi_slot", |state| {
            ordering::remove(&mut state.pending.as_mut()?.kpi_slots, id).map(|_| ())
        });
    }

    pub fn reorder_kpi_slots(&self, from_index: usize, to_index: usize) {
        self.mutate("reorder_kpi_slots", |state| {
            reorder(&mut state.pending.as_mut()?.kpi_slots, from_index, to_index)
        });
    }
}

fn reorder<T: Ordered>(items: &mut Vec<T>, from_index: usize, to_index: usize) -> Option<()> {
    let (from, to) = ordering::move_item(items, from_index, to_index)?;
    (from != to).then_some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Notify;

    /// Records saves; optionally parks each save until `release` is notified
    struct ScriptedGateway {
        gated: bool,
        started: Notify,
        release: Notify,
        saves: StdMutex<Vec<DashboardConfig>>,
        fail_next: StdMutex<Option<DashboardError>>,
    }

    impl ScriptedGateway {
        fn new(gated: bool) -> Self {
            Self {
                gated,
                started: Notify::new(),
                release: Notify::new(),
                saves: StdMutex::new(Vec::new()),
                fail_next: StdMutex::new(None),
            }
        }

        fn fail_next_save(&self, error: DashboardError) {
            *self.fail_next.lock().unwrap() = Some(error);
        }

        fn save_count(&self) -> usize {
            self.saves.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DashboardGateway for ScriptedGateway {
        async fn fetch_config(&self) -> DashboardResult<DashboardConfig> {
            Err(DashboardError::NotFound)
        }

        async fn save_config(&self, config: &DashboardConfig) -> DashboardResult<DashboardConfig> {
            self.started.notify_one();
            if self.gated {
                self.release.notified().await;
            }
            if let Some(error) = self.fail_next.lock().unwrap().take() {
                return Err(error);
            }
            self.saves.lock().unwrap().push(config.clone());
            Ok(config.clone())
        }
    }

    fn editing_store(saved: DashboardConfig) -> (Arc<ScriptedGateway>, DashboardStore) {
        let gateway = Arc::new(ScriptedGateway::new(false));
        let store = DashboardStore::new(gateway.clone(), saved);
        store.enter_edit_mode();
        (gateway, store)
    }

    fn widget_ids(store: &DashboardStore) -> Vec<WidgetId> {
        store.current().widgets.iter().map(|w| w.id).collect()
    }

    fn positions(store: &DashboardStore) -> Vec<usize> {
        store.current().widgets.iter().map(|w| w.position).collect()
    }

    #[test]
    fn test_remove_middle_of_three() {
        let (_, store) = editing_store(DashboardConfig::default());
        let first = store.add_widget(WidgetType::MetricCard, DataSource::metric("revenue")).unwrap();
        let middle = store.add_widget(WidgetType::MetricCard, DataSource::metric("orders")).unwrap();
        let third = store.add_widget(WidgetType::MetricCard, DataSource::metric("covers")).unwrap();

        store.remove_widget(middle);

        assert_eq!(widget_ids(&store), vec![first, third]);
        assert_eq!(positions(&store), vec![0, 1]);
    }

    #[test]
    fn test_remove_twice_is_idempotent() {
        let (_, store) = editing_store(DashboardConfig::default_layout());
        store.remove_widget(WidgetId(2));
        let after_first = store.pending_config();

        store.remove_widget(WidgetId(2));
        assert_eq!(store.pending_config(), after_first);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let (_, store) = editing_store(DashboardConfig::default_layout());
        let added = store.add_widget(WidgetType::Text, DataSource::default()).unwrap();
        store.remove_widget(added);
        let again = store.add_widget(WidgetType::Text, DataSource::default()).unwrap();

        assert!(again > added);
        assert!(added > WidgetId(4), "must not collide with loaded ids");
    }

    #[test]
    fn test_reorder_clamps_and_marks_dirty() {
        let (_, store) = editing_store(DashboardConfig::default_layout());
        assert!(!store.is_dirty());

        store.reorder_widgets(0, 99);
        assert_eq!(
            widget_ids(&store),
            vec![WidgetId(2), WidgetId(3), WidgetId(4), WidgetId(1)]
        );
        assert_eq!(positions(&store), vec![0, 1, 2, 3]);
        assert!(store.is_dirty());
    }

    #[test]
    fn test_update_and_resize_keep_position() {
        let (_, store) = editing_store(DashboardConfig::default_layout());
        let source = DataSource::metric("sales_by_employee").with_period("yesterday");
        store.update_widget_data_source(WidgetId(2), source.clone());
        // bar chart does not allow 1x1, snaps to 2x1
        store.resize_widget(WidgetId(2), WidgetSize::new(1, 1));
        store.resize_widget(WidgetId(2), WidgetSize::new(4, 2));

        let widget = store.current().widget(WidgetId(2)).cloned().unwrap();
        assert_eq!(widget.data_source, source);
        assert_eq!(widget.size, WidgetSize::new(4, 2));
        assert_eq!(widget.position, 1);
    }

    #[test]
    fn test_mutations_outside_edit_mode_are_ignored() {
        let gateway = Arc::new(ScriptedGateway::new(false));
        let store = DashboardStore::new(gateway, DashboardConfig::default_layout());

        assert_eq!(store.add_widget(WidgetType::Heatmap, DataSource::metric("x")), None);
        store.remove_widget(WidgetId(1));
        store.reorder_kpi_slots(0, 3);

        assert_eq!(store.current(), DashboardConfig::default_layout());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_kpi_slots_follow_the_same_rules() {
        let (_, store) = editing_store(DashboardConfig::default_layout());
        let added = store.add_kpi_slot(KpiType::FoodCostPct).unwrap();
        assert_eq!(store.kpi_slot_index(added), Some(4));

        store.reorder_kpi_slots(4, 0);
        store.remove_kpi_slot(KpiSlotId(2));
        store.remove_kpi_slot(KpiSlotId(2));

        let slots = store.current().kpi_slots;
        let ids: Vec<_> = slots.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![added, KpiSlotId(1), KpiSlotId(3), KpiSlotId(4)]);
        assert!(slots.iter().enumerate().all(|(i, s)| s.position == i));
    }

    #[tokio::test]
    async fn test_cancel_leaves_saved_config_untouched() {
        let (gateway, store) = editing_store(DashboardConfig::default_layout());
        store.add_widget(WidgetType::Heatmap, DataSource::metric("orders_by_weekday_hour"));
        store.reorder_widgets(0, 2);
        store.remove_kpi_slot(KpiSlotId(1));

        store.exit_edit_mode(false).await.unwrap();

        assert!(!store.is_edit_mode());
        assert!(!store.is_dirty());
        assert_eq!(store.saved_config(), DashboardConfig::default_layout());
        assert_eq!(gateway.save_count(), 0);
    }

    #[tokio::test]
    async fn test_save_adopts_gateway_echo() {
        let (gateway, store) = editing_store(DashboardConfig::default());
        store.add_widget(WidgetType::Sparkline, DataSource::metric("hourly_orders"));

        store.exit_edit_mode(true).await.unwrap();

        assert!(!store.is_edit_mode());
        assert_eq!(store.saved_config().widgets.len(), 1);
        assert!(store.last_saved_at().is_some());
        assert_eq!(gateway.save_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_edits() {
        let (gateway, store) = editing_store(DashboardConfig::default_layout());
        store.remove_widget(WidgetId(3));
        let edits = store.pending_config();
        gateway.fail_next_save(DashboardError::Network("connection reset".to_string()));

        let result = store.exit_edit_mode(true).await;

        assert_eq!(result, Err(DashboardError::Network("connection reset".to_string())));
        assert!(store.is_edit_mode());
        assert!(store.is_dirty());
        assert!(!store.is_saving());
        assert_eq!(store.pending_config(), edits);
        assert_eq!(store.saved_config(), DashboardConfig::default_layout());

        // retry goes through
        store.exit_edit_mode(true).await.unwrap();
        assert_eq!(Some(store.saved_config()), edits);
    }

    #[tokio::test]
    async fn test_second_save_while_pending_is_rejected() {
        let gateway = Arc::new(ScriptedGateway::new(true));
        let store = Arc::new(DashboardStore::new(gateway.clone(), DashboardConfig::default()));
        store.enter_edit_mode();
        store.add_widget(WidgetType::MetricCard, DataSource::metric("revenue"));

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.exit_edit_mode(true).await }
        });
        gateway.started.notified().await;

        assert!(store.is_saving());
        assert_eq!(store.exit_edit_mode(true).await, Err(DashboardError::ConcurrentSave));
        assert_eq!(store.exit_edit_mode(false).await, Err(DashboardError::ConcurrentSave));
        // locked while saving
        assert_eq!(store.add_widget(WidgetType::Text, DataSource::default()), None);

        gateway.release.notify_one();
        assert_eq!(first.await.unwrap(), Ok(()));

        assert!(!store.is_saving());
        assert!(!store.is_edit_mode());
        assert_eq!(store.saved_config().widgets.len(), 1);
        assert_eq!(gateway.save_count(), 1);
    }

    #[test]
    fn test_mutation_waiting_on_lock_sees_save_start() {
        let (_, store) = editing_store(DashboardConfig::default_layout());
        let before = store.pending_config();

        let state = store.lock();
        std::thread::scope(|scope| {
            let adder = scope.spawn(|| store.add_widget(WidgetType::Text, DataSource::default()));
            // let the adder block on the state lock before the save begins
            std::thread::sleep(std::time::Duration::from_millis(50));
            let guard = SavingGuard::acquire(&store.saving);
            assert!(guard.is_some());
            drop(state);

            assert_eq!(adder.join().unwrap(), None);
            drop(guard);
        });

        assert_eq!(store.pending_config(), before);
        assert!(!store.is_dirty());
    }

    proptest! {
        #[test]
        fn prop_positions_stay_dense(ops in prop::collection::vec((any::<bool>(), 1u64..12), 0..40)) {
            let (_, store) = editing_store(DashboardConfig::default());
            for (add, id) in ops {
                if add {
                    store.add_widget(WidgetType::MetricCard, DataSource::metric("revenue"));
                } else {
                    store.remove_widget(WidgetId(id));
                }
                let expected: Vec<usize> = (0..store.current().widgets.len()).collect();
                prop_assert_eq!(positions(&store), expected);
            }
        }

        #[test]
        fn prop_reorder_round_trip(i in 0usize..4, j in 0usize..4) {
            prop_assume!(i != j);
            let (_, store) = editing_store(DashboardConfig::default_layout());
            let before = store.pending_config();
            store.reorder_widgets(i, j);
            store.reorder_widgets(j, i);
            prop_assert_eq!(store.pending_config(), before);
        }
    }
}
