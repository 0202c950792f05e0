// Drag-reorder controller - Turns pointer and keyboard gestures into reorder calls
use crate::application::config_store::DashboardStore;
use crate::domain::kpi::KpiSlotId;
use crate::domain::widget::WidgetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn midpoint(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x + self.width / 2.0,
            Axis::Vertical => self.y + self.height / 2.0,
        }
    }
}

/// A rendered item as laid out on screen, in display order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBounds<Id> {
    pub id: Id,
    pub rect: Rect,
}

/// Which sequence of the store a controller reorders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Widgets,
    KpiSlots,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Backward,
    Forward,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState<Id> {
    Idle,
    Dragging {
        id: Id,
        start_index: usize,
        preview_index: usize,
        last_pointer: f64,
    },
    Committing {
        from: usize,
        to: usize,
    },
}

/// Ids the controller can resolve against the store when the drag is dropped
pub trait DragItemId: Copy + PartialEq {
    fn current_index(self, store: &DashboardStore) -> Option<usize>;
}

impl DragItemId for WidgetId {
    fn current_index(self, store: &DashboardStore) -> Option<usize> {
        store.widget_index(self)
    }
}

impl DragItemId for KpiSlotId {
    fn current_index(self, store: &DashboardStore) -> Option<usize> {
        store.kpi_slot_index(self)
    }
}

/// Move events only touch `preview_index`; the store sees exactly one
/// reorder per completed drag and none for a cancelled one.
#[derive(Debug)]
pub struct DragController<Id> {
    target: DragTarget,
    axis: Axis,
    state: DragState<Id>,
}

impl<Id: Copy + PartialEq> DragController<Id> {
    pub fn new(target: DragTarget, axis: Axis) -> Self {
        Self {
            target,
            axis,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> DragState<Id> {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Where the dragged item would land if dropped now
    pub fn preview_index(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging { preview_index, .. } => Some(preview_index),
            _ => None,
        }
    }

    /// Begin dragging `id`. `items` must be the sequence as currently rendered.
    /// Returns false (and stays idle) if `id` is not in `items`.
    pub fn start(&mut self, id: Id, items: &[ItemBounds<Id>], pointer: Point) -> bool {
        let Some(start_index) = items.iter().position(|item| item.id == id) else {
            tracing::debug!("Drag start on an item that is no longer rendered");
            return false;
        };

        self.state = DragState::Dragging {
            id,
            start_index,
            preview_index: start_index,
            last_pointer: pointer.along(self.axis),
        };
        true
    }

    /// Update the preview from the pointer position; never touches the store
    pub fn pointer_move(&mut self, pointer: Point, items: &[ItemBounds<Id>]) -> Option<usize> {
        let axis = self.axis;
        let DragState::Dragging {
            preview_index,
            last_pointer,
            ..
        } = &mut self.state
        else {
            return None;
        };

        let coordinate = pointer.along(axis);
        let travel = coordinate - *last_pointer;
        *last_pointer = coordinate;

        if let Some(index) = nearest_index(items, axis, coordinate, travel) {
            *preview_index = index;
        }
        Some(*preview_index)
    }

    /// Escape key or release outside any drop target
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            tracing::debug!("Drag cancelled");
        }
        self.state = DragState::Idle;
    }

    /// Keyboard move of the item at `index` by one slot, committed immediately.
    /// No-op at the ends of the sequence or while a pointer drag is active.
    pub fn key_move(
        &self,
        store: &DashboardStore,
        index: usize,
        len: usize,
        direction: KeyDirection,
    ) -> Option<usize> {
        if self.is_dragging() || index >= len {
            return None;
        }

        let to = match direction {
            KeyDirection::Backward => index.checked_sub(1)?,
            KeyDirection::Forward => Some(index + 1).filter(|to| *to < len)?,
        };
        self.reorder(store, index, to);
        Some(to)
    }

    fn reorder(&self, store: &DashboardStore, from: usize, to: usize) {
        match self.target {
            DragTarget::Widgets => store.reorder_widgets(from, to),
            DragTarget::KpiSlots => store.reorder_kpi_slots(from, to),
        }
    }
}

impl<Id: DragItemId> DragController<Id> {
    /// Drop: issue the single reorder for this drag. Returns the `(from, to)` pair sent.
    ///
    /// `from` is where the dragged item sits in the store now, which differs
    /// from the start index if other items were removed mid-drag. No reorder
    /// is issued if the dragged item itself is gone.
    pub fn finish(&mut self, store: &DashboardStore) -> Option<(usize, usize)> {
        let DragState::Dragging {
            id, preview_index, ..
        } = self.state
        else {
            return None;
        };

        let Some(from) = id.current_index(store) else {
            tracing::debug!("Dragged item was removed before drop");
            self.state = DragState::Idle;
            return None;
        };

        self.state = DragState::Committing {
            from,
            to: preview_index,
        };
        self.reorder(store, from, preview_index);
        self.state = DragState::Idle;

        Some((from, preview_index))
    }
}

/// Index of the item whose midpoint is closest to `coordinate`.
///
/// On equal distance the item further along the direction of travel wins;
/// with no travel the earlier item wins.
fn nearest_index<Id>(items: &[ItemBounds<Id>], axis: Axis, coordinate: f64, travel: f64) -> Option<usize> {
    let mut best: Option<(usize, f64, f64)> = None;

    for (index, item) in items.iter().enumerate() {
        let midpoint = item.rect.midpoint(axis);
        let distance = (midpoint - coordinate).abs();

        let better = match best {
            None => true,
            Some((_, best_distance, best_midpoint)) => {
                distance < best_distance
                    || (distance == best_distance
                        && ((travel > 0.0 && midpoint > best_midpoint)
                            || (travel < 0.0 && midpoint < best_midpoint)))
            }
        };
        if better {
            best = Some((index, distance, midpoint));
        }
    }

    best.map(|(index, _, _)| index)
}
