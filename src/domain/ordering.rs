// Dense ordering shared by widgets and KPI slots
//
// Every sequence keeps `position == index` for all items after each call.
use super::kpi::{KpiSlot, KpiSlotId};
use super::widget::{Widget, WidgetId};

/// An item that lives in a densely ordered sequence
pub trait Ordered {
    type Id: Copy + Eq + Ord + std::fmt::Debug;

    fn id(&self) -> Self::Id;
    fn position(&self) -> usize;
    fn set_position(&mut self, position: usize);
}

impl Ordered for Widget {
    type Id = WidgetId;

    fn id(&self) -> WidgetId {
        self.id
    }

    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

impl Ordered for KpiSlot {
    type Id = KpiSlotId;

    fn id(&self) -> KpiSlotId {
        self.id
    }

    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

/// Rewrite positions to match array order
pub fn repack<T: Ordered>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index);
    }
}

/// Stable-sort by incoming position, then repack. Used on configs coming from
/// the backend, which may have gaps or arrive out of order.
pub fn normalize<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(|item| item.position());
    repack(items);
}

pub fn is_dense<T: Ordered>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.position() == index)
}

pub fn index_of<T: Ordered>(items: &[T], id: T::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Append at the end of the sequence
pub fn append<T: Ordered>(items: &mut Vec<T>, mut item: T) {
    item.set_position(items.len());
    items.push(item);
}

/// Remove by id. Returns `None` when the id is absent, leaving `items` untouched.
pub fn remove<T: Ordered>(items: &mut Vec<T>, id: T::Id) -> Option<T> {
    let index = index_of(items, id)?;
    let removed = items.remove(index);
    repack(items);
    Some(removed)
}

/// Single-element move from `from` to `to`, shifting everything in between by one.
///
/// Both indices are clamped to `[0, len)`. Returns the effective `(from, to)`
/// pair, or `None` for an empty sequence.
pub fn move_item<T: Ordered>(items: &mut Vec<T>, from: usize, to: usize) -> Option<(usize, usize)> {
    let last = items.len().checked_sub(1)?;
    let from = from.min(last);
    let to = to.min(last);

    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
        repack(items);
    }

    Some((from, to))
}

/// Smallest id strictly above everything in `items`
pub fn next_id_after<T: Ordered>(items: &[T], to_u64: impl Fn(T::Id) -> u64) -> u64 {
    items
        .iter()
        .map(|item| to_u64(item.id()))
        .max()
        .map_or(1, |max| max + 1)
}
