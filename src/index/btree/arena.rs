//! Slot arena that owns every node of a tree.
//!
//! Nodes refer to each other by [`NodeId`]. Freed slots are recycled, and
//! each recycle bumps the slot's generation so ids issued for the previous
//! occupant stop resolving.

use crate::common::NodeId;

struct Slot<T> {
    generation: u32,
    node: Option<T>,
}

pub(crate) struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

impl<T> NodeArena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn alloc(&mut self, node: T) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            NodeId::with_generation(index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId::new(self.slots.len() - 1)
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot<T>> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
    }

    /// Returns the node for `id`, or `None` if the slot is free, out of
    /// range, or now holds a later generation.
    #[inline]
    pub(crate) fn try_get(&self, id: NodeId) -> Option<&T> {
        self.slot(id).and_then(|slot| slot.node.as_ref())
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &T {
        self.try_get(id)
            .unwrap_or_else(|| panic!("`NodeArena::get()` - {} is not live", id))
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
            .unwrap_or_else(|| panic!("`NodeArena::get_mut()` - {} is not live", id))
    }

    /// Removes the node from the arena and returns it. The slot is recycled
    /// under the next generation.
    pub(crate) fn take(&mut self, id: NodeId) -> T {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .unwrap_or_else(|| panic!("`NodeArena::take()` - {} is not live", id));
        let node = slot
            .node
            .take()
            .unwrap_or_else(|| panic!("`NodeArena::take()` - {} is not live", id));
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        node
    }
}
