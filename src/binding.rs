//! The per-context record of which object is current in every binding slot.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::enums::{IndexedTarget, ObjectKind, Target};

/// A binding point key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// A plain target. Texture targets are additionally keyed by the texture unit.
    Target(u32, Target),
    Indexed(IndexedTarget, u32),
}

/// Cached bindings of one context.
///
/// The table only remembers what the wrappers asked for. Code that talks to the
/// driver directly can invalidate it, which is why queries always go back
/// to the driver and refresh the cache afterwards.
#[derive(Debug, Default)]
pub struct BindingTable {
    active_unit: u32,
    targets: HashMap<(u32, Target), u32>,
    indexed: HashMap<IndexedTarget, SmallVec<[u32; 8]>>,
}

impl BindingTable {
    pub fn new() -> Self {
        BindingTable::default()
    }

    /// The texture unit later texture binds apply to.
    #[inline]
    pub fn active_unit(&self) -> u32 {
        self.active_unit
    }

    #[inline]
    pub fn set_active_unit(&mut self, unit: u32) {
        self.active_unit = unit;
    }

    /// Resolves `target` to its slot under the current texture unit.
    #[inline]
    pub fn slot(&self, target: Target) -> Slot {
        if target.kind() == ObjectKind::Texture {
            Slot::Target(self.active_unit, target)
        } else {
            Slot::Target(0, target)
        }
    }

    pub fn get(&self, target: Target) -> u32 {
        match self.slot(target) {
            Slot::Target(unit, target) => self.targets.get(&(unit, target)).cloned().unwrap_or(0),
            Slot::Indexed(..) => 0,
        }
    }

    pub fn set(&mut self, target: Target, id: u32) {
        if let Slot::Target(unit, target) = self.slot(target) {
            if id == 0 {
                self.targets.remove(&(unit, target));
            } else {
                self.targets.insert((unit, target), id);
            }
        }
    }

    pub fn get_indexed(&self, target: IndexedTarget, index: u32) -> u32 {
        self.indexed
            .get(&target)
            .and_then(|v| v.get(index as usize))
            .cloned()
            .unwrap_or(0)
    }

    /// Records `id` at `index`. Like the driver, the generic slot of the target
    /// follows the indexed one.
    pub fn set_indexed(&mut self, target: IndexedTarget, index: u32, id: u32) {
        let slots = self.indexed.entry(target).or_insert_with(SmallVec::new);
        let index = index as usize;
        if slots.len() <= index {
            slots.resize(index + 1, 0);
        }

        slots[index] = id;
        self.set(target.target(), id);
    }

    /// Stores the value the driver reported for an indexed slot without touching
    /// the generic slot.
    pub fn refresh_indexed(&mut self, target: IndexedTarget, index: u32, id: u32) {
        let slots = self.indexed.entry(target).or_insert_with(SmallVec::new);
        let index = index as usize;
        if slots.len() <= index {
            slots.resize(index + 1, 0);
        }

        slots[index] = id;
    }

    /// Resets every slot that names the deleted object `id`.
    pub fn forget(&mut self, kind: ObjectKind, id: u32) {
        self.targets
            .retain(|&(_, target), v| !(target.kind() == kind && *v == id));

        if kind == ObjectKind::Buffer {
            for slots in self.indexed.values_mut() {
                for v in slots.iter_mut().filter(|v| **v == id) {
                    *v = 0;
                }
            }
        }
    }

    /// Every non-empty slot, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, u32)> + '_ {
        let targets = self
            .targets
            .iter()
            .map(|(&(unit, target), &id)| (Slot::Target(unit, target), id));

        let indexed = self.indexed.iter().flat_map(|(&target, slots)| {
            slots
                .iter()
                .enumerate()
                .filter(|&(_, &id)| id != 0)
                .map(move |(i, &id)| (Slot::Indexed(target, i as u32), id))
        });

        targets.chain(indexed)
    }
}
