use serde::{Deserialize, Serialize};
use std::fmt;

/// Index + generation pair; the generation changes whenever a slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct GenerationalId {
    pub index: u32,
    pub generation: u32,
}

impl GenerationalId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Opaque body identifier.
///
/// Ids are totally ordered and stay valid for the lifetime of the body they
/// name; collision pairs are always stored with the smaller id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EntityId(pub GenerationalId);

impl EntityId {
    pub const NULL: EntityId = EntityId(GenerationalId {
        index: u32::MAX,
        generation: 0,
    });

    pub fn new(index: u32, generation: u32) -> Self {
        Self(GenerationalId::new(index, generation))
    }

    pub fn from_index(index: u32) -> Self {
        Self::new(index, 0)
    }

    pub fn index(&self) -> usize {
        self.0.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.0.generation
    }

    pub fn is_null(&self) -> bool {
        self.0.index == u32::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0.index, self.0.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational arena handing out stable [`EntityId`]s.
///
/// Freed slots are recycled lowest-index first, which keeps live values packed
/// towards the front of the storage.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> EntityId {
        self.insert_with(|_| value)
    }

    /// Inserts the value produced by `make`, which receives the id it will live under.
    pub fn insert_with(&mut self, make: impl FnOnce(EntityId) -> T) -> EntityId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let id = EntityId::new(index, slot.generation);
            slot.value = Some(make(id));
            return id;
        }

        let index = self.slots.len() as u32;
        let id = EntityId::new(index, 0);
        self.slots.push(Slot {
            generation: 0,
            value: Some(make(id)),
        });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_mut())
    }

    /// Borrows two distinct live values mutably, in argument order.
    pub fn get2_mut(&mut self, id_a: EntityId, id_b: EntityId) -> Option<(&mut T, &mut T)> {
        if id_a.index() == id_b.index() || !self.contains(id_a) || !self.contains(id_b) {
            return None;
        }

        let flipped = id_a.index() > id_b.index();
        let (low, high) = if flipped {
            (id_b.index(), id_a.index())
        } else {
            (id_a.index(), id_b.index())
        };

        let (left, right) = self.slots.split_at_mut(high);
        let low_value = left[low].value.as_mut()?;
        let high_value = right[0].value.as_mut()?;

        if flipped {
            Some((high_value, low_value))
        } else {
            Some((low_value, high_value))
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.0.index);
        // lowest index is reused first
        self.free.sort_unstable_by(|a, b| b.cmp(a));
        self.live -= 1;
        Some(value)
    }

    /// Drops every value; outstanding ids become stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        self.live = 0;
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live `(id, value)` pairs in ascending id-index order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (EntityId::new(index as u32, slot.generation), value))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (EntityId::new(index as u32, generation), value))
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.slots.iter_mut().filter_map(|slot| slot.value.as_mut())
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter().map(|(id, _)| id)
    }
}

#[cfg(feature = "parallel")]
impl<T: Send> Arena<T> {
    /// Parallel mutable iteration over live values.
    pub fn par_values_mut(&mut self) -> impl rayon::iter::ParallelIterator<Item = &mut T> + '_ {
        use rayon::prelude::*;
        self.slots
            .par_iter_mut()
            .filter_map(|slot| slot.value.as_mut())
    }
}
