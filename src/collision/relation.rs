use std::collections::HashMap;

use crate::utils::allocator::{Arena, EntityId};

fn canonical(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// "Collided with" relation between bodies.
///
/// Pairs live in an arena; a lookup table keeps them unique and a per-body
/// index answers "what is this body touching" without scanning every pair.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    pairs: Arena<(EntityId, EntityId)>,
    lookup: HashMap<(EntityId, EntityId), EntityId>,
    by_body: HashMap<EntityId, Vec<EntityId>>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags both bodies. Returns `false` if the pair was already related.
    pub fn add(&mut self, a: EntityId, b: EntityId) -> bool {
        if a == b {
            return false;
        }
        let key = canonical(a, b);
        if self.lookup.contains_key(&key) {
            return false;
        }

        let handle = self.pairs.insert(key);
        self.lookup.insert(key, handle);
        self.by_body.entry(key.0).or_default().push(key.1);
        self.by_body.entry(key.1).or_default().push(key.0);
        true
    }

    pub fn remove(&mut self, a: EntityId, b: EntityId) -> bool {
        let key = canonical(a, b);
        let Some(handle) = self.lookup.remove(&key) else {
            return false;
        };
        self.pairs.remove(handle);
        self.unlink(key.0, key.1);
        self.unlink(key.1, key.0);
        true
    }

    fn unlink(&mut self, body: EntityId, other: EntityId) {
        if let Some(related) = self.by_body.get_mut(&body) {
            related.retain(|id| *id != other);
            if related.is_empty() {
                self.by_body.remove(&body);
            }
        }
    }

    /// Drops every relation involving `id`.
    pub fn remove_all_for(&mut self, id: EntityId) -> usize {
        let related = self.by_body.get(&id).cloned().unwrap_or_default();
        related
            .into_iter()
            .filter(|other| self.remove(id, *other))
            .count()
    }

    pub fn contains(&self, a: EntityId, b: EntityId) -> bool {
        self.lookup.contains_key(&canonical(a, b))
    }

    pub fn related(&self, id: EntityId) -> &[EntityId] {
        self.by_body.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All related pairs, canonical and sorted.
    pub fn pairs(&self) -> Vec<(EntityId, EntityId)> {
        let mut pairs: Vec<_> = self.pairs.values().copied().collect();
        pairs.sort_unstable();
        pairs
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Number of per-body tags; two per pair.
    pub fn tag_count(&self) -> usize {
        self.by_body.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
        self.lookup.clear();
        self.by_body.clear();
    }
}

/// Structural change to a [`RelationGraph`] staged during a parallel phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationCommand {
    Add(EntityId, EntityId),
    Remove(EntityId, EntityId),
}

/// Commands recorded by one worker, applied after the phase joins.
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    commands: Vec<RelationCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, a: EntityId, b: EntityId) {
        self.commands.push(RelationCommand::Add(a, b));
    }

    pub fn remove(&mut self, a: EntityId, b: EntityId) {
        self.commands.push(RelationCommand::Remove(a, b));
    }

    pub fn append(&mut self, other: &mut CommandBuffer) {
        self.commands.append(&mut other.commands);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replays the buffer in recording order. Returns how many commands changed the graph.
    pub fn apply(self, graph: &mut RelationGraph) -> usize {
        self.commands
            .into_iter()
            .filter(|command| match *command {
                RelationCommand::Add(a, b) => graph.add(a, b),
                RelationCommand::Remove(a, b) => graph.remove(a, b),
            })
            .count()
    }
}

impl Extend<RelationCommand> for CommandBuffer {
    fn extend<I: IntoIterator<Item = RelationCommand>>(&mut self, iter: I) {
        self.commands.extend(iter);
    }
}
