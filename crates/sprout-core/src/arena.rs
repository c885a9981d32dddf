//! Generational arena
//!
//! Fibers refer to each other by index. A slot's generation is bumped every
//! time it is freed, so an index held across a release (a stale `alternate`,
//! a discarded work-in-progress fiber) never resolves to the slot's next tenant.

use std::fmt;

/// Generational index for safe references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenIndex {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Display for GenIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Generational arena (slot map)
#[derive(Debug)]
pub struct GenArena<T> {
    items: Vec<Option<(T, u32)>>,
    free_list: Vec<u32>,
    generations: Vec<u32>,
    live: usize,
}

impl<T> GenArena<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            free_list: Vec::new(),
            generations: Vec::new(),
            live: 0,
        }
    }

    /// Insert item
    pub fn insert(&mut self, value: T) -> GenIndex {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let generation = self.generations[index as usize];
            self.items[index as usize] = Some((value, generation));
            GenIndex { index, generation }
        } else {
            let index = self.items.len() as u32;
            self.items.push(Some((value, 0)));
            self.generations.push(0);
            GenIndex { index, generation: 0 }
        }
    }

    /// Get item
    pub fn get(&self, idx: GenIndex) -> Option<&T> {
        self.items
            .get(idx.index as usize)
            .and_then(|opt| opt.as_ref())
            .filter(|(_, g)| *g == idx.generation)
            .map(|(val, _)| val)
    }

    /// Get item mutably
    pub fn get_mut(&mut self, idx: GenIndex) -> Option<&mut T> {
        self.items
            .get_mut(idx.index as usize)
            .and_then(|opt| opt.as_mut())
            .filter(|(_, g)| *g == idx.generation)
            .map(|(val, _)| val)
    }

    pub fn contains(&self, idx: GenIndex) -> bool {
        self.get(idx).is_some()
    }

    /// Remove item
    pub fn remove(&mut self, idx: GenIndex) -> Option<T> {
        let slot = self.items.get_mut(idx.index as usize)?;
        if !matches!(slot, Some((_, g)) if *g == idx.generation) {
            return None;
        }
        let (val, _) = slot.take()?;
        self.generations[idx.index as usize] += 1;
        self.free_list.push(idx.index);
        self.live -= 1;
        Some(val)
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl<T> Default for GenArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_arena() {
        let mut arena = GenArena::new();
        let idx = arena.insert(42);

        assert_eq!(arena.get(idx), Some(&42));
        arena.remove(idx);
        assert_eq!(arena.get(idx), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn test_stale_index_after_reuse() {
        let mut arena = GenArena::new();
        let first = arena.insert("old");
        arena.remove(first);

        let second = arena.insert("new");
        assert_eq!(second.index, first.index);
        assert_ne!(second.generation, first.generation);
        assert_eq!(arena.get(first), None);
        assert_eq!(arena.get(second), Some(&"new"));
        assert_eq!(arena.remove(first), None);
        assert!(!arena.contains(first));
        assert!(arena.contains(second));
        assert_eq!(arena.len(), 1);
    }
}
