use fxhash::FxHashMap;

/// Maps fence objects to small integer ids, since fences are pointers rather than GL names.
///
/// Ids come from a counter starting at 0 and are never reused.
pub struct SyncRegistry<F> {
    syncs: FxHashMap<i32, F>,
    next_id: i32,
}

impl<F> SyncRegistry<F> {
    pub fn new() -> Self {
        Self { syncs: FxHashMap::default(), next_id: 0 }
    }

    pub fn register(&mut self, sync: F) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        self.syncs.insert(id, sync);
        id
    }

    pub fn get(&self, id: i32) -> Option<&F> {
        self.syncs.get(&id)
    }

    pub fn unregister(&mut self, id: i32) -> Option<F> {
        self.syncs.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.syncs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syncs.is_empty()
    }

    /// Removes every outstanding fence, lowest id first.
    pub fn drain(&mut self) -> Vec<F> {
        let mut syncs: Vec<_> = self.syncs.drain().collect();
        syncs.sort_by_key(|(id, _)| *id);
        syncs.into_iter().map(|(_, sync)| sync).collect()
    }
}

impl<F> Default for SyncRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_count_up_from_zero_and_are_not_reused() {
        let mut syncs = SyncRegistry::new();
        assert_eq!(syncs.register("a"), 0);
        assert_eq!(syncs.register("b"), 1);
        assert_eq!(syncs.unregister(1), Some("b"));
        assert_eq!(syncs.register("c"), 2);
        assert_eq!(syncs.get(2), Some(&"c"));
        assert_eq!(syncs.get(1), None);
    }

    #[test]
    fn unregistering_twice_returns_none() {
        let mut syncs = SyncRegistry::new();
        let id = syncs.register(10u64);
        assert_eq!(syncs.unregister(id), Some(10));
        assert_eq!(syncs.unregister(id), None);
        assert!(syncs.is_empty());
    }

    #[test]
    fn drain_is_ordered_by_id() {
        let mut syncs = SyncRegistry::new();
        for value in ["x", "y", "z"] {
            syncs.register(value);
        }
        syncs.unregister(1);
        assert_eq!(syncs.drain(), vec!["x", "z"]);
        assert_eq!(syncs.len(), 0);
    }
}
