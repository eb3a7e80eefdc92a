use std::collections::HashSet;

/// Hands out identifiers that have not been used before.
///
/// The counter only moves forward and skips anything already taken, so the
/// same allocator must be used for every record of one kind in a run.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
    used: HashSet<u64>,
}

impl IdAllocator {
    pub fn new(start: u64, used: impl IntoIterator<Item = u64>) -> Self {
        Self {
            next: start,
            used: used.into_iter().collect(),
        }
    }

    /// Start one past the largest identifier in `used`
    pub fn after(used: impl IntoIterator<Item = u64>) -> Self {
        let used: HashSet<u64> = used.into_iter().collect();
        let next = used.iter().max().map_or(0, |max| max.saturating_add(1));
        Self { next, used }
    }

    pub fn allocate(&mut self) -> u64 {
        while self.used.contains(&self.next) {
            self.next += 1;
        }
        let id = self.next;
        self.used.insert(id);
        self.next += 1;
        id
    }
}
