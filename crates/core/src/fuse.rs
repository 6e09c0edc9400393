use std::collections::BTreeMap;

use crate::{CategoryCounters, DayAggregate};

/// Structural merge of aggregate snapshots by summing leaf counters.
///
/// Implementations must be commutative and associative, with
/// `Default::default()` as the identity.
pub trait Fuse {
    fn fuse_from(&mut self, other: &Self);
}

impl Fuse for u64 {
    fn fuse_from(&mut self, other: &Self) {
        *self = self.saturating_add(*other);
    }
}

impl<T> Fuse for BTreeMap<String, T>
where
    T: Fuse + Default,
{
    fn fuse_from(&mut self, other: &Self) {
        for (key, value) in other {
            self.entry(key.clone()).or_default().fuse_from(value);
        }
    }
}

impl Fuse for CategoryCounters {
    fn fuse_from(&mut self, other: &Self) {
        self.status.fuse_from(&other.status);
        self.path_types.fuse_from(&other.path_types);
        self.duration_ranges.fuse_from(&other.duration_ranges);
        self.hits.fuse_from(&other.hits);
        self.pages.fuse_from(&other.pages);
    }
}

impl Fuse for DayAggregate {
    fn fuse_from(&mut self, other: &Self) {
        self.ua_tops.fuse_from(&other.ua_tops);
        self.google.fuse_from(&other.google);
        self.bots.fuse_from(&other.bots);
        self.users.fuse_from(&other.users);
    }
}

impl DayAggregate {
    /// Returns the merge of two snapshots without touching either input.
    pub fn fused(&self, other: &DayAggregate) -> DayAggregate {
        let mut total = self.clone();
        total.fuse_from(other);
        total
    }
}

/// Left fold of any number of snapshots, starting from the zero aggregate.
pub fn fuse_all<'a, I>(parts: I) -> DayAggregate
where
    I: IntoIterator<Item = &'a DayAggregate>,
{
    parts
        .into_iter()
        .fold(DayAggregate::default(), |mut total, part| {
            total.fuse_from(part);
            total
        })
}
