use fnv::FnvHasher;
use std::collections::HashSet;
use std::hash::{BuildHasherDefault, Hash};

pub type FnvHashSet<T> = HashSet<T, BuildHasherDefault<FnvHasher>>;

/// Construct a hash set with the specified capacity. The hashing algorithm
/// is much faster than the default on short keys such as integers and small
/// coordinate structs, at the cost of robustness against key collision
/// attacks - fine for grid walks.
pub fn fnv_hashset<T: Hash + Eq>(capacity: usize) -> FnvHashSet<T> {
    let fnv = BuildHasherDefault::<FnvHasher>::default();
    HashSet::<T, _>::with_capacity_and_hasher(capacity, fnv)
}
