//! A minimal in-memory relational store over named object tables and typed
//! morphisms, used as the backing incidence structure for [`crate::primal`]
//! and [`crate::dual`]. This is the `RelStore` of spec.md §4.1: it holds a
//! dense id range per object table and, for each named morphism `f: A → B`,
//! a `Vec<usize>` mapping rows of `A` to rows of `B`, plus an inverse index
//! for morphisms flagged `index`.
//!
//! The index structure generalizes the ad hoc `HashMap<Simplex, usize>`
//! lookup the teacher keeps on `SimplicialComplex` into something reusable
//! across every face/coface relation a complex needs, instead of one
//! hand-rolled index per relation.

use std::collections::HashMap;

/// Sentinel used internally for an unset morphism entry. Never observable
/// through the public API.
const UNSET: usize = usize::MAX;

/// A relational store over object tables and `usize`-valued morphisms.
#[derive(Debug, Clone, Default)]
pub struct RelStore {
    parts: HashMap<&'static str, usize>,
    morphisms: HashMap<&'static str, Vec<usize>>,
    indices: HashMap<&'static str, HashMap<usize, Vec<usize>>>,
}

impl RelStore {
    pub fn new() -> Self {
        RelStore::default()
    }

    /// Append a row to `table` and return its id.
    pub fn add_part(&mut self, table: &'static str) -> usize {
        let count = self.parts.entry(table).or_insert(0);
        let id = *count;
        *count += 1;
        id
    }

    /// Append `n` rows to `table` and return their ids.
    pub fn add_parts(&mut self, table: &'static str, n: usize) -> Vec<usize> {
        (0..n).map(|_| self.add_part(table)).collect()
    }

    pub fn num_parts(&self, table: &'static str) -> usize {
        *self.parts.get(table).unwrap_or(&0)
    }

    /// Assign `morphism(id) = value`. When `indexed` is set, also records
    /// `id` under the inverse index keyed by `value`.
    pub fn set_subpart(&mut self, morphism: &'static str, id: usize, value: usize, indexed: bool) {
        let vec = self.morphisms.entry(morphism).or_default();
        if vec.len() <= id {
            vec.resize(id + 1, UNSET);
        }
        vec[id] = value;
        if indexed {
            self.indices
                .entry(morphism)
                .or_default()
                .entry(value)
                .or_default()
                .push(id);
        }
    }

    /// Scalar lookup `morphism(id)`.
    pub fn subpart(&self, morphism: &'static str, id: usize) -> Option<usize> {
        self.morphisms
            .get(morphism)
            .and_then(|v| v.get(id))
            .copied()
            .filter(|&x| x != UNSET)
    }

    /// Vectorized lookup `morphism(ids)`.
    pub fn subpart_many(&self, morphism: &'static str, ids: &[usize]) -> Vec<Option<usize>> {
        ids.iter().map(|&id| self.subpart(morphism, id)).collect()
    }

    /// Inverse lookup: the (possibly empty) list of ids `x` with
    /// `morphism(x) == target_id`. Requires `morphism` to have been written
    /// with `indexed = true` at least once; otherwise always empty.
    pub fn incident(&self, morphism: &'static str, target_id: usize) -> &[usize] {
        self.indices
            .get(morphism)
            .and_then(|m| m.get(&target_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_part_assigns_dense_ids() {
        let mut store = RelStore::new();
        assert_eq!(store.add_part("V"), 0);
        assert_eq!(store.add_part("V"), 1);
        assert_eq!(store.add_parts("V", 3), vec![2, 3, 4]);
        assert_eq!(store.num_parts("V"), 5);
        assert_eq!(store.num_parts("E"), 0);
    }

    #[test]
    fn subpart_roundtrips() {
        let mut store = RelStore::new();
        let e = store.add_part("E");
        store.set_subpart("src", e, 7, true);
        assert_eq!(store.subpart("src", e), Some(7));
        assert_eq!(store.subpart("src", 99), None);
    }

    #[test]
    fn incident_is_inverse_of_subpart() {
        let mut store = RelStore::new();
        let e0 = store.add_part("E");
        let e1 = store.add_part("E");
        let e2 = store.add_part("E");
        store.set_subpart("src", e0, 0, true);
        store.set_subpart("src", e1, 0, true);
        store.set_subpart("src", e2, 1, true);

        let mut incident_to_0 = store.incident("src", 0).to_vec();
        incident_to_0.sort_unstable();
        assert_eq!(incident_to_0, vec![e0, e1]);
        assert_eq!(store.incident("src", 1), &[e2]);
        assert_eq!(store.incident("src", 2), &[] as &[usize]);
    }
}
