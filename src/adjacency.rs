use std::collections::hash_map::Entry;

use tracing::debug;

use crate::error::Diagnostic;
use crate::index::Index;
use crate::row::Keys;
use crate::util::{report, FastMap};
use crate::NodeId;

/// Parent ID -> ordered child IDs, keyed in first-seen order.
///
/// Root rows appear as keys even when they have no children.
/// Non-root rows appear in their parent's child list, in input order.
#[derive(Debug, Clone)]
pub struct Adjacency<N: NodeId> {
    keys: Vec<N>,
    children: FastMap<N, Vec<N>>,
}

impl<N: NodeId> Adjacency<N> {
    /// Classify every row as root or child, in input order.
    ///
    /// A row is a root if the caller's predicate says so; without a predicate,
    /// if it has no parent ID or its parent ID is not in the index.
    pub(crate) fn analyze<T>(
        rows: &[Option<T>],
        index: &Index<N>,
        keys: &Keys<'_, T, N>,
        diagnostics: &mut Vec<Diagnostic<N>>,
    ) -> Self {
        let mut adj = Self::default();
        let mut n_roots: usize = 0;

        for (pos, row) in rows.iter().enumerate() {
            // already reported by the index
            let Some(row) = row else {
                continue;
            };
            let id_opt = keys.id(row);
            let parent_opt = keys.parent_id(row);

            let is_root = keys.root_override(row).unwrap_or_else(|| match &parent_opt {
                None => true,
                Some(p) => !index.contains(p),
            });

            let Some(id) = id_opt else {
                report(diagnostics, Diagnostic::NullId { row: pos });
                continue;
            };

            let parent_id = match parent_opt {
                Some(p) if !is_root => p,
                // nothing to attach to, even if the predicate disagrees
                _ => {
                    adj.register_root(id);
                    n_roots += 1;
                    continue;
                }
            };

            if parent_id == id {
                report(diagnostics, Diagnostic::SelfReference { id: id.clone(), row: pos });
                adj.register_root(id);
                n_roots += 1;
                continue;
            }

            adj.entry(parent_id).push(id);
        }

        debug!(
            "Analyzed {} rows: {} roots, {} adjacency keys",
            rows.len(),
            n_roots,
            adj.len()
        );
        adj
    }

    fn entry(&mut self, id: N) -> &mut Vec<N> {
        match self.children.entry(id) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                self.keys.push(e.key().clone());
                e.insert(Vec::default())
            }
        }
    }

    /// Add a top-level key, keeping any children it already has.
    fn register_root(&mut self, id: N) {
        self.entry(id);
    }

    /// Keys in the order they were first seen.
    pub fn keys(&self) -> &[N] {
        &self.keys
    }

    /// Child IDs of the given node, in input order.
    ///
    /// `None` if the ID is not a key; an empty slice for a root without children.
    pub fn children(&self, id: &N) -> Option<&[N]> {
        self.children.get(id).map(|c| c.as_slice())
    }

    pub fn contains(&self, id: &N) -> bool {
        self.children.contains_key(id)
    }

    /// Iterate over `(key, children)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&N, &[N])> + '_ {
        self.keys
            .iter()
            .map(move |k| (k, self.children(k).unwrap_or_default()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<N: NodeId> Default for Adjacency<N> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            children: FastMap::default(),
        }
    }
}

impl<N: NodeId> FromIterator<(N, Vec<N>)> for Adjacency<N> {
    /// Repeated keys have their children appended.
    fn from_iter<I: IntoIterator<Item = (N, Vec<N>)>>(iter: I) -> Self {
        let mut adj = Self::default();
        for (key, children) in iter {
            adj.entry(key).extend(children);
        }
        adj
    }
}
