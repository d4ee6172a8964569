use std::collections::hash_map::Entry;

use tracing::debug;

use crate::error::{Diagnostic, DuplicateKey};
use crate::row::Keys;
use crate::util::{report, FastMap};
use crate::NodeId;

/// Lookup from row ID to the row's position in the input.
///
/// Rows without an ID stay in the input but are never addressable here.
#[derive(Debug, Clone)]
pub struct Index<N: NodeId> {
    positions: FastMap<N, usize>,
}

impl<N: NodeId> Index<N> {
    /// Fails on the first ID seen twice; null rows are skipped and reported.
    pub(crate) fn build<T>(
        rows: &[Option<T>],
        keys: &Keys<'_, T, N>,
        diagnostics: &mut Vec<Diagnostic<N>>,
    ) -> Result<Self, DuplicateKey<N>> {
        let mut positions = FastMap::with_capacity(rows.len());
        for (pos, row_opt) in rows.iter().enumerate() {
            let Some(row) = row_opt else {
                report(diagnostics, Diagnostic::NullRow { row: pos });
                continue;
            };
            let Some(id) = keys.id(row) else {
                continue;
            };
            match positions.entry(id) {
                Entry::Occupied(e) => {
                    return Err(DuplicateKey {
                        id: e.key().clone(),
                        row: pos,
                    })
                }
                Entry::Vacant(e) => {
                    e.insert(pos);
                }
            }
        }
        debug!("Indexed {} of {} rows", positions.len(), rows.len());
        Ok(Self { positions })
    }

    /// Position of the row with this ID.
    pub fn get(&self, id: &N) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &N) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over indexed IDs in arbitrary order.
    pub fn ids(&self) -> impl Iterator<Item = &N> {
        self.positions.keys()
    }
}
