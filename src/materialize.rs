use std::slice;

use tracing::{debug, trace};

use crate::adjacency::Adjacency;
use crate::error::{BuildError, Diagnostic};
use crate::index::Index;
use crate::mapper::ResultMapper;
use crate::util::{report, FastSet};
use crate::NodeId;

/// How the tree is walked while building results.
///
/// Both produce the same forest with the same sequence of mapper calls;
/// [Traversal::Iterative] keeps its state on the heap, so very deep inputs
/// cannot overflow the call stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Traversal {
    #[default]
    Recursive,
    Iterative,
}

/// A mapped node whose children are still being built.
struct Frame<'t, N, R> {
    id: &'t N,
    node: R,
    depth: usize,
    pending: slice::Iter<'t, N>,
    children: Option<Vec<R>>,
}

/// Walks an [Adjacency] from each of its unvisited keys, producing one result per tree.
pub(crate) struct Materializer<'t, T, N: NodeId, M: ResultMapper<T>> {
    pub(crate) rows: &'t [Option<T>],
    pub(crate) index: &'t Index<N>,
    pub(crate) adjacency: &'t Adjacency<N>,
    pub(crate) mapper: &'t mut M,
    pub(crate) visited: &'t mut FastSet<N>,
    pub(crate) diagnostics: &'t mut Vec<Diagnostic<N>>,
    pub(crate) max_depth: Option<usize>,
}

impl<'t, T, N: NodeId, M: ResultMapper<T>> Materializer<'t, T, N, M> {
    pub(crate) fn run(mut self, traversal: Traversal) -> Result<Vec<M::Output>, BuildError<N>> {
        let adjacency = self.adjacency;
        let mut forest = Vec::default();
        for key in adjacency.keys() {
            if self.visited.contains(key) {
                trace!("Skipping {key:?}: already attached under another node");
                continue;
            }
            let tree = match traversal {
                Traversal::Recursive => self.expand(key, 0, None)?,
                Traversal::Iterative => self.expand_iterative(key)?,
            };
            self.visited.insert(key.clone());
            if let Some(t) = tree {
                forest.push(t);
            }
        }
        debug!("Built forest of {} trees", forest.len());
        Ok(forest)
    }

    fn row(&mut self, id: &N) -> Option<&'t T> {
        let rows = self.rows;
        let found = self.index.get(id).and_then(|pos| rows[pos].as_ref());
        if found.is_none() {
            report(self.diagnostics, Diagnostic::MissingRow { id: id.clone() });
        }
        found
    }

    /// Map the row for this ID; `None` if there is no such row.
    fn open(
        &mut self,
        id: &'t N,
        depth: usize,
        parent: Option<&M::Output>,
    ) -> Result<Option<Frame<'t, N, M::Output>>, BuildError<N>> {
        let Some(row) = self.row(id) else {
            return Ok(None);
        };
        if let Some(max) = self.max_depth {
            if depth > max {
                return Err(BuildError::DepthExceeded {
                    id: id.clone(),
                    depth: max,
                });
            }
        }
        let node = self.mapper.map_row(row, depth, parent);
        let adjacency = self.adjacency;
        let child_ids = adjacency.children(id).unwrap_or_default();
        Ok(Some(Frame {
            id,
            node,
            depth,
            pending: child_ids.iter(),
            children: (!child_ids.is_empty()).then(|| Vec::with_capacity(child_ids.len())),
        }))
    }

    fn close(&mut self, frame: Frame<'t, N, M::Output>) -> M::Output {
        let mut node = frame.node;
        self.mapper.on_children(&mut node, frame.children);
        node
    }

    fn expand(
        &mut self,
        id: &'t N,
        depth: usize,
        parent: Option<&M::Output>,
    ) -> Result<Option<M::Output>, BuildError<N>> {
        let Some(mut frame) = self.open(id, depth, parent)? else {
            return Ok(None);
        };
        while let Some(child_id) = frame.pending.next() {
            let child = self.expand(child_id, depth + 1, Some(&frame.node))?;
            if let (Some(c), Some(children)) = (child, frame.children.as_mut()) {
                children.push(c);
            }
            // also when missing, so it is never retried as a root
            self.visited.insert(child_id.clone());
        }
        Ok(Some(self.close(frame)))
    }

    fn expand_iterative(&mut self, id: &'t N) -> Result<Option<M::Output>, BuildError<N>> {
        let Some(root) = self.open(id, 0, None)? else {
            return Ok(None);
        };
        let mut stack = vec![root];

        while let Some(top) = stack.last_mut() {
            if let Some(child_id) = top.pending.next() {
                let depth = top.depth + 1;
                let parent = stack.last().map(|f| &f.node);
                match self.open(child_id, depth, parent)? {
                    Some(frame) => stack.push(frame),
                    None => {
                        self.visited.insert(child_id.clone());
                    }
                }
                continue;
            }

            let Some(frame) = stack.pop() else {
                break;
            };
            let child_id = frame.id;
            let node = self.close(frame);
            let Some(parent) = stack.last_mut() else {
                return Ok(Some(node));
            };
            if let Some(children) = parent.children.as_mut() {
                children.push(node);
            }
            self.visited.insert(child_id.clone());
        }
        Ok(None)
    }
}
