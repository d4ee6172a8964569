use crate::util::FastSet;
use crate::{Adjacency, NodeId, Record};
use ascii_tree::{write_tree, Tree as ATree};
pub use fastrand;

impl<N: NodeId> Adjacency<N> {
    /// Print an ASCII representation of the trees, in the order the forest would be built.
    ///
    /// Mainly for debugging purposes.
    /// An `&mut` to an empty `String` makes for a good `w`.
    /// IDs already drawn elsewhere are marked rather than expanded again, so cycles terminate.
    pub fn format_tree<W: core::fmt::Write>(&self, w: &mut W) -> core::fmt::Result {
        let mut drawn = FastSet::with_capacity(self.len());
        for key in self.keys() {
            if drawn.contains(key) {
                continue;
            }
            let atree = self.ascii_node(key, &mut drawn);
            write_tree(w, &atree)?;
        }
        Ok(())
    }

    fn ascii_node<'a>(&'a self, id: &'a N, drawn: &mut FastSet<&'a N>) -> ATree {
        let name = format!("{:?}", id);
        if !drawn.insert(id) {
            return ATree::Leaf(vec![format!("{name} (repeated)")]);
        }
        match self.children(id) {
            Some(children) if !children.is_empty() => ATree::Node(
                name,
                children.iter().map(|c| self.ascii_node(c, drawn)).collect(),
            ),
            _ => ATree::Leaf(vec![name]),
        }
    }
}

/// A generated row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenRow {
    pub id: u64,
    pub parent_id: Option<u64>,
}

impl Record<u64> for GenRow {
    fn id(&self) -> Option<u64> {
        Some(self.id)
    }

    fn parent_id(&self) -> Option<u64> {
        self.parent_id
    }
}

/// Utility for creating random row sets.
///
/// Rows come out in breadth-first order, so parents precede their children.
pub struct RowGen {
    pub n_rows: usize,
    /// The chance of a row starting a new tree rather than joining the current one.
    pub root_p: f64,
    /// The chance of a row being a leaf.
    /// Ignored if this would end the tree prematurely.
    pub leaf: f64,
    /// The chance of an extra child being added to a non-leaf row (repeats until failure).
    pub branch_p: f64,
}

impl RowGen {
    pub fn new(n_rows: usize, root_p: f64, leaf_p: f64, branch_p: f64) -> Self {
        Self {
            n_rows,
            root_p,
            leaf: leaf_p,
            branch_p,
        }
    }

    pub fn gen(&self, rng: &mut fastrand::Rng) -> Vec<GenRow> {
        let mut out = Vec::with_capacity(self.n_rows);
        let mut parents = std::collections::VecDeque::default();
        for id in 0..self.n_rows as u64 {
            let parent_id = if parents.is_empty() || rng.f64() < self.root_p {
                parents.clear();
                None
            } else {
                parents.pop_front()
            };
            out.push(GenRow { id, parent_id });

            if !parents.is_empty() && rng.f64() < self.leaf {
                continue;
            }
            parents.push_back(id);
            while rng.f64() < self.branch_p {
                parents.push_back(id);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format() {
        let adj: Adjacency<u64> = vec![(1, vec![2, 3]), (2, vec![4])].into_iter().collect();
        let mut s = String::new();
        adj.format_tree(&mut s).unwrap();
        let names: Vec<_> = s
            .lines()
            .map(|l| l.trim_start_matches(|c: char| !c.is_ascii_digit()))
            .collect();
        assert_eq!(names, vec!["1", "2", "4", "3"]);
    }

    #[test]
    fn format_cycle() {
        let adj: Adjacency<u64> = vec![(1, vec![2]), (2, vec![1])].into_iter().collect();
        let mut s = String::new();
        adj.format_tree(&mut s).unwrap();
        assert!(s.contains("1 (repeated)"));
    }

    #[test]
    fn generated_rows_are_parent_first() {
        let mut rng = fastrand::Rng::with_seed(1991);
        let rows = RowGen::new(500, 0.02, 0.3, 0.3).gen(&mut rng);
        assert_eq!(rows.len(), 500);
        let mut seen = FastSet::default();
        for r in rows.iter() {
            if let Some(p) = r.parent_id {
                assert!(seen.contains(&p));
            }
            seen.insert(r.id);
        }
    }
}
