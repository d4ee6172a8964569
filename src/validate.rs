use crate::adjacency::Adjacency;
use crate::error::IntegrityError;
use crate::util::FastSet;
use crate::NodeId;

/// Walk the descendants of every adjacency key, looking for structural corruption.
///
/// A node which reappears among its own ancestors is a cycle;
/// one reached twice by different paths under the same key has more than one parent.
/// Costs O(n * depth) in the worst case, which is why materialization does not run it by default.
pub fn check<N: NodeId>(adjacency: &Adjacency<N>) -> Result<(), IntegrityError<N>> {
    for key in adjacency.keys() {
        check_from(adjacency, key)?;
    }
    Ok(())
}

fn check_from<N: NodeId>(adjacency: &Adjacency<N>, root: &N) -> Result<(), IntegrityError<N>> {
    let mut seen: FastSet<&N> = FastSet::default();
    let mut path: Vec<&N> = Vec::default();
    let mut on_path: FastSet<&N> = FastSet::default();
    // (node, parent, depth)
    let mut to_visit: Vec<(&N, Option<&N>, usize)> = vec![(root, None, 0)];

    while let Some((id, parent, depth)) = to_visit.pop() {
        for gone in path.drain(depth..) {
            on_path.remove(gone);
        }
        if on_path.contains(id) {
            return Err(IntegrityError::Cycle {
                path: path.iter().map(|n| (*n).clone()).collect(),
                id: id.clone(),
            });
        }
        if !seen.insert(id) {
            return Err(IntegrityError::MultipleParents {
                id: id.clone(),
                parent: parent.unwrap_or(root).clone(),
            });
        }
        path.push(id);
        on_path.insert(id);

        if let Some(children) = adjacency.children(id) {
            to_visit.extend(children.iter().rev().map(|c| (c, Some(id), depth + 1)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adj(pairs: Vec<(u64, Vec<u64>)>) -> Adjacency<u64> {
        pairs.into_iter().collect()
    }

    #[test]
    fn tree_is_fine() {
        let a = adj(vec![(1, vec![2, 3]), (2, vec![4]), (5, vec![])]);
        assert_eq!(check(&a), Ok(()));
    }

    #[test]
    fn two_cycle() {
        let a = adj(vec![(2, vec![1]), (1, vec![2])]);
        assert_eq!(
            check(&a),
            Err(IntegrityError::Cycle {
                path: vec![2, 1],
                id: 2
            })
        );
    }

    #[test]
    fn long_cycle() {
        let a = adj(vec![(1, vec![2]), (2, vec![3]), (3, vec![4, 1])]);
        assert_eq!(
            check(&a),
            Err(IntegrityError::Cycle {
                path: vec![1, 2, 3],
                id: 1
            })
        );
    }

    #[test]
    fn diamond() {
        // 4 under both 2 and 3
        let a = adj(vec![(1, vec![2, 3]), (2, vec![4]), (3, vec![4])]);
        assert_eq!(
            check(&a),
            Err(IntegrityError::MultipleParents { id: 4, parent: 3 })
        );
    }

    #[test]
    fn separate_keys_walked_separately() {
        // 3 is reachable from 1 (via 2) and from key 2 on its own; not ambiguous
        let a = adj(vec![(1, vec![2]), (2, vec![3])]);
        assert_eq!(check(&a), Ok(()));
    }
}
