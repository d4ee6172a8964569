//! Build forests of caller-defined nodes from flat, self-referencing row sets.
//!
//! Rows only need an ID and a parent ID, as in a database table with a `parent_id` column.
//! Conversion runs in three phases:
//!
//! 1. an [Index] from ID to row, rejecting duplicate IDs;
//! 2. an [Adjacency] from parent ID to child IDs, classifying each row as root or child;
//! 3. a depth-first walk from every root, calling the caller's [ResultMapper]
//!    on the way down (with the depth and the mapped parent) and on the way up (with the mapped children).
//!
//! Rows whose parent cannot be found become roots.
//! Other recoverable problems (null rows, missing IDs, self-parenting rows, dangling child references)
//! are logged with [tracing] and recorded as [Diagnostic]s.
use std::fmt::Debug;
use std::hash::Hash;

pub mod adjacency;
pub mod error;
pub mod index;
pub mod mapper;
pub mod materialize;
pub mod row;
pub mod table;
pub mod util;
pub mod validate;

#[cfg(feature = "debug")]
pub mod debug;

#[cfg(feature = "serde")]
mod serialize;

pub use adjacency::Adjacency;
pub use error::{BuildError, Diagnostic, DuplicateKey, IntegrityError};
pub use index::Index;
pub use mapper::{FnMapper, ResultMapper};
pub use materialize::Traversal;
pub use row::Record;
pub use table::{build_forest, Options, TreeTable};

pub trait NodeId: Debug + Clone + Hash + Eq {}

impl<T: Debug + Clone + Hash + Eq> NodeId for T {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::row::Keys;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Row {
        pub id: Option<u64>,
        pub pid: Option<u64>,
        pub name: &'static str,
    }

    impl Record<u64> for Row {
        fn id(&self) -> Option<u64> {
            self.id
        }

        fn parent_id(&self) -> Option<u64> {
            self.pid
        }
    }

    pub fn row(id: u64, pid: Option<u64>) -> Row {
        Row {
            id: Some(id),
            pid,
            name: "",
        }
    }

    pub fn rows(pairs: &[(u64, Option<u64>)]) -> Vec<Option<Row>> {
        pairs.iter().map(|(id, pid)| Some(row(*id, *pid))).collect()
    }

    pub fn keys() -> Keys<'static, Row, u64> {
        Keys::from_record()
    }

    /// A result node which records what the mapper saw.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Node {
        pub id: u64,
        pub depth: usize,
        /// IDs from the root down to this node.
        pub path: Vec<u64>,
        pub children: Option<Vec<Node>>,
        /// Number of nodes below this one.
        pub descendants: usize,
    }

    impl Node {
        pub fn child_ids(&self) -> Vec<u64> {
            self.children
                .iter()
                .flatten()
                .map(|c| c.id)
                .collect()
        }
    }

    /// Maps [Row]s to [Node]s, logging every call.
    #[derive(Debug, Default)]
    pub struct NodeMapper {
        pub calls: Vec<String>,
    }

    impl ResultMapper<Row> for NodeMapper {
        type Output = Node;

        fn map_row(&mut self, row: &Row, depth: usize, parent: Option<&Node>) -> Node {
            let id = row.id.unwrap();
            self.calls.push(format!("map {id}"));
            let mut path = parent.map(|p| p.path.clone()).unwrap_or_default();
            path.push(id);
            Node {
                id,
                depth,
                path,
                children: None,
                descendants: 0,
            }
        }

        fn on_children(&mut self, node: &mut Node, children: Option<Vec<Node>>) {
            self.calls.push(format!(
                "children {} {:?}",
                node.id,
                children.as_ref().map(|c| c.len())
            ));
            node.descendants = children
                .iter()
                .flatten()
                .map(|c| c.descendants + 1)
                .sum();
            node.children = children;
        }
    }

    /// Show diagnostics with `RUST_LOG=rowtree=debug cargo test -- --nocapture`.
    pub fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    pub fn make_table(pairs: &[(u64, Option<u64>)]) -> TreeTable<'static, Row, u64, NodeMapper> {
        init_logging();
        TreeTable::new(
            rows(pairs),
            |r: &Row| r.id,
            |r: &Row| r.pid,
            NodeMapper::default(),
        )
    }

    /// ```text
    /// 1─2─4
    ///   └3
    /// ```
    pub fn make_basic() -> TreeTable<'static, Row, u64, NodeMapper> {
        make_table(&[(1, None), (2, Some(1)), (3, Some(1)), (4, Some(2))])
    }
}
