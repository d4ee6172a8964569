use std::fmt::Debug;

use crate::adjacency::Adjacency;
use crate::error::{BuildError, Diagnostic, DuplicateKey};
use crate::index::Index;
use crate::mapper::ResultMapper;
use crate::materialize::{Materializer, Traversal};
use crate::row::{Keys, Record};
use crate::util::FastSet;
use crate::validate;
use crate::NodeId;

/// Settings for building a forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    pub traversal: Traversal,
    /// Fail with [BuildError::DepthExceeded] rather than descend below this depth.
    pub max_depth: Option<usize>,
    /// Run the integrity check before building results.
    pub validate: bool,
}

/// Phase 1 and 2 results, built together.
#[derive(Debug, Clone)]
struct Analysis<N: NodeId> {
    index: Index<N>,
    adjacency: Adjacency<N>,
    /// Diagnostics raised by these phases; later ones belong to a forest build.
    n_diagnostics: usize,
}

impl<N: NodeId> Analysis<N> {
    fn run<T>(
        rows: &[Option<T>],
        keys: &Keys<'_, T, N>,
        diagnostics: &mut Vec<Diagnostic<N>>,
    ) -> Result<Self, DuplicateKey<N>> {
        diagnostics.clear();
        let index = Index::build(rows, keys, diagnostics)?;
        let adjacency = Adjacency::analyze(rows, &index, keys, diagnostics);
        Ok(Self {
            index,
            adjacency,
            n_diagnostics: diagnostics.len(),
        })
    }
}

/// Converts a flat set of rows, each carrying an ID and a parent ID, into a forest of results.
///
/// Every phase runs at most once per instance: the index, the adjacency and the forest
/// are cached, and later calls return the cached value.
/// Build a new instance to convert different rows.
///
/// ```
/// use rowtree::{FnMapper, TreeTable};
///
/// #[derive(Debug)]
/// struct Dept {
///     name: &'static str,
///     children: Vec<Dept>,
/// }
///
/// let rows = vec![(1, None, "head office"), (2, Some(1), "sales"), (3, Some(1), "support")];
/// let mapper = FnMapper::new(
///     |row: &(u32, Option<u32>, &'static str), _depth: usize, _parent: Option<&Dept>| Dept {
///         name: row.2,
///         children: Vec::new(),
///     },
///     |dept: &mut Dept, children: Option<Vec<Dept>>| dept.children = children.unwrap_or_default(),
/// );
/// let mut table = TreeTable::from_rows(rows, |r| Some(r.0), |r| r.1, mapper);
/// let forest = table.forest().unwrap();
/// assert_eq!(forest.len(), 1);
/// assert_eq!(forest[0].children[1].name, "support");
/// ```
pub struct TreeTable<'a, T, N: NodeId, M: ResultMapper<T>> {
    rows: Vec<Option<T>>,
    keys: Keys<'a, T, N>,
    mapper: M,
    options: Options,
    analysis: Option<Analysis<N>>,
    forest: Option<Vec<M::Output>>,
    visited: FastSet<N>,
    diagnostics: Vec<Diagnostic<N>>,
}

impl<'a, T, N: NodeId, M: ResultMapper<T>> TreeTable<'a, T, N, M> {
    /// Rows may contain `None`, which is skipped with a [Diagnostic::NullRow].
    pub fn new<F, G>(rows: Vec<Option<T>>, get_id: F, get_parent_id: G, mapper: M) -> Self
    where
        F: Fn(&T) -> Option<N> + 'a,
        G: Fn(&T) -> Option<N> + 'a,
    {
        Self::with_keys(rows, Keys::new(get_id, get_parent_id), mapper)
    }

    pub fn from_rows<I, F, G>(rows: I, get_id: F, get_parent_id: G, mapper: M) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Option<N> + 'a,
        G: Fn(&T) -> Option<N> + 'a,
    {
        Self::new(
            rows.into_iter().map(Some).collect(),
            get_id,
            get_parent_id,
            mapper,
        )
    }

    fn with_keys(rows: Vec<Option<T>>, keys: Keys<'a, T, N>, mapper: M) -> Self {
        Self {
            rows,
            keys,
            mapper,
            options: Options::default(),
            analysis: None,
            forest: None,
            visited: FastSet::default(),
            diagnostics: Vec::default(),
        }
    }

    /// Decide which rows are roots with this predicate instead of by parent lookup.
    pub fn with_root_predicate<P: Fn(&T) -> bool + 'a>(mut self, predicate: P) -> Self {
        self.keys.set_root_predicate(predicate);
        self.invalidate();
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self.forest = None;
        self
    }

    pub fn traversal(mut self, traversal: Traversal) -> Self {
        self.options.traversal = traversal;
        self.forest = None;
        self
    }

    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.options.max_depth = max_depth;
        self.forest = None;
        self
    }

    /// Run [TreeTable::validate] automatically before building results.
    pub fn validate_first(mut self, validate: bool) -> Self {
        self.options.validate = validate;
        self.forest = None;
        self
    }

    fn invalidate(&mut self) {
        self.analysis = None;
        self.forest = None;
    }

    fn analysis(&mut self) -> Result<&Analysis<N>, DuplicateKey<N>> {
        let analysis = match self.analysis.take() {
            Some(a) => a,
            None => Analysis::run(&self.rows, &self.keys, &mut self.diagnostics)?,
        };
        Ok(&*self.analysis.insert(analysis))
    }

    /// The ID -> row position lookup.
    pub fn index(&mut self) -> Result<&Index<N>, BuildError<N>> {
        Ok(&self.analysis()?.index)
    }

    /// The parent ID -> child IDs map which the forest is built from.
    pub fn adjacency(&mut self) -> Result<&Adjacency<N>, BuildError<N>> {
        Ok(&self.analysis()?.adjacency)
    }

    /// Check the adjacency for cycles and nodes with more than one parent.
    pub fn validate(&mut self) -> Result<(), BuildError<N>> {
        validate::check(&self.analysis()?.adjacency)?;
        Ok(())
    }

    /// Build (or return the cached) forest of results, one per top-level tree.
    pub fn forest(&mut self) -> Result<&[M::Output], BuildError<N>> {
        let forest = match self.forest.take() {
            Some(f) => f,
            None => self.materialize()?,
        };
        Ok(self.forest.insert(forest).as_slice())
    }

    /// Build the forest and take ownership of it.
    pub fn into_forest(mut self) -> Result<Vec<M::Output>, BuildError<N>> {
        match self.forest.take() {
            Some(f) => Ok(f),
            None => self.materialize(),
        }
    }

    fn materialize(&mut self) -> Result<Vec<M::Output>, BuildError<N>> {
        if self.options.validate {
            self.validate()?;
        }
        let analysis = match self.analysis.take() {
            Some(a) => a,
            None => Analysis::run(&self.rows, &self.keys, &mut self.diagnostics)?,
        };

        self.visited.clear();
        self.diagnostics.truncate(analysis.n_diagnostics);
        let out = Materializer {
            rows: &self.rows,
            index: &analysis.index,
            adjacency: &analysis.adjacency,
            mapper: &mut self.mapper,
            visited: &mut self.visited,
            diagnostics: &mut self.diagnostics,
            max_depth: self.options.max_depth,
        }
        .run(self.options.traversal);

        if out.is_err() {
            self.visited.clear();
            self.diagnostics.truncate(analysis.n_diagnostics);
        }
        self.analysis = Some(analysis);
        out
    }

    /// Recoverable problems seen so far, in the order they were found.
    pub fn diagnostics(&self) -> &[Diagnostic<N>] {
        &self.diagnostics
    }

    pub fn rows(&self) -> &[Option<T>] {
        &self.rows
    }

    /// IDs consumed by the last forest build.
    pub fn visited(&self) -> &FastSet<N> {
        &self.visited
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }
}

impl<'a, T: Record<N> + 'a, N: NodeId + 'a, M: ResultMapper<T>> TreeTable<'a, T, N, M> {
    /// For rows which carry their own keys.
    pub fn from_records<I: IntoIterator<Item = T>>(rows: I, mapper: M) -> Self {
        Self::with_keys(
            rows.into_iter().map(Some).collect(),
            Keys::from_record(),
            mapper,
        )
    }
}

impl<'a, T: Debug, N: NodeId, M: ResultMapper<T>> Debug for TreeTable<'a, T, N, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeTable")
            .field("rows", &self.rows)
            .field("options", &self.options)
            .field("built", &self.forest.is_some())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

/// Build a forest in one go.
pub fn build_forest<T, N, M, F, G>(
    rows: Vec<T>,
    get_id: F,
    get_parent_id: G,
    mapper: M,
) -> Result<Vec<M::Output>, BuildError<N>>
where
    N: NodeId,
    M: ResultMapper<T>,
    F: Fn(&T) -> Option<N>,
    G: Fn(&T) -> Option<N>,
{
    TreeTable::from_rows(rows, get_id, get_parent_id, mapper).into_forest()
}
