use std::marker::PhantomData;

/// Turns rows into result nodes and attaches their children.
///
/// [map_row](ResultMapper::map_row) runs top-down: a node is mapped before its children,
/// and each child sees its already-mapped parent, so ancestor data can be pushed towards the leaves.
/// [on_children](ResultMapper::on_children) runs bottom-up: it is called exactly once per node,
/// after all of the node's children have been built, so the children can be stored on the node
/// and aggregated (counts, sums etc.).
pub trait ResultMapper<T> {
    type Output;

    /// Map a row at the given depth (roots are at depth 0).
    fn map_row(&mut self, row: &T, depth: usize, parent: Option<&Self::Output>) -> Self::Output;

    /// Receive the node's finished children.
    ///
    /// `None` if the row has no children at all;
    /// `Some` (possibly empty, if every child row was missing) otherwise.
    fn on_children(&mut self, node: &mut Self::Output, children: Option<Vec<Self::Output>>);
}

/// A [ResultMapper] made of two closures.
pub struct FnMapper<R, F, G> {
    map: F,
    attach: G,
    _output: PhantomData<fn() -> R>,
}

impl<R, F, G> FnMapper<R, F, G> {
    pub fn new<T>(map: F, attach: G) -> Self
    where
        F: FnMut(&T, usize, Option<&R>) -> R,
        G: FnMut(&mut R, Option<Vec<R>>),
    {
        Self {
            map,
            attach,
            _output: PhantomData,
        }
    }
}

impl<T, R, F, G> ResultMapper<T> for FnMapper<R, F, G>
where
    F: FnMut(&T, usize, Option<&R>) -> R,
    G: FnMut(&mut R, Option<Vec<R>>),
{
    type Output = R;

    fn map_row(&mut self, row: &T, depth: usize, parent: Option<&R>) -> R {
        (self.map)(row, depth, parent)
    }

    fn on_children(&mut self, node: &mut R, children: Option<Vec<R>>) {
        (self.attach)(node, children)
    }
}
