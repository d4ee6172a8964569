use crate::NodeId;

/// A row type which knows its own ID and its parent's ID.
///
/// Implementing this lets [TreeTable::from_records](crate::TreeTable::from_records)
/// skip the accessor closures.
pub trait Record<N: NodeId> {
    fn id(&self) -> Option<N>;

    fn parent_id(&self) -> Option<N>;
}

impl<N: NodeId> Record<N> for (Option<N>, Option<N>) {
    fn id(&self) -> Option<N> {
        self.0.clone()
    }

    fn parent_id(&self) -> Option<N> {
        self.1.clone()
    }
}

type KeyFn<'a, T, N> = Box<dyn Fn(&T) -> Option<N> + 'a>;
type RootFn<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;

/// The caller's accessors for a row's ID, parent ID and (optionally) root status.
pub(crate) struct Keys<'a, T, N> {
    id: KeyFn<'a, T, N>,
    parent_id: KeyFn<'a, T, N>,
    is_root: Option<RootFn<'a, T>>,
}

impl<'a, T, N: NodeId> Keys<'a, T, N> {
    pub(crate) fn new<F, G>(id: F, parent_id: G) -> Self
    where
        F: Fn(&T) -> Option<N> + 'a,
        G: Fn(&T) -> Option<N> + 'a,
    {
        Self {
            id: Box::new(id),
            parent_id: Box::new(parent_id),
            is_root: None,
        }
    }

    pub(crate) fn set_root_predicate<P: Fn(&T) -> bool + 'a>(&mut self, predicate: P) {
        self.is_root = Some(Box::new(predicate));
    }

    pub(crate) fn id(&self, row: &T) -> Option<N> {
        (self.id)(row)
    }

    pub(crate) fn parent_id(&self, row: &T) -> Option<N> {
        (self.parent_id)(row)
    }

    /// The caller's verdict on whether this row is a root, if a predicate was given.
    pub(crate) fn root_override(&self, row: &T) -> Option<bool> {
        self.is_root.as_ref().map(|p| p(row))
    }
}

impl<'a, T: Record<N> + 'a, N: NodeId + 'a> Keys<'a, T, N> {
    pub(crate) fn from_record() -> Self {
        Self::new(<T as Record<N>>::id, <T as Record<N>>::parent_id)
    }
}
