use tracing::{debug, warn};

use crate::error::Diagnostic;
use crate::NodeId;

pub use ahash::{AHashMap as FastMap, AHashSet as FastSet};

/// Log a recoverable problem and keep it for the caller.
pub(crate) fn report<N: NodeId>(sink: &mut Vec<Diagnostic<N>>, diagnostic: Diagnostic<N>) {
    match &diagnostic {
        Diagnostic::MissingRow { .. } => debug!("{diagnostic}"),
        _ => warn!("{diagnostic}"),
    }
    sink.push(diagnostic);
}
