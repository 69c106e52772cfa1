use crate::{CorrelationId, EventAction, EventKind};

/// Context of one running operation, handed to every collaborator call made
/// on its behalf.
///
/// Only the orchestrator creates contexts, and it hands collaborators a
/// borrow. The context is not `Clone` and is consumed by
/// `DataStore::close`, so the operation ends exactly once, after its last
/// delegated call.
#[derive(Debug, PartialEq, Eq)]
pub struct OperationContext {
    id: CorrelationId,
    kind: EventKind,
    action: EventAction,
}

impl OperationContext {
    pub(crate) fn new(id: CorrelationId, kind: EventKind, action: EventAction) -> Self {
        Self { id, kind, action }
    }

    pub fn id(&self) -> CorrelationId {
        self.id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn action(&self) -> EventAction {
        self.action
    }
}
