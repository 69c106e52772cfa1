//! # In-Memory Data Store
//!
//! `DataStore` implementation holding the schema registry, the link
//! definitions, the component graph and the event log in memory.
//!
//! ## Event protocol
//!
//! - A begin event (no id, non-terminal status) must name a type and an
//!   action. It receives the next id of a counter starting at 1, so two
//!   operations never share an id.
//! - Events with an id are accepted while that id is open.
//! - Terminal statuses are only recorded by `close`, which the orchestrator
//!   calls once per operation.
//! - Events for ids that were never issued, or that already closed, are
//!   handled according to `TerminalPolicy`.
//!
//! Only running operations are tracked: an id is closed when it was issued
//! and is no longer open. Listeners are called after the event is recorded,
//! outside of any lock, so they may query the store.

use crate::{
    CollaboratorResult, CorrelationId, DataStore, DataStoreOptions, EventError, OperationContext,
    Outcome, PluginEvent, TerminalPolicy,
};
use plugkit_schema::{
    walk_components, Component, ComponentAttribute, ComponentVisitor, LinkDefinition,
    SchemaRegistry, SchemaResult,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// Callback notified of every accepted event
pub type EventListener = Arc<dyn Fn(&PluginEvent) + Send + Sync>;

/// Concrete link between two components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub definition: LinkDefinition,

    /// Id of the component declaring the link
    pub source: String,

    /// Id of the linked component
    pub target: String,
}

#[derive(Default)]
struct EventLog {
    last_id: u64,
    open: HashSet<CorrelationId>,
    history: VecDeque<PluginEvent>,
}

impl EventLog {
    fn allocate(&mut self) -> CorrelationId {
        self.last_id += 1;
        CorrelationId::new(self.last_id)
    }

    fn issued(&self, id: CorrelationId) -> bool {
        (1..=self.last_id).contains(&id.get())
    }

    fn is_closed(&self, id: CorrelationId) -> bool {
        self.issued(id) && !self.open.contains(&id)
    }

    /// Error for an event naming an id that is not open
    fn not_open(&self, id: CorrelationId) -> EventError {
        if self.issued(id) {
            EventError::AlreadyTerminated(id)
        } else {
            EventError::UnknownCorrelation(id)
        }
    }
}

pub struct MemoryDataStore {
    options: DataStoreOptions,
    events: Mutex<EventLog>,
    listeners: RwLock<Vec<EventListener>>,
    registry: RwLock<Option<Arc<SchemaRegistry>>>,
    link_definitions: RwLock<Vec<LinkDefinition>>,
    components: RwLock<Vec<Component>>,
}

impl MemoryDataStore {
    pub fn new(options: DataStoreOptions) -> Self {
        Self {
            options,
            events: Mutex::new(EventLog::default()),
            listeners: RwLock::new(Vec::new()),
            registry: RwLock::new(None),
            link_definitions: RwLock::new(Vec::new()),
            components: RwLock::new(Vec::new()),
        }
    }

    pub fn options(&self) -> &DataStoreOptions {
        &self.options
    }

    /// Register a callback for every accepted event
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&PluginEvent) + Send + Sync + 'static,
    {
        write(&self.listeners).push(Arc::new(listener));
    }

    /// Recorded events, oldest first
    pub fn history(&self) -> Vec<PluginEvent> {
        lock(&self.events).history.iter().cloned().collect()
    }

    /// Recorded events of one operation, oldest first
    pub fn events_for(&self, id: CorrelationId) -> Vec<PluginEvent> {
        lock(&self.events)
            .history
            .iter()
            .filter(|event| event.id == Some(id))
            .cloned()
            .collect()
    }

    /// Whether an operation started and has not been closed
    pub fn is_running(&self, id: CorrelationId) -> bool {
        lock(&self.events).open.contains(&id)
    }

    /// Whether an operation started and was closed, successfully or not
    pub fn is_closed(&self, id: CorrelationId) -> bool {
        lock(&self.events).is_closed(id)
    }

    fn reject(&self, error: EventError, event: &PluginEvent) -> Result<CorrelationId, EventError> {
        match self.options.terminal_policy {
            TerminalPolicy::Reject => Err(error),
            TerminalPolicy::Ignore => {
                warn!(error = %error, status = ?event.status, "Ignoring event");
                // Ignore only applies to events that carry an id
                event.id.ok_or(error)
            }
        }
    }

    fn record(&self, log: &mut EventLog, event: PluginEvent) {
        log.history.push_back(event);
        if let Some(limit) = self.options.history_limit {
            while log.history.len() > limit {
                log.history.pop_front();
            }
        }
    }

    fn notify(&self, event: &PluginEvent) {
        let listeners: Vec<EventListener> = read(&self.listeners).clone();
        for listener in listeners {
            listener(event);
        }
    }
}

impl Default for MemoryDataStore {
    fn default() -> Self {
        Self::new(DataStoreOptions::default())
    }
}

impl DataStore for MemoryDataStore {
    fn emit_event(&self, mut event: PluginEvent) -> Result<CorrelationId, EventError> {
        if event.status.is_terminal() {
            return self.reject(EventError::ReservedStatus(event.status), &event);
        }

        let id = {
            let mut log = lock(&self.events);

            let id = match event.id {
                None => {
                    if event.kind.is_none() {
                        return Err(EventError::MissingField("type"));
                    }
                    if event.action.is_none() {
                        return Err(EventError::MissingField("action"));
                    }
                    let id = log.allocate();
                    log.open.insert(id);
                    event.id = Some(id);
                    id
                }
                Some(id) if log.open.contains(&id) => id,
                Some(id) => {
                    let error = log.not_open(id);
                    drop(log);
                    return self.reject(error, &event);
                }
            };

            debug!(%id, status = ?event.status, kind = ?event.kind, "Event emitted");
            self.record(&mut log, event.clone());
            id
        };

        self.notify(&event);
        Ok(id)
    }

    fn close(&self, ctx: OperationContext, outcome: Outcome) -> Result<(), EventError> {
        let id = ctx.id();
        let event = {
            let mut log = lock(&self.events);

            if !log.open.remove(&id) {
                let error = log.not_open(id);
                drop(log);
                return self.reject(error, &PluginEvent::success(id)).map(|_| ());
            }

            match outcome {
                Outcome::Success => {
                    let event = PluginEvent::success(id);
                    self.record(&mut log, event.clone());
                    Some(event)
                }
                Outcome::Failure => None,
            }
        };

        debug!(%id, ?outcome, "Operation closed");
        if let Some(event) = event {
            self.notify(&event);
        }
        Ok(())
    }

    fn init_link_definitions(&self, ctx: &OperationContext) -> CollaboratorResult<()> {
        let definitions = match self.registry() {
            Some(registry) => registry.link_definitions(),
            None => {
                debug!(id = %ctx.id(), "No registry installed, no link definitions");
                Vec::new()
            }
        };

        debug!(id = %ctx.id(), links = definitions.len(), "Link definitions initialized");
        *write(&self.link_definitions) = definitions;
        Ok(())
    }

    fn set_registry(&self, registry: SchemaRegistry) {
        *write(&self.registry) = Some(Arc::new(registry));
    }

    fn registry(&self) -> Option<Arc<SchemaRegistry>> {
        read(&self.registry).clone()
    }

    fn link_definitions(&self) -> Vec<LinkDefinition> {
        read(&self.link_definitions).clone()
    }

    /// When validation is enabled and a registry is installed, an invalid
    /// graph is rejected and the stored graph is left unchanged.
    fn replace_components(&self, components: Vec<Component>) -> SchemaResult<()> {
        if self.options.validate_components {
            if let Some(registry) = self.registry() {
                registry.validate_components(&components)?;
            }
        }
        debug!(roots = components.len(), "Replacing component graph");
        *write(&self.components) = components;
        Ok(())
    }

    fn components(&self) -> Vec<Component> {
        read(&self.components).clone()
    }

    fn find_component(&self, id: &str) -> Option<Component> {
        read(&self.components)
            .iter()
            .find_map(|root| root.find(id))
            .cloned()
    }

    fn links(&self) -> Vec<Link> {
        resolve_links(&self.link_definitions(), &read(&self.components))
    }
}

/// Concrete links declared by the link attributes of `roots`
pub(crate) fn resolve_links(definitions: &[LinkDefinition], roots: &[Component]) -> Vec<Link> {
    if definitions.is_empty() {
        return Vec::new();
    }

    let mut collector = LinkCollector {
        definitions,
        links: Vec::new(),
    };
    walk_components(&mut collector, roots);
    collector.links
}

struct LinkCollector<'a> {
    definitions: &'a [LinkDefinition],
    links: Vec<Link>,
}

impl ComponentVisitor for LinkCollector<'_> {
    fn visit_attribute(&mut self, component: &Component, attribute: &ComponentAttribute) {
        let Some(definition) = self.definitions.iter().find(|def| {
            def.source_type == component.component_type && def.attribute_name == attribute.name()
        }) else {
            return;
        };

        for target in attribute.value().string_items() {
            self.links.push(Link {
                definition: definition.clone(),
                source: component.id.clone(),
                target: target.to_string(),
            });
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventAction, EventKind, EventStatus};
    use plugkit_schema::{AttributeKind, AttributeValue, ComponentAttributeDefinition, SchemaProps};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn begin(store: &MemoryDataStore) -> CorrelationId {
        store
            .emit_event(PluginEvent::begin(EventKind::Parser, EventAction::Read))
            .unwrap()
    }

    fn context(id: CorrelationId) -> OperationContext {
        OperationContext::new(id, EventKind::Parser, EventAction::Read)
    }

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_props([
            SchemaProps::new("server")
                .with_attribute(ComponentAttributeDefinition::link("depends_on", "database")),
            SchemaProps::new("database"),
        ])
        .unwrap()
    }

    #[test]
    fn test_begin_allocates_distinct_ids() {
        let store = MemoryDataStore::default();
        let first = begin(&store);
        let second = begin(&store);

        assert_eq!(first, CorrelationId::new(1));
        assert_ne!(first, second);
        assert!(store.is_running(first));
        assert!(store.is_running(second));
        assert_eq!(store.history()[0].id, Some(first));
    }

    #[test]
    fn test_close_records_success() {
        let store = MemoryDataStore::default();
        let id = begin(&store);

        store.emit_event(PluginEvent::status(id, EventStatus::Warning)).unwrap();
        assert!(store.is_running(id));

        store.close(context(id), Outcome::Success).unwrap();
        assert!(!store.is_running(id));
        assert!(store.is_closed(id));

        let statuses: Vec<_> = store.events_for(id).iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            [EventStatus::Running, EventStatus::Warning, EventStatus::Success]
        );
    }

    #[test]
    fn test_failed_close_emits_nothing() {
        let store = MemoryDataStore::default();
        let id = begin(&store);

        store.close(context(id), Outcome::Failure).unwrap();

        assert!(store.is_closed(id));
        assert_eq!(store.events_for(id).len(), 1);
        assert_eq!(
            store.emit_event(PluginEvent::status(id, EventStatus::Warning)),
            Err(EventError::AlreadyTerminated(id))
        );
    }

    #[test]
    fn test_terminal_status_reserved() {
        let store = MemoryDataStore::default();
        let id = begin(&store);

        assert_eq!(
            store.emit_event(PluginEvent::error(id)),
            Err(EventError::ReservedStatus(EventStatus::Error))
        );
        assert_eq!(
            store.emit_event(PluginEvent::success(id)),
            Err(EventError::ReservedStatus(EventStatus::Success))
        );
        assert!(store.is_running(id));
        assert_eq!(store.events_for(id).len(), 1);
    }

    #[test]
    fn test_second_close_rejected() {
        let store = MemoryDataStore::default();
        let id = begin(&store);
        store.close(context(id), Outcome::Success).unwrap();

        assert_eq!(
            store.close(context(id), Outcome::Success),
            Err(EventError::AlreadyTerminated(id))
        );
        assert_eq!(
            store.emit_event(PluginEvent::status(id, EventStatus::Running)),
            Err(EventError::AlreadyTerminated(id))
        );
        assert_eq!(store.events_for(id).len(), 2);
    }

    #[test]
    fn test_unknown_id_rejected() {
        let store = MemoryDataStore::default();
        let stray = CorrelationId::new(99);

        assert_eq!(
            store.emit_event(PluginEvent::status(stray, EventStatus::Warning)),
            Err(EventError::UnknownCorrelation(stray))
        );
        assert_eq!(
            store.close(context(stray), Outcome::Success),
            Err(EventError::UnknownCorrelation(stray))
        );
        assert!(!store.is_closed(stray));
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_ignore_policy_drops_events() {
        let store = MemoryDataStore::new(DataStoreOptions::lenient());
        let stray = CorrelationId::new(99);

        assert_eq!(
            store.emit_event(PluginEvent::status(stray, EventStatus::Warning)),
            Ok(stray)
        );
        assert!(store.history().is_empty());

        let id = begin(&store);
        assert_eq!(store.emit_event(PluginEvent::error(id)), Ok(id));
        assert!(store.is_running(id));

        store.close(context(id), Outcome::Success).unwrap();
        assert_eq!(store.close(context(id), Outcome::Success), Ok(()));
        assert_eq!(store.events_for(id).len(), 2);
    }

    #[test]
    fn test_begin_requires_type_and_action() {
        let store = MemoryDataStore::default();
        let mut event = PluginEvent::begin(EventKind::Plugin, EventAction::Init);
        event.kind = None;
        assert_eq!(store.emit_event(event), Err(EventError::MissingField("type")));

        let mut event = PluginEvent::begin(EventKind::Plugin, EventAction::Init);
        event.action = None;
        assert_eq!(store.emit_event(event), Err(EventError::MissingField("action")));
    }

    #[test]
    fn test_history_limit() {
        let store = MemoryDataStore::new(DataStoreOptions {
            history_limit: Some(2),
            ..Default::default()
        });
        for _ in 0..5 {
            begin(&store);
        }

        let history = store.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].id, Some(CorrelationId::new(5)));
    }

    #[test]
    fn test_bookkeeping_bounded_by_running_operations() {
        let store = MemoryDataStore::new(DataStoreOptions {
            history_limit: Some(4),
            ..Default::default()
        });

        for round in 0..10_000 {
            let id = begin(&store);
            let outcome = if round % 3 == 0 {
                Outcome::Failure
            } else {
                Outcome::Success
            };
            store.close(context(id), outcome).unwrap();
        }

        {
            let log = lock(&store.events);
            assert_eq!(log.history.len(), 4);
            assert!(log.open.is_empty());
        }
        assert!(store.is_closed(CorrelationId::new(1)));
        assert!(store.is_closed(CorrelationId::new(10_000)));
        assert!(!store.is_closed(CorrelationId::new(10_001)));
    }

    #[test]
    fn test_listeners_see_accepted_events() {
        let store = Arc::new(MemoryDataStore::default());
        let seen = Arc::new(AtomicUsize::new(0));

        let counter = seen.clone();
        let inner = store.clone();
        store.subscribe(move |event| {
            // Listeners run outside the store's locks
            assert!(inner.history().contains(event));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let id = begin(&store);
        store.close(context(id), Outcome::Success).unwrap();
        let _ = store.emit_event(PluginEvent::status(id, EventStatus::Warning));

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_link_definitions_and_links() {
        let store = MemoryDataStore::default();
        store.set_registry(registry());

        let ctx = OperationContext::new(begin(&store), EventKind::Plugin, EventAction::Init);
        store.init_link_definitions(&ctx).unwrap();
        assert_eq!(store.link_definitions().len(), 1);

        store
            .replace_components(vec![
                Component::new("web", "server").with_attribute(ComponentAttribute::new(
                    "depends_on",
                    vec![AttributeValue::from("db"), AttributeValue::from("replica")],
                    AttributeKind::Link,
                )),
                Component::new("db", "database"),
                Component::new("replica", "database"),
            ])
            .unwrap();

        let links = store.links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].source, "web");
        assert_eq!(links[0].target, "db");
        assert_eq!(links[1].target, "replica");
    }

    #[test]
    fn test_link_definitions_without_registry() {
        let store = MemoryDataStore::default();
        let ctx = OperationContext::new(begin(&store), EventKind::Plugin, EventAction::Init);

        store.init_link_definitions(&ctx).unwrap();
        assert!(store.link_definitions().is_empty());
        assert!(store.links().is_empty());
    }

    #[test]
    fn test_invalid_graph_rejected() {
        let store = MemoryDataStore::default();
        store.set_registry(registry());
        store
            .replace_components(vec![Component::new("db", "database")])
            .unwrap();

        let result = store.replace_components(vec![
            Component::new("db", "database").with_child(Component::new("web", "server")),
        ]);
        assert!(result.is_err());
        assert_eq!(store.components(), vec![Component::new("db", "database")]);

        let lenient = MemoryDataStore::new(DataStoreOptions::lenient());
        lenient.set_registry(registry());
        assert!(lenient
            .replace_components(vec![Component::new("x", "unknown")])
            .is_ok());
    }

    #[test]
    fn test_find_component() {
        let store = MemoryDataStore::default();
        store
            .replace_components(vec![
                Component::new("lan", "network").with_child(Component::new("web", "server")),
            ])
            .unwrap();

        assert_eq!(store.find_component("web").map(|c| c.component_type), Some("server".into()));
        assert!(store.find_component("nope").is_none());
    }
}
