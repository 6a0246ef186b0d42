//! The reactive widget store: single source of truth for the active
//! dashboard's widget list.
//!
//! Views never mutate shared objects — they read the snapshot the store
//! publishes after each mutation. Every mutating operation runs to
//! completion (`&mut self` enforces the single-writer contract), computes
//! the new dashboard value immutably, publishes it synchronously to all
//! subscribers, syncs it into the collection, and persists the whole
//! collection. Exactly one storage write and one notification per mutation;
//! subscribers must tolerate high-frequency delivery.

use crate::id::{DashboardId, WidgetId};
use crate::model::{
    Dashboard, DashboardCollection, DataBinding, Position, Size, ViewConfig, Widget,
    WidgetTemplate,
};
use crate::storage::DurableStorage;
use chrono::Utc;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

/// The fixed key the collection is persisted under.
pub const STORAGE_KEY: &str = "dashboards";

/// A snapshot callback. Receives the freshly published active dashboard.
pub type StoreSubscriber = Rc<dyn Fn(&Dashboard)>;

type SubscriberList = Rc<RefCell<SmallVec<[StoreSubscriber; 2]>>>;

/// Keeps a subscriber registered; dropping it unsubscribes.
pub struct StoreSubscription {
    subscriber: StoreSubscriber,
    subscribers: SubscriberList,
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        self.subscribers
            .borrow_mut()
            .retain(|s| !Rc::ptr_eq(s, &self.subscriber));
    }
}

/// Partial widget update. `None` fields are left untouched; a patch cannot
/// clear a binding or view config back to absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetPatch {
    pub title: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub data_binding: Option<DataBinding>,
    pub view_config: Option<ViewConfig>,
}

impl WidgetPatch {
    /// A patch carrying only a new size — the resize commit shape.
    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// A patch carrying only a new title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    fn apply_to(self, widget: &mut Widget) {
        if let Some(title) = self.title {
            widget.title = title;
        }
        if let Some(position) = self.position {
            widget.position = position;
        }
        if let Some(size) = self.size {
            widget.size = size.floored();
        }
        if let Some(binding) = self.data_binding {
            widget.data_binding = Some(binding);
        }
        if let Some(config) = self.view_config {
            widget.view_config = Some(config);
        }
    }
}

/// The widget store. Constructed once at application start — usually through
/// `DashboardRegistry::load` — and injected wherever mutations originate.
pub struct WidgetStore {
    collection: DashboardCollection,
    active: Option<DashboardId>,
    subscribers: SubscriberList,
    storage: Box<dyn DurableStorage>,
}

impl WidgetStore {
    pub fn new(
        storage: Box<dyn DurableStorage>,
        collection: DashboardCollection,
        active: Option<DashboardId>,
    ) -> Self {
        Self {
            collection,
            active,
            subscribers: Rc::new(RefCell::new(SmallVec::new())),
            storage,
        }
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    /// The active dashboard, if any.
    pub fn active(&self) -> Option<&Dashboard> {
        self.active.and_then(|id| self.collection.get(id))
    }

    pub fn active_id(&self) -> Option<DashboardId> {
        self.active
    }

    pub fn collection(&self) -> &DashboardCollection {
        &self.collection
    }

    /// Register a snapshot callback. Delivery is synchronous, in the same
    /// logical step as the mutation. Dropping the returned subscription
    /// unsubscribes.
    pub fn subscribe(&self, subscriber: impl Fn(&Dashboard) + 'static) -> StoreSubscription {
        let subscriber: StoreSubscriber = Rc::new(subscriber);
        self.subscribers.borrow_mut().push(subscriber.clone());
        StoreSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Make the given dashboard active and publish it. Unknown ids are a
    /// no-op — existence is the only validation.
    pub fn select_dashboard(&mut self, id: DashboardId) {
        let Some(dashboard) = self.collection.get(id) else {
            log::debug!("select_dashboard: unknown dashboard {id}");
            return;
        };
        let mut next = dashboard.clone();
        next.updated_at = Utc::now();
        self.active = Some(id);
        self.commit(next);
    }

    /// Construct a widget from the template and append it to the active
    /// dashboard (append = highest display priority). Silent no-op without
    /// an active dashboard.
    pub fn add_widget(&mut self, template: &WidgetTemplate) {
        let Some(current) = self.active() else {
            log::debug!("add_widget: no active dashboard, ignoring {}", template.id);
            return;
        };

        // Fresh ids come from a process-wide counter; guard against ids
        // already present in a persisted dashboard from an earlier run.
        let mut id = WidgetId::generate();
        while current.contains_widget(id) {
            id = WidgetId::generate();
        }

        let mut next = current.clone();
        next.widgets.push(Widget::from_template(id, template));
        next.updated_at = Utc::now();
        self.commit(next);
    }

    /// Merge the patch into the widget with the matching id. An unknown id
    /// is a silent no-op: an edit racing a deletion must not throw.
    pub fn update_widget(&mut self, id: WidgetId, patch: WidgetPatch) {
        let Some(current) = self.active() else {
            return;
        };
        if !current.contains_widget(id) {
            log::debug!("update_widget: unknown widget {id}");
            return;
        }

        let mut next = current.clone();
        if let Some(widget) = next.widgets.iter_mut().find(|w| w.id == id) {
            patch.apply_to(widget);
        }
        next.updated_at = Utc::now();
        self.commit(next);
    }

    /// Remove the widget with the matching id. Unknown ids are a no-op, so
    /// removing twice equals removing once.
    pub fn remove_widget(&mut self, id: WidgetId) {
        let Some(current) = self.active() else {
            return;
        };
        if !current.contains_widget(id) {
            log::debug!("remove_widget: unknown widget {id}");
            return;
        }

        let mut next = current.clone();
        next.widgets.retain(|w| w.id != id);
        next.updated_at = Utc::now();
        self.commit(next);
    }

    // ─── Publish / persist ───────────────────────────────────────────────

    /// Publish the new active-dashboard value, sync it into the collection,
    /// and persist. Publication never waits on storage.
    fn commit(&mut self, dashboard: Dashboard) {
        self.notify(&dashboard);
        self.collection.sync(dashboard);
        self.persist();
    }

    fn notify(&self, dashboard: &Dashboard) {
        let subscribers: SmallVec<[StoreSubscriber; 2]> =
            self.subscribers.borrow().iter().cloned().collect();
        for subscriber in subscribers {
            subscriber(dashboard);
        }
    }

    /// Serialize the whole collection and overwrite the stored document.
    /// Storage failure is logged and swallowed — the in-memory snapshot has
    /// already been published.
    pub(crate) fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.collection) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("persist skipped, collection failed to serialize: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.write(STORAGE_KEY, &payload) {
            log::warn!("persist failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builtin_templates;
    use crate::storage::MemoryStorage;
    use std::cell::Cell;

    fn store_with_dashboard() -> WidgetStore {
        let id = DashboardId::generate();
        let collection = DashboardCollection {
            dashboards: vec![Dashboard::new(id, "Test board")],
        };
        WidgetStore::new(Box::new(MemoryStorage::new()), collection, Some(id))
    }

    #[test]
    fn add_widget_appends_with_defaults() {
        let mut store = store_with_dashboard();
        let templates = builtin_templates();

        store.add_widget(&templates[0]);
        let active = store.active().unwrap();
        assert_eq!(active.widgets.len(), 1);
        assert_eq!(active.widgets[0].size, Size::DEFAULT);
        assert_eq!(active.widgets[0].position, Position::default());
    }

    #[test]
    fn add_widget_without_active_dashboard_is_noop() {
        let mut store = WidgetStore::new(
            Box::new(MemoryStorage::new()),
            DashboardCollection::default(),
            None,
        );
        store.add_widget(&builtin_templates()[0]);
        assert!(store.active().is_none());
        assert!(store.collection().is_empty());
    }

    #[test]
    fn unknown_widget_update_publishes_nothing() {
        let mut store = store_with_dashboard();
        let notified = Rc::new(Cell::new(0u32));
        let seen = notified.clone();
        let _sub = store.subscribe(move |_| seen.set(seen.get() + 1));

        store.update_widget(WidgetId::intern("missing"), WidgetPatch::title("x"));
        assert_eq!(notified.get(), 0, "no-op must not notify");
    }

    #[test]
    fn each_mutation_notifies_exactly_once() {
        let mut store = store_with_dashboard();
        let notified = Rc::new(Cell::new(0u32));
        let seen = notified.clone();
        let _sub = store.subscribe(move |_| seen.set(seen.get() + 1));

        let template = &builtin_templates()[1];
        store.add_widget(template);
        assert_eq!(notified.get(), 1);

        let id = store.active().unwrap().widgets[0].id;
        store.update_widget(id, WidgetPatch::size(Size::new(500.0, 400.0)));
        assert_eq!(notified.get(), 2);

        store.remove_widget(id);
        assert_eq!(notified.get(), 3);
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let mut store = store_with_dashboard();
        let notified = Rc::new(Cell::new(0u32));
        let seen = notified.clone();
        let sub = store.subscribe(move |_| seen.set(seen.get() + 1));

        store.add_widget(&builtin_templates()[0]);
        assert_eq!(notified.get(), 1);

        drop(sub);
        store.add_widget(&builtin_templates()[0]);
        assert_eq!(notified.get(), 1, "dropped subscriber must not be called");
    }

    #[test]
    fn update_clamps_size_to_floor() {
        let mut store = store_with_dashboard();
        store.add_widget(&builtin_templates()[0]);
        let id = store.active().unwrap().widgets[0].id;

        store.update_widget(id, WidgetPatch::size(Size::new(10.0, 10.0)));
        let widget = store.active().unwrap().widget(id).unwrap();
        assert_eq!(widget.size, Size::new(300.0, 200.0));
    }

    #[test]
    fn select_unknown_dashboard_is_noop() {
        let mut store = store_with_dashboard();
        let before = store.active_id();
        store.select_dashboard(DashboardId::intern("nope"));
        assert_eq!(store.active_id(), before);
    }
}
