//! Dashboard registry: loads the persisted collection at process start,
//! owns the store, and exposes the dashboard set for switcher UIs.
//!
//! Loading is self-healing: absent, unreadable, unparsable, or empty
//! persisted state all produce one default dashboard, made active and
//! persisted immediately. The registry never surfaces a load failure.

use crate::id::DashboardId;
use crate::model::{Dashboard, DashboardCollection};
use crate::storage::DurableStorage;
use crate::store::{STORAGE_KEY, WidgetStore};

/// Fixed id of the dashboard synthesized on first run.
pub const DEFAULT_DASHBOARD_ID: &str = "default-dashboard";
/// Fixed name of the dashboard synthesized on first run.
pub const DEFAULT_DASHBOARD_NAME: &str = "My Dashboard";

pub struct DashboardRegistry {
    store: WidgetStore,
}

impl DashboardRegistry {
    /// Read the persisted collection and build the store around it. The
    /// first dashboard becomes active (the persisted layout carries no
    /// active marker).
    pub fn load(storage: Box<dyn DurableStorage>) -> Self {
        match read_collection(storage.as_ref()) {
            Some(collection) => {
                let active = collection.dashboards[0].id;
                Self {
                    store: WidgetStore::new(storage, collection, Some(active)),
                }
            }
            None => {
                let dashboard =
                    Dashboard::new(DashboardId::intern(DEFAULT_DASHBOARD_ID), DEFAULT_DASHBOARD_NAME);
                let active = dashboard.id;
                let collection = DashboardCollection {
                    dashboards: vec![dashboard],
                };
                let mut store = WidgetStore::new(storage, collection, Some(active));
                store.persist();
                Self { store }
            }
        }
    }

    /// Read-only snapshot of the dashboard set, in persisted order.
    pub fn list_dashboards(&self) -> &[Dashboard] {
        &self.store.collection().dashboards
    }

    /// Make another dashboard active. Delegates to the store.
    pub fn switch_active(&mut self, id: DashboardId) {
        self.store.select_dashboard(id);
    }

    pub fn store(&self) -> &WidgetStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut WidgetStore {
        &mut self.store
    }

    /// Give up the registry wrapper and keep the store.
    pub fn into_store(self) -> WidgetStore {
        self.store
    }
}

/// Read and parse the persisted collection, treating every failure mode as
/// "absent". Empty collections count as absent so the caller always ends up
/// with at least one dashboard.
fn read_collection(storage: &dyn DurableStorage) -> Option<DashboardCollection> {
    let text = match storage.read(STORAGE_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(err) => {
            log::warn!("stored dashboards unreadable, starting fresh: {err}");
            return None;
        }
    };
    let collection: DashboardCollection = match serde_json::from_str(&text) {
        Ok(collection) => collection,
        Err(err) => {
            log::warn!("stored dashboards malformed, starting fresh: {err}");
            return None;
        }
    };
    (!collection.is_empty()).then_some(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn first_run_synthesizes_default_dashboard() {
        let registry = DashboardRegistry::load(Box::new(MemoryStorage::new()));

        let dashboards = registry.list_dashboards();
        assert_eq!(dashboards.len(), 1);
        assert_eq!(dashboards[0].id.as_str(), DEFAULT_DASHBOARD_ID);
        assert_eq!(dashboards[0].name, DEFAULT_DASHBOARD_NAME);
        assert!(dashboards[0].widgets.is_empty());
        assert_eq!(registry.store().active_id(), Some(dashboards[0].id));
    }

    #[test]
    fn corrupt_payload_falls_back_to_default() {
        let storage = MemoryStorage::seeded(STORAGE_KEY, "{not json");
        let registry = DashboardRegistry::load(Box::new(storage));

        assert_eq!(registry.list_dashboards().len(), 1);
        assert_eq!(
            registry.list_dashboards()[0].id.as_str(),
            DEFAULT_DASHBOARD_ID
        );
    }

    #[test]
    fn empty_collection_counts_as_absent() {
        let storage = MemoryStorage::seeded(STORAGE_KEY, r#"{"dashboards":[]}"#);
        let registry = DashboardRegistry::load(Box::new(storage));
        assert_eq!(registry.list_dashboards().len(), 1);
    }

    #[test]
    fn switch_active_delegates_to_store() {
        let mut registry = DashboardRegistry::load(Box::new(MemoryStorage::new()));
        let known = registry.list_dashboards()[0].id;

        registry.switch_active(DashboardId::intern("unknown"));
        assert_eq!(registry.store().active_id(), Some(known));

        registry.switch_active(known);
        assert_eq!(registry.store().active_id(), Some(known));
    }
}
