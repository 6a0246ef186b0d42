pub mod geometry;
pub mod id;
pub mod model;
pub mod registry;
pub mod source;
pub mod storage;
pub mod store;

pub use geometry::{Point, Rect, clamp};
pub use id::{DashboardId, WidgetId};
pub use model::*;
pub use registry::{DEFAULT_DASHBOARD_ID, DEFAULT_DASHBOARD_NAME, DashboardRegistry};
pub use source::{DataSource, DataSourceProvider, MemorySourceProvider};
pub use storage::{DurableStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{STORAGE_KEY, StoreSubscription, WidgetPatch, WidgetStore};
