//! Core data model for Deck dashboards.
//!
//! A dashboard is a named, *ordered* collection of widgets — order is display
//! order, and the geometry logic treats it as priority order when resolving
//! collisions. Widgets flow in the container; `position` is advisory, `size`
//! is authoritative and only changes through the store or a resize commit.

use crate::id::{DashboardId, WidgetId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Layout units ────────────────────────────────────────────────────────

/// Minimum widget width in layout units. Enforced after every mutation.
pub const MIN_WIDGET_WIDTH: f32 = 300.0;
/// Minimum widget height in layout units. Enforced after every mutation.
pub const MIN_WIDGET_HEIGHT: f32 = 200.0;

/// Advisory placement of a widget. Layout is container-flow, so this is not
/// authoritative for rendering; it survives for persistence fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// A widget's size in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The size every freshly placed widget starts with.
    pub const DEFAULT: Size = Size::new(360.0, 350.0);

    /// Raise both dimensions to the minimum floor.
    pub fn floored(self) -> Self {
        Self {
            width: self.width.max(MIN_WIDGET_WIDTH),
            height: self.height.max(MIN_WIDGET_HEIGHT),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Size::DEFAULT
    }
}

// ─── Widget kinds ────────────────────────────────────────────────────────

/// What a widget renders. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    Table,
    Chart,
    Tree,
    ImportPreview,
}

// ─── Data bindings ───────────────────────────────────────────────────────

/// Where a widget's data comes from: a named source resolved through the
/// data source provider, or a JSON payload carried inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataBinding {
    Source { name: String },
    Inline { data: serde_json::Value },
}

// ─── View configuration ──────────────────────────────────────────────────
//
// Kind-specific rendering settings. The store never looks inside these;
// they ride along the widget and serialize with it.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Pie,
    Bar,
    Line,
    Column,
    Doughnut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSettings {
    pub chart_type: ChartKind,
    pub show_legend: bool,
    pub show_data_labels: bool,
    pub colors: Vec<String>,
    pub x_axis_field: Option<String>,
    pub y_axis_field: Option<String>,
    /// Field whose values label the slices/bars.
    pub category_field: Option<String>,
    /// Numeric field aggregated per category.
    pub value_field: Option<String>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            chart_type: ChartKind::Pie,
            show_legend: true,
            show_data_labels: true,
            colors: Vec::new(),
            x_axis_field: None,
            y_axis_field: None,
            category_field: None,
            value_field: None,
        }
    }
}

/// Value type of a table column, used for cell formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub field: String,
    pub header: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub sortable: bool,
    pub filterable: bool,
    pub width: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSettings {
    pub show_header: bool,
    pub show_pagination: bool,
    pub page_size: u32,
    pub sortable: bool,
    pub filterable: bool,
    /// Empty means "infer columns from the data" in the rendering layer.
    pub columns: Vec<TableColumn>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            show_header: true,
            show_pagination: true,
            page_size: 10,
            sortable: true,
            filterable: true,
            columns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSettings {
    pub show_icons: bool,
    pub expanded_by_default: bool,
    pub colors: Option<Vec<String>>,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            show_icons: true,
            expanded_by_default: false,
            colors: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSettings {
    /// How many imported records the preview table shows.
    pub preview_rows: u32,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self { preview_rows: 5 }
    }
}

/// Kind-specific rendering configuration, opaque to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ViewConfig {
    Table(TableSettings),
    Chart(ChartSettings),
    Tree(TreeSettings),
    ImportPreview(ImportSettings),
}

// ─── Widgets ─────────────────────────────────────────────────────────────

/// A placed, sized, data-bound visual element on a dashboard canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: WidgetId,
    pub kind: WidgetKind,
    pub title: String,
    pub position: Position,
    pub size: Size,
    pub data_binding: Option<DataBinding>,
    pub view_config: Option<ViewConfig>,
}

impl Widget {
    /// Construct a widget from a template with the catalog defaults:
    /// origin position, default size, binding inherited from the template.
    pub fn from_template(id: WidgetId, template: &WidgetTemplate) -> Self {
        Self {
            id,
            kind: template.kind,
            title: template.title.clone(),
            position: Position::default(),
            size: Size::DEFAULT,
            data_binding: template.default_binding.clone(),
            view_config: None,
        }
    }
}

// ─── Templates ───────────────────────────────────────────────────────────

/// A draggable catalog entry the UI offers; `add_widget` consumes one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTemplate {
    pub id: String,
    pub kind: WidgetKind,
    pub title: String,
    pub icon: String,
    pub description: String,
    pub default_binding: Option<DataBinding>,
    pub image_path: Option<String>,
}

/// The built-in template catalog: one entry per widget kind.
pub fn builtin_templates() -> Vec<WidgetTemplate> {
    vec![
        WidgetTemplate {
            id: "table-template".into(),
            kind: WidgetKind::Table,
            title: "Table".into(),
            icon: "table_chart".into(),
            description: "Interactive data grid with sorting and pagination".into(),
            default_binding: None,
            image_path: Some("assets/img/table.svg".into()),
        },
        WidgetTemplate {
            id: "chart-template".into(),
            kind: WidgetKind::Chart,
            title: "Chart".into(),
            icon: "pie_chart".into(),
            description: "Customizable data visualization charts".into(),
            default_binding: None,
            image_path: Some("assets/img/chart.svg".into()),
        },
        WidgetTemplate {
            id: "tree-template".into(),
            kind: WidgetKind::Tree,
            title: "Tree".into(),
            icon: "account_tree".into(),
            description: "Displays hierarchical records as an expandable tree".into(),
            default_binding: None,
            image_path: Some("assets/img/tree.svg".into()),
        },
        WidgetTemplate {
            id: "import-template".into(),
            kind: WidgetKind::ImportPreview,
            title: "Import".into(),
            icon: "cloud_upload".into(),
            description: "Preview imported records as a table".into(),
            default_binding: None,
            image_path: Some("assets/img/import.svg".into()),
        },
    ]
}

// ─── Dashboards ──────────────────────────────────────────────────────────

/// A named, ordered collection of widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: DashboardId,
    pub name: String,
    pub widgets: Vec<Widget>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dashboard {
    /// An empty dashboard stamped with the current time.
    pub fn new(id: DashboardId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            widgets: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn contains_widget(&self, id: WidgetId) -> bool {
        self.widget(id).is_some()
    }
}

/// The full persisted state: every dashboard, in order. The persisted
/// document carries no active marker — the first dashboard becomes active
/// on load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardCollection {
    pub dashboards: Vec<Dashboard>,
}

impl DashboardCollection {
    pub fn get(&self, id: DashboardId) -> Option<&Dashboard> {
        self.dashboards.iter().find(|d| d.id == id)
    }

    /// Replace the dashboard with a matching id, preserving its slot.
    /// Unknown ids are ignored — the collection never grows through upsert.
    pub fn sync(&mut self, dashboard: Dashboard) {
        if let Some(slot) = self.dashboards.iter_mut().find(|d| d.id == dashboard.id) {
            *slot = dashboard;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dashboards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_size_respects_floor() {
        assert!(Size::DEFAULT.width >= MIN_WIDGET_WIDTH);
        assert!(Size::DEFAULT.height >= MIN_WIDGET_HEIGHT);
    }

    #[test]
    fn floored_raises_small_sizes() {
        let s = Size::new(10.0, 10.0).floored();
        assert_eq!(s, Size::new(MIN_WIDGET_WIDTH, MIN_WIDGET_HEIGHT));

        let untouched = Size::new(400.0, 300.0).floored();
        assert_eq!(untouched, Size::new(400.0, 300.0));
    }

    #[test]
    fn widget_from_template_uses_defaults() {
        let templates = builtin_templates();
        let chart = templates
            .iter()
            .find(|t| t.kind == WidgetKind::Chart)
            .unwrap();
        let id = WidgetId::generate();
        let widget = Widget::from_template(id, chart);

        assert_eq!(widget.id, id);
        assert_eq!(widget.kind, WidgetKind::Chart);
        assert_eq!(widget.title, "Chart");
        assert_eq!(widget.position, Position::default());
        assert_eq!(widget.size, Size::new(360.0, 350.0));
        assert_eq!(widget.data_binding, None);
    }

    #[test]
    fn widget_serializes_with_camel_case_keys() {
        let widget = Widget {
            id: WidgetId::intern("w1"),
            kind: WidgetKind::ImportPreview,
            title: "Import".into(),
            position: Position::default(),
            size: Size::DEFAULT,
            data_binding: Some(DataBinding::Source {
                name: "agents".into(),
            }),
            view_config: None,
        };
        let json = serde_json::to_string(&widget).unwrap();
        assert!(json.contains("\"kind\":\"import-preview\""));
        assert!(json.contains("\"dataBinding\""));
        assert!(json.contains("\"type\":\"source\""));
        assert!(json.contains("\"viewConfig\":null"));
    }

    #[test]
    fn view_config_tags_by_kind() {
        let config = ViewConfig::Chart(ChartSettings::default());
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"kind\":\"chart\""));
        let back: ViewConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn collection_sync_replaces_in_place() {
        let id = DashboardId::intern("d1");
        let mut collection = DashboardCollection {
            dashboards: vec![Dashboard::new(id, "First"), Dashboard::new(DashboardId::intern("d2"), "Second")],
        };

        let mut updated = collection.dashboards[0].clone();
        updated.name = "Renamed".into();
        collection.sync(updated);

        assert_eq!(collection.dashboards.len(), 2);
        assert_eq!(collection.dashboards[0].name, "Renamed");
        assert_eq!(collection.dashboards[1].name, "Second");
    }

    #[test]
    fn builtin_catalog_covers_every_kind() {
        let templates = builtin_templates();
        assert_eq!(templates.len(), 4);
        for kind in [
            WidgetKind::Table,
            WidgetKind::Chart,
            WidgetKind::Tree,
            WidgetKind::ImportPreview,
        ] {
            assert!(templates.iter().any(|t| t.kind == kind));
        }
    }
}
