#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Serializable view descriptions for the occurrence dashboard.
//!
//! A [`DashboardView`] is everything a renderer needs to draw one refresh
//! of the page: the sidebar controls, the optional data table, the point
//! map, and the deck.gl layer stack. Layers are tagged with their deck.gl
//! class names. Scatterplot parameters use deck.gl's accessor names
//! (`getRadius`, `getFillColor`); the hexagon colors are mapped onto
//! deck.gl props by the page.

use cenipa_map_occurrence_models::{Classification, Occurrence};
use serde::Serialize;

/// A `[longitude, latitude]` pair.
pub type Position = [f64; 2];

/// An RGB or RGBA color.
pub type Color = Vec<u8>;

/// One full render of the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Page title.
    pub title: String,
    /// Markdown line describing the current selection.
    pub headline: String,
    /// Sidebar controls and readout.
    pub sidebar: SidebarView,
    /// Raw table of the filtered rows, present only when the table toggle
    /// is on.
    pub table: Option<TableView>,
    /// 2D point map of rows with valid coordinates.
    pub point_map: PointMapView,
    /// 3D layered map.
    pub deck: DeckChart,
}

/// Sidebar state as rendered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarView {
    /// Sidebar header.
    pub header: String,
    /// Info readout (e.g. "42 selected occurrences.").
    pub info: String,
    /// Number of rows in the filtered subset.
    pub selected_count: usize,
    /// Year slider.
    pub year: YearControl,
    /// Classification multiselect.
    pub classifications: ClassificationControl,
    /// Matching rows per selected classification, in taxonomy order.
    pub counts: Vec<ClassificationCount>,
    /// Whether the data table is shown.
    pub show_table: bool,
    /// Markdown attribution for the data source.
    pub attribution: String,
}

/// Number of filtered rows with one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationCount {
    /// The classification.
    pub classification: Classification,
    /// Rows in the filtered subset with this classification.
    pub count: usize,
}

/// Bounded integer slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearControl {
    /// Smallest selectable year.
    pub min: i32,
    /// Largest selectable year.
    pub max: i32,
    /// Current value.
    pub value: i32,
}

/// Multi-valued selection over the classification taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationControl {
    /// All selectable values.
    pub options: Vec<Classification>,
    /// Currently selected values.
    pub selected: Vec<Classification>,
}

/// Row/column grid of the filtered subset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    /// Column names in display order.
    pub columns: Vec<String>,
    /// Rows in source order.
    pub rows: Vec<Occurrence>,
}

/// A single plotted point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapPoint {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// Simple point map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointMapView {
    /// Points to plot.
    pub points: Vec<MapPoint>,
}

/// Initial camera of the 3D map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Camera center latitude.
    pub latitude: f64,
    /// Camera center longitude.
    pub longitude: f64,
    /// Zoom level.
    pub zoom: f64,
    /// Tilt in degrees.
    pub pitch: f64,
}

/// deck.gl `HexagonLayer` parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HexagonLayer {
    /// Layer id.
    pub id: String,
    /// Points to aggregate.
    pub data: Vec<Position>,
    /// Number of sides used to draw each cell.
    pub disk_resolution: u32,
    /// Cell radius in meters.
    pub radius: f64,
    /// Multiplier applied to cell height.
    pub elevation_scale: f64,
    /// Cell fill color.
    pub fill_color: Color,
    /// Cell outline color.
    pub line_color: Color,
    /// Highlight the hovered cell.
    pub auto_highlight: bool,
    /// Respond to pointer events.
    pub pickable: bool,
    /// Draw cells as 3D columns.
    pub extruded: bool,
}

/// deck.gl `ScatterplotLayer` parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterplotLayer {
    /// Layer id.
    pub id: String,
    /// Points to draw.
    pub data: Vec<Position>,
    /// Point fill color, serialized as deck.gl's `getFillColor`.
    pub get_fill_color: Color,
    /// Point radius in meters, serialized as deck.gl's `getRadius`.
    pub get_radius: f64,
}

/// A layer of the 3D map, tagged with its deck.gl class name.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Layer {
    /// Density hexagons.
    HexagonLayer(HexagonLayer),
    /// Individual points.
    ScatterplotLayer(ScatterplotLayer),
}

impl Layer {
    /// Positions drawn by this layer.
    #[must_use]
    pub fn data(&self) -> &[Position] {
        match self {
            Self::HexagonLayer(layer) => &layer.data,
            Self::ScatterplotLayer(layer) => &layer.data,
        }
    }
}

/// 3D layered map: a camera plus a layer stack drawn bottom to top.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckChart {
    /// Initial camera.
    pub initial_view_state: ViewState,
    /// Layers drawn bottom to top.
    pub layers: Vec<Layer>,
}
