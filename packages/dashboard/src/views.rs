//! View composition: table, point map, and the 3D layered map.

use cenipa_map_dashboard_models::{
    DashboardView, DeckChart, HexagonLayer, Layer, MapPoint, PointMapView, Position,
    ScatterplotLayer, TableView, ViewState,
};
use cenipa_map_occurrence_models::{Classification, OCCURRENCE_COLUMNS, OccurrenceTable};

use crate::filter::{FilteredOccurrences, filter};
use crate::sidebar::SidebarState;

/// Page title.
pub const TITLE: &str = "CENIPA - Aeronautical Accidents";

/// Initial camera of the 3D map, centred on Rio de Janeiro.
pub const INITIAL_VIEW_STATE: ViewState = ViewState {
    latitude: -22.965_92,
    longitude: -43.178_96,
    zoom: 3.0,
    pitch: 50.0,
};

const HEXAGON_DISK_RESOLUTION: u32 = 12;
const HEXAGON_RADIUS: f64 = 30_000.0;
const HEXAGON_ELEVATION_SCALE: f64 = 1_500.0;
const SCATTER_RADIUS: f64 = 60_000.0;

/// Runs the whole pipeline for one input state: filter, then compose every
/// view from the same subset.
#[must_use]
pub fn render(table: &OccurrenceTable, state: &SidebarState, attribution: &str) -> DashboardView {
    let subset = filter(table, state.year(), state.classifications());

    log::debug!(
        "Rendering year={} classifications={:?}: {} of {} rows",
        state.year(),
        state.classifications(),
        subset.len(),
        table.len()
    );

    let positions = subset.positions();

    DashboardView {
        title: TITLE.to_owned(),
        headline: headline(state),
        sidebar: state.view(&subset, attribution),
        table: state.show_table().then(|| table_view(&subset)),
        point_map: point_map(&positions),
        deck: deck_chart(positions),
    }
}

/// Markdown line naming the selected classifications and year.
#[must_use]
pub fn headline(state: &SidebarState) -> String {
    let labels: Vec<&str> = state
        .classifications()
        .iter()
        .map(Classification::as_ref)
        .collect();
    format!(
        "ℹ️ Events classified as **{}** for the year **{}**.",
        labels.join(", "),
        state.year()
    )
}

/// Row/column grid of the subset.
#[must_use]
pub fn table_view(subset: &FilteredOccurrences<'_>) -> TableView {
    TableView {
        columns: OCCURRENCE_COLUMNS.iter().map(|c| (*c).to_owned()).collect(),
        rows: subset.to_rows(),
    }
}

/// Point map over the given `[longitude, latitude]` positions.
#[must_use]
pub fn point_map(positions: &[Position]) -> PointMapView {
    PointMapView {
        points: positions
            .iter()
            .map(|[longitude, latitude]| MapPoint {
                latitude: *latitude,
                longitude: *longitude,
            })
            .collect(),
    }
}

/// Hexagon density layer under a translucent scatter layer, both over the
/// same positions.
#[must_use]
pub fn deck_chart(positions: Vec<Position>) -> DeckChart {
    let hexagons = HexagonLayer {
        id: "occurrence-density".to_owned(),
        data: positions.clone(),
        disk_resolution: HEXAGON_DISK_RESOLUTION,
        radius: HEXAGON_RADIUS,
        elevation_scale: HEXAGON_ELEVATION_SCALE,
        fill_color: vec![255, 255, 255, 255],
        line_color: vec![255, 255, 255],
        auto_highlight: true,
        pickable: true,
        extruded: true,
    };

    let points = ScatterplotLayer {
        id: "occurrence-points".to_owned(),
        data: positions,
        get_fill_color: vec![255, 255, 255, 30],
        get_radius: SCATTER_RADIUS,
    };

    DeckChart {
        initial_view_state: INITIAL_VIEW_STATE,
        layers: vec![Layer::HexagonLayer(hexagons), Layer::ScatterplotLayer(points)],
    }
}
