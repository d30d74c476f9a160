//! HTTP handler functions for the dashboard API.

use actix_web::{HttpResponse, web};
use cenipa_map_dashboard::{InputError, SidebarState, render};
use cenipa_map_occurrence_models::Classification;
use cenipa_map_server_models::{ApiClassification, ApiError, ApiHealth, DashboardQueryParams};
use cenipa_map_source::LoadError;

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        data_loaded: state.cache.is_loaded(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/classifications`
///
/// Returns the classification options offered by the sidebar.
pub async fn classifications() -> HttpResponse {
    let options: Vec<ApiClassification> = Classification::all()
        .iter()
        .copied()
        .map(ApiClassification::from)
        .collect();

    HttpResponse::Ok().json(options)
}

/// `GET /api/dashboard`
///
/// Filters the occurrence table by the sidebar inputs and returns every
/// view composed from the result.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let sidebar = match sidebar_state(&params) {
        Ok(sidebar) => sidebar,
        Err(e) => {
            log::debug!("Rejected dashboard query {params:?}: {e}");
            return HttpResponse::BadRequest().json(ApiError {
                error: e.to_string(),
            });
        }
    };

    match state.cache.load().await {
        Ok(table) => {
            let view = render(&table, &sidebar, &state.cache.definition().attribution);
            HttpResponse::Ok().json(view)
        }
        Err(e) => {
            log::error!("Failed to load occurrences: {e}");
            HttpResponse::InternalServerError().json(ApiError {
                error: load_error_message(&e).to_owned(),
            })
        }
    }
}

/// Client-facing description of a load failure.
const fn load_error_message(err: &LoadError) -> &'static str {
    if err.is_fetch() {
        "Occurrence source is unreachable"
    } else {
        "Occurrence data is invalid"
    }
}

/// Applies the query parameters on top of the sidebar defaults.
fn sidebar_state(params: &DashboardQueryParams) -> Result<SidebarState, InputError> {
    let mut state = SidebarState::default();

    if let Some(year) = params.year.as_deref() {
        state = state.with_year_str(year)?;
    }
    if let Some(labels) = params.classification_labels() {
        state = state.with_classification_labels(labels)?;
    }
    if let Some(show_table) = params.show_table {
        state = state.with_show_table(show_table);
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;
    use cenipa_map_source::cache::OccurrenceCache;
    use cenipa_map_source::{OccurrenceSource, StaticCsvSource, dataset};

    use super::*;
    use crate::configure_api;

    const CSV: &str = "codigo_ocorrencia,ocorrencia_classificacao,ocorrencia_tipo,ocorrencia_tipo_categoria,ocorrencia_tipo_icao,ocorrencia_latitude,ocorrencia_longitude,ocorrencia_cidade,ocorrencia_aerodromo,ocorrencia_dia,ocorrencia_horario,investigacao_status,divulgacao_relatorio_numero,total_aeronaves_envolvidas\n\
        1,ACIDENTE,T,T,X,-22.9,-43.1,RIO,SBRJ,2015-06-01,10:30:00,FINALIZADA,,1\n\
        2,INCIDENTE GRAVE,T,T,X,-23.5,-46.6,SAO PAULO,SBSP,2015-02-03,08:00:00,ATIVA,,1\n\
        3,INCIDENTE,T,T,X,,-46.6,SAO PAULO,SBSP,2015-02-04,08:00:00,ATIVA,,1\n\
        4,INCIDENTE,T,T,X,-15.8,-47.9,BRASILIA,SBBR,2012-07-09,12:00:00,ATIVA,,2\n";

    struct UnreachableSource;

    #[async_trait]
    impl OccurrenceSource for UnreachableSource {
        fn label(&self) -> &str {
            "unreachable"
        }

        async fn fetch_csv(&self) -> Result<String, LoadError> {
            Err(LoadError::Fetch {
                message: "connection refused".to_owned(),
            })
        }
    }

    fn state_with(source: Arc<dyn OccurrenceSource>) -> web::Data<AppState> {
        let cache = OccurrenceCache::new(source, dataset::cenipa().unwrap());
        web::Data::new(AppState {
            cache: Arc::new(cache),
        })
    }

    fn state() -> web::Data<AppState> {
        state_with(Arc::new(StaticCsvSource::new(CSV)))
    }

    #[::core::prelude::v1::test]
    fn sidebar_defaults_when_params_absent() {
        let state = sidebar_state(&DashboardQueryParams::default()).unwrap();
        assert_eq!(state, SidebarState::default());
    }

    #[::core::prelude::v1::test]
    fn sidebar_rejects_unknown_classification() {
        let params = DashboardQueryParams {
            classifications: Some("INCIDENT,BOGUS".to_owned()),
            ..DashboardQueryParams::default()
        };
        assert_eq!(
            sidebar_state(&params),
            Err(InputError::UnknownClassification("BOGUS".to_owned()))
        );
    }

    #[actix_web::test]
    async fn dashboard_applies_filters() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = test::TestRequest::get()
            .uri("/api/dashboard?year=2015&classifications=INCIDENT,ACCIDENT&showTable=true")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["sidebar"]["selectedCount"], 2);
        assert_eq!(body["sidebar"]["info"], "2 selected occurrences.");
        assert_eq!(body["table"]["rows"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["pointMap"]["points"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["deck"]["layers"][1]["type"], "ScatterplotLayer");
    }

    #[actix_web::test]
    async fn dashboard_with_empty_selection_is_empty() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = test::TestRequest::get()
            .uri("/api/dashboard?classifications=")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["sidebar"]["selectedCount"], 0);
    }

    #[actix_web::test]
    async fn dashboard_rejects_out_of_range_year() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = test::TestRequest::get()
            .uri("/api/dashboard?year=2030")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn health_reports_load_state() {
        let data = state();
        let app = test::init_service(App::new().app_data(data.clone()).configure(configure_api)).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["dataLoaded"], false);

        data.cache.load().await.unwrap();

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["dataLoaded"], true);
    }

    #[actix_web::test]
    async fn dashboard_reports_unreachable_source() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(Arc::new(UnreachableSource)))
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/dashboard").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Occurrence source is unreachable");
    }

    #[actix_web::test]
    async fn dashboard_reports_invalid_data() {
        let source = StaticCsvSource::new("codigo_ocorrencia,ocorrencia_dia\n1,2015-01-01\n");
        let app = test::init_service(
            App::new()
                .app_data(state_with(Arc::new(source)))
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/dashboard").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Occurrence data is invalid");
    }
}
