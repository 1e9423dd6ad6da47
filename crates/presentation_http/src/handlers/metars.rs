//! METAR lookup handler

use axum::{
    Json,
    extract::{Path, Query, State},
};
use domain::{Metar, MetarAttribute};
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Query parameter naming a requested attribute; may repeat
pub const DATA_PARAM: &str = "data";

/// Collect the `data` parameters in request order
///
/// Other parameters are ignored. Unknown names map to the catch-all attribute.
pub fn requested_attributes(params: &[(String, String)]) -> Vec<MetarAttribute> {
    params
        .iter()
        .filter(|(key, _)| key == DATA_PARAM)
        .map(|(_, value)| MetarAttribute::from_name(value))
        .collect()
}

/// `GET /metars/{identifier}?data=...`
///
/// `identifier` is a station code or the configured group name.
#[instrument(skip(state, params))]
pub async fn get_metars(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Metar>>, ApiError> {
    let attributes = requested_attributes(&params);
    let records = state
        .metar_service
        .lookup(&identifier, &attributes)
        .await?;

    debug!(records = records.len(), "Serving METAR records");
    Ok(Json(records))
}
