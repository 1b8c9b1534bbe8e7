use axum::Json;
use serde::Serialize;
use vrptw_core::params::{Preset, SolveParams};

#[derive(Serialize)]
pub struct PresetResponse {
    preset: Preset,
    description: &'static str,
    params: SolveParams,
}

pub async fn presets_handler() -> Json<Vec<PresetResponse>> {
    Json(
        Preset::ALL
            .iter()
            .map(|preset| PresetResponse {
                preset: *preset,
                description: preset.description(),
                params: preset.params(),
            })
            .collect(),
    )
}
