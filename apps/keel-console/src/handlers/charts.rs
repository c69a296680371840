use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::AppState;
use crate::views::heatmap::{HeatmapState, HeatmapTemplate, default_categories};
use crate::views::memory::{MemoryTemplate, memory_chart};

/// Width of the memory chart window.
const MEMORY_WINDOW_SECS: i64 = 3600;

async fn fetch_memory(state: &AppState) -> crate::error::Result<crate::views::memory::MemoryChart> {
    let to = chrono::Utc::now().timestamp();
    let response = state.client.memory_metrics(to - MEMORY_WINDOW_SECS, to).await?;
    Ok(memory_chart(&response, &state.catalog))
}

pub async fn get_memory(State(state): State<AppState>) -> Response {
    match fetch_memory(&state).await {
        Ok(chart) => MemoryTemplate::new(&chart, &state.catalog).into_response(),
        Err(e) => e.surface(&state.catalog, "dashboard.clusterMetrics.memory").into_response(),
    }
}

pub async fn get_memory_json(State(state): State<AppState>) -> Response {
    match fetch_memory(&state).await {
        Ok(chart) => Json(chart).into_response(),
        Err(e) => e.surface(&state.catalog, "dashboard.clusterMetrics.memory").into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HeatmapQuery {
    pub metric: Option<String>,
}

pub async fn get_heatmap(State(state): State<AppState>, Query(query): Query<HeatmapQuery>) -> Response {
    let mut heatmap = HeatmapState::new(default_categories(&state.catalog));
    heatmap.mount();

    let hosts = match state.client.hosts().await {
        Ok(hosts) => hosts,
        Err(e) => return e.surface(&state.catalog, "charts.heatmap.title").into_response(),
    };
    heatmap.set_hosts(&hosts);
    let racks: Vec<String> = heatmap.racks.iter().map(|r| r.name.clone()).collect();
    for rack in racks {
        heatmap.mark_rack_loaded(&rack);
    }

    if let Some(metric) = query.metric.as_deref() {
        if !heatmap.select_metric(metric) {
            tracing::debug!("Ignoring unknown heatmap metric {}", metric);
        }
    }

    if let Some(source) = heatmap.load_selected_metric() {
        let metrics = match state.client.host_metrics(&source.fields()).await {
            Ok(metrics) => metrics,
            Err(e) => return e.surface(&state.catalog, "charts.heatmap.title").into_response(),
        };
        let values: BTreeMap<String, f64> = metrics
            .into_iter()
            .filter_map(|(host, m)| source.value(&m).map(|v| (host, v)))
            .collect();
        tracing::debug!("Heatmap metric has values for {} hosts", values.len());
        heatmap.set_host_values(values);
        heatmap.metric_loaded();
    }

    HeatmapTemplate::new(&heatmap, &state.catalog).into_response()
}
