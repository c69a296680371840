use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::views::spark::{SparkSummary, SparkTemplate};

pub async fn get_spark(State(state): State<AppState>) -> Response {
    match state.client.host_components().await {
        Ok(components) => {
            let summary = SparkSummary::from_components(&components);
            SparkTemplate::new(&summary, &state.catalog).into_response()
        }
        Err(e) => e.surface(&state.catalog, "services.spark.title").into_response(),
    }
}
