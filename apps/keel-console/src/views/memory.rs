//! Cluster memory chart: raw metric series to named, plottable series.

use askama::Template;
use askama_web::WebTemplate;
use keel_shared::ClusterMetricsResponse;
use serde::Serialize;

use super::Nav;
use crate::i18n::Catalog;

const UNKNOWN_SERIES: &str = "--";
const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: i64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub data: Vec<Point>,
}

impl Series {
    pub fn latest(&self) -> Option<f64> {
        self.data.last().map(|p| p.y)
    }

    pub fn peak(&self) -> Option<f64> {
        self.data.iter().map(|p| p.y).reduce(f64::max)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryChart {
    pub id: &'static str,
    pub title: String,
    pub renderer: &'static str,
    pub time_paging: bool,
    pub series: Vec<Series>,
}

fn display_name_key(raw: &str) -> Option<&'static str> {
    match raw {
        "Use" => Some("hosts.host.metrics.memory.displayNames.mem_used"),
        "Total" => Some("hosts.host.metrics.disk.displayNames.disk_total"),
        "Share" => Some("hosts.host.metrics.memory.displayNames.mem_shared"),
        "Buffer" => Some("hosts.host.metrics.memory.displayNames.mem_buffers"),
        "Swap" => Some("hosts.host.metrics.memory.displayNames.swap_free"),
        "Cache" => Some("hosts.host.metrics.memory.displayNames.mem_cached"),
        _ => None,
    }
}

/// One series per memory metric that has data; null samples are dropped.
pub fn transform_to_series(response: &ClusterMetricsResponse, catalog: &Catalog) -> Vec<Series> {
    let Some(memory) = response.metrics.as_ref().and_then(|m| m.memory.as_ref()) else {
        return Vec::new();
    };

    memory
        .iter()
        .filter_map(|(raw, samples)| {
            let samples = samples.as_ref()?;
            let name = display_name_key(raw)
                .map(|key| catalog.t(key))
                .unwrap_or_else(|| UNKNOWN_SERIES.to_string());
            let data = samples
                .iter()
                .filter_map(|(value, ts)| value.map(|y| Point { x: *ts, y }))
                .collect();
            Some(Series { name, data })
        })
        .collect()
}

pub fn memory_chart(response: &ClusterMetricsResponse, catalog: &Catalog) -> MemoryChart {
    MemoryChart {
        id: "cluster-metrics-memory",
        title: catalog.t("dashboard.clusterMetrics.memory"),
        renderer: "line",
        time_paging: false,
        series: transform_to_series(response, catalog),
    }
}

/// Y axis formatter: 1024-based units, one decimal.
pub fn format_bytes(value: f64) -> String {
    let mut scaled = value;
    let mut unit = 0;
    while scaled.abs() >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", scaled, BYTE_UNITS[unit])
}

/// A series row as shown under the chart.
#[derive(Debug, Clone)]
pub struct SeriesRow {
    pub name: String,
    pub latest: String,
    pub peak: String,
    pub points: usize,
}

#[derive(Template, WebTemplate)]
#[template(path = "memory.html")]
pub struct MemoryTemplate {
    pub nav: Nav,
    pub title: String,
    pub chart_id: String,
    pub rows: Vec<SeriesRow>,
    /// Serialized chart, handed to the client-side plotter.
    pub chart_json: String,
}

impl MemoryTemplate {
    pub fn new(chart: &MemoryChart, catalog: &Catalog) -> Self {
        let rows = chart
            .series
            .iter()
            .map(|s| SeriesRow {
                name: s.name.clone(),
                latest: s.latest().map(format_bytes).unwrap_or_else(|| UNKNOWN_SERIES.to_string()),
                peak: s.peak().map(format_bytes).unwrap_or_else(|| UNKNOWN_SERIES.to_string()),
                points: s.data.len(),
            })
            .collect();

        Self {
            nav: Nav::new(catalog),
            title: chart.title.clone(),
            chart_id: chart.id.to_string(),
            rows,
            chart_json: serde_json::to_string(chart).unwrap_or_else(|_| "{}".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    fn metrics(body: &str) -> ClusterMetricsResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn known_names_are_translated_unknown_become_dashes() {
        let response = metrics(
            r#"{"metrics":{"memory":{"Use":[[1.0,10]],"Cache":[[2.0,10]],"Weird":[[3.0,10]]}}}"#,
        );
        let series = transform_to_series(&response, &Catalog::new(Locale::En));
        let names: Vec<_> = series.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(names, vec!["Cached", "Used", "--"]);
    }

    #[test]
    fn null_series_skipped_and_null_points_dropped() {
        let response = metrics(
            r#"{"metrics":{"memory":{"Use":[[1.0,10],[null,25],[3.0,40]],"Swap":null}}}"#,
        );
        let series = transform_to_series(&response, &Catalog::new(Locale::En));

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].data, vec![Point { x: 10, y: 1.0 }, Point { x: 40, y: 3.0 }]);
        assert_eq!(series[0].latest(), Some(3.0));
        assert_eq!(series[0].peak(), Some(3.0));
    }

    #[test]
    fn missing_metrics_yield_no_series() {
        assert!(transform_to_series(&metrics("{}"), &Catalog::new(Locale::En)).is_empty());
        assert!(transform_to_series(&metrics(r#"{"metrics":{}}"#), &Catalog::new(Locale::En)).is_empty());
    }

    #[test]
    fn bytes_formatter_scales_by_1024() {
        assert_eq!(format_bytes(512.0), "512.0 B");
        assert_eq!(format_bytes(1536.0), "1.5 KB");
        assert_eq!(format_bytes(1073741824.0), "1.0 GB");
        assert_eq!(format_bytes(1024.0_f64.powi(6)), "1024.0 TB");
    }

    #[test]
    fn template_shows_formatted_rows() {
        let response = metrics(r#"{"metrics":{"memory":{"Total":[[4294967296.0,10]]}}}"#);
        let catalog = Catalog::new(Locale::En);
        let chart = memory_chart(&response, &catalog);
        assert_eq!(chart.renderer, "line");

        let page = MemoryTemplate::new(&chart, &catalog);
        assert_eq!(page.rows[0].latest, "4.0 GB");
        assert!(page.render().unwrap().contains("cluster-metrics-memory"));
    }
}
