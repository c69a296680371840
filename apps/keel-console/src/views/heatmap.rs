use askama::Template;
use askama_web::WebTemplate;
use keel_shared::HostInfo;
use serde_json::Value;
use std::collections::BTreeMap;

use super::Nav;
use crate::i18n::Catalog;

const DEFAULT_RACK: &str = "/default-rack";

/// Where a metric's per-host value comes from, relative to the host's `metrics` object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricSource {
    Direct(&'static str),
    /// `100 * (total - free) / total`
    UsedPercent { total: &'static str, free: &'static str },
}

impl MetricSource {
    /// `fields` entries to request from the hosts endpoint.
    pub fn fields(&self) -> Vec<String> {
        let paths = match *self {
            MetricSource::Direct(path) => vec![path],
            MetricSource::UsedPercent { total, free } => vec![total, free],
        };
        paths.into_iter().map(|p| format!("metrics/{}", p)).collect()
    }

    pub fn value(&self, metrics: &Value) -> Option<f64> {
        match *self {
            MetricSource::Direct(path) => lookup(metrics, path),
            MetricSource::UsedPercent { total, free } => {
                let total = lookup(metrics, total)?;
                let free = lookup(metrics, free)?;
                (total > 0.0).then(|| 100.0 * (total - free) / total)
            }
        }
    }
}

fn lookup(metrics: &Value, path: &str) -> Option<f64> {
    path.split('/')
        .try_fold(metrics, |node, key| node.get(key))
        .and_then(Value::as_f64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapMetric {
    pub key: &'static str,
    pub name: String,
    pub source: MetricSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCategory {
    pub name: String,
    pub items: Vec<HeatmapMetric>,
}

pub fn default_categories(catalog: &Catalog) -> Vec<MetricCategory> {
    let metric = |key: &'static str, source| HeatmapMetric {
        key,
        name: catalog.t(&format!("charts.heatmap.metric.{}", key)),
        source,
    };
    vec![
        MetricCategory {
            name: catalog.t("charts.heatmap.category.host"),
            items: vec![
                metric(
                    "diskUsed",
                    MetricSource::UsedPercent { total: "disk/disk_total", free: "disk/disk_free" },
                ),
                metric(
                    "memoryUsed",
                    MetricSource::UsedPercent { total: "memory/mem_total", free: "memory/mem_free" },
                ),
                metric("cpuWait", MetricSource::Direct("cpu/cpu_wio")),
            ],
        },
        MetricCategory {
            name: catalog.t("charts.heatmap.category.hdfs"),
            items: vec![
                metric("hdfsBytesRead", MetricSource::Direct("dfs/datanode/bytes_read")),
                metric("hdfsBytesWritten", MetricSource::Direct("dfs/datanode/bytes_written")),
            ],
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rack {
    pub name: String,
    pub hosts: Vec<String>,
    pub is_loaded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapState {
    pub categories: Vec<MetricCategory>,
    pub selected_metric: Option<&'static str>,
    pub metric_loading: bool,
    pub racks: Vec<Rack>,
    /// Selected metric's value per host name.
    pub host_values: BTreeMap<String, f64>,
    pub details_visible: bool,
}

impl HeatmapState {
    pub fn new(categories: Vec<MetricCategory>) -> Self {
        Self {
            categories,
            selected_metric: None,
            metric_loading: false,
            racks: Vec::new(),
            host_values: BTreeMap::new(),
            details_visible: true,
        }
    }

    /// Page mount: default metric, racks pending, details hidden.
    pub fn mount(&mut self) {
        self.selected_metric = self
            .categories
            .first()
            .and_then(|c| c.items.first())
            .map(|m| m.key);
        for rack in &mut self.racks {
            rack.is_loaded = false;
        }
        self.details_visible = false;
    }

    /// Picks a metric by key; unknown keys keep the current selection.
    pub fn select_metric(&mut self, key: &str) -> bool {
        let found = self
            .categories
            .iter()
            .flat_map(|c| c.items.iter())
            .find(|m| m.key == key)
            .map(|m| m.key);
        match found {
            Some(key) => {
                self.selected_metric = Some(key);
                self.metric_loading = true;
                true
            }
            None => false,
        }
    }

    /// Starts reading the selected metric and says where to read it from.
    pub fn load_selected_metric(&mut self) -> Option<MetricSource> {
        let key = self.selected_metric?;
        let source = self
            .categories
            .iter()
            .flat_map(|c| c.items.iter())
            .find(|m| m.key == key)
            .map(|m| m.source)?;
        self.metric_loading = true;
        self.host_values.clear();
        Some(source)
    }

    pub fn set_host_values(&mut self, values: BTreeMap<String, f64>) {
        self.host_values = values;
    }

    pub fn metric_loaded(&mut self) {
        self.metric_loading = false;
    }

    /// Groups hosts by rack; hosts without rack info land in the default rack.
    pub fn set_hosts(&mut self, hosts: &[HostInfo]) {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for host in hosts {
            let rack = host
                .rack_info
                .as_deref()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or(DEFAULT_RACK);
            grouped.entry(rack.to_string()).or_default().push(host.host_name.clone());
        }
        self.racks = grouped
            .into_iter()
            .map(|(name, hosts)| Rack { name, hosts, is_loaded: false })
            .collect();
    }

    pub fn mark_rack_loaded(&mut self, name: &str) {
        if let Some(rack) = self.racks.iter_mut().find(|r| r.name == name) {
            rack.is_loaded = true;
        }
    }

    pub fn spinner_visible(&self) -> bool {
        self.metric_loading || !self.racks.iter().all(|r| r.is_loaded)
    }
}

#[derive(Debug, Clone)]
pub struct HostCell {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RackView {
    pub name: String,
    pub hosts: Vec<HostCell>,
}

/// Flattened metric option for the selector.
#[derive(Debug, Clone)]
pub struct MetricOption {
    pub key: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "heatmap.html")]
pub struct HeatmapTemplate {
    pub nav: Nav,
    pub title: String,
    pub loading_label: String,
    pub rack_label: String,
    pub spinner: bool,
    pub details_visible: bool,
    pub options: Vec<MetricOption>,
    pub racks: Vec<RackView>,
}

impl HeatmapTemplate {
    pub fn new(state: &HeatmapState, catalog: &Catalog) -> Self {
        let options = state
            .categories
            .iter()
            .flat_map(|c| {
                c.items.iter().map(move |m| MetricOption {
                    key: m.key.to_string(),
                    label: format!("{} / {}", c.name, m.name),
                    selected: Some(m.key) == state.selected_metric,
                })
            })
            .collect();

        Self {
            nav: Nav::new(catalog),
            title: catalog.t("charts.heatmap.title"),
            loading_label: catalog.t("charts.heatmap.loading"),
            rack_label: catalog.t("charts.heatmap.rack"),
            spinner: state.spinner_visible(),
            details_visible: state.details_visible,
            options,
            racks: state
                .racks
                .iter()
                .map(|rack| RackView {
                    name: rack.name.clone(),
                    hosts: rack
                        .hosts
                        .iter()
                        .map(|host| HostCell {
                            name: host.clone(),
                            value: state.host_values.get(host).map(|v| format!("{:.1}", v)),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
