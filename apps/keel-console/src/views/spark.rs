use askama::Template;
use askama_web::WebTemplate;
use keel_shared::HostRoles;

use super::Nav;
use crate::i18n::Catalog;

pub const SPARK_WORKER: &str = "SPARK_WORKER";
pub const SPARK_SERVER: &str = "SPARK_SERVER";
const STARTED: &str = "STARTED";

#[derive(Debug, Clone, PartialEq)]
pub struct SparkSummary {
    pub server: Option<HostRoles>,
    pub worker: Option<HostRoles>,
    pub workers: Vec<HostRoles>,
    pub live_workers: Vec<HostRoles>,
}

impl SparkSummary {
    pub fn from_components(components: &[HostRoles]) -> Self {
        let find = |name: &str| components.iter().find(|c| c.component_name == name).cloned();
        let workers: Vec<HostRoles> = components
            .iter()
            .filter(|c| c.component_name == SPARK_WORKER)
            .cloned()
            .collect();
        let live_workers = workers.iter().filter(|c| c.state == STARTED).cloned().collect();

        Self {
            server: find(SPARK_SERVER),
            worker: find(SPARK_WORKER),
            workers,
            live_workers,
        }
    }

    pub fn worker_nodes_text_key(&self) -> &'static str {
        if self.workers.len() > 1 {
            "services.service.summary.viewHosts"
        } else {
            "services.service.summary.viewHost"
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "spark.html")]
pub struct SparkTemplate {
    pub nav: Nav,
    pub title: String,
    pub server_label: String,
    pub server_host: String,
    pub server_state: String,
    pub workers_label: String,
    pub live_label: String,
    pub live_count: usize,
    pub worker_count: usize,
    pub worker_link_text: String,
    pub worker_hosts: Vec<String>,
}

impl SparkTemplate {
    pub fn new(summary: &SparkSummary, catalog: &Catalog) -> Self {
        Self {
            nav: Nav::new(catalog),
            title: catalog.t("services.spark.title"),
            server_label: catalog.t("services.spark.server"),
            server_host: summary.server.as_ref().map(|s| s.host_name.clone()).unwrap_or_else(|| "--".to_string()),
            server_state: summary.server.as_ref().map(|s| s.state.clone()).unwrap_or_default(),
            workers_label: catalog.t("services.spark.workers"),
            live_label: catalog.t("services.spark.live"),
            live_count: summary.live_workers.len(),
            worker_count: summary.workers.len(),
            worker_link_text: catalog.t(summary.worker_nodes_text_key()),
            worker_hosts: summary.workers.iter().map(|w| w.host_name.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    fn component(name: &str, host: &str, state: &str) -> HostRoles {
        HostRoles {
            component_name: name.to_string(),
            host_name: host.to_string(),
            state: state.to_string(),
        }
    }

    #[test]
    fn live_workers_are_started_spark_workers() {
        let summary = SparkSummary::from_components(&[
            component(SPARK_SERVER, "h1", "STARTED"),
            component(SPARK_WORKER, "h2", "STARTED"),
            component(SPARK_WORKER, "h3", "INSTALLED"),
            component("DATANODE", "h4", "STARTED"),
        ]);

        assert_eq!(summary.workers.len(), 2);
        assert_eq!(summary.live_workers.len(), 1);
        assert_eq!(summary.live_workers[0].host_name, "h2");
        assert_eq!(summary.server.as_ref().unwrap().host_name, "h1");
        assert_eq!(summary.worker.as_ref().unwrap().host_name, "h2");
        assert_eq!(summary.worker_nodes_text_key(), "services.service.summary.viewHosts");
    }

    #[test]
    fn single_worker_uses_singular_text() {
        let summary = SparkSummary::from_components(&[component(SPARK_WORKER, "h2", "STARTED")]);
        assert_eq!(summary.worker_nodes_text_key(), "services.service.summary.viewHost");
        assert!(summary.server.is_none());

        let page = SparkTemplate::new(&summary, &Catalog::new(Locale::En));
        assert_eq!(page.server_host, "--");
        assert_eq!(page.worker_link_text, "View Host");
    }
}
