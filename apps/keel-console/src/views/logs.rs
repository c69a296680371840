//! Log browser state: server-supplied cursor pagination over ephemeral records.
//!
//! Log records are never persisted; each page replaces the previous one. The
//! server hands out opaque cursor ids: `next_id` points forward and
//! `back_ids` is the stack of cursors already visited, bottom entry being the
//! newest log id seen when pagination was initialized.

use askama::Template;
use askama_web::WebTemplate;

use super::Nav;
use crate::api::{LogPage, LogQuery, LogRecord};
use crate::i18n::Catalog;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavIds {
    pub back_ids: Vec<String>,
    pub next_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub next_from_id: String,
    pub back_from_id: String,
    pub from_ts: String,
    pub time: String,
    pub level: String,
    pub content: String,
}

impl LogFilter {
    pub fn is_any_filter_applied(&self) -> bool {
        !self.time.is_empty() || !self.level.is_empty() || !self.content.is_empty()
    }

    pub fn to_query(&self) -> LogQuery {
        LogQuery {
            next_from_id: self.next_from_id.clone(),
            back_from_id: self.back_from_id.clone(),
            from_ts: self.from_ts.clone(),
            time: self.time.clone(),
            level: self.level.clone(),
            content: self.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogsState {
    pub nav: NavIds,
    pub filter: LogFilter,
    pub content: Vec<LogRecord>,
    /// Largest page size seen so far.
    pub total_of_logs: usize,
    pub last_log_id: String,
    pub has_new_logs: bool,
    pub reset_pagination: bool,
}

impl LogsState {
    pub fn is_initialized(&self) -> bool {
        !self.nav.back_ids.is_empty()
    }

    /// Refresh from the newest log: forget every cursor and start over.
    pub fn update_logs_by_click(&mut self) -> LogQuery {
        self.nav.back_ids.clear();
        self.nav.next_id.clear();
        self.filter.next_from_id.clear();
        self.filter.back_from_id.clear();
        self.filter.from_ts.clear();
        self.has_new_logs = false;
        self.reset_pagination = true;
        self.filter.to_query()
    }

    /// Anchors pagination at the newest known log id.
    pub fn initialize_pagination(&mut self, now: &str) -> LogQuery {
        if !self.nav.back_ids.contains(&self.last_log_id) {
            self.nav.back_ids.push(self.last_log_id.clone());
        }
        self.filter.back_from_id = self.last_log_id.clone();
        self.filter.from_ts = now.to_string();
        self.filter.to_query()
    }

    pub fn navigate_next(&mut self) -> LogQuery {
        self.filter.back_from_id.clear();
        let next = std::mem::take(&mut self.nav.next_id);
        if !next.is_empty() && !self.nav.back_ids.contains(&next) {
            self.nav.back_ids.push(next.clone());
        }
        self.filter.next_from_id = next;
        self.filter.to_query()
    }

    /// Steps one page back: pops the current cursor and queries back from the new top.
    /// An emptied stack leaves `back_from_id` unset; `click_back` never gets that far.
    pub fn navigate_back(&mut self) -> LogQuery {
        self.filter.next_from_id.clear();
        self.nav.back_ids.pop();
        self.filter.back_from_id = self.nav.back_ids.last().cloned().unwrap_or_default();
        self.filter.to_query()
    }

    /// Next-arrow click: only acts when the control is enabled.
    pub fn click_next(&mut self) -> Option<LogQuery> {
        self.next_enabled().then(|| self.navigate_next())
    }

    /// Back-arrow click: only acts when the control is enabled.
    pub fn click_back(&mut self) -> Option<LogQuery> {
        self.back_enabled().then(|| self.navigate_back())
    }

    pub fn apply_filters(&mut self, time: &str, level: &str, content: &str) -> LogQuery {
        self.filter.time = time.trim().to_string();
        self.filter.level = level.trim().to_string();
        self.filter.content = content.trim().to_string();
        self.filter.to_query()
    }

    pub fn receive_page(&mut self, page: LogPage) {
        self.content = page.records;
        self.nav.next_id = page.next_id;
        if self.total_of_logs < self.content.len() {
            self.total_of_logs = self.content.len();
        }
        if self.reset_pagination {
            self.reset_pagination = false;
            self.has_new_logs = false;
        }
    }

    /// Folds in the newest log id reported by the server.
    pub fn observe_last_id(&mut self, id: &str) {
        if self.last_log_id.is_empty() {
            self.last_log_id = id.to_string();
        } else if self.last_log_id != id {
            self.last_log_id = id.to_string();
            if !self.content.iter().any(|log| log.id == id) {
                self.has_new_logs = true;
            }
        }
    }

    pub fn has_back_links(&self) -> bool {
        self.nav.back_ids.len() > 1
    }

    pub fn has_next_logs(&self) -> bool {
        !self.nav.next_id.is_empty()
    }

    pub fn back_enabled(&self) -> bool {
        self.has_back_links() && !self.filter.is_any_filter_applied()
    }

    pub fn next_enabled(&self) -> bool {
        self.has_next_logs() && !self.filter.is_any_filter_applied()
    }

    pub fn no_data_to_show(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "logs.html")]
pub struct LogsTemplate {
    pub nav: Nav,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<LogRecord>,
    pub no_data: Option<String>,
    /// Rendered hidden unless newer logs were already known; the poll script reveals it.
    pub new_logs_notice: String,
    pub has_new_logs: bool,
    pub back_enabled: bool,
    pub next_enabled: bool,
    pub refresh_label: String,
    pub filter_label: String,
    pub total_label: String,
    pub total_of_logs: usize,
    pub filter: LogFilter,
}

impl LogsTemplate {
    pub fn new(state: &LogsState, catalog: &Catalog) -> Self {
        Self {
            nav: Nav::new(catalog),
            title: catalog.t("logs.title"),
            columns: ["logs.column.id", "logs.column.time", "logs.column.devel", "logs.column.cont"]
                .iter()
                .map(|key| catalog.t(key))
                .collect(),
            rows: state.content.clone(),
            no_data: state.no_data_to_show().then(|| catalog.t("logs.noData")),
            new_logs_notice: catalog.t("logs.newLogs"),
            has_new_logs: state.has_new_logs,
            back_enabled: state.back_enabled(),
            next_enabled: state.next_enabled(),
            refresh_label: catalog.t("logs.refresh"),
            filter_label: catalog.t("logs.filter.apply"),
            total_label: catalog.t("logs.total"),
            total_of_logs: state.total_of_logs,
            filter: state.filter.clone(),
        }
    }

    pub fn back_class(&self) -> &'static str {
        if self.back_enabled { "paginate_previous" } else { "paginate_disabled_previous" }
    }

    pub fn next_class(&self) -> &'static str {
        if self.next_enabled { "paginate_next" } else { "paginate_disabled_next" }
    }
}
