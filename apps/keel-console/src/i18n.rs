//! Message catalog for console strings, looked up by dotted key.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "zh_cn" | "cn" => Locale::Zh,
            _ => Locale::En,
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("yes", "Yes"),
    ("no", "No"),
    ("ok", "OK"),
    ("question.sure", "Are you sure?"),
    ("common.information", "Information"),
    ("common.error.transport", "The management server could not be reached."),
    ("common.error.decode", "The management server sent an unreadable response."),
    ("common.error.internal", "Internal console error."),
    ("license.title", "License"),
    ("license.none", "No license is installed."),
    ("license.add", "Add License"),
    ("license.update", "Update License"),
    ("license.delete", "Delete License"),
    ("license.add.header", "Add License"),
    ("license.update.header", "Update License"),
    ("license.delete.header", "Delete License"),
    ("license.field.id", "Mac"),
    ("license.field.version", "Version"),
    ("license.field.date1", "CommencementDate"),
    ("license.field.date2", "ExpiryDate"),
    ("license.field.nodes", "Nodes"),
    ("license.field.audit", "Audit Items"),
    ("license.upload.title", "Upload License"),
    ("license.upload.submit", "Preview"),
    ("license.upload.staged", "License file staged. Confirm the update to install it."),
    ("license.upload.detail", "Failed to load license details."),
    ("license.upload.failed", "License upload failed."),
    ("license.upload.error.count", "Select exactly one license file."),
    ("license.upload.error.size", "The license file is too large."),
    ("license.upload.error.read", "The license file could not be read."),
    ("logs.title", "Logs"),
    ("logs.column.id", "ID"),
    ("logs.column.time", "Time"),
    ("logs.column.devel", "Level"),
    ("logs.column.cont", "Content"),
    ("logs.table.log.fail", "Failed to load logs."),
    ("logs.noData", "No logs to display."),
    ("logs.newLogs", "New logs are available. Refresh to see them."),
    ("logs.refresh", "Refresh"),
    ("logs.filter.apply", "Filter"),
    ("logs.total", "Logs seen"),
    ("admin.users.title", "Users"),
    ("admin.users.editButton", "Edit User"),
    ("admin.users.username", "Username"),
    ("admin.users.admin", "Admin"),
    ("admin.users.oldPassword", "Old Password"),
    ("admin.users.newPassword", "New Password"),
    ("admin.users.newPasswordRetype", "Retype New Password"),
    ("admin.users.ldap", "LDAP user; passwords are managed by the directory."),
    ("admin.users.passwordsMismatch", "Passwords do not match."),
    ("admin.users.passwordPairRequired", "Both the old and the new password are required."),
    ("admin.users.saved", "User saved."),
    ("dashboard.clusterMetrics.memory", "Memory Usage"),
    ("hosts.host.metrics.memory.displayNames.mem_used", "Used"),
    ("hosts.host.metrics.disk.displayNames.disk_total", "Total"),
    ("hosts.host.metrics.memory.displayNames.mem_shared", "Shared"),
    ("hosts.host.metrics.memory.displayNames.mem_buffers", "Buffers"),
    ("hosts.host.metrics.memory.displayNames.swap_free", "Swap"),
    ("hosts.host.metrics.memory.displayNames.mem_cached", "Cached"),
    ("charts.heatmap.title", "Heatmaps"),
    ("charts.heatmap.loading", "Loading..."),
    ("charts.heatmap.rack", "Rack"),
    ("charts.heatmap.category.host", "Host"),
    ("charts.heatmap.metric.diskUsed", "Host Disk Space Used %"),
    ("charts.heatmap.metric.memoryUsed", "Host Memory Used %"),
    ("charts.heatmap.metric.cpuWait", "Host CPU Wait I/O %"),
    ("charts.heatmap.category.hdfs", "HDFS"),
    ("charts.heatmap.metric.hdfsBytesRead", "HDFS Bytes Read"),
    ("charts.heatmap.metric.hdfsBytesWritten", "HDFS Bytes Written"),
    ("services.spark.title", "Spark"),
    ("services.spark.server", "Spark Server"),
    ("services.spark.workers", "Spark Workers"),
    ("services.spark.live", "live"),
    ("services.service.summary.viewHost", "View Host"),
    ("services.service.summary.viewHosts", "View Hosts"),
];

const ZH: &[(&str, &str)] = &[
    ("yes", "是"),
    ("no", "否"),
    ("ok", "确定"),
    ("question.sure", "确定吗？"),
    ("common.information", "信息"),
    ("common.error.transport", "无法连接管理服务器。"),
    ("common.error.decode", "管理服务器返回了无法解析的响应。"),
    ("common.error.internal", "控制台内部错误。"),
    ("license.title", "许可证"),
    ("license.none", "未安装许可证。"),
    ("license.add", "添加许可证"),
    ("license.update", "更新许可证"),
    ("license.delete", "删除许可证"),
    ("license.add.header", "添加许可证"),
    ("license.update.header", "更新许可证"),
    ("license.delete.header", "删除许可证"),
    ("license.field.id", "Mac"),
    ("license.field.version", "版本"),
    ("license.field.date1", "生效日期"),
    ("license.field.date2", "失效日期"),
    ("license.field.nodes", "节点数"),
    ("license.field.audit", "审计记录"),
    ("license.upload.title", "上传许可证"),
    ("license.upload.submit", "预览"),
    ("license.upload.staged", "许可证文件已就绪，请确认更新。"),
    ("license.upload.detail", "获取许可证信息失败。"),
    ("license.upload.failed", "许可证上传失败。"),
    ("license.upload.error.count", "请选择一个许可证文件。"),
    ("license.upload.error.size", "许可证文件过大。"),
    ("license.upload.error.read", "无法读取许可证文件。"),
    ("logs.title", "日志"),
    ("logs.column.id", "编号"),
    ("logs.column.time", "时间"),
    ("logs.column.devel", "级别"),
    ("logs.column.cont", "内容"),
    ("logs.table.log.fail", "加载日志失败。"),
    ("logs.noData", "没有可显示的日志。"),
    ("logs.newLogs", "有新的日志，请刷新。"),
    ("logs.refresh", "刷新"),
    ("logs.filter.apply", "过滤"),
    ("logs.total", "已浏览日志"),
    ("admin.users.title", "用户"),
    ("admin.users.editButton", "编辑用户"),
    ("admin.users.username", "用户名"),
    ("admin.users.admin", "管理员"),
    ("admin.users.oldPassword", "旧密码"),
    ("admin.users.newPassword", "新密码"),
    ("admin.users.newPasswordRetype", "确认新密码"),
    ("admin.users.ldap", "LDAP 用户，密码由目录服务管理。"),
    ("admin.users.passwordsMismatch", "两次输入的密码不一致。"),
    ("admin.users.passwordPairRequired", "需要同时填写旧密码和新密码。"),
    ("admin.users.saved", "用户已保存。"),
    ("dashboard.clusterMetrics.memory", "内存使用"),
    ("hosts.host.metrics.memory.displayNames.mem_used", "已用"),
    ("hosts.host.metrics.disk.displayNames.disk_total", "总量"),
    ("hosts.host.metrics.memory.displayNames.mem_shared", "共享"),
    ("hosts.host.metrics.memory.displayNames.mem_buffers", "缓冲"),
    ("hosts.host.metrics.memory.displayNames.swap_free", "交换"),
    ("hosts.host.metrics.memory.displayNames.mem_cached", "缓存"),
    ("charts.heatmap.title", "热力图"),
    ("charts.heatmap.loading", "加载中..."),
    ("charts.heatmap.rack", "机架"),
    ("services.spark.title", "Spark"),
    ("services.spark.server", "Spark 服务"),
    ("services.spark.workers", "Spark 工作节点"),
    ("services.spark.live", "运行中"),
    ("services.service.summary.viewHost", "查看主机"),
    ("services.service.summary.viewHosts", "查看主机列表"),
];

/// Keyed translations for one locale, falling back to English and then to the key.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: Locale,
    primary: HashMap<&'static str, &'static str>,
    fallback: HashMap<&'static str, &'static str>,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        let table = match locale {
            Locale::En => EN,
            Locale::Zh => ZH,
        };
        Self {
            locale,
            primary: table.iter().copied().collect(),
            fallback: EN.iter().copied().collect(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn t(&self, key: &str) -> String {
        self.primary
            .get(key)
            .or_else(|| self.fallback.get(key))
            .map(|s| s.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}
