// Terminal counterparts of the console pages.

use anyhow::{Context, Result};
use console::style;
use dialoguer::Confirm;
use std::fs;
use std::path::Path;

use crate::api::{LicenseStatus, LogRecord, ManagementClient};
use crate::i18n::Catalog;
use crate::views::logs::LogsState;
use crate::views::modal::LicenseAction;
use crate::views::upload::stage_single_file;

pub fn render_license(status: &LicenseStatus, catalog: &Catalog) -> String {
    let LicenseStatus::Present(license) = status else {
        return catalog.t("license.none");
    };

    let mut lines = vec![
        format!("{}: {}", catalog.t("license.field.id"), license.id),
        format!("{}: {}", catalog.t("license.field.version"), license.version),
        format!("{}: {}", catalog.t("license.field.date1"), license.commencement),
        format!("{}: {}", catalog.t("license.field.date2"), license.expiry),
    ];
    if let Some(nodes) = license.nodes {
        lines.push(format!("{}: {}", catalog.t("license.field.nodes"), nodes));
    }
    lines.join("\n")
}

fn confirm(action: LicenseAction, catalog: &Catalog, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    println!("{}", style(catalog.t(action.header_key())).bold());
    Ok(Confirm::new()
        .with_prompt(catalog.t("question.sure"))
        .default(false)
        .interact()?)
}

pub async fn license_show(client: &ManagementClient, catalog: &Catalog) -> Result<()> {
    let status = client
        .license_status()
        .await
        .with_context(|| catalog.t("license.upload.detail"))?;
    println!("{}", style(catalog.t("license.title")).bold().cyan());
    println!("{}", render_license(&status, catalog));
    Ok(())
}

pub async fn license_update(
    client: &ManagementClient,
    catalog: &Catalog,
    file: Option<&Path>,
    max_bytes: usize,
    yes: bool,
) -> Result<()> {
    let content = match file {
        Some(path) => {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read license file {}", path.display()))?;
            let name = path.display().to_string();
            Some(stage_single_file(vec![(name, bytes)], max_bytes)?.content)
        }
        None => None,
    };

    if !confirm(LicenseAction::Update, catalog, yes)? {
        return Ok(());
    }
    client.update_license(content.as_deref()).await?;
    println!("{}", style(catalog.t("license.update")).green());
    Ok(())
}

pub async fn license_delete(client: &ManagementClient, catalog: &Catalog, yes: bool) -> Result<()> {
    if !confirm(LicenseAction::Delete, catalog, yes)? {
        return Ok(());
    }
    client.delete_license().await?;
    println!("{}", style(catalog.t("license.delete")).green());
    Ok(())
}

/// Walks `pages` pages back from the newest log, following server cursors.
pub async fn page_logs(client: &ManagementClient, pages: usize) -> Result<Vec<LogRecord>> {
    let mut state = LogsState::default();
    state.update_logs_by_click();
    let last_id = client.last_log_id().await?.unwrap_or_default();
    state.observe_last_id(&last_id);

    let now = chrono::Utc::now().timestamp_millis().to_string();
    let mut query = Some(state.initialize_pagination(&now));
    let mut records = Vec::new();

    for _ in 0..pages.max(1) {
        let Some(current) = query.take() else { break };
        state.receive_page(client.fetch_logs(&current).await?);
        records.extend(state.content.iter().cloned());
        query = state.click_next();
    }
    Ok(records)
}

pub async fn logs(client: &ManagementClient, catalog: &Catalog, pages: usize) -> Result<()> {
    let records = page_logs(client, pages)
        .await
        .with_context(|| catalog.t("logs.table.log.fail"))?;

    if records.is_empty() {
        println!("{}", catalog.t("logs.noData"));
    }
    for log in records {
        println!(
            "{} {} {} {}",
            style(log.id).dim(),
            log.time,
            style(log.level).yellow(),
            log.content
        );
    }
    Ok(())
}
