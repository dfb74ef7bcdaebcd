//! Subcommand execution against a loaded workbench.

use std::io::Write;

use anyhow::{Context, anyhow, bail};
use querybox_application::ports::{Clock, StateStore};
use querybox_application::{MAX_TABS, SendOutcome, Workbench, interpolate_request};
use querybox_domain::{Environment, RequestSpec, Tab};
use querybox_infrastructure::{generate_snippet, read_environments, write_export};
use tracing::debug;

use crate::cli::Command;

const NO_ENVIRONMENT: &str = "none";

/// Runs one command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error for unknown ids or names, file problems, and failed
/// sends. A failed send has already been recorded on its tab.
pub async fn run<S: StateStore, W: Write>(
    workbench: &Workbench<S>,
    clock: &dyn Clock,
    command: Command,
    out: &mut W,
) -> anyhow::Result<()> {
    debug!(?command, "running command");
    match command {
        Command::Tabs => {
            let active = workbench.active_tab_id();
            for tab in workbench.tabs() {
                write_tab(out, &tab, tab.id == active)?;
            }
        }
        Command::NewTab { method, url } => {
            let request = RequestSpec::new(method, url.unwrap_or_default());
            let id = workbench
                .create_tab_with(request)
                .ok_or_else(|| anyhow!("cannot open more than {MAX_TABS} tabs"))?;
            writeln!(out, "{id}")?;
        }
        Command::CloseTab { id } => {
            if !workbench.close_tab(&id) {
                bail!("no tab with id {id}");
            }
        }
        Command::SwitchTab { id } => {
            if !workbench.switch_tab(&id) {
                bail!("no tab with id {id}");
            }
        }
        Command::SetUrl { url } => workbench.set_url(url),
        Command::AddHeader { key, value } => {
            workbench.push_header(key, value);
        }
        Command::Send { tab } => {
            let id = tab.unwrap_or_else(|| workbench.active_tab_id());
            match workbench.send(&id).await? {
                SendOutcome::Completed(response) => {
                    writeln!(
                        out,
                        "{} {}  {} ms  {}",
                        response.status,
                        response.status_text,
                        response.time,
                        response.formatted_size()
                    )?;
                    writeln!(out)?;
                    writeln!(out, "{}", response.body)?;
                }
                SendOutcome::Failed(error) => bail!("{error}"),
                SendOutcome::Discarded => bail!("the request was superseded"),
            }
        }
        Command::Envs => {
            let active = workbench.active_environment_id();
            for env in workbench.environments() {
                write_environment(out, &env, active.as_deref() == Some(env.id.as_str()))?;
            }
        }
        Command::EnvCreate { name } => {
            let env = workbench.create_environment(name);
            writeln!(out, "{}", env.id)?;
        }
        Command::EnvSet { env, key, value } => {
            let env = find_environment(workbench, &env)?;
            workbench
                .set_variable(&env.id, key, value)
                .ok_or_else(|| anyhow!("environment {} disappeared", env.name))?;
        }
        Command::EnvUse { name } => {
            if name.eq_ignore_ascii_case(NO_ENVIRONMENT) {
                workbench.set_active_environment(None);
            } else {
                let env = find_environment(workbench, &name)?;
                workbench.set_active_environment(Some(env.id.as_str()));
            }
        }
        Command::ExportEnvs { file } => {
            let envelope = workbench.export_environments();
            write_export(&file, &envelope)
                .with_context(|| format!("failed to write {}", file.display()))?;
            writeln!(
                out,
                "Exported {} environments to {}",
                envelope.data.len(),
                file.display()
            )?;
        }
        Command::ImportEnvs { file, strategy } => {
            let environments = read_environments(&file, clock.now_millis())
                .with_context(|| format!("failed to import {}", file.display()))?;
            let summary = workbench.import_environments(&environments, strategy.into());
            writeln!(
                out,
                "Imported {} environments, skipped {}",
                summary.added, summary.skipped
            )?;
        }
        Command::History => {
            for entry in workbench.history() {
                writeln!(
                    out,
                    "{}  {} {}  {} {}",
                    entry.id, entry.method, entry.url, entry.status, entry.status_text
                )?;
            }
        }
        Command::Snippet { tab, lang, raw } => {
            let tab = match tab {
                Some(id) => workbench
                    .tab(&id)
                    .ok_or_else(|| anyhow!("no tab with id {id}"))?,
                None => workbench.active_tab(),
            };
            let variables = workbench.active_variables();
            let request = if raw || variables.is_empty() {
                tab.request
            } else {
                interpolate_request(&tab.request, &variables)
            };
            writeln!(out, "{}", generate_snippet(lang, &request))?;
        }
    }
    Ok(())
}

fn find_environment<S: StateStore>(
    workbench: &Workbench<S>,
    name: &str,
) -> anyhow::Result<Environment> {
    workbench
        .find_environment(name)
        .ok_or_else(|| anyhow!("no environment named {name}"))
}

fn write_tab(out: &mut impl Write, tab: &Tab, active: bool) -> std::io::Result<()> {
    let marker = if active { '*' } else { ' ' };
    writeln!(
        out,
        "{marker} {}  {}  {} {}  [{}]",
        tab.id,
        tab.name,
        tab.request.method,
        tab.request.url,
        tab.status()
    )
}

fn write_environment(out: &mut impl Write, env: &Environment, active: bool) -> std::io::Result<()> {
    let marker = if active { '*' } else { ' ' };
    writeln!(
        out,
        "{marker} {}  ({} variables)",
        env.name,
        env.variables.len()
    )
}
