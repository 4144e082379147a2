//! CLI commands for collab
//!
//! Every command is read-only. Handlers return the rendered text so that
//! `main` stays a thin dispatcher.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::artifact::PROJECTS_DIR;
use crate::journal::load_journal;
use crate::manifest::{load_all_projects, load_contributors};
use crate::models::{Availability, Journal, LoadedProject};
use crate::output::{render_json, truncate, OutputFormat, Table};
use crate::registry::load_registry;
use crate::validation::{resolve_project, ValidationReport};

/// Rendered output plus the process exit status it implies
#[derive(Debug)]
pub struct CommandOutput {
    pub text: String,
    pub exit_code: i32,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self { text, exit_code: 0 }
    }
}

/// Validate all blackboard artifacts
pub fn validate(root: &Path, format: OutputFormat) -> Result<CommandOutput> {
    let report = ValidationReport::run(root);
    let text = match format {
        OutputFormat::Json => render_json(&report.violations, format)?,
        OutputFormat::Pretty => {
            if report.is_valid() {
                "✓ No violations found".to_string()
            } else {
                let mut out = String::new();
                for violation in &report.violations {
                    out.push_str(&format!("✗ {}\n", violation));
                }
                out.push_str(&format!("\n{} violation(s)", report.violations.len()));
                out
            }
        }
    };
    Ok(CommandOutput {
        text,
        exit_code: report.exit_code(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectSummary<'a> {
    dir_name: &'a str,
    name: &'a str,
    maintainer: &'a str,
    status: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    project_type: Option<&'a str>,
}

impl<'a> From<&'a LoadedProject> for ProjectSummary<'a> {
    fn from(loaded: &'a LoadedProject) -> Self {
        Self {
            dir_name: &loaded.dir_name,
            name: loaded.project.name_or_empty(),
            maintainer: loaded.project.maintainer_or_empty(),
            status: loaded.project.status_or_empty(),
            project_type: loaded.project.project_type.as_deref(),
        }
    }
}

/// List all projects with a parseable manifest
pub fn project_list(root: &Path, format: OutputFormat) -> Result<CommandOutput> {
    let projects = load_all_projects(root)?;
    let summaries: Vec<ProjectSummary<'_>> = projects.iter().map(ProjectSummary::from).collect();

    let text = match format {
        OutputFormat::Json => render_json(&summaries, format)?,
        OutputFormat::Pretty => {
            if summaries.is_empty() {
                return Ok(CommandOutput::ok("No projects found.".to_string()));
            }
            let mut table = Table::new(&[
                ("DIRECTORY", 24),
                ("NAME", 24),
                ("MAINTAINER", 14),
                ("STATUS", 13),
                ("TYPE", 14),
            ]);
            for s in &summaries {
                table.row([
                    s.dir_name,
                    s.name,
                    s.maintainer,
                    s.status,
                    s.project_type.unwrap_or("-"),
                ]);
            }
            table.render()
        }
    };
    Ok(CommandOutput::ok(text))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JournalSummary<'a> {
    maintainer: &'a str,
    entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_title: Option<&'a str>,
}

impl<'a> From<&'a Journal> for JournalSummary<'a> {
    fn from(journal: &'a Journal) -> Self {
        let latest = journal.latest_entry();
        Self {
            maintainer: &journal.maintainer,
            entries: journal.entries.len(),
            latest_date: latest.map(|e| e.date.as_str()),
            latest_title: latest.map(|e| e.title.as_str()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDetail<'a> {
    dir_name: &'a str,
    project: &'a crate::models::Project,
    journal: JournalSummary<'a>,
}

/// Show one project's manifest and journal summary
pub fn project_status(root: &Path, name: &str, format: OutputFormat) -> Result<CommandOutput> {
    let projects = load_all_projects(root)?;
    let loaded = find_project(name, &projects)?;
    let journal = load_journal(&root.join(PROJECTS_DIR).join(&loaded.dir_name));

    let detail = ProjectDetail {
        dir_name: &loaded.dir_name,
        project: &loaded.project,
        journal: JournalSummary::from(&journal),
    };

    let text = match format {
        OutputFormat::Json => render_json(&detail, format)?,
        OutputFormat::Pretty => {
            let p = &loaded.project;
            let mut out = format!("Project: {}\n{}\n", loaded.dir_name, "=".repeat(50));
            out.push_str(&format!("Name:       {}\n", p.name_or_empty()));
            out.push_str(&format!("Maintainer: {}\n", p.maintainer_or_empty()));
            out.push_str(&format!("Status:     {}\n", p.status_or_empty()));
            out.push_str(&format!("Created:    {}\n", p.created.as_deref().unwrap_or("")));
            out.push_str(&format!("License:    {}\n", p.license.as_deref().unwrap_or("")));
            if let Some(kind) = &p.project_type {
                out.push_str(&format!("Type:       {}\n", kind));
            }
            if let Some(contributors) = &p.contributors {
                out.push_str(&format!("\nContributors: {}\n", contributors.len()));
                for (handle, c) in contributors.iter() {
                    out.push_str(&format!(
                        "  {} ({})\n",
                        handle,
                        c.zone.as_deref().unwrap_or("no zone")
                    ));
                }
            }
            out.push_str(&format!("\nJournal entries: {}", detail.journal.entries));
            if let (Some(date), Some(title)) = (detail.journal.latest_date, detail.journal.latest_title) {
                out.push_str(&format!("\nLatest:          {} — {}", date, title));
            }
            out
        }
    };
    Ok(CommandOutput::ok(text))
}

/// Print the parsed journal of one project
pub fn journal_show(root: &Path, name: &str, format: OutputFormat) -> Result<CommandOutput> {
    let projects = load_all_projects(root)?;
    let loaded = find_project(name, &projects)?;
    let journal = load_journal(&root.join(PROJECTS_DIR).join(&loaded.dir_name));

    let text = match format {
        OutputFormat::Json => render_json(&journal, format)?,
        OutputFormat::Pretty => {
            let mut out = format!("Journal: {} (maintainer {})\n", loaded.dir_name, journal.maintainer);
            if journal.entries.is_empty() {
                out.push_str("No entries.");
                return Ok(CommandOutput::ok(out));
            }
            let mut table = Table::new(&[
                ("DATE", 10),
                ("PHASE", 12),
                ("AUTHOR", 24),
                ("ISSUES", 12),
                ("TITLE", 36),
            ]);
            for entry in &journal.entries {
                table.row([
                    entry.date.clone(),
                    entry.phase.clone(),
                    entry.author.clone(),
                    entry.issues.join(","),
                    entry.title.clone(),
                ]);
            }
            out.push_str(&table.render());
            out
        }
    };
    Ok(CommandOutput::ok(text))
}

/// Print both registry tables
pub fn registry_show(root: &Path, format: OutputFormat) -> Result<CommandOutput> {
    let registry = load_registry(root)?;

    let text = match format {
        OutputFormat::Json => render_json(&registry, format)?,
        OutputFormat::Pretty => {
            let mut projects = Table::new(&[
                ("PROJECT", 24),
                ("MAINTAINER", 14),
                ("STATUS", 13),
                ("CONTRIBUTORS", 30),
            ]);
            for row in &registry.projects {
                projects.row([&row.name, &row.maintainer, &row.status, &row.contributors]);
            }
            let mut agents = Table::new(&[
                ("AGENT", 16),
                ("OPERATOR", 14),
                ("PLATFORM", 18),
                ("AVAILABILITY", 12),
                ("CURRENT WORK", 24),
            ]);
            for row in &registry.agents {
                agents.row([
                    &row.agent,
                    &row.operator,
                    &row.platform,
                    &row.availability,
                    &row.current_work,
                ]);
            }
            format!(
                "Active Projects ({})\n{}\nAgents ({})\n{}",
                registry.projects.len(),
                projects.render(),
                registry.agents.len(),
                agents.render()
            )
        }
    };
    Ok(CommandOutput::ok(text))
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Overview {
    projects: usize,
    projects_by_status: BTreeMap<String, usize>,
    contributors: usize,
    contributors_by_zone: BTreeMap<String, usize>,
    open_for_work: usize,
    registry_projects: usize,
    agents: usize,
    violations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_activity: Option<LatestActivity>,
}

#[derive(Debug, Serialize)]
struct LatestActivity {
    project: String,
    date: String,
    title: String,
}

/// Blackboard-wide overview
pub fn status(root: &Path, format: OutputFormat) -> Result<CommandOutput> {
    let projects = load_all_projects(root)?;
    let mut overview = Overview {
        projects: projects.len(),
        ..Default::default()
    };

    let mut latest: Option<(chrono::NaiveDate, LatestActivity)> = None;
    for loaded in &projects {
        let status = match loaded.project.status_or_empty() {
            "" => "unknown",
            s => s,
        };
        *overview.projects_by_status.entry(status.to_string()).or_default() += 1;

        let journal = load_journal(&root.join(PROJECTS_DIR).join(&loaded.dir_name));
        if let Some(entry) = journal.latest_entry() {
            let date = entry.parsed_date();
            if date > latest.as_ref().map(|(d, _)| *d) {
                latest = date.map(|d| {
                    (
                        d,
                        LatestActivity {
                            project: loaded.dir_name.clone(),
                            date: entry.date.clone(),
                            title: entry.title.clone(),
                        },
                    )
                });
            }
        }
    }
    overview.latest_activity = latest.map(|(_, activity)| activity);

    // Roster and registry are optional for an overview; validation reports their absence.
    if let Ok(roster) = load_contributors(root) {
        if let Some(contributors) = &roster.contributors {
            overview.contributors = contributors.len();
            for (_, c) in contributors.iter() {
                let zone = c.zone.as_deref().unwrap_or("unknown");
                *overview.contributors_by_zone.entry(zone.to_string()).or_default() += 1;
                if c.availability.as_deref().and_then(|a| a.parse::<Availability>().ok()) == Some(Availability::Open) {
                    overview.open_for_work += 1;
                }
            }
        }
    }
    if let Ok(registry) = load_registry(root) {
        overview.registry_projects = registry.projects.len();
        overview.agents = registry.agents.len();
    }
    overview.violations = ValidationReport::run(root).violations.len();

    let text = match format {
        OutputFormat::Json => render_json(&overview, format)?,
        OutputFormat::Pretty => {
            let mut out = format!("Blackboard: {}\n{}\n", root.display(), "=".repeat(50));
            out.push_str(&format!("Projects:      {}\n", overview.projects));
            for (status, count) in &overview.projects_by_status {
                out.push_str(&format!("  {:<13} {}\n", status, count));
            }
            out.push_str(&format!("Contributors:  {}\n", overview.contributors));
            for (zone, count) in &overview.contributors_by_zone {
                out.push_str(&format!("  {:<13} {}\n", zone, count));
            }
            out.push_str(&format!("Open for work: {}\n", overview.open_for_work));
            out.push_str(&format!("Agents:        {}\n", overview.agents));
            out.push_str(&format!("Violations:    {}", overview.violations));
            if let Some(activity) = &overview.latest_activity {
                out.push_str(&format!(
                    "\nLatest:        {} {} ({})",
                    activity.date,
                    truncate(&activity.title, 40),
                    activity.project
                ));
            }
            out
        }
    };
    Ok(CommandOutput::ok(text))
}

fn find_project<'a>(name: &str, projects: &'a [LoadedProject]) -> Result<&'a LoadedProject> {
    resolve_project(name, projects).with_context(|| format!("Project not found: {}", name))
}
