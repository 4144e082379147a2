//! Blackboard validation
//!
//! Four passes run in a fixed order and their findings are concatenated:
//! 1. structural checks on every loaded `PROJECT.yaml`
//! 2. the root `CONTRIBUTORS.yaml` roster
//! 3. every project's `JOURNAL.md` entries
//! 4. `REGISTRY.md` against the manifests
//!
//! Findings are data. Only an unreadable roster short-circuits its own pass.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::artifact::{CONTRIBUTORS_FILE, JOURNAL_FILE, PROJECTS_DIR, PROJECT_FILE, REGISTRY_FILE};
use crate::journal::load_journal;
use crate::manifest::{load_all_projects, load_contributors};
use crate::models::{
    is_blank, Contributor, ContributorMap, JournalPhase, LoadedProject, Project, ProjectStatus,
    TrustZone, Violation,
};
use crate::registry::load_registry;

pub const VALID_LICENSES: [&str; 4] = ["MIT", "Apache-2.0", "BSD-2-Clause", "BSD-3-Clause"];

/// Outcome of a full validation run
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn run(root: &Path) -> Self {
        Self {
            violations: validate(root),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Process exit status for the caller: 0 when clean, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.is_valid() {
            0
        } else {
            1
        }
    }
}

/// Validate every artifact under `root`, in pass order
pub fn validate(root: &Path) -> Vec<Violation> {
    let projects = load_all_projects(root).unwrap_or_else(|e| {
        warn!(error = %e, "could not list projects");
        Vec::new()
    });

    let mut violations = Vec::new();
    for loaded in &projects {
        violations.extend(validate_project(&loaded.dir_name, &loaded.project));
    }
    violations.extend(validate_contributors(root));
    violations.extend(validate_journals(root, &projects));
    violations.extend(validate_consistency(root, &projects));

    debug!(
        projects = projects.len(),
        violations = violations.len(),
        "validation finished"
    );
    violations
}

/// Structural checks for a single manifest
pub fn validate_project(dir_name: &str, project: &Project) -> Vec<Violation> {
    let file = format!("{}/{}/{}", PROJECTS_DIR, dir_name, PROJECT_FILE);
    let mut violations = Vec::new();

    for field in project.missing_required_fields() {
        violations.push(
            Violation::new(&file, field, format!("Missing required field '{}'", field))
                .with_suggestion(format!("Add '{}' to {}", field, PROJECT_FILE)),
        );
    }

    if let Some(status) = project.status.as_deref().filter(|s| !s.trim().is_empty()) {
        if status.parse::<ProjectStatus>().is_err() {
            violations.push(
                Violation::new(&file, "status", format!("Invalid status '{}'", status))
                    .with_suggestion(format!("Valid values: {}", join(ProjectStatus::ALL.map(|s| s.as_str())))),
            );
        }
    }

    if let Some(license) = project.license.as_deref().filter(|l| !l.trim().is_empty()) {
        if !VALID_LICENSES.contains(&license) {
            violations.push(
                Violation::new(&file, "license", format!("Invalid license '{}'", license))
                    .with_suggestion(format!("Accepted: {}", join(VALID_LICENSES))),
            );
        }
    }

    if let Some(contributors) = &project.contributors {
        violations.extend(check_contributors(&file, ContributorScope::Manifest, contributors));
    }

    violations
}

/// Checks on the root contributor roster
pub fn validate_contributors(root: &Path) -> Vec<Violation> {
    let roster = match load_contributors(root) {
        Ok(roster) => roster,
        Err(e) => return vec![Violation::new(CONTRIBUTORS_FILE, "", e.to_string())],
    };

    match &roster.contributors {
        Some(contributors) => check_contributors(CONTRIBUTORS_FILE, ContributorScope::Roster, contributors),
        None => vec![Violation::new(CONTRIBUTORS_FILE, "contributors", "Missing 'contributors' key")
            .with_suggestion("Add top-level 'contributors:' map")],
    }
}

/// Journal entry checks for every loaded project
pub fn validate_journals(root: &Path, projects: &[LoadedProject]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for loaded in projects {
        let journal = load_journal(&root.join(PROJECTS_DIR).join(&loaded.dir_name));
        let file = format!("{}/{}/{}", PROJECTS_DIR, loaded.dir_name, JOURNAL_FILE);

        for entry in &journal.entries {
            if is_blank(Some(&entry.date)) {
                violations.push(Violation::new(&file, "date", "Entry missing date"));
            }
            if is_blank(Some(&entry.author)) {
                violations.push(
                    Violation::new(
                        &file,
                        "author",
                        format!("Entry '{} — {}' missing Author", entry.date, entry.title),
                    )
                    .with_suggestion("Add **Author:** @handle (agent: name)"),
                );
            }
            if is_blank(Some(&entry.phase)) {
                violations.push(
                    Violation::new(&file, "phase", format!("Entry '{}' missing Phase", entry.date))
                        .with_suggestion(format!(
                            "Add **Phase:** {}",
                            JournalPhase::ALL.map(|p| p.as_str()).join(" | ")
                        )),
                );
            } else if entry.phase.parse::<JournalPhase>().is_err() {
                violations.push(
                    Violation::new(
                        &file,
                        "phase",
                        format!("Invalid phase '{}' in entry '{}'", entry.phase, entry.date),
                    )
                    .with_suggestion(format!("Valid: {}", join(JournalPhase::ALL.map(|p| p.as_str())))),
                );
            }
            if is_blank(Some(&entry.status)) {
                violations.push(
                    Violation::new(&file, "status", format!("Entry '{}' missing Status", entry.date))
                        .with_suggestion("Add **Status:** one-line description"),
                );
            }
        }
    }
    violations
}

/// Registry rows against their manifests. A missing registry skips the pass.
pub fn validate_consistency(root: &Path, projects: &[LoadedProject]) -> Vec<Violation> {
    let registry = match load_registry(root) {
        Ok(registry) => registry,
        Err(e) => {
            debug!(error = %e, "registry unavailable, skipping consistency checks");
            return Vec::new();
        }
    };

    let mut violations = Vec::new();
    for row in &registry.projects {
        let Some(loaded) = resolve_project(&row.name, projects) else {
            debug!(project = %row.name, "registry row has no manifest in this checkout");
            continue;
        };
        let project = &loaded.project;

        let manifest_status = project.status_or_empty();
        if !row.status.is_empty() && !manifest_status.is_empty() && row.status != manifest_status {
            violations.push(
                Violation::new(
                    REGISTRY_FILE,
                    "status",
                    format!(
                        "Status mismatch for '{}': REGISTRY says '{}', PROJECT.yaml says '{}'",
                        row.name, row.status, manifest_status
                    ),
                )
                .with_suggestion(format!("Update {} to '{}'", REGISTRY_FILE, manifest_status)),
            );
        }

        let manifest_maintainer = project.maintainer_or_empty();
        let registry_maintainer = row.maintainer.strip_prefix('@').unwrap_or(&row.maintainer);
        if !row.maintainer.is_empty()
            && !manifest_maintainer.is_empty()
            && registry_maintainer != manifest_maintainer
        {
            violations.push(
                Violation::new(
                    REGISTRY_FILE,
                    "maintainer",
                    format!(
                        "Maintainer mismatch for '{}': REGISTRY says '{}', PROJECT.yaml says '{}'",
                        row.name, row.maintainer, manifest_maintainer
                    ),
                )
                .with_suggestion(format!("Update {} to '@{}'", REGISTRY_FILE, manifest_maintainer)),
            );
        }
    }
    violations
}

/// One strategy for pairing a registry name with a loaded manifest
pub trait NameMatcher: Sync {
    fn matches(&self, name: &str, candidate: &LoadedProject) -> bool;
}

/// Directory name equals the registry name
pub struct ByDirName;

/// Declared `name` equals the registry name
pub struct ByDeclaredName;

/// Declared `name` equals the registry name ignoring case
pub struct ByDeclaredNameIgnoreCase;

impl NameMatcher for ByDirName {
    fn matches(&self, name: &str, candidate: &LoadedProject) -> bool {
        candidate.dir_name == name
    }
}

impl NameMatcher for ByDeclaredName {
    fn matches(&self, name: &str, candidate: &LoadedProject) -> bool {
        candidate.project.name.as_deref() == Some(name)
    }
}

impl NameMatcher for ByDeclaredNameIgnoreCase {
    fn matches(&self, name: &str, candidate: &LoadedProject) -> bool {
        candidate
            .project
            .name
            .as_deref()
            .is_some_and(|declared| declared.to_lowercase() == name.to_lowercase())
    }
}

/// Matchers in priority order. Each is tried against every project before
/// the next one is consulted.
pub static NAME_MATCHERS: [&dyn NameMatcher; 3] =
    [&ByDirName, &ByDeclaredName, &ByDeclaredNameIgnoreCase];

pub fn resolve_project<'a>(name: &str, projects: &'a [LoadedProject]) -> Option<&'a LoadedProject> {
    if name.is_empty() {
        return None;
    }
    NAME_MATCHERS
        .iter()
        .find_map(|matcher| projects.iter().find(|p| matcher.matches(name, p)))
}

/// Where a contributor record lives. Field paths and wording differ between
/// a project manifest and the root roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContributorScope {
    Manifest,
    Roster,
}

impl ContributorScope {
    fn field(&self, handle: &str, key: &str) -> String {
        match self {
            ContributorScope::Manifest => format!("contributors.{}.{}", handle, key),
            ContributorScope::Roster => format!("{}.{}", handle, key),
        }
    }

    fn missing_zone(&self, handle: &str) -> String {
        match self {
            ContributorScope::Manifest => format!("Missing zone for contributor '{}'", handle),
            ContributorScope::Roster => format!("Missing zone for '{}'", handle),
        }
    }

    fn invalid_zone(&self, zone: &str, handle: &str) -> String {
        match self {
            ContributorScope::Manifest => format!("Invalid zone '{}' for '{}'", zone, handle),
            ContributorScope::Roster => format!("Invalid zone '{}'", zone),
        }
    }

    fn missing_since(&self, handle: &str) -> String {
        match self {
            ContributorScope::Manifest => format!("Missing 'since' date for contributor '{}'", handle),
            ContributorScope::Roster => format!("Missing 'since' for '{}'", handle),
        }
    }
}

fn check_contributors(file: &str, scope: ContributorScope, contributors: &ContributorMap) -> Vec<Violation> {
    contributors
        .iter()
        .flat_map(|(handle, contributor)| check_contributor(file, scope, handle, contributor))
        .collect()
}

fn check_contributor(
    file: &str,
    scope: ContributorScope,
    handle: &str,
    contributor: &Contributor,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let zone_field = scope.field(handle, "zone");

    match contributor.zone.as_deref().filter(|z| !z.trim().is_empty()) {
        None => violations.push(
            Violation::new(file, &zone_field, scope.missing_zone(handle))
                .with_suggestion("Add zone: maintainer | trusted | untrusted"),
        ),
        Some(zone) if zone.parse::<TrustZone>().is_err() => violations.push(
            Violation::new(file, &zone_field, scope.invalid_zone(zone, handle))
                .with_suggestion(format!("Valid zones: {}", join(TrustZone::ALL.map(|z| z.as_str())))),
        ),
        Some(_) => {}
    }

    if is_blank(contributor.since.as_deref()) {
        violations.push(
            Violation::new(file, scope.field(handle, "since"), scope.missing_since(handle))
                .with_suggestion("Add since: YYYY-MM-DD"),
        );
    }

    violations
}

fn join<const N: usize>(values: [&str; N]) -> String {
    values.join(", ")
}
