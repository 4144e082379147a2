// Integration tests for blackboard validation
// Covers each pass, pass ordering, and the skip-vs-report policies

use anyhow::Result;
use collab::models::Violation;
use collab::{validate, ValidationReport};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) -> Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

const GOOD_PROJECT: &str = "name: Good Project
maintainer: alice
status: building
created: 2026-01-15
license: MIT
contributors:
  alice:
    zone: maintainer
    since: 2026-01-15
";

const GOOD_ROSTER: &str = "contributors:
  alice:
    zone: maintainer
    since: 2026-01-15
";

const GOOD_JOURNAL: &str = "# Good Project — Journey Log

**Maintainer:** @alice

---

## 2026-01-15 — Started

**Author:** @alice (agent: Bot)
**Phase:** Specify
**Status:** Project started
**Issues:** #1

### What Happened
- Created project

---
";

const GOOD_REGISTRY: &str = "# Registry

## Active Projects

| Project | Maintainer | Status | Source | Contributors |
|---------|-----------|--------|--------|-------------|
| good-project | @alice | building | PROJECT.yaml | @alice |

## Agent Registry (Daemon Entries)

| Agent | Operator | Platform | Skills | Availability | Current Work |
|-------|----------|----------|--------|-------------|-------------|
| Bot | @alice | PAI | TS | open | good-project |
";

fn valid_blackboard() -> Result<TempDir> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write(root, "CONTRIBUTING.md", "# Contributing\n")?;
    write(root, "projects/good-project/PROJECT.yaml", GOOD_PROJECT)?;
    write(root, "projects/good-project/JOURNAL.md", GOOD_JOURNAL)?;
    write(root, "CONTRIBUTORS.yaml", GOOD_ROSTER)?;
    write(root, "REGISTRY.md", GOOD_REGISTRY)?;
    Ok(temp)
}

fn invalid_blackboard() -> Result<TempDir> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write(root, "CONTRIBUTING.md", "# Contributing\n")?;
    write(
        root,
        "projects/bad-project/PROJECT.yaml",
        "name: Bad Project
maintainer: bob
status: wip
created: 2026-01-15
license: GPL-3.0
contributors:
  bob:
    zone: admin
    since: 2026-01-15
",
    )?;
    write(
        root,
        "CONTRIBUTORS.yaml",
        "contributors:
  bob:
    zone: admin
    since: 2026-01-15
",
    )?;
    write(
        root,
        "projects/bad-project/JOURNAL.md",
        "# Bad Project — Journey Log

**Maintainer:** @bob

---

## 2026-01-15 — Started

**Author:** @bob
**Phase:** Planning
**Status:** Started
**Issues:** #1

### What Happened
- Started

---
",
    )?;
    write(
        root,
        "REGISTRY.md",
        "# Registry

## Active Projects

| Project | Maintainer | Status | Source | Contributors |
|---------|-----------|--------|--------|-------------|
| bad-project | @bob | shipped | PROJECT.yaml | @bob |

## Agent Registry (Daemon Entries)

| Agent | Operator | Platform | Skills | Availability | Current Work |
|-------|----------|----------|--------|-------------|-------------|
",
    )?;
    Ok(temp)
}

fn find<'a>(violations: &'a [Violation], pred: impl Fn(&Violation) -> bool) -> Option<&'a Violation> {
    violations.iter().find(|v| pred(v))
}

#[test]
fn test_valid_blackboard_has_no_violations() -> Result<()> {
    let temp = valid_blackboard()?;
    let report = ValidationReport::run(temp.path());

    assert_eq!(report.violations, vec![]);
    assert_eq!(report.exit_code(), 0);
    Ok(())
}

#[test]
fn test_invalid_project_status() -> Result<()> {
    let temp = invalid_blackboard()?;
    let v = validate(temp.path());

    let status = find(&v, |x| x.field == "status" && x.file.contains("PROJECT.yaml"))
        .expect("status violation");
    assert!(status.message.contains("wip"));
    Ok(())
}

#[test]
fn test_invalid_license() -> Result<()> {
    let temp = invalid_blackboard()?;
    let v = validate(temp.path());

    let license = find(&v, |x| x.field == "license").expect("license violation");
    assert!(license.message.contains("GPL-3.0"));
    Ok(())
}

#[test]
fn test_invalid_zone_in_project_and_roster() -> Result<()> {
    let temp = invalid_blackboard()?;
    let v = validate(temp.path());

    let project_zone = find(&v, |x| x.field == "contributors.bob.zone" && x.file.contains("PROJECT"))
        .expect("project zone violation");
    assert!(project_zone.message.contains("admin"));

    assert!(find(&v, |x| x.field == "bob.zone" && x.file == "CONTRIBUTORS.yaml").is_some());
    Ok(())
}

#[test]
fn test_invalid_journal_phase() -> Result<()> {
    let temp = invalid_blackboard()?;
    let v = validate(temp.path());

    let phase = find(&v, |x| x.field == "phase" && x.file.contains("JOURNAL")).expect("phase violation");
    assert!(phase.message.contains("Planning"));
    assert_eq!(phase.file, "projects/bad-project/JOURNAL.md");
    Ok(())
}

#[test]
fn test_registry_status_mismatch() -> Result<()> {
    let temp = invalid_blackboard()?;
    let v = validate(temp.path());

    let registry = find(&v, |x| x.file == "REGISTRY.md" && x.field == "status").expect("registry violation");
    assert!(registry.message.contains("shipped"));
    assert!(registry.message.contains("wip"));
    assert_eq!(registry.suggestion.as_deref(), Some("Update REGISTRY.md to 'wip'"));
    Ok(())
}

#[test]
fn test_violations_follow_pass_order() -> Result<()> {
    let temp = invalid_blackboard()?;
    let report = ValidationReport::run(temp.path());

    let summary: Vec<(&str, &str)> = report
        .violations
        .iter()
        .map(|v| (v.file.as_str(), v.field.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("projects/bad-project/PROJECT.yaml", "status"),
            ("projects/bad-project/PROJECT.yaml", "license"),
            ("projects/bad-project/PROJECT.yaml", "contributors.bob.zone"),
            ("CONTRIBUTORS.yaml", "bob.zone"),
            ("projects/bad-project/JOURNAL.md", "phase"),
            ("REGISTRY.md", "status"),
        ]
    );
    assert_eq!(report.exit_code(), 1);
    Ok(())
}

#[test]
fn test_registry_matches_declared_name_ignoring_case() -> Result<()> {
    let temp = valid_blackboard()?;
    write(
        temp.path(),
        "projects/odd-dir/PROJECT.yaml",
        "name: Signal Tower
maintainer: alice
status: wip
created: 2026-02-01
license: MIT
contributors:
  alice:
    zone: maintainer
    since: 2026-02-01
",
    )?;
    write(
        temp.path(),
        "REGISTRY.md",
        "## Active Projects

| Project | Maintainer | Status | Source | Contributors |
|---|---|---|---|---|
| signal tower | @alice | shipped | PROJECT.yaml | @alice |
",
    )?;

    let registry: Vec<_> = validate(temp.path())
        .into_iter()
        .filter(|v| v.file == "REGISTRY.md")
        .collect();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry[0].field, "status");
    assert!(registry[0].message.contains("shipped"));
    assert!(registry[0].message.contains("wip"));
    Ok(())
}

#[test]
fn test_registry_maintainer_mismatch_strips_at() -> Result<()> {
    let temp = valid_blackboard()?;
    write(
        temp.path(),
        "REGISTRY.md",
        "## Active Projects
| Project | Maintainer | Status | Source | Contributors |
|---|---|---|---|---|
| good-project | @carol | building | PROJECT.yaml | @carol |
",
    )?;

    let v = validate(temp.path());
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].field, "maintainer");
    assert_eq!(v[0].suggestion.as_deref(), Some("Update REGISTRY.md to '@alice'"));
    Ok(())
}

#[test]
fn test_unresolved_registry_rows_are_skipped() -> Result<()> {
    let temp = valid_blackboard()?;
    write(
        temp.path(),
        "REGISTRY.md",
        "## Active Projects
| Project | Maintainer | Status | Source | Contributors |
|---|---|---|---|---|
| elsewhere | @zed | archived | [link](https://example.com) | @zed |
",
    )?;

    assert_eq!(validate(temp.path()), vec![]);
    Ok(())
}

#[test]
fn test_missing_registry_skips_consistency_pass() -> Result<()> {
    let temp = valid_blackboard()?;
    fs::remove_file(temp.path().join("REGISTRY.md"))?;

    assert_eq!(validate(temp.path()), vec![]);
    Ok(())
}

#[test]
fn test_directory_without_manifest_is_ignored() -> Result<()> {
    let temp = valid_blackboard()?;
    fs::create_dir_all(temp.path().join("projects/empty-dir"))?;
    write(temp.path(), "projects/empty-dir/JOURNAL.md", "## 2026-01-01 — x\n**Phase:** Nope\n")?;

    assert_eq!(validate(temp.path()), vec![]);
    Ok(())
}

#[test]
fn test_absent_journal_adds_no_violations() -> Result<()> {
    let temp = valid_blackboard()?;
    fs::remove_file(temp.path().join("projects/good-project/JOURNAL.md"))?;

    assert_eq!(validate(temp.path()), vec![]);
    Ok(())
}

#[test]
fn test_missing_roster_is_single_violation() -> Result<()> {
    let temp = valid_blackboard()?;
    fs::remove_file(temp.path().join("CONTRIBUTORS.yaml"))?;

    let v = validate(temp.path());
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].file, "CONTRIBUTORS.yaml");
    assert_eq!(v[0].field, "");
    assert!(v[0].message.contains("CONTRIBUTORS.yaml not found"));
    assert_eq!(v[0].suggestion, None);
    Ok(())
}

#[test]
fn test_malformed_roster_does_not_stop_later_passes() -> Result<()> {
    let temp = invalid_blackboard()?;
    write(temp.path(), "CONTRIBUTORS.yaml", "contributors: [unclosed\n")?;

    let v = validate(temp.path());
    let roster: Vec<_> = v.iter().filter(|x| x.file == "CONTRIBUTORS.yaml").collect();
    assert_eq!(roster.len(), 1);
    assert!(roster[0].message.contains("Failed to parse CONTRIBUTORS.yaml"));
    assert!(find(&v, |x| x.file.ends_with("JOURNAL.md")).is_some());
    assert!(find(&v, |x| x.file == "REGISTRY.md").is_some());
    Ok(())
}

#[test]
fn test_roster_without_contributors_key() -> Result<()> {
    let temp = valid_blackboard()?;
    write(temp.path(), "CONTRIBUTORS.yaml", "maintainers: []\n")?;

    let v = validate(temp.path());
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].field, "contributors");
    Ok(())
}

#[test]
fn test_missing_required_field_reported_by_name() -> Result<()> {
    let temp = valid_blackboard()?;
    write(
        temp.path(),
        "projects/good-project/PROJECT.yaml",
        &GOOD_PROJECT.replace("license: MIT\n", ""),
    )?;

    let v = validate(temp.path());
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].field, "license");
    assert!(v[0].message.contains("license"));
    Ok(())
}

#[test]
fn test_journal_missing_metadata() -> Result<()> {
    let temp = valid_blackboard()?;
    write(
        temp.path(),
        "projects/good-project/JOURNAL.md",
        "**Maintainer:** @alice\n\n## 2026-02-02 — Quiet day\n\nNothing recorded.\n",
    )?;

    let fields: Vec<_> = validate(temp.path()).into_iter().map(|v| v.field).collect();
    assert_eq!(fields, vec!["author", "phase", "status"]);
    Ok(())
}

#[test]
fn test_violations_serialize_without_empty_suggestion() -> Result<()> {
    let temp = valid_blackboard()?;
    fs::remove_file(temp.path().join("CONTRIBUTORS.yaml"))?;

    let json = serde_json::to_value(validate(temp.path()))?;
    let first = &json[0];
    assert_eq!(first["file"], "CONTRIBUTORS.yaml");
    assert!(first.get("suggestion").is_none());
    Ok(())
}

#[test]
fn test_wrong_shape_optional_fields_still_validated() -> Result<()> {
    let temp = valid_blackboard()?;
    write(
        temp.path(),
        "projects/odd-shapes/PROJECT.yaml",
        "name: Odd Shapes
maintainer: bob
status: wip
created: 2026-01-20
license: GPL
source: bob/odd-shapes
paths: src/
contributors:
  bob:
    zone: admin
    since: 2026-01-20
    tags: typescript
",
    )?;
    write(
        temp.path(),
        "projects/odd-shapes/JOURNAL.md",
        "## 2026-01-20 — Started\n**Author:** @bob\n**Phase:** Planning\n**Status:** ok\n",
    )?;

    let report = ValidationReport::run(temp.path());
    let fields: Vec<_> = report
        .violations
        .iter()
        .map(|v| (v.file.as_str(), v.field.as_str()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("projects/odd-shapes/PROJECT.yaml", "status"),
            ("projects/odd-shapes/PROJECT.yaml", "license"),
            ("projects/odd-shapes/PROJECT.yaml", "contributors.bob.zone"),
            ("projects/odd-shapes/JOURNAL.md", "phase"),
        ]
    );
    assert_eq!(report.exit_code(), 1);
    Ok(())
}
