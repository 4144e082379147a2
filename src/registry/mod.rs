//! `REGISTRY.md` table extraction

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::artifact;
use crate::error::Result;
use crate::models::{Registry, RegistryAgent, RegistryProject};

pub const PROJECTS_HEADING: &str = "Active Projects";
pub const AGENTS_HEADING: &str = "Agent Registry (Daemon Entries)";

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid regex"));

/// Load and parse `REGISTRY.md` from the blackboard root
pub fn load_registry(root: &Path) -> Result<Registry> {
    let raw = artifact::REGISTRY.read(root)?.unwrap_or_default();
    Ok(parse_registry(&raw))
}

pub fn parse_registry(raw: &str) -> Registry {
    let projects = table_rows(raw, PROJECTS_HEADING)
        .into_iter()
        .map(|cells| {
            let mut cells = cells.into_iter();
            let mut next = || cells.next().unwrap_or_default();
            RegistryProject {
                name: next(),
                maintainer: next(),
                status: next(),
                source: next(),
                contributors: next(),
            }
        })
        .collect();

    let agents = table_rows(raw, AGENTS_HEADING)
        .into_iter()
        .map(|cells| {
            let mut cells = cells.into_iter();
            let mut next = || cells.next().unwrap_or_default();
            RegistryAgent {
                agent: next(),
                operator: next(),
                platform: next(),
                skills: next(),
                availability: next(),
                current_work: next(),
            }
        })
        .collect();

    Registry { projects, agents }
}

/// Body rows of the pipe table under the level-2 heading `heading`.
///
/// The capture runs to the next level-2 heading or end of text. An absent
/// heading yields no rows.
pub fn table_rows(raw: &str, heading: &str) -> Vec<Vec<String>> {
    let mut lines = raw.lines();
    if !lines.any(|line| level_two_text(line) == Some(heading)) {
        return Vec::new();
    }

    lines
        .take_while(|line| !is_section_break(line))
        .map(str::trim)
        .filter(|line| line.starts_with('|'))
        .skip(2)
        .map(split_row)
        .collect()
}

fn split_row(line: &str) -> Vec<String> {
    let mut cells: Vec<&str> = line.split('|').collect();
    if cells.first().is_some_and(|c| c.trim().is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.trim().is_empty()) {
        cells.pop();
    }
    cells.into_iter().map(clean_cell).collect()
}

/// Trim a cell and reduce `[text](url)` links to `text`
pub fn clean_cell(cell: &str) -> String {
    MARKDOWN_LINK.replace_all(cell.trim(), "$1").into_owned()
}

fn level_two_text(line: &str) -> Option<&str> {
    line.trim_end()
        .strip_prefix("##")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim)
}

/// Only a level-2 heading closes a table; `#` and `###` lines do not.
fn is_section_break(line: &str) -> bool {
    level_two_text(line).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "# Community Registry

## Active Projects

| Project | Maintainer | Status | Source | Contributors |
|---------|-----------|--------|--------|-------------|
| test-tool | @alice | shipped | [PROJECT.yaml](projects/test-tool/PROJECT.yaml) | @alice |
| test-upstream | @bob | building | [PROJECT.yaml](projects/test-upstream/PROJECT.yaml) | [@bob](u/bob), [@alice](u/alice) |

## Agent Registry (Daemon Entries)

| Agent | Operator | Platform | Skills | Availability | Current Work |
|-------|----------|----------|--------|-------------|-------------|
| TestBot | @alice | PAI + Claude | TypeScript, testing | open | test-tool |
| BuildBot | @bob | PAI + Maestro | Security | busy | test-upstream |
";

    #[test]
    fn test_parses_project_rows() {
        let registry = parse_registry(SAMPLE);
        assert_eq!(registry.projects.len(), 2);
        assert_eq!(
            registry.projects[0],
            RegistryProject {
                name: "test-tool".into(),
                maintainer: "@alice".into(),
                status: "shipped".into(),
                source: "PROJECT.yaml".into(),
                contributors: "@alice".into(),
            }
        );
    }

    #[test]
    fn test_rewrites_every_link_in_a_cell() {
        let registry = parse_registry(SAMPLE);
        assert_eq!(registry.projects[1].contributors, "@bob, @alice");
    }

    #[test]
    fn test_parses_agent_rows() {
        let registry = parse_registry(SAMPLE);
        assert_eq!(registry.agents.len(), 2);
        assert_eq!(registry.agents[0].agent, "TestBot");
        assert_eq!(registry.agents[0].current_work, "test-tool");
        assert_eq!(registry.agents[1].availability, "busy");
    }

    #[test]
    fn test_missing_heading_yields_empty_table() {
        let registry = parse_registry("# Registry\n\n## Active Projects\n\n| A | B |\n|---|---|\n| x | y |\n");
        assert!(registry.agents.is_empty());
        assert_eq!(registry.projects.len(), 1);
    }

    #[test]
    fn test_short_rows_fill_with_empty_cells() {
        let raw = "## Active Projects\n| P | M | S |\n|---|---|---|\n| only-name |\n";
        let registry = parse_registry(raw);
        assert_eq!(registry.projects[0].name, "only-name");
        assert_eq!(registry.projects[0].maintainer, "");
        assert_eq!(registry.projects[0].contributors, "");
    }

    #[test]
    fn test_table_stops_at_next_section() {
        let raw = "## Active Projects\n| P |\n|---|\n| a |\n\n## Archived\n| P |\n|---|\n| b |\n";
        let rows = table_rows(raw, PROJECTS_HEADING);
        assert_eq!(rows, vec![vec!["a".to_string()]]);
    }

    #[test]
    fn test_only_level_two_heading_ends_table() {
        let raw = "## Active Projects\n| P |\n|---|\n| a |\n# Appendix\n### Detail\n| b |\n## Next\n| c |\n";
        let rows = table_rows(raw, PROJECTS_HEADING);
        assert_eq!(rows, vec![vec!["a".to_string()], vec!["b".to_string()]]);
    }

    #[test]
    fn test_heading_must_match_exactly() {
        let raw = "## Active Projects (legacy)\n| P |\n|---|\n| a |\n";
        assert!(table_rows(raw, PROJECTS_HEADING).is_empty());
    }

    #[test]
    fn test_clean_cell_leaves_plain_brackets() {
        assert_eq!(clean_cell("  [draft] notes "), "[draft] notes");
        assert_eq!(clean_cell("[a](x) and [b](y)"), "a and b");
    }
}
