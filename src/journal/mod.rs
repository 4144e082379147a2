//! `JOURNAL.md` extraction
//!
//! A single pass over the document lines drives a small state machine:
//!
//! ```text
//! SeekingHeading --(## YYYY-MM-DD - title)--> InMetadata
//! InMetadata     --(### Heading)-----------> InSection
//! InSection      --(### Heading)-----------> InSection
//! InSection      --(---)-------------------> InMetadata
//! any            --(## YYYY...)------------> InMetadata | SeekingHeading
//! ```
//!
//! A `## YYYY...` line whose text is not `date <dash> title` drops its whole
//! block; the machine returns to `SeekingHeading` until the next boundary.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::artifact;
use crate::models::{Journal, JournalEntry};

static ENTRY_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})\s*[—–-]\s*(.+)$").expect("valid regex"));

static FIELD_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*([A-Za-z][A-Za-z ]*):\*\*(.*)$").expect("valid regex"));

static ISSUE_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\d+)").expect("valid regex"));

const WHAT_HAPPENED: &str = "What Happened";
const WHAT_EMERGED: &str = "What Emerged";

/// Load `JOURNAL.md` from a project directory. Never fails: an absent or
/// unreadable file yields an empty journal.
pub fn load_journal(project_dir: &Path) -> Journal {
    match artifact::JOURNAL.read(project_dir) {
        Ok(Some(raw)) => parse_journal(&raw),
        Ok(None) => Journal::default(),
        Err(e) => {
            warn!(dir = %project_dir.display(), error = %e, "journal unreadable, treating as empty");
            Journal::default()
        }
    }
}

/// Parse journal text. Entries keep document order.
pub fn parse_journal(raw: &str) -> Journal {
    let mut extractor = Extractor::default();
    for line in raw.lines() {
        extractor.feed(line);
    }
    extractor.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    WhatHappened,
    WhatEmerged,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekingHeading,
    InMetadata,
    InSection(Section),
}

#[derive(Default)]
struct Draft<'a> {
    date: String,
    title: String,
    author: Option<String>,
    phase: Option<String>,
    status: Option<String>,
    issues: Option<String>,
    what_happened: Option<Vec<&'a str>>,
    what_emerged: Option<Vec<&'a str>>,
}

impl<'a> Draft<'a> {
    fn set_field(&mut self, label: &str, value: &str) {
        let slot = match label {
            "Author" => &mut self.author,
            "Phase" => &mut self.phase,
            "Status" => &mut self.status,
            "Issues" => &mut self.issues,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value.trim().to_string());
        }
    }

    /// Open a named section; a repeated section is treated as unknown
    fn open_section(&mut self, title: &str) -> Section {
        let (slot, section) = match title {
            WHAT_HAPPENED => (&mut self.what_happened, Section::WhatHappened),
            WHAT_EMERGED => (&mut self.what_emerged, Section::WhatEmerged),
            _ => return Section::Other,
        };
        if slot.is_some() {
            return Section::Other;
        }
        *slot = Some(Vec::new());
        section
    }

    fn push_section_line(&mut self, section: Section, line: &'a str) {
        let slot = match section {
            Section::WhatHappened => &mut self.what_happened,
            Section::WhatEmerged => &mut self.what_emerged,
            Section::Other => return,
        };
        if let Some(lines) = slot {
            lines.push(line);
        }
    }

    fn into_entry(self) -> JournalEntry {
        let issues = self
            .issues
            .as_deref()
            .map(|text| {
                ISSUE_REF
                    .captures_iter(text)
                    .map(|caps| format!("#{}", &caps[1]))
                    .collect()
            })
            .unwrap_or_default();

        JournalEntry {
            date: self.date,
            title: self.title,
            author: self.author.unwrap_or_default(),
            phase: self.phase.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            issues,
            what_happened: join_section(self.what_happened),
            what_emerged: join_section(self.what_emerged),
        }
    }
}

struct Extractor<'a> {
    state: State,
    in_preamble: bool,
    maintainer: Option<String>,
    current: Option<Draft<'a>>,
    entries: Vec<JournalEntry>,
}

impl Default for Extractor<'_> {
    fn default() -> Self {
        Self {
            state: State::SeekingHeading,
            in_preamble: true,
            maintainer: None,
            current: None,
            entries: Vec::new(),
        }
    }
}

impl<'a> Extractor<'a> {
    fn feed(&mut self, line: &'a str) {
        if is_entry_boundary(line) {
            self.start_block(line);
            return;
        }

        match self.state {
            State::SeekingHeading => {
                // Only the preamble carries the maintainer; dropped blocks are ignored.
                if self.in_preamble && self.maintainer.is_none() {
                    if let Some(("Maintainer", value)) = field_line(line) {
                        self.maintainer = Some(value.trim().to_string());
                    }
                }
            }
            State::InMetadata => self.metadata_line(line),
            State::InSection(section) => self.section_line(section, line),
        }
    }

    fn start_block(&mut self, line: &str) {
        self.flush();
        self.in_preamble = false;
        let text = line.trim_start().trim_start_matches('#').trim();
        match ENTRY_HEADING.captures(text) {
            Some(caps) => {
                self.current = Some(Draft {
                    date: caps[1].to_string(),
                    title: caps[2].trim().to_string(),
                    ..Draft::default()
                });
                self.state = State::InMetadata;
            }
            None => {
                debug!(heading = %text, "dropping journal block without a dated heading");
                self.state = State::SeekingHeading;
            }
        }
    }

    fn metadata_line(&mut self, line: &'a str) {
        let Some(draft) = self.current.as_mut() else {
            return;
        };
        if let Some((3, title)) = heading(line) {
            self.state = State::InSection(draft.open_section(title));
        } else if let Some((label, value)) = field_line(line) {
            draft.set_field(label, value);
        }
    }

    fn section_line(&mut self, section: Section, line: &'a str) {
        let Some(draft) = self.current.as_mut() else {
            return;
        };
        // Other headings, including undated `##` lines, are section content.
        if let Some((3, title)) = heading(line) {
            self.state = State::InSection(draft.open_section(title));
            return;
        }
        if is_horizontal_rule(line) {
            self.state = State::InMetadata;
            return;
        }
        match section {
            Section::Other => {
                if let Some((label, value)) = field_line(line) {
                    draft.set_field(label, value);
                }
            }
            captured => draft.push_section_line(captured, line),
        }
    }

    fn flush(&mut self) {
        if let Some(draft) = self.current.take() {
            self.entries.push(draft.into_entry());
        }
    }

    fn finish(mut self) -> Journal {
        self.flush();
        Journal {
            maintainer: self.maintainer.unwrap_or_default(),
            entries: self.entries,
        }
    }
}

fn is_entry_boundary(line: &str) -> bool {
    matches!(heading(line), Some((2, text)) if text.len() >= 4 && text.as_bytes()[..4].iter().all(u8::is_ascii_digit))
}

/// ATX heading level and text. `#10` is not a heading.
fn heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.bytes().take_while(|b| *b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level, rest.trim()))
}

/// `**Label:** value` lines
fn field_line(line: &str) -> Option<(&str, &str)> {
    let caps = FIELD_LINE.captures(line.trim())?;
    let label = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str();
    Some((label, value))
}

fn is_horizontal_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|marker| compact.chars().all(|c| c == *marker))
}

fn join_section(lines: Option<Vec<&str>>) -> String {
    lines
        .map(|lines| lines.join("\n").trim().to_string())
        .unwrap_or_default()
}
