//! Data models for blackboard artifacts
//!
//! Every field a human might forget is an `Option`. Enum-valued fields stay
//! raw strings so a bad value survives parsing and reaches the validator.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lifecycle status declared in `PROJECT.yaml`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Proposed,
    Building,
    Hardening,
    ContribPrep,
    Review,
    Shipped,
    Evolving,
    Archived,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 8] = [
        ProjectStatus::Proposed,
        ProjectStatus::Building,
        ProjectStatus::Hardening,
        ProjectStatus::ContribPrep,
        ProjectStatus::Review,
        ProjectStatus::Shipped,
        ProjectStatus::Evolving,
        ProjectStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Proposed => "proposed",
            ProjectStatus::Building => "building",
            ProjectStatus::Hardening => "hardening",
            ProjectStatus::ContribPrep => "contrib-prep",
            ProjectStatus::Review => "review",
            ProjectStatus::Shipped => "shipped",
            ProjectStatus::Evolving => "evolving",
            ProjectStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid status: {}", s))
    }
}

/// Kind of project, informational only
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Skill,
    Bundle,
    Tool,
    Infrastructure,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectType::Skill => write!(f, "skill"),
            ProjectType::Bundle => write!(f, "bundle"),
            ProjectType::Tool => write!(f, "tool"),
            ProjectType::Infrastructure => write!(f, "infrastructure"),
        }
    }
}

impl std::str::FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skill" => Ok(ProjectType::Skill),
            "bundle" => Ok(ProjectType::Bundle),
            "tool" => Ok(ProjectType::Tool),
            "infrastructure" => Ok(ProjectType::Infrastructure),
            _ => Err(format!(
                "Invalid project type: {}. Use: skill, bundle, tool, infrastructure",
                s
            )),
        }
    }
}

/// Contributor trust zone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrustZone {
    Maintainer,
    Trusted,
    Untrusted,
}

impl TrustZone {
    pub const ALL: [TrustZone; 3] = [TrustZone::Maintainer, TrustZone::Trusted, TrustZone::Untrusted];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrustZone::Maintainer => "maintainer",
            TrustZone::Trusted => "trusted",
            TrustZone::Untrusted => "untrusted",
        }
    }
}

impl fmt::Display for TrustZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrustZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrustZone::ALL
            .into_iter()
            .find(|zone| zone.as_str() == s)
            .ok_or_else(|| format!("Invalid zone: {}", s))
    }
}

/// Contributor availability as declared in the roster
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Open,
    Limited,
    Unavailable,
}

impl std::str::FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Availability::Open),
            "limited" => Ok(Availability::Limited),
            "unavailable" => Ok(Availability::Unavailable),
            _ => Err(format!("Invalid availability: {}", s)),
        }
    }
}

/// Stage of work recorded on a journal entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JournalPhase {
    Specify,
    Build,
    Harden,
    #[serde(rename = "Contrib Prep")]
    ContribPrep,
    Review,
    Release,
    Evolve,
}

impl JournalPhase {
    pub const ALL: [JournalPhase; 7] = [
        JournalPhase::Specify,
        JournalPhase::Build,
        JournalPhase::Harden,
        JournalPhase::ContribPrep,
        JournalPhase::Review,
        JournalPhase::Release,
        JournalPhase::Evolve,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JournalPhase::Specify => "Specify",
            JournalPhase::Build => "Build",
            JournalPhase::Harden => "Harden",
            JournalPhase::ContribPrep => "Contrib Prep",
            JournalPhase::Review => "Review",
            JournalPhase::Release => "Release",
            JournalPhase::Evolve => "Evolve",
        }
    }
}

impl fmt::Display for JournalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JournalPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JournalPhase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| format!("Invalid phase: {}", s))
    }
}

/// A contributor record, shared by `PROJECT.yaml` and `CONTRIBUTORS.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Contributor {
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub promoted_by: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(deserialize_with = "lenient_shape", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
}

impl Contributor {
    /// The declared zone, if it is one of the known trust zones
    pub fn trust_zone(&self) -> Option<TrustZone> {
        self.zone.as_deref().and_then(|z| z.parse().ok())
    }
}

/// Handle -> contributor mapping that keeps YAML document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContributorMap(Vec<(String, Contributor)>);

impl ContributorMap {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Contributor)> {
        self.0.iter().map(|(handle, c)| (handle.as_str(), c))
    }

    pub fn get(&self, handle: &str) -> Option<&Contributor> {
        self.0.iter().find(|(h, _)| h == handle).map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(h, _)| h.as_str())
    }
}

impl FromIterator<(String, Contributor)> for ContributorMap {
    fn from_iter<I: IntoIterator<Item = (String, Contributor)>>(iter: I) -> Self {
        ContributorMap(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for ContributorMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ContributorMapVisitor;

        impl<'de> Visitor<'de> for ContributorMapVisitor {
            type Value = ContributorMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of contributor handles to contributor records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                // `handle:` with no body, or a body that is not a mapping, still
                // counts as a contributor entry so its zone gets checked
                while let Some((handle, record)) = access.next_entry::<String, serde_yaml::Value>()? {
                    let contributor = serde_yaml::from_value::<Option<Contributor>>(record)
                        .ok()
                        .flatten()
                        .unwrap_or_default();
                    entries.push((handle, contributor));
                }
                Ok(ContributorMap(entries))
            }
        }

        deserializer.deserialize_map(ContributorMapVisitor)
    }
}

impl Serialize for ContributorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (handle, contributor) in &self.0 {
            map.serialize_entry(handle, contributor)?;
        }
        map.end()
    }
}

/// Source repository of a standalone project
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectSource {
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Contents of `PROJECT.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub maintainer: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub created: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub license: Option<String>,
    #[serde(deserialize_with = "lenient_shape")]
    pub contributors: Option<ContributorMap>,
    #[serde(rename = "type", deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub fork: Option<String>,
    #[serde(deserialize_with = "lenient_shape", skip_serializing_if = "Option::is_none")]
    pub source: Option<ProjectSource>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub contrib_branch: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(deserialize_with = "lenient_shape", skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub tests: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

impl Project {
    pub const REQUIRED_FIELDS: [&'static str; 6] =
        ["name", "maintainer", "status", "created", "license", "contributors"];

    /// Required fields that are absent, null or blank, in declaration order
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let text = [
            ("name", &self.name),
            ("maintainer", &self.maintainer),
            ("status", &self.status),
            ("created", &self.created),
            ("license", &self.license),
        ];
        let mut missing: Vec<&'static str> = text
            .into_iter()
            .filter(|(_, value)| is_blank(value.as_deref()))
            .map(|(field, _)| field)
            .collect();
        if self.contributors.is_none() {
            missing.push("contributors");
        }
        missing
    }

    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn status_or_empty(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }

    pub fn maintainer_or_empty(&self) -> &str {
        self.maintainer.as_deref().unwrap_or("")
    }

    pub fn parsed_status(&self) -> Option<ProjectStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn parsed_type(&self) -> Option<ProjectType> {
        self.project_type.as_deref().and_then(|t| t.parse().ok())
    }
}

/// A project manifest paired with the directory it was loaded from
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoadedProject {
    pub dir_name: String,
    pub project: Project,
}

/// Contents of `CONTRIBUTORS.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Contributors {
    pub contributors: Option<ContributorMap>,
}

/// One dated block of `JOURNAL.md`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub date: String,
    pub title: String,
    pub author: String,
    pub phase: String,
    pub status: String,
    pub issues: Vec<String>,
    pub what_happened: String,
    pub what_emerged: String,
}

impl JournalEntry {
    pub fn parsed_date(&self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Parsed `JOURNAL.md`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Journal {
    pub maintainer: String,
    pub entries: Vec<JournalEntry>,
}

impl Journal {
    /// Entry with the most recent parseable date
    pub fn latest_entry(&self) -> Option<&JournalEntry> {
        self.entries
            .iter()
            .filter_map(|entry| entry.parsed_date().map(|date| (date, entry)))
            .max_by_key(|(date, _)| *date)
            .map(|(_, entry)| entry)
    }
}

/// Row of the "Active Projects" table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RegistryProject {
    pub name: String,
    pub maintainer: String,
    pub status: String,
    pub source: String,
    pub contributors: String,
}

/// Row of the "Agent Registry (Daemon Entries)" table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistryAgent {
    pub agent: String,
    pub operator: String,
    pub platform: String,
    pub skills: String,
    pub availability: String,
    pub current_work: String,
}

/// Parsed `REGISTRY.md`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Registry {
    pub projects: Vec<RegistryProject>,
    pub agents: Vec<RegistryAgent>,
}

/// A single data-quality finding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    pub file: String,
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Violation {
    pub fn new(file: impl Into<String>, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}: {}", self.file, self.message)?;
        } else {
            write!(f, "{} [{}]: {}", self.file, self.field, self.message)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// Scalar field that tolerates YAML numbers and booleans. Any other shape
/// reads as absent so the record still loads and gets validated.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(serde_yaml::Value::deserialize(deserializer)?))
}

fn scalar_text(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => scalar_text(tagged.value),
        serde_yaml::Value::Null | serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => None,
    }
}

/// Structured field that reads as absent when its shape does not match
fn lenient_shape<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    Ok(serde_yaml::from_value::<Option<T>>(value).ok().flatten())
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
