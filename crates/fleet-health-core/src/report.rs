//! Report and problem types
//!
//! A [`Report`] is the per-machine output unit: identity fields plus the
//! problems found by the rule engine. Field names serialize in the shape
//! operators already read (`SLA`, `Device Type`, `Problems`, ...).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Problem categories, one per rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProblemKind {
    Storage,
    #[serde(rename = "SMART")]
    Smart,
    Battery,
    Uptime,
    #[serde(rename = "SIP")]
    Sip,
    Fan,
}

impl ProblemKind {
    /// Name used as the key in a report's problem map
    pub fn name(self) -> &'static str {
        match self {
            ProblemKind::Storage => "Storage",
            ProblemKind::Smart => "SMART",
            ProblemKind::Battery => "Battery",
            ProblemKind::Uptime => "Uptime",
            ProblemKind::Sip => "SIP",
            ProblemKind::Fan => "Fan",
        }
    }

    /// Comment keyword an operator writes to acknowledge the problem
    pub fn ack_keyword(self) -> &'static str {
        match self {
            ProblemKind::Storage => "ack-storage",
            ProblemKind::Smart => "ack-smart",
            ProblemKind::Battery => "ack-battery",
            ProblemKind::Uptime => "ack-uptime",
            ProblemKind::Sip => "ack-sip",
            ProblemKind::Fan => "ack-fans",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Value inside a structured description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    Count(i64),
    Text(String),
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailValue::Count(n) => write!(f, "{}", n),
            DetailValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for DetailValue {
    fn from(value: &str) -> Self {
        DetailValue::Text(value.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(value: String) -> Self {
        DetailValue::Text(value)
    }
}

impl From<i64> for DetailValue {
    fn from(value: i64) -> Self {
        DetailValue::Count(value)
    }
}

/// Problem description: a sentence or a small mapping of sub-fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Details(BTreeMap<String, DetailValue>),
}

impl Description {
    pub fn text(sentence: impl Into<String>) -> Self {
        Description::Text(sentence.into())
    }

    /// Look up a sub-field of a structured description
    pub fn detail(&self, key: &str) -> Option<&DetailValue> {
        match self {
            Description::Text(_) => None,
            Description::Details(details) => details.get(key),
        }
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Description::Text(sentence) => write!(f, "{}", sentence),
            Description::Details(details) => {
                let parts: Vec<String> = details
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

/// A named health finding on a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "Description")]
    pub description: Description,
    #[serde(rename = "Acknowledged")]
    pub acknowledged: bool,
}

/// Per-machine report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "SLA")]
    pub sla: String,
    #[serde(rename = "Serial")]
    pub serial: Option<String>,
    #[serde(rename = "Model")]
    pub model: Option<String>,
    #[serde(rename = "Device Type")]
    pub device_type: Option<String>,
    #[serde(rename = "Hostname")]
    pub hostname: Option<String>,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Problems")]
    pub problems: BTreeMap<ProblemKind, Problem>,
    #[serde(skip)]
    emit: bool,
}

impl Report {
    /// Empty report, not marked for emission
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a problem, replacing any earlier one of the same kind
    pub fn add_problem(&mut self, kind: ProblemKind, description: Description, acknowledged: bool) {
        self.problems.insert(
            kind,
            Problem {
                description,
                acknowledged,
            },
        );
    }

    pub fn problem(&self, kind: ProblemKind) -> Option<&Problem> {
        self.problems.get(&kind)
    }

    pub fn mark_for_emission(&mut self) {
        self.emit = true;
    }

    pub fn should_emit(&self) -> bool {
        self.emit
    }

    /// Problems nobody has acknowledged yet
    pub fn unacknowledged_count(&self) -> usize {
        self.problems.values().filter(|p| !p.acknowledged).count()
    }
}
