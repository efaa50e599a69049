//! Rule engine and report assembly
//!
//! The engine runs identity population and then every registered rule, in
//! registration order, against one record. Rules are pure; only the
//! assembler touches the report.

pub mod format;
mod rules;

pub use rules::*;

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::company::{get_company, skip_record, ExclusionSet};
use crate::error::Result;
use crate::record::{Field, Record};
use crate::report::{Description, ProblemKind, Report};

const UNKNOWN_USER: &str = "unknown";

/// Evaluation inputs shared by every rule for one record
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    /// Instant the evaluation pass started
    pub now: DateTime<Utc>,
}

impl RuleContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

/// Trait for machine health rules
///
/// A rule inspects a record and returns a description when its condition
/// is violated. It fires at most once per record.
pub trait HealthRule: Send + Sync {
    /// Rule identifier
    fn id(&self) -> &str;

    /// Problem category this rule reports under
    fn kind(&self) -> ProblemKind;

    /// Evaluate the rule, `Ok(None)` when the machine is healthy
    fn evaluate(&self, record: &Record, context: &RuleContext) -> Result<Option<Description>>;
}

/// Machine report engine
pub struct RuleEngine {
    rules: Vec<Box<dyn HealthRule>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    /// Create an engine with the standard rule set
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(StorageRule::new()),
                Box::new(SmartRule),
                Box::new(BatteryRule::new()),
                Box::new(UptimeRule::new()),
                Box::new(SecurityRule),
                Box::new(SensorRule),
            ],
        }
    }

    /// Create an engine with no rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register a rule after the existing ones
    pub fn register(&mut self, rule: Box<dyn HealthRule>) {
        self.rules.push(rule);
    }

    /// Identifiers of the registered rules, in evaluation order
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    /// Build the report for one machine
    ///
    /// Skipped records come back empty and unmarked. A numeric field that
    /// does not parse fails the whole record.
    pub fn prepare_machine_report(
        &self,
        record: &Record,
        excluded: &ExclusionSet,
        clock: &dyn Clock,
    ) -> Result<Report> {
        let mut report = Report::new();

        if skip_record(record, excluded) {
            tracing::debug!(
                serial = record.get(Field::SerialNumber).unwrap_or_default(),
                company = get_company(record),
                "Skipping record"
            );
            return Ok(report);
        }

        generic_report(record, &mut report);

        let context = RuleContext::new(clock.now());
        for rule in &self.rules {
            if let Some(description) = rule.evaluate(record, &context)? {
                let kind = rule.kind();
                let acknowledged = determine_acknowledgement(record, &mut report, kind.ack_keyword());
                tracing::trace!(rule = rule.id(), acknowledged, "Rule fired");
                report.add_problem(kind, description, acknowledged);
            }
        }

        Ok(report)
    }
}

/// Build a machine report with the standard rule set
pub fn prepare_machine_report(
    record: &Record,
    excluded: &ExclusionSet,
    clock: &dyn Clock,
) -> Result<Report> {
    RuleEngine::new().prepare_machine_report(record, excluded, clock)
}

/// Copy identity fields from the record onto the report
pub fn generic_report(record: &Record, report: &mut Report) {
    report.sla = get_company(record).to_string();
    report.serial = record.get(Field::SerialNumber).map(str::to_string);
    report.model = record.get(Field::MachineModel).map(str::to_string);
    report.device_type = record.get(Field::MachineName).map(str::to_string);
    report.hostname = record.get(Field::ComputerName).map(str::to_string);
    report.username = record
        .get(Field::LongUsername)
        .unwrap_or(UNKNOWN_USER)
        .to_string();
}

/// Check the record's comment for an acknowledgement keyword
///
/// Called once per fired rule. The report is marked for emission either
/// way; acknowledgement annotates a problem and never hides it.
pub fn determine_acknowledgement(record: &Record, report: &mut Report, keyword: &str) -> bool {
    let comment = record
        .get(Field::CommentText)
        .map(str::to_lowercase)
        .unwrap_or_default();

    report.mark_for_emission();
    comment.contains(keyword)
}
