//! Health rule implementations
//!
//! Each rule reads only its own fields and never looks at another rule's
//! result. Absent fields mean "cannot evaluate", never a violation.

use std::collections::BTreeMap;

use super::format::{format_ctime, format_significant};
use super::{HealthRule, RuleContext};
use crate::error::Result;
use crate::record::{Field, Record};
use crate::report::{Description, DetailValue, ProblemKind};

/// Free space at or below this many bytes is a problem (SI gigabytes)
pub const STORAGE_THRESHOLD_BYTES: i64 = 20_000_000_000;

/// Battery capacity at or below this percentage is a problem
pub const BATTERY_CAPACITY_THRESHOLD_PERCENT: i64 = 75;

/// Machines that have not checked in for more than this many days are flagged
pub const UPTIME_THRESHOLD_DAYS: f64 = 90.0;

/// Battery condition reported by macOS when the cell needs replacement
pub const SERVICE_BATTERY: &str = "Service Battery";

const BYTES_PER_GB: f64 = 1_000_000_000.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Low free space on the root volume
pub struct StorageRule {
    threshold_bytes: i64,
}

impl Default for StorageRule {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageRule {
    pub fn new() -> Self {
        Self {
            threshold_bytes: STORAGE_THRESHOLD_BYTES,
        }
    }

    /// Override the free space threshold
    pub fn with_threshold(mut self, threshold_bytes: i64) -> Self {
        self.threshold_bytes = threshold_bytes;
        self
    }
}

impl HealthRule for StorageRule {
    fn id(&self) -> &str {
        "storage"
    }

    fn kind(&self) -> ProblemKind {
        ProblemKind::Storage
    }

    fn evaluate(&self, record: &Record, _context: &RuleContext) -> Result<Option<Description>> {
        let free = match record.integer(Field::FreeSpaceBytes)? {
            Some(bytes) if bytes <= self.threshold_bytes => bytes,
            _ => return Ok(None),
        };

        let gigabytes = free as f64 / BYTES_PER_GB;
        let mut details = BTreeMap::new();
        details.insert(
            "Free space".to_string(),
            DetailValue::Text(format!("{} GB", format_significant(gigabytes, 2))),
        );
        Ok(Some(Description::Details(details)))
    }
}

/// Disk reports SMART errors
pub struct SmartRule;

impl HealthRule for SmartRule {
    fn id(&self) -> &str {
        "smart"
    }

    fn kind(&self) -> ProblemKind {
        ProblemKind::Smart
    }

    fn evaluate(&self, record: &Record, _context: &RuleContext) -> Result<Option<Description>> {
        match record.integer(Field::SmartErrorCount)? {
            Some(count) if count > 0 => Ok(Some(Description::text(format!(
                "SMART errors: {}",
                record.get(Field::SmartErrorCount).unwrap_or_default()
            )))),
            _ => Ok(None),
        }
    }
}

/// Worn battery, by capacity or by reported condition
pub struct BatteryRule {
    capacity_threshold: i64,
}

impl Default for BatteryRule {
    fn default() -> Self {
        Self::new()
    }
}

impl BatteryRule {
    pub fn new() -> Self {
        Self {
            capacity_threshold: BATTERY_CAPACITY_THRESHOLD_PERCENT,
        }
    }

    /// Override the capacity threshold in percent
    pub fn with_capacity_threshold(mut self, percent: i64) -> Self {
        self.capacity_threshold = percent;
        self
    }
}

impl HealthRule for BatteryRule {
    fn id(&self) -> &str {
        "battery"
    }

    fn kind(&self) -> ProblemKind {
        ProblemKind::Battery
    }

    fn evaluate(&self, record: &Record, _context: &RuleContext) -> Result<Option<Description>> {
        let mut details = BTreeMap::new();

        if let Some(capacity) = record.integer(Field::PowerMaxPercent)? {
            if capacity <= self.capacity_threshold {
                details.insert(
                    "Capacity".to_string(),
                    DetailValue::Text(format!(
                        "{}%",
                        record.get(Field::PowerMaxPercent).unwrap_or_default()
                    )),
                );
            }
        }

        if record.get(Field::PowerCondition) == Some(SERVICE_BATTERY) {
            details.insert("Condition".to_string(), DetailValue::from(SERVICE_BATTERY));
        }

        if details.is_empty() {
            return Ok(None);
        }

        if let Some(cycles) = record.integer(Field::PowerCycleCount)? {
            details.insert("Cycles".to_string(), DetailValue::Count(cycles));
        }

        Ok(Some(Description::Details(details)))
    }
}

/// Machine has not checked in for too long
pub struct UptimeRule {
    threshold_days: f64,
}

impl Default for UptimeRule {
    fn default() -> Self {
        Self::new()
    }
}

impl UptimeRule {
    pub fn new() -> Self {
        Self {
            threshold_days: UPTIME_THRESHOLD_DAYS,
        }
    }

    /// Override the age threshold in days
    pub fn with_threshold_days(mut self, days: f64) -> Self {
        self.threshold_days = days;
        self
    }
}

impl HealthRule for UptimeRule {
    fn id(&self) -> &str {
        "uptime"
    }

    fn kind(&self) -> ProblemKind {
        ProblemKind::Uptime
    }

    fn evaluate(&self, record: &Record, context: &RuleContext) -> Result<Option<Description>> {
        let timestamp = match record.integer(Field::ReportTimestamp)? {
            Some(ts) => ts,
            None => return Ok(None),
        };

        let now = context.now.timestamp_millis() as f64 / 1000.0;
        let age_days = (now - timestamp as f64) / SECONDS_PER_DAY;
        if age_days <= self.threshold_days {
            return Ok(None);
        }

        Ok(Some(Description::text(format!(
            "Uptime {} days. Last checkin: {}",
            age_days.trunc() as i64,
            format_ctime(timestamp)
        ))))
    }
}

/// System Integrity Protection switched off
pub struct SecurityRule;

impl HealthRule for SecurityRule {
    fn id(&self) -> &str {
        "security"
    }

    fn kind(&self) -> ProblemKind {
        ProblemKind::Sip
    }

    fn evaluate(&self, record: &Record, _context: &RuleContext) -> Result<Option<Description>> {
        if record.get(Field::SecuritySip) == Some("Disabled") {
            Ok(Some(Description::text("SIP is disabled")))
        } else {
            Ok(None)
        }
    }
}

/// Fan sensor reports a fault
pub struct SensorRule;

impl HealthRule for SensorRule {
    fn id(&self) -> &str {
        "sensor"
    }

    fn kind(&self) -> ProblemKind {
        ProblemKind::Fan
    }

    fn evaluate(&self, record: &Record, _context: &RuleContext) -> Result<Option<Description>> {
        if record.get(Field::FanStatus) == Some("1") {
            Ok(Some(Description::text("Fan Errors!")))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;
    use chrono::{TimeZone, Utc};

    const NOW: i64 = 1_700_000_000;

    fn context() -> RuleContext {
        RuleContext::new(Utc.timestamp_opt(NOW, 0).unwrap())
    }

    fn eval(rule: &dyn HealthRule, record: &Record) -> Option<Description> {
        rule.evaluate(record, &context()).unwrap()
    }

    #[test]
    fn test_storage_boundary() {
        let at = Record::empty().with(Field::FreeSpaceBytes, "20000000000");
        let above = Record::empty().with(Field::FreeSpaceBytes, "20000000001");

        let description = eval(&StorageRule::new(), &at).unwrap();
        assert_eq!(
            description.detail("Free space"),
            Some(&DetailValue::from("20 GB"))
        );
        assert!(eval(&StorageRule::new(), &above).is_none());
    }

    #[test]
    fn test_storage_absent_and_zero() {
        assert!(eval(&StorageRule::new(), &Record::empty()).is_none());

        let empty_disk = Record::empty().with(Field::FreeSpaceBytes, "0");
        let description = eval(&StorageRule::new(), &empty_disk).unwrap();
        assert_eq!(description.detail("Free space"), Some(&DetailValue::from("0 GB")));
    }

    #[test]
    fn test_storage_custom_threshold() {
        let record = Record::empty().with(Field::FreeSpaceBytes, "5500000000");
        assert!(eval(&StorageRule::new().with_threshold(1_000_000_000), &record).is_none());
        let description = eval(&StorageRule::new(), &record).unwrap();
        assert_eq!(description.detail("Free space"), Some(&DetailValue::from("5.5 GB")));
    }

    #[test]
    fn test_storage_rejects_garbage() {
        let record = Record::empty().with(Field::FreeSpaceBytes, "12GB");
        let err = StorageRule::new().evaluate(&record, &context()).unwrap_err();
        assert_eq!(err, RecordError::value_parse_error(Field::FreeSpaceBytes, "12GB"));
    }

    #[test]
    fn test_smart() {
        let clean = Record::empty().with(Field::SmartErrorCount, "0");
        let failing = Record::empty().with(Field::SmartErrorCount, "7");

        assert!(eval(&SmartRule, &clean).is_none());
        assert!(eval(&SmartRule, &Record::empty()).is_none());
        assert_eq!(
            eval(&SmartRule, &failing),
            Some(Description::text("SMART errors: 7"))
        );
    }

    #[test]
    fn test_battery_capacity_only() {
        let record = Record::empty()
            .with(Field::PowerMaxPercent, "75")
            .with(Field::PowerCondition, "Normal");
        let description = eval(&BatteryRule::new(), &record).unwrap();
        assert_eq!(description.detail("Capacity"), Some(&DetailValue::from("75%")));
        assert_eq!(description.detail("Condition"), None);
        assert_eq!(description.detail("Cycles"), None);
    }

    #[test]
    fn test_battery_condition_with_cycles() {
        let record = Record::empty()
            .with(Field::PowerMaxPercent, "90")
            .with(Field::PowerCondition, SERVICE_BATTERY)
            .with(Field::PowerCycleCount, "1021");
        let description = eval(&BatteryRule::new(), &record).unwrap();
        assert_eq!(description.detail("Capacity"), None);
        assert_eq!(
            description.detail("Condition"),
            Some(&DetailValue::from(SERVICE_BATTERY))
        );
        assert_eq!(description.detail("Cycles"), Some(&DetailValue::Count(1021)));
    }

    #[test]
    fn test_battery_healthy_ignores_cycles() {
        let record = Record::empty()
            .with(Field::PowerMaxPercent, "76")
            .with(Field::PowerCycleCount, "not-a-number");
        assert!(eval(&BatteryRule::new(), &record).is_none());
    }

    #[test]
    fn test_uptime() {
        let day = 86_400;
        let recent = Record::empty().with(Field::ReportTimestamp, (NOW - 90 * day).to_string());
        let stale = Record::empty().with(Field::ReportTimestamp, (NOW - 120 * day - 3600).to_string());

        assert!(eval(&UptimeRule::new(), &recent).is_none());

        let description = eval(&UptimeRule::new(), &stale).unwrap();
        let expected = format!(
            "Uptime 120 days. Last checkin: {}",
            format_ctime(NOW - 120 * day - 3600)
        );
        assert_eq!(description, Description::text(expected));
    }

    #[test]
    fn test_uptime_just_over_threshold() {
        let record = Record::empty().with(Field::ReportTimestamp, (NOW - 90 * 86_400 - 1).to_string());
        let description = eval(&UptimeRule::new(), &record).unwrap();
        assert!(description.to_string().starts_with("Uptime 90 days."));
    }

    #[test]
    fn test_security_and_sensor() {
        let record = Record::empty()
            .with(Field::SecuritySip, "Disabled")
            .with(Field::FanStatus, "1");
        assert_eq!(eval(&SecurityRule, &record), Some(Description::text("SIP is disabled")));
        assert_eq!(eval(&SensorRule, &record), Some(Description::text("Fan Errors!")));

        let healthy = Record::empty()
            .with(Field::SecuritySip, "Enabled")
            .with(Field::FanStatus, "0");
        assert!(eval(&SecurityRule, &healthy).is_none());
        assert!(eval(&SensorRule, &healthy).is_none());
    }
}
