//! Fleet Health Core
//!
//! Evaluates Munkireport inventory records against a fixed set of machine
//! health rules and assembles per-machine reports for operator review.
//!
//! # Pipeline
//!
//! ```text
//! rows ─► Record ─► exclusion filter ─► identity + rules ─► Report ─► sorted batch
//! ```
//!
//! - Deterministic: evaluation depends only on the record and the injected clock
//! - Stateless: acknowledgements live in each record's comment text
//! - Isolating: a bad numeric field fails its record, not the batch
//!
//! # Example
//!
//! ```rust
//! use fleet_health_core::{process_data, ExclusionSet, SystemClock};
//!
//! let outcome = process_data(&[], &ExclusionSet::new(), &SystemClock).unwrap();
//! assert!(outcome.reports.is_empty());
//! ```

pub mod batch;
pub mod clock;
pub mod company;
pub mod engine;
pub mod error;
pub mod record;
pub mod report;

pub use batch::{parse_rows, process_data, process_records, BatchOutcome, RecordFailure};
pub use clock::{Clock, FixedClock, SystemClock};
pub use company::{get_company, skip_record, sort_key, ExclusionSet};
pub use engine::{
    determine_acknowledgement, generic_report, prepare_machine_report, HealthRule, RuleContext,
    RuleEngine,
};
pub use error::{RecordError, Result};
pub use record::{Field, Record};
pub use report::{Description, DetailValue, Problem, ProblemKind, Report};
