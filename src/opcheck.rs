//! Operator conformance checks
//!
//! A compiled extension registers native operators under a namespace and
//! declares test cases for them in an `opchecks` table. [`check_ops`] walks
//! the registered schemas of that namespace and runs every declared case
//! through the host framework's conformance self-test. The host is reached
//! through [`OperatorHost`]; [`python::PythonHost`] drives a Python
//! interpreter.

pub mod python;

use crate::output;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use thiserror::Error;

pub use python::PythonHost;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to start {}: {source}", interpreter.display())]
    Spawn {
        interpreter: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to import module `{module}`: {message}")]
    Import { module: String, message: String },
    #[error("communication with the operator host failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed message from the operator host: {0}")]
    Protocol(String),
    #[error("invalid import path: {0}")]
    ImportPath(#[from] std::env::JoinPathsError),
    #[error("operator host exited unexpectedly")]
    ConnectionClosed,
    #[error("operator host error: {0}")]
    Host(String),
    #[error("opcheck failed for `{op}` (case {case}): {message}")]
    CheckFailed { op: String, case: usize, message: String },
}

/// Result of running one declared test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    Failed(String),
}

/// Access to the framework that owns the registered operators.
pub trait OperatorHost {
    /// Whether the framework can enumerate every registered schema
    fn supports_schema_listing(&mut self) -> Result<bool, CheckError>;

    /// Namespace the module registers its operators under
    fn namespace(&mut self) -> Result<String, CheckError>;

    /// Qualified names (`ns::op`) of every registered schema, overloads included
    fn schema_names(&mut self) -> Result<Vec<String>, CheckError>;

    /// Number of declared test cases per operator, `None` when the module
    /// declares no checks at all
    fn declared_checks(&mut self) -> Result<Option<BTreeMap<String, usize>>, CheckError>;

    /// Run case `case` of the declared checks for `op`.
    fn run_check(&mut self, op: &str, case: usize) -> Result<CaseOutcome, CheckError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedOperator {
    pub op: String,
    pub cases: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub checked: Vec<CheckedOperator>,
    /// Registered operators without a check list
    pub missing: Vec<String>,
}

impl CheckReport {
    pub fn cases(&self) -> usize {
        self.checked.iter().map(|c| c.cases).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The framework cannot list schemas; nothing was checked
    Unsupported,
    /// The module declares no checks; nothing was checked
    NoChecks,
    Completed(CheckReport),
}

/// Operator names under `namespace`, in registration order, one per name.
pub fn operators_in_namespace(schemas: &[String], namespace: &str) -> Vec<String> {
    let prefix = format!("{namespace}::");
    let mut seen = HashSet::new();
    schemas
        .iter()
        .filter_map(|schema| schema.strip_prefix(&prefix))
        .filter(|op| seen.insert(*op))
        .map(str::to_string)
        .collect()
}

/// Run every declared check of the module behind `host`.
///
/// Stops at the first failing case.
pub fn check_ops(host: &mut dyn OperatorHost) -> Result<CheckOutcome, CheckError> {
    if !host.supports_schema_listing()? {
        tracing::info!("schema listing unsupported by the host framework, skipping");
        return Ok(CheckOutcome::Unsupported);
    }

    let Some(declared) = host.declared_checks()? else {
        output::warning("Module does not have opchecks");
        return Ok(CheckOutcome::NoChecks);
    };

    let namespace = host.namespace()?;
    let schemas = host.schema_names()?;
    let operators = operators_in_namespace(&schemas, &namespace);
    tracing::debug!(namespace = %namespace, operators = operators.len(), "enumerated operators");

    let mut report = CheckReport::default();
    for op in operators {
        let Some(&cases) = declared.get(&op) else {
            output::warning(&format!("No operator check found for {op}"));
            report.missing.push(op);
            continue;
        };

        output::checking(&format!("{namespace}::{op} ({cases} cases)"));
        for case in 0..cases {
            match host.run_check(&op, case)? {
                CaseOutcome::Passed => tracing::trace!(op = %op, case, "passed"),
                CaseOutcome::Failed(message) => return Err(CheckError::CheckFailed { op, case, message }),
            }
        }
        report.checked.push(CheckedOperator { op, cases });
    }

    Ok(CheckOutcome::Completed(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeHost {
        unsupported: bool,
        checks: Option<BTreeMap<String, usize>>,
        schemas: Vec<String>,
        failing: Option<(String, usize)>,
        ran: Vec<(String, usize)>,
    }

    impl OperatorHost for FakeHost {
        fn supports_schema_listing(&mut self) -> Result<bool, CheckError> {
            Ok(!self.unsupported)
        }

        fn namespace(&mut self) -> Result<String, CheckError> {
            Ok("_relu_abc123".into())
        }

        fn schema_names(&mut self) -> Result<Vec<String>, CheckError> {
            Ok(self.schemas.clone())
        }

        fn declared_checks(&mut self) -> Result<Option<BTreeMap<String, usize>>, CheckError> {
            Ok(self.checks.clone())
        }

        fn run_check(&mut self, op: &str, case: usize) -> Result<CaseOutcome, CheckError> {
            self.ran.push((op.to_string(), case));
            if self.failing.as_ref() == Some(&(op.to_string(), case)) {
                return Ok(CaseOutcome::Failed("fake tensor mismatch".into()));
            }
            Ok(CaseOutcome::Passed)
        }
    }

    fn host(checks: &[(&str, usize)], schemas: &[&str]) -> FakeHost {
        FakeHost {
            checks: Some(checks.iter().map(|(k, v)| (k.to_string(), *v)).collect()),
            schemas: schemas.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn namespace_filter_and_overloads() {
        let schemas: Vec<String> = ["aten::add", "ns::relu", "ns::relu", "nsx::gelu", "ns::gelu"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(operators_in_namespace(&schemas, "ns"), vec!["relu", "gelu"]);
    }

    #[test]
    fn runs_every_declared_case() {
        let mut host = host(&[("relu", 2)], &["aten::add", "_relu_abc123::relu", "_relu_abc123::relu"]);
        let outcome = check_ops(&mut host).unwrap();
        assert_eq!(
            outcome,
            CheckOutcome::Completed(CheckReport {
                checked: vec![CheckedOperator { op: "relu".into(), cases: 2 }],
                missing: vec![],
            })
        );
        assert_eq!(host.ran, vec![("relu".to_string(), 0), ("relu".to_string(), 1)]);
    }

    #[test]
    fn missing_check_list_does_not_stop_processing() {
        let mut host = host(&[("relu", 1)], &["_relu_abc123::silu", "_relu_abc123::relu"]);
        let CheckOutcome::Completed(report) = check_ops(&mut host).unwrap() else {
            panic!("expected a completed report");
        };
        assert_eq!(report.missing, vec!["silu"]);
        assert_eq!(report.cases(), 1);
        assert_eq!(host.ran, vec![("relu".to_string(), 0)]);
    }

    #[test]
    fn first_failure_is_returned() {
        let mut host = host(&[("relu", 3), ("silu", 1)], &["_relu_abc123::relu", "_relu_abc123::silu"]);
        host.failing = Some(("relu".into(), 1));

        match check_ops(&mut host) {
            Err(CheckError::CheckFailed { op, case, message }) => {
                assert_eq!(op, "relu");
                assert_eq!(case, 1);
                assert_eq!(message, "fake tensor mismatch");
            },
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(host.ran.len(), 2);
    }

    #[test]
    fn no_checks_is_a_noop() {
        let mut host = FakeHost {
            schemas: vec!["_relu_abc123::relu".into()],
            ..Default::default()
        };
        assert_eq!(check_ops(&mut host).unwrap(), CheckOutcome::NoChecks);
        assert!(host.ran.is_empty());
    }

    #[test]
    fn unsupported_host_is_a_noop() {
        let mut host = host(&[("relu", 1)], &["_relu_abc123::relu"]);
        host.unsupported = true;
        assert_eq!(check_ops(&mut host).unwrap(), CheckOutcome::Unsupported);
        assert!(host.ran.is_empty());
    }
}
