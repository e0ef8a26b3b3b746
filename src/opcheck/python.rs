//! Operator host backed by a Python interpreter
//!
//! The interpreter runs an embedded driver that imports the extension
//! module and answers one JSON request per line on stdin with one JSON
//! response per line on stdout. The driver redirects the module's own
//! prints to stderr so they never interleave with responses.

use super::{CaseOutcome, CheckError, OperatorHost};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

const DRIVER: &str = include_str!("driver.py");

/// Interpreter used when none is configured
pub const DEFAULT_INTERPRETER: &str = "python3";

#[derive(Serialize)]
struct Request<'a, P> {
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct Response {
    id: u64,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
struct RunCheckParams<'a> {
    op: &'a str,
    case: usize,
}

#[derive(Deserialize)]
struct RunCheckResult {
    passed: bool,
    #[serde(default)]
    message: Option<String>,
}

pub struct PythonHost {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_id: u64,
}

impl PythonHost {
    /// Start `interpreter`, import `module` and wait for the driver to
    /// report readiness.
    pub fn spawn(interpreter: &Path, module: &str) -> Result<Self, CheckError> {
        Self::spawn_with_paths(interpreter, module, &[])
    }

    /// Like [`PythonHost::spawn`], with `import_paths` searched before the
    /// inherited `PYTHONPATH`.
    pub fn spawn_with_paths(interpreter: &Path, module: &str, import_paths: &[PathBuf]) -> Result<Self, CheckError> {
        tracing::debug!(interpreter = %interpreter.display(), module, "starting operator host");

        let mut command = Command::new(interpreter);
        command
            .arg("-c")
            .arg(DRIVER)
            .arg(module)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        if !import_paths.is_empty() {
            let inherited = std::env::var_os("PYTHONPATH").unwrap_or_default();
            let search = import_paths
                .iter()
                .cloned()
                .chain(std::env::split_paths(&inherited));
            command.env("PYTHONPATH", std::env::join_paths(search)?);
        }

        let mut child = command.spawn().map_err(|source| CheckError::Spawn {
            interpreter: PathBuf::from(interpreter),
            source,
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| CheckError::Protocol("interpreter has no stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CheckError::Protocol("interpreter has no stdout".into()))?;

        let mut host = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            next_id: 1,
        };

        host.receive::<serde_json::Value>(0).map_err(|e| match e {
            CheckError::Host(message) => CheckError::Import {
                module: module.to_string(),
                message,
            },
            other => other,
        })?;

        Ok(host)
    }

    fn send<P: Serialize>(&mut self, method: &str, params: P) -> Result<u64, CheckError> {
        let id = self.next_id;
        self.next_id += 1;

        let request = Request { id, method, params };
        let json = serde_json::to_string(&request).map_err(|e| CheckError::Protocol(e.to_string()))?;
        writeln!(self.stdin, "{json}")?;
        self.stdin.flush()?;
        Ok(id)
    }

    fn receive<R: DeserializeOwned>(&mut self, id: u64) -> Result<R, CheckError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(CheckError::ConnectionClosed);
        }

        let response: Response = serde_json::from_str(&line).map_err(|e| CheckError::Protocol(e.to_string()))?;
        if response.id != id {
            return Err(CheckError::Protocol(format!(
                "response id {} does not match request {}",
                response.id, id
            )));
        }
        if let Some(error) = response.error {
            return Err(CheckError::Host(error));
        }

        serde_json::from_value(response.result.unwrap_or(serde_json::Value::Null))
            .map_err(|e| CheckError::Protocol(e.to_string()))
    }

    fn call<R: DeserializeOwned>(&mut self, method: &str, params: impl Serialize) -> Result<R, CheckError> {
        let id = self.send(method, params)?;
        self.receive(id)
    }

    /// Ask the driver to exit and reap the interpreter.
    pub fn shutdown(&mut self) -> Result<(), CheckError> {
        self.call::<serde_json::Value>("shutdown", serde_json::json!({}))?;
        self.child.wait()?;
        Ok(())
    }
}

impl OperatorHost for PythonHost {
    fn supports_schema_listing(&mut self) -> Result<bool, CheckError> {
        self.call("supports_schema_listing", serde_json::json!({}))
    }

    fn namespace(&mut self) -> Result<String, CheckError> {
        self.call("namespace", serde_json::json!({}))
    }

    fn schema_names(&mut self) -> Result<Vec<String>, CheckError> {
        self.call("schema_names", serde_json::json!({}))
    }

    fn declared_checks(&mut self) -> Result<Option<BTreeMap<String, usize>>, CheckError> {
        self.call("declared_checks", serde_json::json!({}))
    }

    fn run_check(&mut self, op: &str, case: usize) -> Result<CaseOutcome, CheckError> {
        let result: RunCheckResult = self.call("run_check", RunCheckParams { op, case })?;
        Ok(if result.passed {
            CaseOutcome::Passed
        } else {
            CaseOutcome::Failed(result.message.unwrap_or_default())
        })
    }
}

impl Drop for PythonHost {
    fn drop(&mut self) {
        if matches!(self.child.try_wait(), Ok(None)) {
            let _ = self.shutdown();
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
