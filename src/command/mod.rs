//! The contract every command implementation runs under.
//!
//! A command process receives the argument list built by the dispatcher:
//! positional strings, then an options object, then a command reference
//! `{"name": ...}`. [`Command::run`] checks the host runtime, splits that
//! list into [`DispatchArgs`], and drives a [`CommandImpl`] through `init`
//! and `exec`, stopping at the first failure.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use stencil::command::{Command, CommandImpl, DispatchArgs, RuntimeInfo};
//! use stencil::ui::{MockUI, UserInterface};
//!
//! #[derive(Default)]
//! struct Hello {
//!     who: String,
//! }
//!
//! impl CommandImpl for Hello {
//!     fn init(&mut self, args: &DispatchArgs) -> stencil::Result<()> {
//!         self.who = args.positional.first().cloned().unwrap_or_default();
//!         Ok(())
//!     }
//!
//!     fn exec(&mut self, ui: &mut dyn UserInterface) -> stencil::Result<()> {
//!         ui.message(&format!("hello {}", self.who));
//!         Ok(())
//!     }
//! }
//!
//! let argv = vec![json!("world"), json!({}), json!({"name": "hello"})];
//! let mut command = Command::new(argv, RuntimeInfo::current()).unwrap();
//! let mut ui = MockUI::new();
//!
//! let result = command.execute(&mut Hello::default(), &mut ui, false);
//! assert!(result.success);
//! assert_eq!(ui.messages(), ["hello world"]);
//! ```

pub mod init;
pub mod plugin;

use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{report, Result, StencilError};
use crate::ui::UserInterface;

pub use init::InitCommand;
pub use plugin::{run_payload, EntryRegistry, PluginContext};

/// Oldest host version a command implementation accepts.
pub const MIN_HOST_VERSION: &str = "0.1.0";

/// A primitive option value that survives the process boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean flag.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Fractional number.
    Float(f64),
    /// Text.
    String(String),
}

impl OptionValue {
    /// Convert a JSON value; nulls, arrays and objects have no counterpart.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Flat option map passed to command implementations.
pub type Options = BTreeMap<String, OptionValue>;

/// Arguments handed to [`CommandImpl::init`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchArgs {
    /// Positional arguments, in order.
    pub positional: Vec<String>,
    /// Options given on the command line.
    pub options: Options,
    /// Name of the command being run.
    pub command: String,
}

impl DispatchArgs {
    /// Whether a boolean option is set.
    pub fn flag(&self, key: &str) -> bool {
        match self.options.get(key) {
            Some(OptionValue::Bool(b)) => *b,
            Some(OptionValue::String(s)) => s == "true",
            _ => false,
        }
    }

    /// A text option.
    pub fn option_str(&self, key: &str) -> Option<&str> {
        match self.options.get(key) {
            Some(OptionValue::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// The program hosting a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    /// Host program name.
    pub name: String,
    /// Host program version.
    pub version: String,
}

impl RuntimeInfo {
    /// This build of Stencil.
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Hooks a command implementation provides.
///
/// Both default bodies fail with [`StencilError::NotImplemented`].
pub trait CommandImpl {
    /// Take what the command needs from its arguments.
    fn init(&mut self, args: &DispatchArgs) -> Result<()> {
        let _ = args;
        Err(StencilError::NotImplemented { operation: "init" })
    }

    /// Do the work.
    fn exec(&mut self, ui: &mut dyn UserInterface) -> Result<()> {
        let _ = ui;
        Err(StencilError::NotImplemented { operation: "exec" })
    }
}

/// Result of running a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// One invocation of a command implementation.
#[derive(Debug)]
pub struct Command {
    argv: Vec<Value>,
    host: RuntimeInfo,
}

impl Command {
    /// Wrap the raw argument list. It must not be empty.
    pub fn new(argv: Vec<Value>, host: RuntimeInfo) -> Result<Self> {
        if argv.is_empty() {
            return Err(StencilError::InvalidArguments {
                message: "argument list is empty".to_string(),
            });
        }
        Ok(Self { argv, host })
    }

    /// The raw argument list.
    pub fn argv(&self) -> &[Value] {
        &self.argv
    }

    /// The host that dispatched this command.
    pub fn host(&self) -> &RuntimeInfo {
        &self.host
    }

    /// Refuse hosts older than [`MIN_HOST_VERSION`].
    pub fn check_runtime_version(&self) -> Result<()> {
        let unsupported = || StencilError::UnsupportedRuntime {
            runtime: self.host.name.clone(),
            current: self.host.version.clone(),
            required: MIN_HOST_VERSION.to_string(),
        };

        let current = Version::parse(&self.host.version).map_err(|_| unsupported())?;
        let required = Version::parse(MIN_HOST_VERSION).map_err(|e| {
            StencilError::Other(anyhow::anyhow!("bad minimum host version: {}", e))
        })?;

        if current < required {
            return Err(unsupported());
        }
        Ok(())
    }

    /// Split the raw list into positional arguments, options and command name.
    pub fn split_args(&self) -> Result<DispatchArgs> {
        let invalid = |message: String| StencilError::InvalidArguments { message };

        let [rest @ .., options, command] = self.argv.as_slice() else {
            return Err(invalid(format!(
                "expected at least an options object and a command reference, got {} argument(s)",
                self.argv.len()
            )));
        };

        let command = command
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("last argument must be a command reference with a name".into()))?
            .to_string();

        let options = options
            .as_object()
            .ok_or_else(|| invalid("second-to-last argument must be an options object".into()))?
            .iter()
            .filter_map(|(k, v)| OptionValue::from_json(v).map(|v| (k.clone(), v)))
            .collect();

        let positional = rest
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(format!("positional argument {} is not a string", i)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DispatchArgs {
            positional,
            options,
            command,
        })
    }

    /// Check, split, `init`, `exec`; the first failure stops the chain.
    pub fn run(&self, imp: &mut dyn CommandImpl, ui: &mut dyn UserInterface) -> Result<()> {
        self.check_runtime_version()?;
        let args = self.split_args()?;
        tracing::debug!(
            "Running {} with {} positional argument(s) and options {:?}",
            args.command,
            args.positional.len(),
            args.options
        );
        imp.init(&args)?;
        imp.exec(ui)
    }

    /// Run and turn any failure into a logged exit code of 1.
    pub fn execute(
        &self,
        imp: &mut dyn CommandImpl,
        ui: &mut dyn UserInterface,
        verbose: bool,
    ) -> CommandResult {
        match self.run(imp, ui) {
            Ok(()) => CommandResult::success(),
            Err(err) => {
                report(&err, verbose);
                CommandResult::failure(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use serde_json::json;

    struct Unimplemented;

    impl CommandImpl for Unimplemented {}

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        fail_init: bool,
        args: Option<DispatchArgs>,
    }

    impl CommandImpl for Recorder {
        fn init(&mut self, args: &DispatchArgs) -> Result<()> {
            self.calls.push("init");
            self.args = Some(args.clone());
            if self.fail_init {
                return Err(StencilError::InvalidArguments {
                    message: "bad init".into(),
                });
            }
            Ok(())
        }

        fn exec(&mut self, _ui: &mut dyn UserInterface) -> Result<()> {
            self.calls.push("exec");
            Ok(())
        }
    }

    fn host(version: &str) -> RuntimeInfo {
        RuntimeInfo {
            name: "stencil".into(),
            version: version.into(),
        }
    }

    fn argv() -> Vec<Value> {
        vec![
            json!("my-app"),
            json!({"force": true, "depth": 2, "ratio": 0.5, "tag": "x", "nested": {"a": 1}}),
            json!({"name": "init"}),
        ]
    }

    #[test]
    fn empty_argv_is_rejected() {
        let err = Command::new(vec![], RuntimeInfo::current()).unwrap_err();
        assert!(matches!(err, StencilError::InvalidArguments { .. }));
    }

    #[test]
    fn split_args_shapes() {
        let args = Command::new(argv(), RuntimeInfo::current())
            .unwrap()
            .split_args()
            .unwrap();

        assert_eq!(args.positional, vec!["my-app"]);
        assert_eq!(args.command, "init");
        assert!(args.flag("force"));
        assert_eq!(args.options.get("depth"), Some(&OptionValue::Int(2)));
        assert_eq!(args.options.get("ratio"), Some(&OptionValue::Float(0.5)));
        assert_eq!(args.option_str("tag"), Some("x"));
        assert!(!args.options.contains_key("nested"));
    }

    #[test]
    fn split_args_without_positionals() {
        let command = Command::new(
            vec![json!({}), json!({"name": "init"})],
            RuntimeInfo::current(),
        )
        .unwrap();
        let args = command.split_args().unwrap();

        assert!(args.positional.is_empty());
        assert!(!args.flag("force"));
    }

    #[test]
    fn split_args_rejects_bad_shapes() {
        let cases = vec![
            vec![json!({"name": "init"})],
            vec![json!({}), json!("init")],
            vec![json!({}), json!({"label": "init"})],
            vec![json!([]), json!({"name": "init"})],
            vec![json!(3), json!({}), json!({"name": "init"})],
        ];

        for argv in cases {
            let command = Command::new(argv.clone(), RuntimeInfo::current()).unwrap();
            let err = command.split_args().unwrap_err();
            assert!(
                matches!(err, StencilError::InvalidArguments { .. }),
                "expected InvalidArguments for {:?}",
                argv
            );
        }
    }

    #[test]
    fn old_host_is_unsupported() {
        let command = Command::new(argv(), host("0.0.9")).unwrap();
        let err = command.check_runtime_version().unwrap_err();
        assert!(matches!(err, StencilError::UnsupportedRuntime { .. }));
    }

    #[test]
    fn unparseable_host_is_unsupported() {
        let command = Command::new(argv(), host("eleven")).unwrap();
        assert!(command.check_runtime_version().is_err());
    }

    #[test]
    fn current_host_is_supported() {
        let command = Command::new(argv(), RuntimeInfo::current()).unwrap();
        assert!(command.check_runtime_version().is_ok());
    }

    #[test]
    fn run_calls_init_then_exec() {
        let command = Command::new(argv(), RuntimeInfo::current()).unwrap();
        let mut imp = Recorder::default();

        command.run(&mut imp, &mut MockUI::new()).unwrap();

        assert_eq!(imp.calls, vec!["init", "exec"]);
        assert_eq!(imp.args.unwrap().positional, vec!["my-app"]);
    }

    #[test]
    fn init_failure_skips_exec() {
        let command = Command::new(argv(), RuntimeInfo::current()).unwrap();
        let mut imp = Recorder {
            fail_init: true,
            ..Default::default()
        };

        assert!(command.run(&mut imp, &mut MockUI::new()).is_err());
        assert_eq!(imp.calls, vec!["init"]);
    }

    #[test]
    fn runtime_failure_skips_everything() {
        let command = Command::new(argv(), host("0.0.1")).unwrap();
        let mut imp = Recorder::default();

        let result = command.execute(&mut imp, &mut MockUI::new(), false);

        assert_eq!(result, CommandResult::failure(1));
        assert!(imp.calls.is_empty());
    }

    #[test]
    fn default_hooks_are_not_implemented() {
        let command = Command::new(argv(), RuntimeInfo::current()).unwrap();
        let err = command
            .run(&mut Unimplemented, &mut MockUI::new())
            .unwrap_err();
        assert!(matches!(
            err,
            StencilError::NotImplemented { operation: "init" }
        ));

        let err = Unimplemented.exec(&mut MockUI::new()).unwrap_err();
        assert!(matches!(
            err,
            StencilError::NotImplemented { operation: "exec" }
        ));
    }

    #[test]
    fn execute_failure_is_exit_code_one() {
        let command = Command::new(argv(), RuntimeInfo::current()).unwrap();

        let result = command.execute(&mut Unimplemented, &mut MockUI::new(), true);

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    struct FailingExec {
        ran_exec: bool,
    }

    impl CommandImpl for FailingExec {
        fn init(&mut self, _args: &DispatchArgs) -> Result<()> {
            Ok(())
        }

        fn exec(&mut self, _ui: &mut dyn UserInterface) -> Result<()> {
            self.ran_exec = true;
            Err(StencilError::Other(
                anyhow::anyhow!("disk full").context("writing project files"),
            ))
        }
    }

    #[test]
    fn exec_failure_is_reported_not_raised() {
        let command = Command::new(argv(), RuntimeInfo::current()).unwrap();

        for verbose in [false, true] {
            let mut imp = FailingExec { ran_exec: false };
            let result = command.execute(&mut imp, &mut MockUI::new(), verbose);

            assert!(imp.ran_exec);
            assert_eq!(result, CommandResult::failure(1));
        }
    }

    #[test]
    fn option_value_from_json() {
        assert_eq!(OptionValue::from_json(&json!(true)), Some(OptionValue::Bool(true)));
        assert_eq!(OptionValue::from_json(&json!(null)), None);
        assert_eq!(OptionValue::from_json(&json!([1])), None);
    }
}
