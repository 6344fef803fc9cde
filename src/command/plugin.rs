//! Entry point of a command process.
//!
//! A command artifact's entry executable receives the dispatch payload,
//! picks the implementation registered for the command name and runs it
//! under [`Command::execute`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::dispatch::DispatchPayload;
use crate::error::{report, Result, StencilError};
use crate::ui::UserInterface;

use super::{Command, CommandImpl, DispatchArgs, InitCommand};

/// What a command process knows about where it runs.
#[derive(Debug, Clone)]
pub struct PluginContext {
    /// Working directory inherited from the dispatcher.
    pub cwd: PathBuf,
}

/// Builds a command implementation.
pub type CommandFactory = fn(&PluginContext) -> Result<Box<dyn CommandImpl>>;

/// Command names served by an entry executable.
#[derive(Default)]
pub struct EntryRegistry {
    entries: BTreeMap<String, CommandFactory>,
}

impl EntryRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands built into Stencil.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("init", |ctx| Ok(Box::new(InitCommand::new(&ctx.cwd)?)));
        registry
    }

    /// Serve `name` with `factory`.
    pub fn register(&mut self, name: &str, factory: CommandFactory) {
        self.entries.insert(name.to_string(), factory);
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn create(&self, name: &str, ctx: &PluginContext) -> Result<Box<dyn CommandImpl>> {
        let factory = self
            .entries
            .get(name)
            .ok_or_else(|| StencilError::UnknownCommand {
                name: name.to_string(),
                available: self.names(),
            })?;
        factory(ctx)
    }
}

/// Defers choosing the implementation until the arguments are split.
struct Deferred<'r> {
    registry: &'r EntryRegistry,
    ctx: &'r PluginContext,
    inner: Option<Box<dyn CommandImpl>>,
}

impl CommandImpl for Deferred<'_> {
    fn init(&mut self, args: &DispatchArgs) -> Result<()> {
        let inner = self.inner.insert(self.registry.create(&args.command, self.ctx)?);
        inner.init(args)
    }

    fn exec(&mut self, ui: &mut dyn UserInterface) -> Result<()> {
        match self.inner.as_mut() {
            Some(inner) => inner.exec(ui),
            None => Err(StencilError::NotImplemented { operation: "exec" }),
        }
    }
}

/// Decode `payload` and run the command it names. Returns the exit code.
pub fn run_payload(
    registry: &EntryRegistry,
    payload: &str,
    ctx: &PluginContext,
    ui: &mut dyn UserInterface,
    verbose: bool,
) -> i32 {
    let command = match DispatchPayload::decode(payload)
        .and_then(|payload| Command::new(payload.argv, payload.host))
    {
        Ok(command) => command,
        Err(err) => {
            report(&err, verbose);
            return 1;
        }
    };

    let mut imp = Deferred {
        registry,
        ctx,
        inner: None,
    };
    command.execute(&mut imp, ui, verbose).exit_code
}
