//! Command registry: declarations and runtimes keyed by command name.

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::{
    CommandError, RegistrationKind, Result, WhenClause, WhenClauseContext, WhenClauseMode,
};
use crate::kernel::services::ports::CommandSettings;

use super::command::{CommandContext, CommandDeclaration, CommandRuntime};

/// Identifies one attachment of a runtime. Re-registering a runtime under the
/// same name yields a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuntimeId(u64);

struct RuntimeEntry {
    id: RuntimeId,
    runtime: CommandRuntime,
    condition: Rc<WhenClause>,
}

/// Declarations and runtimes by command name.
///
/// Registration takes `&self`: the registry is shared behind `Rc` by the
/// service and the click handlers of every projection, and handlers may
/// re-enter it while running.
pub struct CommandRegistry {
    mode: WhenClauseMode,
    declarations: RefCell<FxHashMap<CompactString, Rc<CommandDeclaration>>>,
    runtimes: RefCell<FxHashMap<CompactString, RuntimeEntry>>,
    next_runtime_id: Cell<u64>,
}

impl CommandRegistry {
    pub fn new(mode: WhenClauseMode) -> Self {
        Self {
            mode,
            declarations: RefCell::new(FxHashMap::default()),
            runtimes: RefCell::new(FxHashMap::default()),
            next_runtime_id: Cell::new(1),
        }
    }

    pub fn from_settings(settings: &CommandSettings) -> Self {
        Self::new(settings.when_clause_mode)
    }

    pub fn mode(&self) -> WhenClauseMode {
        self.mode
    }

    pub fn register_declaration(&self, declaration: CommandDeclaration) -> Result<()> {
        let mut declarations = self.declarations.borrow_mut();
        if declarations.contains_key(&declaration.name) {
            return Err(CommandError::DuplicateRegistration {
                name: declaration.name,
                kind: RegistrationKind::Declaration,
            });
        }

        tracing::debug!(command = %declaration.name, "register declaration");
        declarations.insert(declaration.name.clone(), Rc::new(declaration));
        Ok(())
    }

    pub fn register_runtime(&self, name: &str, runtime: CommandRuntime) -> Result<RuntimeId> {
        self.ensure_declared(name)?;

        let mut runtimes = self.runtimes.borrow_mut();
        if runtimes.contains_key(name) {
            return Err(CommandError::DuplicateRegistration {
                name: CompactString::from(name),
                kind: RegistrationKind::Runtime,
            });
        }

        let condition = Rc::new(WhenClause::parse(
            runtime.enabled_condition().unwrap_or_default(),
        )?);
        let id = RuntimeId(self.next_runtime_id.get());
        self.next_runtime_id.set(id.0 + 1);

        tracing::debug!(
            command = name,
            condition = condition.source(),
            "register runtime"
        );
        runtimes.insert(
            CompactString::from(name),
            RuntimeEntry {
                id,
                runtime,
                condition,
            },
        );
        Ok(id)
    }

    pub fn register(
        &self,
        declaration: CommandDeclaration,
        runtime: CommandRuntime,
    ) -> Result<RuntimeId> {
        let name = declaration.name.clone();
        self.register_declaration(declaration)?;
        self.register_runtime(&name, runtime)
    }

    pub fn unregister_runtime(&self, name: &str) -> Result<()> {
        if self.runtimes.borrow_mut().remove(name).is_none() {
            return Err(CommandError::CommandNotFound(CompactString::from(name)));
        }
        tracing::debug!(command = name, "unregister runtime");
        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.declarations.borrow().contains_key(name)
    }

    pub fn has_runtime(&self, name: &str) -> bool {
        self.runtimes.borrow().contains_key(name)
    }

    pub fn declaration(&self, name: &str) -> Result<Rc<CommandDeclaration>> {
        self.declarations
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| CommandError::CommandNotFound(CompactString::from(name)))
    }

    pub fn label(&self, name: &str) -> Result<String> {
        Ok(self.declaration(name)?.label().to_string())
    }

    /// Declared command names, sorted.
    pub fn command_names(&self) -> Vec<CompactString> {
        let mut names: Vec<CompactString> = self.declarations.borrow().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn runtime_id(&self, name: &str) -> Option<RuntimeId> {
        self.runtimes.borrow().get(name).map(|entry| entry.id)
    }

    /// The parsed enablement condition, or `None` when no runtime is attached.
    pub fn when_clause(&self, name: &str) -> Result<Option<Rc<WhenClause>>> {
        self.ensure_declared(name)?;
        Ok(self
            .runtimes
            .borrow()
            .get(name)
            .map(|entry| Rc::clone(&entry.condition)))
    }

    /// Context keys the command's enablement depends on.
    pub fn relevant_keys(&self, name: &str) -> Result<Vec<CompactString>> {
        Ok(self
            .when_clause(name)?
            .map(|clause| clause.identifiers().to_vec())
            .unwrap_or_default())
    }

    /// A declared command without a runtime is disabled.
    pub fn is_enabled(&self, name: &str, ctx: &WhenClauseContext) -> Result<bool> {
        match self.when_clause(name)? {
            Some(clause) => clause.evaluate(ctx, self.mode),
            None => Ok(false),
        }
    }

    /// Runs the command's handler. Enablement is not checked here.
    pub fn execute(&self, name: &str, ctx: &CommandContext<'_>, args: &[Value]) -> Result<Value> {
        self.ensure_declared(name)?;
        let handler = self
            .runtimes
            .borrow()
            .get(name)
            .map(|entry| entry.runtime.handler())
            .ok_or_else(|| CommandError::MissingRuntime(CompactString::from(name)))?;

        tracing::debug!(command = name, args = args.len(), "execute command");
        let result = handler(ctx, args);
        if let Err(error) = &result {
            tracing::warn!(command = name, error = %error, "command failed");
        }
        result
    }

    fn ensure_declared(&self, name: &str) -> Result<()> {
        if self.exists(name) {
            Ok(())
        } else {
            Err(CommandError::CommandNotFound(CompactString::from(name)))
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(WhenClauseMode::default())
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("mode", &self.mode)
            .field("declarations", &self.declarations.borrow().len())
            .field("runtimes", &self.runtimes.borrow().len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/registry.rs"]
mod tests;
