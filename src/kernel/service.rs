//! Command service: the registry bound to the application state it runs against.

use serde_json::Value;
use std::rc::Rc;

use crate::core::{Result, WhenClauseContext};

use super::command::CommandContext;
use super::registry::CommandRegistry;
use super::state::{state_to_when_clause_context, AppState, StateStore};

pub type ContextDeriver = Rc<dyn Fn(&AppState) -> WhenClauseContext>;

/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct CommandService {
    registry: Rc<CommandRegistry>,
    store: Rc<StateStore>,
    derive_context: ContextDeriver,
}

impl CommandService {
    pub fn new(registry: Rc<CommandRegistry>, store: Rc<StateStore>) -> Self {
        Self::with_context_deriver(registry, store, Rc::new(state_to_when_clause_context))
    }

    pub fn with_context_deriver(
        registry: Rc<CommandRegistry>,
        store: Rc<StateStore>,
        derive_context: ContextDeriver,
    ) -> Self {
        Self {
            registry,
            store,
            derive_context,
        }
    }

    pub fn registry(&self) -> &Rc<CommandRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Rc<StateStore> {
        &self.store
    }

    pub fn current_context(&self) -> WhenClauseContext {
        (self.derive_context)(&*self.store.get_state())
    }

    pub fn is_enabled(&self, name: &str) -> Result<bool> {
        self.registry.is_enabled(name, &self.current_context())
    }

    /// Executes against a snapshot of the current state, so handlers are free
    /// to update the store while they run.
    pub fn execute(&self, name: &str, args: &[Value]) -> Result<Value> {
        let state = self.store.get_state().clone();
        let when_clause = (self.derive_context)(&state);
        let ctx = CommandContext {
            state: &state,
            when_clause: &when_clause,
        };
        self.registry.execute(name, &ctx, args)
    }
}

impl std::fmt::Debug for CommandService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandService")
            .field("registry", &self.registry)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/service.rs"]
mod tests;
