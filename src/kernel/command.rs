//! Command declarations (identity and display metadata) and runtimes
//! (behavior and enablement).

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;

use crate::core::{Result, WhenClauseContext};

use super::state::AppState;

/// What a command handler sees when it runs.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub state: &'a AppState,
    pub when_clause: &'a WhenClauseContext,
}

pub type ExecuteFn = dyn Fn(&CommandContext<'_>, &[Value]) -> Result<Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDeclaration {
    pub name: CompactString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<CompactString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_label: Option<String>,
}

impl CommandDeclaration {
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            label: None,
            icon_name: None,
            parent_label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_icon(mut self, icon_name: impl Into<CompactString>) -> Self {
        self.icon_name = Some(icon_name.into());
        self
    }

    pub fn with_parent_label(mut self, parent_label: impl Into<String>) -> Self {
        self.parent_label = Some(parent_label.into());
        self
    }

    /// Display label, falling back to the command name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.name.as_str())
    }

    /// Label prefixed with the parent menu label, e.g. "Note: Toggle to-do".
    pub fn full_label(&self) -> String {
        match &self.parent_label {
            Some(parent) => format!("{}: {}", parent, self.label()),
            None => self.label().to_string(),
        }
    }
}

#[derive(Clone)]
pub struct CommandRuntime {
    execute: Rc<ExecuteFn>,
    enabled_condition: Option<CompactString>,
}

impl CommandRuntime {
    pub fn new(
        execute: impl Fn(&CommandContext<'_>, &[Value]) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            execute: Rc::new(execute),
            enabled_condition: None,
        }
    }

    pub fn with_enabled_condition(mut self, condition: impl Into<CompactString>) -> Self {
        self.enabled_condition = Some(condition.into());
        self
    }

    pub fn enabled_condition(&self) -> Option<&str> {
        self.enabled_condition.as_deref()
    }

    pub(crate) fn handler(&self) -> Rc<ExecuteFn> {
        Rc::clone(&self.execute)
    }
}

impl std::fmt::Debug for CommandRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRuntime")
            .field("enabled_condition", &self.enabled_condition)
            .finish_non_exhaustive()
    }
}
