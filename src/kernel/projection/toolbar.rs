use compact_str::CompactString;
use serde_json::Value;
use std::rc::Rc;

use crate::core::{Result, WhenClauseContext};
use crate::kernel::service::CommandService;

use super::cache::{DescriptorCache, RelevantSnapshot};
use super::ClickHandler;

/// Marker used in command lists for a toolbar separator.
pub const SEPARATOR: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToolbarEntry {
    Command(CompactString),
    Separator,
}

impl ToolbarEntry {
    pub fn command_name(&self) -> Option<&str> {
        match self {
            ToolbarEntry::Command(name) => Some(name),
            ToolbarEntry::Separator => None,
        }
    }

    /// Builds a toolbar layout from names, treating `"-"` as a separator.
    pub fn list<I, S>(names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| Self::from(name.as_ref()))
            .collect()
    }
}

impl From<&str> for ToolbarEntry {
    fn from(value: &str) -> Self {
        if value == SEPARATOR {
            ToolbarEntry::Separator
        } else {
            ToolbarEntry::Command(CompactString::from(value))
        }
    }
}

pub struct ToolbarButtonInfo {
    pub name: CompactString,
    pub title: String,
    pub tooltip: String,
    pub icon_name: Option<CompactString>,
    pub enabled: bool,
    pub on_click: ClickHandler,
}

impl ToolbarButtonInfo {
    pub fn click(&self) -> Result<Value> {
        (self.on_click)()
    }
}

impl std::fmt::Debug for ToolbarButtonInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolbarButtonInfo")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("tooltip", &self.tooltip)
            .field("icon_name", &self.icon_name)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum ToolbarItem {
    Button(Rc<ToolbarButtonInfo>),
    Separator,
}

impl ToolbarItem {
    pub fn as_button(&self) -> Option<&Rc<ToolbarButtonInfo>> {
        match self {
            ToolbarItem::Button(button) => Some(button),
            ToolbarItem::Separator => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, ToolbarItem::Separator)
    }

    fn same_as(&self, other: &ToolbarItem) -> bool {
        match (self, other) {
            (ToolbarItem::Button(a), ToolbarItem::Button(b)) => Rc::ptr_eq(a, b),
            (ToolbarItem::Separator, ToolbarItem::Separator) => true,
            _ => false,
        }
    }
}

pub struct ToolbarProjection {
    service: CommandService,
    buttons: DescriptorCache<Rc<ToolbarButtonInfo>>,
    last: Option<Rc<[ToolbarItem]>>,
}

impl ToolbarProjection {
    pub fn new(service: CommandService) -> Self {
        Self {
            service,
            buttons: DescriptorCache::new(),
            last: None,
        }
    }

    /// Returns the previous array when every item is unchanged; otherwise a new
    /// array that still shares the unchanged buttons.
    pub fn commands_to_toolbar_buttons(
        &mut self,
        entries: &[ToolbarEntry],
        ctx: &WhenClauseContext,
    ) -> Result<Rc<[ToolbarItem]>> {
        let service = &self.service;
        let mut pass = self.buttons.begin();
        let mut items = Vec::with_capacity(entries.len());

        for entry in entries {
            let item = match entry {
                ToolbarEntry::Separator => ToolbarItem::Separator,
                ToolbarEntry::Command(name) => {
                    let snapshot = RelevantSnapshot::capture(service.registry(), name, ctx)?;
                    let button = self.buttons.get_or_build(&mut pass, name, snapshot, || {
                        build_button(service, name, ctx)
                    })?;
                    ToolbarItem::Button(button)
                }
            };
            items.push(item);
        }

        self.buttons.commit(pass);

        if let Some(last) = &self.last {
            if last.len() == items.len() && last.iter().zip(&items).all(|(a, b)| a.same_as(b)) {
                return Ok(Rc::clone(last));
            }
        }

        let items: Rc<[ToolbarItem]> = items.into();
        self.last = Some(Rc::clone(&items));
        Ok(items)
    }

    pub fn toolbar_buttons_for_current_state(
        &mut self,
        entries: &[ToolbarEntry],
    ) -> Result<Rc<[ToolbarItem]>> {
        let ctx = self.service.current_context();
        self.commands_to_toolbar_buttons(entries, &ctx)
    }
}

fn build_button(
    service: &CommandService,
    name: &str,
    ctx: &WhenClauseContext,
) -> Result<Rc<ToolbarButtonInfo>> {
    let registry = service.registry();
    let declaration = registry.declaration(name)?;
    let enabled = registry.is_enabled(name, ctx)?;

    let on_click: ClickHandler = {
        let service = service.clone();
        let name = declaration.name.clone();
        Rc::new(move || service.execute(&name, &[]))
    };

    Ok(Rc::new(ToolbarButtonInfo {
        name: declaration.name.clone(),
        title: declaration.label().to_string(),
        tooltip: declaration.full_label(),
        icon_name: declaration.icon_name.clone(),
        enabled,
        on_click,
    }))
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/projection/toolbar.rs"]
mod tests;
