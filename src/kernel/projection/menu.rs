use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::rc::Rc;

use crate::core::{Result, WhenClauseContext};
use crate::kernel::service::CommandService;

use super::cache::{DescriptorCache, RelevantSnapshot};
use super::ClickHandler;

/// Receives the command name of the clicked menu item.
pub type MenuClickHandler = Rc<dyn Fn(&str) -> Result<Value>>;

pub struct MenuItem {
    pub id: CompactString,
    pub label: String,
    pub click: ClickHandler,
}

impl MenuItem {
    pub fn trigger(&self) -> Result<Value> {
        (self.click)()
    }
}

impl std::fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuItem")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItemProps {
    pub enabled: bool,
}

pub type MenuItems = FxHashMap<CompactString, Rc<MenuItem>>;
pub type MenuItemPropsMap = FxHashMap<CompactString, Rc<MenuItemProps>>;

struct MenuItemsMemo {
    names: Vec<CompactString>,
    on_click: MenuClickHandler,
    items: Rc<MenuItems>,
}

impl MenuItemsMemo {
    fn matches<S: AsRef<str>>(&self, names: &[S], on_click: &MenuClickHandler) -> bool {
        Rc::ptr_eq(&self.on_click, on_click)
            && self.names.len() == names.len()
            && self
                .names
                .iter()
                .zip(names)
                .all(|(cached, name)| cached.as_str() == name.as_ref())
    }
}

pub struct MenuProjection {
    service: CommandService,
    items_memo: Option<MenuItemsMemo>,
    props: DescriptorCache<Rc<MenuItemProps>>,
    last_props: Option<Rc<MenuItemPropsMap>>,
}

impl MenuProjection {
    pub fn new(service: CommandService) -> Self {
        Self {
            service,
            items_memo: None,
            props: DescriptorCache::new(),
            last_props: None,
        }
    }

    /// Menu items whose click routes through `on_click` instead of executing
    /// the command. The same names and the same `on_click` handle return the
    /// same map.
    pub fn commands_to_menu_items<S: AsRef<str>>(
        &mut self,
        names: &[S],
        on_click: &MenuClickHandler,
    ) -> Result<Rc<MenuItems>> {
        if let Some(memo) = &self.items_memo {
            if memo.matches(names, on_click) {
                return Ok(Rc::clone(&memo.items));
            }
        }

        let registry = self.service.registry();
        let mut items = MenuItems::default();
        items.reserve(names.len());
        for name in names {
            let declaration = registry.declaration(name.as_ref())?;
            let handler = Rc::clone(on_click);
            let id = declaration.name.clone();
            let click: ClickHandler = {
                let id = id.clone();
                Rc::new(move || handler(id.as_str()))
            };
            items.insert(
                id.clone(),
                Rc::new(MenuItem {
                    id,
                    label: declaration.label().to_string(),
                    click,
                }),
            );
        }

        let items = Rc::new(items);
        self.items_memo = Some(MenuItemsMemo {
            names: names
                .iter()
                .map(|name| CompactString::from(name.as_ref()))
                .collect(),
            on_click: Rc::clone(on_click),
            items: Rc::clone(&items),
        });
        Ok(items)
    }

    /// Enabled flags keyed by command name, memoized per command on the
    /// context keys its condition references.
    pub fn commands_to_menu_item_props<S: AsRef<str>>(
        &mut self,
        names: &[S],
        ctx: &WhenClauseContext,
    ) -> Result<Rc<MenuItemPropsMap>> {
        let registry = self.service.registry();
        let mut pass = self.props.begin();
        let mut props = MenuItemPropsMap::default();
        props.reserve(names.len());

        for name in names {
            let name = name.as_ref();
            let snapshot = RelevantSnapshot::capture(registry, name, ctx)?;
            let item = self.props.get_or_build(&mut pass, name, snapshot, || {
                Ok(Rc::new(MenuItemProps {
                    enabled: registry.is_enabled(name, ctx)?,
                }))
            })?;
            props.insert(CompactString::from(name), item);
        }

        self.props.commit(pass);

        if let Some(last) = &self.last_props {
            let unchanged = last.len() == props.len()
                && props.iter().all(|(name, item)| {
                    last.get(name)
                        .is_some_and(|cached| Rc::ptr_eq(cached, item))
                });
            if unchanged {
                return Ok(Rc::clone(last));
            }
        }

        let props = Rc::new(props);
        self.last_props = Some(Rc::clone(&props));
        Ok(props)
    }

    pub fn menu_item_props_for_current_state<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<Rc<MenuItemPropsMap>> {
        let ctx = self.service.current_context();
        self.commands_to_menu_item_props(names, &ctx)
    }

    /// A menu item executing `name` with `bound_args` on every click, against
    /// the state current at click time.
    pub fn command_to_stateful_menu_item(
        &self,
        name: &str,
        bound_args: Vec<Value>,
    ) -> Result<MenuItem> {
        let declaration = self.service.registry().declaration(name)?;
        let click: ClickHandler = {
            let service = self.service.clone();
            let name = declaration.name.clone();
            Rc::new(move || service.execute(&name, &bound_args))
        };

        Ok(MenuItem {
            id: declaration.name.clone(),
            label: declaration.label().to_string(),
            click,
        })
    }

    pub fn command_to_menu_item(&self, name: &str) -> Result<MenuItem> {
        self.command_to_stateful_menu_item(name, Vec::new())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/projection/menu.rs"]
mod tests;
