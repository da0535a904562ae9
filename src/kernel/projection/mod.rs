//! Projections: cached views of commands shaped for a UI surface.
//!
//! Each projection owns its cache. Descriptors keep their identity
//! (`Rc::ptr_eq`) for as long as the inputs they depend on are unchanged, so
//! views doing shallow comparisons can skip redrawing.

mod cache;
pub mod menu;
pub mod toolbar;

use serde_json::Value;
use std::rc::Rc;

use crate::core::Result;

pub type ClickHandler = Rc<dyn Fn() -> Result<Value>>;

pub use menu::{
    MenuClickHandler, MenuItem, MenuItemProps, MenuItemPropsMap, MenuItems, MenuProjection,
};
pub use toolbar::{ToolbarButtonInfo, ToolbarEntry, ToolbarItem, ToolbarProjection, SEPARATOR};
