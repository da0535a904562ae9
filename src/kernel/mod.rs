//! Headless command core (state/registry/projections).

pub mod command;
pub mod projection;
pub mod registry;
pub mod service;
pub mod services;
pub mod state;

pub use command::{CommandContext, CommandDeclaration, CommandRuntime, ExecuteFn};
pub use projection::{
    ClickHandler, MenuClickHandler, MenuItem, MenuItemProps, MenuItemPropsMap, MenuItems,
    MenuProjection, ToolbarButtonInfo, ToolbarEntry, ToolbarItem, ToolbarProjection, SEPARATOR,
};
pub use registry::{CommandRegistry, RuntimeId};
pub use service::{CommandService, ContextDeriver};
pub use state::{
    state_to_when_clause_context, AppState, MarkupLanguage, NoteSummary, StateStore,
    CONFLICT_FOLDER_ID,
};
