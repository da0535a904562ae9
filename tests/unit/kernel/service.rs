use super::*;
use crate::kernel::command::{CommandDeclaration, CommandRuntime};
use compact_str::CompactString;
use serde_json::json;

fn service() -> CommandService {
    let registry = Rc::new(CommandRegistry::default());
    registry
        .register(
            CommandDeclaration::new("deleteNotes"),
            CommandRuntime::new(|ctx, _| Ok(json!(ctx.state.selected_note_ids.len())))
                .with_enabled_condition("someNotesSelected"),
        )
        .unwrap();
    CommandService::new(registry, Rc::new(StateStore::default()))
}

#[test]
fn enablement_tracks_store_state() {
    let service = service();
    assert_eq!(service.is_enabled("deleteNotes"), Ok(false));

    service
        .store()
        .update(|state| state.selected_note_ids.push(CompactString::from("n1")));
    assert_eq!(service.is_enabled("deleteNotes"), Ok(true));
}

#[test]
fn execute_sees_current_state() {
    let service = service();
    service.store().update(|state| {
        state.selected_note_ids = vec!["a".into(), "b".into()];
    });
    assert_eq!(service.execute("deleteNotes", &[]), Ok(json!(2)));
}

#[test]
fn handler_can_update_store_while_running() {
    let registry = Rc::new(CommandRegistry::default());
    let store = Rc::new(StateStore::default());
    let handle = Rc::clone(&store);
    registry
        .register(
            CommandDeclaration::new("toggleSideBar"),
            CommandRuntime::new(move |ctx, _| {
                let visible = !ctx.state.sidebar_visible;
                handle.update(|state| state.sidebar_visible = visible);
                Ok(json!(visible))
            }),
        )
        .unwrap();

    let service = CommandService::new(registry, store);
    assert_eq!(service.execute("toggleSideBar", &[]), Ok(json!(false)));
    assert!(!service.store().get_state().sidebar_visible);
}

#[test]
fn custom_context_deriver_is_used() {
    let registry = Rc::new(CommandRegistry::default());
    registry
        .register(
            CommandDeclaration::new("custom"),
            CommandRuntime::new(|_, _| Ok(Value::Null)).with_enabled_condition("alwaysOn"),
        )
        .unwrap();

    let service = CommandService::with_context_deriver(
        registry,
        Rc::new(StateStore::default()),
        Rc::new(|_: &AppState| WhenClauseContext::new().with("alwaysOn", true)),
    );
    assert_eq!(service.current_context().len(), 1);
    assert_eq!(service.is_enabled("custom"), Ok(true));
}
