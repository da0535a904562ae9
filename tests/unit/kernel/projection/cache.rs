use super::*;
use crate::kernel::command::{CommandDeclaration, CommandRuntime};
use serde_json::Value;
use std::rc::Rc;

fn registry() -> CommandRegistry {
    let registry = CommandRegistry::default();
    registry
        .register(
            CommandDeclaration::new("gated"),
            CommandRuntime::new(|_, _| Ok(Value::Null)).with_enabled_condition("a && b"),
        )
        .unwrap();
    registry
        .register(
            CommandDeclaration::new("free"),
            CommandRuntime::new(|_, _| Ok(Value::Null)),
        )
        .unwrap();
    registry
}

#[test]
fn snapshot_ignores_unreferenced_keys() {
    let registry = registry();
    let base = WhenClauseContext::new().with("a", true).with("b", true);
    let noisy = base.clone().with("unrelated", true);

    assert_eq!(
        RelevantSnapshot::capture(&registry, "gated", &base).unwrap(),
        RelevantSnapshot::capture(&registry, "gated", &noisy).unwrap()
    );
    assert_ne!(
        RelevantSnapshot::capture(&registry, "gated", &base).unwrap(),
        RelevantSnapshot::capture(&registry, "gated", &base.clone().with("b", false)).unwrap()
    );
    assert_eq!(
        RelevantSnapshot::capture(&registry, "free", &base).unwrap(),
        RelevantSnapshot::capture(&registry, "free", &WhenClauseContext::new()).unwrap()
    );
}

#[test]
fn snapshot_changes_with_runtime() {
    let registry = registry();
    let ctx = WhenClauseContext::new();
    let before = RelevantSnapshot::capture(&registry, "free", &ctx).unwrap();

    registry.unregister_runtime("free").unwrap();
    registry
        .register_runtime("free", CommandRuntime::new(|_, _| Ok(Value::Null)))
        .unwrap();

    let after = RelevantSnapshot::capture(&registry, "free", &ctx).unwrap();
    assert_ne!(before, after);
}

#[test]
fn snapshot_of_unknown_command_fails() {
    let registry = registry();
    assert!(RelevantSnapshot::capture(&registry, "nope", &WhenClauseContext::new()).is_err());
}

#[test]
fn get_or_build_reuses_until_snapshot_changes() {
    let registry = registry();
    let mut cache: DescriptorCache<Rc<u32>> = DescriptorCache::new();
    let ctx = WhenClauseContext::new().with("a", true).with("b", true);

    let snap = RelevantSnapshot::capture(&registry, "gated", &ctx).unwrap();
    let mut pass = cache.begin();
    let first = cache
        .get_or_build(&mut pass, "gated", snap.clone(), || Ok(Rc::new(1)))
        .unwrap();
    cache.commit(pass);

    let mut pass = cache.begin();
    let second = cache
        .get_or_build(&mut pass, "gated", snap, || panic!("must not rebuild"))
        .unwrap();
    cache.commit(pass);
    assert!(Rc::ptr_eq(&first, &second));

    let changed = RelevantSnapshot::capture(&registry, "gated", &ctx.with("a", false)).unwrap();
    let mut pass = cache.begin();
    let third = cache
        .get_or_build(&mut pass, "gated", changed, || Ok(Rc::new(2)))
        .unwrap();
    assert_eq!(*third, 2);
    assert!(!Rc::ptr_eq(&first, &third));
}

#[test]
fn uncommitted_pass_leaves_cache_untouched() {
    let registry = registry();
    let mut cache: DescriptorCache<Rc<u32>> = DescriptorCache::new();
    let on = WhenClauseContext::new().with("a", true).with("b", true);
    let off = on.clone().with("b", false);

    let mut pass = cache.begin();
    let snap = RelevantSnapshot::capture(&registry, "gated", &on).unwrap();
    let first = cache
        .get_or_build(&mut pass, "gated", snap, || Ok(Rc::new(1)))
        .unwrap();
    cache.commit(pass);

    // Rebuilt under a new snapshot, then abandoned as a failed call would.
    let mut pass = cache.begin();
    let snap = RelevantSnapshot::capture(&registry, "gated", &off).unwrap();
    cache
        .get_or_build(&mut pass, "gated", snap, || Ok(Rc::new(2)))
        .unwrap();
    let snap = RelevantSnapshot::capture(&registry, "free", &off).unwrap();
    let result = cache.get_or_build(&mut pass, "free", snap, || {
        Err(crate::core::CommandError::CommandNotFound("free".into()))
    });
    assert!(result.is_err());
    drop(pass);

    let mut pass = cache.begin();
    let snap = RelevantSnapshot::capture(&registry, "gated", &on).unwrap();
    let again = cache
        .get_or_build(&mut pass, "gated", snap, || panic!("must not rebuild"))
        .unwrap();
    assert!(Rc::ptr_eq(&first, &again));
    assert_eq!(cache.len(), 1);
}

#[test]
fn commit_prunes_names_missing_from_pass() {
    let registry = registry();
    let mut cache: DescriptorCache<Rc<u32>> = DescriptorCache::new();
    let ctx = WhenClauseContext::new().with("a", true).with("b", true);

    let mut pass = cache.begin();
    for name in ["gated", "free"] {
        let snap = RelevantSnapshot::capture(&registry, name, &ctx).unwrap();
        cache.get_or_build(&mut pass, name, snap, || Ok(Rc::new(0))).unwrap();
    }
    cache.commit(pass);
    assert_eq!(cache.len(), 2);

    let mut pass = cache.begin();
    let snap = RelevantSnapshot::capture(&registry, "free", &ctx).unwrap();
    cache.get_or_build(&mut pass, "free", snap, || Ok(Rc::new(0))).unwrap();
    cache.commit(pass);
    assert_eq!(cache.len(), 1);
}
