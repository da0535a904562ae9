use super::*;

fn ctx(pairs: &[(&str, bool)]) -> WhenClauseContext {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

#[test]
fn missing_expression_is_always_true() {
    let empty = WhenClauseContext::new();
    assert_eq!(evaluate(None, &empty, WhenClauseMode::Strict), Ok(true));
    assert_eq!(evaluate(Some(""), &empty, WhenClauseMode::Strict), Ok(true));
    assert_eq!(evaluate(Some("   "), &empty, WhenClauseMode::Strict), Ok(true));
}

#[test]
fn conjunction_requires_every_key_in_strict_mode() {
    let expr = Some("cond1 && cond2");

    let err = evaluate(expr, &ctx(&[]), WhenClauseMode::Strict).unwrap_err();
    assert!(matches!(err, CommandError::UnknownContextKey { ref key, .. } if key == "cond1"));

    let err = evaluate(expr, &ctx(&[("cond1", true)]), WhenClauseMode::Strict).unwrap_err();
    assert!(matches!(err, CommandError::UnknownContextKey { ref key, .. } if key == "cond2"));

    assert_eq!(
        evaluate(
            expr,
            &ctx(&[("cond1", true), ("cond2", true)]),
            WhenClauseMode::Strict
        ),
        Ok(true)
    );
    assert_eq!(
        evaluate(
            expr,
            &ctx(&[("cond1", true), ("cond2", false)]),
            WhenClauseMode::Strict
        ),
        Ok(false)
    );
}

#[test]
fn strict_mode_checks_keys_that_short_circuit_would_skip() {
    let err = evaluate(
        Some("cond1 && cond2"),
        &ctx(&[("cond1", false)]),
        WhenClauseMode::Strict,
    )
    .unwrap_err();
    assert!(matches!(err, CommandError::UnknownContextKey { ref key, .. } if key == "cond2"));
}

#[test]
fn permissive_mode_treats_missing_keys_as_false() {
    let expr = Some("cond1 && cond2");
    assert_eq!(
        evaluate(expr, &ctx(&[("cond1", true)]), WhenClauseMode::Permissive),
        Ok(false)
    );
    assert_eq!(
        evaluate(Some("!cond1"), &ctx(&[]), WhenClauseMode::Permissive),
        Ok(true)
    );
}

#[test]
fn unknown_key_error_names_the_expression() {
    let err = evaluate(Some("a && b"), &ctx(&[("a", true)]), WhenClauseMode::Strict)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unknown context key \"b\" in when clause \"a && b\""
    );
}

#[test]
fn or_binds_looser_than_and() {
    let values = ctx(&[("a", true), ("b", false), ("c", false)]);
    assert_eq!(
        evaluate(Some("a || b && c"), &values, WhenClauseMode::Strict),
        Ok(true)
    );
    assert_eq!(
        evaluate(Some("(a || b) && c"), &values, WhenClauseMode::Strict),
        Ok(false)
    );
}

#[test]
fn negation_and_literals() {
    let values = ctx(&[("noteIsTodo", false)]);
    assert_eq!(
        evaluate(Some("!noteIsTodo"), &values, WhenClauseMode::Strict),
        Ok(true)
    );
    assert_eq!(
        evaluate(Some("!!noteIsTodo"), &values, WhenClauseMode::Strict),
        Ok(false)
    );
    assert_eq!(
        evaluate(Some("true && !false"), &ctx(&[]), WhenClauseMode::Strict),
        Ok(true)
    );
}

#[test]
fn identifiers_are_deduplicated_in_order() {
    let clause = WhenClause::parse("b && (a || !b) && c.d").unwrap();
    let names: Vec<&str> = clause.identifiers().iter().map(|s| s.as_str()).collect();
    assert_eq!(names, vec!["b", "a", "c.d"]);
    assert_eq!(clause.source(), "b && (a || !b) && c.d");
    assert!(!clause.is_unconditional());
}

#[test]
fn literals_are_not_identifiers() {
    let clause = WhenClause::parse("true || x").unwrap();
    assert_eq!(clause.identifiers().len(), 1);
    assert!(WhenClause::parse("").unwrap().is_unconditional());
}

#[test]
fn malformed_expressions_are_rejected() {
    for source in ["a &", "a && ", "(a", "a)", "a b", "&& a", "a | b", "a == b", "!"] {
        let err = WhenClause::parse(source).unwrap_err();
        assert!(
            matches!(err, CommandError::InvalidWhenClause { .. }),
            "expected parse error for {source:?}, got {err:?}"
        );
    }
}
