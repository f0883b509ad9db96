use super::*;
use std::collections::HashMap;

fn names(registry: &TemplateRegistry) -> Vec<&str> {
    registry.iter().map(|t| t.name()).collect()
}

fn bindings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ========================================================================
// escape / mark / parse
// ========================================================================

#[test]
fn test_escape_literals_doubles_braces() {
    assert_eq!(escape_literals("static { x(); }"), "static {{ x(); }}");
    assert_eq!(escape_literals("no braces"), "no braces");
}

#[test]
fn test_mark_placeholders() {
    assert_eq!(mark_placeholders("run $cmd$ now"), "run {cmd} now");
    assert_eq!(mark_placeholders("$host$:$port$"), "{host}:{port}");
}

#[test]
fn test_mark_placeholders_leaves_lone_sentinels() {
    assert_eq!(mark_placeholders("cost $5"), "cost $5");
    assert_eq!(mark_placeholders("$$"), "$$");
    assert_eq!(mark_placeholders("a$ b$"), "a$ b$");
    assert_eq!(mark_placeholders("$a$b$"), "{a}b$");
    assert_eq!(mark_placeholders("Foo$Bar"), "Foo$Bar");
}

#[test]
fn test_parse_tokens() {
    let tokens = parse("x {{ {name} }}").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Literal("x { ".to_string()),
            Token::Placeholder("name".to_string()),
            Token::Literal(" }".to_string()),
        ]
    );
}

#[test]
fn test_parse_rejects_unmatched_braces() {
    assert!(matches!(parse("a } b"), Err(TemplateError::Malformed { .. })));
    assert!(matches!(parse("a {b"), Err(TemplateError::Malformed { .. })));
    assert!(matches!(parse("{}"), Err(TemplateError::Malformed { .. })));
    assert!(matches!(parse("{a b}"), Err(TemplateError::Malformed { .. })));
}

#[test]
fn test_parse_reports_position() {
    match parse("abc}") {
        Err(TemplateError::Malformed { position, .. }) => assert_eq!(position, 3),
        other => panic!("unexpected: {:?}", other),
    }
}

// ========================================================================
// Template resolution
// ========================================================================

#[test]
fn test_literal_braces_survive_resolution() {
    let body = "if (x) { System.out.println(\"$msg$\"); } else { }";
    let template = Template::compile(body).unwrap();
    let resolved = template.resolve(&bindings(&[("msg", "hi")])).unwrap();
    assert_eq!(
        resolved,
        "if (x) { System.out.println(\"hi\"); } else { }"
    );
}

#[test]
fn test_template_without_placeholders_round_trips() {
    let body = "static { int[] a = new int[]{1, 2}; }";
    let template = Template::compile(body).unwrap();
    assert!(template.placeholders().is_empty());
    assert_eq!(template.resolve(&HashMap::new()).unwrap(), body);
}

#[test]
fn test_repeated_placeholder_substituted_everywhere() {
    let template = Template::compile("$a$-$a$-$b$").unwrap();
    assert_eq!(template.placeholders(), vec!["a", "b"]);
    let resolved = template.resolve(&bindings(&[("a", "1"), ("b", "2")])).unwrap();
    assert_eq!(resolved, "1-1-2");
}

#[test]
fn test_value_with_braces_and_sentinel_inserted_verbatim() {
    let template = Template::compile("x=$v$;").unwrap();
    let resolved = template.resolve(&bindings(&[("v", "{$y$}")])).unwrap();
    assert_eq!(resolved, "x={$y$};");
}

#[test]
fn test_unbound_placeholder_fails() {
    let template = Template::compile("$host$:$port$").unwrap();
    let result = template.resolve(&bindings(&[("host", "h")]));
    assert_eq!(result, Err(TemplateError::UnknownPlaceholder("port".to_string())));
}

// ========================================================================
// Bindings
// ========================================================================

#[test]
fn test_parse_binding_splits_at_first_equals() {
    assert_eq!(
        parse_binding("cmd=echo a=b").unwrap(),
        ("cmd".to_string(), "echo a=b".to_string())
    );
    assert_eq!(parse_binding("k=").unwrap(), ("k".to_string(), String::new()));
}

#[test]
fn test_parse_binding_without_equals_fails() {
    let result = parse_binding("cmd");
    assert_eq!(result, Err(TemplateError::MalformedBinding("cmd".to_string())));
    assert!(result.unwrap_err().to_string().contains("key=value"));
}

#[test]
fn test_later_binding_overrides() {
    let parsed = parse_bindings(&["a=1", "a=2"]).unwrap();
    assert_eq!(parsed.get("a").map(String::as_str), Some("2"));
}

// ========================================================================
// Registry
// ========================================================================

#[test]
fn test_builtin_registry_has_default_first() {
    let registry = TemplateRegistry::builtin().unwrap();
    assert_eq!(names(&registry), vec!["default", "cmd", "canary"]);
    assert!(registry.default_template().is_ok());
}

#[test]
fn test_builtin_bodies_round_trip_braces() {
    let registry = TemplateRegistry::builtin().unwrap();
    let cmd = registry.get("cmd").unwrap();
    assert_eq!(cmd.template().placeholders(), vec!["cmd"]);

    let resolved = cmd
        .template()
        .resolve(&bindings(&[("cmd", "id")]))
        .unwrap();
    assert_eq!(resolved, cmd.body().replace("$cmd$", "id"));
    assert!(resolved.contains("new String[]{\"bash\", \"-c\", \"id\"}"));
    assert!(resolved.contains("} catch (Exception e) {"));
}

#[test]
fn test_register_replaces_existing() {
    let mut registry = TemplateRegistry::builtin().unwrap();
    registry.register(PayloadTemplate::new("default", "int x = 1;").unwrap());
    assert_eq!(names(&registry).len(), 3);
    assert_eq!(registry.default_template().unwrap().body(), "int x = 1;");

    registry.register(PayloadTemplate::new("extra", "int y = 2;").unwrap());
    assert_eq!(names(&registry).last(), Some(&"extra"));
}

#[test]
fn test_select_unknown_template() {
    let registry = TemplateRegistry::builtin().unwrap();
    let result = registry.select("nope");
    assert!(matches!(result, Err(TemplateError::UnknownTemplate(name)) if name == "nope"));
}

// ========================================================================
// Payload selection
// ========================================================================

#[test]
fn test_payload_and_template_are_exclusive() {
    let result = PayloadSource::from_options(
        Some("x();".to_string()),
        Some("cmd".to_string()),
        Vec::new(),
    );
    assert!(matches!(result, Err(crate::PoisonError::Usage(_))));
}

#[test]
fn test_template_args_require_template() {
    let result = PayloadSource::from_options(None, None, vec!["a=b".to_string()]);
    assert!(matches!(result, Err(crate::PoisonError::Usage(_))));

    let result =
        PayloadSource::from_options(Some("x();".to_string()), None, vec!["a=b".to_string()]);
    assert!(matches!(result, Err(crate::PoisonError::Usage(_))));
}

#[test]
fn test_source_selection() {
    assert_eq!(
        PayloadSource::from_options(None, None, Vec::new()).unwrap(),
        PayloadSource::Default
    );
    assert_eq!(
        PayloadSource::from_options(Some("x();".to_string()), None, Vec::new()).unwrap(),
        PayloadSource::Literal("x();".to_string())
    );
}

#[test]
fn test_resolve_default_payload() {
    let registry = TemplateRegistry::builtin().unwrap();
    let payload = ResolvedPayload::resolve(&registry, &PayloadSource::Default).unwrap();
    assert_eq!(payload.body(), "System.out.println(\"pwned!\");");
    assert_eq!(payload.origin(), "default");
}

#[test]
fn test_literal_payload_is_not_substituted() {
    let registry = TemplateRegistry::builtin().unwrap();
    let source = PayloadSource::Literal("String s = \"$cmd$ {x}\";".to_string());
    let payload = ResolvedPayload::resolve(&registry, &source).unwrap();
    assert_eq!(payload.body(), "String s = \"$cmd$ {x}\";");
    assert_eq!(payload.origin(), "literal");
}

#[test]
fn test_resolve_template_with_args() {
    let registry = TemplateRegistry::builtin().unwrap();
    let source = PayloadSource::Template {
        name: "canary".to_string(),
        args: vec!["path=/tmp/loaded.txt".to_string()],
    };
    let payload = ResolvedPayload::resolve(&registry, &source).unwrap();
    assert!(payload.body().contains("Paths.get(\"/tmp/loaded.txt\")"));
    assert_eq!(payload.origin(), "template:canary");
}

#[test]
fn test_resolve_template_missing_arg() {
    let registry = TemplateRegistry::builtin().unwrap();
    let source = PayloadSource::Template {
        name: "cmd".to_string(),
        args: Vec::new(),
    };
    let result = ResolvedPayload::resolve(&registry, &source);
    assert_eq!(result, Err(TemplateError::UnknownPlaceholder("cmd".to_string())));
}

#[test]
fn test_resolve_template_malformed_arg() {
    let registry = TemplateRegistry::builtin().unwrap();
    let source = PayloadSource::Template {
        name: "cmd".to_string(),
        args: vec!["cmd".to_string()],
    };
    let result = ResolvedPayload::resolve(&registry, &source);
    assert!(matches!(result, Err(TemplateError::MalformedBinding(_))));
}

#[test]
fn test_resolve_unknown_template() {
    let registry = TemplateRegistry::builtin().unwrap();
    let source = PayloadSource::Template {
        name: "revshell".to_string(),
        args: Vec::new(),
    };
    let result = ResolvedPayload::resolve(&registry, &source);
    assert!(matches!(result, Err(TemplateError::UnknownTemplate(_))));
}

#[test]
fn test_payload_digest_is_stable() {
    let a = ResolvedPayload::literal("x();");
    let b = ResolvedPayload::literal("x();");
    assert_eq!(a.sha256(), b.sha256());
    assert_eq!(a.sha256().len(), 64);
}
