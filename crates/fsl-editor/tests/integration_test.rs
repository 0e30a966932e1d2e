//! Integration tests for fsl-editor components
//!
//! Drives the public API the way an editor host does: documents are opened,
//! edited and closed through the session manager, and the token cache and
//! completion follow along.

use fsl_editor::*;
use pretty_assertions::assert_eq;
use std::collections::HashMap;

const SHADER: &str = "\
#include common
// Fragment entry point
vec4 main(float2 uv : TEXCOORD0) : SV_Target {
    /* sample the
       base texture */
    float4 color = tex2D(base, uv);
    if (color.a < 0.5) { discard; }
    return lerp(color, fog[0], 0.25);
}
";

fn language() -> LanguageConfig {
    LanguageConfig::new()
        .with_keywords(["if", "return", "discard"])
        .with_types(["vec4", "float2", "float4"])
        .with_functions(["tex2D", "lerp"])
        .with_semantics(["TEXCOORD0", "SV_Target"])
}

fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|item| item.label.as_str()).collect()
}

#[test]
fn test_document_lifecycle_drives_token_cache() {
    let mut sessions = EditorSessionManager::new(SessionConfig::default(), language()).unwrap();

    sessions.open_document("main.fsl", SHADER).unwrap();
    let cached = sessions.token_cache().get("main.fsl").unwrap();
    assert!(cached.contains(TokenCategory::Keyword, "#include"));
    assert!(cached.contains(TokenCategory::Semantic, "SV_Target"));
    assert!(cached.contains(TokenCategory::Function, "tex2D"));
    assert!(!cached.contains(TokenCategory::Keyword, "sample"));

    sessions
        .update_document("main.fsl", "return tex2D(base, uv);")
        .unwrap();
    let cached = sessions.token_cache().get("main.fsl").unwrap();
    assert!(!cached.contains(TokenCategory::Semantic, "SV_Target"));
    assert!(cached.contains(TokenCategory::Keyword, "return"));

    sessions.close_document("main.fsl").unwrap();
    assert!(sessions.token_cache().is_empty());
}

#[test]
fn test_completion_for_shader() {
    let mut sessions = EditorSessionManager::new(SessionConfig::default(), language()).unwrap();
    sessions.open_document("main.fsl", SHADER).unwrap();

    let items = sessions.completions("main.fsl").unwrap();
    assert_eq!(
        labels(&items),
        vec![
            "#include",
            "discard",
            "if",
            "return",
            "float2",
            "float4",
            "vec4",
            "lerp",
            "tex2D",
            "SV_Target",
            "TEXCOORD0",
        ]
    );
    assert_eq!(items[4].kind, Some(CompletionKind::TypeParameter));
    assert_eq!(items[9].kind, None);
}

#[test]
fn test_documents_are_isolated() {
    let mut sessions = EditorSessionManager::new(SessionConfig::default(), language()).unwrap();
    sessions.open_document("a.fsl", "return lerp(a, b, t);").unwrap();
    sessions.open_document("b.fsl", "if (x) discard;").unwrap();

    assert_eq!(
        labels(&sessions.completions("a.fsl").unwrap()),
        vec!["return", "lerp"]
    );
    assert_eq!(
        labels(&sessions.completions("b.fsl").unwrap()),
        vec!["discard", "if"]
    );

    sessions.close_document("a.fsl").unwrap();
    assert_eq!(sessions.token_cache().len(), 1);
    assert!(sessions.token_cache().contains("b.fsl"));
}

#[test]
fn test_semantic_tokens_match_core_encoding() {
    let mut sessions = EditorSessionManager::new(SessionConfig::default(), language()).unwrap();
    sessions.open_document("main.fsl", SHADER).unwrap();

    let tokenizer = SemanticTokenizer::new(&language()).unwrap();
    let legend = TokenLegend::new();
    let mut builder = fsl_core::SemanticTokensBuilder::new(&legend).with_source(SHADER);
    builder.extend(tokenizer.tokenize(SHADER));

    assert_eq!(sessions.semantic_tokens("main.fsl").unwrap(), builder.build());
}

#[test]
fn test_commands_through_session() {
    let mut sessions = EditorSessionManager::new(SessionConfig::default(), language()).unwrap();
    sessions.open_document("main.fsl", "return lerp(a, b, t);").unwrap();

    let mut args = HashMap::new();
    args.insert("prefix".to_string(), "le".to_string());
    let result = sessions
        .execute_command("complete.suggest", Some("main.fsl"), &args)
        .unwrap();
    assert!(result.success);
    assert_eq!(
        result.data.get("completion_0").map(String::as_str),
        Some("lerp")
    );

    let result = sessions
        .execute_command("semantic.tokenize", Some("main.fsl"), &HashMap::new())
        .unwrap();
    assert_eq!(result.data.get("spans").map(String::as_str), Some("4"));

    let err = sessions
        .execute_command("missing.command", Some("main.fsl"), &HashMap::new())
        .unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn test_span_cap_applies_to_encoding() {
    let config = SessionConfig::default().with_setting("semantic.max_spans", "3");
    let mut sessions = EditorSessionManager::new(config, language()).unwrap();
    sessions.open_document("main.fsl", "if (x) return;").unwrap();
    assert_eq!(sessions.semantic_tokens("main.fsl").unwrap().len(), 15);

    // A cap inside a bracket pair drops the whole pair
    sessions.set_config("semantic.max_spans", "1").unwrap();
    assert!(sessions.semantic_tokens("main.fsl").unwrap().is_empty());
}

#[test]
fn test_config_loaded_from_json() {
    let config = LanguageConfig::from_json_str(
        r#"{ "fluffsl": { "keywords": ["kernel"], "types": ["half"] } }"#,
    )
    .unwrap();
    let mut sessions = EditorSessionManager::new(SessionConfig::default(), config).unwrap();
    sessions.open_document("k.fsl", "kernel half h;").unwrap();

    assert_eq!(
        labels(&sessions.completions("k.fsl").unwrap()),
        vec!["kernel", "half"]
    );
}

#[test]
fn test_errors_carry_context() {
    let mut sessions = EditorSessionManager::new(SessionConfig::default(), language()).unwrap();

    let err = sessions.completions("nope.fsl").unwrap_err();
    assert_eq!(err.to_string(), "Document not found: nope.fsl");
    assert!(err.as_core_error().is_none());

    sessions.open_document("a.fsl", "").unwrap();
    let err = sessions.open_document("a.fsl", "").unwrap_err();
    assert_eq!(err.to_string(), "Document already open: a.fsl");
}
