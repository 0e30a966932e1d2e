//! Extended tests for the auto-completion extension

#[cfg(test)]
mod tests {
    use crate::core::EditorDocument;
    use crate::events::DocumentEvent;
    use crate::extensions::builtin::auto_complete::{
        collect_completions, AutoCompleteConfig, AutoCompleteExtension, CompletionItem,
        CompletionKind, MAX_SUGGESTIONS_KEY,
    };
    use crate::extensions::{EditorContext, EditorExtension, ExtensionState, RecordingMessageHandler};
    use crate::sessions::{CachedTokens, TokenCache};
    use fsl_core::{LanguageConfig, Span, TokenCategory};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn cache_with(document_id: &str, entries: &[(TokenCategory, &str)]) -> TokenCache {
        let text: String = entries
            .iter()
            .map(|(_, literal)| *literal)
            .collect::<Vec<_>>()
            .join("\n");
        let spans: Vec<Span> = entries
            .iter()
            .enumerate()
            .map(|(line, (category, literal))| Span::new(line, 0, literal.len(), *category))
            .collect();

        let cache = TokenCache::new();
        cache.insert(document_id, CachedTokens::from_spans(&text, &spans));
        cache
    }

    fn labels(items: &[CompletionItem]) -> Vec<&str> {
        items.iter().map(|item| item.label.as_str()).collect()
    }

    #[test]
    fn test_completion_kinds() {
        assert_eq!(
            CompletionKind::for_category(TokenCategory::Function),
            Some(CompletionKind::Function)
        );
        assert_eq!(
            CompletionKind::for_category(TokenCategory::Keyword),
            Some(CompletionKind::Keyword)
        );
        assert_eq!(
            CompletionKind::for_category(TokenCategory::Type),
            Some(CompletionKind::TypeParameter)
        );
        assert_eq!(
            CompletionKind::for_category(TokenCategory::Variable),
            Some(CompletionKind::Variable)
        );
        assert_eq!(CompletionKind::for_category(TokenCategory::Semantic), None);
        assert_eq!(CompletionKind::for_category(TokenCategory::Macro), None);
    }

    #[test]
    fn test_categories_follow_suggestion_order() {
        let cache = cache_with(
            "a.fsl",
            &[
                (TokenCategory::Semantic, "POSITION"),
                (TokenCategory::Function, "sin"),
                (TokenCategory::Type, "vec4"),
                (TokenCategory::Keyword, "return"),
                (TokenCategory::Type, "float"),
                (TokenCategory::Keyword, "if"),
            ],
        );

        let items = collect_completions(&cache, "a.fsl", None, 50);
        assert_eq!(
            labels(&items),
            vec!["if", "return", "float", "vec4", "sin", "POSITION"]
        );
        assert_eq!(items[2].kind, Some(CompletionKind::TypeParameter));
        assert_eq!(items[5].kind, None);
        assert_eq!(items[5].category, TokenCategory::Semantic);
    }

    #[test]
    fn test_non_completion_categories_are_skipped() {
        let cache = cache_with(
            "a.fsl",
            &[
                (TokenCategory::Comment, "// note"),
                (TokenCategory::Operator, "+="),
                (TokenCategory::Bracket0, "("),
                (TokenCategory::Keyword, "if"),
            ],
        );

        let items = collect_completions(&cache, "a.fsl", None, 50);
        assert_eq!(labels(&items), vec!["if"]);
    }

    #[test]
    fn test_missing_keywords_still_complete_other_categories() {
        let cache = cache_with("a.fsl", &[(TokenCategory::Function, "mix")]);

        let items = collect_completions(&cache, "a.fsl", None, 50);
        assert_eq!(items, vec![CompletionItem::new("mix", TokenCategory::Function)]);
    }

    #[test]
    fn test_absent_document_yields_nothing() {
        let cache = cache_with("a.fsl", &[(TokenCategory::Keyword, "if")]);
        assert!(collect_completions(&cache, "b.fsl", None, 50).is_empty());
    }

    #[test]
    fn test_limit_and_prefix() {
        let cache = cache_with(
            "a.fsl",
            &[
                (TokenCategory::Function, "sin"),
                (TokenCategory::Function, "sqrt"),
                (TokenCategory::Function, "step"),
                (TokenCategory::Keyword, "struct"),
            ],
        );

        let items = collect_completions(&cache, "a.fsl", None, 2);
        assert_eq!(labels(&items), vec!["struct", "sin"]);

        let items = collect_completions(&cache, "a.fsl", Some("st"), 50);
        assert_eq!(labels(&items), vec!["struct", "step"]);
    }

    #[test]
    fn test_config_from_settings() {
        let config = AutoCompleteConfig::from_lookup(|key| {
            (key == MAX_SUGGESTIONS_KEY).then(|| "3".to_string())
        });
        assert_eq!(config.max_suggestions, 3);

        let config = AutoCompleteConfig::from_lookup(|_| Some("many".to_string()));
        assert_eq!(config, AutoCompleteConfig::default());
    }

    #[test]
    fn test_suggest_command() {
        let language = LanguageConfig::new();
        let mut settings = HashMap::new();
        settings.insert(MAX_SUGGESTIONS_KEY.to_string(), "10".to_string());
        let cache = cache_with(
            "a.fsl",
            &[
                (TokenCategory::Keyword, "return"),
                (TokenCategory::Type, "float"),
            ],
        );
        let mut messages = RecordingMessageHandler::new();
        let doc = EditorDocument::new("a.fsl", "return float");

        let mut ext = AutoCompleteExtension::new();
        let mut context =
            EditorContext::new(Some(&doc), &language, &mut settings, &cache, &mut messages);
        ext.initialize(&mut context).unwrap();
        assert_eq!(ext.state(), ExtensionState::Active);
        assert_eq!(ext.config().max_suggestions, 10);

        let result = ext
            .execute_command("complete.suggest", &HashMap::new(), &mut context)
            .unwrap();
        assert!(result.success);
        assert_eq!(result.data.len(), 2);
        assert_eq!(result.data.get("completion_0").map(String::as_str), Some("return"));
        assert_eq!(result.data.get("completion_1").map(String::as_str), Some("float"));

        let mut args = HashMap::new();
        args.insert("prefix".to_string(), "fl".to_string());
        let result = ext
            .execute_command("complete.suggest", &args, &mut context)
            .unwrap();
        assert_eq!(result.data.len(), 1);
    }

    #[test]
    fn test_config_change_updates_limit() {
        let language = LanguageConfig::new();
        let mut settings = HashMap::new();
        let cache = TokenCache::new();
        let mut messages = RecordingMessageHandler::new();

        let mut ext = AutoCompleteExtension::new();
        let mut context = EditorContext::new(None, &language, &mut settings, &cache, &mut messages);
        ext.initialize(&mut context).unwrap();

        context
            .settings
            .insert(MAX_SUGGESTIONS_KEY.to_string(), "5".to_string());
        let event = DocumentEvent::ConfigChanged {
            key: MAX_SUGGESTIONS_KEY.to_string(),
            old_value: None,
            new_value: "5".to_string(),
        };
        ext.handle_event(&event, &mut context).unwrap();

        assert_eq!(ext.config().max_suggestions, 5);
        assert_eq!(ext.get_completions(&cache, "a.fsl"), Vec::new());
    }
}
