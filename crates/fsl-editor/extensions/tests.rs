//! Tests for the extension manager and context

use super::*;
use crate::sessions::TokenCache;
use pretty_assertions::assert_eq;

/// Extension recording every event and command it receives
struct RecorderExtension {
    info: ExtensionInfo,
    state: ExtensionState,
    events: Arc<Mutex<Vec<String>>>,
    fail_events: bool,
    fail_initialize: bool,
}

impl RecorderExtension {
    fn new(name: &str, events: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            info: ExtensionInfo::new(name, "0.1.0", "tests", "recorder")
                .with_capability(ExtensionCapability::CustomCommands),
            state: ExtensionState::Uninitialized,
            events,
            fail_events: false,
            fail_initialize: false,
        }
    }
}

impl EditorExtension for RecorderExtension {
    fn info(&self) -> &ExtensionInfo {
        &self.info
    }

    fn initialize(&mut self, context: &mut dyn ExtensionContext) -> Result<()> {
        if self.fail_initialize {
            return Err(EditorError::extension(&self.info.name, "refused"));
        }
        context.set_config(format!("{}.ready", self.info.name), "true".to_string())?;
        self.state = ExtensionState::Active;
        Ok(())
    }

    fn shutdown(&mut self, _context: &mut dyn ExtensionContext) -> Result<()> {
        self.events.lock().push(format!("{}:shutdown", self.info.name));
        self.state = ExtensionState::Shutdown;
        Ok(())
    }

    fn state(&self) -> ExtensionState {
        self.state
    }

    fn execute_command(
        &mut self,
        command_id: &str,
        args: &HashMap<String, String>,
        _context: &mut dyn ExtensionContext,
    ) -> Result<ExtensionResult> {
        let echo = args.get("echo").cloned().unwrap_or_default();
        Ok(ExtensionResult::success_with_message(command_id).with_data("echo", echo))
    }

    fn commands(&self) -> Vec<ExtensionCommand> {
        vec![
            ExtensionCommand::new(format!("{}.echo", self.info.name), "Echo", "Echo args")
                .requires_document(false),
            ExtensionCommand::new(format!("{}.doc", self.info.name), "Doc", "Needs a document"),
        ]
    }

    fn handle_event(
        &mut self,
        event: &DocumentEvent,
        _context: &mut dyn ExtensionContext,
    ) -> Result<()> {
        if self.fail_events {
            return Err(EditorError::extension(&self.info.name, "event failed"));
        }
        self.events
            .lock()
            .push(format!("{}:{}", self.info.name, event.description()));
        Ok(())
    }
}

struct Fixture {
    language: LanguageConfig,
    settings: HashMap<String, String>,
    cache: TokenCache,
    messages: RecordingMessageHandler,
}

impl Fixture {
    fn new() -> Self {
        Self {
            language: LanguageConfig::new(),
            settings: HashMap::new(),
            cache: TokenCache::new(),
            messages: RecordingMessageHandler::new(),
        }
    }

    fn context<'a>(&'a mut self, document: Option<&'a EditorDocument>) -> EditorContext<'a> {
        EditorContext::new(
            document,
            &self.language,
            &mut self.settings,
            &self.cache,
            &mut self.messages,
        )
    }
}

fn closed(id: &str) -> DocumentEvent {
    DocumentEvent::Closed {
        document_id: id.to_string(),
    }
}

#[test]
fn test_extension_info_builder() {
    let info = ExtensionInfo::new("recorder", "1.0.0", "me", "does things")
        .with_capability(ExtensionCapability::EventHandling)
        .with_dependency("base")
        .with_license("MIT");

    assert!(info.has_capability(&ExtensionCapability::EventHandling));
    assert!(!info.has_capability(&ExtensionCapability::CodeCompletion));
    assert_eq!(info.dependencies, vec!["base".to_string()]);
    assert_eq!(info.license.as_deref(), Some("MIT"));
    assert_eq!(
        ExtensionCapability::CodeCompletion.description(),
        "Identifier completion"
    );
}

#[test]
fn test_extension_result_builders() {
    let ok = ExtensionResult::success().with_data("k", "v");
    assert!(ok.success);
    assert_eq!(ok.data.get("k").map(String::as_str), Some("v"));

    let failed = ExtensionResult::failure("nope");
    assert!(!failed.success);
    assert_eq!(failed.message.as_deref(), Some("nope"));
}

#[test]
fn test_load_rejects_duplicates_and_missing_dependencies() {
    let events = Arc::default();
    let mut manager = ExtensionManager::new();

    manager
        .load_extension(Box::new(RecorderExtension::new("a", Arc::clone(&events))))
        .unwrap();
    assert!(manager
        .load_extension(Box::new(RecorderExtension::new("a", Arc::clone(&events))))
        .is_err());

    let mut dependent = RecorderExtension::new("b", Arc::clone(&events));
    dependent.info = dependent.info.with_dependency("missing");
    let err = manager.load_extension(Box::new(dependent)).unwrap_err();
    assert!(err.to_string().contains("missing"));

    assert_eq!(manager.list_extensions(), vec!["a".to_string()]);
    assert_eq!(
        manager.get_extension_state("a"),
        Some(ExtensionState::Uninitialized)
    );
}

#[test]
fn test_initialize_registers_commands() {
    let mut fixture = Fixture::new();
    let mut manager = ExtensionManager::new();
    manager
        .load_extension(Box::new(RecorderExtension::new("a", Arc::default())))
        .unwrap();

    assert!(manager.list_commands().is_empty());
    manager.initialize_all(&mut fixture.context(None)).unwrap();

    assert_eq!(manager.get_extension_state("a"), Some(ExtensionState::Active));
    assert_eq!(
        manager.list_commands(),
        vec!["a.doc".to_string(), "a.echo".to_string()]
    );
    assert_eq!(manager.command("a.echo").map(|c| c.name.as_str()), Some("Echo"));
    assert_eq!(
        fixture.settings.get("a.ready").map(String::as_str),
        Some("true")
    );
}

#[test]
fn test_failed_initialize_marks_error() {
    let mut fixture = Fixture::new();
    let mut manager = ExtensionManager::new();
    let mut recorder = RecorderExtension::new("a", Arc::default());
    recorder.fail_initialize = true;
    manager.load_extension(Box::new(recorder)).unwrap();

    assert!(manager.initialize_all(&mut fixture.context(None)).is_err());
    assert!(manager.get_extension_state("a").unwrap().is_error());
    assert!(manager.list_commands().is_empty());
}

#[test]
fn test_execute_command() {
    let mut fixture = Fixture::new();
    let mut manager = ExtensionManager::new();
    manager
        .load_extension(Box::new(RecorderExtension::new("a", Arc::default())))
        .unwrap();
    manager.initialize_all(&mut fixture.context(None)).unwrap();

    let mut args = HashMap::new();
    args.insert("echo".to_string(), "hi".to_string());
    let result = manager
        .execute_command("a.echo", &args, &mut fixture.context(None))
        .unwrap();
    assert_eq!(result.data.get("echo").map(String::as_str), Some("hi"));

    assert!(manager
        .execute_command("a.doc", &args, &mut fixture.context(None))
        .is_err());
    let doc = EditorDocument::new("x.fsl", "");
    assert!(manager
        .execute_command("a.doc", &args, &mut fixture.context(Some(&doc)))
        .is_ok());

    let err = manager
        .execute_command("nope", &args, &mut fixture.context(None))
        .unwrap_err();
    assert!(matches!(err, EditorError::CommandFailed { .. }));
}

#[test]
fn test_dispatch_event_in_load_order() {
    let mut fixture = Fixture::new();
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut manager = ExtensionManager::new();
    manager
        .load_extension(Box::new(RecorderExtension::new("b", Arc::clone(&events))))
        .unwrap();
    manager
        .load_extension(Box::new(RecorderExtension::new("a", Arc::clone(&events))))
        .unwrap();
    manager.initialize_all(&mut fixture.context(None)).unwrap();

    let handled = manager.dispatch_event(&closed("x.fsl"), &mut fixture.context(None));

    assert_eq!(handled, 2);
    assert_eq!(
        *events.lock(),
        vec![
            "b:Closed document 'x.fsl'".to_string(),
            "a:Closed document 'x.fsl'".to_string(),
        ]
    );
}

#[test]
fn test_failing_handler_does_not_block_others() {
    let mut fixture = Fixture::new();
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut manager = ExtensionManager::new();
    let mut broken = RecorderExtension::new("broken", Arc::clone(&events));
    broken.fail_events = true;
    manager.load_extension(Box::new(broken)).unwrap();
    manager
        .load_extension(Box::new(RecorderExtension::new("ok", Arc::clone(&events))))
        .unwrap();
    manager.initialize_all(&mut fixture.context(None)).unwrap();

    let handled = manager.dispatch_event(&closed("x.fsl"), &mut fixture.context(None));

    assert_eq!(handled, 1);
    assert_eq!(events.lock().len(), 1);
    assert_eq!(
        manager.get_extension_state("broken"),
        Some(ExtensionState::Error)
    );

    // Extensions in the error state no longer receive events
    assert_eq!(
        manager.dispatch_event(&closed("x.fsl"), &mut fixture.context(None)),
        1
    );
}

#[test]
fn test_uninitialized_extensions_receive_no_events() {
    let mut fixture = Fixture::new();
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut manager = ExtensionManager::new();
    manager
        .load_extension(Box::new(RecorderExtension::new("a", Arc::clone(&events))))
        .unwrap();

    assert_eq!(
        manager.dispatch_event(&closed("x.fsl"), &mut fixture.context(None)),
        0
    );
    assert!(events.lock().is_empty());
}

#[test]
fn test_shutdown_and_unload() {
    let mut fixture = Fixture::new();
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut manager = ExtensionManager::new();
    manager
        .load_extension(Box::new(RecorderExtension::new("a", Arc::clone(&events))))
        .unwrap();
    manager
        .load_extension(Box::new(RecorderExtension::new("b", Arc::clone(&events))))
        .unwrap();
    manager.initialize_all(&mut fixture.context(None)).unwrap();

    manager
        .unload_extension("a", &mut fixture.context(None))
        .unwrap();
    assert_eq!(manager.list_extensions(), vec!["b".to_string()]);
    assert_eq!(
        manager.list_commands(),
        vec!["b.doc".to_string(), "b.echo".to_string()]
    );

    manager.shutdown_all(&mut fixture.context(None)).unwrap();
    assert_eq!(
        manager.get_extension_state("b"),
        Some(ExtensionState::Shutdown)
    );
    assert!(manager.list_commands().is_empty());
    assert_eq!(
        *events.lock(),
        vec!["a:shutdown".to_string(), "b:shutdown".to_string()]
    );
}

#[test]
fn test_context_routes_messages_and_settings() {
    let mut fixture = Fixture::new();
    let doc = EditorDocument::new("x.fsl", "if");
    {
        let mut context = fixture.context(Some(&doc));
        assert_eq!(context.current_document().map(EditorDocument::id), Some("x.fsl"));
        assert!(context.get_config("k").is_none());
        context.set_config("k".to_string(), "v".to_string()).unwrap();
        assert_eq!(context.get_config("k").as_deref(), Some("v"));
        context.show_message("careful", MessageLevel::Warning).unwrap();
        assert!(context.token_cache().is_empty());
    }

    assert_eq!(
        fixture.messages.drain(),
        vec![(MessageLevel::Warning, "careful".to_string())]
    );
    assert!(fixture.messages.messages().is_empty());
}

#[test]
fn test_tracing_message_handler_accepts_every_level() {
    let mut handler = TracingMessageHandler;
    for level in [
        MessageLevel::Info,
        MessageLevel::Warning,
        MessageLevel::Error,
        MessageLevel::Success,
    ] {
        handler.show("message", level).unwrap();
    }
}
