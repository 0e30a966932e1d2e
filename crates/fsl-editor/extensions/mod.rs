//! Extension system for editor functionality
//!
//! Provides the `EditorExtension` trait for plugging features into a session,
//! the `ExtensionContext` through which extensions reach the current document,
//! the language configuration, string settings and the shared token cache, and
//! the `ExtensionManager` that owns extensions and routes commands and events
//! to them.

pub mod builtin;

use crate::core::{EditorDocument, EditorError, Result};
use crate::events::DocumentEvent;
use crate::sessions::TokenCache;
use core::fmt;
use fsl_core::LanguageConfig;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Extension capabilities that can be provided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionCapability {
    /// Classifies documents into semantic tokens
    SyntaxHighlighting,
    /// Suggests identifiers
    CodeCompletion,
    /// Exposes commands
    CustomCommands,
    /// Reacts to document events
    EventHandling,
}

impl ExtensionCapability {
    /// Short description for listings
    pub const fn description(&self) -> &'static str {
        match self {
            Self::SyntaxHighlighting => "Semantic token classification",
            Self::CodeCompletion => "Identifier completion",
            Self::CustomCommands => "Host-invokable commands",
            Self::EventHandling => "Document lifecycle events",
        }
    }
}

/// Identity and declared capabilities of an extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionInfo {
    /// Extension name
    pub name: String,
    /// Extension version
    pub version: String,
    /// Extension author
    pub author: String,
    /// Extension description
    pub description: String,
    /// What the extension offers
    pub capabilities: Vec<ExtensionCapability>,
    /// Extensions that must load before this one
    pub dependencies: Vec<String>,
    /// License identifier
    pub license: Option<String>,
}

impl ExtensionInfo {
    /// Create a new extension info
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            author: author.into(),
            description: description.into(),
            capabilities: Vec::new(),
            dependencies: Vec::new(),
            license: None,
        }
    }

    /// Declare a capability
    #[must_use]
    pub fn with_capability(mut self, capability: ExtensionCapability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Require another extension to be loaded first
    #[must_use]
    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    /// Set the license
    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// Whether `capability` was declared
    pub fn has_capability(&self, capability: &ExtensionCapability) -> bool {
        self.capabilities.contains(capability)
    }
}

/// Lifecycle of a loaded extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionState {
    /// Extension is loaded but not initialized
    Uninitialized,
    /// Inside `initialize`
    Initializing,
    /// Receives events and commands
    Active,
    /// Initialization or event handling failed
    Error,
    /// Shut down; no longer dispatched to
    Shutdown,
}

impl ExtensionState {
    /// Whether the extension receives events and commands
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether initialization or an event handler failed
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Extension command that can be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionCommand {
    /// Command identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Command description
    pub description: String,
    /// Grouping shown by hosts
    pub category: String,
    /// Whether the command requires a document
    pub requires_document: bool,
}

impl ExtensionCommand {
    /// Create a new extension command
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: "General".to_string(),
            requires_document: true,
        }
    }

    /// Override the default `General` category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Allow or forbid running without a document
    #[must_use]
    pub const fn requires_document(mut self, requires: bool) -> Self {
        self.requires_document = requires;
        self
    }
}

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message
    Info,
    /// Warning message
    Warning,
    /// Error message
    Error,
    /// Success message
    Success,
}

/// Outcome of running an extension command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionResult {
    /// Success flag
    pub success: bool,
    /// Message for the user, if any
    pub message: Option<String>,
    /// Optional result data
    pub data: HashMap<String, String>,
}

impl ExtensionResult {
    /// A successful command with no message
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
            data: HashMap::new(),
        }
    }

    /// A successful command with a message
    pub fn success_with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: HashMap::new(),
        }
    }

    /// A failed command with its reason
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: HashMap::new(),
        }
    }

    /// Attach a key/value pair to the result
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Extension context providing access to editor functionality
pub trait ExtensionContext {
    /// Get the current document (if any)
    fn current_document(&self) -> Option<&EditorDocument>;

    /// Identifier sets of the language being edited
    fn language_config(&self) -> &LanguageConfig;

    /// Get configuration value
    fn get_config(&self, key: &str) -> Option<String>;

    /// Set configuration value
    fn set_config(&mut self, key: String, value: String) -> Result<()>;

    /// Shared per-document token cache
    fn token_cache(&self) -> &TokenCache;

    /// Show a message to the user
    fn show_message(&mut self, message: &str, level: MessageLevel) -> Result<()>;
}

/// Main extension trait that extensions must implement
pub trait EditorExtension: Send + Sync {
    /// Get extension metadata
    fn info(&self) -> &ExtensionInfo;

    /// Initialize the extension
    fn initialize(&mut self, context: &mut dyn ExtensionContext) -> Result<()>;

    /// Shutdown the extension
    fn shutdown(&mut self, context: &mut dyn ExtensionContext) -> Result<()>;

    /// Get the current state of the extension
    fn state(&self) -> ExtensionState;

    /// Execute a command provided by this extension
    fn execute_command(
        &mut self,
        command_id: &str,
        args: &HashMap<String, String>,
        context: &mut dyn ExtensionContext,
    ) -> Result<ExtensionResult>;

    /// Get commands provided by this extension
    fn commands(&self) -> Vec<ExtensionCommand> {
        Vec::new()
    }

    /// Handle a document event (optional)
    fn handle_event(
        &mut self,
        _event: &DocumentEvent,
        _context: &mut dyn ExtensionContext,
    ) -> Result<()> {
        Ok(())
    }

    /// Get configuration schema as key to type name (optional)
    fn config_schema(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}

/// Message handler trait for showing messages to users
pub trait MessageHandler: Send + Sync {
    /// Show a message to the user
    fn show(&mut self, message: &str, level: MessageLevel) -> Result<()>;
}

/// Message handler forwarding to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMessageHandler;

impl MessageHandler for TracingMessageHandler {
    fn show(&mut self, message: &str, level: MessageLevel) -> Result<()> {
        match level {
            MessageLevel::Error => error!(target: "fsl_editor::messages", "{message}"),
            MessageLevel::Warning => warn!(target: "fsl_editor::messages", "{message}"),
            MessageLevel::Info | MessageLevel::Success => {
                info!(target: "fsl_editor::messages", "{message}");
            }
        }
        Ok(())
    }
}

/// Message handler keeping every message for later display
///
/// Clones share the same message log.
#[derive(Debug, Default, Clone)]
pub struct RecordingMessageHandler {
    messages: Arc<Mutex<Vec<(MessageLevel, String)>>>,
}

impl RecordingMessageHandler {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages shown so far, oldest first
    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        self.messages.lock().clone()
    }

    /// Remove and return every recorded message
    pub fn drain(&self) -> Vec<(MessageLevel, String)> {
        core::mem::take(&mut *self.messages.lock())
    }
}

impl MessageHandler for RecordingMessageHandler {
    fn show(&mut self, message: &str, level: MessageLevel) -> Result<()> {
        self.messages.lock().push((level, message.to_string()));
        Ok(())
    }
}

/// Editor context handed to extensions for one call
pub struct EditorContext<'a> {
    /// Current document (if any)
    pub document: Option<&'a EditorDocument>,
    /// Language configuration of the session
    pub language: &'a LanguageConfig,
    /// String settings shared by all extensions
    pub settings: &'a mut HashMap<String, String>,
    /// Shared token cache
    pub cache: &'a TokenCache,
    /// Destination of user messages
    pub messages: &'a mut dyn MessageHandler,
}

impl<'a> EditorContext<'a> {
    /// Bundle the pieces of a session an extension may touch
    pub fn new(
        document: Option<&'a EditorDocument>,
        language: &'a LanguageConfig,
        settings: &'a mut HashMap<String, String>,
        cache: &'a TokenCache,
        messages: &'a mut dyn MessageHandler,
    ) -> Self {
        Self {
            document,
            language,
            settings,
            cache,
            messages,
        }
    }
}

impl fmt::Debug for EditorContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorContext")
            .field("document", &self.document.map(EditorDocument::id))
            .field("settings", &self.settings)
            .field("cache", &self.cache)
            .field("messages", &"<MessageHandler>")
            .finish_non_exhaustive()
    }
}

impl ExtensionContext for EditorContext<'_> {
    fn current_document(&self) -> Option<&EditorDocument> {
        self.document
    }

    fn language_config(&self) -> &LanguageConfig {
        self.language
    }

    fn get_config(&self, key: &str) -> Option<String> {
        self.settings.get(key).cloned()
    }

    fn set_config(&mut self, key: String, value: String) -> Result<()> {
        self.settings.insert(key, value);
        Ok(())
    }

    fn token_cache(&self) -> &TokenCache {
        self.cache
    }

    fn show_message(&mut self, message: &str, level: MessageLevel) -> Result<()> {
        self.messages.show(message, level)
    }
}

/// Extension manager for loading and managing extensions
///
/// Extensions are dispatched in load order.
#[derive(Default)]
pub struct ExtensionManager {
    /// Loaded extensions
    extensions: HashMap<String, Box<dyn EditorExtension>>,

    /// Extension names in load order
    load_order: Vec<String>,

    /// Extension states
    extension_states: HashMap<String, ExtensionState>,

    /// Available commands from all extensions, keyed by command id
    commands: HashMap<String, (String, ExtensionCommand)>,
}

impl fmt::Debug for ExtensionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionManager")
            .field("load_order", &self.load_order)
            .field("extension_states", &self.extension_states)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ExtensionManager {
    /// An empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an extension
    ///
    /// # Errors
    ///
    /// Fails if an extension with the same name is loaded or a dependency is
    /// missing.
    pub fn load_extension(&mut self, extension: Box<dyn EditorExtension>) -> Result<()> {
        let extension_name = extension.info().name.clone();

        if self.extensions.contains_key(&extension_name) {
            return Err(EditorError::extension(&extension_name, "already loaded"));
        }

        if let Some(missing) = extension
            .info()
            .dependencies
            .iter()
            .find(|dep| !self.extensions.contains_key(*dep))
        {
            return Err(EditorError::extension(
                &extension_name,
                format!("unmet dependency '{missing}'"),
            ));
        }

        debug!(extension = %extension_name, "extension loaded");
        self.extensions.insert(extension_name.clone(), extension);
        self.extension_states
            .insert(extension_name.clone(), ExtensionState::Uninitialized);
        self.load_order.push(extension_name);
        Ok(())
    }

    /// Initialize an extension and register its commands
    ///
    /// # Errors
    ///
    /// Fails if the extension is unknown or its initialization fails; in the
    /// latter case the extension is left in the error state.
    pub fn initialize_extension(
        &mut self,
        extension_name: &str,
        context: &mut dyn ExtensionContext,
    ) -> Result<()> {
        let extension = self
            .extensions
            .get_mut(extension_name)
            .ok_or_else(|| EditorError::extension(extension_name, "not found"))?;

        self.extension_states
            .insert(extension_name.to_string(), ExtensionState::Initializing);

        match extension.initialize(context) {
            Ok(()) => {
                self.extension_states
                    .insert(extension_name.to_string(), ExtensionState::Active);
                for command in extension.commands() {
                    self.commands
                        .insert(command.id.clone(), (extension_name.to_string(), command));
                }
                Ok(())
            }
            Err(err) => {
                self.extension_states
                    .insert(extension_name.to_string(), ExtensionState::Error);
                Err(err)
            }
        }
    }

    /// Initialize every loaded extension that is not active yet, in load order
    ///
    /// # Errors
    ///
    /// Stops at the first extension that fails to initialize.
    pub fn initialize_all(&mut self, context: &mut dyn ExtensionContext) -> Result<()> {
        let pending: Vec<String> = self
            .load_order
            .iter()
            .filter(|name| self.get_extension_state(name) == Some(ExtensionState::Uninitialized))
            .cloned()
            .collect();

        for name in pending {
            self.initialize_extension(&name, context)?;
        }
        Ok(())
    }

    /// Shut an extension down and remove it with its commands
    ///
    /// # Errors
    ///
    /// Fails if the extension is unknown or its shutdown fails.
    pub fn unload_extension(
        &mut self,
        extension_name: &str,
        context: &mut dyn ExtensionContext,
    ) -> Result<()> {
        let mut extension = self
            .extensions
            .remove(extension_name)
            .ok_or_else(|| EditorError::extension(extension_name, "not found"))?;

        self.extension_states.remove(extension_name);
        self.load_order.retain(|name| name != extension_name);
        self.commands.retain(|_, (owner, _)| owner != extension_name);

        extension.shutdown(context)
    }

    /// Shut every extension down, keeping them loaded
    ///
    /// # Errors
    ///
    /// Returns the first shutdown failure after attempting every extension.
    pub fn shutdown_all(&mut self, context: &mut dyn ExtensionContext) -> Result<()> {
        let mut first_error = None;

        for name in &self.load_order {
            let Some(extension) = self.extensions.get_mut(name) else {
                continue;
            };
            if let Err(err) = extension.shutdown(context) {
                warn!(extension = %name, error = %err, "extension shutdown failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
            self.extension_states
                .insert(name.clone(), ExtensionState::Shutdown);
        }
        self.commands.clear();

        first_error.map_or(Ok(()), Err)
    }

    /// Run a registered command by id
    ///
    /// # Errors
    ///
    /// Fails if no active extension provides `command_id`, or with the
    /// extension's own error.
    pub fn execute_command(
        &mut self,
        command_id: &str,
        args: &HashMap<String, String>,
        context: &mut dyn ExtensionContext,
    ) -> Result<ExtensionResult> {
        let (extension_name, command) = self
            .commands
            .get(command_id)
            .cloned()
            .ok_or_else(|| {
                EditorError::command_failed(format!("Command '{command_id}' not found"))
            })?;

        if command.requires_document && context.current_document().is_none() {
            return Err(EditorError::command_failed(format!(
                "Command '{command_id}' requires an open document"
            )));
        }

        let extension = self
            .extensions
            .get_mut(&extension_name)
            .ok_or_else(|| EditorError::extension(&extension_name, "not found"))?;

        debug!(command = command_id, extension = %extension_name, "executing command");
        extension.execute_command(command_id, args, context)
    }

    /// Deliver an event to every active extension in load order
    ///
    /// A failing extension is logged and moved to the error state; the others
    /// still receive the event. Returns the number of extensions that handled
    /// it successfully.
    pub fn dispatch_event(
        &mut self,
        event: &DocumentEvent,
        context: &mut dyn ExtensionContext,
    ) -> usize {
        let mut handled = 0;

        for name in &self.load_order {
            if self.extension_states.get(name) != Some(&ExtensionState::Active) {
                continue;
            }
            let Some(extension) = self.extensions.get_mut(name) else {
                continue;
            };

            match extension.handle_event(event, context) {
                Ok(()) => handled += 1,
                Err(err) => {
                    warn!(extension = %name, error = %err, "{}", event.description());
                    self.extension_states
                        .insert(name.clone(), ExtensionState::Error);
                }
            }
        }

        handled
    }

    /// Get list of loaded extensions in load order
    pub fn list_extensions(&self) -> Vec<String> {
        self.load_order.clone()
    }

    /// Get extension state
    pub fn get_extension_state(&self, extension_name: &str) -> Option<ExtensionState> {
        self.extension_states.get(extension_name).copied()
    }

    /// Get all available command ids, sorted
    pub fn list_commands(&self) -> Vec<String> {
        let mut commands: Vec<String> = self.commands.keys().cloned().collect();
        commands.sort();
        commands
    }

    /// Look up a registered command
    pub fn command(&self, command_id: &str) -> Option<&ExtensionCommand> {
        self.commands.get(command_id).map(|(_, command)| command)
    }
}

#[cfg(test)]
mod tests;
