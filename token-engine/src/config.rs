/// How long capture bindings live during a rewrite pass.
///
/// Captures never outlive a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureScope {
    /// Every match attempt starts with an empty capture table.
    #[default]
    PerMatch,
    /// One capture table is shared by every match in a pass, so a reference
    /// can see a capture made by an earlier match. Keys stay write-once, so
    /// the first capture of a key holds for the rest of the pass.
    PerPass,
}

/// Engine settings.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    capture_scope: CaptureScope,
    name: Option<String>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capture_scope(mut self, scope: CaptureScope) -> Self {
        self.capture_scope = scope;
        self
    }

    /// Labels the engine's tracing span.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn capture_scope(&self) -> CaptureScope {
        self.capture_scope
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
