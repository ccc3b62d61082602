//! Configuration options for the stepwise engine.

/// Per-call compilation options.
///
/// # Example
///
/// ```
/// use stepwise_core::api::CompileOptions;
///
/// let options = CompileOptions {
///     save: true,
///     ..CompileOptions::default()
/// };
/// assert!(options.trace_payloads);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Hand a successful compilation to the engine's store.
    ///
    /// Default: false
    pub save: bool,

    /// Attach structured payloads to trace records.
    ///
    /// Default: true
    pub trace_payloads: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            save: false,
            trace_payloads: true,
        }
    }
}

/// Engine-wide options.
///
/// These set the defaults used by `Engine::compile`, which can be
/// overridden per call with `Engine::compile_with`.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub default_compile_options: CompileOptions,
}
