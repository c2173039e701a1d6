/// Rendering options for one documentation request.
#[derive(Debug, Clone, Default)]
pub struct DocOptions {
    /// Trust type annotations (TypeScript sources).
    pub typed: bool,
    /// Add an `@example` call with placeholder arguments.
    pub include_example: bool,
    /// Add a TODO line asking for a human-written description.
    pub include_todo_placeholder: bool,
    /// Summary line template; supports `{name}`, `{params}` and `{count}`.
    pub summary_template: Option<String>,
    /// Per-parameter line template; supports `{type}`, `{name}` and `{description}`.
    pub param_template: Option<String>,
}

impl DocOptions {
    pub fn typed(typed: bool) -> Self {
        Self {
            typed,
            ..Default::default()
        }
    }
}
