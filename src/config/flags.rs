//! Debug / force passthrough flags.

/// Environment variables that enable `debug=true` on every request.
pub const DEBUG_ENV_VARS: [&str; 2] = ["IAM_API_DEBUG", "BKAPP_IAM_API_DEBUG"];

/// Environment variables that enable `force=true` on every request.
pub const FORCE_ENV_VARS: [&str; 2] = ["IAM_API_FORCE", "BKAPP_IAM_API_FORCE"];

/// Query flags appended to every dispatched request.
///
/// The backend uses `debug` to return evaluation details and `force` to
/// bypass its caches. The client forwards them without interpreting them.
///
/// Flags are resolved once, when the configuration is built; request
/// building never reads the process environment.
///
/// ## Example
///
/// ```rust
/// use iam_backend::ApiFlags;
///
/// let flags = ApiFlags::from_lookup(|name| {
///     (name == "IAM_API_DEBUG").then(|| "true".to_string())
/// });
/// assert!(flags.debug);
/// assert!(!flags.force);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiFlags {
    /// Append `debug=true`.
    pub debug: bool,

    /// Append `force=true`.
    pub force: bool,
}

impl ApiFlags {
    /// Creates flags with explicit values.
    pub fn new(debug: bool, force: bool) -> Self {
        Self { debug, force }
    }

    /// Reads the flags from the process environment.
    ///
    /// A flag is on when any of its variables equals `"true"`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the flags through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = |names: &[&str]| {
            names
                .iter()
                .any(|name| lookup(name).is_some_and(|v| v == "true"))
        };
        Self {
            debug: enabled(&DEBUG_ENV_VARS),
            force: enabled(&FORCE_ENV_VARS),
        }
    }

    /// Query parameters to append, in a stable order.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, &'static str)> {
        let mut pairs = Vec::with_capacity(2);
        if self.debug {
            pairs.push(("debug", "true"));
        }
        if self.force {
            pairs.push(("force", "true"));
        }
        pairs
    }
}
