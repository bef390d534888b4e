//! User-Agent header sent with every request.
//!
//! The agent names the SDK, the IAM protocol version it speaks, the
//! credential mode and the calling app, so backend access logs can tell
//! callers apart:
//!
//! ```text
//! iam-backend-rust/0.1.0 (bk-iam/1; gateway) app/bk_demo
//! ```

use crate::config::ClientConfig;
use crate::transport::IAM_VERSION;

const SDK: &str = concat!("iam-backend-rust/", env!("CARGO_PKG_VERSION"));

/// Builds the User-Agent for a client configuration.
///
/// Characters of the app code that cannot appear in a header token are
/// dropped; an app code with none left omits the `app/` part.
pub(crate) fn user_agent(config: &ClientConfig) -> String {
    let mode = if config.gateway { "gateway" } else { "direct" };
    let mut agent = format!("{} (bk-iam/{}; {})", SDK, IAM_VERSION, mode);

    let app: String = config
        .credentials
        .app_code()
        .chars()
        .filter(|c| c.is_ascii_graphic())
        .collect();
    if !app.is_empty() {
        agent.push_str(" app/");
        agent.push_str(&app);
    }
    agent
}
