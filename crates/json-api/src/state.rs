//! State

use std::sync::Arc;

use keyhold_app::context::AppContext;

#[derive(Debug, Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Browser client origin that OAuth logins are redirected back to.
    pub(crate) client_url: String,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, client_url: impl Into<String>) -> Self {
        Self {
            app,
            client_url: client_url.into(),
        }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext, client_url: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(app, client_url))
    }
}
