//! # Theme Commands
//!
//! The system scheme comes from `--prefers-dark`; the resolved scheme is
//! what the UI would paint.

use serde::Serialize;
use storefront_core::{ColorScheme, ThemePreference};
use storefront_state::{StoreOrchestrator, ThemeStore};
use tracing::debug;

use super::persist_warning;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeResponse {
    pub preference: ThemePreference,
    pub system: ColorScheme,
    pub resolved: ColorScheme,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_warning: Option<String>,
}

impl From<&ThemeStore> for ThemeResponse {
    fn from(theme: &ThemeStore) -> Self {
        ThemeResponse {
            preference: theme.preference(),
            system: theme.system_theme(),
            resolved: theme.resolved_theme(),
            persist_warning: persist_warning(theme.last_persist_error()),
        }
    }
}

pub fn get_theme(orchestrator: &StoreOrchestrator) -> ThemeResponse {
    debug!("get_theme command");
    ThemeResponse::from(orchestrator.theme())
}

pub fn set_theme(orchestrator: &StoreOrchestrator, preference: ThemePreference) -> ThemeResponse {
    debug!(preference = %preference, "set_theme command");
    let theme = orchestrator.theme();
    theme.set_theme(preference);
    ThemeResponse::from(theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;

    #[tokio::test]
    async fn test_default_follows_system() {
        let orchestrator = test_support::orchestrator();
        let _guard = orchestrator.mount();

        let response = get_theme(&orchestrator);
        assert_eq!(response.preference, ThemePreference::System);
        assert_eq!(response.resolved, response.system);
    }

    #[tokio::test]
    async fn test_explicit_preference_wins() {
        let orchestrator = test_support::orchestrator();
        let _guard = orchestrator.mount();

        let response = set_theme(&orchestrator, ThemePreference::Dark);
        assert_eq!(response.preference, ThemePreference::Dark);
        assert_eq!(response.resolved, ColorScheme::Dark);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["preference"], "dark");
        assert!(json.get("persistWarning").is_none());
    }
}
