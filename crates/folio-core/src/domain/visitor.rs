//! Anonymous reader identity used to deduplicate views and likes.

use uuid::Uuid;

const UNKNOWN: &str = "unknown";

/// Client address and browser of a reader, as reported through proxies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visitor {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl Visitor {
    #[must_use]
    pub fn new(ip: Option<String>, user_agent: Option<String>) -> Self {
        Self { ip, user_agent }
    }

    fn ip_or_unknown(&self) -> &str {
        self.ip.as_deref().unwrap_or(UNKNOWN)
    }

    /// Name-based (v5) id of this reader viewing as editor or not.
    ///
    /// Equal inputs give equal ids in every process, so the value can be
    /// compared against one stored in a shared cache.
    #[must_use]
    pub fn view_fingerprint(&self, is_editor: bool) -> Uuid {
        let name = format!(
            "{}:{}:{}",
            self.ip_or_unknown(),
            self.user_agent.as_deref().unwrap_or_default(),
            is_editor
        );
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
    }

    /// Name-based (v5) id of the client address alone.
    #[must_use]
    pub fn address_fingerprint(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, self.ip_or_unknown().as_bytes())
    }
}
