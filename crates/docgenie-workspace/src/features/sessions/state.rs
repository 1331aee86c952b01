use docgenie_core::api::SessionSummary;

/// Client-side cache of the server's sessions.
///
/// The list is always a full snapshot: every refresh replaces it wholesale,
/// and whichever response resolves last is the one kept.
#[derive(Debug, Default, Clone)]
pub struct SessionsState {
    list: Vec<SessionSummary>,
    filter: String,
    active_id: Option<String>,
}

impl SessionsState {
    pub fn list(&self) -> &[SessionSummary] {
        &self.list
    }

    pub fn replace_list(&mut self, sessions: Vec<SessionSummary>) {
        self.list = sessions;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.list.iter().any(|s| s.id == id)
    }

    pub fn filter_query(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
    }

    /// Entries whose filename contains `query`, ignoring case.
    pub fn filter(&self, query: &str) -> Vec<&SessionSummary> {
        let needle = query.trim().to_lowercase();
        self.list
            .iter()
            .filter(|s| needle.is_empty() || s.filename.to_lowercase().contains(&needle))
            .collect()
    }

    /// Entries matching the current sidebar query.
    pub fn visible(&self) -> Vec<&SessionSummary> {
        self.filter(&self.filter)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Marks which entry is current. No network involved.
    pub fn set_active(&mut self, id: Option<String>) {
        self.active_id = id;
    }
}
