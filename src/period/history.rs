//! Project analysis history as seen by period resolution.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotStatus {
    #[default]
    Processed,
    Unprocessed,
}

/// One past analysis of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub uuid: String,
    pub root_component_uuid: String,
    /// Epoch millis
    pub created_at: i64,
    #[serde(default)]
    pub project_version: Option<String>,
    #[serde(default)]
    pub status: SnapshotStatus,
}

impl Snapshot {
    pub fn new(uuid: impl Into<String>, root_component_uuid: impl Into<String>, created_at: i64) -> Self {
        Self {
            uuid: uuid.into(),
            root_component_uuid: root_component_uuid.into(),
            created_at,
            project_version: None,
            status: SnapshotStatus::Processed,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.project_version = Some(version.into());
        self
    }

    pub fn with_status(mut self, status: SnapshotStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_processed(&self) -> bool {
        self.status == SnapshotStatus::Processed
    }
}

/// A "version" event attached to an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEvent {
    pub analysis_uuid: String,
    pub root_component_uuid: String,
    pub name: String,
    /// Epoch millis
    pub date: i64,
}

impl VersionEvent {
    pub fn new(
        analysis_uuid: impl Into<String>,
        root_component_uuid: impl Into<String>,
        name: impl Into<String>,
        date: i64,
    ) -> Self {
        Self {
            analysis_uuid: analysis_uuid.into(),
            root_component_uuid: root_component_uuid.into(),
            name: name.into(),
            date,
        }
    }
}

/// Snapshot and event store queries needed to resolve a period.
pub trait AnalysisHistory {
    fn snapshot_by_uuid(&self, uuid: &str) -> Option<Snapshot>;

    /// Processed analyses of the project, oldest first.
    fn processed_analyses(&self, root_component_uuid: &str) -> Vec<Snapshot>;

    /// Oldest processed analysis of the project.
    fn oldest_analysis(&self, root_component_uuid: &str) -> Option<Snapshot> {
        self.processed_analyses(root_component_uuid)
            .into_iter()
            .next()
    }

    /// Version events of the project, most recent first.
    fn versions_most_recent_first(&self, root_component_uuid: &str) -> Vec<VersionEvent>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryAnalysisHistory {
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
    #[serde(default)]
    pub events: Vec<VersionEvent>,
}

impl InMemoryAnalysisHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_snapshot(&mut self, snapshot: Snapshot) -> &mut Self {
        self.snapshots.push(snapshot);
        self
    }

    pub fn add_event(&mut self, event: VersionEvent) -> &mut Self {
        self.events.push(event);
        self
    }
}

impl AnalysisHistory for InMemoryAnalysisHistory {
    fn snapshot_by_uuid(&self, uuid: &str) -> Option<Snapshot> {
        self.snapshots.iter().find(|s| s.uuid == uuid).cloned()
    }

    fn processed_analyses(&self, root_component_uuid: &str) -> Vec<Snapshot> {
        let mut analyses: Vec<Snapshot> = self
            .snapshots
            .iter()
            .filter(|s| s.root_component_uuid == root_component_uuid && s.is_processed())
            .cloned()
            .collect();
        // stable: equal timestamps keep insertion order
        analyses.sort_by_key(|s| s.created_at);
        analyses
    }

    fn versions_most_recent_first(&self, root_component_uuid: &str) -> Vec<VersionEvent> {
        let mut events: Vec<VersionEvent> = self
            .events
            .iter()
            .filter(|e| e.root_component_uuid == root_component_uuid)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.date.cmp(&a.date));
        events
    }
}
