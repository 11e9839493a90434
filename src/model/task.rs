use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::block::color_serde;
use super::dates::DateInterval;

/// A feature groups tasks; its Gantt row is a read-only summary bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "color_serde")]
    pub color: Color32,
}

impl Feature {
    pub fn new(name: impl Into<String>, color: Color32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color,
        }
    }

    /// Span covering every task of this feature, or `None` if it has none.
    pub fn summary_span<'a>(&self, tasks: impl IntoIterator<Item = &'a Task>) -> Option<DateInterval> {
        DateInterval::union_all(
            tasks
                .into_iter()
                .filter(|t| t.feature_id == self.id)
                .map(|t| t.dates),
        )
    }
}

/// A single task bar on the Gantt timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub feature_id: Uuid,
    pub name: String,
    pub dates: DateInterval,
    /// Optional assignee; bars may overlap freely even for one person.
    pub assignee: Option<Uuid>,
}

impl Task {
    pub fn new(feature_id: Uuid, name: impl Into<String>, dates: DateInterval) -> Self {
        Self {
            id: Uuid::new_v4(),
            feature_id,
            name: name.into(),
            dates,
            assignee: None,
        }
    }
}
