use chrono::{DateTime, NaiveDate, Utc};
use egui::Color32;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::block::{ChecklistItem, Resource, ScheduleBlock};
use super::clock::{ClockTime, TimeInterval};
use super::dates::DateInterval;
use super::task::{Feature, Task};
use crate::engine::collab::{BarCommitter, BlockCommitter, CommitOutcome, SiblingIntervals};

/// Everything the dashboard shows: people, their booked blocks, and the
/// feature/task plan drawn on the Gantt timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    pub resources: Vec<Resource>,
    pub items: Vec<ChecklistItem>,
    pub blocks: Vec<ScheduleBlock>,
    pub features: Vec<Feature>,
    pub tasks: Vec<Task>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            name: "Untitled Board".to_string(),
            resources: Vec::new(),
            items: Vec::new(),
            blocks: Vec::new(),
            features: Vec::new(),
            tasks: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn resource(&self, id: Uuid) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn item(&self, id: Uuid) -> Option<&ChecklistItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn block(&self, id: Uuid) -> Option<&ScheduleBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn add_resource(&mut self, name: impl Into<String>, color: Color32) -> Uuid {
        let resource = Resource::new(name, color);
        let id = resource.id;
        self.resources.push(resource);
        self.touch();
        id
    }

    pub fn add_item(&mut self, title: impl Into<String>) -> Uuid {
        let item = ChecklistItem::new(title);
        let id = item.id;
        self.items.push(item);
        self.touch();
        id
    }

    /// Blocks in one resource's column for `day`, earliest first.
    pub fn column(&self, resource_id: Uuid, day: NaiveDate) -> Vec<&ScheduleBlock> {
        let mut blocks: Vec<_> = self
            .blocks
            .iter()
            .filter(|b| b.resource_id == resource_id && b.day == day)
            .collect();
        blocks.sort_by_key(|b| b.interval.start());
        blocks
    }

    /// Book `item_id` (or a new item titled `title`) on a resource's day.
    pub fn create_block(
        &mut self,
        resource_id: Uuid,
        day: NaiveDate,
        interval: TimeInterval,
        item_id: Option<Uuid>,
        title: &str,
    ) -> Uuid {
        let item_id = match item_id {
            Some(id) => id,
            None => {
                let title = if title.trim().is_empty() { "New item" } else { title.trim() };
                self.add_item(title)
            }
        };
        let block = ScheduleBlock::new(resource_id, item_id, day, interval);
        let id = block.id;
        debug!(block_id = %id, %resource_id, %day, %interval, "block created");
        self.blocks.push(block);
        self.touch();
        id
    }

    pub fn delete_block(&mut self, id: Uuid) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        let removed = self.blocks.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn tasks_of(&self, feature_id: Uuid) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.feature_id == feature_id)
    }

    /// Summary span of a feature's tasks.
    pub fn feature_span(&self, feature_id: Uuid) -> Option<DateInterval> {
        self.features
            .iter()
            .find(|f| f.id == feature_id)
            .and_then(|f| f.summary_span(&self.tasks))
    }

    /// Days covered by any task.
    pub fn plan_span(&self) -> Option<DateInterval> {
        DateInterval::union_all(self.tasks.iter().map(|t| t.dates))
    }
}

impl SiblingIntervals for Board {
    fn sibling_intervals(
        &self,
        resource_id: Uuid,
        day: NaiveDate,
        exclude_block: Option<Uuid>,
    ) -> Vec<TimeInterval> {
        self.blocks
            .iter()
            .filter(|b| b.resource_id == resource_id && b.day == day)
            .filter(|b| Some(b.id) != exclude_block)
            .map(|b| b.interval)
            .collect()
    }
}

impl BlockCommitter for Board {
    fn commit_block(&mut self, block_id: Uuid, start: ClockTime, end: ClockTime) -> CommitOutcome {
        let interval = match TimeInterval::new(start, end) {
            Ok(iv) => iv,
            Err(e) => return CommitOutcome::Failed(e.to_string()),
        };
        match self.blocks.iter_mut().find(|b| b.id == block_id) {
            Some(block) => {
                block.interval = interval;
                self.touch();
                CommitOutcome::Committed
            }
            None => {
                warn!(%block_id, "commit for unknown block");
                CommitOutcome::Failed(format!("no block {block_id}"))
            }
        }
    }
}

impl BarCommitter for Board {
    fn commit_bar(&mut self, task_id: Uuid, start: NaiveDate, end: NaiveDate) -> CommitOutcome {
        let dates = match DateInterval::new(start, end) {
            Ok(d) => d,
            Err(e) => return CommitOutcome::Failed(e.to_string()),
        };
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.dates = dates;
                self.touch();
                CommitOutcome::Committed
            }
            None => {
                warn!(%task_id, "commit for unknown task");
                CommitOutcome::Failed(format!("no task {task_id}"))
            }
        }
    }
}
