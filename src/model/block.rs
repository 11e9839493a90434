use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clock::TimeInterval;

/// A person whose day is laid out as one column of the slot grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "color_serde")]
    pub color: Color32,
}

impl Resource {
    pub fn new(name: impl Into<String>, color: Color32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color,
        }
    }
}

/// A to-do item a block can be booked for. Owned by the board's task data;
/// blocks only hold its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub title: String,
    pub done: bool,
}

impl ChecklistItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            done: false,
        }
    }
}

/// One checklist item booked on one resource's column for one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub item_id: Uuid,
    pub day: NaiveDate,
    pub interval: TimeInterval,
}

impl ScheduleBlock {
    pub fn new(resource_id: Uuid, item_id: Uuid, day: NaiveDate, interval: TimeInterval) -> Self {
        Self {
            id: Uuid::new_v4(),
            resource_id,
            item_id,
            day,
            interval,
        }
    }
}

/// Serde helper for `Color32`.
pub(crate) mod color_serde {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rgba = [color.r(), color.g(), color.b(), color.a()];
        rgba.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rgba: [u8; 4] = Deserialize::deserialize(deserializer)?;
        Ok(Color32::from_rgba_premultiplied(
            rgba[0], rgba[1], rgba[2], rgba[3],
        ))
    }
}
