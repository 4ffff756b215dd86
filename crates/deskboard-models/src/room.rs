//! Meeting room records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::bucket::CapacityBucket;
use crate::error::{Result, ValidationError};
use crate::ids::RoomId;
use crate::order::OrderBy;
use crate::record::{require_text, Categorized, Payload, Record};

/// A bookable meeting room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique identifier.
    pub id: RoomId,
    /// Display name, never empty.
    pub name: String,
    /// Where the room is, e.g. "Floor 3, east wing".
    #[serde(default)]
    pub location: Option<String>,
    /// Number of people the room seats.
    pub capacity: u32,
    /// Free-text equipment labels. Order carries no meaning.
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Inactive rooms are retired and never shown.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Room {
    /// Creates an active room without location or equipment.
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: RoomId::generate(),
            name: name.into(),
            location: None,
            capacity,
            equipment: Vec::new(),
            is_active: true,
        }
    }

    /// Adds equipment labels.
    pub fn with_equipment<I, S>(mut self, equipment: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equipment.extend(equipment.into_iter().map(Into::into));
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Returns true if the room lists `label` (exact match).
    pub fn has_equipment(&self, label: &str) -> bool {
        self.equipment.iter().any(|item| item == label)
    }

    /// Equipment as a set.
    pub fn equipment_set(&self) -> BTreeSet<&str> {
        self.equipment.iter().map(String::as_str).collect()
    }

    /// Returns true if both rooms list the same equipment, in any order.
    pub fn same_equipment(&self, other: &Room) -> bool {
        self.equipment_set() == other.equipment_set()
    }
}

impl Record for Room {
    type Draft = NewRoom;
    type Patch = RoomPatch;

    const COLLECTION: &'static str = "meeting_rooms";

    fn default_order() -> OrderBy {
        OrderBy::asc("name")
    }

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        if self.capacity == 0 {
            return Err(ValidationError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl Categorized for Room {
    type Category = CapacityBucket;

    fn category_order() -> Vec<CapacityBucket> {
        CapacityBucket::ALL.to_vec()
    }

    fn category(&self) -> CapacityBucket {
        // validate() guarantees capacity >= 1
        CapacityBucket::for_capacity(self.capacity).unwrap_or(CapacityBucket::Small)
    }
}

/// Draft for creating a room.
#[derive(Debug, Clone, Serialize)]
pub struct NewRoom {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub capacity: u32,
    pub equipment: Vec<String>,
    pub is_active: bool,
}

impl NewRoom {
    /// Creates an active room draft.
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            location: None,
            capacity,
            equipment: Vec::new(),
            is_active: true,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_equipment<I, S>(mut self, equipment: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equipment = equipment.into_iter().map(Into::into).collect();
        self
    }
}

impl Payload for NewRoom {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        if self.capacity == 0 {
            return Err(ValidationError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}

/// Partial update of a room.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoomPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl RoomPatch {
    /// Patch that retires a room. Retired rooms drop out of every snapshot.
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Self::default()
        }
    }
}

impl Payload for RoomPatch {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return Err(ValidationError::InvalidCapacity(capacity));
            }
        }
        if self.name.is_none()
            && self.location.is_none()
            && self.capacity.is_none()
            && self.equipment.is_none()
            && self.is_active.is_none()
        {
            return Err(ValidationError::EmptyField("changes"));
        }
        Ok(())
    }
}
