//! Per-college checklists, their completion state and progress

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::hash::Hash;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PlannerError, PlannerResult};

/// One line of a checklist
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: bool,
    /// Set for items generated from a college deadline. Their text cannot be edited.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ChecklistItem {
    pub fn new<S: ToString>(text: S) -> Self {
        Self { text: Some(text.to_string()), completed: false, item_type: None, date: None }
    }

    pub fn is_system_item(&self) -> bool {
        self.item_type.is_some()
    }

    /// The text to display: the item text, or `"<type> - <date>"` for system items
    pub fn label(&self) -> String {
        match (&self.text, &self.item_type) {
            (Some(text), _) if text.is_empty() == false => text.clone(),
            (_, Some(item_type)) => format!("{} - {}", item_type, self.date.as_deref().unwrap_or("")),
            _ => String::new(),
        }
    }
}


/// A checklist: named sections of ordered items.
///
/// Sections keep the order the server sent them in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Checklist {
    sections: Vec<(String, Vec<ChecklistItem>)>,
}

impl Checklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> impl Iterator<Item = (&String, &Vec<ChecklistItem>)> {
        self.sections.iter().map(|(name, items)| (name, items))
    }

    pub fn section(&self, name: &str) -> Option<&[ChecklistItem]> {
        self.sections.iter()
            .find(|(section, _)| section == name)
            .map(|(_, items)| items.as_slice())
    }

    fn section_mut(&mut self, name: &str) -> Option<&mut Vec<ChecklistItem>> {
        self.sections.iter_mut()
            .find(|(section, _)| section == name)
            .map(|(_, items)| items)
    }

    pub fn item(&self, key: &ItemKey) -> Option<&ChecklistItem> {
        self.section(&key.section)?.get(key.index)
    }

    /// Append a section, or replace the items of the section that has the same name
    pub fn push_section<S: ToString>(&mut self, name: S, items: Vec<ChecklistItem>) {
        let name = name.to_string();
        match self.section_mut(&name) {
            Some(existing) => *existing = items,
            None => self.sections.push((name, items)),
        }
    }

    /// Every item key, in display order
    pub fn keys(&self) -> Vec<ItemKey> {
        self.sections.iter()
            .flat_map(|(section, items)| {
                (0..items.len()).map(move |index| ItemKey::new(section.clone(), index))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_completed(&mut self, key: &ItemKey, completed: bool) -> PlannerResult<()> {
        let item = self.item_mut(key)?;
        item.completed = completed;
        Ok(())
    }

    fn item_mut(&mut self, key: &ItemKey) -> PlannerResult<&mut ChecklistItem> {
        self.section_mut(&key.section)
            .and_then(|items| items.get_mut(key.index))
            .ok_or_else(|| PlannerError::validation(format!("No checklist item {}", key)))
    }

    /// Start editing a copy of this checklist
    pub fn draft(&self) -> ChecklistDraft {
        ChecklistDraft { checklist: self.clone() }
    }
}

impl Serialize for Checklist {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (name, items) in &self.sections {
            map.serialize_entry(name, items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Checklist {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ChecklistVisitor)
    }
}

struct ChecklistVisitor;

impl<'de> Visitor<'de> for ChecklistVisitor {
    type Value = Checklist;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a map of checklist sections")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Checklist, A::Error> {
        let mut checklist = Checklist::new();
        while let Some((name, items)) = access.next_entry::<String, Vec<ChecklistItem>>()? {
            checklist.push_section(name, items);
        }
        Ok(checklist)
    }
}


/// A working copy of a checklist, used in edit mode.
///
/// Nothing is applied until [`ChecklistDraft::finish`] is called; dropping the draft cancels the changes.
#[derive(Clone, Debug, PartialEq)]
pub struct ChecklistDraft {
    checklist: Checklist,
}

impl ChecklistDraft {
    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// Change the text of an item. System items cannot be edited.
    pub fn edit_text<S: ToString>(&mut self, key: &ItemKey, text: S) -> PlannerResult<()> {
        let item = self.checklist.item_mut(key)?;
        if item.is_system_item() {
            return Err(PlannerError::validation(format!("Checklist item {} cannot be edited", key)));
        }
        item.text = Some(text.to_string());
        Ok(())
    }

    /// Append an empty, uncompleted item to a section, and return its key
    pub fn add_item(&mut self, section: &str) -> PlannerResult<ItemKey> {
        let items = self.checklist.section_mut(section)
            .ok_or_else(|| PlannerError::validation(format!("No checklist section {}", section)))?;
        items.push(ChecklistItem::new(""));
        Ok(ItemKey::new(section, items.len() - 1))
    }

    /// Remove an item. The following items of the same section shift by one.
    pub fn delete_item(&mut self, key: &ItemKey) -> PlannerResult<ChecklistItem> {
        let items = self.checklist.section_mut(&key.section)
            .filter(|items| key.index < items.len())
            .ok_or_else(|| PlannerError::validation(format!("No checklist item {}", key)))?;
        Ok(items.remove(key.index))
    }

    pub fn finish(self) -> Checklist {
        self.checklist
    }
}


/// Identifies an item in a checklist: its section and its position in it
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub section: String,
    pub index: usize,
}

impl ItemKey {
    pub fn new<S: ToString>(section: S, index: usize) -> Self {
        Self { section: section.to_string(), index }
    }
}

impl Display for ItemKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}_{}", self.section, self.index)
    }
}


/// Describes whether the local completion flag of an item is confirmed by the server
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemSync {
    /// The local value is the server value
    Synced,
    /// The local value has been changed, and the server has not confirmed it yet
    Pending { previous: bool },
    /// The server refused the change, the local value is about to be reverted to `previous`
    RollingBack { previous: bool },
}

/// The local completion flag of an item, and its sync status
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemState {
    pub completed: bool,
    pub sync: ItemSync,
}

/// The completion state of every item of the checklist currently shown
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChecklistState {
    items: HashMap<ItemKey, ItemState>,
}

impl ChecklistState {
    /// Build a state whose keys are exactly the items of `checklist`
    pub fn from_checklist(checklist: &Checklist) -> Self {
        let items = checklist.sections()
            .flat_map(|(section, items)| {
                items.iter().enumerate().map(move |(index, item)| {
                    (ItemKey::new(section.clone(), index), ItemState { completed: item.completed, sync: ItemSync::Synced })
                })
            })
            .collect();
        Self { items }
    }

    pub fn get(&self, key: &ItemKey) -> Option<&ItemState> {
        self.items.get(key)
    }

    pub fn is_completed(&self, section: &str, index: usize) -> Option<bool> {
        self.items.get(&ItemKey::new(section, index)).map(|state| state.completed)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any item is waiting for the server
    pub fn has_pending(&self) -> bool {
        self.items.values().any(|state| matches!(state.sync, ItemSync::Pending{..}))
    }

    /// The flat `key -> completed` view of this state
    pub fn completion_map(&self) -> HashMap<ItemKey, bool> {
        self.items.iter()
            .map(|(key, state)| (key.clone(), state.completed))
            .collect()
    }

    pub fn progress(&self) -> u8 {
        progress(&self.completion_map())
    }

    /// Optimistically apply a new value. The item becomes `Pending` until [`ChecklistState::confirm`] or [`ChecklistState::reject`].
    pub fn begin_toggle(&mut self, key: &ItemKey, completed: bool) -> PlannerResult<()> {
        let state = self.items.get_mut(key)
            .ok_or_else(|| PlannerError::validation(format!("No checklist item {}", key)))?;
        match state.sync {
            ItemSync::Synced => {
                let previous = state.completed;
                state.completed = completed;
                state.sync = ItemSync::Pending { previous };
                Ok(())
            },
            _ => Err(PlannerError::validation(format!("Checklist item {} is already being updated", key))),
        }
    }

    /// The server accepted the change
    pub fn confirm(&mut self, key: &ItemKey) {
        match self.items.get_mut(key) {
            None => log::debug!("Ignoring a confirmation for item {}, which is not displayed anymore", key),
            Some(state) => {
                if let ItemSync::Pending{..} = state.sync {
                    state.sync = ItemSync::Synced;
                }
            }
        }
    }

    /// The server refused the change: restore the previous value
    pub fn reject(&mut self, key: &ItemKey) {
        let state = match self.items.get_mut(key) {
            None => {
                log::debug!("Ignoring a rejection for item {}, which is not displayed anymore", key);
                return;
            },
            Some(state) => state,
        };

        if let ItemSync::Pending{ previous } = state.sync {
            state.sync = ItemSync::RollingBack { previous };
        }
        if let ItemSync::RollingBack{ previous } = state.sync {
            log::debug!("Rolling back item {} to {}", key, previous);
            state.completed = previous;
            state.sync = ItemSync::Synced;
        }
    }
}


/// The completion percentage of a `key -> completed` map, rounded to the nearest integer.
///
/// An empty map is 0% done.
pub fn progress<K: Hash + Eq>(map: &HashMap<K, bool>) -> u8 {
    let total = map.len();
    if total == 0 {
        return 0;
    }
    let completed = map.values().filter(|completed| **completed).count();
    ((completed as f64 * 100.0) / total as f64).round() as u8
}


/// How far along a checklist is, in the coarse steps the progress bar shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressTier {
    NotStarted,
    InProgress,
    MostlyDone,
    Complete,
}

impl ProgressTier {
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0 => ProgressTier::NotStarted,
            1..=49 => ProgressTier::InProgress,
            50..=99 => ProgressTier::MostlyDone,
            _ => ProgressTier::Complete,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ProgressTier::NotStarted => "Let's get started!",
            ProgressTier::InProgress | ProgressTier::MostlyDone => "Keep going, you're making progress!",
            ProgressTier::Complete => "Congratulations!",
        }
    }
}
