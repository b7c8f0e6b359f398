//! Calendar events and the event list page

use crate::board::form::{FormDraft, FormSubmission};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Kind of event, used for the colored badge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    #[default]
    Meetup,
    Workshop,
    Online,
    Fundraiser,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Meetup => "meetup",
            EventCategory::Workshop => "workshop",
            EventCategory::Online => "online",
            EventCategory::Fundraiser => "fundraiser",
        }
    }
}

/// A scheduled event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default)]
    pub description: String,
}

/// Form draft for creating or editing an event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: String,
    pub category: EventCategory,
    pub description: String,
}

impl FormDraft for EventDraft {
    fn required_present(&self) -> bool {
        !self.title.trim().is_empty() && self.date.is_some()
    }
}

impl EventDraft {
    pub fn new(title: &str, date: NaiveDate) -> Self {
        Self {
            title: title.to_string(),
            date: Some(date),
            ..Default::default()
        }
    }

    fn into_event(self, id: Uuid) -> Option<CalendarEvent> {
        if !self.required_present() {
            return None;
        }
        Some(CalendarEvent {
            id,
            title: self.title.trim().to_string(),
            date: self.date?,
            time: self.time,
            location: self.location,
            category: self.category,
            description: self.description,
        })
    }
}

impl From<&CalendarEvent> for EventDraft {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            title: event.title.clone(),
            date: Some(event.date),
            time: event.time,
            location: event.location.clone(),
            category: event.category,
            description: event.description.clone(),
        }
    }
}

/// Events of the calendar page, kept sorted by date and time
#[derive(Debug, Clone, Default)]
pub struct EventList {
    events: Vec<CalendarEvent>,
}

impl EventList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(mut events: Vec<CalendarEvent>) -> Self {
        events.sort_by_key(|event| (event.date, event.time));
        Self { events }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&CalendarEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Add an event; `None` when title or date is missing
    pub fn add(&mut self, draft: EventDraft) -> Option<Uuid> {
        let event = draft.into_event(Uuid::new_v4())?;
        let id = event.id;
        info!("Added event '{}' on {}", event.title, event.date);
        self.insert_sorted(event);
        Some(id)
    }

    /// Replace an event; `false` when unknown or the draft is incomplete
    pub fn update(&mut self, id: Uuid, draft: EventDraft) -> bool {
        let Some(index) = self.events.iter().position(|event| event.id == id) else {
            return false;
        };
        let Some(event) = draft.into_event(id) else {
            return false;
        };
        self.events.remove(index);
        self.insert_sorted(event);
        true
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.events.len();
        self.events.retain(|event| event.id != id);
        self.events.len() != before
    }

    /// Apply a confirmed form
    pub fn submit(&mut self, submission: FormSubmission<EventDraft, Uuid>) -> Option<Uuid> {
        match submission {
            FormSubmission::Create(draft) => self.add(draft),
            FormSubmission::Edit(id, draft) => self.update(id, draft).then_some(id),
        }
    }

    /// Events on or after `from`, soonest first
    pub fn upcoming(&self, from: NaiveDate, limit: usize) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|event| event.date >= from).take(limit).collect()
    }

    fn insert_sorted(&mut self, event: CalendarEvent) {
        let key = (event.date, event.time);
        let index = self.events.partition_point(|existing| (existing.date, existing.time) <= key);
        self.events.insert(index, event);
    }
}

/// Demo events shown when no event file is given
pub fn demo_events() -> Vec<CalendarEvent> {
    let event = |title: &str, (y, m, d): (i32, u32, u32), location: &str, category: EventCategory| {
        Some(CalendarEvent {
            id: Uuid::new_v4(),
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d)?,
            time: NaiveTime::from_hms_opt(18, 30, 0),
            location: location.to_string(),
            category,
            description: String::new(),
        })
    };

    [
        event("Elterncafé Zürich", (2026, 10, 22), "Zürich", EventCategory::Meetup),
        event("Känguru-Pflege Workshop", (2026, 11, 5), "Bern", EventCategory::Workshop),
        event("Online-Austausch für Väter", (2026, 11, 12), "Online", EventCategory::Online),
        event("Weltfrühgeborenentag", (2026, 11, 17), "Basel", EventCategory::Fundraiser),
    ]
    .into_iter()
    .flatten()
    .collect()
}
