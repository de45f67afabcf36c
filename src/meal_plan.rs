//! The weekly meal plan and where it is kept.
//!
//! The plan is stored as a JSON object with one key per weekday, each holding the list of meals
//! planned for that day:
//!
//! ```json
//! { "Monday": ["Porridge", "Lentil soup"], "Tuesday": [], ... }
//! ```

use std::collections::HashMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};

/// The storage key of the plan.
pub const PLAN_KEY: &str = "week_plan.json";

/// A day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// Every day, starting on Monday.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// The english name of the day.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Meals planned for each day of a week.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeekPlan {
    #[serde(default)]
    monday: Vec<String>,
    #[serde(default)]
    tuesday: Vec<String>,
    #[serde(default)]
    wednesday: Vec<String>,
    #[serde(default)]
    thursday: Vec<String>,
    #[serde(default)]
    friday: Vec<String>,
    #[serde(default)]
    saturday: Vec<String>,
    #[serde(default)]
    sunday: Vec<String>,
}

impl WeekPlan {
    /// The meals for a day.
    pub fn day(&self, day: Weekday) -> &[String] {
        match day {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
            Weekday::Sunday => &self.sunday,
        }
    }

    /// The meals for a day, mutably.
    pub fn day_mut(&mut self, day: Weekday) -> &mut Vec<String> {
        match day {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        }
    }

    /// Plan a meal on a day.
    pub fn add(&mut self, day: Weekday, meal: impl Into<String>) {
        self.day_mut(day).push(meal.into());
    }

    /// Iterate over the days from Monday to Sunday.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[String])> + '_ {
        let days: &'static [Weekday] = &Weekday::ALL;
        days.iter().map(move |&day| (day, self.day(day)))
    }

    /// Whether nothing is planned.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, meals)| meals.is_empty())
    }

    /// Clear every day, keeping the days themselves.
    pub fn reset(&mut self) {
        for &day in Weekday::ALL.iter() {
            self.day_mut(day).clear();
        }
    }
}

/// A key value store holding serialized plans.
pub trait PlanStore {
    /// Read the value under `key`, if present.
    fn read(&self, key: &str) -> Result<Option<String>>;
    /// Write `value` under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// The browser's `localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Get a handle to local storage for the current window.
    pub fn new() -> Result<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| Error::Storage("couldn't get window handle".to_owned()))?
            .local_storage()
            .map_err(Error::storage)?
            .ok_or_else(|| Error::Storage("local storage not supported".to_owned()))?;

        Ok(LocalStorage { storage: storage })
    }
}

impl PlanStore for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(Error::storage)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(Error::storage)
    }
}

/// A store kept in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl PlanStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Load the plan, or an empty week if none was saved.
pub fn load<S: PlanStore + ?Sized>(store: &S) -> Result<WeekPlan> {
    match store.read(PLAN_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(WeekPlan::default()),
    }
}

/// Save the plan.
pub fn save<S: PlanStore + ?Sized>(store: &mut S, plan: &WeekPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    store.write(PLAN_KEY, &json)
}

/// Clear every day of the plan.
pub fn reset(plan: &mut WeekPlan) {
    plan.reset()
}
