//! Starter mission templates used at onboarding.
//!
//! # Responsibility
//! - Provide the default per-age-group habit sets a parent can accept or
//!   edit when creating a child profile.

use serde::{Deserialize, Serialize};

use crate::model::habit::{ChildId, Habit};

/// Age bracket selected during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "5-7")]
    FiveToSeven,
    #[serde(rename = "8-10")]
    EightToTen,
    #[serde(rename = "11-12")]
    ElevenToTwelve,
}

/// Title/icon pair for a not-yet-created habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitTemplate {
    pub title: String,
    pub icon: String,
}

impl HabitTemplate {
    fn new(title: &str, icon: &str) -> Self {
        Self {
            title: title.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Default habit templates for one age group, in display order.
pub fn default_templates(age_group: AgeGroup) -> Vec<HabitTemplate> {
    let entries: &[(&str, &str)] = match age_group {
        AgeGroup::FiveToSeven => &[
            ("Wake up on time", "⏰"),
            ("Make the bed", "🛏️"),
            ("Get dressed", "👕"),
            ("Brush teeth", "🦷"),
            ("Eat breakfast", "🍳"),
        ],
        AgeGroup::EightToTen => &[
            ("Wake up on time", "⏰"),
            ("Make the bed", "🛏️"),
            ("Get dressed", "👕"),
            ("Brush teeth", "🦷"),
            ("Pack backpack", "🎒"),
            ("Eat breakfast", "🍳"),
        ],
        AgeGroup::ElevenToTwelve => &[
            ("Wake up on time", "⏰"),
            ("Make the bed", "🛏️"),
            ("Personal hygiene", "🚿"),
            ("Get dressed", "👕"),
            ("Pack backpack", "🎒"),
            ("Eat breakfast", "🍳"),
            ("Check schedule", "📅"),
        ],
    };

    entries
        .iter()
        .map(|(title, icon)| HabitTemplate::new(title, icon))
        .collect()
}

/// Materializes the default templates into habits owned by `child_id`, with
/// positions assigned in template order.
pub fn starter_habits(child_id: ChildId, age_group: AgeGroup) -> Vec<Habit> {
    default_templates(age_group)
        .into_iter()
        .enumerate()
        .map(|(index, template)| {
            Habit::new(child_id, template.title, template.icon, index as i64)
        })
        .collect()
}
