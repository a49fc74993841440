use serde::{Deserialize, Serialize};

use crate::wods::dto::{Difficulty, Strategy, WorkoutRequest, MAX_DURATION, MIN_DURATION};

pub const FOCUS_AREAS: [&str; 6] = [
    "Full Body",
    "Upper Body",
    "Lower Body",
    "Cardio",
    "Strength",
    "Gymnastics",
];

/// Raw intake form as posted by a browser.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WodForm {
    pub strategy: String,
    pub duration: String,
    pub difficulty: String,
    #[serde(default)]
    pub focus_area: String,
    /// Comma-separated.
    #[serde(default)]
    pub movements: String,
    /// Comma-separated.
    #[serde(default)]
    pub equipment: String,
}

impl WodForm {
    /// Closes the free-form fields over the request enums.
    pub fn into_request(self) -> Result<WorkoutRequest, String> {
        let strategy = Strategy::parse(&self.strategy)
            .ok_or_else(|| format!("unknown strategy '{}'", self.strategy))?;
        let difficulty = Difficulty::parse(&self.difficulty)
            .ok_or_else(|| format!("unknown difficulty '{}'", self.difficulty))?;
        let duration = self
            .duration
            .trim()
            .parse::<i32>()
            .map_err(|_| {
                format!(
                    "duration must be a whole number of minutes, got '{}'",
                    self.duration
                )
            })?;

        let focus = self.focus_area.trim();
        let req = WorkoutRequest {
            strategy,
            duration,
            difficulty,
            focus_area: (!focus.is_empty()).then(|| focus.to_string()),
            movements: split_csv(&self.movements),
            equipment: split_csv(&self.equipment),
        };
        req.validate()?;
        Ok(req)
    }
}

fn split_csv(text: &str) -> Option<Vec<String>> {
    let items: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    (!items.is_empty()).then_some(items)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOptions {
    pub strategies: Vec<&'static str>,
    pub difficulties: Vec<&'static str>,
    pub focus_areas: Vec<&'static str>,
    pub min_duration: i32,
    pub max_duration: i32,
    pub default_duration: i32,
}

impl FormOptions {
    pub fn current() -> Self {
        Self {
            strategies: Strategy::ALL.iter().map(|s| s.as_str()).collect(),
            difficulties: Difficulty::ALL.iter().map(|d| d.as_str()).collect(),
            focus_areas: FOCUS_AREAS.to_vec(),
            min_duration: MIN_DURATION,
            max_duration: MAX_DURATION,
            default_duration: 20,
        }
    }
}
