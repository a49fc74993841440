use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::wods::repo_types::NewWod;

pub const MIN_DURATION: i32 = 5;
pub const MAX_DURATION: i32 = 120;

/// Workout format picked by the coach.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Strategy {
    #[serde(rename = "AMRAP")]
    Amrap,
    #[serde(rename = "EMOM")]
    Emom,
    #[serde(rename = "For Time", alias = "ForTime")]
    ForTime,
    Strength,
    Hybrid,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Amrap,
        Strategy::Emom,
        Strategy::ForTime,
        Strategy::Strength,
        Strategy::Hybrid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Amrap => "AMRAP",
            Strategy::Emom => "EMOM",
            Strategy::ForTime => "For Time",
            Strategy::Strength => "Strength",
            Strategy::Hybrid => "Hybrid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "ForTime" => Some(Strategy::ForTime),
            other => Self::ALL.into_iter().find(|v| v.as_str() == other),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for one generation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRequest {
    pub strategy: Strategy,
    pub duration: i32,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
}

impl WorkoutRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_duration(self.duration)
    }

    /// Focus area if one was given; blank counts as none.
    pub fn focus(&self) -> Option<&str> {
        self.focus_area.as_deref().filter(|f| !f.trim().is_empty())
    }
}

pub fn validate_duration(duration: i32) -> Result<(), String> {
    if !(MIN_DURATION..=MAX_DURATION).contains(&duration) {
        return Err(format!(
            "duration must be between {} and {} minutes, got {}",
            MIN_DURATION, MAX_DURATION, duration
        ));
    }
    Ok(())
}

/// The model's structured reply. Every field is required and nothing else is allowed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratedWorkout {
    pub title: String,
    pub description: String,
    pub warmup: String,
    pub main_workout: String,
    pub cooldown: String,
    pub movements: Vec<String>,
    pub equipment: Vec<String>,
    pub notes: String,
}

/// Body of `POST /wod/save`. Lists arrive as JSON-array text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveWodRequest {
    pub title: String,
    pub description: String,
    pub strategy: Strategy,
    pub duration: i32,
    pub difficulty: Difficulty,
    pub warmup: String,
    pub main_workout: String,
    pub cooldown: String,
    pub movements: String,
    pub equipment: String,
    pub notes: String,
}

impl SaveWodRequest {
    /// Builds the save body the same way the intake page does after a generation.
    pub fn from_generated(req: &WorkoutRequest, wod: &GeneratedWorkout) -> Self {
        Self {
            title: wod.title.clone(),
            description: wod.description.clone(),
            strategy: req.strategy,
            duration: req.duration,
            difficulty: req.difficulty,
            warmup: wod.warmup.clone(),
            main_workout: wod.main_workout.clone(),
            cooldown: wod.cooldown.clone(),
            movements: encode_list(&wod.movements),
            equipment: encode_list(&wod.equipment),
            notes: wod.notes.clone(),
        }
    }

    pub fn into_new_wod(self) -> Result<NewWod, AppError> {
        validate_duration(self.duration).map_err(AppError::Validation)?;
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }
        if title.chars().count() > 255 {
            return Err(AppError::Validation("title must be at most 255 characters".into()));
        }
        decode_list(&self.movements)
            .map_err(|e| AppError::Validation(format!("movements: {}", e)))?;
        decode_list(&self.equipment)
            .map_err(|e| AppError::Validation(format!("equipment: {}", e)))?;

        Ok(NewWod {
            title: title.to_string(),
            description: self.description,
            strategy: self.strategy.as_str().to_string(),
            duration: self.duration,
            difficulty: self.difficulty.as_str().to_string(),
            warmup: self.warmup,
            main_workout: self.main_workout,
            cooldown: self.cooldown,
            movements: self.movements,
            equipment: self.equipment,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteWodRequest {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteWodResponse {
    pub success: bool,
}

pub fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".into())
}

pub fn decode_list(text: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(text)
}
