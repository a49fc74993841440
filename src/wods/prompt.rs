use serde_json::json;

use crate::wods::dto::WorkoutRequest;

pub const SCHEMA_NAME: &str = "wod_generation";

pub const SYSTEM_PROMPT: &str = "You are an expert CrossFit coach with 10+ years of experience designing optimal workouts.
Your task is to create a detailed, safe, and effective Workout of the Day (WOD) based on the coach's specifications.

When generating WODs:
1. Ensure proper progression and intensity scaling
2. Include warm-up and cool-down phases
3. Specify exact rep ranges, weights, and timing
4. Consider recovery and injury prevention
5. Make workouts challenging but achievable for the specified difficulty level
6. Include scaling options for different fitness levels

Always respond with a valid JSON object with the following structure:
{
  \"title\": \"WOD Title\",
  \"description\": \"Brief description of the workout\",
  \"warmup\": \"Detailed warm-up instructions\",
  \"mainWorkout\": \"Main workout with exact movements, reps, and timing\",
  \"cooldown\": \"Cool-down and stretching routine\",
  \"movements\": [\"movement1\", \"movement2\", ...],
  \"equipment\": [\"equipment1\", \"equipment2\", ...],
  \"notes\": \"Additional coaching notes and modifications\"
}";

/// Deterministic user prompt for one request.
pub fn build_user_prompt(req: &WorkoutRequest) -> String {
    let mut lines: Vec<String> = vec![
        format!(
            "Create a {} level CrossFit WOD with the following specifications:",
            req.difficulty
        ),
        format!("\nWorkout Type: {}", req.strategy),
        format!("Duration: {} minutes", req.duration),
        format!("Difficulty Level: {}", req.difficulty),
    ];

    if let Some(focus) = req.focus() {
        lines.push(format!("Focus Area: {}", focus));
    }

    if let Some(movements) = req.movements.as_ref().filter(|m| !m.is_empty()) {
        lines.push(format!("\nRequired Movements: {}", movements.join(", ")));
    }

    if let Some(equipment) = req.equipment.as_ref().filter(|e| !e.is_empty()) {
        lines.push(format!("Available Equipment: {}", equipment.join(", ")));
    }

    lines.push("\nMake sure the workout is:".into());
    lines.push(format!("- Appropriate for {} athletes", req.difficulty));
    lines.push(format!("- Fits within the {} minute timeframe", req.duration));
    lines.push("- Includes a proper warm-up and cool-down".into());
    lines.push("- Specifies exact movements, rep ranges, and weights".into());
    lines.push("- Provides scaling options for different fitness levels".into());

    lines.join("\n")
}

/// Strict output schema: the eight workout fields, all required, nothing else.
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string", "description": "WOD title" },
            "description": { "type": "string", "description": "Brief description" },
            "warmup": { "type": "string", "description": "Warm-up routine" },
            "mainWorkout": { "type": "string", "description": "Main workout details" },
            "cooldown": { "type": "string", "description": "Cool-down routine" },
            "movements": {
                "type": "array",
                "items": { "type": "string" },
                "description": "List of movements in the WOD"
            },
            "equipment": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Equipment needed"
            },
            "notes": { "type": "string", "description": "Coaching notes" }
        },
        "required": [
            "title", "description", "warmup", "mainWorkout",
            "cooldown", "movements", "equipment", "notes"
        ],
        "additionalProperties": false
    })
}
