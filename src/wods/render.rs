use std::fmt::Write;

use crate::wods::dto::{GeneratedWorkout, WorkoutRequest};
use crate::wods::repo_types::StoredWorkout;

struct View<'a> {
    title: &'a str,
    description: &'a str,
    strategy: &'a str,
    duration: i32,
    difficulty: &'a str,
    warmup: &'a str,
    main_workout: &'a str,
    cooldown: &'a str,
    movements: &'a [String],
    equipment: &'a [String],
    notes: &'a str,
}

pub fn generated_markdown(req: &WorkoutRequest, wod: &GeneratedWorkout) -> String {
    render(&View {
        title: &wod.title,
        description: &wod.description,
        strategy: req.strategy.as_str(),
        duration: req.duration,
        difficulty: req.difficulty.as_str(),
        warmup: &wod.warmup,
        main_workout: &wod.main_workout,
        cooldown: &wod.cooldown,
        movements: &wod.movements,
        equipment: &wod.equipment,
        notes: &wod.notes,
    })
}

pub fn stored_markdown(wod: &StoredWorkout) -> String {
    let movements = wod.movement_list();
    let equipment = wod.equipment_list();
    render(&View {
        title: &wod.title,
        description: wod.description.as_deref().unwrap_or_default(),
        strategy: &wod.strategy,
        duration: wod.duration,
        difficulty: &wod.difficulty,
        warmup: wod.warmup.as_deref().unwrap_or_default(),
        main_workout: &wod.main_workout,
        cooldown: wod.cooldown.as_deref().unwrap_or_default(),
        movements: &movements,
        equipment: &equipment,
        notes: wod.notes.as_deref().unwrap_or_default(),
    })
}

fn render(v: &View<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", v.title);
    if !v.description.is_empty() {
        let _ = writeln!(out, "\n{}", v.description);
    }
    let _ = writeln!(out, "\n`{}` · `{} min` · `{}`", v.strategy, v.duration, v.difficulty);

    section(&mut out, "Warm-up", v.warmup);
    section(&mut out, "Main Workout", v.main_workout);
    section(&mut out, "Cool-down", v.cooldown);
    list(&mut out, "Movements", v.movements);
    list(&mut out, "Equipment", v.equipment);
    section(&mut out, "Coaching Notes", v.notes);

    out
}

fn section(out: &mut String, heading: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }
    let _ = writeln!(out, "\n## {}\n\n{}", heading, body.trim_end());
}

fn list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n## {}\n", heading);
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
}
