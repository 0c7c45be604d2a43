//! Deterministic template fallback
//!
//! Total over (skill name, difficulty): the same inputs always produce the
//! same text, with no I/O. Skill names are bucketed into coarse categories
//! by keyword so the copy feels less generic than a single stock phrase.

use once_cell::sync::Lazy;

use crate::domain::Difficulty;

use super::{GeneratedChallenge, GeneratedMission};

/// A category of skills sharing template copy
struct Category {
    keywords: &'static [&'static str],
    /// (title, description) per difficulty, `{skill}` substituted at lookup
    missions: [(&'static str, &'static str); 4],
    tasks: &'static [&'static str],
    tips: &'static [&'static str],
    resources: &'static [&'static str],
}

static CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    vec![
        Category {
            keywords: &["guitar", "piano", "music", "sing", "drum", "violin", "bass"],
            missions: [
                (
                    "Daily {skill} warm-up",
                    "Spend a focused session on fundamentals: posture, timing, and clean repetition.",
                ),
                (
                    "Learn a new {skill} piece",
                    "Pick one piece slightly above your comfort zone and work it section by section.",
                ),
                (
                    "Record a full {skill} take",
                    "Record yourself playing end to end, then listen back and note three fixes.",
                ),
                (
                    "Perform {skill} for someone",
                    "Prepare a short set and play it for a friend or an open mic - pressure is practice.",
                ),
            ],
            tasks: &[
                "Warm up with a metronome for 10 minutes",
                "Isolate the hardest passage and loop it slowly",
                "Finish with one full clean run-through",
            ],
            tips: &[
                "Slow and clean beats fast and sloppy",
                "Stop while it still feels good - it keeps you coming back",
            ],
            resources: &["justinguitar.com", "musictheory.net", "r/WeAreTheMusicMakers"],
        },
        Category {
            keywords: &["run", "gym", "fitness", "yoga", "swim", "bike", "climb", "lift"],
            missions: [
                (
                    "Easy {skill} session",
                    "A short, low-intensity session. Consistency today matters more than intensity.",
                ),
                (
                    "Structured {skill} workout",
                    "Follow a planned session with warm-up, main block, and cool-down.",
                ),
                (
                    "Push your {skill} threshold",
                    "Add measurable load: more distance, more weight, or less rest than last week.",
                ),
                (
                    "{skill} benchmark day",
                    "Test yourself against a personal best and log the numbers honestly.",
                ),
            ],
            tasks: &[
                "Warm up for at least 5 minutes",
                "Hit the main block without skipping sets",
                "Stretch and log the session afterwards",
            ],
            tips: &[
                "Fuel and sleep decide how this session feels",
                "Soreness is fine, sharp pain is a stop sign",
            ],
            resources: &["darebee.com", "strava.com", "nerdfitness.com"],
        },
        Category {
            keywords: &["code", "coding", "program", "rust", "python", "web", "dev"],
            missions: [
                (
                    "Small {skill} kata",
                    "Solve one bite-sized exercise from scratch without looking anything up.",
                ),
                (
                    "Ship a tiny {skill} feature",
                    "Add one small, complete feature to a side project - tested and committed.",
                ),
                (
                    "Read and refactor {skill} code",
                    "Take a module you did not write, understand it fully, and leave it cleaner.",
                ),
                (
                    "Build a {skill} project end to end",
                    "Design, build, and document a small tool someone else could actually run.",
                ),
            ],
            tasks: &[
                "Write the test first",
                "Commit with a message explaining why, not what",
                "Leave a note on what you would do differently",
            ],
            tips: &[
                "Reading good code teaches faster than writing mediocre code",
                "Finish something small over starting something big",
            ],
            resources: &["exercism.org", "adventofcode.com", "doc.rust-lang.org/book"],
        },
        Category {
            keywords: &["spanish", "french", "german", "japanese", "language", "english"],
            missions: [
                (
                    "{skill} vocabulary sprint",
                    "Review your deck and add ten new words you will actually use this week.",
                ),
                (
                    "{skill} listening session",
                    "Listen to native-speed audio and summarize it out loud in the language.",
                ),
                (
                    "Hold a {skill} conversation",
                    "Have a real exchange with a speaker - tutor, partner, or language app call.",
                ),
                (
                    "{skill} immersion day",
                    "Switch your media and notes to the language for a full day.",
                ),
            ],
            tasks: &[
                "Review due flashcards before adding new ones",
                "Say every new word out loud in a sentence",
                "Write three sentences using today's material",
            ],
            tips: &[
                "Frequency beats duration - daily contact wins",
                "Mistakes in conversation are the fastest teacher",
            ],
            resources: &["anki web", "languagetransfer.org", "tatoeba.org"],
        },
    ]
});

/// Copy used when no category keyword matches
static GENERIC: Lazy<Category> = Lazy::new(|| Category {
    keywords: &[],
    missions: [
        (
            "Show up for {skill}",
            "Spend one honest, distraction-free session on it. Starting is the mission.",
        ),
        (
            "Deliberate {skill} practice",
            "Pick the weakest part of your {skill} and work only on that.",
        ),
        (
            "Stretch your {skill}",
            "Attempt something just beyond your current level and keep notes on what broke.",
        ),
        (
            "Prove your {skill}",
            "Produce something you could show another person: a result, a recording, a write-up.",
        ),
    ],
    tasks: &[
        "Set a timer and remove distractions",
        "Work on the hardest part first",
        "Write down one thing you learned",
    ],
    tips: &[
        "A small session today beats a big session someday",
        "Track it - streaks are built one honest day at a time",
    ],
    resources: &[],
});

fn category_for(skill_name: &str) -> &'static Category {
    let lower = skill_name.to_lowercase();
    CATEGORIES
        .iter()
        .find(|c| c.keywords.iter().any(|k| lower.contains(k)))
        .unwrap_or(&GENERIC)
}

fn difficulty_index(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Easy => 0,
        Difficulty::Medium => 1,
        Difficulty::Hard => 2,
        Difficulty::Expert => 3,
    }
}

/// Deterministic mission copy for (skill name, difficulty). Always succeeds.
pub fn mission_template(skill_name: &str, difficulty: Difficulty) -> GeneratedMission {
    let category = category_for(skill_name);
    let (title, description) = category.missions[difficulty_index(difficulty)];
    GeneratedMission {
        title: title.replace("{skill}", skill_name),
        description: description.replace("{skill}", skill_name),
        specific_tasks: category.tasks.iter().take(3).map(|s| s.to_string()).collect(),
        personalized_tips: category.tips.iter().take(2).map(|s| s.to_string()).collect(),
        resources: category.resources.iter().take(3).map(|s| s.to_string()).collect(),
        is_recurring: difficulty == Difficulty::Easy,
    }
}

/// Deterministic challenge copy for a skill and duration. Always succeeds.
pub fn challenge_template(skill_name: &str, skill_level: u32, duration_days: u32) -> GeneratedChallenge {
    GeneratedChallenge {
        title: format!("{duration_days}-day {skill_name} challenge"),
        description: format!(
            "One {skill_name} mission every day for {duration_days} days. You are level \
             {skill_level} - by the end of this you will not be."
        ),
        duration_days,
    }
}
