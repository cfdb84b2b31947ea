//! Text rendering of path outcomes.

use learnpath_retrieval::PathOutcome;

pub const END_OF_PATH: &str = "End of your personalized learning path!";
pub const NO_RELEVANT_CONTENT: &str =
    "No relevant content found for your query. Try rephrasing it.";
pub const LEVEL_MISMATCH: &str = "Found relevant topics, but they don't match your selected skill level. Try selecting a different level or broadening your question.";

/// Render an outcome as the text shown to the learner.
pub fn render(outcome: &PathOutcome) -> String {
    let path = match outcome {
        PathOutcome::Path(path) => path,
        PathOutcome::NoRelevantContent => return format!("{NO_RELEVANT_CONTENT}\n"),
        PathOutcome::LevelMismatch { .. } => return format!("{LEVEL_MISMATCH}\n"),
    };

    let mut out = String::new();
    for (i, step) in path.iter().enumerate() {
        let document = &step.document;
        out.push_str(&format!(
            "Step {}: {} (Level: {})\n",
            i + 1,
            document.topic,
            document.level
        ));
        for line in document.content.lines() {
            out.push_str(&format!("    {line}\n"));
        }
        out.push('\n');
    }
    out.push_str(END_OF_PATH);
    out.push('\n');
    out
}
