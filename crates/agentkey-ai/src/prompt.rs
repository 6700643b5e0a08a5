//! Prompt assembly and filename suggestion.

use std::path::Path;

/// Ordered keyword table feeding [`suggest_filename`]. The first row with
/// a matching trigger wins.
const FILENAME_TRIGGERS: &[(&[&str], &str)] = &[
    (&["json"], "output.json"),
    (&["config", "yaml", "yml"], "config.yaml"),
    (&["markdown", "md"], "output.md"),
    (&["python", ".py"], "script.py"),
    (&["javascript", ".js"], "script.js"),
    (&["rust", ".rs"], "script.rs"),
    (&["readme"], "README.md"),
    (&["test", "tests"], "test_output.txt"),
];

/// Words carrying no signal for slug derivation.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "for", "to", "in", "on", "at", "by", "with", "add", "implement",
    "create", "new", "and",
];

/// Assemble the user-facing prompt: context header, then the task body,
/// then an image reference when one accompanies the capture.
pub fn build_prompt(
    task: &str,
    context_folder: Option<&str>,
    focus_file: Option<&str>,
    image_path: Option<&Path>,
) -> String {
    let mut parts = Vec::new();

    if context_folder.is_some() || focus_file.is_some() {
        parts.push("CONTEXT INFORMATION:".to_string());
        if let Some(folder) = context_folder {
            parts.push(format!("- Context Folder: {folder}"));
        }
        if let Some(file) = focus_file {
            parts.push(format!("- Focus File: {file}"));
        }
        parts.push(String::new());
    }

    parts.push("TASK:".to_string());
    parts.push(format!("Process the following text:\n{task}"));
    if let Some(path) = image_path {
        parts.push(format!("\nAn image accompanies this task: {}", path.display()));
    }
    parts.push("\nProvide only the result, no explanations.".to_string());

    parts.join("\n")
}

/// Sniff the task text for a filename hint. First matching trigger row
/// wins; no match means no suggestion.
pub fn suggest_filename(task: &str) -> Option<String> {
    let lower = task.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '(' | ')' | '"'))
        .filter(|t| !t.is_empty())
        .collect();

    for (triggers, filename) in FILENAME_TRIGGERS {
        if triggers.iter().any(|t| tokens.contains(t)) {
            return Some((*filename).to_string());
        }
    }
    None
}

/// Derive a `specs/` path for a planning agent from the task's significant
/// words: stop-words and the agent's category word removed, the first four
/// survivors joined with underscores, path-unsafe characters dropped.
pub fn planning_slug(task: &str, category: &str) -> String {
    let category = category.to_lowercase();
    let lower = task.to_lowercase();

    let words: Vec<String> = lower
        .split_whitespace()
        .map(sanitize_word)
        .filter(|w| w.len() > 2 && !STOP_WORDS.contains(&w.as_str()) && *w != category)
        .take(4)
        .collect();

    if words.is_empty() {
        return format!("specs/{category}_plan.md");
    }
    format!("specs/{}.md", words.join("_"))
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(|c| {
            !matches!(
                c,
                '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' | '[' | ']' | '.' | ','
                    | '(' | ')' | '\''
            )
        })
        .collect()
}
