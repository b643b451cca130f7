//! Choosing which goals to watch.

use rustyline::DefaultEditor;
use tracing::info;

use slotwatch_models::Goal;
use slotwatch_runtime::find_goal;

use crate::error::{CliError, Result};

/// Source of interactive answers.
pub trait Prompt {
    /// Read one line of input.
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Line editor on the controlling terminal, opened on first use.
#[derive(Default)]
pub struct Terminal {
    editor: Option<DefaultEditor>,
}

impl Prompt for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let editor = match self.editor.take() {
            Some(editor) => editor,
            None => DefaultEditor::new()?,
        };
        let editor = self.editor.insert(editor);
        let line = editor.readline(prompt)?;
        let _ = editor.add_history_entry(line.as_str());
        Ok(line)
    }
}

/// Picks the goals to watch out of `candidates`.
///
/// Explicit ids win, then `all`. A single candidate is taken without asking;
/// otherwise the user is prompted until every typed id is known.
pub fn select_goals(
    candidates: Vec<Goal>,
    requested: &[String],
    all: bool,
    prompt: &mut dyn Prompt,
) -> Result<Vec<Goal>> {
    if candidates.is_empty() {
        return Err(CliError::NoGoals);
    }

    if !requested.is_empty() {
        return pick(&candidates, requested.iter().map(String::as_str));
    }

    if all {
        return Ok(candidates);
    }

    if candidates.len() == 1 {
        info!(goal_id = %candidates[0].id, "single goal chosen automatically");
        println!("a goal has been chosen automatically:");
        println!("{}", candidates[0]);
        return Ok(candidates);
    }

    loop {
        println!("Choose a goal:");
        for goal in &candidates {
            println!("{}", goal);
        }

        let line = prompt.read_line("goal id(s)> ")?;
        let ids: Vec<&str> = line
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if ids.is_empty() {
            continue;
        }

        match pick(&candidates, ids.into_iter()) {
            Ok(goals) => return Ok(goals),
            Err(e) => println!("{}", e),
        }
    }
}

/// Resolves ids against `candidates`, keeping the first occurrence of each.
fn pick<'a>(candidates: &[Goal], ids: impl Iterator<Item = &'a str>) -> Result<Vec<Goal>> {
    let mut chosen: Vec<Goal> = Vec::new();

    for id in ids {
        let goal = find_goal(candidates, id).ok_or_else(|| CliError::UnknownGoal(id.to_string()))?;
        if !chosen.contains(goal) {
            chosen.push(goal.clone());
        }
    }

    Ok(chosen)
}
