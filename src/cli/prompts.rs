//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user to confirm applying the listed cleaning actions
pub fn confirm_cleaning(actions: &[String]) -> Result<bool> {
    let message = format!(
        "Apply {} cleaning action(s): {}?",
        actions.len(),
        actions.join("; ")
    );
    confirm_step(&message)
}
