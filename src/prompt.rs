use color_eyre::eyre::Result;
use dialoguer::{Confirm, Select, theme::ColorfulTheme};
use ghpm::Issue;

use crate::triage::{Confirmation, Prompter};

/// Terminal prompts.
#[derive(Default)]
pub struct DialoguerPrompter {
	theme: ColorfulTheme,
}

impl Prompter for DialoguerPrompter {
	fn confirm(&mut self, issue: &Issue) -> Result<Confirmation> {
		let options = &["Yes, apply", "No, skip this issue", "Quit"];

		let selection = Select::with_theme(&self.theme)
			.with_prompt(format!("{} {}", issue.reference(), issue.title))
			.items(options)
			.default(0)
			.interact()?;

		Ok(match selection {
			0 => Confirmation::Yes,
			1 => Confirmation::No,
			_ => Confirmation::Quit,
		})
	}

	fn choose_option(&mut self, issue: &Issue, field: &str, options: &[String]) -> Result<Option<String>> {
		if options.is_empty() {
			tracing::warn!(field, "field has no options to choose from, skipping");
			return Ok(None);
		}
		let mut items: Vec<&str> = options.iter().map(String::as_str).collect();
		items.push("(leave unset)");

		let selection = Select::with_theme(&self.theme)
			.with_prompt(format!("{field} for {}", issue.reference()))
			.items(&items)
			.default(items.len() - 1)
			.interact()?;

		Ok(options.get(selection).cloned())
	}
}

/// Yes/no before a destructive batch. `assume_yes` skips the prompt.
pub fn confirm_batch(prompt: &str, assume_yes: bool) -> Result<bool> {
	if assume_yes {
		return Ok(true);
	}
	Ok(Confirm::with_theme(&ColorfulTheme::default()).with_prompt(prompt).default(false).interact()?)
}
