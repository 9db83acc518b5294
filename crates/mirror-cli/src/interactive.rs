//! Interactive fallback for argument-less invocations
//!
//! Answers are turned into the same flags a user would type, so validation
//! happens in one place. Uses dialoguer for terminal prompts.

use dialoguer::{Confirm, Input};

use crate::error::Result;

/// Interval answer meaning "run a single time"
pub const ONCE_TOKEN: &str = "once";

/// Source of answers to setup questions
pub trait Prompter {
    /// Ask for free text; an empty answer is allowed.
    fn input(&mut self, prompt: &str) -> Result<String>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// Prompts on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }
}

/// Return `raw` untouched if it has any arguments, otherwise build the
/// argument list from prompts.
///
/// A partial command line is never completed interactively; it goes straight
/// to validation.
pub fn resolve_arguments(raw: Vec<String>, prompter: &mut dyn Prompter) -> Result<Vec<String>> {
    if !raw.is_empty() {
        return Ok(raw);
    }
    prompt_arguments(prompter)
}

fn prompt_arguments(prompter: &mut dyn Prompter) -> Result<Vec<String>> {
    let source = prompter.input("Source folder")?;
    let destination = prompter.input("Destination folder")?;
    let interval = prompter.input(&format!(
        "Interval (e.g. 30s, 15m, 2h, 1d; '{ONCE_TOKEN}' for a single run)"
    ))?;
    let log_file = prompter.input("Log file or folder (blank for default)")?;
    let admin = prompter.confirm("Run with administrator privileges?", false)?;

    let mut args = Vec::new();
    push_flag(&mut args, "--source", &source);
    push_flag(&mut args, "--destination", &destination);
    if !interval.trim().eq_ignore_ascii_case(ONCE_TOKEN) {
        push_flag(&mut args, "--interval", &interval);
    }
    push_flag(&mut args, "--log-file", &log_file);
    if admin {
        args.push("--admin".to_string());
    }

    tracing::debug!(?args, "Resolved arguments from prompts");
    Ok(args)
}

/// Blank answers add nothing.
fn push_flag(args: &mut Vec<String>, flag: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    /// Replays canned answers in order.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedPrompter {
        inputs: VecDeque<String>,
        confirms: VecDeque<bool>,
        pub(crate) asked: usize,
    }

    impl ScriptedPrompter {
        pub(crate) fn new(inputs: &[&str], confirms: &[bool]) -> Self {
            Self {
                inputs: inputs.iter().map(|s| s.to_string()).collect(),
                confirms: confirms.iter().copied().collect(),
                asked: 0,
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn input(&mut self, _prompt: &str) -> Result<String> {
            self.asked += 1;
            Ok(self.inputs.pop_front().expect("ran out of scripted inputs"))
        }

        fn confirm(&mut self, _prompt: &str, _default: bool) -> Result<bool> {
            self.asked += 1;
            Ok(self.confirms.pop_front().expect("ran out of scripted confirms"))
        }
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn once_answer_produces_no_interval_flag() {
        let mut prompter = ScriptedPrompter::new(&["S", "D", "once", ""], &[false]);

        let args = resolve_arguments(Vec::new(), &mut prompter).unwrap();

        assert_eq!(args, strings(&["--source", "S", "--destination", "D"]));
    }

    #[test]
    fn every_answer_becomes_a_flag() {
        let mut prompter =
            ScriptedPrompter::new(&["/data", "/backup", "15m", "/var/log/mirror/"], &[true]);

        let args = resolve_arguments(Vec::new(), &mut prompter).unwrap();

        assert_eq!(
            args,
            strings(&[
                "--source",
                "/data",
                "--destination",
                "/backup",
                "--interval",
                "15m",
                "--log-file",
                "/var/log/mirror/",
                "--admin",
            ])
        );
    }

    #[test]
    fn once_token_is_case_insensitive_and_blank_means_once() {
        for interval in ["ONCE", " Once ", ""] {
            let mut prompter = ScriptedPrompter::new(&["S", "D", interval, ""], &[false]);
            let args = resolve_arguments(Vec::new(), &mut prompter).unwrap();
            assert!(!args.contains(&"--interval".to_string()), "{:?}", args);
        }
    }

    #[test]
    fn blank_source_is_left_for_validation() {
        let mut prompter = ScriptedPrompter::new(&["", "D", "once", ""], &[false]);

        let args = resolve_arguments(Vec::new(), &mut prompter).unwrap();

        assert_eq!(args, strings(&["--destination", "D"]));
    }

    #[test]
    fn supplied_arguments_skip_prompting() {
        let mut prompter = ScriptedPrompter::default();

        let args = resolve_arguments(strings(&["--source", "S"]), &mut prompter).unwrap();

        assert_eq!(args, strings(&["--source", "S"]));
        assert_eq!(prompter.asked, 0);
    }
}
