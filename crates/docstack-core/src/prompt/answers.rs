//! Prompter backed by pre-filled answers.

use std::collections::BTreeMap;

use tracing::info;

use super::{Prompter, keys};

/// Answers prompts from a key/value table.
///
/// Keys with an answer are never shown to the operator. Unanswered prompts
/// go to the fallback prompter when one is set; otherwise they behave as
/// empty input, so each prompt takes its default.
pub struct AnswerPrompter {
    answers: BTreeMap<String, String>,
    fallback: Option<Box<dyn Prompter>>,
    asked: Vec<String>,
    logged: Vec<String>,
}

impl AnswerPrompter {
    pub fn new(answers: BTreeMap<String, String>) -> Self {
        Self {
            answers,
            fallback: None,
            asked: Vec::new(),
            logged: Vec::new(),
        }
    }

    /// Forward unanswered prompts to `fallback`.
    pub fn with_fallback(mut self, fallback: Box<dyn Prompter>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_answer(mut self, key: &str, value: &str) -> Self {
        self.answers.insert(key.to_string(), value.to_string());
        self
    }

    /// Keys asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Messages written to the log because no fallback was set.
    pub fn logged(&self) -> &[String] {
        &self.logged
    }

    fn log(&mut self, text: &str) {
        info!("{}", text);
        self.logged.push(text.to_string());
    }

    /// Answer keys that no prompt will ever ask.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.answers
            .keys()
            .map(String::as_str)
            .filter(|key| !keys::ALL.contains(key))
            .collect()
    }
}

impl Prompter for AnswerPrompter {
    fn input(&mut self, key: &str, prompt: &str, default: Option<&str>) -> anyhow::Result<String> {
        self.asked.push(key.to_string());
        if let Some(answer) = self.answers.get(key) {
            return Ok(answer.clone());
        }
        match self.fallback.as_mut() {
            Some(fallback) => fallback.input(key, prompt, default),
            None => Ok(default.unwrap_or_default().to_string()),
        }
    }

    fn secret(&mut self, key: &str, prompt: &str) -> anyhow::Result<String> {
        self.asked.push(key.to_string());
        if let Some(answer) = self.answers.get(key) {
            return Ok(answer.clone());
        }
        match self.fallback.as_mut() {
            Some(fallback) => fallback.secret(key, prompt),
            None => Ok(String::new()),
        }
    }

    fn message(&mut self, text: &str) -> anyhow::Result<()> {
        match self.fallback.as_mut() {
            Some(fallback) => fallback.message(text),
            None => {
                self.log(text);
                Ok(())
            }
        }
    }

    fn sensitive_message(&mut self, text: &str, redacted: &str) -> anyhow::Result<()> {
        match self.fallback.as_mut() {
            Some(fallback) => fallback.sensitive_message(text, redacted),
            None => {
                self.log(redacted);
                Ok(())
            }
        }
    }
}
