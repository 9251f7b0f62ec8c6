//! OCR language selection.

use serde::Serialize;

/// Language every installation gets.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Ordered, duplicate-free set of Tesseract language codes, starting with
/// [`DEFAULT_LANGUAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OcrLanguages {
    codes: Vec<String>,
}

impl Default for OcrLanguages {
    fn default() -> Self {
        Self {
            codes: vec![DEFAULT_LANGUAGE.to_string()],
        }
    }
}

impl OcrLanguages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add languages from comma-separated operator input such as `deu,fra`.
    ///
    /// Tokens are trimmed and lowercased; empty tokens and duplicates are
    /// dropped. Returns the tokens rejected as malformed.
    pub fn extend_from_input(&mut self, input: &str) -> Vec<String> {
        let mut rejected = Vec::new();
        for token in input.split(',') {
            let code = token.trim().to_lowercase();
            if code.is_empty() {
                continue;
            }
            if !is_valid_code(&code) {
                rejected.push(code);
                continue;
            }
            if !self.codes.contains(&code) {
                self.codes.push(code);
            }
        }
        rejected
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Languages beyond the default.
    pub fn extra(&self) -> impl Iterator<Item = &str> {
        self.codes
            .iter()
            .map(String::as_str)
            .filter(|code| *code != DEFAULT_LANGUAGE)
    }

    pub fn has_extra(&self) -> bool {
        self.extra().next().is_some()
    }

    /// Value for `PAPERLESS_OCR_LANGUAGE`, e.g. `eng+deu+fra`.
    pub fn joined(&self) -> String {
        self.codes.join("+")
    }

    /// Debian language-pack packages for the extra languages.
    pub fn packages(&self) -> Vec<String> {
        self.extra()
            .map(|code| format!("tesseract-ocr-{}", code.replace('_', "-")))
            .collect()
    }
}

/// Tesseract codes look like `deu`, `chi_sim` or `deu_latf`.
fn is_valid_code(code: &str) -> bool {
    code.chars().next().is_some_and(|c| c.is_ascii_lowercase())
        && code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_english_only() {
        let languages = OcrLanguages::new();
        assert_eq!(languages.joined(), "eng");
        assert!(!languages.has_extra());
        assert!(languages.packages().is_empty());
    }

    #[test]
    fn comma_separated_input_is_appended() {
        let mut languages = OcrLanguages::new();
        let rejected = languages.extend_from_input("deu,fra");

        assert!(rejected.is_empty());
        assert_eq!(languages.joined(), "eng+deu+fra");
        assert_eq!(
            languages.packages(),
            vec!["tesseract-ocr-deu", "tesseract-ocr-fra"]
        );
    }

    #[test]
    fn whitespace_case_and_duplicates_are_normalized() {
        let mut languages = OcrLanguages::new();
        languages.extend_from_input(" DEU , fra,,eng, deu ");
        assert_eq!(languages.codes(), ["eng", "deu", "fra"]);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let mut languages = OcrLanguages::new();
        let rejected = languages.extend_from_input("deu;fra,chi_sim,../x");

        assert_eq!(rejected, vec!["deu;fra", "../x"]);
        assert_eq!(languages.joined(), "eng+chi_sim");
        assert_eq!(languages.packages(), vec!["tesseract-ocr-chi-sim"]);
    }
}
