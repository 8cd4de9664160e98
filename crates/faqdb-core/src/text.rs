//! The one tokenizer every lexical score in the workspace goes through.

/// Lowercase `text`, turn everything outside `[a-z0-9]` into a space and
/// split on whitespace runs.
///
/// Tokens made only of digits are dropped, so `"Hello, World!  123"` yields
/// `["hello", "world"]` while `"class 10th"` keeps `"10th"`.
pub fn tokenize(text: &str) -> Vec<String> {
    let folded: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { ' ' })
        .collect();
    folded
        .split_whitespace()
        .filter(|t| !t.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::tokenize;

    #[test]
    fn strips_punctuation_digits_and_case() {
        assert_eq!(tokenize("Hello, World!  123"), vec!["hello", "world"]);
    }

    #[test]
    fn empty_and_blank_inputs_yield_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \t\n ").is_empty());
        assert!(tokenize("?!,.").is_empty());
    }

    #[test]
    fn punctuation_splits_words() {
        assert_eq!(tokenize("hostel-food,water"), vec!["hostel", "food", "water"]);
    }

    #[test]
    fn mixed_alphanumeric_tokens_survive() {
        assert_eq!(tokenize("Class 10th fees 2024"), vec!["class", "10th", "fees"]);
    }

    #[test]
    fn non_ascii_letters_are_separators() {
        assert_eq!(tokenize("caf\u{e9} menu"), vec!["caf", "menu"]);
    }
}
