/// Strip the markdown the story API likes to add so it is not read aloud
///
/// Removes emphasis markers and heading hashes and collapses whitespace, but
/// keeps sentence punctuation for natural pauses.
pub fn prepare_for_speech(text: &str) -> String {
    text.lines()
        .map(|line| line.trim_start().trim_start_matches('#'))
        .flat_map(|line| line.split_whitespace())
        .map(|word| word.trim_matches(|c| c == '*' || c == '_' || c == '`'))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markdown() {
        let text = "## **Mia and the Moon**\n\nOnce upon a *starlit* night...\n";
        assert_eq!(
            prepare_for_speech(text),
            "Mia and the Moon Once upon a starlit night..."
        );
    }

    #[test]
    fn test_keeps_punctuation() {
        assert_eq!(prepare_for_speech("Sweet dreams, Mia!"), "Sweet dreams, Mia!");
    }

    #[test]
    fn test_blank_text() {
        assert_eq!(prepare_for_speech("  \n ** \n"), "");
    }
}
