use once_cell::sync::Lazy;
use regex::Regex;

/// Matched as plain substrings of the lowercased text, so compound words
/// trip it too ("dogma" contains "dog") — long-standing bot behavior, kept.
const RUDE_WORDS: &[&str] = &["sucks", "hate", "stupid", "idiot", "trash", "useless", "dog"];

/// Role word followed anywhere later in the text by an insult word, both on
/// word boundaries. "it" also matches the English pronoun; known false
/// positive, kept.
static TARGETED_INSULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(hr|admin|finance|manager|it)\b.*\b(sucks|lazy|idiot|trash)\b")
        .expect("targeted-insult pattern is valid")
});

/// Decide whether a message body may be posted. Pure and deterministic;
/// every body passes through here before it can reach routing.
pub fn allows(text: &str) -> bool {
    let lowered = text.to_lowercase();
    if RUDE_WORDS.iter().any(|w| lowered.contains(w)) {
        return false;
    }
    !TARGETED_INSULT.is_match(&lowered)
}
