// Rule-based noun lemmatizer.
//
// Keyword counting only needs "waves" and "wave" to land in the same bucket,
// so this reduces plural nouns to the singular with a small table of
// irregulars plus the usual suffix rules. Verbs and adjectives pass through
// unchanged.

/// Irregular plurals and words that look plural but aren't.
const IRREGULAR: &[(&str, &str)] = &[
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("people", "person"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("shelves", "shelf"),
    ("halves", "half"),
    ("wolves", "wolf"),
    ("news", "news"),
    ("series", "series"),
    ("species", "species"),
    ("debris", "debris"),
];

/// Lemmatize a single lowercase token.
pub fn lemmatize_word(word: &str) -> String {
    if let Some((_, lemma)) = IRREGULAR.iter().find(|(plural, _)| *plural == word) {
        return lemma.to_string();
    }

    // Short words ("gas", "bus", "was") and non-plural endings stay as-is
    if word.chars().count() <= 3
        || word.ends_with("ss")
        || word.ends_with("us")
        || word.ends_with("is")
        || !word.ends_with('s')
    {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() >= 2 {
            return format!("{stem}y");
        }
    }

    for suffix in ["sses", "ches", "shes", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }

    word[..word.len() - 1].to_string()
}
