//! Compound-name fusion
//!
//! Catalog identifiers are descriptive words glued together
//! ("ТаблицаЗначений", "ВыборкаИзРезультатаЗапроса"). Fusion rebuilds such
//! identifiers from separate query words so a phrase like "таблица значений"
//! can resolve without any literal substring match.

/// Fused identifier candidates for `words`.
///
/// For the full word list and for every prefix of 2..=`max_prefix` words:
/// all words lower-case, every word capitalized, and the first word lower
/// with the rest capitalized. Order is preserved and duplicates dropped.
pub fn compound_variants(words: &[&str], max_prefix: usize) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    if words.is_empty() {
        return variants;
    }

    let mut push_all = |slice: &[&str]| {
        for variant in fuse(slice) {
            if !variants.contains(&variant) {
                variants.push(variant);
            }
        }
    };

    push_all(words);
    for len in 2..=max_prefix.min(words.len()) {
        push_all(&words[..len]);
    }

    variants
}

fn fuse(words: &[&str]) -> [String; 3] {
    let lower: String = words.iter().map(|w| w.to_lowercase()).collect();
    let pascal: String = words.iter().map(|w| capitalize(w)).collect();
    let camel: String = words
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
        .collect();
    [lower, pascal, camel]
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
