//! Small formatting helpers shared by the views.

/// Format a Pokémon `name` into a human-friendly form.
///
/// Examples: `mr-mime` -> `Mr Mime`, `ho_oh` -> `Ho Oh`.
pub fn format_name(name: &str) -> String {
    let replaced = name.replace(['-', '_'], " ");
    let parts: Vec<String> = replaced
        .split_whitespace()
        .map(|w| {
            let mut chs = w.chars();
            match chs.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chs.as_str().to_lowercase()
                }
            }
        })
        .collect();
    parts.join(" ")
}

/// Pokédex number padded to three digits: `25` -> `#025`.
pub fn format_dex_id(id: u32) -> String {
    format!("#{:03}", id)
}

pub fn text_to_lines(s: &str, width: usize) -> Vec<String> {
    // Greedy wrap; a single word longer than `width` gets its own line.
    let mut lines = vec![];
    let mut current = String::new();
    for word in s.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
