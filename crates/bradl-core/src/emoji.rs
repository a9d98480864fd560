//! Emoji short-name lookup.

const GLYPHS: &[(&str, &str)] = &[
    (":no_entry:", "\u{26D4}"),
    (":face_palm:", "\u{1F926}"),
    (":ping_pong:", "\u{1F3D3}"),
    (":hourglass:", "\u{231B}"),
    (":hammer:", "\u{1F528}"),
    (":boot:", "\u{1F462}"),
    (":wastebasket:", "\u{1F5D1}"),
    (":game_die:", "\u{1F3B2}"),
    (":wave:", "\u{1F44B}"),
    (":white_check_mark:", "\u{2705}"),
    (":warning:", "\u{26A0}"),
];

/// Resolves a `:short_name:` to its glyph.
pub fn glyph(name: &str) -> Option<&'static str> {
    GLYPHS
        .iter()
        .find(|(short, _)| *short == name)
        .map(|(_, glyph)| *glyph)
}

/// Like [`glyph`], but falls back to the short name itself so a missing
/// entry never drops text from a response.
pub fn glyph_or_name(name: &str) -> String {
    glyph(name).map_or_else(|| name.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_glyphs() {
        assert_eq!(glyph(":no_entry:"), Some("⛔"));
        assert_eq!(glyph(":face_palm:"), Some("🤦"));
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(glyph(":nope:"), None);
        assert_eq!(glyph_or_name(":nope:"), ":nope:");
    }
}
