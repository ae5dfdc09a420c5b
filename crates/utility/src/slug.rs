/// Derives the canonical slug for a service: the `+`-joined line names,
/// followed by the origin and destination, lowercased and punctuation
/// stripped down to `[a-z0-9\-+.|]`.
///
/// Applying this function to its own output is a no-op.
pub fn canonicalise(line_names: &[String], origin: &str, destination: &str) -> String {
    let joined_lines = line_names.join("+");
    let raw = format!("{joined_lines}-{origin}-{destination}");

    let lowered = raw.to_lowercase().replace(" / ", " ").replace(' ', "-");

    lowered
        .chars()
        .filter(|ch| {
            ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | '|')
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_multiple_line_names_with_a_plus() {
        let slug = canonicalise(
            &["X1".to_string(), "X2".to_string()],
            "Leeds",
            "York",
        );
        assert_eq!(slug, "x1+x2-leeds-york");
    }

    #[test]
    fn collapses_slash_separators_and_strips_punctuation() {
        let slug = canonicalise(&["21".to_string()], "Town Centre / Bus Station", "Village");
        assert_eq!(slug, "21-town-centre-bus-station-village");
    }

    #[test]
    fn reapplying_to_the_whole_slug_as_a_single_line_name_changes_nothing() {
        let slug = canonicalise(&["21".to_string()], "Town Centre", "Village");
        let reapplied = canonicalise(&[slug.clone()], "", "");
        assert_eq!(reapplied.trim_end_matches('-'), slug);
    }
}
