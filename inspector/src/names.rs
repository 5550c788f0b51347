/// Turns a member name into a display label: `move_speed` and `moveSpeed`
/// both become `Move Speed`. Leading underscores and an `m_` prefix are
/// dropped.
pub fn nicify(name: &str) -> String {
    let trimmed = name.trim_start_matches('_');
    let trimmed = trimmed.strip_prefix("m_").unwrap_or(trimmed);

    let mut out = String::with_capacity(trimmed.len() + 4);
    let mut prev: Option<char> = None;
    for ch in trimmed.chars() {
        if ch == '_' {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            prev = Some(ch);
            continue;
        }
        let boundary = match prev {
            Some(p) => ch.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()),
            None => false,
        };
        if boundary && !out.ends_with(' ') {
            out.push(' ');
        }
        if out.is_empty() || out.ends_with(' ') {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        prev = Some(ch);
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::nicify;

    #[test]
    fn nicifies() {
        assert_eq!(nicify("move_speed"), "Move Speed");
        assert_eq!(nicify("moveSpeed"), "Move Speed");
        assert_eq!(nicify("_health"), "Health");
        assert_eq!(nicify("m_Script"), "Script");
        assert_eq!(nicify("hp2Max"), "Hp2 Max");
        assert_eq!(nicify("x"), "X");
    }
}
