//! Filename sanitization for client-supplied upload names.

/// Characters stripped from every uploaded filename.
pub const FORBIDDEN_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

pub const MAX_NAME_LEN: usize = 100;

/// Longest base name kept in front of the extension when truncating.
const MAX_BASE_LEN: usize = 96;

/// Strips path and shell-special characters and bounds the length to
/// [`MAX_NAME_LEN`] characters, keeping the extension when truncating.
pub fn sanitize(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let stripped: String = raw.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect();

    let len = stripped.chars().count();
    if len <= MAX_NAME_LEN {
        return Some(stripped);
    }

    let chars: Vec<char> = stripped.chars().collect();
    let last_dot = chars.iter().rposition(|&c| c == '.');

    let truncated = match last_dot {
        Some(dot) if dot > 0 && len - dot < MAX_NAME_LEN => {
            let ext_len = len - dot;
            let keep = dot.min(MAX_BASE_LEN).min(MAX_NAME_LEN - ext_len);
            chars[..keep].iter().chain(&chars[dot..]).collect()
        }
        _ => chars[..MAX_NAME_LEN].iter().collect(),
    };

    Some(truncated)
}

/// True when `name` carries a path separator or any other stripped character.
pub fn has_forbidden_chars(name: &str) -> bool {
    name.contains(FORBIDDEN_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_stays_none() {
        assert_eq!(sanitize(None), None);
    }

    #[test]
    fn test_plain_name_unchanged() {
        assert_eq!(sanitize(Some("resume.pdf")).as_deref(), Some("resume.pdf"));
    }

    #[test]
    fn test_strips_every_forbidden_char() {
        let raw = r#"a/b\c:d*e?f"g<h>i|j.pdf"#;
        let out = sanitize(Some(raw)).unwrap();
        assert_eq!(out, "abcdefghij.pdf");
        assert!(!out.contains(FORBIDDEN_CHARS));
    }

    #[test]
    fn test_path_traversal_flattened() {
        assert_eq!(
            sanitize(Some("../../etc/passwd.pdf")).as_deref(),
            Some("....etcpasswd.pdf")
        );
    }

    #[test]
    fn test_non_ascii_slash_stripped() {
        assert_eq!(sanitize(Some("résumé/v2.pdf")).as_deref(), Some("résumév2.pdf"));
    }

    #[test]
    fn test_only_forbidden_chars_yields_empty() {
        assert_eq!(sanitize(Some("///")).as_deref(), Some(""));
    }

    #[test]
    fn test_exactly_max_len_untouched() {
        let raw = format!("{}.pdf", "a".repeat(96));
        assert_eq!(sanitize(Some(&raw)), Some(raw.clone()));
    }

    #[test]
    fn test_long_name_keeps_extension() {
        let raw = format!("{}.docx", "b".repeat(150));
        let out = sanitize(Some(&raw)).unwrap();
        assert!(out.ends_with(".docx"));
        assert_eq!(out.chars().count(), 100);
        assert!(out.starts_with(&"b".repeat(95)));
    }

    #[test]
    fn test_long_name_short_extension() {
        let raw = format!("{}.pdf", "c".repeat(120));
        let out = sanitize(Some(&raw)).unwrap();
        assert_eq!(out, format!("{}.pdf", "c".repeat(96)));
        assert_eq!(out.chars().count(), 100);
    }

    #[test]
    fn test_long_name_with_dot_early() {
        // last dot at position 3: base is only 3 chars, extension carries the rest
        let raw = format!("abc.{}", "d".repeat(120));
        let out = sanitize(Some(&raw)).unwrap();
        assert_eq!(out.chars().count(), 100);
        assert_eq!(out, raw.chars().take(100).collect::<String>());
    }

    #[test]
    fn test_long_name_without_dot_hard_truncated() {
        let raw = "x".repeat(140);
        assert_eq!(sanitize(Some(&raw)).unwrap(), "x".repeat(100));
    }

    #[test]
    fn test_long_name_leading_dot_hard_truncated() {
        let raw = format!(".{}", "y".repeat(140));
        assert_eq!(sanitize(Some(&raw)).unwrap().chars().count(), 100);
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let raw = format!("{}.pdf", "é".repeat(110));
        let out = sanitize(Some(&raw)).unwrap();
        assert_eq!(out.chars().count(), 100);
        assert!(out.ends_with(".pdf"));
    }

    #[test]
    fn test_has_forbidden_chars() {
        assert!(!has_forbidden_chars("u1_cv_1234.pdf"));
        assert!(has_forbidden_chars("u1_../cv.pdf"));
        assert!(has_forbidden_chars("u1_..\\cv.pdf"));
    }
}
