//! Free-text sanitization applied before todo text reaches storage.

use html_escape::encode_text;

/// Escapes HTML-significant characters (`&`, `<`, `>`) so stored text cannot
/// carry live markup or script.
pub fn sanitize_text(value: &str) -> String {
    encode_text(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::sanitize_text;

    #[test]
    fn escapes_script_markup() {
        assert_eq!(
            sanitize_text("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn leaves_plain_text_and_timestamps_unchanged() {
        assert_eq!(sanitize_text("buy milk"), "buy milk");
        assert_eq!(
            sanitize_text("2024-02-29T10:15:00+02:00"),
            "2024-02-29T10:15:00+02:00"
        );
    }

    #[test]
    fn escapes_ampersands() {
        assert_eq!(sanitize_text("salt & pepper"), "salt &amp; pepper");
    }
}
