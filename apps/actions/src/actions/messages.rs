// Fixed chat replies. Completion and upload failure texts live next to their errors.

pub const UPLOAD_USAGE: &str = "To upload a resume, use: /upload /path/to/your/resume.pdf";

pub const UPLOAD_FIRST: &str = "Please upload a resume first using: /upload /path/to/resume.pdf";

pub const UPLOAD_FOLLOW_UP: &str = "Now you can ask me questions about the candidate!";

pub const UPLOAD_COMMAND: &str = "/upload ";

pub fn upload_succeeded(path: &str) -> String {
    format!("✅ Resume uploaded successfully from: {path}")
}

pub const DEBUG_HEADER: &str = "🔍 **Debug Information:**";

const PREVIEW_THRESHOLD: usize = 200;
const PREVIEW_CHARS: usize = 100;

/// First 100 characters with a marker once the text exceeds 200 characters.
pub fn text_preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_THRESHOLD {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}--->....")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_previewed_whole() {
        assert_eq!(text_preview("Skills: Rust"), "Skills: Rust");
        let exactly_200 = "a".repeat(200);
        assert_eq!(text_preview(&exactly_200), exactly_200);
    }

    #[test]
    fn test_long_text_truncated_to_100_chars() {
        let text = "é".repeat(250);
        let preview = text_preview(&text);
        assert_eq!(preview, format!("{}--->....", "é".repeat(100)));
    }
}
