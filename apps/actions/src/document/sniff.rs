//! Binary content sniffing for uploaded documents.
//!
//! Decides the container format from the bytes alone. File names and
//! extensions are never consulted.

/// PDF files begin with this marker, possibly after a short junk prefix.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// How far into the file the marker may start. Acrobat tolerates up to 1024
/// bytes of leading garbage and so does libmagic.
const PDF_MAGIC_WINDOW: usize = 1024;

const ENCRYPT_KEY: &[u8] = b"/Encrypt";

/// Sniffed content type of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffedType {
    Pdf,
    Other,
}

impl SniffedType {
    pub fn mime(self) -> &'static str {
        match self {
            SniffedType::Pdf => "application/pdf",
            SniffedType::Other => "application/octet-stream",
        }
    }
}

pub fn sniff(bytes: &[u8]) -> SniffedType {
    let window = &bytes[..bytes.len().min(PDF_MAGIC_WINDOW + PDF_MAGIC.len())];
    if find(window, PDF_MAGIC).is_some_and(|pos| pos <= PDF_MAGIC_WINDOW) {
        SniffedType::Pdf
    } else {
        SniffedType::Other
    }
}

/// True when the document declares an encryption dictionary in a trailer.
pub fn declares_encryption(bytes: &[u8]) -> bool {
    find(bytes, ENCRYPT_KEY).is_some()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
