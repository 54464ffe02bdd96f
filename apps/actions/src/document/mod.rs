// Resume document intake: content sniffing, size limits and PDF text extraction.
// Every rejection carries the literal chat message shown to the user.

pub mod extract;
pub mod sniff;

pub use extract::{extract_resume_text, validate_resume_bytes, UploadError, MAX_RESUME_BYTES};
