//! Prompt for transcribing homework photos with a vision model.

/// The instruction sent alongside an image to a vision-capable model.
pub const OCR_TRANSCRIPTION_PROMPT: &str = r#"You are an OCR engine. Transcribe all text visible in the image exactly as written.

Rules:
- Preserve line breaks and the order of the text
- Write mathematical expressions in plain text (for example: 2x + 5 = 15)
- Do not solve, explain, summarize, or translate anything
- Output only the transcribed text, with no introduction or labels
- If there is no readable text, output nothing"#;
