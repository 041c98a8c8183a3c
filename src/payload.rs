//! # Printer Payload Assembly
//!
//! Builds the byte stream sent to the printer gateway. The stream is an
//! ESC/POS-style initialize command followed by a UTF-8 text block laid out
//! as it appears on the receipt:
//!
//! ```text
//! <user prompt>
//!
//! <generated art>
//!
//! <firstName> <lastInitial>.
//! from <location>
//! <5 newline feeds>
//! ```

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// Number of trailing line feeds, pushing the job clear of the tear bar.
const FEED_LINES: usize = 5;

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state. Sent at the start of
/// every job so leftover formatting from a previous job can't bleed in.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ## Example
///
/// ```
/// use dada_relay::payload;
///
/// assert_eq!(payload::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// One print job's worth of receipt content.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub first_name: String,
    pub last_initial: String,
    pub location: String,
    pub prompt: String,
    pub art: String,
}

impl PrintJob {
    /// Assemble the full printer byte stream: init command + text block.
    pub fn assemble(&self) -> Vec<u8> {
        let name_line = format!("{} {}.", self.first_name, self.last_initial);
        let location_line = format!("from {}", self.location);
        let feed_block = "\n".repeat(FEED_LINES);

        let text = format!(
            "{}\n\n{}\n\n{}\n{}{}",
            self.prompt, self.art, name_line, location_line, feed_block
        );

        let mut data = init();
        data.extend_from_slice(text.as_bytes());
        data
    }
}
