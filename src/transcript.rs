//! Parser for exported chat transcripts.
//!
//! A WhatsApp export is a flat text file where each message starts with a
//! header line and may continue over further unprefixed lines (forwarded
//! messages, quoted replies). The parser is a lazy iterator: nothing is
//! allocated for messages the caller never pulls.

use std::str::Lines;
use std::sync::LazyLock;

use regex::Regex;

/// One parsed message. Ephemeral — lives only while links are extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Calendar date exactly as written in the export (`DD/MM/YYYY`).
    pub date: String,
    /// Sender display name.
    pub sender: String,
    /// Message body; continuation lines are joined with `\n`.
    pub text: String,
}

// Header grammar: date, time, optional localized day period, dash, sender,
// colon, body. A colon inside a sender name is ambiguous with the
// name/body separator — `[^:]+` truncates the name at the first colon.
// Known grammar limitation, pinned by a test below.
static MESSAGE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{2}/\d{2}/\d{4})\s+\d{1,2}:\d{2}(?:\s+da\s+(?:manhã|tarde|noite|madrugada))?\s+-\s+([^:]+):\s*(.+)$",
    )
    .expect("message grammar regex is valid")
});

/// Parse a full transcript into a lazy sequence of [`Message`]s.
///
/// Lines preceding the first recognized header are dropped silently.
pub fn parse_messages(text: &str) -> Messages<'_> {
    Messages {
        lines: text.lines(),
        open: None,
    }
}

/// Iterator state: at most one message is open at a time; it is finalized
/// and yielded when the next header (or end of input) is seen.
pub struct Messages<'a> {
    lines: Lines<'a>,
    open: Option<Message>,
}

impl Iterator for Messages<'_> {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        for line in self.lines.by_ref() {
            if let Some(caps) = MESSAGE_START.captures(line) {
                let started = Message {
                    date: caps[1].to_string(),
                    sender: caps[2].trim().to_string(),
                    text: caps[3].to_string(),
                };
                if let Some(finished) = self.open.replace(started) {
                    return Some(finished);
                }
            } else if !line.trim().is_empty()
                && let Some(open) = self.open.as_mut()
            {
                open.text.push('\n');
                open.text.push_str(line);
            }
            // Blank lines and preamble before the first header are dropped.
        }
        self.open.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_message() {
        let messages: Vec<_> =
            parse_messages("05/08/2025 10:00 da manhã - Ana: olha isso").collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].date, "05/08/2025");
        assert_eq!(messages[0].sender, "Ana");
        assert_eq!(messages[0].text, "olha isso");
    }

    #[test]
    fn day_period_is_optional() {
        let messages: Vec<_> = parse_messages("05/08/2025 22:15 - Bruno: boa noite").collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, "Bruno");
    }

    #[test]
    fn continuation_lines_are_appended() {
        let text = "05/08/2025 10:00 da manhã - Ana: primeira linha\n\
                    segunda linha\n\
                    terceira linha";
        let messages: Vec<_> = parse_messages(text).collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].text,
            "primeira linha\nsegunda linha\nterceira linha"
        );
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = "05/08/2025 10:00 da manhã - Ana: oi\n\n\
                    06/08/2025 11:00 da tarde - Bia: tchau";
        let messages: Vec<_> = parse_messages(text).collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "oi");
    }

    #[test]
    fn preamble_is_dropped() {
        let text = "As mensagens são criptografadas de ponta a ponta.\n\
                    05/08/2025 10:00 da manhã - Ana: oi";
        let messages: Vec<_> = parse_messages(text).collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "oi");
    }

    #[test]
    fn new_header_finalizes_previous_message() {
        let text = "05/08/2025 10:00 da manhã - Ana: oi\n\
                    continuação\n\
                    05/08/2025 10:05 da manhã - Bia: olá";
        let messages: Vec<_> = parse_messages(text).collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "oi\ncontinuação");
        assert_eq!(messages[1].sender, "Bia");
    }

    #[test]
    fn single_digit_hour() {
        let messages: Vec<_> =
            parse_messages("05/08/2025 9:05 da manhã - Ana: cedo").collect();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(parse_messages("").count(), 0);
    }

    #[test]
    fn iterator_is_restartable() {
        let text = "05/08/2025 10:00 da manhã - Ana: oi";
        assert_eq!(parse_messages(text).count(), 1);
        assert_eq!(parse_messages(text).count(), 1);
    }

    // Grammar limitation: a colon inside the display name truncates the
    // name and pushes the rest into the body.
    #[test]
    fn colon_in_sender_truncates_name() {
        let messages: Vec<_> =
            parse_messages("05/08/2025 10:00 da manhã - Dr: Ana: oi").collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, "Dr");
        assert_eq!(messages[0].text, "Ana: oi");
    }
}
