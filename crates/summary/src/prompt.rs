use chrono::{DateTime, Local, Utc};

use tgdigest_core::Message;

/// Instruction wrapped around the transcript. `{history}` marks the slot.
pub const SUMMARY_TEMPLATE: &str =
    "Based on a given chat history, write a story that summarizes the chat.\nChat history:\n{history}";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `(2024-03-01 09:00:05) Alice: `text``, with the time on the local clock.
pub fn transcript_line(message: &Message) -> String {
    format!(
        "({}) {}: `{}`",
        format_timestamp(message.timestamp),
        message.sender,
        message.text
    )
}

/// Render the summary prompt for `messages`, given oldest-first.
pub fn build_prompt(messages: &[Message]) -> String {
    let history = messages
        .iter()
        .map(transcript_line)
        .collect::<Vec<_>>()
        .join("\n");
    SUMMARY_TEMPLATE.replace("{history}", &history)
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}
