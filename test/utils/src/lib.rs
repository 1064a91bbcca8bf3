use ratatui::text::Line;

/// Wire form of a multiple choice question, as served by `GET /get-question`.
pub fn question_json() -> String {
    return serde_json::json!({
        "id": "appearance",
        "question": "What does the lesion look like?",
        "type": "multiple",
        "options": ["Circular", "Scaly", "Swollen"],
        "category": "Lesion Appearance",
    })
    .to_string();
}

/// Flattens rendered lines to plain text so they can be snapshotted without
/// styling noise.
pub fn lines_to_string(lines: &[Line]) -> String {
    return lines
        .iter()
        .map(|line| {
            return line
                .spans
                .iter()
                .map(|span| return span.content.as_ref())
                .collect::<String>();
        })
        .collect::<Vec<String>>()
        .join("\n");
}
