//! Sentence splitting for speech output.
//!
//! Utterances end at `。`, `！`, `？` or a newline. The terminator stays
//! with its sentence; surrounding whitespace is trimmed and empty pieces
//! are dropped.

const TERMINATORS: [char; 3] = ['。', '！', '？'];

pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c != '\n' {
            current.push(c);
        }
        if c == '\n' || TERMINATORS.contains(&c) {
            flush(&mut current, &mut sentences);
        }
    }
    flush(&mut current, &mut sentences);

    sentences
}

fn flush(current: &mut String, sentences: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}
