mod clock;

pub use clock::{Clock, SystemClock};

#[cfg(test)]
pub use clock::ManualClock;

pub fn seconds_to_human_readable(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    match (hours, minutes) {
        (0, 0) => format!("{}s", seconds),
        (0, _) => format!("{}m {}s", minutes, seconds),
        _ => format!("{}h {}m", hours, minutes),
    }
}

/// Cuts `text` into pieces of at most `max_chars` characters, preferring line breaks.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len + line_len > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= max_chars {
            current.push_str(line);
            current_len += line_len;
            continue;
        }

        // A single line longer than a message is split on character boundaries.
        for c in line.chars() {
            if current_len == max_chars {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(c);
            current_len += 1;
        }
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_human_readable() {
        assert_eq!(seconds_to_human_readable(3), "3s");
        assert_eq!(seconds_to_human_readable(75), "1m 15s");
        assert_eq!(seconds_to_human_readable(3 * 3600 + 120), "3h 2m");
    }

    #[test]
    fn test_split_text_short() {
        assert_eq!(split_text("salom", 10), vec!["salom".to_string()]);
        assert_eq!(split_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_split_text_on_lines() {
        let chunks = split_text("abc\ndef\nghi", 8);
        assert_eq!(chunks, vec!["abc\ndef\n".to_string(), "ghi".to_string()]);
    }

    #[test]
    fn test_split_text_long_line() {
        let text = "ў".repeat(10);
        let chunks = split_text(&text, 4);

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 4));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_text_keeps_every_character() {
        let text = format!("{}\n{}\nend", "a".repeat(5000), "b".repeat(3000));
        let chunks = split_text(&text, 4096);

        assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 4096));
        assert_eq!(chunks.concat(), text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "a".repeat(4096));
    }
}
