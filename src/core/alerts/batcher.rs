// Splits message lines into payloads that fit a length limit.

/// Discord's embed description limit.
pub const DISCORD_DESCRIPTION_LIMIT: usize = 4096;

const SEPARATOR: &str = "\n\n";

/// Greedily pack `lines` into batches of at most `max_length` characters.
///
/// Each line is followed by a blank line. A batch is closed before a line
/// that would push it over the limit, so lines are never split. A single
/// line longer than the limit still gets its own batch.
pub fn batch(lines: &[String], max_length: usize) -> Vec<String> {
    let mut batches = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in lines {
        let line_len = line.chars().count();
        if current_len + line_len > max_length && !current.is_empty() {
            batches.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(line);
        current.push_str(SEPARATOR);
        current_len += line_len + SEPARATOR.len();
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}
