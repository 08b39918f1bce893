use std::num::NonZeroUsize;

/// Packs whole lines into chunks of at most `max_chunk_size` chars.
///
/// Every line gets a trailing `\n`, the last one included. A line that does
/// not fit into an empty chunk is cut into raw `max_chunk_size` slices
/// (without newline) and its remainder opens the next chunk. A line that
/// does not fit after a non-empty chunk moves to a new chunk as is, even
/// when it is longer than the limit itself.
pub fn split_message_into_chunks(text: &str, max_chunk_size: NonZeroUsize) -> Vec<String> {
    let max_chunk_size = max_chunk_size.get();

    if text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        if current_len + line_len + 1 <= max_chunk_size {
            current.push_str(line);
            current.push('\n');
            current_len += line_len + 1;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current.push_str(line);
            current.push('\n');
            current_len = line_len + 1;
            continue;
        }

        let mut rest = line;
        let mut rest_len = line_len;
        while rest_len > max_chunk_size {
            let cut = rest
                .char_indices()
                .nth(max_chunk_size)
                .map_or(rest.len(), |(idx, _)| idx);
            chunks.push(rest[..cut].to_string());
            rest = &rest[cut..];
            rest_len -= max_chunk_size;
        }

        current.push_str(rest);
        current.push('\n');
        current_len = rest_len + 1;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
