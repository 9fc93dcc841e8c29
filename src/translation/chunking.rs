/*!
 * Splitting of document text into provider-sized chunks.
 *
 * Lengths are counted in chars, not bytes, so a chunk never splits a
 * multi-byte character.
 */

/// Split `text` into ordered chunks of at most `max_chars` characters
///
/// Text that already fits is returned as a single chunk, unchanged. Longer
/// text is broken at the last whitespace inside each window; the boundary
/// whitespace is dropped, leading whitespace of the next chunk is skipped and
/// trailing whitespace is trimmed. A window without whitespace is cut at the
/// hard limit.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let max_chars = max_chars.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        while start < chars.len() && chars[start].is_whitespace() {
            start += 1;
        }
        if start >= chars.len() {
            break;
        }

        if chars.len() - start <= max_chars {
            push_trimmed(&mut chunks, &chars[start..]);
            break;
        }

        // chars[window_end] exists here; whitespace right after the window
        // is a clean break too
        let window_end = start + max_chars;
        let (end, next) = match (start + 1..=window_end).rev().find(|&i| chars[i].is_whitespace()) {
            Some(boundary) => (boundary, boundary + 1),
            None => (window_end, window_end),
        };

        push_trimmed(&mut chunks, &chars[start..end]);
        start = next;
    }

    chunks
}

/// Join translated chunks back into one text
pub fn join_chunks<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ")
}

fn push_trimmed(chunks: &mut Vec<String>, slice: &[char]) {
    let chunk: String = slice.iter().collect();
    let trimmed = chunk.trim_end();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
