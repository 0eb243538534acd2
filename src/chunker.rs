//! Turns raw comments and posts into bounded, overlapping text chunks so
//! prompts stay within model limits without losing local context.

/// Maximum chunk length in characters.
pub const CHUNK_SIZE: usize = 1000;

/// Characters shared between consecutive chunks of the same item.
pub const CHUNK_OVERLAP: usize = 100;

/// Split preference, coarsest boundary first. Anything still too long
/// after the last separator is hard-split on character positions.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Comment,
    Post,
}

/// A bounded-length piece of one comment or post, tagged with its origin.
#[derive(Debug, Clone)]
pub struct TextChunk {
    pub content: String,
    pub source: Source,
    pub index: usize,
}

/// Convert raw comments and posts into ordered chunks. Comments come
/// first, then posts; chunks from one item keep their relative order.
pub fn prepare_documents(comments: &[String], posts: &[String]) -> Vec<TextChunk> {
    let mut chunks = Vec::new();

    for (index, comment) in comments.iter().enumerate() {
        for content in split_text(comment, CHUNK_SIZE, CHUNK_OVERLAP) {
            chunks.push(TextChunk {
                content,
                source: Source::Comment,
                index,
            });
        }
    }

    for (index, post) in posts.iter().enumerate() {
        for content in split_text(post, CHUNK_SIZE, CHUNK_OVERLAP) {
            chunks.push(TextChunk {
                content,
                source: Source::Post,
                index,
            });
        }
    }

    chunks
}

/// Split `text` into chunks of at most `chunk_size` characters, breaking
/// on the coarsest separator available and carrying roughly `overlap`
/// characters between neighbors. Empty input yields no chunks.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if char_len(text) <= chunk_size {
        return vec![text.to_string()];
    }
    recursive_split(text, chunk_size, overlap, SEPARATORS)
}

fn recursive_split(text: &str, chunk_size: usize, overlap: usize, seps: &[&str]) -> Vec<String> {
    let Some((sep, rest)) = seps.split_first() else {
        return hard_split(text, chunk_size, overlap);
    };
    if !text.contains(sep) {
        return recursive_split(text, chunk_size, overlap, rest);
    }

    // Pieces keep their trailing separator so joining them reproduces the
    // source text exactly.
    let mut pieces = Vec::new();
    for piece in text.split_inclusive(sep) {
        if char_len(piece) > chunk_size {
            pieces.extend(recursive_split(piece, chunk_size, overlap, rest));
        } else {
            pieces.push(piece.to_string());
        }
    }

    merge_pieces(pieces, chunk_size, overlap)
}

/// Greedily pack pieces into chunks up to `chunk_size`, seeding each new
/// chunk with up to `overlap` trailing characters of the previous one.
fn merge_pieces(pieces: Vec<String>, chunk_size: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut window: Vec<String> = Vec::new();
    let mut window_len = 0usize;

    for piece in pieces {
        let piece_len = char_len(&piece);
        if !window.is_empty() && window_len + piece_len > chunk_size {
            chunks.push(window.concat());
            while !window.is_empty() && (window_len > overlap || window_len + piece_len > chunk_size)
            {
                window_len -= char_len(&window[0]);
                window.remove(0);
            }
        }
        window_len += piece_len;
        window.push(piece);
    }

    if !window.is_empty() {
        let tail = window.concat();
        if !tail.trim().is_empty() {
            chunks.push(tail);
        }
    }

    chunks
}

fn hard_split(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut out = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        out.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    out
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_inputs_yield_no_chunks() {
        assert!(prepare_documents(&[], &[]).is_empty());
        assert!(split_text("", CHUNK_SIZE, CHUNK_OVERLAP).is_empty());
        assert!(split_text("   \n ", CHUNK_SIZE, CHUNK_OVERLAP).is_empty());
    }

    #[test]
    fn short_comment_becomes_one_chunk() {
        let comments = vec!["I love hiking and camping".to_string()];
        let chunks = prepare_documents(&comments, &[]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "I love hiking and camping");
        assert_eq!(chunks[0].source, Source::Comment);
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn indices_track_the_source_list() {
        let comments = vec!["".to_string(), "second".to_string()];
        let posts = vec!["a post\nbody".to_string()];
        let chunks = prepare_documents(&comments, &posts);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].source, Source::Comment);
        assert_eq!(chunks[0].index, 1);
        assert_eq!(chunks[1].source, Source::Post);
        assert_eq!(chunks[1].index, 0);
    }

    #[test]
    fn no_chunk_exceeds_the_maximum_length() {
        let sentence = "The quick brown fox jumps over the lazy dog. ";
        let text = sentence.repeat(80);
        for chunk in split_text(&text, CHUNK_SIZE, CHUNK_OVERLAP) {
            assert!(chunk.chars().count() <= CHUNK_SIZE);
        }
    }

    #[test]
    fn paragraph_boundaries_are_preferred() {
        let paragraph = "word ".repeat(80).trim_end().to_string();
        let text = format!("{paragraph}\n\n{paragraph}\n\n{paragraph}");
        let chunks = split_text(&text, CHUNK_SIZE, CHUNK_OVERLAP);
        assert!(chunks.len() > 1);
        assert!(chunks[0].ends_with("\n\n"));
    }

    #[test]
    fn consecutive_chunks_share_an_overlap() {
        let text: String = (0..600)
            .map(|i| format!("w{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = split_text(&text, 100, 20);
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            assert!(shared_overlap(&pair[0], &pair[1]) > 0);
        }
    }

    #[test]
    fn stripping_overlaps_reconstructs_the_original_text() {
        let text: String = (0..600)
            .map(|i| format!("w{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = split_text(&text, 100, 20);
        assert!(chunks.len() > 1);

        let mut rebuilt = chunks[0].clone();
        for pair in chunks.windows(2) {
            let k = shared_overlap(&pair[0], &pair[1]);
            rebuilt.push_str(&pair[1][k..]);
        }
        assert_eq!(rebuilt, text);
    }

    /// Longest suffix of `prev` that `next` starts with, in bytes. The
    /// test inputs use unique words, so this recovers the seeded overlap
    /// exactly.
    fn shared_overlap(prev: &str, next: &str) -> usize {
        (1..=prev.len().min(next.len()))
            .rev()
            .find(|&k| next.is_char_boundary(k) && prev.ends_with(&next[..k]))
            .unwrap_or(0)
    }
}
