//! Bytewords text encoding.
//!
//! Maps bytes to a fixed table of 256 four-letter English words chosen so
//! that every word is uniquely identified by its first and last letters.
//! The minimal style exploits that: two characters per byte, which is what
//! goes inside `ur:` URIs. Every encoding carries a trailing big-endian
//! CRC-32 of the payload, so a corrupted frame is caught at this layer
//! before any header parsing happens.

use thiserror::Error;
use ur_fountain::crc32;

/// The 256-word table, alphabetically sorted.
///
/// Interop-critical: every implementation of the transport shares this exact
/// table, and the (first letter, last letter) pairs are unique across it.
const WORDS: [&str; 256] = [
    "able", "acid", "also", "apex", "aqua", "arch", "atom", "aunt", "away",
    "axis", "back", "bald", "barn", "belt", "beta", "bias", "blue", "body",
    "brag", "brew", "bulb", "buzz", "calm", "cash", "cats", "chef", "city",
    "claw", "code", "cola", "cook", "cost", "crux", "curl", "cusp", "cyan",
    "dark", "data", "days", "deli", "dice", "diet", "door", "down", "draw",
    "drop", "drum", "dull", "duty", "each", "easy", "echo", "edge", "epic",
    "even", "exam", "exit", "eyes", "fact", "fair", "fern", "figs", "film",
    "fish", "fizz", "flap", "flew", "flux", "foxy", "free", "frog", "fuel",
    "fund", "gala", "game", "gear", "gems", "gift", "girl", "glow", "good",
    "gray", "grim", "guru", "gush", "gyro", "half", "hang", "hard", "hawk",
    "heat", "help", "high", "hill", "holy", "hope", "horn", "huts", "iced",
    "idea", "idle", "inch", "inky", "into", "iris", "iron", "item", "jade",
    "jazz", "join", "jolt", "jowl", "judo", "jugs", "jump", "junk", "jury",
    "keep", "keno", "kept", "keys", "kick", "kiln", "king", "kite", "kiwi",
    "knob", "lamb", "lava", "lazy", "leaf", "legs", "liar", "limp", "lion",
    "list", "logo", "loud", "love", "luau", "luck", "lung", "main", "many",
    "math", "maze", "memo", "menu", "meow", "mild", "mint", "miss", "monk",
    "nail", "navy", "need", "news", "next", "noon", "note", "numb", "obey",
    "oboe", "omit", "onyx", "open", "oval", "owls", "paid", "part", "peck",
    "play", "plus", "poem", "pool", "pose", "puff", "puma", "purr", "quad",
    "quiz", "race", "ramp", "real", "redo", "rich", "road", "rock", "roof",
    "ruby", "ruin", "runs", "rust", "safe", "saga", "scar", "sets", "silk",
    "skew", "slot", "soap", "solo", "song", "stub", "surf", "swan", "taco",
    "task", "taxi", "tent", "tied", "time", "tiny", "toil", "tomb", "toys",
    "trip", "tuna", "twin", "ugly", "undo", "unit", "urge", "user", "vast",
    "very", "veto", "vial", "vibe", "view", "visa", "void", "vows", "wall",
    "wand", "warm", "wasp", "wave", "waxy", "webs", "what", "when", "whiz",
    "wolf", "work", "yank", "yawn", "yell", "yoga", "yurt", "zaps", "zero",
    "zest", "zinc", "zone", "zoom",
];

/// Textual rendering style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    /// Full words separated by spaces.
    Standard,
    /// Full words separated by hyphens.
    Uri,
    /// First and last letter of each word, no separator. Used inside `ur:`
    /// URIs where density matters.
    Minimal,
}

/// Bytewords decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BytewordsError {
    /// A token is not in the word table.
    #[error("unrecognized byteword {word:?}")]
    InvalidWord {
        /// The offending token as it appeared in the input.
        word: String,
    },

    /// Minimal-style input with an odd number of characters.
    #[error("minimal bytewords input has odd length")]
    OddLength,

    /// The trailing CRC-32 does not match the payload.
    #[error("bytewords checksum mismatch: expected {expected:#010x}, got {got:#010x}")]
    ChecksumMismatch {
        /// Checksum carried by the trailing four bytes.
        expected: u32,
        /// Checksum of the decoded payload.
        got: u32,
    },

    /// Too few bytes to hold a payload and its checksum.
    #[error("bytewords input too short")]
    TooShort,
}

/// Encode `data` with a trailing CRC-32, in the given style.
#[must_use]
pub fn encode(data: &[u8], style: Style) -> String {
    let mut full = Vec::with_capacity(data.len() + 4);
    full.extend_from_slice(data);
    full.extend_from_slice(&crc32(data).to_be_bytes());

    match style {
        Style::Standard => join_words(&full, " "),
        Style::Uri => join_words(&full, "-"),
        Style::Minimal => {
            let mut out = String::with_capacity(full.len() * 2);
            for &byte in &full {
                let word = WORDS[byte as usize].as_bytes();
                out.push(word[0] as char);
                out.push(word[3] as char);
            }
            out
        }
    }
}

/// Decode `text` in the given style, verifying and stripping the checksum.
///
/// # Errors
///
/// Returns `BytewordsError::InvalidWord` for unknown tokens or letter pairs,
/// `OddLength` for truncated minimal input, `TooShort` when fewer than five
/// bytes decode, and `ChecksumMismatch` when the trailing CRC-32 disagrees
/// with the payload.
pub fn decode(text: &str, style: Style) -> Result<Vec<u8>, BytewordsError> {
    let full = match style {
        Style::Standard => split_words(text, ' ')?,
        Style::Uri => split_words(text, '-')?,
        Style::Minimal => decode_minimal(text)?,
    };
    // Four checksum bytes plus at least one payload byte.
    if full.len() < 5 {
        return Err(BytewordsError::TooShort);
    }

    let (payload, suffix) = full.split_at(full.len() - 4);
    let mut expected_bytes = [0u8; 4];
    expected_bytes.copy_from_slice(suffix);
    let expected = u32::from_be_bytes(expected_bytes);
    let got = crc32(payload);
    if expected != got {
        return Err(BytewordsError::ChecksumMismatch { expected, got });
    }
    Ok(payload.to_vec())
}

fn join_words(bytes: &[u8], separator: &str) -> String {
    let words: Vec<&str> = bytes.iter().map(|&b| WORDS[b as usize]).collect();
    words.join(separator)
}

fn split_words(text: &str, separator: char) -> Result<Vec<u8>, BytewordsError> {
    text.split(separator)
        .map(|word| {
            // The table is sorted, so full words resolve by binary search.
            WORDS
                .binary_search(&word)
                .map(|index| index as u8)
                .map_err(|_| BytewordsError::InvalidWord {
                    word: word.to_string(),
                })
        })
        .collect()
}

fn decode_minimal(text: &str) -> Result<Vec<u8>, BytewordsError> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() % 2 != 0 {
        return Err(BytewordsError::OddLength);
    }

    let table = minimal_table();
    chars
        .chunks(2)
        .map(|pair| {
            let index = pair_index(pair[0], pair[1]).and_then(|i| table[i]);
            index.ok_or_else(|| BytewordsError::InvalidWord {
                word: pair.iter().collect(),
            })
        })
        .collect()
}

/// Lookup table from (first letter, last letter) to byte value.
fn minimal_table() -> [Option<u8>; 26 * 26] {
    let mut table = [None; 26 * 26];
    for (value, word) in WORDS.iter().enumerate() {
        let bytes = word.as_bytes();
        let index = (bytes[0] - b'a') as usize * 26 + (bytes[3] - b'a') as usize;
        table[index] = Some(value as u8);
    }
    table
}

fn pair_index(first: char, last: char) -> Option<usize> {
    if first.is_ascii_lowercase() && last.is_ascii_lowercase() {
        Some((first as usize - 'a' as usize) * 26 + (last as usize - 'a' as usize))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_well_formed() {
        assert!(WORDS.iter().all(|w| w.len() == 4));
        assert!(WORDS.windows(2).all(|w| w[0] < w[1]));

        // First+last letter pairs are unique across the table.
        let mut pairs = std::collections::HashSet::new();
        for word in WORDS {
            let b = word.as_bytes();
            assert!(pairs.insert((b[0], b[3])), "duplicate pair in {word}");
        }
    }

    #[test]
    fn reference_vector_all_styles() {
        let data = [0x00, 0x01, 0x02, 0x80, 0xFF];
        assert_eq!(
            encode(&data, Style::Standard),
            "able acid also lava zoom jade need echo taxi"
        );
        assert_eq!(
            encode(&data, Style::Uri),
            "able-acid-also-lava-zoom-jade-need-echo-taxi"
        );
        assert_eq!(encode(&data, Style::Minimal), "aeadaolazmjendeoti");
    }

    #[test]
    fn roundtrip_all_styles() {
        let data: Vec<u8> = (0..=255).collect();
        for style in [Style::Standard, Style::Uri, Style::Minimal] {
            let text = encode(&data, style);
            assert_eq!(decode(&text, style).unwrap(), data);
        }
    }

    #[test]
    fn corrupted_word_is_rejected() {
        // No word ends in 'q', so clobbering the final letter always
        // produces an unknown token.
        let mut corrupted = encode(b"Wolf", Style::Standard);
        corrupted.pop();
        corrupted.push('q');
        assert!(matches!(
            decode(&corrupted, Style::Standard),
            Err(BytewordsError::InvalidWord { .. })
        ));
    }

    #[test]
    fn swapped_words_fail_checksum() {
        // "able acid ..." with the first two payload words swapped decodes to
        // different bytes, which the trailing CRC must catch.
        let text = encode(&[0x00, 0x01, 0x02, 0x80, 0xFF], Style::Standard);
        let swapped = text.replacen("able acid", "acid able", 1);
        assert!(matches!(
            decode(&swapped, Style::Standard),
            Err(BytewordsError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn minimal_odd_length_is_rejected() {
        assert_eq!(
            decode("aeadao", Style::Minimal),
            Err(BytewordsError::TooShort)
        );
        assert_eq!(
            decode("aeada", Style::Minimal),
            Err(BytewordsError::OddLength)
        );
    }

    #[test]
    fn minimal_unknown_pair_is_rejected() {
        // "qq" matches no word's first+last letters.
        let text = encode(b"Wolf", Style::Minimal);
        let corrupted = format!("qq{}", &text[2..]);
        assert!(matches!(
            decode(&corrupted, Style::Minimal),
            Err(BytewordsError::InvalidWord { .. })
        ));
    }

    #[test]
    fn too_short_input_is_rejected() {
        // Four words decode to exactly the checksum width with no payload.
        assert_eq!(
            decode("able able able able", Style::Standard),
            Err(BytewordsError::TooShort)
        );
    }

    #[test]
    fn uppercase_is_not_silently_accepted() {
        let text = encode(b"Wolf", Style::Minimal).to_uppercase();
        assert!(decode(&text, Style::Minimal).is_err());
    }
}
