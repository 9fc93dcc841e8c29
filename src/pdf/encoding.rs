/*!
 * WinAnsiEncoding for the built-in PDF fonts.
 *
 * The standard 14 fonts only cover the Windows-1252 repertoire. Text is
 * encoded one byte per character; anything else becomes a placeholder.
 */

/// Characters in 0x80..=0x9F, where WinAnsi departs from Latin-1
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

/// WinAnsi byte for a printable character, if the built-in fonts have it
pub fn encode_char(c: char) -> Option<u8> {
    match c {
        ' '..='~' => Some(c as u8),
        '\u{A0}'..='\u{FF}' => Some(c as u32 as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(candidate, _)| *candidate == c)
            .map(|(_, byte)| *byte),
    }
}

/// A line of text encoded for a content stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedText {
    pub bytes: Vec<u8>,
    /// Characters that were swapped for the placeholder
    pub replaced: usize,
}

/// Encode `text`, substituting `placeholder` for characters the font lacks
///
/// Control characters are treated as unsupported. `placeholder` itself must
/// be encodable; `?` is used otherwise.
pub fn encode_text(text: &str, placeholder: char) -> EncodedText {
    let fallback = encode_char(placeholder).unwrap_or(b'?');
    let mut bytes = Vec::with_capacity(text.len());
    let mut replaced = 0;

    for c in text.chars() {
        match encode_char(c) {
            Some(byte) => bytes.push(byte),
            None => {
                bytes.push(fallback);
                replaced += 1;
            }
        }
    }

    EncodedText { bytes, replaced }
}
