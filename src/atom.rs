//! Character-atom tokenization.
//!
//! Splits raw bytes into the minimal units the segmenter operates on:
//! maximal runs of Latin letters (lowercased in ASCII range), maximal runs
//! of decimal digits, and every other Unicode scalar as its own atom.
//! Scalars whose UTF-8 encoding is three bytes or longer (CJK ideographs,
//! kana, Hangul) are therefore always split per character, while Latin and
//! Cyrillic words stay grouped.
//!
//! # Examples
//!
//! ```
//! use ginkgo::atom::split_text_to_atoms;
//!
//! let atoms = split_text_to_atoms("GitHub 中国".as_bytes());
//! let texts: Vec<_> = atoms
//!     .iter()
//!     .map(|a| String::from_utf8_lossy(a).into_owned())
//!     .collect();
//! assert_eq!(texts, ["github", "中", "国"]);
//! ```

/// A minimal unit of segmentation: a single non-letter/non-digit scalar, a
/// run of Latin letters, or a run of decimal digits.
///
/// Atoms are raw byte vectors rather than strings because the tokenizer is
/// total over arbitrary input, including invalid UTF-8.
pub type Atom = Vec<u8>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum AtomKind {
    Alpha,
    Number,
    Other,
}

/// Split text into atoms.
///
/// Whitespace between runs is discarded. Malformed UTF-8 bytes are consumed
/// one at a time and treated like punctuation; this function never fails.
pub fn split_text_to_atoms(text: &[u8]) -> Vec<Atom> {
    let mut output = Vec::with_capacity(text.len() / 3);
    let mut current = 0;
    let mut pre_kind = AtomKind::Alpha;
    let mut pre_start = 0;

    while current < text.len() {
        let (scalar, size) = decode_scalar(&text[current..]);

        let cur_kind = match scalar {
            // Only scalars encoded in at most two bytes may form runs, which
            // keeps CJK scripts split per character.
            Some(c) if size <= 2 && c.is_alphabetic() => AtomKind::Alpha,
            Some(c) if size <= 2 && c.is_numeric() => AtomKind::Number,
            _ => AtomKind::Other,
        };

        if cur_kind != pre_kind || cur_kind == AtomKind::Other {
            if current != 0 {
                push_atom(&mut output, &text[pre_start..current], pre_kind);
            }
            pre_kind = cur_kind;
            pre_start = current;
        }

        current += size;
    }

    if current != 0 {
        push_atom(&mut output, &text[pre_start..current], pre_kind);
    }

    output
}

fn push_atom(output: &mut Vec<Atom>, bytes: &[u8], kind: AtomKind) {
    let mut atom = bytes.to_vec();
    if kind == AtomKind::Alpha {
        // ASCII-only: non-ASCII Latin letters keep their case.
        atom.make_ascii_lowercase();
    }
    if atom.as_slice() != b" " {
        output.push(atom);
    }
}

/// Decode the first Unicode scalar of `bytes`.
///
/// Returns the scalar and the number of bytes it occupies, or `(None, 1)`
/// when the leading byte does not start a valid UTF-8 sequence.
pub(crate) fn decode_scalar(bytes: &[u8]) -> (Option<char>, usize) {
    let width = match bytes[0] {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return (None, 1),
    };
    if bytes.len() < width {
        return (None, 1);
    }
    match std::str::from_utf8(&bytes[..width]) {
        Ok(s) => (s.chars().next(), width),
        Err(_) => (None, 1),
    }
}

/// Total byte length of a sequence of atoms.
pub(crate) fn atoms_byte_len(atoms: &[Atom]) -> usize {
    atoms.iter().map(Vec::len).sum()
}

/// Concatenate a sequence of atoms into one byte vector.
pub(crate) fn atoms_to_bytes(atoms: &[Atom]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(atoms_byte_len(atoms));
    for atom in atoms {
        bytes.extend_from_slice(atom);
    }
    bytes
}
