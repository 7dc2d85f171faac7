//! Result rendering and expansion.
//!
//! Plain renderings (`"text/pos "` pairs or a list of texts) plus the
//! spread operation that blows a result up into every sub-segment and
//! synonym variant for indexing.

use crate::atom::{self, Atom};
use crate::token::{Segment, TokenRef};

/// Render segments as `"text/pos "` pairs.
///
/// With `expand` set, each token is rendered through its sub-segments
/// first, depth-first, so a compound like `中华人民共和国` prints every
/// nested split before itself.
pub fn segments_to_string(segments: &[Segment<'_>], expand: bool) -> String {
    let mut output = String::new();
    for segment in segments {
        if expand {
            token_to_string(&mut output, segment.token());
        } else {
            push_token(&mut output, segment.token());
        }
    }
    output
}

fn token_to_string(output: &mut String, token: &TokenRef<'_>) {
    for sub in token.segments() {
        token_to_string(output, sub.token());
    }
    push_token(output, token);
}

fn push_token(output: &mut String, token: &TokenRef<'_>) {
    output.push_str(&token.text());
    output.push('/');
    output.push_str(token.pos());
    output.push(' ');
}

/// Render segments as a list of token texts, optionally expanded through
/// sub-segments like [`segments_to_string`].
pub fn segments_to_slice(segments: &[Segment<'_>], expand: bool) -> Vec<String> {
    let mut output = Vec::new();
    for segment in segments {
        if expand {
            token_to_slice(&mut output, segment.token());
        } else {
            output.push(segment.token().text());
        }
    }
    output
}

fn token_to_slice(output: &mut Vec<String>, token: &TokenRef<'_>) {
    for sub in token.segments() {
        token_to_slice(output, sub.token());
    }
    output.push(token.text());
}

/// Join atoms into a string, inserting a single ASCII space after an atom
/// that leads with a Latin letter or digit (so English words stay
/// readable), except at the end.
pub fn join(atoms: &[Atom]) -> String {
    let mut output = String::new();
    for (i, atom) in atoms.iter().enumerate() {
        output.push_str(&String::from_utf8_lossy(atom));

        if i != atoms.len() - 1 {
            let (scalar, size) = atom::decode_scalar(atom);
            if size <= 2 && scalar.is_some_and(|c| c.is_alphabetic() || c.is_numeric()) {
                output.push(' ');
            }
        }
    }
    output
}

/// Spread segments into everything an index would want: for each segment,
/// recursively spread its token's sub-segments, then emit one segment per
/// synonym (sharing the original's span), then the segment itself.
///
/// Sub-segment spans are relative to their parent token's text, and the
/// output may repeat tokens; this is by construction a superset of the
/// input sequence.
pub fn segments_spread<'a>(segments: &[Segment<'a>]) -> Vec<Segment<'a>> {
    let mut output = Vec::new();
    for segment in segments {
        let sub = segment.token().segments();
        output.extend(segments_spread(&sub));

        for synonym in segment.token().synonyms() {
            output.push(Segment::new(segment.start(), segment.end(), synonym));
        }

        output.push(segment.clone());
    }
    output
}
