//! Token and segment types.
//!
//! A [`Token`] is the dictionary-level unit: one or more atoms with a
//! frequency, a part-of-speech tag, a derived path weight, plus links to a
//! finer sub-segmentation and to synonymous peers. Tokens live in an arena
//! owned by the dictionary and reference each other by index, which keeps
//! the (cyclic) synonym and sub-segment graphs representable.
//!
//! A [`Segment`] is the query-level unit: a byte span of the input plus a
//! [`TokenRef`] view resolving the covering token against the dictionary.

use std::fmt;

use crate::atom::{self, Atom};
use crate::dictionary::Dictionary;
use crate::output;

/// Index of a token in the dictionary arena.
pub(crate) type TokenId = u32;

/// The part-of-speech tag that marks stop-words.
///
/// Stop-word tokens participate in path search like any other token, but
/// segments carrying them are dropped from results.
pub const STOP_POS: &str = "__STOP__";

/// POS assigned to fallback tokens covering atoms the dictionary misses.
pub(crate) const UNKNOWN_POS: &str = "x";

/// Path weight of a fallback token. High enough that any dictionary route
/// is preferred when one exists.
pub(crate) const FALLBACK_DISTANCE: f32 = 32.0;

/// A dictionary token.
#[derive(Debug, Clone)]
pub(crate) struct Token {
    /// The token's canonical form as a non-empty atom sequence.
    pub(crate) text: Vec<Atom>,
    /// Occurrence count from the source file.
    pub(crate) frequency: u64,
    /// Part-of-speech tag; may be empty or [`STOP_POS`].
    pub(crate) pos: String,
    /// Derived path weight: `log2(total_frequency) - log2(frequency)`.
    pub(crate) distance: f32,
    /// Search-mode re-segmentation of `text`; empty for single-atom tokens.
    /// Offsets are relative to the token's own text.
    pub(crate) segments: Vec<SubSegment>,
    /// Semantically interchangeable peer tokens.
    pub(crate) synonyms: Vec<TokenId>,
}

impl Token {
    pub(crate) fn new(text: Vec<Atom>, frequency: u64, pos: &str) -> Self {
        Token {
            text,
            frequency,
            pos: pos.to_string(),
            distance: 0.0,
            segments: Vec::new(),
            synonyms: Vec::new(),
        }
    }

    /// A synthetic single-atom token for input the dictionary misses.
    pub(crate) fn fallback(atom: Atom) -> Self {
        Token {
            text: vec![atom],
            frequency: 1,
            pos: UNKNOWN_POS.to_string(),
            distance: FALLBACK_DISTANCE,
            segments: Vec::new(),
            synonyms: Vec::new(),
        }
    }
}

/// A finer segment of a token's own text, stored at dictionary load time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SubSegment {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) token: TokenId,
}

#[derive(Clone)]
enum TokenSource {
    /// A token held in the dictionary arena.
    Entry(TokenId),
    /// A per-query fallback covering a single atom; never stored.
    Unknown(Atom),
}

/// A borrowed view of the token behind a segment.
///
/// The view resolves arena indices against the dictionary it was produced
/// from, so synonym and sub-segment links can be followed without exposing
/// the arena itself.
#[derive(Clone)]
pub struct TokenRef<'a> {
    dict: &'a Dictionary,
    source: TokenSource,
}

impl<'a> TokenRef<'a> {
    pub(crate) fn entry(dict: &'a Dictionary, id: TokenId) -> Self {
        TokenRef {
            dict,
            source: TokenSource::Entry(id),
        }
    }

    pub(crate) fn unknown(dict: &'a Dictionary, atom: Atom) -> Self {
        TokenRef {
            dict,
            source: TokenSource::Unknown(atom),
        }
    }

    /// The token's atoms.
    pub(crate) fn atoms(&self) -> &[Atom] {
        match &self.source {
            TokenSource::Entry(id) => &self.dict.token(*id).text,
            TokenSource::Unknown(atom) => std::slice::from_ref(atom),
        }
    }

    /// The token rendered as a human-readable string, with a single space
    /// between adjacent Latin/numeric atoms.
    pub fn text(&self) -> String {
        output::join(self.atoms())
    }

    /// The part-of-speech tag. `"x"` for fallback tokens.
    pub fn pos(&self) -> &str {
        match &self.source {
            TokenSource::Entry(id) => &self.dict.token(*id).pos,
            TokenSource::Unknown(_) => UNKNOWN_POS,
        }
    }

    /// Occurrence count from the dictionary. `1` for fallback tokens.
    pub fn frequency(&self) -> u64 {
        match &self.source {
            TokenSource::Entry(id) => self.dict.token(*id).frequency,
            TokenSource::Unknown(_) => 1,
        }
    }

    /// Total byte length of the token's text.
    pub fn byte_len(&self) -> usize {
        atom::atoms_byte_len(self.atoms())
    }

    /// The token's synonymous peers.
    pub fn synonyms(&self) -> Vec<TokenRef<'a>> {
        match &self.source {
            TokenSource::Entry(id) => self
                .dict
                .token(*id)
                .synonyms
                .iter()
                .map(|&peer| TokenRef::entry(self.dict, peer))
                .collect(),
            TokenSource::Unknown(_) => Vec::new(),
        }
    }

    /// The peers' texts joined with single spaces; empty when the token has
    /// no synonyms.
    pub fn synonyms_text(&self) -> String {
        self.synonyms()
            .iter()
            .map(|peer| peer.text())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The token's search-mode sub-segmentation, with offsets relative to
    /// the token's own text. Empty for single-atom and fallback tokens.
    pub fn segments(&self) -> Vec<Segment<'a>> {
        match &self.source {
            TokenSource::Entry(id) => self
                .dict
                .token(*id)
                .segments
                .iter()
                .map(|sub| Segment::new(sub.start, sub.end, TokenRef::entry(self.dict, sub.token)))
                .collect(),
            TokenSource::Unknown(_) => Vec::new(),
        }
    }
}

impl fmt::Debug for TokenRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRef")
            .field("text", &self.text())
            .field("pos", &self.pos())
            .finish()
    }
}

/// A segmentation result: a byte span of the input and the token covering
/// it.
///
/// Spans are half-open, aligned to atom boundaries, and strictly increasing
/// across a result sequence (gaps appear only where stop-words were
/// dropped).
#[derive(Clone)]
pub struct Segment<'a> {
    start: usize,
    end: usize,
    token: TokenRef<'a>,
}

impl<'a> Segment<'a> {
    pub(crate) fn new(start: usize, end: usize, token: TokenRef<'a>) -> Self {
        Segment { start, end, token }
    }

    /// Byte offset where the segment starts.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset just past the segment's end.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The token covering this span.
    pub fn token(&self) -> &TokenRef<'a> {
        &self.token
    }
}

impl fmt::Debug for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("token", &self.token)
            .finish()
    }
}
