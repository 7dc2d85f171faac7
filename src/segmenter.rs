//! Viterbi shortest-path segmentation.
//!
//! The segmenter builds a lattice over the input's atom positions, relaxes
//! it left to right with every dictionary prefix match (token distances as
//! edge weights), and reconstructs the minimum-distance path backwards.
//! Atoms the dictionary cannot cover are bridged by synthetic single-atom
//! fallback tokens, so every input has a segmentation.
//!
//! # Examples
//!
//! ```
//! use ginkgo::Segmenter;
//!
//! # fn main() -> ginkgo::Result<()> {
//! let mut segmenter = Segmenter::new();
//! segmenter.load_dictionary("testdata/test_dict1.txt,testdata/test_dict2.txt")?;
//!
//! let segments = segmenter.segment("中国有十三亿人口".as_bytes());
//! let words: Vec<String> = segments.iter().map(|s| s.token().text()).collect();
//! assert_eq!(words, ["中国", "有", "十三亿", "人口"]);
//! # Ok(())
//! # }
//! ```

use crate::atom::{self, split_text_to_atoms, Atom};
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::loader;
use crate::output;
use crate::token::{Segment, TokenId, TokenRef, FALLBACK_DISTANCE, STOP_POS};

/// The word segmenter.
///
/// Holds the loaded dictionary. Loading mutates; segmentation only reads,
/// so a loaded segmenter may be shared freely across threads.
#[derive(Debug, Default)]
pub struct Segmenter {
    dict: Dictionary,
}

impl Segmenter {
    /// Create a segmenter with an empty dictionary.
    ///
    /// Until a dictionary is loaded, every query is served by single-atom
    /// fallback tokens with POS `"x"`.
    pub fn new() -> Self {
        Segmenter::default()
    }

    /// Load dictionary file(s).
    ///
    /// `files` is a comma-separated path list, e.g.
    /// `"user_dict.txt,common_dict.txt"`. Files are read in order and the
    /// first file to define a token wins, so user dictionaries should come
    /// first. On success the previous dictionary is replaced; on error it
    /// is left untouched.
    pub fn load_dictionary(&mut self, files: &str) -> Result<()> {
        self.dict = loader::load_dictionary(files)?;
        Ok(())
    }

    /// The dictionary backing this segmenter.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Segment text into dictionary tokens.
    pub fn segment(&self, text: &[u8]) -> Vec<Segment<'_>> {
        self.internal_segment(text, false)
    }

    /// Segment text, then spread every result into its sub-segments and
    /// synonyms. The output is longer and duplicate-laden, suited to
    /// feeding a search index.
    pub fn full_segment(&self, text: &[u8]) -> Vec<Segment<'_>> {
        output::segments_spread(&self.segment(text))
    }

    /// Segment text with an explicit mode.
    ///
    /// In search mode a match spanning the entire input is skipped, which
    /// forces a finer split of text that is itself a dictionary token.
    pub fn internal_segment(&self, text: &[u8], search_mode: bool) -> Vec<Segment<'_>> {
        if text.is_empty() {
            return Vec::new();
        }
        let atoms = split_text_to_atoms(text);
        segment_atoms(&self.dict, &atoms, search_mode)
            .into_iter()
            .map(|raw| raw.into_segment(&self.dict))
            .collect()
    }
}

/// A token candidate occupying lattice positions.
#[derive(Clone)]
pub(crate) enum Candidate {
    /// A dictionary entry.
    Entry(TokenId),
    /// A synthetic single-atom fallback for input the dictionary misses.
    Unknown(Atom),
}

impl Candidate {
    fn atom_count(&self, dict: &Dictionary) -> usize {
        match self {
            Candidate::Entry(id) => dict.token(*id).text.len(),
            Candidate::Unknown(_) => 1,
        }
    }

    fn byte_len(&self, dict: &Dictionary) -> usize {
        match self {
            Candidate::Entry(id) => atom::atoms_byte_len(&dict.token(*id).text),
            Candidate::Unknown(atom) => atom.len(),
        }
    }

    fn is_stop(&self, dict: &Dictionary) -> bool {
        match self {
            Candidate::Entry(id) => dict.token(*id).pos == STOP_POS,
            Candidate::Unknown(_) => false,
        }
    }
}

/// A solved segment before it is tied to a dictionary borrow: a byte span
/// plus the covering candidate.
pub(crate) struct RawSegment {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) candidate: Candidate,
}

impl RawSegment {
    fn into_segment(self, dict: &Dictionary) -> Segment<'_> {
        let token = match self.candidate {
            Candidate::Entry(id) => TokenRef::entry(dict, id),
            Candidate::Unknown(atom) => TokenRef::unknown(dict, atom),
        };
        Segment::new(self.start, self.end, token)
    }
}

/// Per-position record of the best path reaching that position: the
/// minimum cumulative distance and the token that ends there. `None` until
/// first relaxed.
#[derive(Clone, Default)]
struct Jumper {
    min_distance: f32,
    candidate: Option<Candidate>,
}

/// Solve the shortest segmentation path over an atom sequence.
///
/// Shared by the query path and by the loader's sub-segmentation pass (the
/// latter always in search mode). Stop-word segments are filtered here, so
/// they consume their atoms but never surface.
pub(crate) fn segment_atoms(dict: &Dictionary, atoms: &[Atom], search_mode: bool) -> Vec<RawSegment> {
    // A single atom cannot be subdivided further.
    if atoms.is_empty() || (search_mode && atoms.len() == 1) {
        return Vec::new();
    }

    let mut jumpers: Vec<Jumper> = vec![Jumper::default(); atoms.len()];
    let mut matches: Vec<TokenId> = Vec::with_capacity(dict.max_token_length());

    for current in 0..atoms.len() {
        let base_distance = if current == 0 {
            0.0
        } else {
            jumpers[current - 1].min_distance
        };

        let limit = (current + dict.max_token_length()).min(atoms.len());
        let num_matches = dict.lookup_tokens(&atoms[current..limit], &mut matches);

        for &id in &matches {
            let end = current + dict.token(id).text.len() - 1;
            // In search mode a token covering the whole input is skipped;
            // sub-segmenting a token must never reproduce the token itself.
            if !search_mode || current != 0 || end != atoms.len() - 1 {
                relax(
                    &mut jumpers[end],
                    base_distance,
                    dict.token(id).distance,
                    Candidate::Entry(id),
                );
            }
        }

        // Keep every position reachable: if nothing matched here, or only
        // multi-atom tokens did, bridge this atom with a fallback.
        if num_matches == 0 || dict.token(matches[0]).text.len() > 1 {
            relax(
                &mut jumpers[current],
                base_distance,
                FALLBACK_DISTANCE,
                Candidate::Unknown(atoms[current].clone()),
            );
        }
    }

    // Walk the jumpers backwards to recover the shortest path.
    let mut path: Vec<Candidate> = Vec::new();
    let mut index = atoms.len();
    while index > 0 {
        let candidate = jumpers[index - 1]
            .candidate
            .clone()
            .expect("every lattice position is reachable via the one-atom fallback");
        index -= candidate.atom_count(dict);
        path.push(candidate);
    }
    path.reverse();

    // Assign byte spans left to right and drop stop-words.
    let mut segments = Vec::with_capacity(path.len());
    let mut position = 0;
    for candidate in path {
        let start = position;
        position += candidate.byte_len(dict);
        if !candidate.is_stop(dict) {
            segments.push(RawSegment {
                start,
                end: position,
                candidate,
            });
        }
    }
    segments
}

fn relax(jumper: &mut Jumper, base_distance: f32, token_distance: f32, candidate: Candidate) {
    let distance = base_distance + token_distance;
    if jumper.candidate.is_none() || jumper.min_distance > distance {
        jumper.min_distance = distance;
        jumper.candidate = Some(candidate);
    }
}
