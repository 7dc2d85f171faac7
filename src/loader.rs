//! Dictionary file loading and derivation.
//!
//! Parsing reads one token per line (several synonymous tokens may share a
//! line, separated by `|`), then two derivation passes run over the loaded
//! entries: path-weight assignment, and search-mode sub-segmentation with
//! synonym Cartesian expansion. Both must finish before any segmentation
//! starts; afterwards the dictionary is frozen.

use std::fs::File;
use std::io::{BufRead, BufReader};

use regex::Regex;
use tracing::debug;

use crate::atom::{split_text_to_atoms, Atom};
use crate::dictionary::Dictionary;
use crate::error::{GinkgoError, Result};
use crate::segmenter::{segment_atoms, Candidate};
use crate::token::{SubSegment, Token, TokenId};

/// Entries below this frequency are ignored.
const MIN_TOKEN_FREQUENCY: u64 = 2;

/// Load and derive a dictionary from a comma-separated list of file paths.
///
/// Files are parsed in order; the first file to define a token wins. Any
/// unopenable file fails the whole load.
pub(crate) fn load_dictionary(files: &str) -> Result<Dictionary> {
    let mut dict = Dictionary::new();

    for file in files.split(',') {
        debug!(file, "loading dictionary file");
        let handle = File::open(file).map_err(|e| {
            GinkgoError::dictionary(format!("failed to open dictionary file '{file}': {e}"))
        })?;
        load_reader(&mut dict, BufReader::new(handle))?;
    }

    assign_distances(&mut dict);
    expand_tokens(&mut dict);

    debug!(
        tokens = dict.num_tokens(),
        total_frequency = dict.total_frequency(),
        "dictionary loaded"
    );
    Ok(dict)
}

/// Parse dictionary lines from a reader into `dict`.
pub(crate) fn load_reader<R: BufRead>(dict: &mut Dictionary, reader: R) -> Result<()> {
    let digits = Regex::new("^[0-9]+$").map_err(|e| GinkgoError::dictionary(e.to_string()))?;
    for line in reader.lines() {
        let line = line?;
        parse_line(dict, &digits, &line);
    }
    Ok(())
}

/// Parse one dictionary line.
///
/// Grammar: `<entry> ( "|" <entry> )*` where an entry is
/// `<text> <frequency> [<pos>]`. The trailing slice decides the form: an
/// all-digit run means no POS. Text may contain internal spaces;
/// `__VERTICAL_BAR__` decodes to a literal `|`. Malformed entries are
/// skipped silently; a structurally broken piece abandons the rest of its
/// line. All entries of one line form a synonym group.
fn parse_line(dict: &mut Dictionary, digits: &Regex, line: &str) {
    let mut group: Vec<TokenId> = Vec::new();

    for piece in line.trim_matches(' ').split('|') {
        let slices: Vec<&str> = piece.trim_matches(' ').split(' ').collect();
        let len = slices.len();

        let text;
        let frequency_text;
        let pos;
        if digits.is_match(slices[len - 1]) {
            // Form: <text> <frequency>
            if len < 2 {
                break;
            }
            text = slices[..len - 1].join(" ");
            frequency_text = slices[len - 1];
            pos = "";
        } else {
            // Form: <text> <frequency> <pos>
            if len < 3 {
                break;
            }
            text = slices[..len - 2].join(" ").replace("__VERTICAL_BAR__", "|");
            frequency_text = slices[len - 2];
            pos = slices[len - 1];
        }

        if text.is_empty() {
            break;
        }

        let frequency = match frequency_text.parse::<u64>() {
            Ok(frequency) => frequency,
            Err(_) => continue,
        };
        if frequency < MIN_TOKEN_FREQUENCY {
            continue;
        }

        let atoms = split_text_to_atoms(text.as_bytes());
        if atoms.is_empty() {
            continue;
        }

        group.push(dict.alloc(Token::new(atoms, frequency, pos)));
    }

    for (i, &id) in group.iter().enumerate() {
        let peers: Vec<TokenId> = group
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, &peer)| peer)
            .collect();
        dict.token_mut(id).synonyms = peers;
        dict.add_token(id);
    }
}

/// Assign every stored token its path weight
/// `log2(total_frequency) - log2(frequency)`.
pub(crate) fn assign_distances(dict: &mut Dictionary) {
    let log_total = (dict.total_frequency() as f64).log2() as f32;
    for i in 0..dict.members().len() {
        let id = dict.members()[i];
        let frequency = dict.token(id).frequency;
        dict.token_mut(id).distance = log_total - (frequency as f64).log2() as f32;
    }
}

/// Compute every stored token's search-mode sub-segmentation, and expand
/// tokens whose sub-segments have synonyms into the Cartesian product of
/// those synonyms.
///
/// Product tokens inherit their source token's frequency, distance and POS
/// (distances were fixed before this pass, which keeps path weights stable
/// with respect to synonym insertion) and are registered as dictionary
/// entries of their own. The pass covers only the members present when it
/// starts.
pub(crate) fn expand_tokens(dict: &mut Dictionary) {
    let member_count = dict.num_tokens();

    for i in 0..member_count {
        let id = dict.members()[i];
        let segments = sub_segment(dict, id);
        dict.token_mut(id).segments = segments;

        // Cartesian product over the sub-segments: each sub-segment
        // contributes its token's synonyms, or the token itself when it has
        // none.
        let token = dict.token(id);
        let mut products = vec![Partial {
            text: Vec::new(),
            frequency: token.frequency,
            distance: token.distance,
            pos: token.pos.clone(),
        }];
        let mut has_synonyms = false;

        for sub in dict.token(id).segments.clone() {
            let peers = dict.token(sub.token).synonyms.clone();
            let mut cartesian = Vec::new();
            for partial in &products {
                if !peers.is_empty() {
                    has_synonyms = true;
                    for &peer in &peers {
                        cartesian.push(partial.append(&dict.token(peer).text));
                    }
                } else {
                    cartesian.push(partial.append(&dict.token(sub.token).text));
                }
            }
            products = cartesian;
        }

        if !has_synonyms {
            continue;
        }

        let product_ids: Vec<TokenId> = products
            .into_iter()
            .map(|partial| dict.alloc(partial.into_token()))
            .collect();
        dict.token_mut(id).synonyms = product_ids.clone();

        for (n, &product) in product_ids.iter().enumerate() {
            let segments = sub_segment(dict, product);
            dict.token_mut(product).segments = segments;

            let mut peers = Vec::with_capacity(product_ids.len());
            peers.push(id);
            peers.extend(
                product_ids
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != n)
                    .map(|(_, &peer)| peer),
            );
            dict.token_mut(product).synonyms = peers;

            dict.add_token(product);
        }
    }
}

/// Re-segment a token's own text in search mode. Fallback candidates are
/// interned into the arena so stored sub-segments can reference them.
fn sub_segment(dict: &mut Dictionary, id: TokenId) -> Vec<SubSegment> {
    let atoms = dict.token(id).text.clone();
    segment_atoms(dict, &atoms, true)
        .into_iter()
        .map(|raw| SubSegment {
            start: raw.start,
            end: raw.end,
            token: match raw.candidate {
                Candidate::Entry(entry) => entry,
                Candidate::Unknown(atom) => dict.alloc(Token::fallback(atom)),
            },
        })
        .collect()
}

/// An accumulating Cartesian-product element.
struct Partial {
    text: Vec<Atom>,
    frequency: u64,
    distance: f32,
    pos: String,
}

impl Partial {
    fn append(&self, atoms: &[Atom]) -> Partial {
        let mut text = self.text.clone();
        text.extend(atoms.iter().cloned());
        Partial {
            text,
            frequency: self.frequency,
            distance: self.distance,
            pos: self.pos.clone(),
        }
    }

    fn into_token(self) -> Token {
        let mut token = Token::new(self.text, self.frequency, &self.pos);
        token.distance = self.distance;
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(input: &str) -> Dictionary {
        let mut dict = Dictionary::new();
        load_reader(&mut dict, Cursor::new(input.to_string())).unwrap();
        assign_distances(&mut dict);
        expand_tokens(&mut dict);
        dict
    }

    fn member_pos(dict: &Dictionary, text: &str) -> Option<String> {
        let key = text.as_bytes();
        dict.members()
            .iter()
            .map(|&id| dict.token(id))
            .find(|t| crate::atom::atoms_to_bytes(&t.text) == key)
            .map(|t| t.pos.clone())
    }

    #[test]
    fn test_basic_entries() {
        let dict = load("中国 100 ns\n人口 30\n");
        assert_eq!(dict.num_tokens(), 2);
        assert_eq!(dict.total_frequency(), 130);
        assert_eq!(dict.max_token_length(), 2);
        assert_eq!(member_pos(&dict, "中国").as_deref(), Some("ns"));
        assert_eq!(member_pos(&dict, "人口").as_deref(), Some(""));
    }

    #[test]
    fn test_missing_final_newline() {
        let dict = load("中国 100 ns");
        assert_eq!(dict.num_tokens(), 1);
    }

    #[test]
    fn test_distances() {
        let dict = load("中国 100 ns\n人口 30\n");
        let expected = |frequency: u64| {
            (130f64).log2() as f32 - (frequency as f64).log2() as f32
        };
        for &id in dict.members() {
            let token = dict.token(id);
            assert!((token.distance - expected(token.frequency)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_low_frequency_dropped() {
        let dict = load("中国 1 ns\n人口 30 n\n");
        assert_eq!(dict.num_tokens(), 1);
        assert_eq!(member_pos(&dict, "中国"), None);
    }

    #[test]
    fn test_unparseable_frequency_skips_entry() {
        let dict = load("中国 many ns\n人口 30 n\n");
        assert_eq!(dict.num_tokens(), 1);
    }

    #[test]
    fn test_short_lines_skipped() {
        let dict = load("\n42\nhello\n人口 30 n\n");
        assert_eq!(dict.num_tokens(), 1);
    }

    #[test]
    fn test_text_with_internal_spaces() {
        let dict = load("hello world 12 p1\n");
        assert_eq!(dict.num_tokens(), 1);
        assert_eq!(dict.max_token_length(), 2);
        assert_eq!(member_pos(&dict, "helloworld").as_deref(), Some("p1"));
    }

    #[test]
    fn test_vertical_bar_escape() {
        let dict = load("a__VERTICAL_BAR__b 10 n\n");
        assert_eq!(dict.num_tokens(), 1);
        assert_eq!(member_pos(&dict, "a|b").as_deref(), Some("n"));
    }

    #[test]
    fn test_synonym_group_links_peers() {
        let dict = load("hello 20 p2|hi 21 p2|hoho 22 p2\n");
        assert_eq!(dict.num_tokens(), 3);
        for &id in dict.members() {
            assert_eq!(dict.token(id).synonyms.len(), 2);
        }
    }

    #[test]
    fn test_cartesian_expansion_adds_products() {
        let dict = load("hello 20 p2|hi 21 p2|hoho 22 p2\nhello world 12 p1\nworld 22 p3\n");
        // hello/hi/hoho/world/hello world plus the products hi world and
        // hoho world.
        assert_eq!(dict.num_tokens(), 7);
        assert_eq!(member_pos(&dict, "hiworld").as_deref(), Some("p1"));
        assert_eq!(member_pos(&dict, "hohoworld").as_deref(), Some("p1"));
    }

    #[test]
    fn test_products_inherit_source_distance() {
        let dict = load("hello 20 p2|hi 21 p2|hoho 22 p2\nhello world 12 p1\nworld 22 p3\n");
        let distance_of = |text: &str| {
            dict.members()
                .iter()
                .map(|&id| dict.token(id))
                .find(|t| crate::atom::atoms_to_bytes(&t.text) == text.as_bytes())
                .map(|t| t.distance)
                .unwrap()
        };
        // Distances were assigned before expansion over the pre-expansion
        // total; the products carry their source's value verbatim.
        assert_eq!(distance_of("helloworld"), distance_of("hiworld"));
        assert_eq!(distance_of("helloworld"), distance_of("hohoworld"));
    }
}
