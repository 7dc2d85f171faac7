//! Prefix-indexed token store.
//!
//! The dictionary owns an arena of tokens and an index keyed by the
//! concatenation of each token's atom bytes. It is populated once by the
//! loader and frozen before segmentation; after that any number of readers
//! may query it concurrently without locking.

use ahash::AHashMap;

use crate::atom::{self, Atom};
use crate::token::{Token, TokenId};

/// A build-once, read-many store of tokens with prefix lookup and aggregate
/// statistics.
#[derive(Debug, Default)]
pub struct Dictionary {
    /// Every token ever allocated, addressed by [`TokenId`]. Holds both
    /// dictionary entries and auxiliary tokens (stored fallbacks, synonym
    /// products shadowed by an earlier entry with the same key).
    arena: Vec<Token>,
    /// Dictionary membership: concatenated atom bytes to arena index. The
    /// first token registered under a key wins.
    index: AHashMap<Vec<u8>, TokenId>,
    /// Members in registration order.
    members: Vec<TokenId>,
    total_frequency: u64,
    max_token_length: usize,
}

impl Dictionary {
    /// Create a new empty dictionary.
    pub(crate) fn new() -> Self {
        Dictionary::default()
    }

    /// Number of tokens stored in the dictionary.
    pub fn num_tokens(&self) -> usize {
        self.members.len()
    }

    /// Sum of the frequencies of all stored tokens.
    pub fn total_frequency(&self) -> u64 {
        self.total_frequency
    }

    /// Largest atom count of any stored token.
    pub fn max_token_length(&self) -> usize {
        self.max_token_length
    }

    pub(crate) fn token(&self, id: TokenId) -> &Token {
        &self.arena[id as usize]
    }

    pub(crate) fn token_mut(&mut self, id: TokenId) -> &mut Token {
        &mut self.arena[id as usize]
    }

    pub(crate) fn members(&self) -> &[TokenId] {
        &self.members
    }

    /// Place a token in the arena without registering it as a dictionary
    /// entry. Sub-segment and synonym links may target such tokens.
    pub(crate) fn alloc(&mut self, token: Token) -> TokenId {
        let id = self.arena.len() as TokenId;
        self.arena.push(token);
        id
    }

    /// Register an arena token as a dictionary entry.
    ///
    /// The first entry for a given atomized byte sequence wins; calls with
    /// an already-registered key are no-ops. This is what gives
    /// user-dictionary files precedence over later general ones.
    pub(crate) fn add_token(&mut self, id: TokenId) {
        let token = self.token(id);
        let key = atom::atoms_to_bytes(&token.text);
        let (frequency, atom_count) = (token.frequency, token.text.len());
        if self.index.contains_key(&key) {
            return;
        }
        self.index.insert(key, id);
        self.members.push(id);
        self.total_frequency += frequency;
        self.max_token_length = self.max_token_length.max(atom_count);
    }

    /// Collect into `out` the stored tokens whose atom sequence is a prefix
    /// of `atoms`, ordered by increasing atom count. Returns the match
    /// count.
    ///
    /// Callers bound `atoms` to [`max_token_length`](Self::max_token_length)
    /// atoms; longer prefixes cannot match anything.
    pub(crate) fn lookup_tokens(&self, atoms: &[Atom], out: &mut Vec<TokenId>) -> usize {
        out.clear();
        let mut key = Vec::with_capacity(atom::atoms_byte_len(atoms));
        for (count, atom) in atoms.iter().enumerate() {
            key.extend_from_slice(atom);
            if let Some(&id) = self.index.get(&key) {
                // The key alone matches byte-wise; the stored token is an
                // atom-sequence prefix only if its atom count lines up.
                if self.token(id).text.len() == count + 1 {
                    out.push(id);
                }
            }
        }
        out.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::split_text_to_atoms;

    fn add(dict: &mut Dictionary, text: &str, frequency: u64, pos: &str) -> TokenId {
        let atoms = split_text_to_atoms(text.as_bytes());
        let id = dict.alloc(Token::new(atoms, frequency, pos));
        dict.add_token(id);
        id
    }

    #[test]
    fn test_empty_dictionary() {
        let dict = Dictionary::new();
        assert_eq!(dict.num_tokens(), 0);
        assert_eq!(dict.total_frequency(), 0);
        assert_eq!(dict.max_token_length(), 0);

        let mut out = Vec::new();
        let atoms = split_text_to_atoms("中国".as_bytes());
        assert_eq!(dict.lookup_tokens(&atoms, &mut out), 0);
    }

    #[test]
    fn test_add_token_updates_statistics() {
        let mut dict = Dictionary::new();
        add(&mut dict, "中国", 10, "ns");
        add(&mut dict, "十三亿", 4, "");

        assert_eq!(dict.num_tokens(), 2);
        assert_eq!(dict.total_frequency(), 14);
        assert_eq!(dict.max_token_length(), 3);
    }

    #[test]
    fn test_first_writer_wins() {
        let mut dict = Dictionary::new();
        let first = add(&mut dict, "中国", 10, "ns");
        add(&mut dict, "中国", 99, "n");

        assert_eq!(dict.num_tokens(), 1);
        assert_eq!(dict.total_frequency(), 10);
        assert_eq!(dict.token(first).pos, "ns");

        let mut out = Vec::new();
        let atoms = split_text_to_atoms("中国".as_bytes());
        assert_eq!(dict.lookup_tokens(&atoms, &mut out), 1);
        assert_eq!(out[0], first);
    }

    #[test]
    fn test_lookup_orders_by_increasing_length() {
        let mut dict = Dictionary::new();
        let long = add(&mut dict, "中华人民", 5, "nt");
        let short = add(&mut dict, "中华", 20, "nz");

        let mut out = Vec::new();
        let atoms = split_text_to_atoms("中华人民共和国".as_bytes());
        let n = dict.lookup_tokens(&atoms[..4.min(atoms.len())], &mut out);
        assert_eq!(n, 2);
        assert_eq!(out, [short, long]);
    }

    #[test]
    fn test_lookup_requires_atom_alignment() {
        let mut dict = Dictionary::new();
        // "ab" is a single Latin-run atom; the two-atom probe ["a", "b"]
        // concatenates to the same bytes but must not match it.
        add(&mut dict, "ab", 5, "n");

        let mut out = Vec::new();
        let atoms = vec![b"a".to_vec(), b"b".to_vec()];
        assert_eq!(dict.lookup_tokens(&atoms, &mut out), 0);
    }

    #[test]
    fn test_alloc_does_not_register() {
        let mut dict = Dictionary::new();
        let atoms = split_text_to_atoms("中国".as_bytes());
        dict.alloc(Token::new(atoms.clone(), 10, "ns"));

        assert_eq!(dict.num_tokens(), 0);
        let mut out = Vec::new();
        assert_eq!(dict.lookup_tokens(&atoms, &mut out), 0);
    }
}
