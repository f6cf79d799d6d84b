/*! Huffman tree construction over Unicode code points.

The tree is rebuilt from nothing but the symbol frequencies on both sides of
the codec, so construction has to be reproducible: leaves are queued in
ascending code-point order (the iteration order of `FrequencyTable`), and the
priority queue hands back equal-priority nodes in the order they were queued.

Left edges are `0` and right edges are `1`. A tree with a single symbol is a
bare leaf; that symbol is given the one-bit code `0` so that every decoded
symbol consumes at least one bit.
*/

use std::collections::btree_map;
use std::collections::{BTreeMap, HashMap};
use std::io::{self, Read};

use bit_vec::BitVec;
use thiserror::Error;

use crate::pqueue::{PriorityQueue, QueueError};

/// Maps every symbol of a tree to its code.
pub type EncodingMap = HashMap<char, BitVec>;

#[derive(Error, Debug)]
pub enum TreeError {
  #[error("Cannot build a Huffman tree from an empty frequency table")]
  EmptyInput,
  #[error("Priority queue failure: {0}")]
  QueueError(#[from] QueueError),
}

/// Occurrence counts per symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
  counts: BTreeMap<char, u64>,
}

impl FrequencyTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Count the code points of a string.
  pub fn from_text(text: &str) -> Self {
    let mut table = Self::new();
    for ch in text.chars() {
      table.add(ch);
    }
    table
  }

  /// Read a UTF-8 source to the end and count its code points.
  pub fn from_reader<R: Read>(mut src: R) -> io::Result<Self> {
    let mut text = String::new();
    src.read_to_string(&mut text)?;
    Ok(Self::from_text(&text))
  }

  pub fn add(&mut self, sym: char) {
    self.add_count(sym, 1);
  }

  /// Add `count` occurrences of `sym`. Adding zero does not create an entry.
  pub fn add_count(&mut self, sym: char, count: u64) {
    if count == 0 {
      return;
    }
    *self.counts.entry(sym).or_insert(0) += count;
  }

  /// Fold another table's counts into this one.
  pub fn merge(&mut self, other: &FrequencyTable) {
    for (sym, count) in other.iter() {
      self.add_count(sym, count);
    }
  }

  pub fn get(&self, sym: char) -> Option<u64> {
    self.counts.get(&sym).copied()
  }

  /// Number of distinct symbols.
  pub fn len(&self) -> usize {
    self.counts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.counts.is_empty()
  }

  /// Sum of all counts, i.e. the length of the input in code points.
  pub fn total(&self) -> u64 {
    self.counts.values().sum()
  }

  /// Entries in ascending code-point order.
  pub fn iter(&self) -> Iter<'_> {
    Iter {
      inner: self.counts.iter(),
    }
  }
}

pub struct Iter<'a> {
  inner: btree_map::Iter<'a, char, u64>,
}

impl<'a> Iterator for Iter<'a> {
  type Item = (char, u64);

  fn next(&mut self) -> Option<Self::Item> {
    self.inner.next().map(|(sym, count)| (*sym, *count))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
  Leaf {
    sym: char,
    freq: u64,
  },
  Internal {
    left: Box<HuffNode>,
    right: Box<HuffNode>,
  },
}

impl HuffNode {
  pub fn leaf(sym: char, freq: u64) -> Self {
    HuffNode::Leaf { sym, freq }
  }

  pub fn join(left: HuffNode, right: HuffNode) -> Self {
    HuffNode::Internal {
      left: Box::new(left),
      right: Box::new(right),
    }
  }

  /// Frequency of a leaf, or the summed frequencies of all leaves below an
  /// internal node.
  pub fn priority(&self) -> u64 {
    match self {
      HuffNode::Leaf { freq, .. } => *freq,
      HuffNode::Internal { left, right } => left.priority() + right.priority(),
    }
  }

  pub fn is_leaf(&self) -> bool {
    matches!(self, HuffNode::Leaf { .. })
  }

  /// Follow one edge. Leaves have no children, so this is `None` for them.
  pub fn child(&self, bit: bool) -> Option<&HuffNode> {
    match self {
      HuffNode::Leaf { .. } => None,
      HuffNode::Internal { left, right } => Some(if bit { right } else { left }),
    }
  }

  fn depth(&self) -> usize {
    match self {
      HuffNode::Leaf { .. } => 0,
      HuffNode::Internal { left, right } => 1 + left.depth().max(right.depth()),
    }
  }

  fn gen_mapping(&self, repr: &mut BitVec, map: &mut EncodingMap) {
    match self {
      HuffNode::Leaf { sym, .. } => {
        map.insert(*sym, repr.clone());
      }
      HuffNode::Internal { left, right } => {
        repr.push(false);
        left.gen_mapping(repr, map);
        repr.pop();
        repr.push(true);
        right.gen_mapping(repr, map);
        repr.pop();
      }
    }
  }

  fn collect_frequencies(&self, table: &mut FrequencyTable) {
    match self {
      HuffNode::Leaf { sym, freq } => table.add_count(*sym, *freq),
      HuffNode::Internal { left, right } => {
        left.collect_frequencies(table);
        right.collect_frequencies(table);
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffTree {
  root: HuffNode,
}

impl HuffTree {
  /// Huffman's algorithm: repeatedly pull the two lightest trees off the
  /// queue and push back their join, lighter one on the left.
  pub fn from_frequencies(freqs: &FrequencyTable) -> Result<Self, TreeError> {
    if freqs.is_empty() {
      return Err(TreeError::EmptyInput);
    }

    let mut queue = PriorityQueue::with_capacity(freqs.len(), HuffNode::priority);
    for (sym, freq) in freqs.iter() {
      queue.enqueue(HuffNode::leaf(sym, freq));
    }

    while queue.size() > 1 {
      let left = queue.dequeue()?;
      let right = queue.dequeue()?;
      queue.enqueue(HuffNode::join(left, right));
    }

    let root = queue.dequeue()?;
    log::debug!(
      "Built Huffman tree over {} symbols with depth {}",
      freqs.len(),
      root.depth()
    );
    Ok(Self { root })
  }

  pub fn root(&self) -> &HuffNode {
    &self.root
  }

  /// Length of the longest code in the tree.
  pub fn max_code_len(&self) -> usize {
    self.root.depth().max(1)
  }

  /// Generate the forward mapping of symbols to codes.
  pub fn encoding_map(&self) -> EncodingMap {
    let mut map = EncodingMap::new();
    match &self.root {
      HuffNode::Leaf { sym, .. } => {
        // Lone symbol: one bit per occurrence rather than none.
        let mut repr = BitVec::new();
        repr.push(false);
        map.insert(*sym, repr);
      }
      root => root.gen_mapping(&mut BitVec::new(), &mut map),
    }
    map
  }

  /// Recover the table the tree was built from.
  pub fn frequencies(&self) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    self.root.collect_frequencies(&mut table);
    table
  }
}

/// Render a code as a string of `0`s and `1`s.
pub fn code_to_string(code: &BitVec) -> String {
  code.iter().map(|b| if b { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use quickcheck_macros::quickcheck;

  fn is_prefix(a: &BitVec, b: &BitVec) -> bool {
    a.len() <= b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
  }

  fn is_prefix_code(map: &EncodingMap) -> bool {
    let codes: Vec<&BitVec> = map.values().collect();
    for (i, a) in codes.iter().enumerate() {
      for (j, b) in codes.iter().enumerate() {
        if i != j && is_prefix(a, b) {
          return false;
        }
      }
    }
    true
  }

  #[test]
  fn freqcount_1() {
    let table = FrequencyTable::from_text("aaaee1");
    assert_eq!(table.get('a'), Some(3));
    assert_eq!(table.get('e'), Some(2));
    assert_eq!(table.get('1'), Some(1));
    assert_eq!(table.get('z'), None);
    assert_eq!(table.len(), 3);
    assert_eq!(table.total(), 6);
  }

  #[test]
  fn freqcount_from_reader() {
    let text = "naïve café ☕☕";
    let table = FrequencyTable::from_reader(text.as_bytes()).unwrap();
    assert_eq!(table.get('☕'), Some(2));
    assert_eq!(table.get('é'), Some(1));
    assert_eq!(table.get(' '), Some(2));
    assert_eq!(table.total(), text.chars().count() as u64);
  }

  #[test]
  fn freqcount_rejects_bad_utf8() {
    let data = [0x61u8, 0xff, 0x62];
    let err = FrequencyTable::from_reader(&data[..]).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
  }

  #[test]
  fn merge_is_additive() {
    let mut t1 = FrequencyTable::from_text("abca");
    let t2 = FrequencyTable::from_text("cd");
    t1.merge(&t2);
    assert_eq!(t1, FrequencyTable::from_text("abcacd"));

    let mut t3 = FrequencyTable::from_text("cd");
    t3.merge(&FrequencyTable::from_text("abca"));
    assert_eq!(t1, t3);
  }

  #[test]
  fn iteration_is_ordered_by_codepoint() {
    let table = FrequencyTable::from_text("zyx☃ab");
    let syms: String = table.iter().map(|(s, _)| s).collect();
    assert_eq!(syms, "abxyz☃");
  }

  #[test]
  fn empty_table_is_rejected() {
    let table = FrequencyTable::new();
    assert!(matches!(
      HuffTree::from_frequencies(&table),
      Err(TreeError::EmptyInput)
    ));
  }

  #[test]
  fn hufftree_1() {
    let table = FrequencyTable::from_text("aaaee1");
    let tree = HuffTree::from_frequencies(&table).unwrap();

    let answer = HuffNode::join(
      HuffNode::leaf('a', 3),
      HuffNode::join(HuffNode::leaf('1', 1), HuffNode::leaf('e', 2)),
    );
    assert_eq!(tree.root(), &answer);
    assert_eq!(tree.root().priority(), 6);
    assert_eq!(tree.max_code_len(), 2);
  }

  #[test]
  fn simple_map() {
    let table = FrequencyTable::from_text("aaaee1");
    let map = HuffTree::from_frequencies(&table).unwrap().encoding_map();
    assert_eq!(map.len(), 3);
    assert_eq!(code_to_string(&map[&'a']), "0");
    assert_eq!(code_to_string(&map[&'1']), "10");
    assert_eq!(code_to_string(&map[&'e']), "11");
    assert!(map[&'a'].len() <= map[&'e'].len());
    assert!(map[&'a'].len() <= map[&'1'].len());
  }

  #[test]
  fn singleton_gets_one_bit_code() {
    let table = FrequencyTable::from_text("aaaa");
    let tree = HuffTree::from_frequencies(&table).unwrap();
    assert!(tree.root().is_leaf());
    assert_eq!(tree.max_code_len(), 1);
    let map = tree.encoding_map();
    assert_eq!(map.len(), 1);
    assert_eq!(code_to_string(&map[&'a']), "0");
  }

  #[test]
  fn child_walks_edges() {
    let table = FrequencyTable::from_text("aaaee1");
    let tree = HuffTree::from_frequencies(&table).unwrap();
    let right = tree.root().child(true).unwrap();
    assert_eq!(right.child(false), Some(&HuffNode::leaf('1', 1)));
    assert_eq!(tree.root().child(false), Some(&HuffNode::leaf('a', 3)));
    assert_eq!(HuffNode::leaf('x', 1).child(false), None);
  }

  #[test]
  fn frequencies_round_trip_through_tree() {
    let table = FrequencyTable::from_text("the quick brown fox jumps over the lazy dog");
    let tree = HuffTree::from_frequencies(&table).unwrap();
    assert_eq!(tree.frequencies(), table);
  }

  #[test]
  fn skewed_frequencies_stay_prefix_free() {
    let mut table = FrequencyTable::new();
    let (mut a, mut b) = (1u64, 1u64);
    for sym in "abcdefghijklmnopqrst".chars() {
      table.add_count(sym, a);
      let next = a + b;
      a = b;
      b = next;
    }
    let tree = HuffTree::from_frequencies(&table).unwrap();
    let map = tree.encoding_map();
    assert_eq!(map.len(), 20);
    assert_eq!(tree.max_code_len(), 19);
    assert!(is_prefix_code(&map));
  }

  #[quickcheck]
  fn every_symbol_has_a_prefix_free_code(text: String) -> bool {
    let table = FrequencyTable::from_text(&text);
    if table.is_empty() {
      return true;
    }
    let map = HuffTree::from_frequencies(&table).unwrap().encoding_map();
    map.len() == table.len()
      && table.iter().all(|(sym, _)| map.contains_key(&sym))
      && is_prefix_code(&map)
  }

  #[quickcheck]
  fn construction_is_deterministic(text: String) -> bool {
    let table = FrequencyTable::from_text(&text);
    if table.is_empty() {
      return true;
    }
    HuffTree::from_frequencies(&table).unwrap() == HuffTree::from_frequencies(&table).unwrap()
  }
}
