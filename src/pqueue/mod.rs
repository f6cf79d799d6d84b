/*! A binary min-heap keyed by an extracted priority.

Items don't need to implement `Ord`: the queue is handed a key function when
it is built and calls it once per item, on the way in. Items with equal keys
come out in the order they went in, so a given sequence of operations always
produces the same output.
*/

use std::cmp::Ordering;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueueError {
  #[error("Attempted to dequeue from an empty queue")]
  EmptyQueue,
}

struct Entry<T> {
  key: u64,
  seq: u64,
  item: T,
}

impl<T> Entry<T> {
  fn order(&self, other: &Self) -> Ordering {
    self.key.cmp(&other.key).then(self.seq.cmp(&other.seq))
  }
}

pub struct PriorityQueue<T, F>
where
  F: Fn(&T) -> u64,
{
  entries: Vec<Entry<T>>,
  key_fn: F,
  next_seq: u64,
}

impl<T, F> PriorityQueue<T, F>
where
  F: Fn(&T) -> u64,
{
  pub fn new(key_fn: F) -> Self {
    Self {
      entries: Vec::new(),
      key_fn,
      next_seq: 0,
    }
  }

  pub fn with_capacity(capacity: usize, key_fn: F) -> Self {
    Self {
      entries: Vec::with_capacity(capacity),
      key_fn,
      next_seq: 0,
    }
  }

  pub fn size(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn enqueue(&mut self, item: T) {
    let key = (self.key_fn)(&item);
    let seq = self.next_seq;
    self.next_seq += 1;
    self.entries.push(Entry { key, seq, item });
    self.sift_up(self.entries.len() - 1);
  }

  /// Remove and return the item with the smallest key.
  pub fn dequeue(&mut self) -> Result<T, QueueError> {
    if self.entries.is_empty() {
      return Err(QueueError::EmptyQueue);
    }
    let last = self.entries.len() - 1;
    self.entries.swap(0, last);
    let min = self.entries.pop().ok_or(QueueError::EmptyQueue)?;
    if !self.entries.is_empty() {
      self.sift_down(0);
    }
    Ok(min.item)
  }

  pub fn peek(&self) -> Option<&T> {
    self.entries.first().map(|e| &e.item)
  }

  fn sift_up(&mut self, mut i: usize) {
    while i > 0 {
      let parent = (i - 1) / 2;
      if self.entries[i].order(&self.entries[parent]) == Ordering::Less {
        self.entries.swap(i, parent);
        i = parent;
      } else {
        break;
      }
    }
  }

  fn sift_down(&mut self, mut i: usize) {
    let n = self.entries.len();
    loop {
      let l = 2 * i + 1;
      let r = l + 1;
      let mut smallest = i;
      if l < n && self.entries[l].order(&self.entries[smallest]) == Ordering::Less {
        smallest = l;
      }
      if r < n && self.entries[r].order(&self.entries[smallest]) == Ordering::Less {
        smallest = r;
      }
      if smallest == i {
        break;
      }
      self.entries.swap(i, smallest);
      i = smallest;
    }
  }
}
