//! Persistent singly-linked list backing quoted data.
//!
//! Nodes are reference counted and shared between lists. Every [`List`] is a window of
//! `len` nodes starting at `head`, so a list never observes nodes linked after its own
//! tail. That makes `push_back` an O(1) in-place link as long as nobody has linked past
//! the tail yet; once someone has, the list detaches onto a private copy first.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::ast::Value;

struct Node {
    value: Value,
    next: OnceCell<Rc<Node>>,
}

impl Node {
    fn new(value: Value) -> Self {
        Node {
            value,
            next: OnceCell::new(),
        }
    }
}

impl Drop for Node {
    // Unlink uniquely owned successors one at a time instead of recursing per node
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut node) => next = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

/// An immutable-by-observation list with O(1) prepend, rest and amortized O(1) append
#[derive(Clone, Default)]
pub struct List {
    head: Option<Rc<Node>>,
    tail: Option<Rc<Node>>,
    len: usize,
}

impl List {
    pub fn new() -> Self {
        List::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn first(&self) -> Option<&Value> {
        self.head.as_ref().map(|node| &node.value)
    }

    /// New list with `value` in front; the remainder is shared with `self`
    pub fn prepend(&self, value: Value) -> List {
        let node = Rc::new(Node {
            value,
            next: self.head.clone().map_or_else(OnceCell::new, OnceCell::from),
        });
        List {
            tail: self.tail.clone().or_else(|| Some(Rc::clone(&node))),
            head: Some(node),
            len: self.len + 1,
        }
    }

    /// Everything after the first element, sharing nodes with `self`
    pub fn rest(&self) -> List {
        if self.len <= 1 {
            return List::new();
        }
        List {
            head: self.head.as_ref().and_then(|node| node.next.get().cloned()),
            tail: self.tail.clone(),
            len: self.len - 1,
        }
    }

    /// Append in place. If another list already extended past our tail, the chain is
    /// copied first so that list is left untouched.
    pub fn push_back(&mut self, value: Value) {
        if self.tail.as_ref().is_some_and(|tail| tail.next.get().is_some()) {
            *self = self.copy();
        }

        let node = Rc::new(Node::new(value));
        match &self.tail {
            // The slot is known to be empty here
            Some(tail) => {
                let _ = tail.next.set(Rc::clone(&node));
            }
            None => self.head = Some(Rc::clone(&node)),
        }
        self.tail = Some(node);
        self.len += 1;
    }

    /// Move the values holding nested data out of the uniquely owned leading nodes onto
    /// `pending`. Teardown only: the list is left without its tail.
    pub(crate) fn detach_nested(&mut self, pending: &mut Vec<Value>) {
        // The tail handle would otherwise keep the last node shared
        self.tail = None;
        let mut cursor = self.head.as_mut();
        while let Some(node) = cursor.and_then(Rc::get_mut) {
            if node.value.has_children() {
                pending.push(std::mem::replace(&mut node.value, Value::Boolean(false)));
            }
            cursor = node.next.get_mut();
        }
    }

    /// Deep copy of the node chain (values themselves are cloned, not re-parsed)
    pub fn copy(&self) -> List {
        self.iter().cloned().collect()
    }

    /// Copies both operands and splices the copies together
    pub fn concatenate(&self, other: &List) -> List {
        let mut joined = self.copy();
        let appended = other.copy();

        match (&joined.tail, &appended.head) {
            (None, _) => return appended,
            (_, None) => return joined,
            (Some(tail), Some(head)) => {
                let _ = tail.next.set(Rc::clone(head));
            }
        }
        joined.tail = appended.tail.clone();
        joined.len += appended.len;
        joined
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
            remaining: self.len,
        }
    }
}

pub struct Iter<'a> {
    next: Option<&'a Node>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.next?;
        self.next = node.next.get().map(|next| &**next);
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut list = List::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
