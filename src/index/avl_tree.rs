use log::trace;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use crate::core::error::{Error, Result};
use crate::index::node::{balance_factor, height, Link, Node};

/// Payloads stored in an [`AvlTree`] are ordered by the key they expose
pub trait Keyed {
    type Key: Ord + ?Sized;

    fn key(&self) -> &Self::Key;
}

/// Self-balancing binary search tree.
///
/// After every mutating call the heights of the two subtrees of any node
/// differ by at most one, so insert, lookup and remove are O(log n).
#[derive(Debug, Clone)]
pub struct AvlTree<T> {
    root: Link<T>,
    len: usize,
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<T> AvlTree<T> {
    pub fn new() -> Self {
        AvlTree { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, 0 for an empty tree
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// In-order walk; every call starts a fresh traversal
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root, self.len)
    }

    pub fn first(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.payload)
    }

    pub fn last(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.payload)
    }

    fn rebalance(link: &mut Link<T>) {
        let Some(mut node) = link.take() else {
            return;
        };
        node.update_height();
        let balance = node.balance_factor();

        if balance > 1 {
            if balance_factor(&node.left) < 0 {
                trace!("avl: left-right rotation");
                node.left = node.left.take().map(Self::rotate_left);
            } else {
                trace!("avl: left-left rotation");
            }
            node = Self::rotate_right(node);
        } else if balance < -1 {
            if balance_factor(&node.right) > 0 {
                trace!("avl: right-left rotation");
                node.right = node.right.take().map(Self::rotate_right);
            } else {
                trace!("avl: right-right rotation");
            }
            node = Self::rotate_left(node);
        }

        *link = Some(node);
    }

    fn rotate_right(mut node: Box<Node<T>>) -> Box<Node<T>> {
        let Some(mut pivot) = node.left.take() else {
            return node;
        };
        node.left = pivot.right.take();
        node.update_height();
        pivot.right = Some(node);
        pivot.update_height();
        pivot
    }

    fn rotate_left(mut node: Box<Node<T>>) -> Box<Node<T>> {
        let Some(mut pivot) = node.right.take() else {
            return node;
        };
        node.right = pivot.left.take();
        node.update_height();
        pivot.left = Some(node);
        pivot.update_height();
        pivot
    }

    /// Detach the leftmost node of the subtree
    fn take_min(link: &mut Link<T>) -> Option<Box<Node<T>>> {
        let node = link.as_mut()?;
        if node.left.is_some() {
            let min = Self::take_min(&mut node.left);
            Self::rebalance(link);
            return min;
        }
        let mut min = link.take()?;
        *link = min.right.take();
        min.update_height();
        Some(min)
    }

    /// Remove the node at `link`, splicing its children back in
    fn unlink(link: &mut Link<T>) -> Option<T> {
        let node = link.as_mut()?;
        if node.left.is_some() && node.right.is_some() {
            let successor = Self::take_min(&mut node.right)?;
            return Some(std::mem::replace(&mut node.payload, successor.payload));
        }
        let mut node = link.take()?;
        *link = node.left.take().or_else(|| node.right.take());
        Some(node.payload)
    }

    /// Returns (height, node count) of a subtree with correct cached heights
    fn check_structure(link: &Link<T>) -> Result<(usize, usize)> {
        let Some(node) = link.as_deref() else {
            return Ok((0, 0));
        };
        let (left_height, left_count) = Self::check_structure(&node.left)?;
        let (right_height, right_count) = Self::check_structure(&node.right)?;

        if node.height != 1 + left_height.max(right_height) {
            return Err(Error::internal(format!(
                "stale height {} (children {} / {})",
                node.height, left_height, right_height
            )));
        }
        if left_height.abs_diff(right_height) > 1 {
            return Err(Error::internal(format!(
                "unbalanced node (children {} / {})",
                left_height, right_height
            )));
        }
        Ok((node.height, left_count + right_count + 1))
    }
}

impl<T: Keyed> AvlTree<T> {
    /// Insert a payload, returning the one it replaced if the key was present
    pub fn insert(&mut self, payload: T) -> Option<T> {
        let replaced = Self::insert_at(&mut self.root, payload);
        if replaced.is_none() {
            self.len += 1;
        }
        replaced
    }

    /// Apply `update` to the payload stored under `key`, creating it first
    /// with `create` when absent. `create` must produce a payload whose key
    /// equals `key`.
    ///
    /// Returns the result of `update` and whether a node was created.
    pub fn upsert<Q, C, U, R>(&mut self, key: &Q, create: C, update: U) -> (R, bool)
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
        C: FnOnce() -> T,
        U: FnOnce(&mut T) -> R,
    {
        let (result, inserted) = Self::upsert_at(&mut self.root, key, create, update);
        if inserted {
            self.len += 1;
        }
        (result, inserted)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(node.payload.key().borrow()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.payload),
            }
        }
        None
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut T>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(node.payload.key().borrow()) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.payload),
            }
        }
        None
    }

    pub fn find<Q>(&self, key: &Q) -> Result<&T>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key)
            .ok_or_else(|| Error::not_found("no entry with the given key in the tree"))
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Result<T>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match Self::remove_at(&mut self.root, key) {
            Some(payload) => {
                self.len -= 1;
                Ok(payload)
            }
            None => Err(Error::not_found("no entry with the given key in the tree")),
        }
    }

    /// Check balance, cached heights, ordering and the element count
    pub fn validate(&self) -> Result<()> {
        let (_, count) = Self::check_structure(&self.root)?;
        if count != self.len {
            return Err(Error::internal(format!(
                "tree holds {} nodes but records {}",
                count, self.len
            )));
        }

        let mut previous: Option<&T> = None;
        for payload in self.iter() {
            if let Some(prev) = previous {
                if prev.key() >= payload.key() {
                    return Err(Error::internal("in-order traversal is not strictly ascending"));
                }
            }
            previous = Some(payload);
        }
        Ok(())
    }

    fn insert_at(link: &mut Link<T>, payload: T) -> Option<T> {
        let node = match link {
            Some(node) => node,
            None => {
                *link = Some(Box::new(Node::new(payload)));
                return None;
            }
        };

        let ordering = payload.key().cmp(node.payload.key());
        let replaced = match ordering {
            Ordering::Less => Self::insert_at(&mut node.left, payload),
            Ordering::Greater => Self::insert_at(&mut node.right, payload),
            Ordering::Equal => return Some(std::mem::replace(&mut node.payload, payload)),
        };

        // Only a new node changes the shape of the path
        if replaced.is_none() {
            Self::rebalance(link);
        }
        replaced
    }

    fn upsert_at<Q, C, U, R>(link: &mut Link<T>, key: &Q, create: C, update: U) -> (R, bool)
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
        C: FnOnce() -> T,
        U: FnOnce(&mut T) -> R,
    {
        let node = match link {
            Some(node) => node,
            None => {
                let mut node = Box::new(Node::new(create()));
                let created: &Q = node.payload.key().borrow();
                debug_assert!(created == key);
                let result = update(&mut node.payload);
                *link = Some(node);
                return (result, true);
            }
        };

        let ordering = key.cmp(node.payload.key().borrow());
        let (result, inserted) = match ordering {
            Ordering::Less => Self::upsert_at(&mut node.left, key, create, update),
            Ordering::Greater => Self::upsert_at(&mut node.right, key, create, update),
            Ordering::Equal => return (update(&mut node.payload), false),
        };

        if inserted {
            Self::rebalance(link);
        }
        (result, inserted)
    }

    fn remove_at<Q>(link: &mut Link<T>, key: &Q) -> Option<T>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = link.as_mut()?;
        let ordering = key.cmp(node.payload.key().borrow());
        let removed = match ordering {
            Ordering::Less => Self::remove_at(&mut node.left, key),
            Ordering::Greater => Self::remove_at(&mut node.right, key),
            Ordering::Equal => Self::unlink(link),
        };

        if removed.is_some() {
            Self::rebalance(link);
        }
        removed
    }
}

impl<T: fmt::Display> AvlTree<T> {
    /// Pre-order dump between banners, `$$$` marking every empty link.
    /// Diagnostic output only; the layout is not a storage format.
    pub fn render_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("start-------------------------------\n")?;
        Self::render_link(&self.root, out)?;
        out.write_str("end---------------------------------\n")
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.render_to(&mut out);
        out
    }

    fn render_link<W: fmt::Write>(link: &Link<T>, out: &mut W) -> fmt::Result {
        match link.as_deref() {
            None => out.write_str("$$$\n"),
            Some(node) => {
                let text = node.payload.to_string();
                out.write_str(text.trim_end_matches('\n'))?;
                out.write_char('\n')?;
                Self::render_link(&node.left, out)?;
                Self::render_link(&node.right, out)
            }
        }
    }
}

impl<T: fmt::Display> fmt::Display for AvlTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.render_to(f)
    }
}

impl<T: Keyed> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Keyed> Extend<T> for AvlTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for payload in iter {
            self.insert(payload);
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending in-order iterator over an [`AvlTree`]
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(root: &'a Link<T>, len: usize) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.payload)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        key: u32,
        value: u32,
    }

    impl Item {
        fn new(key: u32) -> Self {
            Item { key, value: 0 }
        }
    }

    impl Keyed for Item {
        type Key = u32;

        fn key(&self) -> &u32 {
            &self.key
        }
    }

    impl fmt::Display for Item {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "{}", self.key)
        }
    }

    fn tree_of(keys: &[u32]) -> AvlTree<Item> {
        keys.iter().map(|&k| Item::new(k)).collect()
    }

    fn root_key(tree: &AvlTree<Item>) -> Option<u32> {
        tree.root().map(|node| node.payload.key)
    }

    fn keys(tree: &AvlTree<Item>) -> Vec<u32> {
        tree.iter().map(|item| item.key).collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree: AvlTree<Item> = AvlTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(tree.first().is_none());
        assert_eq!(tree.iter().count(), 0);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_left_left_rotation() {
        let tree = tree_of(&[3, 2, 1]);
        assert_eq!(root_key(&tree), Some(2));
        assert_eq!(tree.height(), 2);
        tree.validate().unwrap();
    }

    #[test]
    fn test_right_right_rotation() {
        let tree = tree_of(&[1, 2, 3]);
        assert_eq!(root_key(&tree), Some(2));
        tree.validate().unwrap();
    }

    #[test]
    fn test_left_right_rotation() {
        let tree = tree_of(&[3, 1, 2]);
        assert_eq!(root_key(&tree), Some(2));
        tree.validate().unwrap();
    }

    #[test]
    fn test_right_left_rotation() {
        let tree = tree_of(&[1, 3, 2]);
        assert_eq!(root_key(&tree), Some(2));
        tree.validate().unwrap();
    }

    #[test]
    fn test_sequential_inserts_stay_logarithmic() {
        let tree = tree_of(&(0..1024).collect::<Vec<_>>());
        assert_eq!(tree.len(), 1024);
        // AVL bound: height < 1.44 log2(n + 2)
        assert!(tree.height() <= 14, "height {}", tree.height());
        tree.validate().unwrap();
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut tree = tree_of(&[5, 3, 8]);
        let old = tree.insert(Item { key: 3, value: 42 });
        assert_eq!(old, Some(Item::new(3)));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(&3).unwrap().value, 42);
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        let mut tree: AvlTree<Item> = AvlTree::new();
        let (value, inserted) = tree.upsert(&7, || Item::new(7), |item| {
            item.value += 1;
            item.value
        });
        assert_eq!((value, inserted), (1, true));

        let (value, inserted) = tree.upsert(&7, || Item::new(7), |item| {
            item.value += 1;
            item.value
        });
        assert_eq!((value, inserted), (2, false));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_remove_leaf_single_child_and_two_children() {
        let mut tree = tree_of(&[50, 30, 70, 20, 40, 60, 80, 10]);

        // Leaf
        assert_eq!(tree.remove(&80).unwrap().key, 80);
        tree.validate().unwrap();

        // Single child (20 -> 10)
        assert_eq!(tree.remove(&20).unwrap().key, 20);
        tree.validate().unwrap();

        // Two children
        assert_eq!(tree.remove(&50).unwrap().key, 50);
        tree.validate().unwrap();

        assert_eq!(keys(&tree), vec![10, 30, 40, 60, 70]);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_remove_missing_key_is_not_found() {
        let mut tree = tree_of(&[1, 2, 3]);
        let err = tree.remove(&9).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(tree.len(), 3);
        assert!(tree.find(&9).unwrap_err().is_not_found());
    }

    #[test]
    fn test_iteration_is_restartable() {
        let tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 7);
        assert_eq!(iter.next().map(|i| i.key), Some(1));
        assert_eq!(iter.len(), 6);

        assert_eq!(keys(&tree), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(keys(&tree), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.first().map(|i| i.key), Some(1));
        assert_eq!(tree.last().map(|i| i.key), Some(7));
    }

    #[test]
    fn test_render_preorder_with_null_markers() {
        let tree = tree_of(&[2, 1, 3]);
        assert_eq!(
            tree.render(),
            "start-------------------------------\n\
             2\n1\n$$$\n$$$\n3\n$$$\n$$$\n\
             end---------------------------------\n"
        );

        let empty: AvlTree<Item> = AvlTree::new();
        assert_eq!(
            empty.render(),
            "start-------------------------------\n$$$\nend---------------------------------\n"
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let tree = tree_of(&[1, 2, 3]);
        let mut copy = tree.clone();
        copy.remove(&2).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn test_random_operations_match_btreemap() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut tree: AvlTree<Item> = AvlTree::new();
        let mut model: BTreeMap<u32, u32> = BTreeMap::new();

        for step in 0..4000u32 {
            let key = rng.gen_range(0..500);
            if rng.gen_bool(0.6) {
                tree.insert(Item { key, value: step });
                model.insert(key, step);
            } else {
                let removed = tree.remove(&key).ok().map(|item| item.value);
                assert_eq!(removed, model.remove(&key));
            }

            if step % 97 == 0 {
                tree.validate().unwrap();
            }
        }

        tree.validate().unwrap();
        let pairs: Vec<(u32, u32)> = tree.iter().map(|i| (i.key, i.value)).collect();
        let expected: Vec<(u32, u32)> = model.into_iter().collect();
        assert_eq!(pairs, expected);
    }
}
