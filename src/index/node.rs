use std::fmt;

/// Owning link to a subtree; `None` marks an empty subtree
pub type Link<T> = Option<Box<Node<T>>>;

/// Building block of the AVL tree.
///
/// A node exclusively owns both children, so dropping a node releases its
/// whole subtree. Rotations move the boxes around; payloads stay where they
/// were allocated.
#[derive(Debug, Clone)]
pub struct Node<T> {
    pub payload: T,
    pub left: Link<T>,
    pub right: Link<T>,
    pub height: usize,
}

impl<T> Node<T> {
    pub fn new(payload: T) -> Self {
        Node {
            payload,
            left: None,
            right: None,
            height: 1,
        }
    }

    pub fn with_children(payload: T, left: Link<T>, right: Link<T>) -> Self {
        let mut node = Node {
            payload,
            left,
            right,
            height: 1,
        };
        node.update_height();
        node
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn left_height(&self) -> usize {
        height(&self.left)
    }

    pub fn right_height(&self) -> usize {
        height(&self.right)
    }

    /// Positive when the left subtree is taller
    pub fn balance_factor(&self) -> isize {
        self.left_height() as isize - self.right_height() as isize
    }

    pub fn update_height(&mut self) {
        self.height = 1 + self.left_height().max(self.right_height());
    }
}

pub fn height<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

pub fn balance_factor<T>(link: &Link<T>) -> isize {
    link.as_ref().map_or(0, |node| node.balance_factor())
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "data: {}\theight: {}", self.payload, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_height_and_balance() {
        let leaf = Node::new(5);
        assert_eq!(leaf.height, 1);
        assert_eq!(leaf.balance_factor(), 0);
        assert!(leaf.is_leaf());
    }

    #[test]
    fn test_with_children_computes_height() {
        let left = Some(Box::new(Node::with_children(
            1,
            Some(Box::new(Node::new(0))),
            None,
        )));
        let node = Node::with_children(2, left, None);
        assert_eq!(node.height, 3);
        assert_eq!(node.balance_factor(), 2);
        assert_eq!(node.to_string(), "data: 2\theight: 3");
    }
}
