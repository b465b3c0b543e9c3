pub mod posting;
pub mod node;
pub mod avl_tree;
pub mod hashing;
pub mod hash_table;
pub mod word_index;
pub mod avl_index;
pub mod hash_index;
pub mod shared;
