use crate::{get_zero_hash, Hash256, HASHSIZE};
use ethereum_hashing::{Context, Sha256Context, HASH_LEN};
use smallvec::SmallVec;
use std::mem;

type SmallVec8<T> = SmallVec<[T; 8]>;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// More leaves were written than the tree has room for.
    MaximumLeavesExceeded { max_leaves: usize },
    /// The tree is deeper than the pre-computed zero hashes allow.
    DepthExceeded { depth: usize },
}

impl From<Error> for ssz::Error {
    fn from(e: Error) -> ssz::Error {
        ssz::ErrorKind::BytesInvalid(format!("merkle hasher: {:?}", e)).into()
    }
}

/// One side of a node: either a computed digest or a borrowed chunk.
enum Preimage<'a> {
    Digest([u8; HASH_LEN]),
    Slice(&'a [u8]),
}

impl<'a> Preimage<'a> {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Preimage::Digest(digest) => digest.as_ref(),
            Preimage::Slice(slice) => slice,
        }
    }
}

/// A node whose left child has been hashed into `context` and which waits for its right child.
struct HalfNode {
    context: Context,
    /// Generalized index: the root is `1` and the children of `i` are `2i` and `2i + 1`.
    id: usize,
}

impl HalfNode {
    fn new(id: usize, left: Preimage) -> Self {
        let mut context = Context::new();
        context.update(left.as_bytes());

        Self { context, id }
    }

    fn finish(mut self, right: Preimage) -> [u8; HASH_LEN] {
        self.context.update(right.as_bytes());
        self.context.finalize()
    }
}

/// Computes a Merkle root from a stream of bytes of any length.
///
/// Leaves that are never written are taken to be zero chunks, and their subtrees come from the
/// pre-computed zero hashes. Padding a list to its maximum length therefore costs one lookup per
/// level rather than one hash per missing leaf.
///
/// Only the left spine of pending nodes is kept. For a depth-three tree (`L` a consumed leaf, a
/// number a pending half-node, `X` a finished node):
///
/// ```ignore
///   start      first leaf   second leaf   third leaf   fourth leaf
///     -            -            1             1            1
///    / \          / \          / \           / \          / \
///   -   -        2   -        X   -         X   3        X   X
///  / \ / \      / \ / \      / \ / \       / \ / \      / \ / \
///  - - - -      L - - -      L L - -       L L L -      L L L L
/// ```
pub struct MerkleHasher {
    /// At most one per level, so eight covers 256 leaves without spilling to the heap.
    half_nodes: SmallVec8<HalfNode>,
    /// Number of layers, leaves included: one leaf is depth 1, four leaves are depth 3.
    depth: usize,
    /// Generalized index of the next leaf.
    next_leaf: usize,
    /// Bytes of an incomplete leaf.
    buffer: SmallVec<[u8; 32]>,
    root: Option<Hash256>,
}

fn get_parent(i: usize) -> usize {
    i / 2
}

/// The layer of node `i`, counting the root as `0`. `i` must be non-zero.
fn get_depth(i: usize) -> usize {
    let total_bits = mem::size_of::<usize>() * 8;
    total_bits - i.leading_zeros() as usize - 1
}

impl MerkleHasher {
    /// A hasher with room for `num_leaves` rounded up to a power of two. Zero is treated as one.
    pub fn with_leaves(num_leaves: usize) -> Self {
        let depth = get_depth(num_leaves.max(1).next_power_of_two()) + 1;
        Self::with_depth(depth)
    }

    /// Room for `1 << (depth - 1)` leaves. A `depth` of zero is treated as one.
    fn with_depth(depth: usize) -> Self {
        let depth = depth.max(1);

        Self {
            half_nodes: SmallVec::with_capacity(depth - 1),
            depth,
            next_leaf: 1 << (depth - 1),
            buffer: SmallVec::with_capacity(32),
            root: None,
        }
    }

    /// Append `bytes`, hashing every leaf they complete.
    ///
    /// Fails with `MaximumLeavesExceeded` once a leaf beyond the capacity is completed.
    pub fn write(&mut self, mut bytes: &[u8]) -> Result<(), Error> {
        if !self.buffer.is_empty() {
            let take = (HASHSIZE - self.buffer.len()).min(bytes.len());
            self.buffer.extend_from_slice(&bytes[..take]);
            bytes = &bytes[take..];

            if self.buffer.len() < HASHSIZE {
                return Ok(());
            }
            let leaf = mem::take(&mut self.buffer);
            self.process_leaf(&leaf)?;
        }

        let mut leaves = bytes.chunks_exact(HASHSIZE);
        for leaf in &mut leaves {
            self.process_leaf(leaf)?;
        }
        self.buffer.extend_from_slice(leaves.remainder());

        Ok(())
    }

    fn process_leaf(&mut self, leaf: &[u8]) -> Result<(), Error> {
        // Leaf ids run from `1 << (depth - 1)` up to (but excluding) `1 << depth`.
        if self.next_leaf >= 1 << self.depth {
            return Err(Error::MaximumLeavesExceeded {
                max_leaves: 1 << (self.depth - 1),
            });
        } else if self.next_leaf == 1 {
            // A tree of depth one has a root that is equal to the first given leaf.
            self.root = Some(Hash256::from_slice(leaf))
        } else if self.next_leaf % 2 == 0 {
            self.process_left_node(self.next_leaf, Preimage::Slice(leaf))
        } else {
            self.process_right_node(self.next_leaf, Preimage::Slice(leaf))
        }

        self.next_leaf += 1;

        Ok(())
    }

    /// Zero-pad any buffered bytes into a final leaf, fill the rest of the tree with zero hashes
    /// and return the root.
    pub fn finish(mut self) -> Result<Hash256, Error> {
        if !self.buffer.is_empty() {
            let mut leaf = [0; HASHSIZE];
            leaf[..self.buffer.len()].copy_from_slice(&self.buffer);
            self.process_leaf(&leaf)?
        }

        loop {
            if let Some(root) = self.root {
                break Ok(root);
            } else if let Some(node) = self.half_nodes.last() {
                let right_child = node.id * 2 + 1;
                let zero_hash = self.zero_hash(right_child)?;
                self.process_right_node(right_child, zero_hash);
            } else if self.next_leaf == 1 {
                // Depth one with nothing written.
                break Ok(Hash256::zero());
            } else {
                // Nothing written yet, so seed the left spine with a zero leaf.
                let zero_hash = self.zero_hash(self.next_leaf)?;
                self.process_left_node(self.next_leaf, zero_hash)
            }
        }
    }

    /// `id` is the left child, not the parent.
    fn process_left_node(&mut self, id: usize, preimage: Preimage) {
        self.half_nodes
            .push(HalfNode::new(get_parent(id), preimage))
    }

    /// Complete the parent of right child `id`, then keep folding upwards while the completed
    /// node is itself a right child:
    ///
    /// ```ignore
    ///           1 <-- completed
    ///          / \
    ///         2   3  <-- completed
    ///        / \ / \
    ///       4  5 6  7 <-- supplied right node
    /// ```
    fn process_right_node(&mut self, id: usize, mut preimage: Preimage) {
        let mut parent = get_parent(id);

        loop {
            match self.half_nodes.pop() {
                Some(node) if node.id == parent => {
                    preimage = Preimage::Digest(node.finish(preimage));
                    if parent == 1 {
                        self.root = Some(Hash256::from_slice(preimage.as_bytes()));
                        break;
                    } else {
                        parent = get_parent(parent);
                    }
                }
                other => {
                    self.half_nodes.extend(other);
                    self.half_nodes.push(HalfNode::new(parent, preimage));
                    break;
                }
            }
        }
    }

    /// Returns the root of an all-zero subtree rooted at node `id`.
    fn zero_hash(&self, id: usize) -> Result<Preimage<'static>, Error> {
        get_zero_hash(self.depth - (get_depth(id) + 1))
            .map(Preimage::Slice)
            .ok_or(Error::DepthExceeded { depth: self.depth })
    }
}
