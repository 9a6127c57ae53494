//! Arena allocator for syntax tree nodes.
//!
//! All nodes of one document live in the same `bumpalo` arena and are
//! released together once the lint pass is over.

use bumpalo::Bump;

/// Arena allocator for [`Node`](crate::Node)s and the strings they borrow.
///
/// ```rust
/// use mdstyle_ast::AstArena;
///
/// let arena = AstArena::new();
/// let lang = arena.alloc_str("rust");
/// assert_eq!(lang, "rust");
/// ```
#[derive(Default)]
pub struct AstArena {
    bump: Bump,
}

impl AstArena {
    /// Creates a new arena allocator.
    #[inline]
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Creates an arena sized for roughly `source_len` bytes of markdown.
    #[inline]
    pub fn for_source(source_len: usize) -> Self {
        Self {
            bump: Bump::with_capacity(source_len.saturating_mul(2)),
        }
    }

    /// Allocates a value in the arena and returns a reference to it.
    #[inline]
    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    /// Allocates a string slice in the arena.
    #[inline]
    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    /// Allocates a slice by copying from the input slice.
    #[inline]
    pub fn alloc_slice_copy<T: Copy>(&self, slice: &[T]) -> &[T] {
        self.bump.alloc_slice_copy(slice)
    }

    /// Allocates a slice from an exact-size iterator.
    #[inline]
    pub fn alloc_slice_fill_iter<T, I>(&self, iter: I) -> &[T]
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        self.bump.alloc_slice_fill_iter(iter)
    }

    /// Returns the total bytes allocated in this arena.
    #[inline]
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}
