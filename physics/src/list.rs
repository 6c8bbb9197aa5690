//! Intrusive doubly-linked lists threaded through arena-owned entities.
//!
//! Every linkable entity embeds a [`Link`] and exposes it through [`Linked`].
//! An [`IntrusiveList`] only stores its id, the head handle, a count and a
//! capacity; the entities themselves live in an [`Arena`] owned by someone
//! else, and the list never allocates or frees them.
//!
//! Traversal uses a [`Cursor`], a copyable position in the chain. Erasing via
//! [`IntrusiveList::erase`] hands back a cursor to the following element, so
//! `cursor = list.erase(arena, cursor)?` is always safe while iterating. Any
//! other cursor still pointing at the erased entity is dangling; using it
//! yields `None` or [`ListError::StaleHandle`] once the entity is freed, but
//! before that it silently walks a detached node.
//!
//! All entity kinds (bodies, fixtures, contacts, joints and both edge kinds)
//! use the same handle cursor, fixtures included.

use crate::{
    arena::{Arena, Handle},
    error::ListError,
};
use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::warn;

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of one list, stamped into the links of the entities it holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListId(u64);

impl ListId {
    fn next() -> Self {
        ListId(NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The `{prev, next}` pair embedded in a linkable entity, plus the list that
/// currently holds it. `prev` and `next` are both `None` for the only element
/// of a list, so membership is tracked by `owner` alone.
pub struct Link<T> {
    prev: Option<Handle<T>>,
    next: Option<Handle<T>>,
    owner: Option<ListId>,
}

impl<T> Link<T> {
    pub fn prev(&self) -> Option<Handle<T>> {
        self.prev
    }

    pub fn next(&self) -> Option<Handle<T>> {
        self.next
    }

    pub fn owner(&self) -> Option<ListId> {
        self.owner
    }

    pub fn is_detached(&self) -> bool {
        self.owner.is_none()
    }
}

impl<T> Default for Link<T> {
    fn default() -> Self {
        Self {
            prev: None,
            next: None,
            owner: None,
        }
    }
}

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Link<T> {}

impl<T> PartialEq for Link<T> {
    fn eq(&self, other: &Self) -> bool {
        self.prev == other.prev && self.next == other.next && self.owner == other.owner
    }
}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("prev", &self.prev)
            .field("next", &self.next)
            .field("owner", &self.owner)
            .finish()
    }
}

/// Link accessor: how a list finds the `{prev, next}` pair inside a node.
pub trait Linked: Sized {
    fn link(&self) -> &Link<Self>;
    fn link_mut(&mut self) -> &mut Link<Self>;
}

fn link_mut<T: Linked>(
    arena: &mut Arena<T>,
    handle: Handle<T>,
) -> Result<&mut Link<T>, ListError> {
    arena
        .get_mut(handle)
        .map(Linked::link_mut)
        .ok_or(ListError::StaleHandle)
}

pub struct IntrusiveList<T> {
    id: ListId,
    head: Option<Handle<T>>,
    count: usize,
    max_size: usize,
}

impl<T> IntrusiveList<T> {
    pub fn bounded(max_size: usize) -> Self {
        Self {
            id: ListId::next(),
            head: None,
            count: 0,
            max_size,
        }
    }

    /// Edge lists are bounded by how many relationships reference a body, not
    /// by configuration.
    pub fn unbounded() -> Self {
        Self::bounded(usize::MAX)
    }

    pub fn begin(&self) -> Cursor<T> {
        Cursor {
            current: self.head,
        }
    }

    pub fn end(&self) -> Cursor<T> {
        Cursor { current: None }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn front(&self) -> Option<Handle<T>> {
        self.head
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.max_size
    }
}

impl<T: Linked> IntrusiveList<T> {
    /// Links `handle` at the head. Rejected without touching the list when the
    /// list is full or the entity is already linked into any list.
    pub fn push_front(&mut self, arena: &mut Arena<T>, handle: Handle<T>) -> Result<(), ListError> {
        if self.is_full() {
            warn!(max_size = self.max_size, "push_front rejected, list is full");
            return Err(ListError::CapacityExceeded {
                max_size: self.max_size,
            });
        }

        let node = arena.get(handle).ok_or(ListError::StaleHandle)?;
        if !node.link().is_detached() {
            return Err(ListError::AlreadyLinked);
        }

        if let Some(old_head) = self.head {
            link_mut(arena, old_head)
                .map_err(|_| ListError::Corrupt("head is stale"))?
                .prev = Some(handle);
        }

        let link = link_mut(arena, handle)?;
        link.prev = None;
        link.next = self.head;
        link.owner = Some(self.id);

        self.head = Some(handle);
        self.count += 1;
        Ok(())
    }

    pub fn pop_front(&mut self, arena: &mut Arena<T>) -> Result<Handle<T>, ListError> {
        let head = self.head.ok_or(ListError::Empty)?;
        self.erase(arena, Cursor::at(head))?;
        Ok(head)
    }

    /// Unlinks the entity under `pos` in O(1) and returns a cursor to the
    /// entity that followed it. Fails with [`ListError::NotLinked`] unless the
    /// entity is linked into this list.
    pub fn erase(&mut self, arena: &mut Arena<T>, pos: Cursor<T>) -> Result<Cursor<T>, ListError> {
        let handle = pos.current.ok_or(ListError::EndCursor)?;
        let link = *arena.get(handle).ok_or(ListError::StaleHandle)?.link();

        if link.owner != Some(self.id) {
            return Err(ListError::NotLinked);
        }
        if self.count == 0 {
            return Err(ListError::Corrupt("linked entity in an empty list"));
        }
        if link.prev.is_none() && self.head != Some(handle) {
            return Err(ListError::Corrupt("unlinked predecessor of a non-head"));
        }
        if link.prev.map_or(false, |prev| !arena.contains(prev))
            || link.next.map_or(false, |next| !arena.contains(next))
        {
            return Err(ListError::Corrupt("neighbour is stale"));
        }

        match link.prev {
            Some(prev) => link_mut(arena, prev)?.next = link.next,
            None => self.head = link.next,
        }
        if let Some(next) = link.next {
            link_mut(arena, next)?.prev = link.prev;
        }

        *link_mut(arena, handle)? = Link::default();
        self.count -= 1;

        Ok(Cursor { current: link.next })
    }

    pub fn remove(&mut self, arena: &mut Arena<T>, handle: Handle<T>) -> Result<(), ListError> {
        self.erase(arena, Cursor::at(handle)).map(|_| ())
    }

    pub fn iter<'a>(&self, arena: &'a Arena<T>) -> Iter<'a, T> {
        Iter {
            arena,
            current: self.head,
            remaining: self.count,
        }
    }

    /// Linear scan.
    pub fn contains(&self, arena: &Arena<T>, handle: Handle<T>) -> bool {
        self.iter(arena).any(|(h, _)| h == handle)
    }

    /// Detaches every entity without freeing any of them.
    pub fn unlink_all(&mut self, arena: &mut Arena<T>) {
        let mut current = self.head;
        while let Some(handle) = current {
            match arena.get_mut(handle) {
                Some(node) => {
                    current = node.link().next;
                    *node.link_mut() = Link::default();
                }
                None => break,
            }
        }
        self.head = None;
        self.count = 0;
    }

    /// Walks the whole chain and checks that it is acyclic, that every `prev`
    /// mirrors the `next` that led to it and that `count` matches.
    pub fn validate(&self, arena: &Arena<T>) -> Result<(), ListError> {
        if self.count > self.max_size {
            return Err(ListError::Corrupt("count exceeds max_size"));
        }

        let mut prev = None;
        let mut seen = 0;
        let mut current = self.head;
        while let Some(handle) = current {
            if seen == self.count {
                return Err(ListError::Corrupt("chain is longer than count"));
            }
            let link = arena.get(handle).ok_or(ListError::StaleHandle)?.link();
            if link.prev != prev {
                return Err(ListError::Corrupt("prev does not mirror next"));
            }
            if link.owner != Some(self.id) {
                return Err(ListError::Corrupt("entity is stamped with another list"));
            }
            prev = Some(handle);
            current = link.next;
            seen += 1;
        }

        if seen != self.count {
            return Err(ListError::Corrupt("chain is shorter than count"));
        }
        Ok(())
    }
}

// Lists model the identity of a live collection, so equality compares heads
// rather than contents.
impl<T> PartialEq for IntrusiveList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> fmt::Debug for IntrusiveList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrusiveList")
            .field("head", &self.head)
            .field("count", &self.count)
            .field("max_size", &self.max_size)
            .finish()
    }
}

/// A position in an intrusive chain; `None` is the end sentinel.
pub struct Cursor<T> {
    current: Option<Handle<T>>,
}

impl<T> Cursor<T> {
    pub fn at(handle: Handle<T>) -> Self {
        Self {
            current: Some(handle),
        }
    }

    pub fn handle(&self) -> Option<Handle<T>> {
        self.current
    }

    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }
}

impl<T: Linked> Cursor<T> {
    pub fn get<'a>(&self, arena: &'a Arena<T>) -> Option<&'a T> {
        arena.get(self.current?)
    }

    pub fn get_mut<'a>(&self, arena: &'a mut Arena<T>) -> Option<&'a mut T> {
        arena.get_mut(self.current?)
    }

    /// Pre-increment. A cursor whose entity has been freed moves to the end.
    pub fn move_next(&mut self, arena: &Arena<T>) -> &mut Self {
        self.current = self
            .current
            .and_then(|handle| arena.get(handle))
            .and_then(|node| node.link().next);
        self
    }

    /// Post-increment: advances and returns the cursor as it was before.
    pub fn post_move_next(&mut self, arena: &Arena<T>) -> Self {
        let prior = *self;
        self.move_next(arena);
        prior
    }

    pub fn next_cursor(&self, arena: &Arena<T>) -> Self {
        let mut next = *self;
        next.move_next(arena);
        next
    }
}

impl<T> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<T> {}

impl<T> PartialEq for Cursor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<T> Eq for Cursor<T> {}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.current {
            Some(handle) => write!(f, "Cursor({:?})", handle),
            None => write!(f, "Cursor(end)"),
        }
    }
}

pub struct Iter<'a, T> {
    arena: &'a Arena<T>,
    current: Option<Handle<T>>,
    remaining: usize,
}

impl<'a, T: Linked> Iterator for Iter<'a, T> {
    type Item = (Handle<T>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        // remaining bounds the walk even if the chain has been corrupted
        if self.remaining == 0 {
            return None;
        }
        let handle = self.current?;
        let node = self.arena.get(handle)?;
        self.current = node.link().next;
        self.remaining -= 1;
        Some((handle, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
