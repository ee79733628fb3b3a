/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

use std::cell::RefCell;
use std::rc::Rc;

/// A shared, nullable handle to the element remote audio is rendered into.
///
/// The UI layer owns the element and fills the reference in once it is mounted, the same way a
/// `NodeRef` works in yew. Clones share the same slot, and two references are "the same input"
/// for [`AudioBinding`](crate::AudioBinding) only if they share that slot.
pub struct AudioElementRef<E> {
    slot: Rc<RefCell<Option<E>>>,
}

impl<E> AudioElementRef<E> {
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    pub fn with_element(element: E) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(element))),
        }
    }

    pub fn set(&self, element: Option<E>) {
        *self.slot.borrow_mut() = element;
    }

    pub fn is_set(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// True if both handles share the same slot.
    pub fn same_ref(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<E: Clone> AudioElementRef<E> {
    /// The element currently in the slot, if any.
    pub fn current(&self) -> Option<E> {
        self.slot.borrow().clone()
    }
}

impl<E> Clone for AudioElementRef<E> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<E> Default for AudioElementRef<E> {
    fn default() -> Self {
        Self::new()
    }
}
