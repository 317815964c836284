// Descriptor wallet library extending bitcoin & miniscript functionality
// by LNP/BP Association (https://lnp-bp.org)
// Written in 2020-2022 by
//     Dr. Maxim Orlovsky <orlovsky@pandoracore.com>
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the Apache-2.0 License
// along with this software.
// If not, see <https://opensource.org/licenses/Apache-2.0>.

//! Lazily derived attributes computed at most once.

use std::cell::{Cell, OnceCell};

/// Cache slot for a lazily derived attribute.
///
/// The first call to [`Memo::get_or_derive`] runs the derivation and caches
/// its result, including the absence of a value; later calls return the
/// cached result. Derivations may read other slots, so attributes form a
/// dependency graph evaluated depth-first on demand.
///
/// # Panics
///
/// Re-entering a slot while its own derivation is running means the
/// attributes depend on each other cyclically; this is a programming error
/// and panics with a message naming the slot.
#[derive(Clone, Debug)]
pub struct Memo<T> {
    field: &'static str,
    value: OnceCell<Option<T>>,
    deriving: Cell<bool>,
}

impl<T> Memo<T> {
    /// Constructs empty slot for a named attribute
    pub fn new(field: &'static str) -> Self {
        Memo {
            field,
            value: OnceCell::new(),
            deriving: Cell::new(false),
        }
    }

    /// Returns cached value, running `derive` if the slot was not evaluated
    /// yet.
    pub fn get_or_derive(&self, derive: impl FnOnce() -> Option<T>) -> Option<&T> {
        if let Some(value) = self.value.get() {
            return value.as_ref();
        }
        if self.deriving.replace(true) {
            panic!("cyclic derivation of `{}`", self.field);
        }
        log::trace!("deriving `{}`", self.field);
        let value = derive();
        self.deriving.set(false);
        self.value.get_or_init(|| value).as_ref()
    }

    /// Detects whether the slot was already evaluated
    #[inline]
    pub fn is_evaluated(&self) -> bool { self.value.get().is_some() }
}
