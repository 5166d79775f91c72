//! Syscall Handler Registry
//!
//! A fixed-capacity table from syscall number to handler.
//!
//! # Design
//! - Built once from a `Config` and a `Handlers` provider, then only read
//! - Slots for syscalls the configuration does not enable stay empty
//! - Numbering is checked at compile time, so building cannot fail

use crate::config::Config;

use super::args::Handler;
use super::numbers::{Sysno, TABLE_CAPACITY};

/// Source of handler implementations, one per syscall.
///
/// The registry asks only for syscalls enabled by the configuration.
pub trait Handlers {
    fn handler(&self, sysno: Sysno) -> Handler;
}

impl<F> Handlers for F
where
    F: Fn(Sysno) -> Handler,
{
    fn handler(&self, sysno: Sysno) -> Handler {
        self(sysno)
    }
}

/// Error type for manual registry assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The number does not fit in the table.
    OutOfRange(usize),
    /// A handler is already bound to the number.
    AlreadyBound(usize),
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfRange(nr) => write!(f, "syscall {} beyond table capacity", nr),
            Self::AlreadyBound(nr) => write!(f, "syscall {} already has a handler", nr),
        }
    }
}

/// Lookup table of syscall handlers.
pub struct Registry<const N: usize = TABLE_CAPACITY> {
    slots: [Option<Handler>; N],
}

impl Registry<TABLE_CAPACITY> {
    /// Build the table for `config`.
    ///
    /// Every syscall enabled under `config` gets the handler `handlers`
    /// supplies for it; every other slot stays empty. Performs no I/O,
    /// logging included.
    pub fn build<H>(config: &Config, handlers: &H) -> Self
    where
        H: Handlers + ?Sized,
    {
        let mut registry = Self::empty();
        for sysno in Sysno::ALL {
            if !sysno.is_enabled(config) {
                continue;
            }
            let Some(nr) = sysno.number(config.arch) else {
                continue;
            };
            // In range for every arch, see numbers::numbering_is_sound
            if let Some(slot) = registry.slots.get_mut(nr) {
                *slot = Some(handlers.handler(sysno));
            }
        }
        registry
    }
}

impl<const N: usize> Registry<N> {
    /// A table with no handlers.
    pub const fn empty() -> Self {
        Self { slots: [None; N] }
    }

    /// Bind `handler` to `number`.
    pub fn bind(&mut self, number: usize, handler: Handler) -> Result<(), RegistryError> {
        let slot = self
            .slots
            .get_mut(number)
            .ok_or(RegistryError::OutOfRange(number))?;
        if slot.is_some() {
            return Err(RegistryError::AlreadyBound(number));
        }
        *slot = Some(handler);
        Ok(())
    }

    /// Builder form of [`Registry::bind`].
    pub fn with(mut self, number: usize, handler: Handler) -> Result<Self, RegistryError> {
        self.bind(number, handler)?;
        Ok(self)
    }

    /// Number of slots, bound or not.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Handler bound to `number`, if any.
    #[inline]
    pub fn get(&self, number: usize) -> Option<Handler> {
        self.slots.get(number).copied().flatten()
    }

    #[inline]
    pub fn is_bound(&self, number: usize) -> bool {
        self.get(number).is_some()
    }

    /// Numbers with a handler, ascending.
    pub fn bound_numbers(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(nr, slot)| slot.map(|_| nr))
    }

    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

impl<const N: usize> core::fmt::Debug for Registry<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("capacity", &N)
            .field("bound", &self.bound_count())
            .finish()
    }
}
