//! Linux errno values as seen by the hosted C runtime
//!
//! Handlers report failure by returning `-errno` in a signed machine word.
//! The numbering is the standard Linux one, which is identical for every
//! architecture this crate supports. The shim itself only ever produces
//! ENOSYS; every other code comes from a handler and is passed through.

/// Negative error returns produced by the shim
#[repr(isize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    /// Function not implemented
    Enosys = -38,
}

/// Positive value of ENOSYS.
pub const ENOSYS: isize = Errno::Enosys.code();

/// The value returned to the caller when a syscall has no implementation,
/// either because nothing is bound or because the handler declined.
pub const ENOSYS_RET: isize = Errno::Enosys.as_ret();

impl Errno {
    /// Raw return value (`-errno`)
    #[inline]
    pub const fn as_ret(self) -> isize {
        self as isize
    }

    /// Positive errno code
    #[inline]
    pub const fn code(self) -> isize {
        -(self as isize)
    }
}
