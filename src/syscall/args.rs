//! Syscall arguments and handler signature

/// Maximum number of argument words a Linux syscall takes.
pub const MAX_SYSCALL_ARGS: usize = 6;

/// Argument words of one syscall, forwarded verbatim to the handler.
///
/// Slots past the syscall's arity are zero when built by the entry point,
/// but handlers must not rely on their content.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyscallArgs {
    words: [usize; MAX_SYSCALL_ARGS],
}

impl SyscallArgs {
    pub const fn new(words: [usize; MAX_SYSCALL_ARGS]) -> Self {
        Self { words }
    }

    /// Build from a prefix, zero-filling the remaining slots.
    ///
    /// Words beyond `MAX_SYSCALL_ARGS` are dropped.
    pub fn from_slice(prefix: &[usize]) -> Self {
        let mut words = [0; MAX_SYSCALL_ARGS];
        for (slot, &word) in words.iter_mut().zip(prefix) {
            *slot = word;
        }
        Self { words }
    }

    /// Argument `index`, or 0 when out of range.
    #[inline]
    pub fn get(&self, index: usize) -> usize {
        self.words.get(index).copied().unwrap_or(0)
    }

    /// The first `arity` words.
    #[inline]
    pub fn used(&self, arity: usize) -> &[usize] {
        &self.words[..arity.min(MAX_SYSCALL_ARGS)]
    }

    #[inline]
    pub fn as_array(&self) -> &[usize; MAX_SYSCALL_ARGS] {
        &self.words
    }
}

/// A syscall implementation.
///
/// Returns the result, or `-errno` on failure.
pub type Handler = fn(&SyscallArgs) -> isize;
