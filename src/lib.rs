//! panther-vsyscall - Linux Syscall Shim for Hosted C Runtimes
//!
//! Lets a C library written against the Linux syscall ABI (musl) run on a
//! seL4-style microkernel. Syscall instructions in the runtime are replaced
//! by calls into a single entry point, which routes each number to a
//! handler built on microkernel primitives or answers ENOSYS.
//!
//! # Components
//! - `syscall`: numbering, handler registry and dispatcher
//! - `diag`: debug-console report of failed syscalls
//! - `vsyscall`: the C entry point and its discovery word for the loader
//! - `config`: target architecture and feature-test switches
//! - `ffi`: bindings to the runtime's handlers (feature `sel4`)
//!
//! # Constraints
//! - No heap: usable before the runtime's allocator is up
//! - No panics on any syscall path
//! - Table contents are a pure function of the build configuration

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod diag;
pub mod errno;
#[cfg(feature = "sel4")]
pub mod ffi;
pub mod syscall;
pub mod vsyscall;

pub use config::{Arch, Config, Features};
pub use diag::{ConsoleReporter, DiagnosticsMode, NullReporter, PutChar, Reporter};
pub use errno::{Errno, ENOSYS, ENOSYS_RET};
pub use syscall::{Dispatcher, Handler, Handlers, Registry, SyscallArgs, Sysno};
pub use vsyscall::{install, install_native, sel4_vsyscall, PublishError};
