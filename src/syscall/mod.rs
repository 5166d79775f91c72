//! System Call Routing
//!
//! Maps Linux syscall numbers issued by the hosted C runtime onto the
//! handlers that implement them on top of the microkernel.
//!
//! # Model
//! - Default deny: only numbers with a bound handler reach any code
//! - The table is built once per configuration and never mutated
//! - Argument values are not inspected here, only the number
//!
//! # Layout
//! - `numbers`: known syscalls, per-arch numbering, enable predicates
//! - `registry`: the number -> handler table
//! - `handler`: the dispatcher

mod args;
mod handler;
pub mod numbers;
mod registry;

pub use args::{Handler, SyscallArgs, MAX_SYSCALL_ARGS};
pub use handler::Dispatcher;
pub use numbers::{Sysno, TABLE_CAPACITY};
pub use registry::{Handlers, Registry, RegistryError};
