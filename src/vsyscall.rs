//! Vsyscall Entry Point and Discovery
//!
//! The hosting loader finds the syscall entry of this library by scanning
//! the `__vsyscall` section for the `__vsyscall_ptr` word and wires it into
//! the C runtime as its syscall instruction replacement.
//!
//! # Lifecycle
//! - `__vsyscall_ptr` is fixed at link time and never written
//! - `install` builds the handler table exactly once; later calls fail
//! - Until `install` completes, every syscall returns ENOSYS
//!
//! The loader must not issue syscalls before initialization has run; this
//! module adds no ordering of its own beyond `spin::Once`.

use core::ffi::c_long;

use spin::Once;

use crate::config::Config;
use crate::diag::{ConsoleReporter, DiagnosticsMode, PutChar};
use crate::errno::ENOSYS_RET;
use crate::syscall::{Dispatcher, Handlers, Registry, SyscallArgs, Sysno};

/// C signature of the entry point.
///
/// Callers using the variadic `long (*)(long, ...)` prototype pass integer
/// arguments in the same registers on the supported targets.
pub type VsyscallFn = extern "C" fn(c_long, usize, usize, usize, usize, usize, usize) -> c_long;

/// Console handle shared by the installed reporter.
pub type Console = &'static (dyn PutChar + Sync);

/// The word the loader looks for: the address of [`sel4_vsyscall`].
///
/// Same size and layout as `uintptr_t`.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct DiscoveryDescriptor(VsyscallFn);

impl DiscoveryDescriptor {
    #[inline]
    pub const fn entry(&self) -> VsyscallFn {
        self.0
    }

    /// Address as the loader sees it.
    #[inline]
    pub fn addr(&self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Debug for DiscoveryDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "DiscoveryDescriptor({:#x})", self.addr())
    }
}

/// Published entry point. Name and section are part of the loader ABI.
#[used]
#[no_mangle]
#[allow(non_upper_case_globals)]
#[cfg_attr(not(target_vendor = "apple"), link_section = "__vsyscall")]
pub static __vsyscall_ptr: DiscoveryDescriptor = DiscoveryDescriptor(sel4_vsyscall);

/// Error type for installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// A table was already installed; it stays in place.
    AlreadyInstalled,
    /// The build target has no known syscall numbering.
    UnsupportedArch,
}

impl core::fmt::Display for PublishError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AlreadyInstalled => write!(f, "vsyscall table already installed"),
            Self::UnsupportedArch => write!(f, "no syscall numbering for this architecture"),
        }
    }
}

/// The installed syscall table and its failure reporter.
pub struct Vsyscall {
    config: Config,
    registry: Registry,
    reporter: ConsoleReporter<Console>,
}

impl Vsyscall {
    /// Dispatch one syscall against the installed table.
    #[inline]
    pub fn dispatch(&self, number: isize, args: &SyscallArgs) -> isize {
        Dispatcher::new(&self.registry, &self.reporter).dispatch(number, args)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn mode(&self) -> DiagnosticsMode {
        self.reporter.mode()
    }
}

static VSYSCALL: Once<Vsyscall> = Once::new();

/// Build the syscall table for `config` and make it live.
///
/// # Errors
/// `AlreadyInstalled` if a table is already live; the existing one is kept.
pub fn install<H>(
    config: Config,
    handlers: &H,
    console: Console,
    mode: DiagnosticsMode,
) -> Result<&'static Vsyscall, PublishError>
where
    H: Handlers + ?Sized,
{
    let mut fresh = false;
    let vsyscall = VSYSCALL.call_once(|| {
        fresh = true;
        Vsyscall {
            config,
            registry: Registry::build(&config, handlers),
            reporter: ConsoleReporter::new(console, mode),
        }
    });
    if !fresh {
        return Err(PublishError::AlreadyInstalled);
    }

    log::info!(
        "vsyscall: {} handlers installed for {} ({:?}), entry at {:?}",
        vsyscall.registry.bound_count(),
        config.arch,
        config.features,
        __vsyscall_ptr
    );
    for nr in vsyscall.registry.bound_numbers() {
        log::trace!(
            "vsyscall: {} -> sys_{}",
            nr,
            Sysno::from_number(config.arch, nr).map_or("?", Sysno::name)
        );
    }
    Ok(vsyscall)
}

/// [`install`] with the build's own architecture, features and mode.
pub fn install_native<H>(handlers: &H, console: Console) -> Result<&'static Vsyscall, PublishError>
where
    H: Handlers + ?Sized,
{
    let config = Config::native().ok_or(PublishError::UnsupportedArch)?;
    install(config, handlers, console, DiagnosticsMode::from_build())
}

/// The live table, once installed.
pub fn installed() -> Option<&'static Vsyscall> {
    VSYSCALL.get()
}

/// Entry point as published to the loader.
pub fn entry_point() -> VsyscallFn {
    __vsyscall_ptr.entry()
}

/// Syscall entry called by the hosted C runtime.
///
/// # Returns
/// The handler's result or a negative errno, never unwinds
#[no_mangle]
pub extern "C" fn sel4_vsyscall(
    sysnum: c_long,
    a0: usize,
    a1: usize,
    a2: usize,
    a3: usize,
    a4: usize,
    a5: usize,
) -> c_long {
    let args = SyscallArgs::new([a0, a1, a2, a3, a4, a5]);
    match VSYSCALL.get() {
        Some(vsyscall) => vsyscall.dispatch(sysnum as isize, &args) as c_long,
        None => {
            log::warn!("vsyscall: syscall {} before install", sysnum);
            ENOSYS_RET as c_long
        }
    }
}
