//! Bindings to the Hosted Runtime
//!
//! The syscall bodies live in the C runtime as `long sys_<name>(const
//! SyscallArgs *)`; the debug console is the kernel's `seL4_DebugPutChar`.
//! Both are resolved at link time.
//!
//! With this feature on, the table is installed from `.init_array`, so it is
//! live before the runtime's first syscall, as a statically initialised table
//! would be.

use core::ffi::{c_char, c_long};

use crate::diag::{self, PutChar};
use crate::syscall::{Handler, Handlers, SyscallArgs, Sysno};
use crate::vsyscall::{self, PublishError, Vsyscall};

#[allow(non_snake_case)]
mod kernel {
    use core::ffi::c_char;

    extern "C" {
        pub fn seL4_DebugPutChar(c: c_char);
    }
}

/// The kernel debug console.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugConsole;

impl PutChar for DebugConsole {
    fn put_char(&self, c: u8) {
        // SAFETY: seL4_DebugPutChar takes any byte and has no preconditions
        unsafe { kernel::seL4_DebugPutChar(c as c_char) }
    }
}

pub static DEBUG_CONSOLE: DebugConsole = DebugConsole;

macro_rules! extern_handlers {
    ($($sysno:ident => $sym:ident),* $(,)?) => {
        #[allow(non_snake_case)]
        mod c {
            use super::{c_long, SyscallArgs};

            extern "C" {
                $(pub fn $sym(args: *const SyscallArgs) -> c_long;)*
            }
        }

        #[allow(non_snake_case)]
        mod shim {
            use super::SyscallArgs;

            $(
                pub fn $sym(args: &SyscallArgs) -> isize {
                    // SAFETY: the runtime's handlers only read the argument
                    // block, which outlives the call
                    unsafe { super::c::$sym(args) as isize }
                }
            )*
        }

        impl Handlers for ExternHandlers {
            fn handler(&self, sysno: Sysno) -> Handler {
                match sysno {
                    $(Sysno::$sysno => shim::$sym,)*
                }
            }
        }
    };
}

/// Handler set resolving every syscall to the runtime's `sys_*` symbol.
///
/// Only symbols for syscalls enabled by the build end up referenced.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternHandlers;

extern_handlers! {
    SetThreadArea => sys_set_thread_area,
    SetTidAddress => sys_set_tid_address,
    Writev => sys_writev,
    SchedYield => sys_sched_yield,
    Exit => sys_exit,
    RtSigprocmask => sys_rt_sigprocmask,
    Gettid => sys_gettid,
    Getpid => sys_getpid,
    Getppid => sys_getppid,
    Tgkill => sys_tgkill,
    ExitGroup => sys_exit_group,
    Close => sys_close,
    Read => sys_read,
    Ioctl => sys_ioctl,
    Prlimit64 => sys_prlimit64,
    Brk => sys_brk,
    Mmap => sys_mmap,
    Mmap2 => sys_mmap2,
    Madvise => sys_madvise,
    Mremap => sys_mremap,
    Mincore => sys_mincore,
    Pause => sys_pause,
    Munmap => sys_munmap,
    ClockGettime => sys_clock_gettime,
    Newselect => sys__newselect,
    Sigaction => sys_sigaction,
    RtSigaction => sys_rt_sigaction,
    Uname => sys_uname,
    Sethostname => sys_sethostname,
    Setdomainname => sys_setdomainname,
    Socket => sys_socket,
    Bind => sys_bind,
    Connect => sys_connect,
    Listen => sys_listen,
    Accept => sys_accept,
    Setsockopt => sys_setsockopt,
    Fcntl64 => sys_fcntl64,
    Write => sys_write,
    Tkill => sys_tkill,
}

/// Install the runtime's handlers with the build's own configuration.
pub fn install() -> Result<&'static Vsyscall, PublishError> {
    vsyscall::install_native(&ExternHandlers, &DEBUG_CONSOLE)
}

extern "C" fn init_vsyscall() {
    if let Err(err) = install() {
        // No logger can be installed this early
        diag::write_line(&DEBUG_CONSOLE, format_args!("vsyscall: {}", err));
    }
}

#[used]
#[cfg_attr(
    any(target_os = "none", target_os = "linux"),
    link_section = ".init_array"
)]
static INIT_VSYSCALL: extern "C" fn() = init_vsyscall;
