//! System Call Numbers
//!
//! The syscalls the shim knows about, their Linux number on each
//! architecture, and the predicate deciding whether a build binds them.
//!
//! Numbering follows the kernel ABI headers the hosted C runtime is compiled
//! against. A `None` number means the architecture has no such syscall and
//! the slot can never be populated there.

use crate::config::{Arch, Config, Features};

/// Number of slots in a syscall table.
///
/// Must stay above the highest number any architecture assigns to a known
/// syscall; checked at compile time below.
pub const TABLE_CAPACITY: usize = 512;

/// A syscall the shim can route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sysno {
    SetThreadArea,
    SetTidAddress,
    Writev,
    SchedYield,
    Exit,
    RtSigprocmask,
    Gettid,
    Getpid,
    Getppid,
    Tgkill,
    ExitGroup,
    Close,
    Read,
    Ioctl,
    Prlimit64,
    Brk,
    Mmap,
    Mmap2,
    Madvise,
    Mremap,
    Mincore,
    Pause,
    Munmap,
    ClockGettime,
    Newselect,
    Sigaction,
    RtSigaction,
    Uname,
    Sethostname,
    Setdomainname,
    Socket,
    Bind,
    Connect,
    Listen,
    Accept,
    Setsockopt,
    Fcntl64,
    Write,
    Tkill,
}

impl Sysno {
    /// Every known syscall, in table order.
    pub const ALL: [Sysno; 39] = [
        Sysno::SetThreadArea,
        Sysno::SetTidAddress,
        Sysno::Writev,
        Sysno::SchedYield,
        Sysno::Exit,
        Sysno::RtSigprocmask,
        Sysno::Gettid,
        Sysno::Getpid,
        Sysno::Getppid,
        Sysno::Tgkill,
        Sysno::ExitGroup,
        Sysno::Close,
        Sysno::Read,
        Sysno::Ioctl,
        Sysno::Prlimit64,
        Sysno::Brk,
        Sysno::Mmap,
        Sysno::Mmap2,
        Sysno::Madvise,
        Sysno::Mremap,
        Sysno::Mincore,
        Sysno::Pause,
        Sysno::Munmap,
        Sysno::ClockGettime,
        Sysno::Newselect,
        Sysno::Sigaction,
        Sysno::RtSigaction,
        Sysno::Uname,
        Sysno::Sethostname,
        Sysno::Setdomainname,
        Sysno::Socket,
        Sysno::Bind,
        Sysno::Connect,
        Sysno::Listen,
        Sysno::Accept,
        Sysno::Setsockopt,
        Sysno::Fcntl64,
        Sysno::Write,
        Sysno::Tkill,
    ];

    /// Kernel name, also the handler symbol suffix (`sys_<name>`)
    pub const fn name(self) -> &'static str {
        match self {
            Self::SetThreadArea => "set_thread_area",
            Self::SetTidAddress => "set_tid_address",
            Self::Writev => "writev",
            Self::SchedYield => "sched_yield",
            Self::Exit => "exit",
            Self::RtSigprocmask => "rt_sigprocmask",
            Self::Gettid => "gettid",
            Self::Getpid => "getpid",
            Self::Getppid => "getppid",
            Self::Tgkill => "tgkill",
            Self::ExitGroup => "exit_group",
            Self::Close => "close",
            Self::Read => "read",
            Self::Ioctl => "ioctl",
            Self::Prlimit64 => "prlimit64",
            Self::Brk => "brk",
            Self::Mmap => "mmap",
            Self::Mmap2 => "mmap2",
            Self::Madvise => "madvise",
            Self::Mremap => "mremap",
            Self::Mincore => "mincore",
            Self::Pause => "pause",
            Self::Munmap => "munmap",
            Self::ClockGettime => "clock_gettime",
            Self::Newselect => "_newselect",
            Self::Sigaction => "sigaction",
            Self::RtSigaction => "rt_sigaction",
            Self::Uname => "uname",
            Self::Sethostname => "sethostname",
            Self::Setdomainname => "setdomainname",
            Self::Socket => "socket",
            Self::Bind => "bind",
            Self::Connect => "connect",
            Self::Listen => "listen",
            Self::Accept => "accept",
            Self::Setsockopt => "setsockopt",
            Self::Fcntl64 => "fcntl64",
            Self::Write => "write",
            Self::Tkill => "tkill",
        }
    }

    /// Number of argument words the syscall consumes.
    pub const fn arity(self) -> usize {
        match self {
            Self::SchedYield | Self::Gettid | Self::Getpid | Self::Getppid | Self::Pause => 0,
            Self::SetThreadArea
            | Self::SetTidAddress
            | Self::Exit
            | Self::ExitGroup
            | Self::Close
            | Self::Brk
            | Self::Uname => 1,
            Self::ClockGettime
            | Self::Munmap
            | Self::Sethostname
            | Self::Setdomainname
            | Self::Listen
            | Self::Tkill => 2,
            Self::Writev
            | Self::Tgkill
            | Self::Read
            | Self::Write
            | Self::Ioctl
            | Self::Madvise
            | Self::Mincore
            | Self::Sigaction
            | Self::Socket
            | Self::Bind
            | Self::Connect
            | Self::Accept
            | Self::Fcntl64 => 3,
            Self::RtSigprocmask | Self::Prlimit64 | Self::RtSigaction => 4,
            Self::Mremap | Self::Newselect | Self::Setsockopt => 5,
            Self::Mmap | Self::Mmap2 => 6,
        }
    }

    /// Linux syscall number on `arch`.
    pub const fn number(self, arch: Arch) -> Option<usize> {
        match arch {
            Arch::Ia32 => ia32::number(self),
            Arch::Aarch32 => aarch32::number(self),
            Arch::X86_64 => x86_64::number(self),
            Arch::Aarch64 => aarch64::number(self),
        }
    }

    /// Whether a build with `config` binds this syscall.
    ///
    /// A syscall the architecture does not number is never enabled.
    pub const fn is_enabled(self, config: &Config) -> bool {
        if self.number(config.arch).is_none() {
            return false;
        }
        match self {
            Self::Sigaction => config.features.contains(Features::LEGACY_SIGACTION),
            Self::Sethostname | Self::Setdomainname => config
                .features
                .intersects(Features::BSD_SOURCE.union(Features::XOPEN_LEGACY)),
            Self::Socket
            | Self::Bind
            | Self::Connect
            | Self::Listen
            | Self::Accept
            | Self::Setsockopt => !matches!(config.arch, Arch::Ia32),
            _ => true,
        }
    }

    /// Syscall assigned `number` on `arch`, if any.
    pub fn from_number(arch: Arch, number: usize) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|sysno| sysno.number(arch) == Some(number))
    }
}

impl core::fmt::Display for Sysno {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// 32-bit x86
mod ia32 {
    use super::Sysno;

    pub const fn number(sysno: Sysno) -> Option<usize> {
        let nr = match sysno {
            Sysno::Exit => 1,
            Sysno::Read => 3,
            Sysno::Write => 4,
            Sysno::Close => 6,
            Sysno::Getpid => 20,
            Sysno::Pause => 29,
            Sysno::Brk => 45,
            Sysno::Ioctl => 54,
            Sysno::Getppid => 64,
            Sysno::Sigaction => 67,
            Sysno::Sethostname => 74,
            Sysno::Mmap => 90,
            Sysno::Munmap => 91,
            Sysno::Setdomainname => 121,
            Sysno::Uname => 122,
            Sysno::Newselect => 142,
            Sysno::Writev => 146,
            Sysno::SchedYield => 158,
            Sysno::Mremap => 163,
            Sysno::RtSigaction => 174,
            Sysno::RtSigprocmask => 175,
            Sysno::Mmap2 => 192,
            Sysno::Mincore => 218,
            Sysno::Madvise => 219,
            Sysno::Fcntl64 => 221,
            Sysno::Gettid => 224,
            Sysno::Tkill => 238,
            Sysno::SetThreadArea => 243,
            Sysno::ExitGroup => 252,
            Sysno::SetTidAddress => 258,
            Sysno::ClockGettime => 265,
            Sysno::Tgkill => 270,
            Sysno::Prlimit64 => 340,
            Sysno::Socket => 359,
            Sysno::Bind => 361,
            Sysno::Connect => 362,
            Sysno::Listen => 363,
            Sysno::Setsockopt => 366,
            // only accept4 exists
            Sysno::Accept => return None,
        };
        Some(nr)
    }
}

/// 32-bit ARM, EABI
mod aarch32 {
    use super::Sysno;

    pub const fn number(sysno: Sysno) -> Option<usize> {
        let nr = match sysno {
            Sysno::Exit => 1,
            Sysno::Read => 3,
            Sysno::Write => 4,
            Sysno::Close => 6,
            Sysno::Getpid => 20,
            Sysno::Pause => 29,
            Sysno::Brk => 45,
            Sysno::Ioctl => 54,
            Sysno::Getppid => 64,
            Sysno::Sigaction => 67,
            Sysno::Sethostname => 74,
            Sysno::Munmap => 91,
            Sysno::Setdomainname => 121,
            Sysno::Uname => 122,
            Sysno::Newselect => 142,
            Sysno::Writev => 146,
            Sysno::SchedYield => 158,
            Sysno::Mremap => 163,
            Sysno::RtSigaction => 174,
            Sysno::RtSigprocmask => 175,
            Sysno::Mmap2 => 192,
            Sysno::Mincore => 219,
            Sysno::Madvise => 220,
            Sysno::Fcntl64 => 221,
            Sysno::Gettid => 224,
            Sysno::Tkill => 238,
            Sysno::ExitGroup => 248,
            Sysno::SetTidAddress => 256,
            Sysno::ClockGettime => 263,
            Sysno::Tgkill => 268,
            Sysno::Socket => 281,
            Sysno::Bind => 282,
            Sysno::Connect => 283,
            Sysno::Listen => 284,
            Sysno::Accept => 285,
            Sysno::Setsockopt => 294,
            Sysno::Prlimit64 => 369,
            // EABI dropped old mmap; TLS goes through __ARM_NR_set_tls
            Sysno::Mmap | Sysno::SetThreadArea => return None,
        };
        Some(nr)
    }
}

mod x86_64 {
    use super::Sysno;

    pub const fn number(sysno: Sysno) -> Option<usize> {
        let nr = match sysno {
            Sysno::Read => 0,
            Sysno::Write => 1,
            Sysno::Close => 3,
            Sysno::Mmap => 9,
            Sysno::Munmap => 11,
            Sysno::Brk => 12,
            Sysno::RtSigaction => 13,
            Sysno::RtSigprocmask => 14,
            Sysno::Ioctl => 16,
            Sysno::Writev => 20,
            Sysno::SchedYield => 24,
            Sysno::Mremap => 25,
            Sysno::Mincore => 27,
            Sysno::Madvise => 28,
            Sysno::Pause => 34,
            Sysno::Getpid => 39,
            Sysno::Socket => 41,
            Sysno::Connect => 42,
            Sysno::Accept => 43,
            Sysno::Bind => 49,
            Sysno::Listen => 50,
            Sysno::Setsockopt => 54,
            Sysno::Exit => 60,
            Sysno::Uname => 63,
            Sysno::Getppid => 110,
            Sysno::Sethostname => 170,
            Sysno::Setdomainname => 171,
            Sysno::Gettid => 186,
            Sysno::Tkill => 200,
            Sysno::SetThreadArea => 205,
            Sysno::SetTidAddress => 218,
            Sysno::ClockGettime => 228,
            Sysno::ExitGroup => 231,
            Sysno::Tgkill => 234,
            Sysno::Prlimit64 => 302,
            Sysno::Mmap2 | Sysno::Newselect | Sysno::Sigaction | Sysno::Fcntl64 => return None,
        };
        Some(nr)
    }
}

/// AArch64 uses the asm-generic table, which has no legacy entry points.
mod aarch64 {
    use super::Sysno;

    pub const fn number(sysno: Sysno) -> Option<usize> {
        let nr = match sysno {
            Sysno::Ioctl => 29,
            Sysno::Close => 57,
            Sysno::Read => 63,
            Sysno::Write => 64,
            Sysno::Writev => 66,
            Sysno::Exit => 93,
            Sysno::ExitGroup => 94,
            Sysno::SetTidAddress => 96,
            Sysno::ClockGettime => 113,
            Sysno::SchedYield => 124,
            Sysno::Tkill => 130,
            Sysno::Tgkill => 131,
            Sysno::RtSigaction => 134,
            Sysno::RtSigprocmask => 135,
            Sysno::Uname => 160,
            Sysno::Sethostname => 161,
            Sysno::Setdomainname => 162,
            Sysno::Getpid => 172,
            Sysno::Getppid => 173,
            Sysno::Gettid => 178,
            Sysno::Socket => 198,
            Sysno::Bind => 200,
            Sysno::Listen => 201,
            Sysno::Accept => 202,
            Sysno::Connect => 203,
            Sysno::Setsockopt => 208,
            Sysno::Brk => 214,
            Sysno::Munmap => 215,
            Sysno::Mremap => 216,
            Sysno::Mmap => 222,
            Sysno::Mincore => 232,
            Sysno::Madvise => 233,
            Sysno::Prlimit64 => 261,
            Sysno::SetThreadArea
            | Sysno::Mmap2
            | Sysno::Pause
            | Sysno::Newselect
            | Sysno::Sigaction
            | Sysno::Fcntl64 => return None,
        };
        Some(nr)
    }
}

/// Check that every number on `arch` fits the table and is used once.
const fn numbering_is_sound(arch: Arch) -> bool {
    let mut i = 0;
    while i < Sysno::ALL.len() {
        if let Some(nr) = Sysno::ALL[i].number(arch) {
            if nr >= TABLE_CAPACITY {
                return false;
            }
            let mut j = i + 1;
            while j < Sysno::ALL.len() {
                if let Some(other) = Sysno::ALL[j].number(arch) {
                    if other == nr {
                        return false;
                    }
                }
                j += 1;
            }
        }
        i += 1;
    }
    true
}

const _: () = {
    let mut i = 0;
    while i < Arch::ALL.len() {
        assert!(
            numbering_is_sound(Arch::ALL[i]),
            "syscall numbering out of range or duplicated"
        );
        i += 1;
    }
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_numbers() {
        assert_eq!(Sysno::Read.number(Arch::X86_64), Some(0));
        assert_eq!(Sysno::Write.number(Arch::X86_64), Some(1));
        assert_eq!(Sysno::Read.number(Arch::Ia32), Some(3));
        assert_eq!(Sysno::Mmap2.number(Arch::Aarch32), Some(192));
        assert_eq!(Sysno::Write.number(Arch::Aarch64), Some(64));
    }

    #[test]
    fn test_arch_specific_gaps() {
        assert_eq!(Sysno::Pause.number(Arch::Aarch64), None);
        assert_eq!(Sysno::Mmap.number(Arch::Aarch32), None);
        assert_eq!(Sysno::Mmap2.number(Arch::X86_64), None);
        assert_eq!(Sysno::SetThreadArea.number(Arch::Aarch64), None);
    }

    #[test]
    fn test_numbering_sound_everywhere() {
        for arch in Arch::ALL {
            assert!(numbering_is_sound(arch), "{arch}");
        }
    }

    #[test]
    fn test_from_number_round_trip() {
        for arch in Arch::ALL {
            for sysno in Sysno::ALL {
                if let Some(nr) = sysno.number(arch) {
                    assert_eq!(Sysno::from_number(arch, nr), Some(sysno));
                }
            }
        }
        assert_eq!(Sysno::from_number(Arch::X86_64, 2), None);
    }

    #[test]
    fn test_sockets_disabled_on_ia32() {
        let ia32 = Config::new(Arch::Ia32, Features::all());
        let aarch32 = Config::new(Arch::Aarch32, Features::empty());
        for sysno in [
            Sysno::Socket,
            Sysno::Bind,
            Sysno::Connect,
            Sysno::Listen,
            Sysno::Setsockopt,
        ] {
            assert!(!sysno.is_enabled(&ia32));
            assert!(sysno.is_enabled(&aarch32));
        }
    }

    #[test]
    fn test_hostname_gated_by_feature_test() {
        let plain = Config::new(Arch::X86_64, Features::empty());
        assert!(!Sysno::Sethostname.is_enabled(&plain));
        assert!(Sysno::Sethostname.is_enabled(&plain.with(Features::BSD_SOURCE)));
        assert!(Sysno::Setdomainname.is_enabled(&plain.with(Features::XOPEN_LEGACY)));
    }

    #[test]
    fn test_sigaction_needs_opt_in() {
        let ia32 = Config::new(Arch::Ia32, Features::BSD_SOURCE);
        assert!(!Sysno::Sigaction.is_enabled(&ia32));
        assert!(Sysno::Sigaction.is_enabled(&ia32.with(Features::LEGACY_SIGACTION)));
        let x86_64 = Config::new(Arch::X86_64, Features::LEGACY_SIGACTION);
        assert!(!Sysno::Sigaction.is_enabled(&x86_64));
    }

    #[test]
    fn test_arity_within_args() {
        for sysno in Sysno::ALL {
            assert!(sysno.arity() <= crate::syscall::MAX_SYSCALL_ARGS);
        }
    }
}
