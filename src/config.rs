//! Build Configuration
//!
//! The set of syscalls the shim answers depends on the target architecture
//! and on the feature-test macros the hosted C runtime was compiled with.
//! Both are captured here as plain values so that table construction is an
//! ordinary function of its inputs.

use bitflags::bitflags;

/// Target architecture families with a Linux syscall numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    /// 32-bit x86 (ARCH_IA32)
    Ia32,
    /// 32-bit ARM, EABI numbering
    Aarch32,
    /// x86-64
    X86_64,
    /// AArch64 (asm-generic numbering)
    Aarch64,
}

impl Arch {
    /// Every supported architecture.
    pub const ALL: [Arch; 4] = [Arch::Ia32, Arch::Aarch32, Arch::X86_64, Arch::Aarch64];

    /// Architecture this crate is being compiled for, if supported.
    pub const fn native() -> Option<Self> {
        if cfg!(target_arch = "x86") {
            Some(Self::Ia32)
        } else if cfg!(target_arch = "arm") {
            Some(Self::Aarch32)
        } else if cfg!(target_arch = "x86_64") {
            Some(Self::X86_64)
        } else if cfg!(target_arch = "aarch64") {
            Some(Self::Aarch64)
        } else {
            None
        }
    }

    /// Short name as used in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ia32 => "ia32",
            Self::Aarch32 => "aarch32",
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        }
    }
}

impl core::fmt::Display for Arch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Feature-test switches of the hosted C runtime.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Features: u32 {
        /// `_BSD_SOURCE` is defined
        const BSD_SOURCE = 1 << 0;
        /// `_XOPEN_SOURCE` is defined and below 500
        const XOPEN_LEGACY = 1 << 1;
        /// Bind the old-style `sigaction` where the architecture has one
        const LEGACY_SIGACTION = 1 << 2;
    }
}

impl Features {
    /// Features selected through cargo features.
    pub const fn from_build() -> Self {
        let mut bits = 0;
        if cfg!(feature = "bsd-source") {
            bits |= Self::BSD_SOURCE.bits();
        }
        if cfg!(feature = "xopen-legacy") {
            bits |= Self::XOPEN_LEGACY.bits();
        }
        if cfg!(feature = "legacy-sigaction") {
            bits |= Self::LEGACY_SIGACTION.bits();
        }
        Self::from_bits_truncate(bits)
    }

    /// Translate a numeric `_XOPEN_SOURCE` level (`None` if undefined).
    pub const fn from_xopen_source(level: Option<u32>) -> Self {
        match level {
            Some(level) if level < 500 => Self::XOPEN_LEGACY,
            _ => Self::empty(),
        }
    }
}

/// Everything the registry needs to decide which slots to populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub arch: Arch,
    pub features: Features,
}

impl Config {
    pub const fn new(arch: Arch, features: Features) -> Self {
        Self { arch, features }
    }

    /// Configuration of the current build, if the target is supported.
    pub const fn native() -> Option<Self> {
        match Arch::native() {
            Some(arch) => Some(Self::new(arch, Features::from_build())),
            None => None,
        }
    }

    /// Same configuration with `features` added.
    pub const fn with(self, features: Features) -> Self {
        Self::new(self.arch, self.features.union(features))
    }

    /// Same configuration with `features` removed.
    pub const fn without(self, features: Features) -> Self {
        Self::new(self.arch, self.features.difference(features))
    }
}
