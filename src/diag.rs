//! Syscall Failure Diagnostics
//!
//! Reports syscalls that end in ENOSYS on the kernel debug console.
//!
//! # Constraints
//! - May run before any allocator exists: fixed stack buffer only
//! - Output goes one character at a time through an infallible primitive
//! - Long messages are truncated, never an error
//! - Whether to print is a runtime `DiagnosticsMode`; `from_build` picks it
//!   from the `debug-build` feature, and `Silent` prints nothing

use core::fmt::{self, Write};

/// Size of the message buffer, terminator included.
pub const MESSAGE_CAPACITY: usize = 100;

/// Prefix identifying this library on a shared debug console.
const MESSAGE_PREFIX: &str = "libsel4muslcsys";

/// Single-character output primitive (e.g. `seL4_DebugPutChar`).
///
/// Implementations must not fail and must not block indefinitely.
pub trait PutChar {
    fn put_char(&self, c: u8);
}

impl<P: PutChar + ?Sized> PutChar for &P {
    fn put_char(&self, c: u8) {
        (**self).put_char(c)
    }
}

/// Receives the number of every syscall that failed with ENOSYS.
pub trait Reporter {
    fn report(&self, number: isize);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, number: isize) {
        (**self).report(number)
    }
}

/// Whether failures are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticsMode {
    /// Print a line per failure (debug builds)
    Verbose,
    /// Print nothing
    Silent,
}

impl DiagnosticsMode {
    /// Mode selected by the `debug-build` cargo feature.
    pub const fn from_build() -> Self {
        if cfg!(feature = "debug-build") {
            Self::Verbose
        } else {
            Self::Silent
        }
    }
}

/// Fixed-size, truncating text buffer.
///
/// Keeps one byte in reserve like a C string buffer, so at most
/// `N - 1` bytes of text are stored.
pub struct MessageBuffer<const N: usize = MESSAGE_CAPACITY> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> MessageBuffer<N> {
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
        }
    }

    /// Stored text.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once no further byte fits.
    pub fn is_full(&self) -> bool {
        self.len + 1 >= N
    }
}

impl<const N: usize> Default for MessageBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Write for MessageBuffer<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = N.saturating_sub(1).saturating_sub(self.len);
        let take = s.len().min(room);
        self.bytes[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        // Dropping the tail is not an error
        Ok(())
    }
}

/// Format `args` plus a newline into a fixed buffer, truncating.
pub fn format_line(args: fmt::Arguments<'_>) -> MessageBuffer {
    let mut buf = MessageBuffer::new();
    let _ = writeln!(buf, "{}", args);
    buf
}

/// Format the failure line for `number`.
pub fn format_failure(number: isize) -> MessageBuffer {
    format_line(format_args!(
        "{}: Error attempting syscall {}",
        MESSAGE_PREFIX, number
    ))
}

fn emit<P: PutChar + ?Sized>(console: &P, line: &MessageBuffer) {
    for &c in line.as_bytes() {
        console.put_char(c);
    }
}

/// Print one line on `console`, regardless of any logger or mode.
///
/// For failures that happen before a logger can exist.
pub fn write_line<P: PutChar + ?Sized>(console: &P, args: fmt::Arguments<'_>) {
    emit(console, &format_line(args));
}

/// Reporter printing to a debug console.
pub struct ConsoleReporter<P> {
    console: P,
    mode: DiagnosticsMode,
}

impl<P: PutChar> ConsoleReporter<P> {
    pub const fn new(console: P, mode: DiagnosticsMode) -> Self {
        Self { console, mode }
    }

    /// Reporter in the mode chosen at build time.
    pub const fn from_build(console: P) -> Self {
        Self::new(console, DiagnosticsMode::from_build())
    }

    pub fn mode(&self) -> DiagnosticsMode {
        self.mode
    }
}

impl<P: PutChar> Reporter for ConsoleReporter<P> {
    fn report(&self, number: isize) {
        if self.mode == DiagnosticsMode::Silent {
            return;
        }
        emit(&self.console, &format_failure(number));
    }
}

/// Reporter that drops every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _number: isize) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use std::vec::Vec;

    #[derive(Default)]
    struct Capture(RefCell<Vec<u8>>);

    impl PutChar for Capture {
        fn put_char(&self, c: u8) {
            self.0.borrow_mut().push(c);
        }
    }

    #[test]
    fn test_message_format() {
        assert_eq!(
            format_failure(4).as_bytes(),
            b"libsel4muslcsys: Error attempting syscall 4\n"
        );
        assert_eq!(
            format_failure(-7).as_bytes(),
            b"libsel4muslcsys: Error attempting syscall -7\n"
        );
    }

    #[test]
    fn test_buffer_truncates() {
        let mut buf = MessageBuffer::<8>::new();
        assert!(write!(buf, "0123456789").is_ok());
        assert_eq!(buf.as_bytes(), b"0123456");
        assert!(buf.is_full());
        assert!(write!(buf, "more").is_ok());
        assert_eq!(buf.len(), 7);
    }

    #[test]
    fn test_zero_sized_buffer() {
        let mut buf = MessageBuffer::<0>::new();
        assert!(write!(buf, "x").is_ok());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_extreme_number_fits() {
        let line = format_failure(isize::MIN);
        assert!(line.len() < MESSAGE_CAPACITY);
        assert!(line.as_bytes().ends_with(b"\n"));
    }

    #[test]
    fn test_verbose_emits_every_byte() {
        let capture = Capture::default();
        let reporter = ConsoleReporter::new(&capture, DiagnosticsMode::Verbose);
        reporter.report(500);
        assert_eq!(
            capture.0.borrow().as_slice(),
            b"libsel4muslcsys: Error attempting syscall 500\n"
        );
    }

    #[test]
    fn test_silent_emits_nothing() {
        let capture = Capture::default();
        let reporter = ConsoleReporter::new(&capture, DiagnosticsMode::Silent);
        for nr in [-1, 0, 4, 500] {
            reporter.report(nr);
        }
        assert!(capture.0.borrow().is_empty());
    }

    #[test]
    fn test_write_line_reaches_console() {
        let capture = Capture::default();
        write_line(&capture, format_args!("vsyscall: {}", "table already installed"));
        assert_eq!(
            capture.0.borrow().as_slice(),
            b"vsyscall: table already installed\n"
        );
    }

    #[test]
    fn test_write_line_truncates() {
        let capture = Capture::default();
        let long = [b'x'; 300];
        let text = core::str::from_utf8(&long).unwrap_or_default();
        write_line(&capture, format_args!("{}", text));
        assert_eq!(capture.0.borrow().len(), MESSAGE_CAPACITY - 1);
        assert!(capture.0.borrow().iter().all(|&c| c == b'x'));
    }

    #[test]
    fn test_build_mode() {
        let expected = if cfg!(feature = "debug-build") {
            DiagnosticsMode::Verbose
        } else {
            DiagnosticsMode::Silent
        };
        assert_eq!(DiagnosticsMode::from_build(), expected);
        assert_eq!(ConsoleReporter::from_build(&Capture::default()).mode(), expected);
    }
}
