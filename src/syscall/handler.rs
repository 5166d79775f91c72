//! System Call Dispatcher
//!
//! Routes a syscall number to its registered handler.
//!
//! # Behaviour
//! - Negative or out-of-table numbers return ENOSYS
//! - Numbers without a bound handler return ENOSYS
//! - Handler results are passed through untouched
//! - Every ENOSYS outcome is reported, including one coming from the handler
//!   itself; callers cannot tell the two apart from the return value
//! - Never panics: every path yields a return value

use crate::diag::Reporter;
use crate::errno::ENOSYS_RET;

use super::args::SyscallArgs;
use super::numbers::TABLE_CAPACITY;
use super::registry::Registry;

/// Dispatches syscalls against a registry.
pub struct Dispatcher<'r, R, const N: usize = TABLE_CAPACITY> {
    registry: &'r Registry<N>,
    reporter: R,
}

impl<'r, R: Reporter, const N: usize> Dispatcher<'r, R, N> {
    pub const fn new(registry: &'r Registry<N>, reporter: R) -> Self {
        Self { registry, reporter }
    }

    #[inline]
    pub fn registry(&self) -> &'r Registry<N> {
        self.registry
    }

    #[inline]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Dispatch a system call
    ///
    /// # Arguments
    /// * `number` - System call number as passed by the C runtime
    /// * `args` - Argument words, forwarded verbatim
    ///
    /// # Returns
    /// The handler's result, or `-ENOSYS`
    pub fn dispatch(&self, number: isize, args: &SyscallArgs) -> isize {
        let handler = usize::try_from(number)
            .ok()
            .and_then(|nr| self.registry.get(nr));

        let Some(handler) = handler else {
            self.reporter.report(number);
            return ENOSYS_RET;
        };

        let ret = handler(args);
        if ret == ENOSYS_RET {
            self.reporter.report(number);
        }
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{ConsoleReporter, DiagnosticsMode, PutChar};
    use core::cell::{Cell, RefCell};
    use std::vec::Vec;

    /// Records every reported number in order.
    #[derive(Default)]
    struct Recorder(RefCell<Vec<isize>>);

    impl Recorder {
        fn calls(&self) -> Vec<isize> {
            self.0.borrow().clone()
        }
    }

    impl Reporter for Recorder {
        fn report(&self, number: isize) {
            self.0.borrow_mut().push(number);
        }
    }

    #[derive(Default)]
    struct Capture(RefCell<Vec<u8>>);

    impl PutChar for Capture {
        fn put_char(&self, c: u8) {
            self.0.borrow_mut().push(c);
        }
    }

    fn read(_: &SyscallArgs) -> isize {
        42
    }

    fn declines(_: &SyscallArgs) -> isize {
        ENOSYS_RET
    }

    /// -EBADF
    fn bad_fd(_: &SyscallArgs) -> isize {
        -9
    }

    fn sum(args: &SyscallArgs) -> isize {
        args.as_array().iter().sum::<usize>() as isize
    }

    std::thread_local! {
        static CALLS: Cell<usize> = Cell::new(0);
    }

    fn counted(_: &SyscallArgs) -> isize {
        CALLS.with(|c| c.set(c.get() + 1));
        0
    }

    fn scenario() -> Registry<400> {
        let mut registry = Registry::<400>::empty();
        assert!(registry.bind(3, read).is_ok());
        assert!(registry.bind(5, declines).is_ok());
        assert!(registry.bind(9, bad_fd).is_ok());
        assert!(registry.bind(10, sum).is_ok());
        assert!(registry.bind(11, counted).is_ok());
        registry
    }

    #[test]
    fn test_bound_handler_result() {
        let registry = scenario();
        let recorder = Recorder::default();
        let dispatcher = Dispatcher::new(&registry, &recorder);

        assert_eq!(dispatcher.dispatch(3, &SyscallArgs::default()), 42);
        assert_eq!(dispatcher.dispatch(3, &SyscallArgs::new([7; 6])), 42);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_unbound_number() {
        let registry = scenario();
        let recorder = Recorder::default();
        let dispatcher = Dispatcher::new(&registry, &recorder);

        assert_eq!(dispatcher.dispatch(4, &SyscallArgs::default()), ENOSYS_RET);
        assert_eq!(recorder.calls(), [4]);
    }

    #[test]
    fn test_out_of_range_numbers() {
        let registry = scenario();
        let recorder = Recorder::default();
        let dispatcher = Dispatcher::new(&registry, &recorder);

        for nr in [500, 400, -1, isize::MIN, isize::MAX] {
            assert_eq!(dispatcher.dispatch(nr, &SyscallArgs::default()), ENOSYS_RET);
        }
        assert_eq!(recorder.calls(), [500, 400, -1, isize::MIN, isize::MAX]);
    }

    #[test]
    fn test_last_slot_in_range() {
        let registry = Registry::<400>::empty().with(399, read).ok();
        let Some(registry) = registry else {
            panic!("slot 399 should bind");
        };
        let recorder = Recorder::default();
        let dispatcher = Dispatcher::new(&registry, &recorder);

        assert_eq!(dispatcher.dispatch(399, &SyscallArgs::default()), 42);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_handler_declines() {
        let registry = scenario();
        let recorder = Recorder::default();
        let dispatcher = Dispatcher::new(&registry, &recorder);

        assert_eq!(dispatcher.dispatch(5, &SyscallArgs::default()), ENOSYS_RET);
        assert_eq!(recorder.calls(), [5]);
    }

    #[test]
    fn test_other_errors_not_reported() {
        let registry = scenario();
        let recorder = Recorder::default();
        let dispatcher = Dispatcher::new(&registry, &recorder);

        assert_eq!(dispatcher.dispatch(9, &SyscallArgs::default()), -9);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_args_forwarded_verbatim() {
        let registry = scenario();
        let dispatcher = Dispatcher::new(&registry, crate::diag::NullReporter);

        let args = SyscallArgs::from_slice(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(dispatcher.dispatch(10, &args), 21);
    }

    #[test]
    fn test_single_invocation() {
        let registry = scenario();
        let dispatcher = Dispatcher::new(&registry, crate::diag::NullReporter);

        CALLS.with(|c| c.set(0));
        dispatcher.dispatch(11, &SyscallArgs::default());
        assert_eq!(CALLS.with(Cell::get), 1);
        dispatcher.dispatch(12, &SyscallArgs::default());
        assert_eq!(CALLS.with(Cell::get), 1);
    }

    #[test]
    fn test_report_order_distinguishes_decline() {
        let registry = scenario();
        let recorder = Recorder::default();
        let dispatcher = Dispatcher::new(&registry, &recorder);

        let unbound = dispatcher.dispatch(4, &SyscallArgs::default());
        let declined = dispatcher.dispatch(5, &SyscallArgs::default());
        assert_eq!(unbound, declined);
        assert_eq!(recorder.calls(), [4, 5]);
    }

    #[test]
    fn test_console_output_per_mode() {
        let registry = scenario();

        let verbose = Capture::default();
        let dispatcher = Dispatcher::new(
            &registry,
            ConsoleReporter::new(&verbose, DiagnosticsMode::Verbose),
        );
        assert_eq!(dispatcher.dispatch(3, &SyscallArgs::default()), 42);
        assert!(verbose.0.borrow().is_empty());
        assert_eq!(dispatcher.dispatch(4, &SyscallArgs::default()), ENOSYS_RET);
        assert_eq!(
            verbose.0.borrow().as_slice(),
            b"libsel4muslcsys: Error attempting syscall 4\n"
        );

        let silent = Capture::default();
        let dispatcher = Dispatcher::new(
            &registry,
            ConsoleReporter::new(&silent, DiagnosticsMode::Silent),
        );
        assert_eq!(dispatcher.dispatch(3, &SyscallArgs::default()), 42);
        assert_eq!(dispatcher.dispatch(4, &SyscallArgs::default()), ENOSYS_RET);
        assert_eq!(dispatcher.dispatch(5, &SyscallArgs::default()), ENOSYS_RET);
        assert_eq!(dispatcher.dispatch(500, &SyscallArgs::default()), ENOSYS_RET);
        assert!(silent.0.borrow().is_empty());
    }
}
