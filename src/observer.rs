//! Post-commit observers
//!
//! Stores call [`notify_all`] after every successful persist. Observers are
//! best-effort side channels (markdown export and the like): a failing
//! observer is logged and skipped, never retried, and never rolls back the
//! mutation that triggered it.

use tracing::warn;

/// Which document was just rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitEvent {
    /// The task document changed
    TasksChanged,
    /// The interruption state document changed
    FocusChanged,
}

pub trait CommitObserver {
    /// Name used in failure logs
    fn name(&self) -> &str;

    fn notify(&self, event: CommitEvent) -> anyhow::Result<()>;
}

/// Invoke every observer, isolating failures: one observer erroring must not
/// keep the rest from running.
pub fn notify_all(observers: &[Box<dyn CommitObserver>], event: CommitEvent) {
    for observer in observers {
        if let Err(e) = observer.notify(event) {
            warn!("Observer {} failed on {:?}: {}", observer.name(), event, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counting {
        calls: Rc<Cell<u32>>,
    }

    impl CommitObserver for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn notify(&self, _event: CommitEvent) -> anyhow::Result<()> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    struct Failing;

    impl CommitObserver for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn notify(&self, _event: CommitEvent) -> anyhow::Result<()> {
            anyhow::bail!("observer is broken")
        }
    }

    #[test]
    fn test_failure_does_not_block_later_observers() {
        let calls = Rc::new(Cell::new(0));
        let observers: Vec<Box<dyn CommitObserver>> = vec![
            Box::new(Failing),
            Box::new(Counting {
                calls: Rc::clone(&calls),
            }),
        ];

        notify_all(&observers, CommitEvent::TasksChanged);
        notify_all(&observers, CommitEvent::FocusChanged);

        assert_eq!(calls.get(), 2);
    }
}
