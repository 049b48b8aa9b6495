//! Settlement state shared by every handle to a promise.

use std::fmt;

/// A queued continuation. It receives the settled outcome and dispatches on
/// the branch itself.
pub(crate) type Reaction<T, E> = Box<dyn FnOnce(Result<T, E>) + Send>;

/// Tagged state of a promise. The reaction registry only exists while pending
/// and is moved out in one step when the promise settles.
pub(crate) enum State<T, E> {
    Pending(Vec<Reaction<T, E>>),
    Fulfilled(T),
    Rejected(E),
}

impl<T: Clone, E: Clone> State<T, E> {
    pub(crate) const fn new() -> Self {
        State::Pending(Vec::new())
    }

    /// Transitions to the terminal state matching `outcome`.
    ///
    /// Returns the reactions that were queued while pending, or `None` if the
    /// state was already terminal (in which case nothing changes).
    pub(crate) fn settle(&mut self, outcome: &Result<T, E>) -> Option<Vec<Reaction<T, E>>> {
        if !matches!(self, State::Pending(_)) {
            return None;
        }

        let terminal = match outcome {
            Ok(value) => State::Fulfilled(value.clone()),
            Err(reason) => State::Rejected(reason.clone()),
        };

        match std::mem::replace(self, terminal) {
            State::Pending(reactions) => Some(reactions),
            _ => None,
        }
    }

    /// Queues `reaction` while pending. Once settled the reaction is handed
    /// back together with the known outcome so the caller can run it outside
    /// of the lock.
    pub(crate) fn register(
        &mut self,
        reaction: Reaction<T, E>,
    ) -> Option<(Reaction<T, E>, Result<T, E>)> {
        match self {
            State::Pending(reactions) => {
                reactions.push(reaction);
                None
            }
            State::Fulfilled(value) => Some((reaction, Ok(value.clone()))),
            State::Rejected(reason) => Some((reaction, Err(reason.clone()))),
        }
    }

    pub(crate) fn outcome(&self) -> Option<Result<T, E>> {
        match self {
            State::Pending(_) => None,
            State::Fulfilled(value) => Some(Ok(value.clone())),
            State::Rejected(reason) => Some(Err(reason.clone())),
        }
    }
}

impl<T, E> State<T, E> {
    pub(crate) fn kind(&self) -> PromiseState {
        match self {
            State::Pending(_) => PromiseState::Pending,
            State::Fulfilled(_) => PromiseState::Fulfilled,
            State::Rejected(_) => PromiseState::Rejected,
        }
    }
}

/// Observable lifecycle stage of a [`Promise`](crate::Promise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromiseState {
    /// Not settled yet.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with a rejection reason.
    Rejected,
}

impl PromiseState {
    /// Returns `true` for both terminal states.
    pub fn is_settled(self) -> bool {
        !matches!(self, PromiseState::Pending)
    }
}

impl fmt::Display for PromiseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromiseState::Pending => f.write_str("pending"),
            PromiseState::Fulfilled => f.write_str("fulfilled"),
            PromiseState::Rejected => f.write_str("rejected"),
        }
    }
}
