//! Two-step confirmation for destructive or irreversible commands.
//!
//! A command is first proposed, which parks it under a single-use token; it
//! only executes once the token is confirmed. This keeps prompts out of the
//! engine while making both halves testable.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ConfirmError;

/// Single-use handle for a proposed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfirmToken(u64);

impl ConfirmToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConfirmToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registry of actions waiting for confirmation.
#[derive(Debug, Clone)]
pub struct Confirmations<A> {
    pending: BTreeMap<ConfirmToken, A>,
    next_token: u64,
}

impl<A> Default for Confirmations<A> {
    fn default() -> Self {
        Self {
            pending: BTreeMap::new(),
            next_token: 1,
        }
    }
}

impl<A> Confirmations<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park an action and hand back its token.
    pub fn propose(&mut self, action: A) -> ConfirmToken {
        let token = ConfirmToken(self.next_token);
        self.next_token += 1;
        self.pending.insert(token, action);
        token
    }

    /// Park an action unless an equal one is already waiting, in which case
    /// its existing token is returned.
    pub fn propose_or_reuse(&mut self, action: A) -> ConfirmToken
    where
        A: PartialEq,
    {
        match self.find(|pending| *pending == action) {
            Some(token) => token,
            None => self.propose(action),
        }
    }

    /// Token of the oldest pending action matching the predicate.
    pub fn find(&self, mut predicate: impl FnMut(&A) -> bool) -> Option<ConfirmToken> {
        self.pending
            .iter()
            .find(|(_, action)| predicate(action))
            .map(|(token, _)| *token)
    }

    /// Redeem a token, returning the action to execute.
    pub fn confirm(&mut self, token: ConfirmToken) -> Result<A, ConfirmError> {
        self.pending
            .remove(&token)
            .ok_or(ConfirmError::UnknownToken(token.0))
    }

    /// Withdraw a proposal. Returns the action if it was pending.
    pub fn cancel(&mut self, token: ConfirmToken) -> Option<A> {
        self.pending.remove(&token)
    }

    /// Drop every pending proposal matching the predicate.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&A) -> bool) {
        self.pending.retain(|_, action| !predicate(action));
    }

    pub fn is_pending(&self, token: ConfirmToken) -> bool {
        self.pending.contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
