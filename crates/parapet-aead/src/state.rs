// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Lifecycle shared by every engine.

use crate::error::AeadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    KeyUnset,
    Idle,
    InMessage,
}

/// Tracks `KeyUnset → Idle ⇄ InMessage` and rejects out-of-order calls.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lifecycle {
    phase: Phase,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            phase: Phase::KeyUnset,
        }
    }
}

impl Lifecycle {
    pub fn has_key(&self) -> bool {
        self.phase != Phase::KeyUnset
    }

    pub fn keyed(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn unkeyed(&mut self) {
        self.phase = Phase::KeyUnset;
    }

    /// Back to `Idle` if keyed; no-op otherwise.
    pub fn end_message(&mut self) {
        if self.has_key() {
            self.phase = Phase::Idle;
        }
    }

    /// Key set and no message in flight.
    pub fn check_idle(&self) -> Result<(), AeadError> {
        match self.phase {
            Phase::KeyUnset => Err(AeadError::KEY_NOT_SET),
            Phase::InMessage => Err(AeadError::InvalidState(
                "operation not allowed while a message is in progress",
            )),
            Phase::Idle => Ok(()),
        }
    }

    pub fn check_in_message(&self) -> Result<(), AeadError> {
        match self.phase {
            Phase::KeyUnset => Err(AeadError::KEY_NOT_SET),
            Phase::Idle => Err(AeadError::InvalidState("no message started")),
            Phase::InMessage => Ok(()),
        }
    }

    /// `Idle → InMessage`.
    pub fn begin_message(&mut self) -> Result<(), AeadError> {
        self.check_idle()?;
        self.phase = Phase::InMessage;
        Ok(())
    }
}
