//! Edit buffer controller
//!
//! Reconciles one asynchronously loaded remote message with one locally
//! edited value. The buffer is seeded from the remote record exactly once,
//! on the edge where the record first becomes available; later refreshes
//! never overwrite what the user is typing.
//!
//! Saving is split in two so edits are never blocked by the network:
//! [`EditBufferController::submit`] validates and hands back an owned
//! [`PendingSave`], and [`EditBufferController::complete`] applies whatever
//! that save resolved to.

use thiserror::Error;

use crate::models::{exceeds_message_limit, message_length, CommunityRecord, RecordSnapshot};
use crate::notify::{Notification, NotificationSink};
use crate::services::{SaveError, SaveRequest, SaveService};

/// Payload of the notification emitted after a successful save.
pub const SAVED_MESSAGE: &str = "Saved!";

/// Inline text shown while the length flag is set.
pub const LENGTH_ERROR_MESSAGE: &str = "Custom login messages should be under 280 characters.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// No record has arrived yet
    Uninitialized,
    /// Buffer populated, nothing in flight
    Ready,
    /// At least one save is in flight
    Submitting,
}

/// Local, not-yet-persisted edit state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub message_value: Option<String>,
    pub message_length_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", LENGTH_ERROR_MESSAGE)]
    MessageTooLong { length: usize },
}

/// Why the message field cannot be used right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldUnavailable {
    #[error("community record has not loaded yet")]
    NotLoaded,
    #[error("branded login is disabled for this community")]
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Unavailable(#[from] FieldUnavailable),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Edge detector for the absent -> present transition of the remote record.
///
/// Fires at most once per controller, no matter how often the record
/// disappears and comes back afterwards.
#[derive(Debug, Default)]
pub struct RecordArrival {
    was_present: bool,
    fired: bool,
}

impl RecordArrival {
    /// Feed the current presence; returns true only on the first arrival edge.
    pub fn observe(&mut self, is_present: bool) -> bool {
        let edge = !self.was_present && is_present && !self.fired;
        self.was_present = is_present;
        if edge {
            self.fired = true;
        }
        edge
    }

    pub const fn has_fired(&self) -> bool {
        self.fired
    }
}

/// Result of one save round trip, carrying the payload that was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCompletion {
    pub request: SaveRequest,
    pub result: Result<(), SaveError>,
}

/// A save that has been validated and issued but not yet run.
///
/// Owns everything it needs, so the controller stays free for edits while
/// the returned future is awaited elsewhere.
#[must_use = "a pending save does nothing until it is run"]
#[derive(Debug)]
pub struct PendingSave<S> {
    service: S,
    request: SaveRequest,
}

impl<S: SaveService> PendingSave<S> {
    pub const fn request(&self) -> &SaveRequest {
        &self.request
    }

    /// Run the save to completion. There is no cancellation.
    pub async fn run(self) -> SaveCompletion {
        let result = self.service.save(&self.request).await;
        SaveCompletion {
            request: self.request,
            result,
        }
    }
}

pub struct EditBufferController<S, N> {
    save: S,
    sink: N,
    arrival: RecordArrival,
    record: Option<CommunityRecord>,
    buffer: EditBuffer,
    in_flight: usize,
}

impl<S, N> EditBufferController<S, N>
where
    S: SaveService + Clone,
    N: NotificationSink,
{
    pub fn new(save: S, sink: N) -> Self {
        Self {
            save,
            sink,
            arrival: RecordArrival::default(),
            record: None,
            buffer: EditBuffer::default(),
            in_flight: 0,
        }
    }

    pub const fn state(&self) -> ControllerState {
        if !self.arrival.has_fired() {
            ControllerState::Uninitialized
        } else if self.in_flight > 0 {
            ControllerState::Submitting
        } else {
            ControllerState::Ready
        }
    }

    pub const fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// Latest record observed from the remote source
    pub const fn record(&self) -> Option<&CommunityRecord> {
        self.record.as_ref()
    }

    /// Number of saves issued but not yet completed
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_enabled(&self) -> bool {
        self.record
            .as_ref()
            .is_some_and(|record| record.branded_login.is_enabled)
    }

    /// Take in the latest remote snapshot.
    ///
    /// The stored record always tracks the snapshot so the enabled flag and
    /// id stay current, but the buffer is only seeded on the arrival edge. A
    /// finished load without a record drops the stored record, which makes
    /// the field unavailable until a record shows up again.
    pub fn observe(&mut self, snapshot: &RecordSnapshot) {
        if self.arrival.observe(snapshot.has_record()) {
            if let Some(record) = &snapshot.record {
                tracing::debug!("Initializing edit buffer from community {}", record.id);
                self.buffer = EditBuffer {
                    message_value: record.branded_login.message.clone(),
                    message_length_error: false,
                };
            }
        }
        match &snapshot.record {
            Some(record) => self.record = Some(record.clone()),
            None if !snapshot.is_loading => self.record = None,
            None => {}
        }
    }

    /// Replace the buffer with newly typed text and re-validate it.
    pub fn edit(&mut self, text: impl Into<String>) -> Result<(), FieldUnavailable> {
        self.ensure_available()?;
        let text = text.into();
        self.buffer.message_length_error = exceeds_message_limit(&text);
        self.buffer.message_value = Some(text);
        Ok(())
    }

    /// Validate the buffer and issue a save for it.
    ///
    /// A too-long message sets the length flag and issues nothing.
    pub fn submit(&mut self) -> Result<PendingSave<S>, SubmitError> {
        self.ensure_available()?;
        let Some(record) = self.record.as_ref() else {
            return Err(FieldUnavailable::NotLoaded.into());
        };

        if let Some(message) = self.buffer.message_value.as_deref() {
            if exceeds_message_limit(message) {
                let length = message_length(message);
                tracing::debug!("Rejecting login message of {} characters", length);
                self.buffer.message_length_error = true;
                return Err(ValidationError::MessageTooLong { length }.into());
            }
        }

        let request = SaveRequest {
            id: record.id.clone(),
            message: self.buffer.message_value.clone(),
        };
        self.in_flight += 1;
        tracing::info!("Saving branded login message for community {}", request.id);

        Ok(PendingSave {
            service: self.save.clone(),
            request,
        })
    }

    /// Apply the outcome of a save issued by [`Self::submit`].
    ///
    /// Both outcomes clear the length flag, even if the buffer was edited
    /// past the limit while the save was in flight. The buffer text itself is
    /// never touched.
    pub fn complete(&mut self, completion: SaveCompletion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.buffer.message_length_error = false;

        match completion.result {
            Ok(()) => {
                tracing::info!("Saved branded login message for {}", completion.request.id);
                self.sink.notify(Notification::success(SAVED_MESSAGE));
            }
            Err(error) => {
                tracing::error!(
                    "Failed to save branded login message for {}: {}",
                    completion.request.id,
                    error
                );
                self.sink.notify(Notification::error(error.detail()));
            }
        }
    }

    /// Submit and wait for the result in one step.
    ///
    /// Holds the controller for the whole round trip; interactive front ends
    /// should use [`Self::submit`] and [`Self::complete`] instead.
    pub async fn save_now(&mut self) -> Result<Result<(), SaveError>, SubmitError> {
        let pending = self.submit()?;
        let completion = pending.run().await;
        let result = completion.result.clone();
        self.complete(completion);
        Ok(result)
    }

    fn ensure_available(&self) -> Result<(), FieldUnavailable> {
        match &self.record {
            None => Err(FieldUnavailable::NotLoaded),
            Some(_) if !self.arrival.has_fired() => Err(FieldUnavailable::NotLoaded),
            Some(record) if !record.branded_login.is_enabled => Err(FieldUnavailable::Disabled),
            Some(_) => Ok(()),
        }
    }
}
