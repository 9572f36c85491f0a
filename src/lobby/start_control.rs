//! The start control: whether it can be activated, and what it is bound to.

use tracing::{debug, instrument, trace};

use crate::protocol::OutboundEvent;

/// Identifies one binding of the start handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(u64);

/// Enable/bind state of the start control.
///
/// At most one handler is bound at any time. Binding always unbinds the
/// previous handler first, so repeated evaluations never stack handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartControl {
    enabled: bool,
    handler: Option<HandlerId>,
    next_handler: u64,
}

impl StartControl {
    /// Creates a disabled, unbound control.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the control can be activated.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Currently bound handler, if any.
    pub fn handler(&self) -> Option<HandlerId> {
        self.handler
    }

    /// Number of bound handlers, always 0 or 1.
    pub fn bound_handlers(&self) -> usize {
        usize::from(self.handler.is_some())
    }

    /// Enables the control and binds a fresh start handler.
    #[instrument(skip(self))]
    pub fn enable_and_bind(&mut self) -> HandlerId {
        self.unbind();
        let id = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.handler = Some(id);
        self.enabled = true;
        debug!(handler = ?id, "Start handler bound");
        id
    }

    /// Disables the control and drops its handler.
    #[instrument(skip(self))]
    pub fn disable(&mut self) {
        self.unbind();
        self.enabled = false;
    }

    fn unbind(&mut self) {
        if let Some(old) = self.handler.take() {
            trace!(handler = ?old, "Start handler unbound");
        }
    }

    /// Runs the bound handler once, producing the start request.
    ///
    /// Returns `None` when the control is disabled or unbound.
    #[instrument(skip(self))]
    pub fn activate(&self) -> Option<OutboundEvent> {
        match (self.enabled, self.handler) {
            (true, Some(_)) => Some(OutboundEvent::StartGame),
            _ => {
                debug!("Start control activated while disabled");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebinding_replaces_previous_handler() {
        let mut control = StartControl::new();
        let first = control.enable_and_bind();
        let second = control.enable_and_bind();
        assert_ne!(first, second);
        assert_eq!(control.handler(), Some(second));
        assert_eq!(control.bound_handlers(), 1);
    }

    #[test]
    fn disabled_control_emits_nothing() {
        let mut control = StartControl::new();
        assert_eq!(control.activate(), None);
        control.enable_and_bind();
        assert_eq!(control.activate(), Some(OutboundEvent::StartGame));
        control.disable();
        assert_eq!(control.activate(), None);
        assert_eq!(control.bound_handlers(), 0);
    }
}
