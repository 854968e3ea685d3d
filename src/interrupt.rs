//! Interrupt line handling and callback dispatch.
//!
//! The D7S drives two open-drain interrupt outputs:
//! - INT1 falls when a shutoff or collapse judgement is made
//! - INT2 toggles when earthquake processing starts and ends
//!
//! Platform glue attaches both pins through [`InterruptPlatform`] and calls
//! [`D7s::handle_int1`] / [`D7s::handle_int2`] (or the [`SharedD7s`](crate::SharedD7s)
//! entry points) from the pin interrupt. Dispatch is gated by a single enable
//! flag; triggers that arrive while disabled are dropped.
//!
//! # Example
//!
//! ```ignore
//! fn shutoff() { /* close the gas valve */ }
//! fn ended(si: f32, pga: f32, temperature: f32) { /* log the record */ }
//!
//! d7s.register_handler(InterruptEvent::Shutoff, Handler::Notify(shutoff))?;
//! d7s.register_handler(InterruptEvent::EndEarthquake, Handler::Summary(ended))?;
//! d7s.enable_int1(&mut platform, 2);
//! d7s.enable_int2(&mut platform, 3);
//! d7s.enable_interrupt_handling();
//! ```

use crate::device::D7s;
use crate::error::{Error, Result};
use crate::interface::D7sInterface;
use crate::measurement::EarthquakeRecord;
use crate::params::InvalidValue;

/// Events that can be bound to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InterruptEvent {
    /// INT2, earthquake processing started.
    StartEarthquake = 0,
    /// INT2, earthquake processing ended.
    EndEarthquake = 1,
    /// INT1, shutoff judgement.
    Shutoff = 2,
    /// INT1, collapse judgement.
    Collapse = 3,
}

impl InterruptEvent {
    /// Every event, in slot order.
    pub const ALL: [Self; 4] = [
        Self::StartEarthquake,
        Self::EndEarthquake,
        Self::Shutoff,
        Self::Collapse,
    ];

    /// Interrupt line that reports this event.
    pub const fn line(self) -> InterruptLine {
        match self {
            Self::StartEarthquake | Self::EndEarthquake => InterruptLine::Int2,
            Self::Shutoff | Self::Collapse => InterruptLine::Int1,
        }
    }

    /// Returns `true` when the handler for this event receives the latest record.
    pub const fn takes_record(self) -> bool {
        matches!(self, Self::EndEarthquake)
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for InterruptEvent {
    type Error = InvalidValue;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(InvalidValue(value))
    }
}

/// The two interrupt outputs of the D7S.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptLine {
    /// Shutoff/collapse output.
    Int1,
    /// Earthquake start/end output.
    Int2,
}

/// Edge selection passed to the platform when attaching a pin interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// High to low transition.
    Falling,
    /// Low to high transition.
    Rising,
    /// Either transition.
    AnyEdge,
}

/// Edge currently armed on INT2 for platforms without [`Trigger::AnyEdge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArmedEdge {
    /// Waiting for the start of an earthquake.
    Falling,
    /// Waiting for the end of an earthquake.
    Rising,
}

impl ArmedEdge {
    /// Edge to arm after the current one fired.
    pub const fn next(self) -> Self {
        match self {
            Self::Falling => Self::Rising,
            Self::Rising => Self::Falling,
        }
    }

    /// Platform trigger matching this edge.
    pub const fn trigger(self) -> Trigger {
        match self {
            Self::Falling => Trigger::Falling,
            Self::Rising => Trigger::Rising,
        }
    }
}

/// Host services needed to route the D7S interrupt pins.
///
/// Implementations forward the attached pin interrupt for `line` to
/// [`D7s::handle_int1`] or [`D7s::handle_int2`].
pub trait InterruptPlatform {
    /// Configures `pin` as an input with pull-up.
    fn configure_pull_up(&mut self, pin: u8);

    /// Attaches the interrupt of `pin` on `trigger`, routed to `line`.
    fn attach(&mut self, pin: u8, trigger: Trigger, line: InterruptLine);

    /// Detaches any interrupt from `pin`.
    fn detach(&mut self, pin: u8);

    /// Whether [`Trigger::AnyEdge`] is available.
    fn supports_any_edge(&self) -> bool {
        true
    }
}

/// Callback bound to an [`InterruptEvent`].
#[derive(Debug, Clone, Copy)]
pub enum Handler {
    /// Called without arguments.
    Notify(fn()),
    /// Called with the SI (m/s), PGA (m/s²) and temperature (°C) of the latest record.
    Summary(fn(f32, f32, f32)),
}

impl Handler {
    /// Returns `true` when this handler can be bound to `event`.
    pub const fn fits(&self, event: InterruptEvent) -> bool {
        matches!(self, Self::Summary(_)) == event.takes_record()
    }
}

/// Work selected while servicing an interrupt, invoked once the bus I/O is done.
#[derive(Debug, Clone, Copy)]
pub enum Dispatch {
    /// The event has no registered handler.
    Unhandled(InterruptEvent),
    /// Call a handler without arguments.
    Notify(InterruptEvent, fn()),
    /// Call the end-of-earthquake handler with the latest record.
    EarthquakeEnded(fn(f32, f32, f32), EarthquakeRecord),
}

impl Dispatch {
    /// Event selected for this trigger.
    pub const fn event(&self) -> InterruptEvent {
        match self {
            Self::Unhandled(event) | Self::Notify(event, _) => *event,
            Self::EarthquakeEnded(..) => InterruptEvent::EndEarthquake,
        }
    }

    /// Calls the selected handler, if any, and returns the event.
    pub fn invoke(self) -> InterruptEvent {
        match self {
            Self::Unhandled(_) => {}
            Self::Notify(_, handler) => handler(),
            Self::EarthquakeEnded(handler, record) => {
                handler(record.si, record.pga, record.temperature)
            }
        }
        self.event()
    }
}

#[derive(Debug, Clone, Copy)]
struct AlternatingEdge {
    pin: u8,
    armed: ArmedEdge,
}

/// Handler table and line state owned by the driver.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Dispatcher {
    handlers: [Option<Handler>; 4],
    enabled: bool,
    int2: Option<AlternatingEdge>,
}

impl Dispatcher {
    pub(crate) const fn new() -> Self {
        Self {
            handlers: [None; 4],
            enabled: false,
            int2: None,
        }
    }

    fn notify(&self, event: InterruptEvent) -> Dispatch {
        match self.handlers[event.slot()] {
            Some(Handler::Notify(handler)) => Dispatch::Notify(event, handler),
            _ => Dispatch::Unhandled(event),
        }
    }

    fn summary_handler(&self) -> Option<fn(f32, f32, f32)> {
        match self.handlers[InterruptEvent::EndEarthquake.slot()] {
            Some(Handler::Summary(handler)) => Some(handler),
            _ => None,
        }
    }
}

impl<IFACE> D7s<IFACE> {
    // ==================================================================
    // == Dispatch Control ==============================================
    // ==================================================================
    /// Removes the handler bound to `event`.
    pub fn unregister_handler(&mut self, event: InterruptEvent) {
        self.dispatcher.handlers[event.slot()] = None;
    }

    /// Starts dispatching interrupts to the registered handlers.
    pub fn enable_interrupt_handling(&mut self) {
        self.dispatcher.enabled = true;
    }

    /// Stops dispatching; triggers received meanwhile are dropped.
    pub fn disable_interrupt_handling(&mut self) {
        self.dispatcher.enabled = false;
    }

    /// Returns `true` while interrupts are dispatched.
    pub fn interrupt_handling_enabled(&self) -> bool {
        self.dispatcher.enabled
    }

    // ==================================================================
    // == Pin Setup =====================================================
    // ==================================================================
    /// Routes INT1 (active low) from `pin`.
    pub fn enable_int1<P: InterruptPlatform>(&mut self, platform: &mut P, pin: u8) {
        platform.configure_pull_up(pin);
        platform.attach(pin, Trigger::Falling, InterruptLine::Int1);
    }

    /// Routes INT2 (both edges) from `pin`.
    ///
    /// Without [`Trigger::AnyEdge`] support the falling edge is armed first and
    /// the edge is swapped every time INT2 is serviced.
    pub fn enable_int2<P: InterruptPlatform>(&mut self, platform: &mut P, pin: u8) {
        platform.configure_pull_up(pin);
        if platform.supports_any_edge() {
            self.dispatcher.int2 = None;
            platform.attach(pin, Trigger::AnyEdge, InterruptLine::Int2);
        } else {
            let armed = ArmedEdge::Falling;
            self.dispatcher.int2 = Some(AlternatingEdge { pin, armed });
            platform.attach(pin, armed.trigger(), InterruptLine::Int2);
        }
    }

    /// Edge armed on INT2, or `None` when the platform triggers on both edges.
    pub fn int2_armed_edge(&self) -> Option<ArmedEdge> {
        self.dispatcher.int2.map(|line| line.armed)
    }

    fn rearm_int2<P: InterruptPlatform>(&mut self, platform: &mut P) {
        if let Some(line) = self.dispatcher.int2.as_mut() {
            line.armed = line.armed.next();
            platform.detach(line.pin);
            platform.attach(line.pin, line.armed.trigger(), InterruptLine::Int2);
        }
    }
}

impl<IFACE, CommE> D7s<IFACE>
where
    IFACE: D7sInterface<Error = CommE>,
{
    // ==================================================================
    // == Handler Registration ==========================================
    // ==================================================================
    /// Binds `handler` to `event`, replacing any previous one.
    ///
    /// [`InterruptEvent::EndEarthquake`] takes a [`Handler::Summary`]; every other
    /// event takes a [`Handler::Notify`]. A mismatch is rejected.
    pub fn register_handler(&mut self, event: InterruptEvent, handler: Handler) -> Result<(), CommE> {
        if !handler.fits(event) {
            return Err(Error::InvalidParameter);
        }
        self.dispatcher.handlers[event.slot()] = Some(handler);
        Ok(())
    }

    // ==================================================================
    // == Interrupt Servicing ===========================================
    // ==================================================================
    /// Selects the INT1 handler: shutoff when a shutoff judgement is pending, collapse otherwise.
    ///
    /// Returns `None` while dispatch is disabled.
    pub fn service_int1(&mut self) -> Result<Option<Dispatch>, CommE> {
        if !self.dispatcher.enabled {
            trace!("int1 ignored, dispatch disabled");
            return Ok(None);
        }

        let event = if self.is_in_shutoff()? {
            InterruptEvent::Shutoff
        } else {
            InterruptEvent::Collapse
        };
        debug!("int1 -> {}", event);
        Ok(Some(self.dispatcher.notify(event)))
    }

    /// Selects the INT2 handler: start while an earthquake is being processed, end otherwise.
    ///
    /// The end handler receives latest record 0, read only when a handler is registered.
    /// On platforms without both-edge triggers the opposite edge is re-armed first,
    /// even while dispatch is disabled.
    pub fn service_int2<P: InterruptPlatform>(
        &mut self,
        platform: &mut P,
    ) -> Result<Option<Dispatch>, CommE> {
        self.rearm_int2(platform);

        if !self.dispatcher.enabled {
            trace!("int2 ignored, dispatch disabled");
            return Ok(None);
        }

        if self.is_earthquake_occurring()? {
            debug!("int2 -> earthquake started");
            return Ok(Some(self.dispatcher.notify(InterruptEvent::StartEarthquake)));
        }

        debug!("int2 -> earthquake ended");
        let dispatch = match self.dispatcher.summary_handler() {
            Some(handler) => Dispatch::EarthquakeEnded(handler, self.historical_record(0)?),
            None => Dispatch::Unhandled(InterruptEvent::EndEarthquake),
        };
        Ok(Some(dispatch))
    }

    /// Services INT1 and calls the selected handler.
    pub fn handle_int1(&mut self) -> Result<Option<InterruptEvent>, CommE> {
        Ok(self.service_int1()?.map(Dispatch::invoke))
    }

    /// Services INT2 and calls the selected handler.
    pub fn handle_int2<P: InterruptPlatform>(
        &mut self,
        platform: &mut P,
    ) -> Result<Option<InterruptEvent>, CommE> {
        Ok(self.service_int2(platform)?.map(Dispatch::invoke))
    }
}
