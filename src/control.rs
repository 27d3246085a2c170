//! Control commands for the animation
//!
//! A bounded queue of [`LoopCommand`]s built on `critical-section` and
//! `heapless::Deque`, safe to feed from interrupts or another execution
//! context. The process lifecycle layer keeps a [`ControlSender`] as its
//! shutdown handle; the [`Composer`](crate::Composer) owns the matching
//! [`ControlReceiver`] and drains it once per tick.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// Default capacity of a control channel.
pub const CONTROL_CHANNEL_SIZE: usize = 4;

/// Request to change the animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCommand {
    /// Start immediately, regardless of the schedule
    Start,
    /// Pause a running animation and turn the strip off
    Pause,
    /// Resume a paused animation
    Resume,
    /// Stop everything and turn the strip off for good
    Shutdown,
}

/// Returned when the channel is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelFull(pub LoopCommand);

/// Bounded command queue.
pub struct ControlChannel<const SIZE: usize = CONTROL_CHANNEL_SIZE> {
    queue: Mutex<RefCell<Deque<LoopCommand, SIZE>>>,
}

impl<const SIZE: usize> ControlChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> ControlSender<'_, SIZE> {
        ControlSender { channel: self }
    }

    pub const fn receiver(&self) -> ControlReceiver<'_, SIZE> {
        ControlReceiver { channel: self }
    }

    fn push(&self, command: LoopCommand) -> Result<(), ChannelFull> {
        critical_section::with(|cs| {
            let mut queue = self.queue.borrow(cs).borrow_mut();
            if command == LoopCommand::Shutdown {
                // Shutdown must get through even when the queue is full
                queue.clear();
            }
            queue.push_back(command).map_err(ChannelFull)
        })
    }

    fn pop(&self) -> Option<LoopCommand> {
        critical_section::with(|cs| self.queue.borrow(cs).borrow_mut().pop_front())
    }
}

impl<const SIZE: usize> Default for ControlChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half, cheap to copy.
#[derive(Clone, Copy)]
pub struct ControlSender<'a, const SIZE: usize = CONTROL_CHANNEL_SIZE> {
    channel: &'a ControlChannel<SIZE>,
}

impl<const SIZE: usize> ControlSender<'_, SIZE> {
    pub fn send(&self, command: LoopCommand) -> Result<(), ChannelFull> {
        self.channel.push(command)
    }

    pub fn start(&self) -> Result<(), ChannelFull> {
        self.send(LoopCommand::Start)
    }

    pub fn pause(&self) -> Result<(), ChannelFull> {
        self.send(LoopCommand::Pause)
    }

    pub fn resume(&self) -> Result<(), ChannelFull> {
        self.send(LoopCommand::Resume)
    }

    /// Request shutdown, dropping any queued commands.
    pub fn shutdown(&self) {
        let _ = self.channel.push(LoopCommand::Shutdown);
    }
}

/// Receiving half.
#[derive(Clone, Copy)]
pub struct ControlReceiver<'a, const SIZE: usize = CONTROL_CHANNEL_SIZE> {
    channel: &'a ControlChannel<SIZE>,
}

impl<const SIZE: usize> ControlReceiver<'_, SIZE> {
    /// Take the next pending command, if any.
    pub fn try_receive(&self) -> Option<LoopCommand> {
        self.channel.pop()
    }
}
