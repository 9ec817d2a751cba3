#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Which voices a note-off addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteTarget {
    /// Only a voice currently sounding this note.
    Specific(u8),
    /// Every voice, gated or not.
    All,
}

/// Control-path events, applied by
/// [`Resonator::handle_message`](crate::Resonator::handle_message).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    GateOn { velocity: u8 },
    GateOff,
    AllNotesOff,
    /// 14-bit bend, centre `0x2000`.
    PitchBend { value: u16 },
    SetParameter { id: u8, value: i32 },
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}
