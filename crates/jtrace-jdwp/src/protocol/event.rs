use jtrace_tracer::debugger::SuspendPolicy;

use super::wire::{IdSizes, Location, Value, WireReader};
use super::{ProtocolError, event_kind, suspend_policy};

/// Decoded event of a composite event packet.
///
/// Only the parts of the events needed for tracing are kept.
#[derive(Clone, Debug, PartialEq)]
pub enum JdwpEvent {
    VmStart {
        thread: u64,
    },
    VmDeath,
    SingleStep {
        request: i32,
        thread: u64,
    },
    MethodEntry {
        thread: u64,
        location: Location,
    },
    MethodExit {
        thread: u64,
        location: Location,
    },
    Exception {
        thread: u64,
        exception: u64,
        catch_location: Option<Location>,
    },
    ThreadDeath {
        thread: u64,
    },
    ClassPrepare {
        thread: u64,
        type_tag: u8,
        type_id: u64,
        signature: String,
    },
    FieldModification {
        thread: u64,
        type_id: u64,
        field: u64,
        value: Value,
    },
}

impl JdwpEvent {
    /// Short name of the event kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::VmStart { .. } => "vm-start",
            Self::VmDeath => "vm-death",
            Self::SingleStep { .. } => "single-step",
            Self::MethodEntry { .. } => "method-entry",
            Self::MethodExit { .. } => "method-exit",
            Self::Exception { .. } => "exception",
            Self::ThreadDeath { .. } => "thread-death",
            Self::ClassPrepare { .. } => "class-prepare",
            Self::FieldModification { .. } => "field-modification",
        }
    }

    /// Thread that generated the event.
    pub const fn thread(&self) -> Option<u64> {
        match self {
            Self::VmDeath => None,
            Self::VmStart { thread }
            | Self::SingleStep { thread, .. }
            | Self::MethodEntry { thread, .. }
            | Self::MethodExit { thread, .. }
            | Self::Exception { thread, .. }
            | Self::ThreadDeath { thread }
            | Self::ClassPrepare { thread, .. }
            | Self::FieldModification { thread, .. } => Some(*thread),
        }
    }
}

/// Content of an `Event.Composite` command.
#[derive(Clone, Debug, PartialEq)]
pub struct Composite {
    pub suspend_policy: SuspendPolicy,
    pub events: Vec<JdwpEvent>,
}

impl Composite {
    /// Decodes the data of an `Event.Composite` command.
    ///
    /// Events of a kind this crate never requests cannot be skipped (their
    /// length is unknown), so they fail the whole packet.
    pub fn decode(data: &[u8], sizes: &IdSizes) -> Result<Self, ProtocolError> {
        let mut r = WireReader::new(data, sizes);

        let suspend_policy = match r.u8()? {
            suspend_policy::NONE => SuspendPolicy::None,
            suspend_policy::EVENT_THREAD => SuspendPolicy::EventThread,
            suspend_policy::ALL => SuspendPolicy::All,
            other => return Err(ProtocolError::UnknownSuspendPolicy(other)),
        };

        let count = r.i32()?;

        let events = (0..count)
            .map(|_| decode_event(&mut r))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            suspend_policy,
            events,
        })
    }
}

fn decode_event(r: &mut WireReader<'_>) -> Result<JdwpEvent, ProtocolError> {
    let kind = r.u8()?;
    let request = r.i32()?;

    let event = match kind {
        event_kind::VM_START => JdwpEvent::VmStart {
            thread: r.object_id()?,
        },
        event_kind::VM_DEATH => JdwpEvent::VmDeath,
        event_kind::SINGLE_STEP => {
            let thread = r.object_id()?;
            let _location = r.location()?;

            JdwpEvent::SingleStep { request, thread }
        }
        event_kind::METHOD_ENTRY => JdwpEvent::MethodEntry {
            thread: r.object_id()?,
            location: r.location()?,
        },
        event_kind::METHOD_EXIT => JdwpEvent::MethodExit {
            thread: r.object_id()?,
            location: r.location()?,
        },
        event_kind::EXCEPTION => {
            let thread = r.object_id()?;
            let _location = r.location()?;
            let _tag = r.u8()?;
            let exception = r.object_id()?;

            // a zero class ID marks an uncaught exception
            let catch_location = Some(r.location()?).filter(|loc| loc.class != 0);

            JdwpEvent::Exception {
                thread,
                exception,
                catch_location,
            }
        }
        event_kind::THREAD_DEATH => JdwpEvent::ThreadDeath {
            thread: r.object_id()?,
        },
        event_kind::CLASS_PREPARE => {
            let thread = r.object_id()?;
            let type_tag = r.u8()?;
            let type_id = r.reference_type_id()?;
            let signature = r.string()?;
            let _status = r.i32()?;

            JdwpEvent::ClassPrepare {
                thread,
                type_tag,
                type_id,
                signature,
            }
        }
        event_kind::FIELD_MODIFICATION => {
            let thread = r.object_id()?;
            let _location = r.location()?;
            let _type_tag = r.u8()?;
            let type_id = r.reference_type_id()?;
            let field = r.field_id()?;
            let _object_tag = r.u8()?;
            let _object = r.object_id()?;
            let value = r.value()?;

            JdwpEvent::FieldModification {
                thread,
                type_id,
                field,
                value,
            }
        }
        other => return Err(ProtocolError::UnknownEventKind(other)),
    };

    Ok(event)
}
