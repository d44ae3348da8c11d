mod event;
mod packet;
mod signature;
mod wire;

pub use self::event::{Composite, JdwpEvent};
pub use self::packet::{Packet, PacketCodec, PacketKind};
pub use self::signature::signature_to_name;
pub use self::wire::{IdSizes, Location, Value, WireReader, WireWriter};

/// Bytes exchanged by both sides right after the transport is connected.
pub const HANDSHAKE: &[u8; 14] = b"JDWP-Handshake";

/// Length of a packet header.
pub const HEADER_LEN: usize = 11;

/// Flag marking reply packets.
pub const FLAG_REPLY: u8 = 0x80;

pub mod command_set {
    pub const VIRTUAL_MACHINE: u8 = 1;
    pub const REFERENCE_TYPE: u8 = 2;
    pub const METHOD: u8 = 6;
    pub const OBJECT_REFERENCE: u8 = 9;
    pub const STRING_REFERENCE: u8 = 10;
    pub const THREAD_REFERENCE: u8 = 11;
    pub const EVENT_REQUEST: u8 = 15;
    pub const EVENT: u8 = 64;
}

pub mod command {
    pub mod vm {
        pub const ID_SIZES: u8 = 7;
        pub const RESUME: u8 = 9;
    }

    pub mod reference_type {
        pub const SIGNATURE: u8 = 1;
        pub const FIELDS: u8 = 4;
        pub const METHODS: u8 = 5;
    }

    pub mod method {
        pub const LINE_TABLE: u8 = 1;
    }

    pub mod object_reference {
        pub const REFERENCE_TYPE: u8 = 1;
    }

    pub mod string_reference {
        pub const VALUE: u8 = 1;
    }

    pub mod thread_reference {
        pub const NAME: u8 = 1;
        pub const RESUME: u8 = 3;
        pub const FRAME_COUNT: u8 = 7;
    }

    pub mod event_request {
        pub const SET: u8 = 1;
        pub const CLEAR: u8 = 2;
    }

    pub mod event {
        pub const COMPOSITE: u8 = 100;
    }
}

pub mod event_kind {
    pub const SINGLE_STEP: u8 = 1;
    pub const EXCEPTION: u8 = 4;
    pub const THREAD_DEATH: u8 = 7;
    pub const CLASS_PREPARE: u8 = 8;
    pub const FIELD_MODIFICATION: u8 = 21;
    pub const METHOD_ENTRY: u8 = 40;
    pub const METHOD_EXIT: u8 = 41;
    pub const VM_START: u8 = 90;
    pub const VM_DEATH: u8 = 99;
}

pub mod modifier {
    pub const COUNT: u8 = 1;
    pub const CLASS_EXCLUDE: u8 = 6;
    pub const EXCEPTION_ONLY: u8 = 8;
    pub const FIELD_ONLY: u8 = 9;
    pub const STEP: u8 = 10;
}

pub mod suspend_policy {
    pub const NONE: u8 = 0;
    pub const EVENT_THREAD: u8 = 1;
    pub const ALL: u8 = 2;
}

pub mod step {
    pub const SIZE_MIN: i32 = 0;
    pub const DEPTH_INTO: i32 = 0;
}

pub mod tag {
    pub const ARRAY: u8 = b'[';
    pub const BYTE: u8 = b'B';
    pub const CHAR: u8 = b'C';
    pub const OBJECT: u8 = b'L';
    pub const FLOAT: u8 = b'F';
    pub const DOUBLE: u8 = b'D';
    pub const INT: u8 = b'I';
    pub const LONG: u8 = b'J';
    pub const SHORT: u8 = b'S';
    pub const VOID: u8 = b'V';
    pub const BOOLEAN: u8 = b'Z';
    pub const STRING: u8 = b's';
    pub const THREAD: u8 = b't';
    pub const THREAD_GROUP: u8 = b'g';
    pub const CLASS_LOADER: u8 = b'l';
    pub const CLASS_OBJECT: u8 = b'c';
}

/// JDWP wire format error.
#[derive(thiserror::Error, Debug)]
pub enum ProtocolError {
    /// The data ended before the expected value.
    #[error("packet truncated")]
    Truncated,

    /// The length of a packet is shorter than its header.
    #[error("packet length {0} is shorter than its header")]
    BadLength(u32),

    /// The debuggee uses IDs of an unsupported size.
    #[error("ID size {0} is not supported")]
    BadIdSize(i32),

    /// Unknown value tag.
    #[error("unknown value tag {0:#x}")]
    UnknownTag(u8),

    /// Unknown (or never requested) event kind.
    #[error("unknown event kind {0}")]
    UnknownEventKind(u8),

    /// Unknown suspend policy.
    #[error("unknown suspend policy {0}")]
    UnknownSuspendPolicy(u8),

    /// A string is not valid UTF-8.
    #[error("invalid modified UTF-8 string")]
    BadString(#[from] std::string::FromUtf8Error),
}
