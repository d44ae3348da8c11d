use tokio_util::bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::{FLAG_REPLY, HEADER_LEN, ProtocolError};

/// JDWP packet, either a command or a reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    pub id: u32,
    pub kind: PacketKind,
    pub data: Bytes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketKind {
    Command { set: u8, command: u8 },
    Reply { error_code: u16 },
}

impl Packet {
    pub fn command(id: u32, set: u8, command: u8, data: impl Into<Bytes>) -> Self {
        Self {
            id,
            kind: PacketKind::Command { set, command },
            data: data.into(),
        }
    }

    pub fn is_command(&self, set: u8, command: u8) -> bool {
        matches!(
            self.kind,
            PacketKind::Command { set: s, command: c } if s == set && c == command
        )
    }
}

/// Codec framing JDWP packets on a byte stream.
#[derive(Debug, Default)]
pub struct PacketCodec;

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = crate::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_LEN {
            return Ok(None);
        }

        let len = u32::from_be_bytes([src[0], src[1], src[2], src[3]]);

        if (len as usize) < HEADER_LEN {
            return Err(ProtocolError::BadLength(len).into());
        }

        if src.len() < len as usize {
            src.reserve(len as usize - src.len());
            return Ok(None);
        }

        let mut packet = src.split_to(len as usize);
        packet.advance(4);

        let id = packet.get_u32();
        let flags = packet.get_u8();

        let kind = if flags & FLAG_REPLY != 0 {
            PacketKind::Reply {
                error_code: packet.get_u16(),
            }
        } else {
            PacketKind::Command {
                set: packet.get_u8(),
                command: packet.get_u8(),
            }
        };

        Ok(Some(Packet {
            id,
            kind,
            data: packet.freeze(),
        }))
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = crate::Error;

    fn encode(&mut self, item: Packet, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let len = HEADER_LEN + item.data.len();

        dst.reserve(len);
        dst.put_u32(len as u32);
        dst.put_u32(item.id);

        match item.kind {
            PacketKind::Command { set, command } => {
                dst.put_u8(0);
                dst.put_u8(set);
                dst.put_u8(command);
            }
            PacketKind::Reply { error_code } => {
                dst.put_u8(FLAG_REPLY);
                dst.put_u16(error_code);
            }
        }

        dst.put_slice(&item.data);

        Ok(())
    }
}
