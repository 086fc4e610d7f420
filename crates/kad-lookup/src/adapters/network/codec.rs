//! Binary wire format for lookup messages.
//!
//! # Frame
//!
//! ```text
//! [len: u32 BE] [type: u8] [payload ...]      len = 1 + payload length
//! ```
//!
//! # Payloads
//!
//! - `PING` (0x01), `PONG` (0x02): empty
//! - `LOOKUP_REQUEST` (0x03): `[target: 32]`
//! - `LOOKUP_RESPONSE` (0x04): `[count: u16 BE]` then per peer
//!   `[node_id: 32] [family: u8 = 4|6] [ip: 4|16] [port: u16 BE]`

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::domain::{Message, NodeId, PeerInfo, TransportError, NODE_ID_LEN};

/// Largest accepted frame body.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Message type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Liveness probe.
    Ping = 0x01,
    /// Answer to a PING.
    Pong = 0x02,
    /// Request for the peers closest to a target.
    LookupRequest = 0x03,
    /// List of candidate peers.
    LookupResponse = 0x04,
}

impl TryFrom<u8> for MessageType {
    type Error = TransportError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Ping),
            0x02 => Ok(Self::Pong),
            0x03 => Ok(Self::LookupRequest),
            0x04 => Ok(Self::LookupResponse),
            other => Err(TransportError::Codec(format!(
                "unknown message type 0x{other:02x}"
            ))),
        }
    }
}

const FAMILY_V4: u8 = 4;
const FAMILY_V6: u8 = 6;

/// Encode a message body (without the length prefix).
pub fn encode(message: &Message) -> Result<Vec<u8>, TransportError> {
    let mut out = Vec::with_capacity(1 + NODE_ID_LEN);
    match message {
        Message::Ping => out.push(MessageType::Ping as u8),
        Message::Pong => out.push(MessageType::Pong as u8),
        Message::LookupRequest { target } => {
            out.push(MessageType::LookupRequest as u8);
            out.extend_from_slice(target.as_bytes());
        }
        Message::LookupResponse { peers } => {
            let count = u16::try_from(peers.len()).map_err(|_| {
                TransportError::Codec(format!("too many peers in response: {}", peers.len()))
            })?;
            out.push(MessageType::LookupResponse as u8);
            out.extend_from_slice(&count.to_be_bytes());
            for peer in peers {
                out.extend_from_slice(peer.node_id.as_bytes());
                match peer.addr.ip() {
                    IpAddr::V4(ip) => {
                        out.push(FAMILY_V4);
                        out.extend_from_slice(&ip.octets());
                    }
                    IpAddr::V6(ip) => {
                        out.push(FAMILY_V6);
                        out.extend_from_slice(&ip.octets());
                    }
                }
                out.extend_from_slice(&peer.addr.port().to_be_bytes());
            }
        }
    }

    if out.len() > MAX_FRAME_LEN {
        return Err(TransportError::Codec(format!(
            "frame of {} bytes exceeds limit",
            out.len()
        )));
    }
    Ok(out)
}

/// Decode a message body (without the length prefix).
pub fn decode(body: &[u8]) -> Result<Message, TransportError> {
    let mut reader = Reader::new(body);
    let message = match MessageType::try_from(reader.u8()?)? {
        MessageType::Ping => Message::Ping,
        MessageType::Pong => Message::Pong,
        MessageType::LookupRequest => Message::LookupRequest {
            target: reader.node_id()?,
        },
        MessageType::LookupResponse => {
            let count = reader.u16()? as usize;
            let mut peers = Vec::with_capacity(count.min(256));
            for _ in 0..count {
                let node_id = reader.node_id()?;
                let ip = match reader.u8()? {
                    FAMILY_V4 => {
                        let octets: [u8; 4] = reader.array()?;
                        IpAddr::V4(Ipv4Addr::from(octets))
                    }
                    FAMILY_V6 => {
                        let octets: [u8; 16] = reader.array()?;
                        IpAddr::V6(Ipv6Addr::from(octets))
                    }
                    other => {
                        return Err(TransportError::Codec(format!(
                            "unknown address family {other}"
                        )))
                    }
                };
                let port = reader.u16()?;
                peers.push(PeerInfo::new(node_id, SocketAddr::new(ip, port)));
            }
            Message::LookupResponse { peers }
        }
    };

    if !reader.is_empty() {
        return Err(TransportError::Codec(format!(
            "{} trailing bytes after {}",
            reader.remaining(),
            message.name()
        )));
    }
    Ok(message)
}

/// Write one length-prefixed frame.
pub async fn write_frame<W>(writer: &mut W, message: &Message) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    let body = encode(message)?;
    // encode() caps the body at MAX_FRAME_LEN, which fits in a u32.
    writer.write_all(&(body.len() as u32).to_be_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed frame.
///
/// `Ok(None)` if the stream ended cleanly before a new frame started.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Message>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut len_bytes = [0u8; 4];
    match reader.read_exact(&mut len_bytes).await {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    }

    let len = u32::from_be_bytes(len_bytes) as usize;
    if len == 0 || len > MAX_FRAME_LEN {
        return Err(TransportError::Codec(format!("invalid frame length {len}")));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    decode(&body).map(Some)
}

/// Bounds-checked cursor over a frame body.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], TransportError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| TransportError::Codec("truncated frame".into()))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], TransportError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, TransportError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, TransportError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    fn node_id(&mut self) -> Result<NodeId, TransportError> {
        NodeId::from_slice(self.take(NODE_ID_LEN)?)
            .map_err(|e| TransportError::Codec(e.to_string()))
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(first: u8, addr: &str) -> PeerInfo {
        let mut bytes = [0u8; 32];
        bytes[0] = first;
        PeerInfo::new(NodeId::new(bytes), addr.parse().unwrap())
    }

    #[test]
    fn test_lookup_request_layout() {
        let target = NodeId::new([0xaa; 32]);
        let body = encode(&Message::LookupRequest { target }).unwrap();

        assert_eq!(body.len(), 33);
        assert_eq!(body[0], 0x03);
        assert_eq!(&body[1..], target.as_bytes());
    }

    #[test]
    fn test_lookup_response_mixed_families() {
        let peers = vec![peer(1, "192.168.1.7:4000"), peer(2, "[2001:db8::1]:4001")];
        let message = Message::LookupResponse {
            peers: peers.clone(),
        };
        let body = encode(&message).unwrap();

        // type + count + (32 + 1 + 4 + 2) + (32 + 1 + 16 + 2)
        assert_eq!(body.len(), 1 + 2 + 39 + 51);
        assert_eq!(decode(&body).unwrap(), message);
    }

    #[test]
    fn test_empty_lookup_response() {
        let body = encode(&Message::LookupResponse { peers: Vec::new() }).unwrap();
        assert_eq!(body, vec![0x04, 0x00, 0x00]);
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        assert!(matches!(decode(&[0x7f]), Err(TransportError::Codec(_))));
    }

    #[test]
    fn test_decode_rejects_truncated_request() {
        let mut body = vec![0x03];
        body.extend_from_slice(&[0u8; 20]);
        assert!(matches!(decode(&body), Err(TransportError::Codec(_))));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        assert!(matches!(decode(&[0x01, 0x00]), Err(TransportError::Codec(_))));
    }

    #[test]
    fn test_decode_rejects_bad_family() {
        let mut body = vec![0x04, 0x00, 0x01];
        body.extend_from_slice(&[0u8; 32]);
        body.push(9);
        assert!(matches!(decode(&body), Err(TransportError::Codec(_))));
    }

    #[tokio::test]
    async fn test_frame_over_duplex_stream() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        let message = Message::LookupResponse {
            peers: vec![peer(3, "10.0.0.3:9000")],
        };

        write_frame(&mut client, &message).await.unwrap();
        drop(client);

        assert_eq!(read_frame(&mut server).await.unwrap(), Some(message));
        assert_eq!(read_frame(&mut server).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_frame_rejects_oversized_length() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client
            .write_all(&((MAX_FRAME_LEN as u32) + 1).to_be_bytes())
            .await
            .unwrap();

        assert!(matches!(
            read_frame(&mut server).await,
            Err(TransportError::Codec(_))
        ));
    }
}
