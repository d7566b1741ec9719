//! A plain UDP dispatcher with TCP fallback on truncation. This lives in the
//! binary: the library only knows the `Dispatcher` contract.
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;

use recursor::resolver::dispatcher::{CancelSignal, DispatchError, DispatchOptions, Dispatcher};
use recursor::resolver::ns::NameServer;
use recursor::rfc::message::Message;

pub struct UdpDispatcher;

impl UdpDispatcher {
    async fn query_udp(
        server: &NameServer,
        raw: &[u8],
        options: &DispatchOptions,
    ) -> Result<Message, DispatchError> {
        let addr = server
            .addr
            .ok_or_else(|| DispatchError::Fatal(format!("{} has no endpoint", server)))?;

        let bind = if addr.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
        let socket = UdpSocket::bind(bind)
            .await
            .map_err(|e| DispatchError::Fatal(e.to_string()))?;
        socket
            .send_to(raw, addr)
            .await
            .map_err(|e| DispatchError::Fatal(e.to_string()))?;

        let mut buf = vec![0u8; options.udp_payload_size.max(512) as usize];
        let per_attempt = Duration::from_millis(options.timeout_ms as u64);

        let (received, from) = timeout(per_attempt, socket.recv_from(&mut buf))
            .await
            .map_err(|_| DispatchError::Timeout)?
            .map_err(|e| DispatchError::Fatal(e.to_string()))?;
        trace!("{} bytes over UDP from {}", received, from);

        Message::decode(&buf[..received]).map_err(|_| DispatchError::Malformed)
    }

    async fn query_tcp(
        server: &NameServer,
        raw: &[u8],
        options: &DispatchOptions,
    ) -> Result<Message, DispatchError> {
        let addr = server
            .addr
            .ok_or_else(|| DispatchError::Fatal(format!("{} has no endpoint", server)))?;
        let per_attempt = Duration::from_millis(options.timeout_ms as u64);

        let mut stream = timeout(per_attempt, TcpStream::connect(addr))
            .await
            .map_err(|_| DispatchError::Timeout)?
            .map_err(|e| DispatchError::Fatal(e.to_string()))?;

        // two-byte length prefix framing of RFC1035 §4.2.2
        let mut framed = Vec::with_capacity(raw.len() + 2);
        framed.extend_from_slice(&(raw.len() as u16).to_be_bytes());
        framed.extend_from_slice(raw);

        let exchange = async {
            stream.write_all(&framed).await?;

            let mut length = [0u8; 2];
            stream.read_exact(&mut length).await?;
            let mut buf = vec![0u8; u16::from_be_bytes(length) as usize];
            stream.read_exact(&mut buf).await?;
            Ok::<Vec<u8>, std::io::Error>(buf)
        };

        let buf = timeout(per_attempt, exchange)
            .await
            .map_err(|_| DispatchError::Timeout)?
            .map_err(|e| DispatchError::Fatal(e.to_string()))?;

        Message::decode(&buf).map_err(|_| DispatchError::Malformed)
    }
}

#[async_trait]
impl Dispatcher for UdpDispatcher {
    async fn query(
        &self,
        server: &NameServer,
        request: &Message,
        options: &DispatchOptions,
        mut cancel: CancelSignal,
    ) -> Result<Message, DispatchError> {
        let raw = request
            .encode()
            .map_err(|e| DispatchError::Fatal(e.to_string()))?;

        let mut last = DispatchError::Timeout;
        for attempt in 0..=options.retries {
            let outcome = tokio::select! {
                outcome = Self::query_udp(server, &raw, options) => outcome,
                _ = cancel.changed() => return Err(DispatchError::Fatal("cancelled".to_string())),
            };

            match outcome {
                Ok(response) if response.header.flags.truncated => {
                    debug!("{} truncated over UDP, retrying over TCP", server);
                    return Self::query_tcp(server, &raw, options).await;
                }
                Ok(response) => return Ok(response),
                Err(DispatchError::Timeout) => {
                    debug!("attempt {} against {} timed out", attempt + 1, server);
                    last = DispatchError::Timeout;
                }
                Err(error) => return Err(error),
            }
        }
        Err(last)
    }
}
