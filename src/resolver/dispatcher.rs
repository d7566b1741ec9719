//! The transport contract. The resolver never touches sockets: it hands a
//! request message and one selected nameserver to a dispatcher and gets a
//! decoded response back. Transport-level retries, the UDP→TCP fallback on
//! TC=1 and per-attempt timeouts all live behind this interface.
use async_trait::async_trait;
use tokio::sync::watch;

use crate::rfc::message::Message;
use crate::rfc::opt::ClientSubnet;
use crate::resolver::ns::NameServer;

/// Signalled when the resolver no longer wants the answer (a concurrent
/// dispatch won). Implementations must abandon outstanding I/O within a
/// bounded time once the value flips to `true`.
pub type CancelSignal = watch::Receiver<bool>;

pub fn cancel_pair() -> (watch::Sender<bool>, CancelSignal) {
    watch::channel(false)
}

#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub dnssec_ok: bool,
    pub udp_payload_size: u16,
    pub timeout_ms: u32,
    pub retries: u16,
    pub ecs: Option<ClientSubnet>,
    /// Only true at the top-of-stack frame and when the zone cut is non-root.
    pub include_ecs: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            dnssec_ok: false,
            udp_payload_size: crate::rfc::opt::DEFAULT_UDP_PAYLOAD_SIZE,
            timeout_ms: 3000,
            retries: 2,
            ecs: None,
            include_ecs: false,
        }
    }
}

/// How a failed dispatch is accounted against the server that caused it.
/// Transient I/O errors never reach the resolver; the dispatcher retries
/// those internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Timeout-class: every attempt against this server ran out of time.
    Timeout,
    /// The server answered bytes that do not decode; counted like a
    /// bogus answer.
    Malformed,
    /// Unrecoverable (no usable transport, cancelled); aborts the frame.
    Fatal(String),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::Timeout => write!(f, "dispatch timed out"),
            DispatchError::Malformed => write!(f, "malformed response"),
            DispatchError::Fatal(reason) => write!(f, "dispatch failed: {}", reason),
        }
    }
}

/// A black box that moves one request to one server and returns the decoded
/// response. The resolver guarantees at most one response is consumed per
/// attempt; a TC=1 answer over UDP must already have been retried over TCP
/// by the implementation.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn query(
        &self,
        server: &NameServer,
        request: &Message,
        options: &DispatchOptions,
        cancel: CancelSignal,
    ) -> Result<Message, DispatchError>;
}
