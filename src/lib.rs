//! An iterative DNS resolver library: walks the delegation hierarchy from the
//! root hints, validates DNSSEC chains against configured trust anchors, and
//! returns a single synthesized answer message.
//!
//! The transports, the cache and the trust anchor store are consumed through
//! narrow async interfaces; see [`resolver::dispatcher::Dispatcher`] and
//! [`resolver::cache::Cache`].
pub mod dnssec;
pub mod error;
pub mod framing;
pub mod macros;
pub mod name;
pub mod network_order;
pub mod resolver;
pub mod rfc;
pub mod util;
