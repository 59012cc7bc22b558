//! Host discovery for trigrid: a tiny UDP multicast rendezvous.
//!
//! Hosts join a well-known multicast group and answer availability
//! probes with the TCP port they accept games on. Challengers send a
//! probe, wait for the first answer, and dial the announced endpoint.
//! Everything else (the game itself) happens over that TCP stream.
//!
//! # Key items
//!
//! - [`host_socket`] — binds and joins the group, host side
//! - [`DiscoveryContext`] — probe-and-connect loop, challenger side
//! - [`MULTICAST_GROUP`] / [`MULTICAST_PORT`] — the rendezvous point

mod context;
mod error;

pub use context::{
    host_socket, DiscoveryContext, DISCOVERY_TIMEOUT, MAX_CONNECT_ATTEMPTS,
    MULTICAST_GROUP, MULTICAST_PORT,
};
pub use error::DiscoveryError;
