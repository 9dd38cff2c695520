//! openSenseMap upstream source.
//!
//! `OpenSenseMapClient` talks HTTP and reports typed errors;
//! `SenseBoxRepository` exposes it as a `Repository<SenseBox>`, degrading
//! every failure to `None`.

mod client;
mod error;
mod repository;

pub use client::OpenSenseMapClient;
pub use repository::SenseBoxRepository;
