mod cluster;
mod request;
mod wire;

pub use cluster::*;
pub use request::*;
pub use wire::*;
