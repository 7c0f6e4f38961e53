pub mod codec;
pub mod server;
pub mod upstream;
mod wire;

pub use codec::WireCodec;
pub use server::Router;
pub use upstream::UdpUpstreamClient;
