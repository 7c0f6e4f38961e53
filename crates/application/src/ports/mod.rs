pub mod message_codec;
pub mod upstream;

pub use message_codec::MessageCodec;
pub use upstream::{UpstreamAnswer, UpstreamClient};
