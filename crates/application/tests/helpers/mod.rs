mod mocks;

pub use mocks::{MockCodec, MockUpstreamClient};
