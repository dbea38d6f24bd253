//! Native implementations of the widget collaborators.

pub use self::context::{make_transport, native_context};
pub use self::jrpc::JrpcClient;
pub use self::timer::TokioTimer;

mod context;
mod jrpc;
mod timer;

#[cfg(test)]
mod test_server;
