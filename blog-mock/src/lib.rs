mod dom;
pub use dom::{MockDom, NodeId, FRAGMENT_TAG};

mod server;
pub use server::{render_comment, Failure, MockServer, TOKEN};
