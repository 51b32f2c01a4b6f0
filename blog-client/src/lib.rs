mod config;
pub use config::{Config, Labels, Messages, UploadRules};

mod controller;
pub use controller::Controller;

pub mod csrf;

pub mod delegate;
pub use delegate::{ClickAction, SubmitAction};

mod dom;
pub use dom::{Dom, Position};

mod error;
pub use error::Error;

pub mod patcher;

mod reaction;
pub use reaction::Reaction;

mod registry;
pub use registry::{CommentRegistry, CommentView, FlightGuard, FlightKey, InFlight};

mod submit;

mod transport;
pub use transport::{Method, Request, Response, Transport};

pub mod validator;

pub mod api {
    pub use blog_api::*;
}
