//! Core types for Arsa.
//!
//! This crate holds the types shared by the dispatcher and application
//! code:
//!
//! - [`Request`] / [`Response`]: the canonical messages exchanged with a
//!   boundary adapter
//! - [`RequestContext`]: invocation-scoped state kept in a task-local cell
//! - [`Fault`]: every failure the dispatcher knows how to map to a response
//! - [`Output`], [`Arguments`], [`ErasedHandler`]: the handler contract
//! - [`Middleware`]: steps run before routing

mod context;
mod error;
mod fault;
mod handler;
mod middleware;
mod output;
mod request;
mod response;

pub use context::{RequestContext, RequestId};
pub use error::ContextError;
pub use fault::{AppFault, Fault, HttpFault, Redirect};
pub use handler::{handler_fn, Arguments, BoxFuture, ErasedHandler, HandlerResult};
pub use middleware::{middleware_fn, FnMiddleware, Middleware};
pub use output::Output;
pub use request::{MultiMap, Request, RequestBuilder};
pub use response::Response;
