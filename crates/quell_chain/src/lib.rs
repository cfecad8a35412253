//! Chain-of-responsibility stack of diagnostic handlers.
//!
//! A [`HandlerChain`] wraps the pipeline's terminal sink with a stack of
//! installed [`Handler`]s. Each reported diagnostic is offered to the active
//! (most recently installed) handler first; a handler either fully handles
//! it or delegates it unchanged to the handler installed before it, bottoming
//! out at the terminal sink, which accepts everything.
//!
//! Handlers are composed, not subclassed: a node holds no reference to its
//! predecessor; the chain owns the stack and drives delegation.

#![warn(missing_docs)]

mod chain;
mod handler;

pub use chain::{ChainError, HandlerChain, InstallToken};
pub use handler::{Handler, Outcome};
