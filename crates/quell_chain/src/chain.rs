//! The handler stack rooted at a terminal sink.

use crate::handler::{Handler, Outcome};
use quell_diagnostics::{Diagnostic, TerminalSink};
use std::sync::Mutex;

/// Identifies one installed handler node for later uninstall.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct InstallToken {
    id: u64,
}

/// Errors from handler chain mutation.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// `uninstall` was called with a token that does not correspond to the
    /// currently active node. Chains must be torn down in strict reverse
    /// installation order.
    #[error("uninstall out of order: token {0:?} is not the active handler")]
    OrderingViolation(InstallToken),
}

struct Node {
    token: InstallToken,
    handler: Box<dyn Handler>,
}

struct Stack {
    nodes: Vec<Node>,
    next_id: u64,
}

/// A stack of diagnostic handlers over a terminal sink.
///
/// This is the shared sink instance that analysis passes pin at construction
/// time: because passes capture the chain itself, installing a handler
/// changes what every pinned reference observes without touching the
/// references. One chain exists per compilation context; it is not shared
/// across contexts.
pub struct HandlerChain {
    terminal: Box<dyn TerminalSink>,
    stack: Mutex<Stack>,
}

impl HandlerChain {
    /// Creates a chain whose bottom is the given terminal sink.
    pub fn new(terminal: Box<dyn TerminalSink>) -> Self {
        Self {
            terminal,
            stack: Mutex::new(Stack {
                nodes: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// Pushes `handler` as the new active node and returns its token.
    ///
    /// If the active node's handler has the same [`Handler::name`], the node
    /// is updated in place with the new handler's configuration and the
    /// original token is returned; no duplicate layer is stacked, so no
    /// diagnostic is ever classified twice by the same implementation.
    pub fn install(&self, handler: Box<dyn Handler>) -> InstallToken {
        let mut stack = self.stack.lock().unwrap();
        if let Some(top) = stack.nodes.last_mut() {
            if top.handler.name() == handler.name() {
                top.handler = handler;
                return top.token;
            }
        }
        let token = InstallToken { id: stack.next_id };
        stack.next_id += 1;
        stack.nodes.push(Node { token, handler });
        token
    }

    /// Pops the active node, restoring the previously installed node.
    ///
    /// Fails with [`ChainError::OrderingViolation`] if `token` does not
    /// correspond to the active node.
    pub fn uninstall(&self, token: InstallToken) -> Result<(), ChainError> {
        let mut stack = self.stack.lock().unwrap();
        match stack.nodes.last() {
            Some(top) if top.token == token => {
                stack.nodes.pop();
                Ok(())
            }
            _ => Err(ChainError::OrderingViolation(token)),
        }
    }

    /// Reports a diagnostic through the chain, top to bottom.
    ///
    /// Each handler either fully handles the diagnostic or delegates it
    /// unchanged; the terminal sink accepts whatever reaches the bottom.
    /// This never fails: reclassification must not cause a harder failure
    /// than the diagnostics it softens.
    pub fn report(&self, diag: Diagnostic) {
        let stack = self.stack.lock().unwrap();
        let mut current = diag;
        for node in stack.nodes.iter().rev() {
            match node.handler.handle(current, &*self.terminal) {
                Outcome::Handled => return,
                Outcome::Delegate(diag) => current = diag,
            }
        }
        self.terminal.accept(current);
    }

    /// Returns the number of installed (non-terminal) handlers.
    pub fn depth(&self) -> usize {
        self.stack.lock().unwrap().nodes.len()
    }

    /// Returns `true` if `token` identifies the currently active node.
    pub fn is_active(&self, token: InstallToken) -> bool {
        self.stack
            .lock()
            .unwrap()
            .nodes
            .last()
            .is_some_and(|top| top.token == token)
    }
}

impl TerminalSink for HandlerChain {
    /// A chain can itself serve as the terminal of another chain, so a
    /// replacement sink can bottom out into the original one.
    fn accept(&self, diag: Diagnostic) {
        self.report(diag);
    }
}
