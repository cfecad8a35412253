//! The reclassification plugin: demotes or suppresses unreported
//! exceptional-condition diagnostics in a host compilation pipeline.
//!
//! The plugin registers a lifecycle listener at `init`; an
//! [`AttachmentScheduler`] decides, per configured [`TriggerPolicy`], the
//! latest safe moment to attach. Attachment either installs a
//! [`ReclassifyHandler`] on the existing sink chain (non-invasive, the
//! default) or constructs a replacement sink and rebinds every
//! already-constructed pass's pinned reference (invasive).

#![warn(missing_docs)]

mod config;
mod handler;
mod plugin;
mod scheduler;

pub use config::Mode;
pub use handler::{default_rules, ReclassifyHandler, UNREPORTED_FAMILY};
pub use plugin::{ReclassifyPlugin, Strategy};
pub use scheduler::{AttachState, AttachmentScheduler, Decision, TriggerPolicy};
