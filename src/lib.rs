//! Docbot Web page behaviours
//!
//! The interactive behaviour of the document-analysis chatbot site, driven
//! against an in-memory page instead of a browser.
//!
//! # Architecture
//!
//! - **DOM model**: element arena, compound selectors, events
//! - **Page runtime**: run-to-completion dispatch with bubbling, an async
//!   task queue and disposable component mounts
//! - **Components**: auth-form validator, chat widget, page chrome
//!
//! # Modules
//!
//! - [`dom`]: Document, elements, selectors and events
//! - [`page`]: Page runtime and [`page::Mount`]
//! - [`auth`]: Login and signup validation
//! - [`chat`]: Chat widget, `/chatbot` transport and speech capability
//! - [`chrome`]: Navigation, scrolling, password meter and submit state
//! - [`scripts`]: Bootstrap mounting every component on a page
//! - [`pages`]: Page skeletons for the CLI and tests

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::float_cmp)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

pub mod auth;
pub mod chat;
pub mod chrome;
pub mod config;
pub mod dialog;
pub mod dom;
pub mod error;
pub mod page;
pub mod pages;
pub mod scripts;

pub use error::{ChatError, DomError, SpeechError};
pub use page::{Mount, Page};
pub use scripts::{PageScripts, ScriptDeps};
