#![warn(clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::struct_excessive_bools,
    clippy::wildcard_imports,
    clippy::too_many_lines,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_arguments,
    clippy::doc_markdown
)]

pub mod app;
pub mod cache;
pub mod cli;
pub mod events;
pub mod filters;
pub mod gh;
pub mod input;
#[cfg(feature = "desktop-notify")]
pub mod notify;
pub mod select;
pub mod sync;
pub mod traits;
pub mod tui;
