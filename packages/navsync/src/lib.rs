#![doc = include_str!("../README.md")]

mod config;
mod error;
mod navigator;
mod request;

pub mod logger;
pub mod query;

pub use config::*;
pub use error::*;
pub use navigator::*;
pub use request::*;

pub use navsync_document as document;
pub use navsync_history as history;

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::config::{Config, Events, SiteConfig};
    pub use crate::navigator::{on, Navigator};
    pub use crate::query::{decode_query, QueryMap};
    pub use crate::request::{DocMeta, Navigation, NavigationRequest};
    pub use navsync_document::{Document, HeadElement, MemoryDocument};
    pub use navsync_history::{History, MemoryHistory};

    #[cfg(feature = "web")]
    pub use crate::navigator::on_web;
    #[cfg(feature = "web")]
    pub use navsync_document::WebDocument;
    #[cfg(feature = "web")]
    pub use navsync_history::WebHistory;
}
