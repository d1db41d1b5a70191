//! Core URL types shared by the resolvers and the CLI.

pub mod link;
pub mod url;

pub use link::LinkKind;
pub use url::{AbsoluteUrl, UrlError, UrlHelper, encode_path};
