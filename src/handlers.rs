pub mod comments;
pub mod common;
pub mod feed;
pub mod pipeline;

pub use comments::get_comments;
pub use common::{health, root};
pub use feed::{get_feed_all, get_feed_page};
pub use pipeline::{classify_post, extract_soap};
