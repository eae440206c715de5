mod comments;
mod common_endpoints;
mod feed;
mod pipeline;
