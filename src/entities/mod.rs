mod client;
mod collect;
mod graph;
mod parse;

pub use client::ExtractionClient;
pub use collect::{FileSource, GraphSource, HttpSource, PollOutcome, RetryPolicy, poll_for_graph};
pub use graph::{Edge, EntityGraph, EntityType, GraphSnapshot, Node};
