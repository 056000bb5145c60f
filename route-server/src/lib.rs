//! Transit route server.
//!
//! Builds a station graph from line and complex data, computes all-pairs
//! shortest paths once, and answers "how do I get from A to B?" from the
//! resulting matrices.

pub mod domain;
pub mod dump;
pub mod network;
pub mod planner;
pub mod registry;
pub mod schedule;
pub mod walkable;
pub mod web;
