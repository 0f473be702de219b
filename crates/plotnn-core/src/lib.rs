//! plotnn Core Types and Definitions
//!
//! This crate provides the descriptor types for plotnn neural-network
//! diagrams. It includes:
//!
//! - **Geometry**: TikZ coordinates, anchors and placements ([`geometry`] module)
//! - **Colors**: The named palette and literal xcolor specifications ([`color`] module)
//! - **Elements**: Block, connection and composite descriptors ([`element`] module)

pub mod color;
pub mod element;
pub mod geometry;

mod composite;
