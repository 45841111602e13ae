//! pinlabel Core Types and Definitions
//!
//! This crate provides the foundational types shared by the pinlabel parser,
//! resolver and exporters. It includes:
//!
//! - **Geometry**: Points, sizes, bounds, affine transforms and SVG lengths ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Pins**: Physical pins, logical names and merged pin records ([`pin`] module)
//! - **Board**: The merged, immutable board model ([`board::BoardDocument`])
//! - **Theme**: Label categories and their fills ([`theme`] module)
//! - **Draw**: Drawable SVG primitives and render layers ([`draw`] module)

pub mod board;
pub mod color;
pub mod draw;
pub mod geometry;
pub mod pin;
pub mod theme;
