pub mod general;

pub use general::{assets_chart, simple_chart};
