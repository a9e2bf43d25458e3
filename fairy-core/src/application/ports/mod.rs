pub mod renderer;

pub use renderer::{RenderContext, ReportRenderer};
