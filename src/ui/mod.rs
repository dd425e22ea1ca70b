/// Terminal presentation: input drain + double-buffered renderer.

pub mod input;
pub mod renderer;
