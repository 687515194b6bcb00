//! FadeInk Render Library
//!
//! Redraws the doodle stroke store onto any [`DrawingSurface`], applying each
//! stroke's fade opacity and glow.
//!
//! [`DrawingSurface`]: fadeink_core::surface::DrawingSurface

mod renderer;

pub use renderer::{RenderContext, RenderStats, StrokeRenderer};
