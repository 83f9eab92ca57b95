mod pack_to_svg;
pub mod svg_util;
mod vis_to_svg;

#[doc(inline)]
pub use pack_to_svg::pack_output_to_svg;
#[doc(inline)]
pub use vis_to_svg::visualization_to_svg;
