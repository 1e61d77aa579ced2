pub mod html;
pub mod json;
pub mod traits;

pub use traits::Renderer;

/// Every renderer name accepted in `render.formats`.
pub const ALL_RENDERER_NAMES: &[&str] = &["html", "json"];

/// Look up a renderer by name.
pub fn build_renderer(name: &str) -> Option<Box<dyn Renderer>> {
    match name {
        "html" => Some(Box::new(html::HtmlRenderer)),
        "json" => Some(Box::new(json::JsonRenderer)),
        _ => None,
    }
}
