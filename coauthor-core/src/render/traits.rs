use std::path::{Path, PathBuf};

use crate::config::LayoutConfig;
use crate::error::RenderError;
use crate::style::RenderSpec;

/// Common interface for output artifact generators.
pub trait Renderer: Send + Sync + std::fmt::Debug {
    /// Name used in configuration and on the command line.
    fn name(&self) -> &'static str;

    /// File extension of the artifact.
    fn extension(&self) -> &'static str;

    /// Generate the artifact content.
    fn render(&self, spec: &RenderSpec, layout: &LayoutConfig) -> Result<String, RenderError>;

    /// Where this renderer writes, given the configured output path.
    fn output_path(&self, base: &Path) -> PathBuf {
        base.with_extension(self.extension())
    }

    /// Render and write the artifact, creating parent directories as needed.
    /// Returns the path written.
    fn write(
        &self,
        spec: &RenderSpec,
        layout: &LayoutConfig,
        base: &Path,
    ) -> Result<PathBuf, RenderError> {
        let content = self.render(spec, layout)?;
        let output = self.output_path(base);

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&output, content)?;

        Ok(output)
    }
}
