//! # Tool Path Resolver
//!
//! This module finds the external codecs before a run starts:
//! - Explicit paths from the configuration (`/opt/webp/bin/cwebp`)
//! - Bare names looked up in the system PATH (`pngquant`)

use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves external tool binaries
#[derive(Debug, Default, Clone, Copy)]
pub struct ToolPathResolver;

impl ToolPathResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the path to a specific tool
    pub fn resolve_tool(&self, tool: &str) -> Option<PathBuf> {
        let candidate = Path::new(tool);
        if candidate.components().count() > 1 {
            debug!("Checking explicit tool path: {:?}", candidate);
            return candidate.is_file().then(|| candidate.to_path_buf());
        }

        let found = self.find_in_system_path(tool);
        debug!("Resolved tool {} -> {:?}", tool, found);
        found
    }

    /// Find tool in system PATH
    fn find_in_system_path(&self, tool_name: &str) -> Option<PathBuf> {
        let extension = if cfg!(windows) { ".exe" } else { "" };
        let tool_with_ext = format!("{}{}", tool_name, extension);

        env::split_paths(&env::var_os("PATH")?)
            .map(|dir| dir.join(&tool_with_ext))
            .find(|path| path.is_file())
    }

    /// Get installation instructions for a tool
    pub fn install_instructions(&self, tool: &str) -> String {
        let base_name = Path::new(tool)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| tool.to_string());

        match base_name.as_str() {
            "cwebp" => "sudo apt-get install webp  # or: brew install webp".to_string(),
            "pngquant" => "sudo apt-get install pngquant  # or: brew install pngquant".to_string(),
            _ => format!("ensure '{}' is installed and executable", tool),
        }
    }

    /// Check if a tool is available and provide installation instructions if not
    pub fn check_tool_with_instructions(&self, tool: &str) -> Result<PathBuf, String> {
        self.resolve_tool(tool).ok_or_else(|| {
            format!(
                "Tool '{}' not found. To install, run:\n  {}",
                tool,
                self.install_instructions(tool)
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let tool = temp_dir.path().join("cwebp");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();

        let resolver = ToolPathResolver::new();
        assert_eq!(resolver.resolve_tool(tool.to_str().unwrap()), Some(tool.clone()));
        assert!(resolver
            .resolve_tool(temp_dir.path().join("absent").to_str().unwrap())
            .is_none());
    }

    #[test]
    fn test_unknown_tool_not_available() {
        let resolver = ToolPathResolver::new();
        assert!(resolver.resolve_tool("definitely-not-a-real-codec-4242").is_none());
        let msg = resolver
            .check_tool_with_instructions("definitely-not-a-real-codec-4242")
            .unwrap_err();
        assert!(msg.contains("definitely-not-a-real-codec-4242"));
    }

    #[test]
    fn test_install_instructions() {
        let resolver = ToolPathResolver::new();
        assert!(resolver.install_instructions("cwebp").contains("webp"));
        assert!(resolver.install_instructions("/usr/local/bin/pngquant").contains("pngquant"));
    }
}
