//! Plain-text grid export, one line of tile names per row

use crate::io::configuration::{EXPORT_SEPARATOR, UNDECIDED_MARKER};
use crate::io::error::{ErrorContext, Result, WithContext};
use crate::spatial::GridModel;
use std::fmt::Write as _;
use std::path::Path;

/// Render the grid as text
///
/// Names in a row are padded to the widest name in the grid so columns
/// line up; undecided cells are written as `UNDECIDED_MARKER`.
pub fn grid_to_text(grid: &GridModel<'_>) -> String {
    let rows = grid.rows();
    let width = rows
        .iter()
        .flatten()
        .map(|name| name.map_or(UNDECIDED_MARKER.len(), str::len))
        .max()
        .unwrap_or(0);

    let mut text = String::new();
    for row in &rows {
        let line = row
            .iter()
            .map(|name| format!("{:<width$}", name.unwrap_or(UNDECIDED_MARKER)))
            .collect::<Vec<_>>()
            .join(EXPORT_SEPARATOR);
        let _ = writeln!(text, "{}", line.trim_end());
    }
    text
}

/// Write the grid as text to a file
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The file cannot be written
pub fn export_grid_as_text(grid: &GridModel<'_>, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(ErrorContext {
                path: Some(parent.to_path_buf()),
                operation: Some("create directory"),
            })?;
        }
    }

    std::fs::write(output_path, grid_to_text(grid)).with_context(ErrorContext {
        path: Some(output_path.to_path_buf()),
        operation: Some("write grid"),
    })
}
