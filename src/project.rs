use std::path::PathBuf;
use uuid::Uuid;

use crate::canvas::CanvasState;

/// Single open document.
pub struct Project {
    pub id: Uuid,
    pub canvas: CanvasState,
    /// `None` for unsaved/untitled documents.
    pub path: Option<PathBuf>,

    /// Display name (derived from path or "Untitled-X")
    pub name: String,

    /// Canvas generation at the last save or load.
    saved_generation: u64,
}

impl Project {
    pub fn new_untitled(untitled_counter: usize, width: u32, height: u32) -> Self {
        Self::with_canvas(
            format!("Untitled-{}", untitled_counter),
            CanvasState::new(width, height),
            None,
        )
    }

    pub fn from_file(path: PathBuf, canvas: CanvasState) -> Self {
        let name = file_name_of(&path);
        Self::with_canvas(name, canvas, Some(path))
    }

    fn with_canvas(name: String, canvas: CanvasState, path: Option<PathBuf>) -> Self {
        let saved_generation = canvas.generation;
        Self {
            id: Uuid::new_v4(),
            canvas,
            path,
            name,
            saved_generation,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.canvas.generation != self.saved_generation
    }

    pub fn mark_clean(&mut self) {
        self.saved_generation = self.canvas.generation;
    }

    pub fn update_name_from_path(&mut self) {
        if let Some(ref path) = self.path {
            self.name = file_name_of(path);
        }
    }

    /// Display title with a trailing `*` while there are unsaved changes.
    pub fn display_title(&self) -> String {
        if self.is_dirty() {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}

fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}
