use std::path::PathBuf;

/// Text shown by a name indicator while its slot holds no file.
pub const NO_FILE_CHOSEN: &str = "No file chosen";

/// One file handed over by the host, either from the picker or from a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size,
        }
    }
}

/// The file list of one input. The displayed name is always derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadSlot {
    files: Vec<SelectedFile>,
}

impl UploadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held file list. Empty lists are ignored so a slot never
    /// reverts to the "no file" state once something was chosen.
    ///
    /// Returns `true` when the list was replaced.
    pub fn accept(&mut self, files: Vec<SelectedFile>) -> bool {
        if files.is_empty() {
            return false;
        }
        self.files = files;
        true
    }

    /// The authoritative file: the first one in the list.
    pub fn accepted_file(&self) -> Option<&SelectedFile> {
        self.files.first()
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn display_name(&self) -> &str {
        self.accepted_file()
            .map(|file| file.name.as_str())
            .unwrap_or(NO_FILE_CHOSEN)
    }

    pub fn is_active(&self) -> bool {
        !self.files.is_empty()
    }
}

/// Drag-and-drop events delivered for one drop region.
///
/// The host suppresses its own default action for all four events before
/// delivering them; a drop handled by the host would open the file in place
/// of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop(Vec<SelectedFile>),
}

/// Highlight state of a drop region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropZone {
    highlighted: bool,
}

impl DropZone {
    /// Applies a drag event and hands back the dropped files, if any.
    pub fn handle(&mut self, event: DragEvent) -> Option<Vec<SelectedFile>> {
        match event {
            DragEvent::Enter | DragEvent::Over => {
                self.highlighted = true;
                None
            }
            DragEvent::Leave => {
                self.highlighted = false;
                None
            }
            DragEvent::Drop(files) => {
                self.highlighted = false;
                Some(files)
            }
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}
