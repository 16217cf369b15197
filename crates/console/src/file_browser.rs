//! Remote file browser with multi-select deletion.
//!
//! Holds the current listing path, the fetched entries, and the checked
//! selection. Navigation is fetch-then-commit: a failed listing fetch
//! leaves path, entries, and selection exactly as they were. Deletion is
//! gated on the session permission flag resolved once at open time.

use std::sync::Arc;

use chargen_client::ConsoleApi;
use chargen_core::browse::{self, FileEntry, FileKind, SelectionSet, ROOT_PATH};

use crate::error::ConsoleResult;

/// Browsing session over the remote output tree.
pub struct FileBrowser {
    api: Arc<ConsoleApi>,
    path: String,
    entries: Vec<FileEntry>,
    selection: SelectionSet,
    can_delete: bool,
}

impl FileBrowser {
    /// Open a browser at the listing root.
    ///
    /// The deletion permission is resolved first; if the permission
    /// check fails the browser still opens, with deletion disabled for
    /// the whole session.
    pub async fn open(api: Arc<ConsoleApi>) -> ConsoleResult<Self> {
        let can_delete = match api.user_permissions().await {
            Ok(permissions) => permissions.can_delete_files,
            Err(e) => {
                tracing::warn!(error = %e, "Permission check failed, file deletion disabled");
                false
            }
        };

        let mut browser = Self {
            api,
            path: ROOT_PATH.to_string(),
            entries: Vec::new(),
            selection: SelectionSet::default(),
            can_delete,
        };
        browser.navigate(ROOT_PATH).await?;
        Ok(browser)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn can_delete(&self) -> bool {
        self.can_delete
    }

    /// Fetch the listing at `path` and make it current.
    ///
    /// The path is validated before any request goes out. On success the
    /// selection is cleared; on failure the previous path, entries, and
    /// selection all stay current.
    pub async fn navigate(&mut self, path: &str) -> ConsoleResult<&[FileEntry]> {
        browse::validate_path(path)?;
        let entries = self.api.list_files(path).await?;

        self.path = path.to_string();
        self.entries = entries;
        self.selection.clear();
        Ok(&self.entries)
    }

    /// Descend into a folder of the current listing.
    pub async fn enter_folder(&mut self, folder: &str) -> ConsoleResult<&[FileEntry]> {
        let target = browse::child_path(&self.path, folder);
        self.navigate(&target).await
    }

    /// Ascend one level; at the root this is a no-op.
    pub async fn navigate_back(&mut self) -> ConsoleResult<&[FileEntry]> {
        if self.path == ROOT_PATH {
            return Ok(&self.entries);
        }
        let parent = browse::parent_path(&self.path);
        self.navigate(&parent).await
    }

    /// Flip one file in or out of the selection. Returns whether the
    /// name is selected afterwards; folders and names not in the current
    /// listing are never selected.
    pub fn toggle_selection(&mut self, name: &str) -> bool {
        let selectable = self
            .entries
            .iter()
            .any(|entry| entry.name == name && entry.kind == FileKind::File);
        if !selectable {
            return false;
        }
        self.selection.toggle(name)
    }

    /// Select every file in the current listing.
    pub fn select_all(&mut self) {
        self.selection.select_files(&self.entries);
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Delete the selected files and refresh the listing.
    ///
    /// Without the deletion permission, or with nothing selected, this
    /// is a no-op reporting zero deletions. Returns the number of files
    /// handed to the backend for deletion.
    pub async fn delete_selected(&mut self) -> ConsoleResult<usize> {
        if !self.can_delete || self.selection.is_empty() {
            return Ok(0);
        }

        let names = self.selection.names();
        self.api.delete_files(&self.path, &names).await?;
        tracing::info!(path = %self.path, count = names.len(), "Deleted files");

        let current = self.path.clone();
        self.navigate(&current).await?;
        Ok(names.len())
    }
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
