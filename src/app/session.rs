//! Browsing session state
//!
//! A `Session` owns everything a scan depends on: the folder, the
//! show-files filter, the sort column and order, and the resulting view.
//! Every operation goes through it instead of through shared globals.

use crate::config::{Config, ExportConfig};
use crate::services::fs::FsBackend;
use crate::services::tree_image::{self, ExportError, ExportedImage};
use crate::view::file_tree::{
    BuildOptions, FileTree, FileTreeView, NodeId, ScanError, SortKey, SortOrder,
};
use crate::view::theme::Theme;
use std::path::{Path, PathBuf};

pub struct Session {
    backend: Box<dyn FsBackend>,
    current_folder: Option<PathBuf>,
    show_files: bool,
    view: FileTreeView,
    theme: Theme,
    export_config: ExportConfig,
}

impl Session {
    pub fn new(backend: Box<dyn FsBackend>, config: &Config) -> Self {
        Self {
            backend,
            current_folder: None,
            show_files: config.tree.show_files,
            view: FileTreeView::new(
                FileTree::empty(),
                config.tree.sort_key,
                config.tree.sort_order,
            ),
            theme: Theme::from_name(&config.theme),
            export_config: config.export.clone(),
        }
    }

    pub fn current_folder(&self) -> Option<&Path> {
        self.current_folder.as_deref()
    }

    pub fn show_files(&self) -> bool {
        self.show_files
    }

    pub fn view(&self) -> &FileTreeView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut FileTreeView {
        &mut self.view
    }

    pub fn tree(&self) -> &FileTree {
        self.view.tree()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn export_config(&self) -> &ExportConfig {
        &self.export_config
    }

    fn build_options(&self) -> BuildOptions {
        BuildOptions {
            show_files: self.show_files,
            sort_key: self.view.sort_key(),
            sort_order: self.view.sort_order(),
        }
    }

    /// Scan `path` and make it the current folder.
    ///
    /// On failure the previous folder and tree are kept.
    pub fn select_folder(&mut self, path: impl Into<PathBuf>) -> Result<(), ScanError> {
        let path = path.into();
        tracing::info!("Selected folder {:?}", path);
        let tree = FileTree::build(&path, self.backend.as_ref(), &self.build_options())?;
        self.view.replace_tree(tree);
        self.current_folder = Some(path);
        Ok(())
    }

    /// Discard the tree and scan the current folder again.
    ///
    /// Expand state is not carried over. No-op without a folder.
    pub fn rescan(&mut self) -> Result<(), ScanError> {
        let Some(path) = self.current_folder.clone() else {
            tracing::debug!("No folder selected, nothing to scan");
            return Ok(());
        };
        let tree = FileTree::build(&path, self.backend.as_ref(), &self.build_options())?;
        self.view.replace_tree(tree);
        Ok(())
    }

    /// Flip the show-files filter and rebuild
    pub fn toggle_show_files(&mut self) -> Result<(), ScanError> {
        self.set_show_files(!self.show_files)
    }

    /// Change the show-files filter and rebuild.
    ///
    /// The filter only changes when the rebuild succeeds, so it always
    /// matches the tree on screen.
    pub fn set_show_files(&mut self, show_files: bool) -> Result<(), ScanError> {
        tracing::debug!("Show files: {}", show_files);
        let previous = std::mem::replace(&mut self.show_files, show_files);
        if let Err(e) = self.rescan() {
            self.show_files = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Re-sort by a column header; the active column flips its order
    pub fn sort_by_column(&mut self, key: SortKey) {
        self.view.sort_by_column(key);
    }

    pub fn set_sort(&mut self, key: SortKey, order: SortOrder) {
        self.view.set_sort(key, order);
    }

    /// Global toggle; returns the state applied, None on an empty tree
    pub fn toggle_all(&mut self) -> Option<bool> {
        let applied = self.view.tree_mut().toggle_all();
        self.view.reveal_selection();
        applied
    }

    pub fn set_all_expanded(&mut self, expand: bool) {
        self.view.tree_mut().set_all_expanded(expand);
        self.view.reveal_selection();
    }

    /// Expand or collapse the selected folder
    pub fn toggle_selected(&mut self) -> bool {
        let Some(id) = self.view.get_selected() else {
            return false;
        };
        self.view.tree_mut().toggle_node(id)
    }

    pub fn set_selected_expanded(&mut self, expand: bool) -> bool {
        let Some(id) = self.view.get_selected() else {
            return false;
        };
        self.view.tree_mut().set_expanded(id, expand)
    }

    /// Scoped toggle: `id` and everything below it
    pub fn set_subtree_expanded(&mut self, id: NodeId, expand: bool) -> usize {
        let changed = self.view.tree_mut().set_subtree_expanded(id, expand);
        tracing::debug!(
            "{} {} folders under {}",
            if expand { "Expanded" } else { "Collapsed" },
            changed,
            id
        );
        changed
    }

    /// Export the tree as displayed to `path` at the given pixel width
    pub fn export(
        &self,
        path: &Path,
        width: Option<u32>,
    ) -> Result<Option<ExportedImage>, ExportError> {
        let width = width.unwrap_or(self.export_config.width);
        tree_image::export_tree(
            self.view.tree(),
            path,
            &self.theme,
            &self.export_config,
            width,
        )
    }
}
