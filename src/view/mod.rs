//! View and UI layer
//!
//! This module contains the tree model, colors and terminal rendering.

pub mod file_tree;
pub mod theme;
pub mod ui;
