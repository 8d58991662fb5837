//! # piccolo-editor: Viewer core for piccolo
//!
//! The pieces between the terminal and the screen:
//!
//! - **[`document`]**: `Document` of immutable `Row`s loaded from a file
//! - **[`cursor`]**: `Cursor` in document coordinates with clamped movement
//! - **[`editor`]**: `Editor` state: cursor, scroll offset, key dispatch
//! - **[`view`]**: one-write frame rendering of the editor state
//! - **[`config`]**: environment-driven settings

pub mod config;
pub mod cursor;
pub mod document;
pub mod editor;
pub mod view;
