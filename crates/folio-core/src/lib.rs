//! Folio Core Library
//!
//! Platform-agnostic element model, selection, undo history and pointer
//! interaction for the folio whiteboard. Rendering and the host UI sit on
//! top of [`Board`] and talk to it through [`BoardObserver`].

pub mod asset;
pub mod board;
pub mod camera;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod handles;
pub mod history;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod shortcuts;
pub mod snap;
pub mod storage;
pub mod store;

pub use asset::{Asset, ImageFormat};
pub use board::{Action, Board, BoardObserver, CreateHandle};
pub use camera::Camera;
pub use clipboard::{CLIPBOARD_PREFIX, ClipboardContent, ClipboardPayload, parse_clipboard};
pub use config::{BoardConfig, GRID_SIZE, MAX_HISTORY};
pub use document::{BoardDocument, DOCUMENT_VERSION};
pub use element::{Element, ElementId, ElementKind, ElementPatch, Field, FieldValue, GroupId};
pub use error::{FolioError, FolioResult};
pub use handles::HandleKind;
pub use history::{CoalesceKey, ElementUpdate, History, HistoryEntry};
pub use input::{Key, KeyEvent, Modifiers, PointerEvent};
pub use interaction::{EventHandler, SelectionRect};
pub use shortcuts::{Command, Shortcut, ShortcutRegistry};
pub use snap::{snap_to_grid, snap_value};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use store::ElementStore;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
