//! Capabilities normally provided by the browser: menus, storage, dialogs.

pub mod dialog;
pub mod menus;
pub mod storage;

pub use dialog::{Notifier, RfdNotifier};
pub use menus::{
    ClickTarget, ContextKind, ContextMenuHost, MenuClick, MenuEntry, MenuError, MenuRegistry,
    PageContext,
};
pub use storage::{JsonFileStorage, SettingsStorage, StorageError};
