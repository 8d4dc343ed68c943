//! Store backends.

pub mod inmemory;

pub use inmemory::InMemoryChatStore;
