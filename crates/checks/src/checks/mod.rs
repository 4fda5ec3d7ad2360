//! Built-in check implementations.
//!
//! Each probe lives in its own module and is enumerated in [`builtin`],
//! which is the runtime-registration counterpart of dropping a file into the
//! old checks folder. Registration paths mirror the source layout so the
//! registry's lexicographic order matches a directory walk.

pub mod backup_files;
pub mod rmi_classloader;

pub use backup_files::BackupFilesCheck;
pub use rmi_classloader::RmiClassloaderCheck;

use crate::runner::{CheckRegistry, RegistryBuilder};

/// Registry of all shipped checks.
pub fn builtin() -> CheckRegistry {
    let mut builder = RegistryBuilder::new();
    builder
        .register("RECON/backup_files", BackupFilesCheck::new())
        .register("RECON/rmi_classloader", RmiClassloaderCheck::new());
    builder.build()
}
