//! SD-card log store.
//!
//! Implements [`LogStorePort`] on top of the FAT volume mounted into the
//! VFS (`/sdcard` on the device, any directory on the host).  Each query
//! opens its own buffered handle; dropping the reader closes the file.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::PathBuf;

use log::info;

use crate::app::ports::{LogStorePort, StorageError};
use crate::error::{Error, Result};

/// Default VFS mount point of the SD card.
pub const SD_MOUNT_POINT: &str = "/sdcard";

pub struct SdLogStore {
    root: PathBuf,
}

impl SdLogStore {
    /// Use the volume mounted at `mount_point`.
    pub fn new(mount_point: impl Into<PathBuf>) -> Result<Self> {
        let root = mount_point.into();
        if !root.is_dir() {
            return Err(Error::Init("log volume not mounted"));
        }
        info!("SdLogStore: using {}", root.display());
        Ok(Self { root })
    }
}

impl LogStorePort for SdLogStore {
    type Reader = BufReader<File>;

    fn open(&mut self, name: &str) -> core::result::Result<Self::Reader, StorageError> {
        File::open(self.root.join(name))
            .map(BufReader::new)
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StorageError::NotFound,
                _ => StorageError::IoError,
            })
    }
}
