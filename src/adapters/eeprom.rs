//! EEPROM image adapter.
//!
//! The persisted usage counters live in a small byte image stored as one
//! NVS blob (namespace `eeprom`, key `image`).  This adapter exposes that
//! image through [`EepromPort`] with EEPROM semantics: a missing or short
//! blob reads as erased (`0xFF`) bytes, and reads past the end fail.

use log::debug;

use crate::app::ports::{EepromPort, StorageError, StoragePort};

/// Size of the emulated EEPROM in bytes.
pub const EEPROM_SIZE: usize = 64;

const EEPROM_NAMESPACE: &str = "eeprom";
const EEPROM_KEY: &str = "image";

const ERASED: u8 = 0xFF;

pub struct EepromImage<S> {
    storage: S,
}

impl<S: StoragePort> EepromImage<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn load(&self) -> Result<[u8; EEPROM_SIZE], StorageError> {
        let mut image = [ERASED; EEPROM_SIZE];
        match self.storage.read(EEPROM_NAMESPACE, EEPROM_KEY, &mut image) {
            Ok(len) => {
                image[len..].fill(ERASED);
                Ok(image)
            }
            Err(StorageError::NotFound) => {
                debug!("EepromImage: no image stored, reading erased bytes");
                Ok(image)
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite `data.len()` bytes at `addr`.
    ///
    /// The command core never writes; this is for the logging side of the
    /// firmware and for provisioning test images.
    pub fn write(&mut self, addr: usize, data: &[u8]) -> Result<(), StorageError> {
        let end = addr.checked_add(data.len()).ok_or(StorageError::OutOfBounds)?;
        if end > EEPROM_SIZE {
            return Err(StorageError::OutOfBounds);
        }
        let mut image = self.load()?;
        image[addr..end].copy_from_slice(data);
        self.storage.write(EEPROM_NAMESPACE, EEPROM_KEY, &image)
    }
}

impl<S: StoragePort> EepromPort for EepromImage<S> {
    fn read(&self, addr: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let end = addr.checked_add(buf.len()).ok_or(StorageError::OutOfBounds)?;
        if end > EEPROM_SIZE {
            return Err(StorageError::OutOfBounds);
        }
        let image = self.load()?;
        buf.copy_from_slice(&image[addr..end]);
        Ok(())
    }
}
