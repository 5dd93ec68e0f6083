//! Two-region message buffer
//!
//! Chunks land in the small RAM region while they fit. The first chunk that
//! does not fit moves everything into the larger flash region, which then
//! receives every later chunk of the message.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Ram,
    Flash,
}

#[derive(Debug, Clone, Default)]
pub struct Buffering {
    ram: Vec<u8>,
    ram_capacity: usize,
    flash: Vec<u8>,
    flash_capacity: usize,
    in_flash: bool,
}

impl Buffering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size both regions and drop any content
    pub fn init(&mut self, ram_capacity: usize, flash_capacity: usize) {
        self.ram = Vec::with_capacity(ram_capacity);
        self.ram_capacity = ram_capacity;
        self.flash = Vec::with_capacity(flash_capacity);
        self.flash_capacity = flash_capacity;
        self.in_flash = false;
    }

    pub fn reset(&mut self) {
        self.ram.clear();
        self.flash.clear();
        self.in_flash = false;
    }

    /// Append a chunk; returns the bytes accepted, 0 when it does not fit
    pub fn append(&mut self, data: &[u8]) -> usize {
        if !self.in_flash {
            if self.ram.len() + data.len() <= self.ram_capacity {
                self.ram.extend_from_slice(data);
                return data.len();
            }
            if self.ram.len() + data.len() > self.flash_capacity {
                return 0;
            }
            debug!(
                "Moving {} buffered bytes from RAM to flash",
                self.ram.len()
            );
            self.flash.clear();
            self.flash.append(&mut self.ram);
            self.in_flash = true;
        }

        if self.flash.len() + data.len() > self.flash_capacity {
            return 0;
        }
        self.flash.extend_from_slice(data);
        data.len()
    }

    pub fn buffer(&self) -> &[u8] {
        if self.in_flash {
            &self.flash
        } else {
            &self.ram
        }
    }

    pub fn length(&self) -> usize {
        self.buffer().len()
    }

    pub fn region(&self) -> Region {
        if self.in_flash {
            Region::Flash
        } else {
            Region::Ram
        }
    }
}
