//! 保留区
//!
//! - #0: 启动扇区
//! - #1: FSInfo（仅FAT32）
//! - #6: 启动扇区备份（仅FAT32）
//! - #7: FSInfo备份（仅FAT32）
//!
//! 其余扇区读出全0。

mod bpb;
mod fs_info;

pub use self::{bpb::*, fs_info::FsInfo};
use crate::{FatType, VolumeConfig};

pub const FS_INFO_SECTOR: u32 = 1;
pub const BACKUP_BOOT_SECTOR: u32 = 6;
pub const BACKUP_FS_INFO_SECTOR: u32 = 7;

#[derive(Debug, Clone)]
pub struct ReservedArea {
    boot: BootBlock,
    fs_info: Option<FsInfo>,
}

impl ReservedArea {
    pub fn new(config: &VolumeConfig) -> Self {
        Self {
            boot: BootBlock::new(config),
            fs_info: (config.fat_type == FatType::Fat32).then(FsInfo::new),
        }
    }

    /// 读取保留区的第`offset`个扇区
    pub fn read_block(&self, offset: u32, buf: &mut [u8]) {
        buf.fill(0);
        match (offset, &self.fs_info) {
            (0, _) | (BACKUP_BOOT_SECTOR, Some(_)) => self.boot.read(0, buf),
            (FS_INFO_SECTOR | BACKUP_FS_INFO_SECTOR, Some(fs_info)) => fs_info.read(0, buf),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BLOCK_SIZE;

    #[test]
    fn fat32_backups() {
        let area = ReservedArea::new(&VolumeConfig::FAT32);
        let mut boot = [0u8; BLOCK_SIZE];
        let mut backup = [0u8; BLOCK_SIZE];
        area.read_block(0, &mut boot);
        area.read_block(BACKUP_BOOT_SECTOR, &mut backup);
        assert_eq!(boot, backup);
        assert_eq!([0x55, 0xAA], backup[510..]);

        area.read_block(FS_INFO_SECTOR, &mut boot);
        area.read_block(BACKUP_FS_INFO_SECTOR, &mut backup);
        assert_eq!(boot, backup);
        assert_eq!([0x00, 0x00, 0x55, 0xAA], backup[508..]);

        backup.fill(0xEE);
        area.read_block(2, &mut backup);
        assert!(backup.iter().all(|&b| b == 0));
    }

    #[test]
    fn fat16_has_no_fs_info() {
        let config = VolumeConfig {
            reserved_sectors: 8,
            ..VolumeConfig::FAT16
        };
        let area = ReservedArea::new(&config);
        let mut buf = [0xEEu8; BLOCK_SIZE];
        area.read_block(1, &mut buf);
        assert!(buf.iter().all(|&b| b == 0));
        area.read_block(6, &mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }
}
