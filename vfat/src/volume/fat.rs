//! 文件分配表
//!
//! 表项由文件表现算：文件占用的簇串成链，其余的簇全部标为坏簇，
//! 主机因此找不到空闲簇，只能原地修改已有文件。

use crate::{BLOCK_SIZE, ClusterId, FatType, FileDescriptor, Layout, Media, VolumeConfig};

/// FAT表项的含义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatEntry {
    /// 表项0，低字节为媒介类型
    Media(Media),
    /// 表项1
    Reserved,
    Next(ClusterId),
    EndOfChain,
    Bad,
}

impl FatEntry {
    /// 表项的原始值，宽度由FAT类型决定
    pub const fn raw(self, fat_type: FatType) -> u32 {
        match self {
            Self::Media(media) => fat_type.reserved_entry() & !0xFF | media as u32,
            Self::Reserved => fat_type.reserved_entry(),
            Self::Next(id) => id.get(),
            Self::EndOfChain => fat_type.end_of_chain(),
            Self::Bad => fat_type.bad_cluster(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FatArea {
    fat_type: FatType,
    media: Media,
    /// FAT32根目录簇链之后的第一个簇，FAT16为[`ClusterId::MIN`]
    first_file_cluster: ClusterId,
}

impl FatArea {
    pub fn new(config: &VolumeConfig, layout: &Layout) -> Self {
        Self {
            fat_type: config.fat_type,
            media: config.media,
            first_file_cluster: layout.first_file_cluster(),
        }
    }

    /// 一个扇区能容纳多少个表项
    pub const fn sector_entries(&self) -> u32 {
        (BLOCK_SIZE / self.fat_type.entry_bytes()) as u32
    }

    pub fn entry(&self, files: &[FileDescriptor], id: ClusterId) -> FatEntry {
        match id.get() {
            0 => return FatEntry::Media(self.media),
            1 => return FatEntry::Reserved,
            _ => {}
        }

        // FAT32的根目录簇链
        if id < self.first_file_cluster {
            let next = id + 1;
            return if next < self.first_file_cluster {
                FatEntry::Next(next)
            } else {
                FatEntry::EndOfChain
            };
        }

        let unit = id.get() - self.first_file_cluster.get();
        match Layout::locate(files, unit) {
            Some((index, offset)) if offset + 1 == files[index].clusters() => FatEntry::EndOfChain,
            Some(_) => FatEntry::Next(id + 1),
            None => FatEntry::Bad,
        }
    }

    /// 读取一份FAT的第`offset`个扇区，两份FAT内容相同
    pub fn read_block(&self, files: &[FileDescriptor], offset: u32, buf: &mut [u8]) {
        let width = self.fat_type.entry_bytes();
        let first = offset * self.sector_entries();

        for (i, slot) in buf.chunks_exact_mut(width).enumerate() {
            let raw = self.entry(files, ClusterId::new(first + i as u32)).raw(self.fat_type);
            slot.copy_from_slice(&raw.to_le_bytes()[..width]);
        }
    }
}
