//! 卷的配置
//!
//! 只声明少量参数，FAT大小、数据区位置、簇数等一律由此推导，
//! 启动扇区中的字段因此不会与实际布局脱节。

use crate::{BLOCK_SIZE, ConfigError, DosDate, DosTime};

/// 一簇一块
pub const SECTORS_PER_CLUSTER: u32 = 1;

/// 为兼容性考虑，FAT数量固定为2
pub const FAT_COUNT: u32 = 2;

/// FAT表项宽度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatType {
    Fat16,
    Fat32,
}

impl FatType {
    pub const fn entry_bytes(self) -> usize {
        match self {
            Self::Fat16 => 2,
            Self::Fat32 => 4,
        }
    }

    /// 表项0和1的填充值
    pub const fn reserved_entry(self) -> u32 {
        match self {
            Self::Fat16 => 0xFFFF,
            Self::Fat32 => 0xFFFF_FFFF,
        }
    }

    pub const fn end_of_chain(self) -> u32 {
        match self {
            Self::Fat16 => 0xFFF8,
            Self::Fat32 => 0xFFFF_FFF8,
        }
    }

    /// 坏簇。没有文件的簇都标为坏簇，主机就无法在卷上新建或扩展文件。
    pub const fn bad_cluster(self) -> u32 {
        match self {
            Self::Fat16 => 0xFFF7,
            Self::Fat32 => 0xFFFF_FFF7,
        }
    }

    /// 启动扇区中的文件系统类型标签，只作告示
    pub const fn fs_label(self) -> [u8; 8] {
        match self {
            Self::Fat16 => *b"FAT16   ",
            Self::Fat32 => *b"FAT32   ",
        }
    }

    /// 主机按簇数判定FAT类型。FAT12不支持，返回`None`。
    pub const fn from_clusters(clusters: u32) -> Option<Self> {
        if clusters < 4085 {
            None
        } else if clusters < 65525 {
            Some(Self::Fat16)
        } else {
            Some(Self::Fat32)
        }
    }
}

/// 物理媒介的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Media {
    Fixed = 0xF8,
    Removable = 0xF0,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeConfig {
    pub fat_type: FatType,

    /// 卷的总块数
    pub total_blocks: u32,

    /// 保留区的扇区数，包括启动扇区
    pub reserved_sectors: u16,

    /// 根目录容纳的目录项数（包括卷标）。
    ///
    /// - FAT16: 写入启动扇区
    /// - FAT32: 启动扇区中为0，根目录作为簇链放在数据区开头
    pub root_entries: u16,

    /// 一般用于记录什么系统格式化此卷
    pub oem_name: [u8; 8],

    /// 卷标，与根目录中的卷标目录项一致
    pub volume_label: [u8; 11],

    pub volume_serial: u32,

    pub media: Media,

    /// 卷标目录项的时间戳
    pub label_time: DosTime,
    pub label_date: DosDate,
}

impl VolumeConfig {
    /// 约20MiB，足以放下16MiB的闪存文件
    pub const FAT16: Self = Self {
        fat_type: FatType::Fat16,
        total_blocks: 40960,
        reserved_sectors: 1,
        root_entries: 512,
        oem_name: *b"MSDOS5.0",
        volume_label: *b"KETYERE MSD",
        volume_serial: 0,
        media: Media::Removable,
        label_time: DosTime::new(12, 34, 56),
        label_date: DosDate::new(2021, 1, 2),
    };

    /// FAT32至少要有65525个簇
    pub const FAT32: Self = Self {
        fat_type: FatType::Fat32,
        total_blocks: 70000,
        reserved_sectors: 32,
        ..Self::FAT16
    };

    pub const fn with_total_blocks(mut self, total_blocks: u32) -> Self {
        self.total_blocks = total_blocks;
        self
    }

    pub const fn with_label(mut self, volume_label: [u8; 11]) -> Self {
        self.volume_label = volume_label;
        self
    }

    pub const fn with_serial(mut self, volume_serial: u32) -> Self {
        self.volume_serial = volume_serial;
        self
    }

    pub const fn with_root_entries(mut self, root_entries: u16) -> Self {
        self.root_entries = root_entries;
        self
    }
}

impl VolumeConfig {
    pub const fn root_dir_sectors(&self) -> u32 {
        (self.root_entries as u32 * 32).div_ceil(BLOCK_SIZE as u32)
    }

    /// 计算FAT占用的扇区数（Microsoft FAT规范中的算法，结果略偏大）
    pub const fn fat_sectors(&self) -> u32 {
        let root_dir_sectors = match self.fat_type {
            FatType::Fat16 => self.root_dir_sectors(),
            FatType::Fat32 => 0,
        };
        let tmp1 = self
            .total_blocks
            .saturating_sub(self.reserved_sectors as u32 + root_dir_sectors);
        let mut tmp2 = 256 * SECTORS_PER_CLUSTER + FAT_COUNT;

        if matches!(self.fat_type, FatType::Fat32) {
            tmp2 /= 2;
        }
        tmp1.div_ceil(tmp2)
    }

    /// 数据区（簇2）的起始扇区
    pub const fn data_sector(&self) -> u32 {
        let fat_end = self.reserved_sectors as u32 + FAT_COUNT * self.fat_sectors();
        match self.fat_type {
            FatType::Fat16 => fat_end + self.root_dir_sectors(),
            FatType::Fat32 => fat_end,
        }
    }

    /// 数据区的簇数
    pub const fn cluster_count(&self) -> u32 {
        self.total_blocks.saturating_sub(self.data_sector()) / SECTORS_PER_CLUSTER
    }

    /// 一份FAT能容纳的表项数
    pub const fn fat_entries(&self) -> u32 {
        self.fat_sectors() * BLOCK_SIZE as u32 / self.fat_type.entry_bytes() as u32
    }

    /// 根目录簇链的长度，仅FAT32非0
    pub const fn root_dir_clusters(&self) -> u32 {
        match self.fat_type {
            FatType::Fat16 => 0,
            FatType::Fat32 => self.root_dir_sectors(),
        }
    }

    /// FAT32需要容纳FSInfo(#1)、启动扇区备份(#6)与FSInfo备份(#7)
    pub const fn min_reserved_sectors(&self) -> u16 {
        match self.fat_type {
            FatType::Fat16 => 1,
            FatType::Fat32 => 8,
        }
    }

    /// 检查卷参数自洽，不涉及文件表
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = self.min_reserved_sectors();
        if self.reserved_sectors < required {
            return Err(ConfigError::ReservedTooSmall {
                reserved: self.reserved_sectors,
                required,
            });
        }

        let clusters = self.cluster_count();
        if FatType::from_clusters(clusters) != Some(self.fat_type) {
            return Err(ConfigError::FatTypeMismatch {
                configured: self.fat_type,
                clusters,
            });
        }

        // 表项0、1保留
        let entries = self.fat_entries();
        if entries < clusters + 2 {
            return Err(ConfigError::FatTooSmall { entries, clusters });
        }

        Ok(())
    }
}
