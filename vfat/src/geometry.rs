//! 几何计算
//!
//! 块设备的布局：
//!
//! 保留区 | FAT1 | FAT2 | 根目录 | 文件区
//!
//! 根目录在两种FAT类型下占同样的块，区别只在簇号：
//! FAT16的根目录不属于数据区，簇2就是第一个文件；
//! FAT32的根目录是数据区开头的一条簇链，文件从它之后开始编号。
//!
//! 文件按文件表的顺序连续分配，不存在碎片，也不复用空闲簇。
//! 文件到簇的映射每次都线性扫描文件表，文件不多时足够快。

use crate::{ClusterId, FileDescriptor, SectorId, VolumeConfig, config::FAT_COUNT};

/// 块所在的区域，偏移相对于该区域的起点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// 启动扇区、FSInfo及其备份
    Reserved { offset: u32 },
    /// `copy`为0或1，两份FAT内容相同
    Fat { copy: u32, offset: u32 },
    RootDir { offset: u32 },
    /// 文件区。超出卷尾的块也归入此处，读出全0。
    Data { offset: u32 },
}

/// 各区域的边界，构造时由配置推导，之后不再计算
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    fat_start: SectorId,
    fat_sectors: u32,
    root_start: SectorId,
    file_start: SectorId,
    total: u32,
    /// 第一个文件的簇号
    first_file_cluster: ClusterId,
}

impl Layout {
    pub fn new(config: &VolumeConfig) -> Self {
        let fat_start = SectorId::new(config.reserved_sectors as u32);
        let fat_sectors = config.fat_sectors();
        let root_start = fat_start + FAT_COUNT * fat_sectors;
        let file_start = root_start + config.root_dir_sectors();

        Self {
            fat_start,
            fat_sectors,
            root_start,
            file_start,
            total: config.total_blocks,
            first_file_cluster: ClusterId::MIN + config.root_dir_clusters(),
        }
    }

    /// 按固定的优先级判断块所在的区域
    pub fn region(&self, block: u32) -> Region {
        let block = SectorId::new(block);
        if block < self.fat_start {
            Region::Reserved {
                offset: block.get(),
            }
        } else if block < self.root_start {
            let offset = block.get() - self.fat_start.get();
            Region::Fat {
                copy: offset / self.fat_sectors,
                offset: offset % self.fat_sectors,
            }
        } else if block < self.file_start {
            Region::RootDir {
                offset: block.get() - self.root_start.get(),
            }
        } else {
            Region::Data {
                offset: block.get() - self.file_start.get(),
            }
        }
    }

    pub const fn fat_start(&self) -> SectorId {
        self.fat_start
    }

    pub const fn root_start(&self) -> SectorId {
        self.root_start
    }

    /// 第一个文件的首块
    pub const fn file_start(&self) -> SectorId {
        self.file_start
    }

    pub const fn total_blocks(&self) -> u32 {
        self.total
    }

    pub const fn first_file_cluster(&self) -> ClusterId {
        self.first_file_cluster
    }

    /// 找到文件区第`unit`簇所属的文件，返回(文件索引, 文件内的簇偏移)。
    ///
    /// 判定条件是`unit < 累计终点`：文件的最后一簇属于它，下一簇属于下一个文件。
    /// 空文件不占簇，自然被跳过。超出全部文件时返回`None`，调用者填0。
    pub fn locate(files: &[FileDescriptor], unit: u32) -> Option<(usize, u32)> {
        let mut start = 0;
        for (index, file) in files.iter().enumerate() {
            let end = start + file.clusters();
            if unit < end {
                return Some((index, unit - start));
            }
            start = end;
        }
        None
    }

    /// 第`index`个文件的首簇。空文件按FAT惯例返回[`ClusterId::FREE`]。
    pub fn first_cluster(&self, files: &[FileDescriptor], index: usize) -> ClusterId {
        if files[index].size == 0 {
            return ClusterId::FREE;
        }
        self.first_file_cluster + clusters_before(files, index)
    }

    /// 文件区块数（即簇数）的合计
    pub fn file_blocks(files: &[FileDescriptor]) -> u32 {
        clusters_before(files, files.len())
    }
}

fn clusters_before(files: &[FileDescriptor], index: usize) -> u32 {
    files[..index]
        .iter()
        .fold(0, |sum, file| sum.saturating_add(file.clusters()))
}
