use core::ops::Range;
use core::sync::atomic::{AtomicBool, Ordering};

use block_dev::{BLOCK_SIZE, BlockDevice, MassStorage, MediumState};

use crate::volume::{data::DataArea, data::RootDir, fat::FatArea, reserved::ReservedArea};
use crate::{ConfigError, FileDescriptor, Layout, ReadSource, Region, ShortName, VolumeConfig};

/// 虚拟介质
///
/// 主机的每次块读写都先按构造时确定的区域边界分类，
/// 再交给对应区域现算内容或转交写回调。
#[derive(Debug)]
pub struct Medium<'a> {
    config: VolumeConfig,
    layout: Layout,
    files: &'a [FileDescriptor<'a>],
    reserved: ReservedArea,
    fat: FatArea,
    root: RootDir,
    data: DataArea,
    /// 介质状态，`true`即[`MediumState::Ejected`]
    ejected: AtomicBool,
}

impl<'a> Medium<'a> {
    pub fn new(config: VolumeConfig, files: &'a [FileDescriptor<'a>]) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = Layout::new(&config);
        check_files(&config, &layout, files)?;

        log::debug!(
            "{:?} volume: {} blocks, FAT at {}, root at {}, files at {}",
            config.fat_type,
            config.total_blocks,
            layout.fat_start().get(),
            layout.root_start().get(),
            layout.file_start().get(),
        );

        Ok(Self {
            reserved: ReservedArea::new(&config),
            fat: FatArea::new(&config, &layout),
            root: RootDir::new(&config),
            data: DataArea,
            ejected: AtomicBool::new(false),
            config,
            layout,
            files,
        })
    }

    pub const fn config(&self) -> &VolumeConfig {
        &self.config
    }

    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    pub const fn files(&self) -> &'a [FileDescriptor<'a>] {
        self.files
    }

    /// 文件内容所在的块区间，空文件为空区间
    pub fn file_extent(&self, name: &str) -> Option<Range<u32>> {
        let name = ShortName::parse(name).ok()?;
        let index = self.files.iter().position(|file| file.name == name)?;
        let start = self.layout.file_start().get() + Layout::file_blocks(&self.files[..index]);
        Some(start..start + self.files[index].clusters())
    }

    fn read_sector(&self, block: u32, buf: &mut [u8]) {
        let region = self.layout.region(block);
        log::trace!("read block {block}: {region:?}");

        match region {
            Region::Reserved { offset } => self.reserved.read_block(offset, buf),
            Region::Fat { offset, .. } => self.fat.read_block(self.files, offset, buf),
            Region::RootDir { offset } => {
                self.root.read_block(self.files, &self.layout, offset, buf)
            }
            Region::Data { offset } => self.data.read_block(self.files, offset, buf),
        }
    }

    fn write_sector(&self, block: u32, buf: &[u8]) {
        match self.layout.region(block) {
            Region::Data { offset } => {
                self.data.write_block(self.files, offset, buf);
            }
            region => log::warn!("write to metadata block {block} ({region:?}) dropped"),
        }
    }
}

/// 介质只能按文件表原样呈现，表不合法时拒绝构造
fn check_files(
    config: &VolumeConfig,
    layout: &Layout,
    files: &[FileDescriptor],
) -> Result<(), ConfigError> {
    // 卷标占一个目录项
    let capacity = config.root_entries as usize;
    if files.len() + 1 > capacity {
        return Err(ConfigError::TooManyFiles {
            files: files.len(),
            capacity: capacity.saturating_sub(1),
        });
    }

    let required = Layout::file_blocks(files);
    let available = layout
        .total_blocks()
        .saturating_sub(layout.file_start().get());
    if required > available {
        return Err(ConfigError::VolumeTooSmall {
            required,
            available,
        });
    }

    for (i, file) in files.iter().enumerate() {
        if files[..i].iter().any(|other| other.name == file.name) {
            return Err(ConfigError::DuplicateName(file.name));
        }
        if matches!(file.read, ReadSource::Constant(data) if data.len() < file.size as usize) {
            return Err(ConfigError::SizeMismatch(file.name));
        }
    }

    Ok(())
}

impl BlockDevice for Medium<'_> {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) {
        match u32::try_from(block_id) {
            Ok(block) => self.read_sector(block, buf),
            Err(_) => buf.fill(0),
        }
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) {
        if let Ok(block) = u32::try_from(block_id) {
            self.write_sector(block, buf);
        }
    }
}

impl MassStorage for Medium<'_> {
    fn init(&self) {
        log::info!(
            "medium ready: {} files, {} blocks of {BLOCK_SIZE} bytes",
            self.files.len(),
            self.layout.total_blocks(),
        );
        self.ejected.store(false, Ordering::Relaxed);
    }

    fn status(&self) -> MediumState {
        if self.ejected.load(Ordering::Relaxed) {
            MediumState::Ejected
        } else {
            MediumState::Ok
        }
    }

    fn eject(&self) {
        log::info!("medium ejected");
        self.ejected.store(true, Ordering::Relaxed);
    }

    fn block_count(&self) -> u32 {
        self.layout.total_blocks()
    }
}
