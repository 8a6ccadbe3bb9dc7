//! 根目录，存放目录项的区域。
//!
//! 第一个目录项是卷标，之后按文件表的顺序每个文件一项，其余全为0，
//! 名称首字节为0的目录项之后不再有有效项，主机读到这里就停止搜索。
//! 本卷不使用长文件名。

use enumflags2::{BitFlags, bitflags};

use crate::{ClusterId, DosDate, DosTime, FileDescriptor, Layout, VolumeConfig, volume::OnDisk};

/// 目录项的字节数
pub const DIR_ENTRY_SIZE: usize = 32;

#[derive(Debug, Default, Clone, Copy)]
#[repr(C, packed)]
pub struct ShortDirEntry {
    name: [u8; 11],

    pub attr: BitFlags<AttrFlag>,

    /// Reserved, must be 0
    ntres: u8,

    /// Count of tenths of a second.
    /// Range: [0, 199]
    crt_time_tenth: u8,

    /// Creation time, granularity is 2 seconds
    crt_time: u16,

    /// Creation date
    crt_date: u16,

    /// Last access date
    lst_acc_date: u16,

    /// High word of first data cluster number
    /// for file/directory described by this entry
    fst_clus_hi: u16,

    /// Last modification time
    wrt_time: u16,

    /// Last modification date
    wrt_date: u16,

    /// Low word of first data cluster number
    /// for file/directory described by this entry
    fst_clus_lo: u16,

    /// Quantity containing size in bytes
    /// of file/directory described by this entry
    file_size: u32,
}

unsafe impl OnDisk for ShortDirEntry {}

impl ShortDirEntry {
    fn stamped(name: [u8; 11], attr: BitFlags<AttrFlag>, time: DosTime, date: DosDate) -> Self {
        Self {
            name,
            attr,
            crt_time: time.raw().to_le(),
            crt_date: date.raw().to_le(),
            lst_acc_date: date.raw().to_le(),
            wrt_time: time.raw().to_le(),
            wrt_date: date.raw().to_le(),
            ..Default::default()
        }
    }

    /// 卷标目录项，名称与启动扇区中的卷标一致
    pub fn volume_label(config: &VolumeConfig) -> Self {
        Self::stamped(
            config.volume_label,
            AttrFlag::VolumeID.into(),
            config.label_time,
            config.label_date,
        )
    }

    /// 文件的目录项。没有写回调的文件标为只读。
    pub fn file(file: &FileDescriptor, id: ClusterId) -> Self {
        let attr = if file.is_read_only() {
            AttrFlag::ReadOnly.into()
        } else {
            BitFlags::empty()
        };
        let mut dirent = Self::stamped(*file.name.as_bytes(), attr, file.time, file.date);
        dirent.set_cluster_id(id);
        dirent.file_size = file.size.to_le();
        dirent
    }

    pub fn set_cluster_id(&mut self, id: ClusterId) {
        let (lo, hi) = id.split();
        self.fst_clus_lo = lo.to_le();
        self.fst_clus_hi = hi.to_le();
    }
}

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrFlag {
    ReadOnly = 0b0000_0001,
    Hidden = 0b0000_0010,
    /// The corresponding file is tagged as a component of the operating system
    System = 0b0000_0100,
    /// The corresponding entry contains the volume label
    VolumeID = 0b0000_1000,
    Directory = 0b0001_0000,
    /// Indicates that properties of the associated file have been modified
    Archive = 0b0010_0000,
}

/// 根目录区
#[derive(Debug, Clone)]
pub struct RootDir {
    label: ShortDirEntry,
}

impl RootDir {
    pub fn new(config: &VolumeConfig) -> Self {
        Self {
            label: ShortDirEntry::volume_label(config),
        }
    }

    /// 第`index`个目录项，越过最后一个文件后为`None`
    pub fn entry(
        &self,
        files: &[FileDescriptor],
        layout: &Layout,
        index: usize,
    ) -> Option<ShortDirEntry> {
        match index {
            0 => Some(self.label),
            _ => {
                let file = files.get(index - 1)?;
                Some(ShortDirEntry::file(file, layout.first_cluster(files, index - 1)))
            }
        }
    }

    /// 读取根目录的第`offset`个扇区
    pub fn read_block(
        &self,
        files: &[FileDescriptor],
        layout: &Layout,
        offset: u32,
        buf: &mut [u8],
    ) {
        let first = offset as usize * buf.len() / DIR_ENTRY_SIZE;

        for (i, slot) in buf.chunks_exact_mut(DIR_ENTRY_SIZE).enumerate() {
            match self.entry(files, layout, first + i) {
                Some(dirent) => slot.copy_from_slice(dirent.as_bytes()),
                None => slot.fill(0),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BLOCK_SIZE, ShortName, WriteHandler};

    const TEXT: &[u8] = b"hello";

    fn sink(_: u32, _: &[u8]) {}

    #[test]
    fn label_entry() {
        let config = VolumeConfig::FAT16;
        let dirent = ShortDirEntry::volume_label(&config);
        let bytes = dirent.as_bytes();

        assert_eq!(b"KETYERE MSD", &bytes[..11]);
        assert_eq!(0x08, bytes[11]);
        assert_eq!([0, 0], bytes[12..14]);
        assert_eq!(DosTime::new(12, 34, 56).to_le_bytes(), bytes[14..16]);
        assert_eq!(DosDate::new(2021, 1, 2).to_le_bytes(), bytes[16..18]);
        assert_eq!(bytes[14..18], bytes[22..26]);
        assert_eq!([0; 4], bytes[28..]);
    }

    #[test]
    fn file_entries() {
        let config = VolumeConfig::FAT16;
        let layout = Layout::new(&config);
        let root = RootDir::new(&config);
        let writable: &dyn WriteHandler = &sink;
        let files = [
            FileDescriptor::constant(ShortName::new(*b"HELLO   TXT"), TEXT)
                .stamped(DosTime::new(12, 34, 56), DosDate::new(2023, 1, 20)),
            FileDescriptor::constant(ShortName::new(*b"EMPTY   TXT"), TEXT).with_size(0),
            FileDescriptor::constant(ShortName::new(*b"CTRL    TXT"), TEXT).with_sink(writable),
        ];

        let mut buf = [0xEEu8; BLOCK_SIZE];
        root.read_block(&files, &layout, 0, &mut buf);

        let hello = &buf[32..64];
        assert_eq!(b"HELLO   TXT", &hello[..11]);
        assert_eq!(0x01, hello[11]);
        assert_eq!(DosDate::new(2023, 1, 20).to_le_bytes(), hello[16..18]);
        assert_eq!([0, 0], hello[20..22]);
        assert_eq!([2, 0], hello[26..28]);
        assert_eq!(5u32.to_le_bytes(), hello[28..]);

        let empty = &buf[64..96];
        assert_eq!([0, 0], empty[26..28]);
        assert_eq!([0; 4], empty[28..]);

        let ctrl = &buf[96..128];
        assert_eq!(0x00, ctrl[11]);
        assert_eq!([3, 0], ctrl[26..28]);

        assert!(buf[128..].iter().all(|&b| b == 0));

        root.read_block(&files, &layout, 1, &mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn high_cluster_word() {
        let mut dirent = ShortDirEntry::default();
        dirent.set_cluster_id(ClusterId::new(0x0001_0022));
        let bytes = dirent.as_bytes();
        assert_eq!([0x01, 0x00], bytes[20..22]);
        assert_eq!([0x22, 0x00], bytes[26..28]);
        // 名称首字节为0，主机在此停止搜索
        assert_eq!(0, bytes[0]);
    }
}
