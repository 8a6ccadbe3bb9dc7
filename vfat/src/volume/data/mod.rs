//! 数据区，使用**簇编号**索引。
//!
//! 因为FAT条目存放着下一个簇的编号，
//! 其中`0`表示簇未分配，`1`保留，
//! 所以数据区第一个可用的簇编号为2。
//! FAT32的根目录也在数据区，它占据的块在布局上与FAT16的根目录重合，
//! 由[`RootDir`]提供，这里只负责文件内容。

mod dir_entry;

pub use self::dir_entry::*;
use crate::{BLOCK_SIZE, FileDescriptor, Layout};

#[derive(Debug, Clone, Copy, Default)]
pub struct DataArea;

impl DataArea {
    /// 读取文件区的第`offset`块。不属于任何文件的块读出全0。
    pub fn read_block(&self, files: &[FileDescriptor], offset: u32, buf: &mut [u8]) {
        buf.fill(0);
        if let Some((index, block)) = Layout::locate(files, offset) {
            files[index].read_block(block, buf);
        }
    }

    /// 把主机写入的一块交给文件的写回调。
    /// 没有文件或文件只读时丢弃，返回`false`。
    pub fn write_block(&self, files: &[FileDescriptor], offset: u32, data: &[u8]) -> bool {
        let Some((index, block)) = Layout::locate(files, offset) else {
            log::debug!("write to unallocated data block {offset} dropped");
            return false;
        };

        let file = &files[index];
        match file.write {
            Some(sink) => {
                log::trace!("{} <- block {block}", file.name);
                sink.write(block * BLOCK_SIZE as u32, data);
                true
            }
            None => {
                log::debug!("write to read-only {} dropped", file.name);
                false
            }
        }
    }
}
