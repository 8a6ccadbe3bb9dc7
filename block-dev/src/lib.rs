//! # 块设备接口层
//!
//! 块设备是以**块**为单位存储数据的设备；
//! [`BlockDevice`] 是对按块读写的抽象，
//! [`MassStorage`] 则是USB大容量存储传输层所看到的整个介质：
//! 除了读写，还有介质状态与弹出。
//!
//! 传输层保证调用是串行的，所以这里的接口都只借用`&self`，
//! 需要可变状态的实现自行选择内部可变性。

#![no_std]

/// 块的字节数。
///
/// 几乎所有主机的FAT驱动都假定扇区为512字节，不可更改。
pub const BLOCK_SIZE: usize = 512;

/// 块设备驱动特质
pub trait BlockDevice {
    fn read_block(&self, block_id: usize, buf: &mut [u8]);
    fn write_block(&self, block_id: usize, buf: &[u8]);
}

/// 介质状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediumState {
    #[default]
    Ok,
    /// 已弹出，主机应停止读写
    Ejected,
}

/// 面向大容量存储传输层的介质接口
pub trait MassStorage: BlockDevice {
    /// 初始化介质，状态重置为[`MediumState::Ok`]
    fn init(&self);

    fn status(&self) -> MediumState;

    /// 弹出介质。单向操作，没有重新插入。
    fn eject(&self);

    /// 介质的总块数
    fn block_count(&self) -> u32;

    /// 从`start_block`起连续读`block_count`块，
    /// `buf`至少为`block_count * BLOCK_SIZE`字节。
    ///
    /// 块号超出`u32`范围的部分读出全0。
    fn read(&self, start_block: u32, buf: &mut [u8], block_count: u32) {
        for (i, block) in buf
            .chunks_exact_mut(BLOCK_SIZE)
            .take(block_count as usize)
            .enumerate()
        {
            match start_block.checked_add(i as u32) {
                Some(id) => self.read_block(id as usize, block),
                None => block.fill(0),
            }
        }
    }

    /// 从`start_block`起连续写`block_count`块。
    ///
    /// 块号超出`u32`范围的部分被丢弃。
    fn write(&self, start_block: u32, buf: &[u8], block_count: u32) {
        for (i, block) in buf
            .chunks_exact(BLOCK_SIZE)
            .take(block_count as usize)
            .enumerate()
        {
            match start_block.checked_add(i as u32) {
                Some(id) => self.write_block(id as usize, block),
                None => break,
            }
        }
    }
}
