//! # SPI NOR闪存
//!
//! [`SpiFlash`] 是文件回调所依赖的闪存接口，每个操作都阻塞到芯片不再忙碌；
//! [`NorFlash`] 是它基于JEDEC通用指令集的轮询实现。
//!
//! NOR闪存的写入只能把位从1变为0，所以编程前必须先擦除，
//! 擦除的最小单位为64KiB扇区。

#![cfg_attr(not(test), no_std)]

mod nor;

pub use self::nor::{NorFlash, SpiBus};

/// 页编程的最大字节数，一次编程不能跨页
pub const PAGE_SIZE: usize = 256;

/// 擦除块（扇区）的字节数
pub const SECTOR_SIZE: u32 = 0x1_0000;

/// 闪存驱动特质
pub trait SpiFlash {
    fn read(&mut self, addr: u32, buf: &mut [u8]);

    /// 编程，要求目标区域已被擦除
    fn program(&mut self, addr: u32, data: &[u8]);

    /// 擦除`addr`所在的扇区，擦除后全为`0xFF`
    fn erase_sector(&mut self, addr: u32);

    fn erase_chip(&mut self);
}
