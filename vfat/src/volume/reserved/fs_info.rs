use crate::volume::{OnDisk, copy_window};

/// # 文件系统信息
///
/// 仅FAT32格式在用，
/// 位于#1扇区，备份于#7扇区。
/// 卷上不会新分配簇，所以两个提示字段都填“不知道”。
#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub struct FsInfo {
    /// 头签名 0x41615252
    lead_sig: u32,

    reserved1: [u8; 480],

    /// 额外签名 0x61417272
    struc_sig: u32,

    /// 剩余空闲簇数量
    /// - 0xFFFFFFFF 表示不知道
    free_count: u32,

    /// 下一个空闲簇
    /// - 0xFFFFFFFF 表示不知道
    nxt_free: u32,

    reserved2: [u8; 12],

    /// 尾签名 0xAA550000
    trail_sig: u32,
}

unsafe impl OnDisk for FsInfo {}

impl FsInfo {
    pub const UNKNOWN: u32 = 0xFFFF_FFFF;

    pub const fn new() -> Self {
        Self {
            lead_sig: 0x4161_5252u32.to_le(),
            reserved1: [0; 480],
            struc_sig: 0x6141_7272u32.to_le(),
            free_count: Self::UNKNOWN,
            nxt_free: Self::UNKNOWN,
            reserved2: [0; 12],
            trail_sig: 0xAA55_0000u32.to_le(),
        }
    }

    pub fn read(&self, offset: usize, buf: &mut [u8]) {
        copy_window(self.as_bytes(), offset, buf);
    }
}

impl Default for FsInfo {
    fn default() -> Self {
        Self::new()
    }
}
