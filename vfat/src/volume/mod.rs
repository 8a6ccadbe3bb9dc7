//! 卷的各区域
//!
//! 保留区 | FAT区 | 根目录 | 数据区
//!
//! 各区域都不落盘，读取时由配置与文件表现算。

pub mod data;
pub mod fat;
pub mod reserved;

use core::{mem, slice};

/// 磁盘上的结构：`repr(packed)`，无填充，字段均为整数或字节数组，
/// 整数已按小端存放。
///
/// # Safety
///
/// 实现者必须满足上述条件，任意字节视图才有意义。
pub(crate) unsafe trait OnDisk: Sized {
    fn as_bytes(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self as *const Self as *const u8, mem::size_of::<Self>()) }
    }
}

/// 把`src`中`offset`起的字节拷入`buf`，越界部分不动
pub(crate) fn copy_window(src: &[u8], offset: usize, buf: &mut [u8]) {
    if let Some(src) = src.get(offset..) {
        let len = src.len().min(buf.len());
        buf[..len].copy_from_slice(&src[..len]);
    }
}
