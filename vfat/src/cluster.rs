use derive_more::{Add, From, Into};

/// 簇编号
///
/// 一个簇固定为一块，`0`表示未分配，`1`保留，
/// 所以数据区第一个簇的编号为[`ClusterId::MIN`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Add, From, Into)]
#[repr(transparent)]
pub struct ClusterId(u32);

impl core::ops::Add<u32> for ClusterId {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        self + Self(rhs)
    }
}

impl ClusterId {
    /// 空文件的目录项使用此编号
    pub const FREE: Self = Self(0);

    /// 最小的可用簇号
    pub const MIN: Self = Self(2);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// 拆成目录项中的(低16位, 高16位)
    pub const fn split(self) -> (u16, u16) {
        (self.0 as u16, (self.0 >> 16) as u16)
    }
}
