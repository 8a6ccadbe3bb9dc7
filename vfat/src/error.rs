use core::fmt;

use crate::{FatType, ShortName};

/// 介质构造时发现的配置错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 卷的簇数与配置的FAT宽度不符，主机会按簇数判定成别的FAT类型
    FatTypeMismatch { configured: FatType, clusters: u32 },
    /// FAT的表项数不足以覆盖所有簇
    FatTooSmall { entries: u32, clusters: u32 },
    /// 保留区放不下启动扇区（及FAT32的FSInfo与备份）
    ReservedTooSmall { reserved: u16, required: u16 },
    /// 根目录放不下卷标加全部文件
    TooManyFiles { files: usize, capacity: usize },
    /// 文件总簇数超出数据区
    VolumeTooSmall { required: u32, available: u32 },
    DuplicateName(ShortName),
    /// 常量文件的缓冲区比声明的大小短
    SizeMismatch(ShortName),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FatTypeMismatch {
                configured,
                clusters,
            } => write!(f, "{clusters} clusters cannot form a {configured:?} volume"),
            Self::FatTooSmall { entries, clusters } => {
                write!(f, "FAT maps {entries} entries but the volume has {clusters} clusters")
            }
            Self::ReservedTooSmall { reserved, required } => {
                write!(f, "{reserved} reserved sectors, at least {required} required")
            }
            Self::TooManyFiles { files, capacity } => {
                write!(f, "{files} files do not fit into {capacity} root entries")
            }
            Self::VolumeTooSmall {
                required,
                available,
            } => write!(f, "files need {required} clusters, volume has {available}"),
            Self::DuplicateName(name) => write!(f, "duplicate file name {name}"),
            Self::SizeMismatch(name) => write!(f, "constant data of {name} is shorter than its size"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// 8.3短文件名的解析错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    Empty,
    /// 主名超过8字节或扩展名超过3字节
    TooLong,
    InvalidChar(u8),
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty file name"),
            Self::TooLong => write!(f, "file name does not fit 8.3"),
            Self::InvalidChar(c) => write!(f, "invalid character {c:#04x} in file name"),
        }
    }
}

impl core::error::Error for NameError {}
