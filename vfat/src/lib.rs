//! # 虚拟FAT介质
//!
//! 把一张静态的文件表伪装成一块FAT16/FAT32磁盘：
//! 启动扇区、FAT、根目录和文件内容都在主机读取时按字节现算，
//! 不占用任何存储；只有带写回调的文件会把主机写入转交出去
//! （写入SPI闪存，或作为控制通道驱动GPIO）。

#![cfg_attr(not(test), no_std)]

mod cluster;
mod config;
mod control;
mod error;
mod file;
pub mod geometry;
mod sector;
pub mod sink;
mod time;
pub mod volume;

pub use block_dev::{BLOCK_SIZE, BlockDevice, MassStorage, MediumState};

pub use self::{
    cluster::ClusterId,
    config::{FatType, Media, VolumeConfig},
    control::Medium,
    error::{ConfigError, NameError},
    file::{FileDescriptor, ReadHandler, ReadSource, ShortName, WriteHandler},
    geometry::{Layout, Region},
    sector::SectorId,
    time::{DosDate, DosTime},
};
