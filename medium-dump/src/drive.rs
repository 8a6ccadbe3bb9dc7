//! 设备上的虚拟盘的内容

use spi_flash::SpiFlash;
use typed_bytesize::ByteSizeIec;
use vfat::sink::{ControlFile, ControlPin, FlashFile, LongFile};
use vfat::{DosDate, DosTime, FileDescriptor, ShortName};

pub const README: &[u8] = b"This is a mass storage device example on the ,,Ketyere'' hardware. \r\n\
It support multiple files defined in the \"filesOnDrive\" array, with file content either hardcoded in an array, or generated by a callback function.\r\n\
To make the FAT table simple, all unused clusters are marked as bad to prevent new file creation or file movement.\r\n\
But the existing file can be modified to send data back to the hardware.\r\n";

pub const LED_CONTROL: &[u8] = b"1\r\nThe first byte in this file controls the LCD backlight on board. \
Use a texteditor without autosave to avoid the disk full error.\r\n";

pub const LONGFILE_SIZE: u32 = 200_000;

/// SPI闪存的容量，即`SPIFLASH.BIN`的大小
pub fn flash_size() -> u64 {
    ByteSizeIec::mib(16).0
}

const TIME: DosTime = DosTime::new(12, 34, 56);
const DATE: DosDate = DosDate::new(2023, 1, 20);

/// LCD背光引脚。主机上没有硬件，只记录状态。
#[derive(Debug, Default)]
pub struct BacklightPin {
    on: bool,
}

impl BacklightPin {
    pub const fn is_on(&self) -> bool {
        self.on
    }
}

impl ControlPin for BacklightPin {
    fn set_high(&mut self) {
        log::info!("backlight on");
        self.on = true;
    }

    fn set_low(&mut self) {
        log::info!("backlight off");
        self.on = false;
    }
}

/// 虚拟盘上的文件及其回调
#[derive(Debug)]
pub struct Drive<F> {
    long: LongFile,
    flash_size: u32,
    backlight: ControlFile<BacklightPin>,
    flash: FlashFile<F>,
}

impl<F: SpiFlash> Drive<F> {
    pub fn new(flash: F) -> Self {
        Self {
            long: LongFile::new(LONGFILE_SIZE),
            flash_size: flash_size() as u32,
            backlight: ControlFile::new(BacklightPin::default()),
            flash: FlashFile::new(flash),
        }
    }

    /// 文件表，顺序即簇的分配顺序
    pub fn files(&self) -> [FileDescriptor<'_>; 4] {
        [
            FileDescriptor::constant(ShortName::new(*b"README  TXT"), README).stamped(TIME, DATE),
            FileDescriptor::callback(ShortName::new(*b"LONGFILETXT"), self.long.len(), &self.long)
                .stamped(TIME, DATE),
            FileDescriptor::constant(ShortName::new(*b"LED_CTRLTXT"), LED_CONTROL)
                .with_sink(&self.backlight)
                .stamped(TIME, DATE),
            FileDescriptor::callback(ShortName::new(*b"SPIFLASHBIN"), self.flash_size, &self.flash)
                .with_sink(&self.flash)
                .stamped(TIME, DATE),
        ]
    }

    pub fn into_parts(self) -> (BacklightPin, F) {
        (self.backlight.into_inner(), self.flash.into_inner())
    }
}
