//! 文件回调
//!
//! 回调都只借用`&self`，需要可变访问的外设放在[`spin::Mutex`]里。
//! 传输层保证调用是串行的，锁不会发生争用。

use spi_flash::{SECTOR_SIZE, SpiFlash};
use spin::Mutex;

use crate::{ReadHandler, WriteHandler};

/// 由回调生成内容的长文本文件：每行32字节，
/// 第`n`行在第`n % 32`列有一个`*`，行尾为`"\r\n"`。
#[derive(Debug, Clone, Copy)]
pub struct LongFile {
    len: u32,
}

impl LongFile {
    pub const LINE: u32 = 32;

    pub const fn new(len: u32) -> Self {
        Self { len }
    }

    pub const fn len(&self) -> u32 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 文件第`offset`字节，超出文件长度为0
    pub const fn byte_at(&self, offset: u32) -> u8 {
        if offset >= self.len {
            return 0;
        }
        let line = offset / Self::LINE;
        match offset % Self::LINE {
            30 => b'\r',
            31 => b'\n',
            col if col == line % Self::LINE => b'*',
            _ => b' ',
        }
    }
}

impl ReadHandler for LongFile {
    fn read(&self, offset: u32, buf: &mut [u8]) {
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.byte_at(offset.saturating_add(i as u32));
        }
    }
}

/// 控制引脚，例如LCD背光
pub trait ControlPin {
    fn set_high(&mut self);
    fn set_low(&mut self);
}

/// 控制文件：主机写入文件首字节时，奇数拉高引脚，偶数拉低。
///
/// 文本编辑器把`'1'`(0x31)存盘即点亮，`'0'`(0x30)即熄灭。
/// 其余位置的写入被忽略。
#[derive(Debug)]
pub struct ControlFile<P> {
    pin: Mutex<P>,
}

impl<P: ControlPin> ControlFile<P> {
    pub const fn new(pin: P) -> Self {
        Self {
            pin: Mutex::new(pin),
        }
    }

    pub fn into_inner(self) -> P {
        self.pin.into_inner()
    }
}

impl<P: ControlPin> WriteHandler for ControlFile<P> {
    fn write(&self, offset: u32, data: &[u8]) {
        let (0, Some(&first)) = (offset, data.first()) else {
            return;
        };

        let mut pin = self.pin.lock();
        if first & 1 == 1 {
            log::info!("control byte {first:#04x}: set high");
            pin.set_high();
        } else {
            log::info!("control byte {first:#04x}: set low");
            pin.set_low();
        }
    }
}

/// 以SPI闪存为后端的文件，文件偏移即闪存地址。
///
/// 主机按顺序整块写入，写到64KiB擦除块的起点时先擦除整个擦除块再编程，
/// 所以写入不从擦除块起点开始时，落在未擦除区域的数据会与旧内容相与。
#[derive(Debug)]
pub struct FlashFile<F> {
    flash: Mutex<F>,
}

impl<F: SpiFlash> FlashFile<F> {
    pub const fn new(flash: F) -> Self {
        Self {
            flash: Mutex::new(flash),
        }
    }

    pub fn into_inner(self) -> F {
        self.flash.into_inner()
    }
}

impl<F: SpiFlash> ReadHandler for FlashFile<F> {
    fn read(&self, offset: u32, buf: &mut [u8]) {
        self.flash.lock().read(offset, buf);
    }
}

impl<F: SpiFlash> WriteHandler for FlashFile<F> {
    fn write(&self, offset: u32, data: &[u8]) {
        let mut flash = self.flash.lock();
        if offset % SECTOR_SIZE == 0 {
            log::debug!("erase flash sector at {offset:#08x}");
            flash.erase_sector(offset);
        }
        flash.program(offset, data);
    }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use super::*;

    #[test]
    fn long_file_lines() {
        let file = LongFile::new(200_000);
        let mut line = [0u8; 32];

        file.read(0, &mut line);
        assert_eq!(b'*', line[0]);
        assert!(line[1..30].iter().all(|&b| b == b' '));
        assert_eq!(b"\r\n", &line[30..]);

        file.read(32 * 5, &mut line);
        assert_eq!(b'*', line[5]);
        assert_eq!(1, line.iter().filter(|&&b| b == b'*').count());

        // 第30、31行的星号被行尾覆盖
        file.read(32 * 30, &mut line);
        assert!(!line.contains(&b'*'));

        file.read(32 * 33, &mut line);
        assert_eq!(b'*', line[1]);
    }

    #[test]
    fn long_file_tail() {
        let file = LongFile::new(100);
        let mut buf = [0xEEu8; 8];
        file.read(96, &mut buf);
        // 第3行第3列是星号，文件末尾之后填0
        assert_eq!([b' ', b' ', b' ', b'*', 0, 0, 0, 0], buf);
    }

    #[derive(Debug, Default)]
    struct Pin(Vec<bool>);

    impl ControlPin for Pin {
        fn set_high(&mut self) {
            self.0.push(true);
        }

        fn set_low(&mut self) {
            self.0.push(false);
        }
    }

    #[test]
    fn control_byte_parity() {
        let file = ControlFile::new(Pin::default());
        file.write(0, b"1\r\nThe first byte");
        file.write(0, b"0\r\n");
        file.write(0, &[0x03]);
        file.write(512, &[0x01]);
        assert_eq!([true, false, true], *file.into_inner().0);
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Op {
        Read(u32),
        Program(u32, usize),
        Erase(u32),
    }

    #[derive(Debug, Default)]
    struct Recorder(Vec<Op>);

    impl SpiFlash for Recorder {
        fn read(&mut self, addr: u32, buf: &mut [u8]) {
            buf.fill(0xFF);
            self.0.push(Op::Read(addr));
        }

        fn program(&mut self, addr: u32, data: &[u8]) {
            self.0.push(Op::Program(addr, data.len()));
        }

        fn erase_sector(&mut self, addr: u32) {
            self.0.push(Op::Erase(addr));
        }

        fn erase_chip(&mut self) {
            unreachable!()
        }
    }

    #[test]
    fn erase_before_program() {
        let file = FlashFile::new(Recorder::default());
        let block = [0u8; 512];
        file.write(0, &block);
        file.write(512, &block);
        file.write(SECTOR_SIZE, &block);

        let mut buf = [0u8; 512];
        file.read(1024, &mut buf);

        assert_eq!(
            [
                Op::Erase(0),
                Op::Program(0, 512),
                Op::Program(512, 512),
                Op::Erase(SECTOR_SIZE),
                Op::Program(SECTOR_SIZE, 512),
                Op::Read(1024),
            ],
            *file.into_inner().0
        );
    }
}
