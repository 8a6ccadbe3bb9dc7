use crate::{PAGE_SIZE, SpiFlash};

/// 一个片选帧内逐字节全双工收发的SPI总线
pub trait SpiBus {
    /// 拉低片选
    fn select(&mut self);

    /// 拉高片选，结束当前帧
    fn deselect(&mut self);

    fn transfer(&mut self, byte: u8) -> u8;
}

mod opcode {
    pub const WRITE_ENABLE: u8 = 0x06;
    pub const PAGE_PROGRAM: u8 = 0x02;
    pub const READ: u8 = 0x03;
    pub const READ_STATUS: u8 = 0x05;
    pub const SECTOR_ERASE: u8 = 0xD8;
    pub const CHIP_ERASE: u8 = 0x60;
}

/// Status register 1, bit 0: write/erase in progress
const STATUS_BUSY: u8 = 0x01;

/// 24位地址的NOR闪存，所有操作轮询状态寄存器直到完成。
///
/// 没有超时：芯片卡死即整个设备卡死。
#[derive(Debug)]
pub struct NorFlash<B> {
    bus: B,
}

impl<B: SpiBus> NorFlash<B> {
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: SpiBus> NorFlash<B> {
    /// 发送指令与可选的24位地址，不结束帧
    fn command(&mut self, op: u8, addr: Option<u32>) {
        self.bus.select();
        self.bus.transfer(op);
        if let Some(addr) = addr {
            for byte in &addr.to_be_bytes()[1..] {
                self.bus.transfer(*byte);
            }
        }
    }

    fn write_enable(&mut self) {
        self.command(opcode::WRITE_ENABLE, None);
        self.bus.deselect();
    }

    fn wait_idle(&mut self) {
        loop {
            self.command(opcode::READ_STATUS, None);
            let status = self.bus.transfer(0x00);
            self.bus.deselect();
            if status & STATUS_BUSY == 0 {
                break;
            }
        }
    }
}

impl<B: SpiBus> SpiFlash for NorFlash<B> {
    fn read(&mut self, addr: u32, buf: &mut [u8]) {
        log::trace!("flash read addr={addr:#08x} len={}", buf.len());
        self.command(opcode::READ, Some(addr));
        for byte in buf.iter_mut() {
            *byte = self.bus.transfer(0x00);
        }
        self.bus.deselect();
    }

    fn program(&mut self, mut addr: u32, mut data: &[u8]) {
        log::trace!("flash program addr={addr:#08x} len={}", data.len());
        while !data.is_empty() {
            // 写到页尾为止，超出部分会回卷到页首
            let page_left = PAGE_SIZE - addr as usize % PAGE_SIZE;
            let (chunk, rest) = data.split_at(page_left.min(data.len()));

            self.write_enable();
            self.command(opcode::PAGE_PROGRAM, Some(addr));
            for byte in chunk {
                self.bus.transfer(*byte);
            }
            self.bus.deselect();
            self.wait_idle();

            addr += chunk.len() as u32;
            data = rest;
        }
    }

    fn erase_sector(&mut self, addr: u32) {
        log::debug!("flash erase sector addr={addr:#08x}");
        self.write_enable();
        self.command(opcode::SECTOR_ERASE, Some(addr));
        self.bus.deselect();
        self.wait_idle();
    }

    fn erase_chip(&mut self) {
        log::debug!("flash erase chip");
        self.write_enable();
        self.command(opcode::CHIP_ERASE, None);
        self.bus.deselect();
        self.wait_idle();
    }
}
