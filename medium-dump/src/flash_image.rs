use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use spi_flash::{SECTOR_SIZE, SpiFlash};

/// 主机上的SPI闪存，整片放在内存中，按NOR闪存的规则读写：
/// 编程只能把位从1变为0，擦除把整个扇区恢复为`0xFF`。
#[derive(Debug, Clone)]
pub struct FlashImage {
    data: Vec<u8>,
}

impl FlashImage {
    /// 全部擦除的闪存
    pub fn blank(size: u64) -> Self {
        Self {
            data: vec![0xFF; size as usize],
        }
    }

    /// 读取闪存镜像，文件不存在时视为全部擦除
    pub fn open(path: &Path, size: u64) -> io::Result<Self> {
        let mut data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("{} not found, starting from an erased flash", path.display());
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        if data.len() as u64 > size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("flash image larger than {size} bytes"),
            ));
        }
        data.resize(size as usize, 0xFF);

        Ok(Self { data })
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        File::create(path)?.write_all(&self.data)
    }

    /// 地址超出芯片时按地址线回绕
    fn wrap(&self, addr: u32) -> usize {
        addr as usize % self.data.len()
    }
}

impl SpiFlash for FlashImage {
    fn read(&mut self, addr: u32, buf: &mut [u8]) {
        let start = self.wrap(addr);
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.data[(start + i) % self.data.len()];
        }
    }

    fn program(&mut self, addr: u32, data: &[u8]) {
        let start = self.wrap(addr);
        let len = self.data.len();
        for (i, &b) in data.iter().enumerate() {
            self.data[(start + i) % len] &= b;
        }
    }

    fn erase_sector(&mut self, addr: u32) {
        let start = self.wrap(addr) / SECTOR_SIZE as usize * SECTOR_SIZE as usize;
        let end = (start + SECTOR_SIZE as usize).min(self.data.len());
        self.data[start..end].fill(0xFF);
    }

    fn erase_chip(&mut self) {
        self.data.fill(0xFF);
    }
}
