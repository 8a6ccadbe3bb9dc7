//! 文件表
//!
//! 文件表在编译期确定，运行时不增删、不改变大小。
//! 介质只借用它，回调可能对外部硬件产生副作用，但不拥有文件表。

use core::fmt;

use crate::{BLOCK_SIZE, DosDate, DosTime, NameError};

/// 读回调：把文件`offset`处起的内容填入`buf`
pub trait ReadHandler {
    fn read(&self, offset: u32, buf: &mut [u8]);
}

/// 写回调：主机把`data`写到文件`offset`处
pub trait WriteHandler {
    fn write(&self, offset: u32, data: &[u8]);
}

impl<F: Fn(u32, &mut [u8])> ReadHandler for F {
    fn read(&self, offset: u32, buf: &mut [u8]) {
        self(offset, buf)
    }
}

impl<F: Fn(u32, &[u8])> WriteHandler for F {
    fn write(&self, offset: u32, data: &[u8]) {
        self(offset, data)
    }
}

/// 文件内容的来源
#[derive(Clone, Copy)]
pub enum ReadSource<'a> {
    /// 常量数据，至少为文件大小
    Constant(&'a [u8]),
    Callback(&'a dyn ReadHandler),
}

impl fmt::Debug for ReadSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(data) => write!(f, "Constant({} bytes)", data.len()),
            Self::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// 空格填充的8.3短文件名，主名8字节 + 扩展名3字节，全大写
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortName([u8; 11]);

impl ShortName {
    /// 直接使用已填充好的11字节
    pub const fn new(raw: [u8; 11]) -> Self {
        Self(raw)
    }

    /// 把`"readme.txt"`转为`b"README  TXT"`
    pub const fn parse(name: &str) -> Result<Self, NameError> {
        let bytes = name.as_bytes();
        if bytes.is_empty() {
            return Err(NameError::Empty);
        }

        let mut raw = [b' '; 11];
        let mut i = 0;
        let mut pos = 0;
        let mut in_ext = false;
        while i < bytes.len() {
            let c = bytes[i].to_ascii_uppercase();
            i += 1;

            if c == b'.' {
                if in_ext || pos == 0 {
                    return Err(NameError::InvalidChar(b'.'));
                }
                in_ext = true;
                pos = 8;
                continue;
            }
            if !is_valid_char(c) {
                return Err(NameError::InvalidChar(c));
            }
            if (!in_ext && pos == 8) || pos == 11 {
                return Err(NameError::TooLong);
            }
            raw[pos] = c;
            pos += 1;
        }

        Ok(Self(raw))
    }

    pub const fn as_bytes(&self) -> &[u8; 11] {
        &self.0
    }
}

/// 短文件名允许的字符，小写已事先转为大写
const fn is_valid_char(c: u8) -> bool {
    matches!(
        c,
        b'A'..=b'Z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'('
            | b')'
            | b'-'
            | b'@'
            | b'^'
            | b'_'
            | b'`'
            | b'{'
            | b'}'
            | b'~'
    )
}

impl fmt::Display for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn trim(part: &[u8]) -> &str {
            let end = part.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
            // 只可能含ASCII
            core::str::from_utf8(&part[..end]).unwrap_or("?")
        }

        let (base, ext) = self.0.split_at(8);
        f.write_str(trim(base))?;
        if ext != b"   " {
            write!(f, ".{}", trim(ext))?;
        }
        Ok(())
    }
}

impl fmt::Debug for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShortName({self})")
    }
}

/// 虚拟盘上的一个文件
#[derive(Clone, Copy)]
pub struct FileDescriptor<'a> {
    pub name: ShortName,
    pub time: DosTime,
    pub date: DosDate,
    /// 字节数，决定所占的簇数
    pub size: u32,
    pub read: ReadSource<'a>,
    /// 没有写回调的文件为只读
    pub write: Option<&'a dyn WriteHandler>,
}

impl<'a> FileDescriptor<'a> {
    /// 内容为常量数据的只读文件
    pub const fn constant(name: ShortName, data: &'a [u8]) -> Self {
        Self {
            name,
            time: DosTime::new(0, 0, 0),
            date: DosDate::EPOCH,
            size: data.len() as u32,
            read: ReadSource::Constant(data),
            write: None,
        }
    }

    /// 内容由回调生成的只读文件
    pub const fn callback(name: ShortName, size: u32, handler: &'a dyn ReadHandler) -> Self {
        Self {
            name,
            time: DosTime::new(0, 0, 0),
            date: DosDate::EPOCH,
            size,
            read: ReadSource::Callback(handler),
            write: None,
        }
    }

    pub const fn with_sink(mut self, sink: &'a dyn WriteHandler) -> Self {
        self.write = Some(sink);
        self
    }

    pub const fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub const fn stamped(mut self, time: DosTime, date: DosDate) -> Self {
        self.time = time;
        self.date = date;
        self
    }

    /// 所占簇数，空文件为0
    pub const fn clusters(&self) -> u32 {
        self.size.div_ceil(BLOCK_SIZE as u32)
    }

    pub const fn is_read_only(&self) -> bool {
        self.write.is_none()
    }

    /// 读取文件第`block`块。
    ///
    /// 常量文件只拷贝文件大小以内的部分，其余保持原样；
    /// 回调文件则整块交给回调。
    pub(crate) fn read_block(&self, block: u32, buf: &mut [u8]) {
        let offset = block * BLOCK_SIZE as u32;
        match self.read {
            ReadSource::Constant(data) => {
                let start = offset as usize;
                let end = (start + buf.len()).min(self.size as usize);
                if let Some(src) = data.get(start..end) {
                    buf[..src.len()].copy_from_slice(src);
                }
            }
            ReadSource::Callback(handler) => handler.read(offset, buf),
        }
    }
}

impl fmt::Debug for FileDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDescriptor")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("read", &self.read)
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_short_names() {
        assert_eq!(b"README  TXT", ShortName::parse("readme.txt").unwrap().as_bytes());
        assert_eq!(b"SPIFLASHBIN", ShortName::parse("SPIFLASH.BIN").unwrap().as_bytes());
        assert_eq!(b"LED_CTRLTXT", ShortName::parse("LED_CTRL.TXT").unwrap().as_bytes());
        assert_eq!(b"NOEXT      ", ShortName::parse("NOEXT").unwrap().as_bytes());
        assert_eq!(b"A       B  ", ShortName::parse("a.b").unwrap().as_bytes());
    }

    #[test]
    fn reject_bad_names() {
        assert_eq!(Err(NameError::Empty), ShortName::parse(""));
        assert_eq!(Err(NameError::TooLong), ShortName::parse("TOOLONGNAME.TXT"));
        assert_eq!(Err(NameError::TooLong), ShortName::parse("FILE.TEXT"));
        assert_eq!(Err(NameError::InvalidChar(b' ')), ShortName::parse("MY FILE.TXT"));
        assert_eq!(Err(NameError::InvalidChar(b'.')), ShortName::parse("A.B.C"));
        assert_eq!(Err(NameError::InvalidChar(b'.')), ShortName::parse(".HIDDEN"));
    }

    #[test]
    fn display_name() {
        use std::string::ToString;

        assert_eq!("README.TXT", ShortName::parse("readme.txt").unwrap().to_string());
        assert_eq!("NOEXT", ShortName::parse("noext").unwrap().to_string());
    }

    #[test]
    fn cluster_span() {
        let name = ShortName::parse("A.BIN").unwrap();
        let data = [0u8; 2000];
        let file = FileDescriptor::constant(name, &data);
        assert_eq!(4, file.clusters());
        assert_eq!(0, file.with_size(0).clusters());
        assert_eq!(1, file.with_size(512).clusters());
        assert_eq!(2, file.with_size(513).clusters());
        assert!(file.is_read_only());
    }

    #[test]
    fn constant_tail_block() {
        let name = ShortName::parse("A.BIN").unwrap();
        let data: std::vec::Vec<u8> = (0..600u32).map(|i| i as u8).collect();
        let file = FileDescriptor::constant(name, &data);

        let mut buf = [0xEEu8; BLOCK_SIZE];
        file.read_block(1, &mut buf);
        assert_eq!(&data[512..], &buf[..88]);
        assert!(buf[88..].iter().all(|&b| b == 0xEE));
    }
}
