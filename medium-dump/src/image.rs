use std::io::{self, Write};

use block_dev::{BLOCK_SIZE, MassStorage};
use vfat::Medium;

/// 一次读出的块数
const BATCH: u32 = 128;

/// 像主机一样整块写入文件，返回写入的块数。
///
/// 数据按块补0；超出文件大小时报错，不写入任何内容。
pub fn import(medium: &Medium, name: &str, data: &[u8]) -> io::Result<u32> {
    let extent = medium
        .file_extent(name)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no {name} on drive")))?;

    let blocks = data.len().div_ceil(BLOCK_SIZE) as u32;
    if blocks > extent.len() as u32 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} bytes do not fit into {name}", data.len()),
        ));
    }

    let mut padded = data.to_vec();
    padded.resize(blocks as usize * BLOCK_SIZE, 0);
    medium.write(extent.start, &padded, blocks);
    log::info!("imported {} bytes into {name}", data.len());

    Ok(blocks)
}

/// 把整个介质按块顺序写入`out`，返回写入的字节数
pub fn dump<W: Write>(medium: &Medium, mut out: W) -> io::Result<u64> {
    let total = medium.block_count();
    let mut buf = vec![0u8; BATCH as usize * BLOCK_SIZE];

    let mut block = 0;
    while block < total {
        let count = BATCH.min(total - block);
        let chunk = &mut buf[..count as usize * BLOCK_SIZE];
        medium.read(block, chunk, count);
        out.write_all(chunk)?;
        block += count;
    }
    out.flush()?;

    Ok(total as u64 * BLOCK_SIZE as u64)
}
