use std::path::PathBuf;

use clap::Parser;

/// Dump the device's virtual drive to a raw disk image
#[derive(Parser)]
pub struct Cli {
    /// Output directory, the image is written to `fs.img`
    #[arg(long, short = 'O')]
    pub out_dir: PathBuf,

    /// SPI flash image backing `SPIFLASH.BIN`, created erased if missing
    #[arg(long, short)]
    pub flash: Option<PathBuf>,

    /// Build a FAT32 volume instead of FAT16
    #[arg(long)]
    pub fat32: bool,

    /// Total blocks of the volume, defaults to the preset's size
    #[arg(long, short)]
    pub blocks: Option<u32>,

    /// Host file written into `SPIFLASH.BIN` before dumping
    #[arg(long, short)]
    pub import: Option<PathBuf>,
}
