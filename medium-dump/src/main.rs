mod cli;
mod drive;
mod flash_image;
mod image;

use std::fs::{self, File};
use std::io::{self, BufWriter};

use clap::Parser;
use typed_bytesize::ByteSizeIec;
use vfat::{Medium, VolumeConfig};

pub use self::{cli::Cli, drive::Drive, flash_image::FlashImage};

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    println!("out_dir={:?}\nflash={:?}", cli.out_dir, cli.flash);

    let mut config = if cli.fat32 {
        VolumeConfig::FAT32
    } else {
        VolumeConfig::FAT16
    };
    if let Some(blocks) = cli.blocks {
        config = config.with_total_blocks(blocks);
    }

    let flash = match &cli.flash {
        Some(path) => FlashImage::open(path, drive::flash_size())?,
        None => FlashImage::blank(drive::flash_size()),
    };
    let drive = Drive::new(flash);
    let files = drive.files();
    let medium = Medium::new(config, &files).map_err(io::Error::other)?;

    if let Some(path) = &cli.import {
        let data = fs::read(path)?;
        image::import(&medium, "SPIFLASH.BIN", &data)?;
    }

    let img = cli.out_dir.join("fs.img");
    let len = image::dump(&medium, BufWriter::new(File::create(&img)?))?;
    log::info!(
        "{:?} image of {} MiB written to {}",
        config.fat_type,
        len / ByteSizeIec::mib(1).0,
        img.display()
    );

    drop(medium);
    let (backlight, flash) = drive.into_parts();
    log::debug!("backlight on: {}", backlight.is_on());
    if let Some(path) = &cli.flash {
        flash.save(path)?;
    }

    Ok(())
}
