use std::io::{Cursor, Read, Write};

use fatfs::{FileAttributes, FileSystem, FsOptions};
use vfat::{
    BLOCK_SIZE, DosDate, DosTime, FatType, FileDescriptor, MassStorage, Medium, ShortName,
    VolumeConfig, WriteHandler, sink::LongFile,
};

const README: &[u8] = b"Files on this drive are generated on the fly.\r\n";

fn name(s: &str) -> ShortName {
    ShortName::parse(s).unwrap()
}

fn ignore(_: u32, _: &[u8]) {}

/// 把整个介质读出来作为磁盘镜像
fn image(medium: &Medium) -> Vec<u8> {
    let blocks = medium.block_count();
    let mut img = vec![0u8; blocks as usize * BLOCK_SIZE];
    medium.read(0, &mut img, blocks);
    img
}

fn check_drive(config: VolumeConfig, expected: fatfs::FatType) {
    let long = LongFile::new(200_000);
    let sink: &dyn WriteHandler = &ignore;
    let stamp = (DosTime::new(12, 34, 56), DosDate::new(2023, 1, 20));
    let files = [
        FileDescriptor::constant(name("README.TXT"), README).stamped(stamp.0, stamp.1),
        FileDescriptor::constant(name("EMPTY.TXT"), b""),
        FileDescriptor::callback(name("LONGFILE.TXT"), long.len(), &long),
        FileDescriptor::constant(name("CTRL.TXT"), b"1\r\n").with_sink(sink),
    ];
    let medium = Medium::new(config, &files).unwrap();

    let fs = FileSystem::new(Cursor::new(image(&medium)), FsOptions::new()).unwrap();
    assert_eq!(expected, fs.fat_type());
    assert_eq!("KETYERE MSD", fs.volume_label());

    let read_file = |path: &str| {
        let mut content = Vec::new();
        fs.root_dir()
            .open_file(path)
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        content
    };

    assert_eq!(README, &read_file("readme.txt")[..]);
    assert_eq!(b"1\r\n", &read_file("CTRL.TXT")[..]);
    assert!(read_file("EMPTY.TXT").is_empty());

    let content = read_file("LONGFILE.TXT");
    assert_eq!(200_000, content.len());
    assert!(content.iter().enumerate().all(|(i, &b)| b == long.byte_at(i as u32)));

    let mut listed = Vec::new();
    for entry in fs.root_dir().iter() {
        let entry = entry.unwrap();
        if entry.attributes().contains(FileAttributes::VOLUME_ID) {
            continue;
        }
        let read_only = entry.attributes().contains(FileAttributes::READ_ONLY);
        listed.push((entry.short_file_name(), entry.len(), read_only));
    }
    assert_eq!(
        listed,
        [
            ("README.TXT".to_owned(), README.len() as u64, true),
            ("EMPTY.TXT".to_owned(), 0, true),
            ("LONGFILE.TXT".to_owned(), 200_000, true),
            ("CTRL.TXT".to_owned(), 3, false),
        ]
    );
}

#[test]
fn fat16_drive_mounts() {
    check_drive(VolumeConfig::FAT16.with_total_blocks(8192), fatfs::FatType::Fat16);
}

#[test]
fn fat32_drive_mounts() {
    let config = VolumeConfig::FAT32;
    assert_eq!(FatType::Fat32, config.fat_type);
    check_drive(config, fatfs::FatType::Fat32);
}

#[test]
fn unclaimed_space_is_unusable() {
    let files = [FileDescriptor::constant(name("README.TXT"), README)];
    let medium = Medium::new(VolumeConfig::FAT16.with_total_blocks(8192), &files).unwrap();
    let fs = FileSystem::new(Cursor::new(image(&medium)), FsOptions::new()).unwrap();

    // 未被文件占用的簇都是坏簇，主机无处分配
    let stats = fs.stats().unwrap();
    assert_eq!(0, stats.free_clusters());
    let mut file = fs.root_dir().create_file("NEW.TXT").unwrap();
    assert!(file.write_all(&[0u8; 1024]).is_err());
}
