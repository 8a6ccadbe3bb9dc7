use crate::{
    BLOCK_SIZE, FatType, Media, VolumeConfig,
    config::{FAT_COUNT, SECTORS_PER_CLUSTER},
    volume::{OnDisk, copy_window},
};

use super::{BACKUP_BOOT_SECTOR, FS_INFO_SECTOR};

/// 启动代码区的填充字节（x86的`nop`）
const BOOT_CODE_FILL: u8 = 0x90;

/// BIOS Parameter Block BIOS参数块
/// 位于保留区的第一扇区，该扇区又名启动扇区。
///
/// FAT16与FAT32共用的前36字节。
#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub struct Bpb {
    /// 跳转至启动代码的指令
    bs_jmp_boot: [u8; 3],

    /// 一般用于记录什么系统格式化此卷
    bs_oem_name: [u8; 8],

    /// 一个扇区的字节量
    byts_per_sec: u16,

    /// 一个簇的扇区数
    sec_per_clus: u8,

    /// 保留区的扇区数
    rsvd_sec_cnt: u16,

    /// 此卷的文件分配表(FAT)数量，建议为2
    num_fats: u8,

    /// - FAT32: 0
    root_ent_cnt: u16,

    /// 卷不足0x10000扇区时的扇区总数，否则为0
    tot_sec16: u16,

    /// 物理媒介的类型
    media: Media,

    /// - FAT32: 0
    fat_sz16: u16,

    /// 中断0x13模式下，轨道的扇区数
    sec_per_trk: u16,

    /// 中断0x13模式下，头数量
    num_heads: u16,

    /// 中断0x13模式下使用
    hidd_sec: u32,

    /// `tot_sec16`为0时的扇区总数
    tot_sec32: u32,
}

/// Extended BPB fields for FAT32 volume
#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub struct Fat32Ext {
    /// FAT占用扇区数
    fat_sz32: u32,

    /// Bit 7为0表示所有FAT实时镜像
    ext_flags: u16,

    /// 卷版本号，为0x0
    fs_ver: u16,

    /// 根目录首个簇的编号
    root_clus: u32,

    /// FSINFO所在扇区号（此扇区位于保留区），通常为1
    fs_info: u16,

    /// 非0时，表示boot备份所在扇区号（此扇区位于保留区，恒为6号）
    bk_boot_sec: u16,

    reserved: [u8; 12],
}

/// 扩展引导记录，FAT16紧跟在[`Bpb`]后，FAT32紧跟在[`Fat32Ext`]后
#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub struct BootRecord {
    /// 中断0x13驱动号，为0x80或0x00
    drv_num: u8,

    reserved1: u8,

    /// 启用时，表示接下来的三个字段存在
    boot_sig: BootSignature,

    /// 供移动介质使用
    vol_id: u32,

    /// 卷标签，与根目录记录的卷标签一致
    vol_lab: [u8; 11],

    /// 文件系统类型：FAT12/FAT16/FAT32
    ///
    /// 只用来做告示，不应信赖此字段。
    fil_sys_type: [u8; 8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BootSignature {
    Set = 0x29,
    Unset = 0x00,
}

#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub struct Fat16Boot {
    bpb: Bpb,
    record: BootRecord,
    boot_code: [u8; 448],
    /// [0x55, 0xAA]
    signature_word: [u8; 2],
}

#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub struct Fat32Boot {
    bpb: Bpb,
    ext: Fat32Ext,
    record: BootRecord,
    boot_code: [u8; 420],
    /// [0x55, 0xAA]
    signature_word: [u8; 2],
}

unsafe impl OnDisk for Fat16Boot {}
unsafe impl OnDisk for Fat32Boot {}

/// 启动扇区，FAT32卷还会在6号扇区出现一份相同的备份
#[derive(Debug, Clone, Copy)]
pub enum BootBlock {
    Fat16(Fat16Boot),
    Fat32(Fat32Boot),
}

impl Bpb {
    fn new(config: &VolumeConfig) -> Self {
        let fat_sectors = config.fat_sectors();
        let (jmp_boot, root_ent_cnt, fat_sz16) = match config.fat_type {
            FatType::Fat16 => ([0xEB, 0x3C, 0x90], config.root_entries, fat_sectors as u16),
            FatType::Fat32 => ([0xEB, 0x58, 0x90], 0, 0),
        };
        // 两个字段恰有一个非0
        let (tot_sec16, tot_sec32) = match u16::try_from(config.total_blocks) {
            Ok(total) if config.fat_type == FatType::Fat16 => (total, 0),
            _ => (0, config.total_blocks),
        };

        Self {
            bs_jmp_boot: jmp_boot,
            bs_oem_name: config.oem_name,
            byts_per_sec: (BLOCK_SIZE as u16).to_le(),
            sec_per_clus: SECTORS_PER_CLUSTER as u8,
            rsvd_sec_cnt: config.reserved_sectors.to_le(),
            num_fats: FAT_COUNT as u8,
            root_ent_cnt: root_ent_cnt.to_le(),
            tot_sec16: tot_sec16.to_le(),
            media: config.media,
            fat_sz16: fat_sz16.to_le(),
            sec_per_trk: 32u16.to_le(),
            num_heads: 1u16.to_le(),
            hidd_sec: 0,
            tot_sec32: tot_sec32.to_le(),
        }
    }
}

impl BootRecord {
    fn new(config: &VolumeConfig) -> Self {
        Self {
            drv_num: 0x80,
            reserved1: 0,
            boot_sig: BootSignature::Set,
            vol_id: config.volume_serial.to_le(),
            vol_lab: config.volume_label,
            fil_sys_type: config.fat_type.fs_label(),
        }
    }
}

impl BootBlock {
    pub fn new(config: &VolumeConfig) -> Self {
        let bpb = Bpb::new(config);
        let record = BootRecord::new(config);

        match config.fat_type {
            FatType::Fat16 => Self::Fat16(Fat16Boot {
                bpb,
                record,
                boot_code: [BOOT_CODE_FILL; 448],
                signature_word: [0x55, 0xAA],
            }),
            FatType::Fat32 => Self::Fat32(Fat32Boot {
                bpb,
                ext: Fat32Ext {
                    fat_sz32: config.fat_sectors().to_le(),
                    ext_flags: 0,
                    fs_ver: 0,
                    root_clus: crate::ClusterId::MIN.get().to_le(),
                    fs_info: (FS_INFO_SECTOR as u16).to_le(),
                    bk_boot_sec: (BACKUP_BOOT_SECTOR as u16).to_le(),
                    reserved: [0; 12],
                },
                record,
                boot_code: [BOOT_CODE_FILL; 420],
                signature_word: [0x55, 0xAA],
            }),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Fat16(boot) => boot.as_bytes(),
            Self::Fat32(boot) => boot.as_bytes(),
        }
    }

    /// 读取启动扇区中`offset`起的字节，可以是任意区间
    pub fn read(&self, offset: usize, buf: &mut [u8]) {
        copy_window(self.as_bytes(), offset, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u16_at(bytes: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([bytes[at], bytes[at + 1]])
    }

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    #[test]
    fn fat16_fields() {
        let config = VolumeConfig::FAT16.with_serial(0x1234_5678);
        let boot = BootBlock::new(&config);
        let bytes = boot.as_bytes();

        assert_eq!([0xEB, 0x3C, 0x90], bytes[..3]);
        assert_eq!(b"MSDOS5.0", &bytes[3..11]);
        assert_eq!(512, u16_at(bytes, 11));
        assert_eq!(1, bytes[13]);
        assert_eq!(1, u16_at(bytes, 14));
        assert_eq!(2, bytes[16]);
        assert_eq!(512, u16_at(bytes, 17));
        assert_eq!(40960, u16_at(bytes, 19));
        assert_eq!(0xF0, bytes[21]);
        assert_eq!(159, u16_at(bytes, 22));
        assert_eq!(32, u16_at(bytes, 24));
        assert_eq!(1, u16_at(bytes, 26));
        assert_eq!(0, u32_at(bytes, 28));
        assert_eq!(0, u32_at(bytes, 32));
        assert_eq!(0x80, bytes[36]);
        assert_eq!(0x29, bytes[38]);
        assert_eq!(0x1234_5678, u32_at(bytes, 39));
        assert_eq!(b"KETYERE MSD", &bytes[43..54]);
        assert_eq!(b"FAT16   ", &bytes[54..62]);
        assert!(bytes[62..510].iter().all(|&b| b == 0x90));
        assert_eq!([0x55, 0xAA], bytes[510..]);
    }

    #[test]
    fn fat32_fields() {
        let config = VolumeConfig::FAT32;
        let boot = BootBlock::new(&config);
        let bytes = boot.as_bytes();

        assert_eq!([0xEB, 0x58, 0x90], bytes[..3]);
        assert_eq!(32, u16_at(bytes, 14));
        assert_eq!(0, u16_at(bytes, 17));
        assert_eq!(0, u16_at(bytes, 19));
        assert_eq!(0, u16_at(bytes, 22));
        assert_eq!(70000, u32_at(bytes, 32));
        assert_eq!(543, u32_at(bytes, 36));
        assert_eq!(0, u16_at(bytes, 40));
        assert_eq!(0, u16_at(bytes, 42));
        assert_eq!(2, u32_at(bytes, 44));
        assert_eq!(1, u16_at(bytes, 48));
        assert_eq!(6, u16_at(bytes, 50));
        assert_eq!(0x80, bytes[64]);
        assert_eq!(0x29, bytes[66]);
        assert_eq!(b"KETYERE MSD", &bytes[71..82]);
        assert_eq!(b"FAT32   ", &bytes[82..90]);
        assert!(bytes[90..510].iter().all(|&b| b == 0x90));
        assert_eq!([0x55, 0xAA], bytes[510..]);
    }

    #[test]
    fn large_fat16_uses_tot_sec32() {
        let config = VolumeConfig::FAT16.with_total_blocks(100_000);
        let boot = BootBlock::new(&config);
        let bytes = boot.as_bytes();
        assert_eq!(0, u16_at(bytes, 19));
        assert_eq!(100_000, u32_at(bytes, 32));
    }

    #[test]
    fn partial_read() {
        let boot = BootBlock::new(&VolumeConfig::FAT16);
        let mut buf = [0u8; 4];
        boot.read(508, &mut buf);
        assert_eq!([0x90, 0x90, 0x55, 0xAA], buf);
    }
}
