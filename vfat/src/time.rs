//! 目录项使用的DOS时间与日期

/// Bits 15-11: hour (0-23)
/// Bits 10-5:  minute (0-59)
/// Bits 4-0:   second / 2 (0-29)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct DosTime(u16);

impl DosTime {
    /// 秒的粒度为2秒，奇数秒向下取整
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        assert!(hour < 24 && minute < 60 && second < 60);
        Self((hour as u16) << 11 | (minute as u16) << 5 | (second as u16) / 2)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn hour(self) -> u8 {
        (self.0 >> 11) as u8
    }

    pub const fn minute(self) -> u8 {
        (self.0 >> 5 & 0x3F) as u8
    }

    pub const fn second(self) -> u8 {
        (self.0 & 0x1F) as u8 * 2
    }

    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

/// Bits 15-9: year - 1980 (0-127)
/// Bits 8-5:  month (1-12)
/// Bits 4-0:  day (1-31)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct DosDate(u16);

impl Default for DosDate {
    fn default() -> Self {
        Self::EPOCH
    }
}

impl DosDate {
    pub const EPOCH: Self = Self::new(1980, 1, 1);

    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        assert!(year >= 1980 && year <= 1980 + 127);
        assert!(month >= 1 && month <= 12 && day >= 1 && day <= 31);
        Self((year - 1980) << 9 | (month as u16) << 5 | day as u16)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn year(self) -> u16 {
        (self.0 >> 9) + 1980
    }

    pub const fn month(self) -> u8 {
        (self.0 >> 5 & 0x0F) as u8
    }

    pub const fn day(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_packing() {
        let t = DosTime::new(12, 34, 56);
        assert_eq!(0x645C, t.raw());
        assert_eq!((12, 34, 56), (t.hour(), t.minute(), t.second()));
        assert_eq!(DosTime::new(23, 59, 58), DosTime::new(23, 59, 59));
        assert_eq!(0, DosTime::default().raw());
    }

    #[test]
    fn date_packing() {
        let d = DosDate::new(2023, 1, 20);
        assert_eq!((43 << 9) | (1 << 5) | 20, d.raw());
        assert_eq!((2023, 1, 20), (d.year(), d.month(), d.day()));
        assert_eq!([0x21, 0x00], DosDate::EPOCH.to_le_bytes());
    }
}
