use std::{fmt, thread, time::Duration};

use rand::Rng;

use crate::error::ChipError;

// チップの大きさ
// 値がそのままはんだ付けにかかる時間 (単位時間) になる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Small = 1,
    Medium = 2,
    Big = 3,
}

impl SizeClass {
    pub fn units(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for SizeClass {
    type Error = ChipError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SizeClass::Small),
            2 => Ok(SizeClass::Medium),
            3 => Ok(SizeClass::Big),
            n => Err(ChipError::InvalidSize(n)),
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Big => "big",
        };
        f.write_str(name)
    }
}

// 生成後は変更されない。所有権は producer -> storage -> consumer と move していく
#[derive(Debug, PartialEq, Eq)]
pub struct Chip {
    size: SizeClass,
}

impl Chip {
    pub fn new(size: SizeClass) -> Self {
        Chip { size }
    }

    pub fn make() -> Result<Self, ChipError> {
        Self::make_with(&mut rand::thread_rng())
    }

    // テストでシード固定の乱数を渡せるようにしておく
    pub fn make_with<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, ChipError> {
        let size = SizeClass::try_from(rng.gen_range(1..=3u32))?;
        Ok(Chip::new(size))
    }

    pub fn size(&self) -> SizeClass {
        self.size
    }

    pub fn soldering_time(&self, unit: Duration) -> Duration {
        unit * self.size.units()
    }

    // はんだ付け = 大きさに比例した時間だけスレッドを止める
    pub fn solder(&self, unit: Duration) {
        thread::sleep(self.soldering_time(unit));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::time::Instant;

    #[test]
    fn test_size_from_raw() {
        assert_eq!(SizeClass::try_from(1), Ok(SizeClass::Small));
        assert_eq!(SizeClass::try_from(2), Ok(SizeClass::Medium));
        assert_eq!(SizeClass::try_from(3), Ok(SizeClass::Big));
        assert_eq!(SizeClass::try_from(0), Err(ChipError::InvalidSize(0)));
        assert_eq!(SizeClass::try_from(4), Err(ChipError::InvalidSize(4)));
    }

    #[test]
    fn test_make_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(18);
        let mut hist = [0usize; 3];
        const TRIALS: usize = 30000;

        for _ in 0..TRIALS {
            let chip = Chip::make_with(&mut rng).unwrap();
            hist[chip.size().units() as usize - 1] += 1;
        }

        // 期待値 10000 に対して ±10% 以内
        for n in hist {
            assert!((9000..=11000).contains(&n), "histogram: {:?}", hist);
        }
    }

    #[test]
    fn test_make_from_thread_rng() {
        for _ in 0..100 {
            let chip = Chip::make().unwrap();
            assert!((1..=3).contains(&chip.size().units()));
        }
    }

    #[test]
    fn test_solder_blocks_for_size() {
        let unit = Duration::from_millis(20);

        for size in [SizeClass::Small, SizeClass::Medium, SizeClass::Big] {
            let chip = Chip::new(size);
            let expected = unit * size.units();

            let start = Instant::now();
            chip.solder(unit);
            let elapsed = start.elapsed();

            assert!(elapsed >= expected, "{size}: {elapsed:?} < {expected:?}");
            assert!(
                elapsed < expected + Duration::from_millis(200),
                "{size}: {elapsed:?}"
            );
        }
    }
}
