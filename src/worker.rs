use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::{
    chip::{Chip, SizeClass},
    error::ChipError,
    shutdown::Shutdown,
    storage::ChipStorage,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProducerReport {
    pub produced: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerReport {
    pub soldered: usize,
    pub small: usize,
    pub medium: usize,
    pub big: usize,
}

impl ConsumerReport {
    fn record(&mut self, size: SizeClass) {
        self.soldered += 1;
        match size {
            SizeClass::Small => self.small += 1,
            SizeClass::Medium => self.medium += 1,
            SizeClass::Big => self.big += 1,
        }
    }
}

// interval ごとにチップを作って storage に積む
// 開始から duration を超える tick は打たない (interval=2, duration=20 なら 10 個)
// Instant で表現できない deadline は無いものとして、shutdown まで動き続ける
pub fn produce(
    storage: &ChipStorage,
    shutdown: &Shutdown,
    interval: Duration,
    duration: Duration,
) -> Result<ProducerReport, ChipError> {
    let start = Instant::now();
    let deadline = start.checked_add(duration);
    let mut report = ProducerReport::default();
    let mut next = start.checked_add(interval);

    while let Some(tick) = next.filter(|t| deadline.map_or(true, |d| *t <= d)) {
        if shutdown.wait_until(tick) {
            info!("producer cancelled after {} chips", report.produced);
            return Ok(report);
        }

        let chip = Chip::make()?;
        debug!("made {} chip", chip.size());
        storage.add(chip);
        report.produced += 1;

        next = tick.checked_add(interval);
    }

    debug!("producer finished after {:?}", start.elapsed());
    Ok(report)
}

// storage が close されて空になるまで取り出してははんだ付けする
pub fn consume(storage: &ChipStorage, unit: Duration) -> ConsumerReport {
    let mut report = ConsumerReport::default();

    while let Some(chip) = storage.remove() {
        chip.solder(unit);
        info!(size = %chip.size(), "Processing chip");
        report.record(chip.size());
    }

    report
}
