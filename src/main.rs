mod chip;
mod config;
mod error;
mod shutdown;
mod storage;
mod worker;

use std::{sync::Arc, thread};

use signal_hook::{
    consts::{SIGINT, SIGTERM, SIGUSR1},
    iterator::Signals,
};
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

use config::Config;
use shutdown::Shutdown;
use storage::ChipStorage;

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn main() -> Result<(), BoxedError> {
    let matches = config::command().get_matches();
    let config = Config::from_matches(&matches)?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 共有バッファはグローバルにせず Arc で各スレッドに渡す
    let storage = Arc::new(ChipStorage::new(config.signaling));
    let shutdown = Arc::new(Shutdown::new());

    info!(
        pid = std::process::id(),
        signaling = ?storage.signaling(),
        "soldering for {:?}, a chip every {:?}",
        config.duration(),
        config.interval()
    );

    // SIGINT, SIGTERM で producer を止め、SIGUSR1 で storage の状態を出力
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGUSR1])?;
    let signal_handle = signals.handle();
    let storage0 = storage.clone();
    let shutdown0 = shutdown.clone();
    let signal_thread = thread::spawn(move || {
        for sig in signals.forever() {
            if sig == SIGUSR1 {
                let snapshot = storage0.snapshot();
                info!(
                    queued = snapshot.queued,
                    added = snapshot.added,
                    available = snapshot.available,
                    closed = snapshot.closed,
                    "storage status"
                );
            } else {
                warn!("received signal {}, stopping producer", sig);
                shutdown0.trigger();
            }
        }
    });

    let storage0 = storage.clone();
    let unit = config.unit;
    let consumer = thread::spawn(move || worker::consume(&storage0, unit));

    let storage0 = storage.clone();
    let shutdown0 = shutdown.clone();
    let (interval, duration) = (config.interval(), config.duration());
    let producer =
        thread::spawn(move || worker::produce(&storage0, &shutdown0, interval, duration));

    let produced = producer.join();

    // これ以上チップは追加されないので、consumer には残りを処理させて終了させる
    storage.close();
    let consumed = consumer.join();

    signal_handle.close();
    let _ = signal_thread.join();

    let produced = match produced {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            error!("producer failed: {}", e);
            return Err(e.into());
        }
        Err(_) => return Err("producer thread panicked".into()),
    };
    let consumed = consumed.map_err(|_| "consumer thread panicked")?;

    if shutdown.is_triggered() {
        warn!("producer was stopped before its deadline");
    }

    info!(
        added = storage.added(),
        produced = produced.produced,
        soldered = consumed.soldered,
        small = consumed.small,
        medium = consumed.medium,
        big = consumed.big,
        "done"
    );

    Ok(())
}
